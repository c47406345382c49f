// Adapters layer: concrete implementations for external systems
// (generative service, preference storage).

pub mod file;
pub mod gemini;
pub mod memory;

pub use file::FilePreferences;
pub use gemini::{ConfiguredGenerator, DisabledGenerator, GeminiClient};
pub use memory::MemoryPreferences;
