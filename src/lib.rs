pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::toml_config::AppConfig;

pub use adapters::{
    ConfiguredGenerator, DisabledGenerator, FilePreferences, GeminiClient, MemoryPreferences,
};
pub use core::{
    filter::ListingFilter,
    marketplace::Marketplace,
    pricing::{Quote, RentalDays},
    session::{Action, AppState},
};
pub use utils::error::{MarketError, Result};
