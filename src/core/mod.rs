pub mod assistant;
pub mod catalog;
pub mod filter;
pub mod marketplace;
pub mod preferences;
pub mod pricing;
pub mod search;
pub mod session;

pub use crate::domain::model::{Listing, Message, RentalRequest, User};
pub use crate::domain::ports::{ConfigProvider, PreferenceStore, TextGenerator};
pub use crate::utils::error::Result;
