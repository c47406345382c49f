use crate::core::filter::{ListingFilter, Selection};
use crate::core::pricing::RentalDays;
use crate::domain::model::{Category, Condition};
use crate::utils::error::{MarketError, Result};
use crate::utils::validation::Validate;
use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "campus-rent")]
#[command(about = "Browse, search and quote the campus rental marketplace")]
pub struct CliConfig {
    /// Path to TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    #[arg(long, help = "Only show this category, e.g. \"Lab Equipment\"")]
    pub category: Option<Category>,

    #[arg(long, help = "Only show this condition, e.g. \"Like New\"")]
    pub condition: Option<Condition>,

    #[arg(long)]
    pub min_price: Option<u64>,

    #[arg(long)]
    pub max_price: Option<u64>,

    /// Free-text query matched against title and description
    #[arg(short, long)]
    pub query: Option<String>,

    #[arg(long, help = "Ask the assistant to match the query by intent")]
    pub smart: bool,

    /// Listing to quote and show safety tips for
    #[arg(long)]
    pub listing: Option<String>,

    #[arg(long, default_value = "1")]
    pub days: u32,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl CliConfig {
    pub fn filter(&self) -> ListingFilter {
        ListingFilter {
            category: Selection::from(self.category),
            condition: Selection::from(self.condition),
            min_price: self.min_price,
            max_price: self.max_price,
            query: self.query.clone(),
        }
    }

    pub fn rental_days(&self) -> Result<RentalDays> {
        RentalDays::new(self.days)
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        self.rental_days()?;
        if let (Some(min), Some(max)) = (self.min_price, self.max_price) {
            if min > max {
                return Err(MarketError::InvalidConfigValueError {
                    field: "min_price".to_string(),
                    value: min.to_string(),
                    reason: format!("Must not exceed max_price ({})", max),
                });
            }
        }
        Ok(())
    }
}
