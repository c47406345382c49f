//! Deposit and rent arithmetic. Currency is whole units throughout.

use serde::Serialize;

use crate::domain::model::Listing;
use crate::utils::error::{MarketError, Result};

/// Refundable hold: half the original value, rounded up.
pub fn security_deposit(original_price: u64) -> u64 {
    original_price.div_ceil(2)
}

/// Daily price used when the assistant cannot suggest one: 5% of value, rounded up.
pub fn fallback_daily_price(original_price: u64) -> u64 {
    original_price.saturating_mul(5).div_ceil(100)
}

/// Number of rental days, never below one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct RentalDays(u32);

impl RentalDays {
    pub const MIN: RentalDays = RentalDays(1);

    pub fn new(days: u32) -> Result<Self> {
        if days < Self::MIN.0 {
            return Err(MarketError::validation("days", "Rent for at least one day."));
        }
        Ok(Self(days))
    }

    pub fn get(self) -> u32 {
        self.0
    }

    pub fn increment(self) -> Self {
        Self(self.0.saturating_add(1))
    }

    pub fn decrement(self) -> Self {
        Self(self.0.saturating_sub(1).max(Self::MIN.0))
    }
}

impl Default for RentalDays {
    fn default() -> Self {
        Self::MIN
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Quote {
    pub days: u32,
    pub price_per_day: u64,
    pub subtotal: u64,
    pub deposit: u64,
    pub grand_total: u64,
}

impl Quote {
    pub fn new(price_per_day: u64, original_price: u64, days: RentalDays) -> Self {
        let subtotal = u64::from(days.get()).saturating_mul(price_per_day);
        let deposit = security_deposit(original_price);
        Self {
            days: days.get(),
            price_per_day,
            subtotal,
            deposit,
            grand_total: subtotal.saturating_add(deposit),
        }
    }

    pub fn for_listing(listing: &Listing, days: RentalDays) -> Self {
        Self::new(listing.price_per_day, listing.original_price, days)
    }
}
