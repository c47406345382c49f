use serde::{Deserialize, Serialize};

use crate::domain::model::{Category, Condition, Listing};

/// Exact-match selector where `All` disables the predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Selection<T> {
    All,
    Only(T),
}

impl<T> Default for Selection<T> {
    fn default() -> Self {
        Selection::All
    }
}

impl<T: PartialEq> Selection<T> {
    pub fn admits(&self, value: &T) -> bool {
        match self {
            Selection::All => true,
            Selection::Only(wanted) => wanted == value,
        }
    }
}

impl<T> From<Option<T>> for Selection<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Selection::All, Selection::Only)
    }
}

/// Case-insensitive substring match on title or description.
pub fn matches_text(listing: &Listing, query: &str) -> bool {
    let needle = query.to_lowercase();
    listing.title.to_lowercase().contains(&needle)
        || listing.description.to_lowercase().contains(&needle)
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingFilter {
    pub category: Selection<Category>,
    pub condition: Selection<Condition>,
    /// Inclusive bounds on the daily price.
    pub min_price: Option<u64>,
    pub max_price: Option<u64>,
    pub query: Option<String>,
}

impl ListingFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.category = Selection::Only(category);
        self
    }

    pub fn with_condition(mut self, condition: Condition) -> Self {
        self.condition = Selection::Only(condition);
        self
    }

    pub fn with_price_range(mut self, min: Option<u64>, max: Option<u64>) -> Self {
        self.min_price = min;
        self.max_price = max;
        self
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    /// The free-text query if it would actually constrain anything.
    pub fn active_query(&self) -> Option<&str> {
        self.query.as_deref().filter(|q| !q.trim().is_empty())
    }

    /// Same filter with the free-text predicate switched off.
    pub fn without_query(&self) -> Self {
        Self {
            query: None,
            ..self.clone()
        }
    }

    /// Category, condition and price predicates only.
    pub fn matches_structure(&self, listing: &Listing) -> bool {
        self.category.admits(&listing.category)
            && self.condition.admits(&listing.condition)
            && self.min_price.map_or(true, |min| listing.price_per_day >= min)
            && self.max_price.map_or(true, |max| listing.price_per_day <= max)
    }

    pub fn matches(&self, listing: &Listing) -> bool {
        self.matches_structure(listing)
            && self
                .active_query()
                .map_or(true, |query| matches_text(listing, query))
    }

    /// Ordered subsequence of `listings` that passes every active predicate.
    pub fn apply<'a, I>(&self, listings: I) -> Vec<&'a Listing>
    where
        I: IntoIterator<Item = &'a Listing>,
    {
        listings.into_iter().filter(|l| self.matches(l)).collect()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
