use serde::{Deserialize, Serialize};

use crate::core::filter::ListingFilter;
use crate::domain::model::{Listing, SearchCandidate};

/// Ordered listings, newest first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    listings: Vec<Listing>,
}

impl Catalog {
    pub fn new(listings: Vec<Listing>) -> Self {
        Self { listings }
    }

    pub fn listings(&self) -> &[Listing] {
        &self.listings
    }

    pub fn len(&self) -> usize {
        self.listings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listings.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Listing> {
        self.listings.iter().find(|l| l.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// New listings go to the front.
    pub fn with_listing(&self, listing: Listing) -> Self {
        let mut listings = Vec::with_capacity(self.listings.len() + 1);
        listings.push(listing);
        listings.extend(self.listings.iter().cloned());
        Self { listings }
    }

    pub fn filtered(&self, filter: &ListingFilter) -> Vec<&Listing> {
        filter.apply(&self.listings)
    }

    pub fn owned_by<'a>(&'a self, owner_id: &'a str) -> impl Iterator<Item = &'a Listing> + 'a {
        self.listings.iter().filter(move |l| l.owner_id == owner_id)
    }

    /// Listings whose id is in `ids`, in catalog order.
    pub fn select_ids<S: AsRef<str>>(&self, ids: &[S]) -> Vec<&Listing> {
        self.listings
            .iter()
            .filter(|l| ids.iter().any(|id| id.as_ref() == l.id))
            .collect()
    }

    pub fn search_candidates(&self) -> Vec<SearchCandidate<'_>> {
        self.listings.iter().map(SearchCandidate::from).collect()
    }
}
