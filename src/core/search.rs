use serde::Serialize;

use crate::core::assistant::{Assistant, Suggestion};
use crate::core::catalog::Catalog;
use crate::core::filter::{matches_text, ListingFilter};
use crate::domain::model::Listing;
use crate::domain::ports::TextGenerator;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchSource {
    /// Plain predicate filtering, the service was not asked.
    Filter,
    /// Ids returned by the semantic search service.
    Semantic,
    /// Service failed or matched nothing; substring match used instead.
    SubstringFallback,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchOutcome<'a> {
    pub listings: Vec<&'a Listing>,
    pub source: MatchSource,
}

/// Semantic search over `catalog`, narrowed by the structural predicates of `filter`.
///
/// Never fails: a service error or an empty id set degrades to case-insensitive
/// substring matching on title and description.
pub async fn smart_search<'a, G: TextGenerator>(
    assistant: &Assistant<G>,
    catalog: &'a Catalog,
    filter: &ListingFilter,
    query: &str,
) -> SearchOutcome<'a> {
    let structural = filter.without_query();

    if query.trim().is_empty() {
        return SearchOutcome {
            listings: catalog.filtered(&structural),
            source: MatchSource::Filter,
        };
    }

    let candidates = catalog.search_candidates();
    let matched = match assistant.match_listings(query, &candidates).await {
        Suggestion::Generated(ids) => catalog.select_ids(&ids),
        Suggestion::Fallback(_) => Vec::new(),
    };

    let (hits, source) = if matched.is_empty() {
        tracing::info!("No semantic matches for '{}', using substring search", query);
        let hits: Vec<&Listing> = catalog
            .listings()
            .iter()
            .filter(|l| matches_text(l, query))
            .collect();
        (hits, MatchSource::SubstringFallback)
    } else {
        (matched, MatchSource::Semantic)
    };

    SearchOutcome {
        listings: structural.apply(hits),
        source,
    }
}
