use chrono::{DateTime, Utc};

use crate::core::assistant::{Assistant, AssistantSettings, PriceSuggestion, Suggestion};
use crate::core::filter::ListingFilter;
use crate::core::preferences::Preferences;
use crate::core::pricing::{Quote, RentalDays};
use crate::core::search::{smart_search, SearchOutcome};
use crate::core::session::{Action, AppState};
use crate::domain::model::{Category, Condition, Listing, User};
use crate::domain::ports::{PreferenceStore, TextGenerator};
use crate::utils::error::{MarketError, Result};
use crate::utils::validation::validate_campus_email;

/// Owns one session: state, the preference store and the assistant.
pub struct Marketplace<S: PreferenceStore, G: TextGenerator> {
    state: AppState,
    preferences: S,
    assistant: Assistant<G>,
    email_domain: String,
}

impl<S: PreferenceStore, G: TextGenerator> Marketplace<S, G> {
    /// Starts a session on `catalog`, restoring the signed-in user and theme from `preferences`.
    pub async fn open(
        catalog: Vec<Listing>,
        users: Vec<User>,
        preferences: S,
        generator: G,
        settings: AssistantSettings,
    ) -> Self {
        let restored = Preferences::load(&preferences).await;
        if let Some(user) = &restored.user {
            tracing::info!("Restored session for {}", user.email);
        }

        Self {
            state: AppState::new(catalog, users)
                .with_preferences(restored.user, restored.dark_mode),
            preferences,
            assistant: Assistant::new(generator, settings),
            email_domain: "nitrr.ac.in".to_string(),
        }
    }

    pub fn with_email_domain(mut self, domain: impl Into<String>) -> Self {
        self.email_domain = domain.into();
        self
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn assistant(&self) -> &Assistant<G> {
        &self.assistant
    }

    pub fn preference_store(&self) -> &S {
        &self.preferences
    }

    pub async fn dispatch(&mut self, action: Action) -> Result<()> {
        self.dispatch_at(action, Utc::now()).await
    }

    /// Applies `action` and, when it touched persisted state, writes the preferences back.
    pub async fn dispatch_at(&mut self, action: Action, now: DateTime<Utc>) -> Result<()> {
        let persist = action.changes_preferences();
        self.state = self.state.apply(action, now)?;

        if persist {
            let prefs = Preferences {
                user: self.state.user().cloned(),
                dark_mode: self.state.dark_mode(),
            };
            if let Err(e) = prefs.persist(&self.preferences).await {
                tracing::warn!("Could not save preferences: {}", e);
            }
        }
        Ok(())
    }

    /// Mock sign-in: any address on the campus domain gets a fresh verified account.
    pub async fn sign_in_with_email(&mut self, email: &str, name: Option<&str>) -> Result<User> {
        validate_campus_email(email, &self.email_domain)?;
        let now = Utc::now();
        let id = self.state.next_id('u', now);
        let user = User::mock_account(id, email, name);
        self.dispatch_at(Action::SignIn(user.clone()), now).await?;
        Ok(user)
    }

    pub fn browse(&self, filter: &ListingFilter) -> Vec<&Listing> {
        self.state.catalog().filtered(filter)
    }

    pub async fn smart_search(&self, filter: &ListingFilter, query: &str) -> SearchOutcome<'_> {
        smart_search(&self.assistant, self.state.catalog(), filter, query).await
    }

    fn listing(&self, listing_id: &str) -> Result<&Listing> {
        self.state.listing(listing_id).ok_or_else(|| MarketError::NotFound {
            entity: "listing",
            id: listing_id.to_string(),
        })
    }

    pub fn quote(&self, listing_id: &str, days: RentalDays) -> Result<Quote> {
        Ok(Quote::for_listing(self.listing(listing_id)?, days))
    }

    pub async fn reserve(&mut self, listing_id: &str, days: RentalDays) -> Result<()> {
        self.dispatch(Action::Reserve {
            listing_id: listing_id.to_string(),
            days,
        })
        .await
    }

    pub async fn send_message(&mut self, listing_id: &str, text: &str) -> Result<()> {
        self.dispatch(Action::SendMessage {
            listing_id: listing_id.to_string(),
            text: text.to_string(),
        })
        .await
    }

    pub async fn safety_tips(&self, listing_id: &str) -> Result<Suggestion<Vec<String>>> {
        let listing = self.listing(listing_id)?;
        Ok(self.assistant.safety_tips(listing).await)
    }

    pub async fn suggest_description(
        &self,
        title: &str,
        category: Category,
        condition: Condition,
    ) -> Result<Suggestion<String>> {
        self.assistant
            .suggest_description(title, category, condition)
            .await
    }

    pub async fn suggest_price(
        &self,
        title: &str,
        original_price: u64,
    ) -> Result<Suggestion<PriceSuggestion>> {
        self.assistant.suggest_price(title, original_price).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::gemini::DisabledGenerator;
    use crate::adapters::memory::MemoryPreferences;
    use crate::core::preferences::{DARK_MODE_KEY, USER_KEY};
    use crate::domain::seed::{demo_catalog, demo_users};

    async fn open(store: MemoryPreferences) -> Marketplace<MemoryPreferences, DisabledGenerator> {
        Marketplace::open(
            demo_catalog(),
            demo_users(),
            store,
            DisabledGenerator,
            AssistantSettings::default(),
        )
        .await
    }

    #[tokio::test]
    async fn test_sign_in_is_persisted() {
        let store = MemoryPreferences::new();
        let mut market = open(store.clone()).await;

        let user = market
            .sign_in_with_email("sneha.r@nitrr.ac.in", None)
            .await
            .unwrap();
        assert_eq!(user.name, "sneha.r");

        let saved = store.get(USER_KEY).await.unwrap();
        assert!(saved.contains("sneha.r@nitrr.ac.in"));

        let reopened = open(store).await;
        assert_eq!(reopened.state().user().map(|u| u.id.clone()), Some(user.id));
    }

    #[tokio::test]
    async fn test_repeated_sign_ins_get_distinct_ids() {
        let mut market = open(MemoryPreferences::new()).await;

        let first = market
            .sign_in_with_email("sneha.r@nitrr.ac.in", None)
            .await
            .unwrap();
        let second = market
            .sign_in_with_email("rahul.k@nitrr.ac.in", None)
            .await
            .unwrap();

        assert_ne!(first.id, second.id);
        for id in [&first.id, &second.id] {
            let (millis, seq) = id.trim_start_matches('u').split_once('-').unwrap();
            assert!(millis.parse::<i64>().is_ok());
            assert!(seq.parse::<u64>().is_ok());
        }
    }

    #[tokio::test]
    async fn test_sign_in_rejects_foreign_domain() {
        let mut market = open(MemoryPreferences::new()).await;
        let err = market
            .sign_in_with_email("someone@gmail.com", Some("Someone"))
            .await
            .unwrap_err();
        assert!(matches!(err, MarketError::ValidationError { .. }));
        assert!(market.state().user().is_none());
    }

    #[tokio::test]
    async fn test_dark_mode_written_on_toggle() {
        let store = MemoryPreferences::new();
        let mut market = open(store.clone()).await;

        market.dispatch(Action::ToggleDarkMode).await.unwrap();
        assert_eq!(store.get(DARK_MODE_KEY).await.as_deref(), Some("true"));

        market.dispatch(Action::ToggleDarkMode).await.unwrap();
        assert_eq!(store.get(DARK_MODE_KEY).await.as_deref(), Some("false"));
    }

    #[tokio::test]
    async fn test_failed_action_keeps_state() {
        let mut market = open(MemoryPreferences::new()).await;
        let before = market.state().clone();

        let err = market.reserve("i1", RentalDays::default()).await.unwrap_err();
        assert!(matches!(err, MarketError::AuthRequired { .. }));
        assert_eq!(market.state(), &before);
    }

    #[tokio::test]
    async fn test_disabled_assistant_still_answers() {
        let market = open(MemoryPreferences::new()).await;

        let tips = market.safety_tips("i2").await.unwrap();
        assert!(tips.is_fallback());

        let price = market.suggest_price("Formal shoes", 2500).await.unwrap();
        assert_eq!(price.value().price_per_day, 125);

        let outcome = market.smart_search(&ListingFilter::new(), "calculator").await;
        assert_eq!(outcome.listings.len(), 1);
        assert_eq!(outcome.listings[0].id, "i1");
    }

    #[tokio::test]
    async fn test_quote_unknown_listing() {
        let market = open(MemoryPreferences::new()).await;
        assert!(market.quote("missing", RentalDays::default()).is_err());
        assert_eq!(market.quote("i1", RentalDays::new(3).unwrap()).unwrap().grand_total, 720);
    }
}
