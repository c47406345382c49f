//! Session state and its transitions.
//!
//! Every change goes through [`AppState::apply`], which leaves `self` untouched and
//! returns the next state, so a failed action never leaves a half-applied session.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use std::collections::HashMap;

use crate::core::catalog::Catalog;
use crate::core::pricing::{Quote, RentalDays};
use crate::domain::model::{
    Listing, ListingDraft, Message, OwnerProfile, RentalRequest, RentalStatus, User,
};
use crate::utils::error::{MarketError, Result};
use crate::utils::validation::require_text;

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    SignIn(User),
    SignOut,
    AddListing(ListingDraft),
    Reserve { listing_id: String, days: RentalDays },
    SendMessage { listing_id: String, text: String },
    ToggleDarkMode,
}

impl Action {
    /// Whether the action touches state that is persisted between sessions.
    pub fn changes_preferences(&self) -> bool {
        matches!(
            self,
            Action::SignIn(_) | Action::SignOut | Action::ToggleDarkMode
        )
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ProfileStats {
    pub listed_items: usize,
    pub active_rentals: usize,
    pub total_earned: u64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppState {
    user: Option<User>,
    users: HashMap<String, User>,
    catalog: Catalog,
    rentals: Vec<RentalRequest>,
    messages: Vec<Message>,
    dark_mode: bool,
    sequence: u64,
}

impl AppState {
    pub fn new(catalog: Vec<Listing>, users: Vec<User>) -> Self {
        Self {
            catalog: Catalog::new(catalog),
            users: users.into_iter().map(|u| (u.id.clone(), u)).collect(),
            ..Default::default()
        }
    }

    /// Restores the persisted parts of a previous session.
    pub fn with_preferences(mut self, user: Option<User>, dark_mode: bool) -> Self {
        if let Some(user) = &user {
            self.users.insert(user.id.clone(), user.clone());
        }
        self.user = user;
        self.dark_mode = dark_mode;
        self
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn dark_mode(&self) -> bool {
        self.dark_mode
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn listings(&self) -> &[Listing] {
        self.catalog.listings()
    }

    pub fn listing(&self, id: &str) -> Option<&Listing> {
        self.catalog.get(id)
    }

    pub fn rentals(&self) -> &[RentalRequest] {
        &self.rentals
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn owner_profile(&self, listing: &Listing) -> OwnerProfile {
        self.users
            .get(&listing.owner_id)
            .map(OwnerProfile::from)
            .unwrap_or_else(|| OwnerProfile::unknown(&listing.owner_id))
    }

    pub fn messages_for<'a>(
        &'a self,
        listing_id: &'a str,
    ) -> impl Iterator<Item = &'a Message> + 'a {
        self.messages.iter().filter(move |m| m.listing_id == listing_id)
    }

    pub fn rentals_for<'a>(
        &'a self,
        borrower_id: &'a str,
    ) -> impl Iterator<Item = &'a RentalRequest> + 'a {
        self.rentals.iter().filter(move |r| r.borrower_id == borrower_id)
    }

    pub fn listings_owned_by<'a>(
        &'a self,
        owner_id: &'a str,
    ) -> impl Iterator<Item = &'a Listing> + 'a {
        self.catalog.owned_by(owner_id)
    }

    /// Dashboard numbers for the signed-in user, `None` when signed out.
    pub fn profile_stats(&self) -> Option<ProfileStats> {
        let user = self.user.as_ref()?;
        let mine: Vec<&str> = self
            .listings_owned_by(&user.id)
            .map(|l| l.id.as_str())
            .collect();

        let total_earned = self
            .rentals
            .iter()
            .filter(|r| {
                r.status == RentalStatus::Completed && mine.contains(&r.listing_id.as_str())
            })
            .map(|r| r.total_price)
            .sum();

        Some(ProfileStats {
            listed_items: mine.len(),
            active_rentals: self
                .rentals_for(&user.id)
                .filter(|r| r.status == RentalStatus::Active)
                .count(),
            total_earned,
        })
    }

    pub fn apply(&self, action: Action, now: DateTime<Utc>) -> Result<AppState> {
        match action {
            Action::SignIn(user) => Ok(self.sign_in(user)),
            Action::SignOut => Ok(Self {
                user: None,
                ..self.clone()
            }),
            Action::ToggleDarkMode => Ok(Self {
                dark_mode: !self.dark_mode,
                ..self.clone()
            }),
            Action::AddListing(draft) => self.add_listing(draft, now),
            Action::Reserve { listing_id, days } => self.reserve(&listing_id, days, now),
            Action::SendMessage { listing_id, text } => self.send_message(&listing_id, text, now),
        }
    }

    fn sign_in(&self, user: User) -> AppState {
        let mut next = self.clone();
        next.users.insert(user.id.clone(), user.clone());
        next.user = Some(user);
        next
    }

    fn require_user(&self, action: &str) -> Result<&User> {
        self.user
            .as_ref()
            .ok_or_else(|| MarketError::auth_required(action))
    }

    fn require_listing(&self, listing_id: &str) -> Result<&Listing> {
        self.catalog.get(listing_id).ok_or_else(|| MarketError::NotFound {
            entity: "listing",
            id: listing_id.to_string(),
        })
    }

    /// `<prefix><unix-millis>-<sequence>`; the sequence keeps ids unique within a millisecond.
    pub(crate) fn next_id(&mut self, prefix: char, now: DateTime<Utc>) -> String {
        self.sequence += 1;
        format!("{}{}-{}", prefix, now.timestamp_millis(), self.sequence)
    }

    fn add_listing(&self, draft: ListingDraft, now: DateTime<Utc>) -> Result<AppState> {
        let owner_id = self.require_user("list an item")?.id.clone();
        require_text("title", &draft.title, "Please enter a title for the item.")?;

        let mut next = self.clone();
        let id = next.next_id('i', now);
        let listing = draft.publish(id, owner_id);
        tracing::debug!("Publishing listing {} ({})", listing.id, listing.title);
        next.catalog = next.catalog.with_listing(listing);
        Ok(next)
    }

    fn reserve(&self, listing_id: &str, days: RentalDays, now: DateTime<Utc>) -> Result<AppState> {
        let borrower_id = self.require_user("reserve an item")?.id.clone();
        let listing = self.require_listing(listing_id)?;
        if !listing.is_available {
            return Err(MarketError::ListingUnavailable {
                listing_id: listing_id.to_string(),
            });
        }

        let end_date = Duration::try_days(i64::from(days.get()))
            .and_then(|span| now.checked_add_signed(span))
            .ok_or_else(|| {
                MarketError::validation(
                    "days",
                    format!(
                        "A rental of {} days runs past the supported calendar.",
                        days.get()
                    ),
                )
            })?;

        let quote = Quote::for_listing(listing, days);
        let mut next = self.clone();
        let rental = RentalRequest {
            id: next.next_id('t', now),
            listing_id: listing_id.to_string(),
            borrower_id,
            start_date: now,
            end_date,
            total_price: quote.grand_total,
            status: RentalStatus::Pending,
        };
        tracing::info!(
            "Rental request {} for {} ({} days, total {})",
            rental.id,
            listing_id,
            quote.days,
            quote.grand_total
        );
        next.rentals.push(rental);
        Ok(next)
    }

    fn send_message(&self, listing_id: &str, text: String, now: DateTime<Utc>) -> Result<AppState> {
        let sender_id = self.require_user("chat with the owner")?.id.clone();
        self.require_listing(listing_id)?;
        if text.trim().is_empty() {
            return Ok(self.clone());
        }

        let mut next = self.clone();
        let message = Message {
            id: next.next_id('m', now),
            listing_id: listing_id.to_string(),
            sender_id,
            text,
            timestamp: now,
        };
        next.messages.push(message);
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::seed::{demo_catalog, demo_users};

    fn signed_in() -> AppState {
        let users = demo_users();
        let me = users[0].clone();
        AppState::new(demo_catalog(), users)
            .apply(Action::SignIn(me), Utc::now())
            .unwrap()
    }

    #[test]
    fn test_reserve_creates_pending_rental() {
        let now = Utc::now();
        let state = signed_in();
        let next = state
            .apply(
                Action::Reserve {
                    listing_id: "i1".to_string(),
                    days: RentalDays::new(3).unwrap(),
                },
                now,
            )
            .unwrap();

        assert!(state.rentals().is_empty());
        let rental = &next.rentals()[0];
        assert_eq!(rental.status, RentalStatus::Pending);
        assert_eq!(rental.total_price, 720);
        assert_eq!(rental.borrower_id, "u1");
        assert_eq!(rental.end_date - rental.start_date, Duration::days(3));
        // availability is left as it was
        assert!(next.listing("i1").unwrap().is_available);
    }

    #[test]
    fn test_reserve_requires_sign_in() {
        let state = AppState::new(demo_catalog(), demo_users());
        let err = state
            .apply(
                Action::Reserve {
                    listing_id: "i1".to_string(),
                    days: RentalDays::default(),
                },
                Utc::now(),
            )
            .unwrap_err();
        assert!(matches!(err, MarketError::AuthRequired { .. }));
    }

    #[test]
    fn test_reserve_rejects_unavailable_and_unknown_listing() {
        let state = signed_in();
        let reserve = |id: &str| Action::Reserve {
            listing_id: id.to_string(),
            days: RentalDays::default(),
        };
        assert!(matches!(
            state.apply(reserve("i4"), Utc::now()),
            Err(MarketError::ListingUnavailable { .. })
        ));
        assert!(matches!(
            state.apply(reserve("nope"), Utc::now()),
            Err(MarketError::NotFound { .. })
        ));
    }

    #[test]
    fn test_reserve_rejects_day_count_past_calendar_end() {
        let state = signed_in();
        let err = state
            .apply(
                Action::Reserve {
                    listing_id: "i1".to_string(),
                    days: RentalDays::new(200_000_000).unwrap(),
                },
                Utc::now(),
            )
            .unwrap_err();
        assert!(matches!(err, MarketError::ValidationError { .. }));
        assert!(state.rentals().is_empty());

        let far = state.apply(
            Action::Reserve {
                listing_id: "i1".to_string(),
                days: RentalDays::new(u32::MAX).unwrap(),
            },
            Utc::now(),
        );
        assert!(far.is_err());
    }

    #[test]
    fn test_blank_message_is_noop() {
        let state = signed_in();
        let next = state
            .apply(
                Action::SendMessage {
                    listing_id: "i2".to_string(),
                    text: " \t\n".to_string(),
                },
                Utc::now(),
            )
            .unwrap();
        assert_eq!(next, state);
        assert!(next.messages().is_empty());
    }

    #[test]
    fn test_messages_are_scoped_to_listing() {
        let now = Utc::now();
        let state = signed_in()
            .apply(
                Action::SendMessage {
                    listing_id: "i2".to_string(),
                    text: "Is it size 9 UK?".to_string(),
                },
                now,
            )
            .unwrap()
            .apply(
                Action::SendMessage {
                    listing_id: "i3".to_string(),
                    text: "Free tomorrow?".to_string(),
                },
                now,
            )
            .unwrap();

        let for_shoes: Vec<&Message> = state.messages_for("i2").collect();
        assert_eq!(for_shoes.len(), 1);
        assert_eq!(for_shoes[0].sender_id, "u1");
        assert_ne!(state.messages()[0].id, state.messages()[1].id);
    }

    #[test]
    fn test_add_listing_goes_first_and_is_owned_by_user() {
        let state = signed_in();
        let draft = ListingDraft {
            title: "Arduino Uno kit".to_string(),
            price_per_day: 60,
            original_price: 1500,
            ..Default::default()
        };
        let next = state.apply(Action::AddListing(draft), Utc::now()).unwrap();

        let first = &next.listings()[0];
        assert_eq!(first.title, "Arduino Uno kit");
        assert_eq!(first.owner_id, "u1");
        assert!(first.is_available);
        assert_eq!(next.owner_profile(first).name, "Arjun Mehta");
    }

    #[test]
    fn test_add_listing_requires_title() {
        let state = signed_in();
        let err = state
            .apply(Action::AddListing(ListingDraft::default()), Utc::now())
            .unwrap_err();
        assert!(matches!(err, MarketError::ValidationError { .. }));
    }

    #[test]
    fn test_unknown_owner_profile() {
        let state = AppState::new(demo_catalog(), vec![]);
        let listing = state.listing("i1").unwrap();
        let owner = state.owner_profile(listing);
        assert_eq!(owner.name, "Campus Student");
        assert_eq!(owner.rating, 4.5);
    }

    #[test]
    fn test_profile_stats() {
        let users = demo_users();
        let sneha = users[1].clone();
        let mut state = AppState::new(demo_catalog(), users)
            .apply(Action::SignIn(sneha), Utc::now())
            .unwrap();
        state.rentals.push(RentalRequest {
            id: "t1".to_string(),
            listing_id: "i1".to_string(),
            borrower_id: "u3".to_string(),
            start_date: Utc::now(),
            end_date: Utc::now(),
            total_price: 720,
            status: RentalStatus::Completed,
        });

        let stats = state.profile_stats().unwrap();
        assert_eq!(stats.listed_items, 3);
        assert_eq!(stats.total_earned, 720);
        assert_eq!(stats.active_rentals, 0);
    }

    #[test]
    fn test_toggle_dark_mode_and_sign_out() {
        let state = signed_in();
        let next = state
            .apply(Action::ToggleDarkMode, Utc::now())
            .unwrap()
            .apply(Action::SignOut, Utc::now())
            .unwrap();
        assert!(next.dark_mode());
        assert!(next.user().is_none());
        assert!(next.profile_stats().is_none());
    }
}
