use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::core::pricing;
use crate::utils::error::MarketError;

pub const PLACEHOLDER_IMAGE_URL: &str = "https://via.placeholder.com/400x300?text=No+Image";
const AVATAR_BASE_URL: &str = "https://api.dicebear.com/7.x/avataaars/svg?seed=";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Electronics")]
    Electronics,
    #[serde(rename = "Books")]
    Books,
    #[serde(rename = "Clothing & Shoes")]
    Clothing,
    #[serde(rename = "Sports & Fitness")]
    Sports,
    #[serde(rename = "Lab Equipment")]
    LabEquipment,
    #[serde(rename = "Others")]
    Others,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Electronics,
        Category::Books,
        Category::Clothing,
        Category::Sports,
        Category::LabEquipment,
        Category::Others,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Category::Electronics => "Electronics",
            Category::Books => "Books",
            Category::Clothing => "Clothing & Shoes",
            Category::Sports => "Sports & Fitness",
            Category::LabEquipment => "Lab Equipment",
            Category::Others => "Others",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Category {
    type Err = MarketError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| MarketError::validation("category", format!("Unknown category: {}", s)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Condition {
    #[serde(rename = "New")]
    New,
    #[serde(rename = "Like New")]
    LikeNew,
    #[serde(rename = "Good")]
    Good,
    #[serde(rename = "Fair")]
    Fair,
}

impl Condition {
    pub const ALL: [Condition; 4] = [
        Condition::New,
        Condition::LikeNew,
        Condition::Good,
        Condition::Fair,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Condition::New => "New",
            Condition::LikeNew => "Like New",
            Condition::Good => "Good",
            Condition::Fair => "Fair",
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Condition {
    type Err = MarketError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Condition::ALL
            .into_iter()
            .find(|c| c.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                MarketError::validation("condition", format!("Unknown condition: {}", s))
            })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub avatar: String,
    pub is_verified: bool,
    pub rating: f32,
}

impl User {
    /// Builds the local mock account for a campus address; the caller validates the domain.
    pub fn mock_account(id: String, email: &str, name: Option<&str>) -> Self {
        let email = email.trim().to_string();
        let name = match name.map(str::trim) {
            Some(n) if !n.is_empty() => n.to_string(),
            _ => email.split('@').next().unwrap_or_default().to_string(),
        };

        Self {
            id,
            avatar: format!("{}{}", AVATAR_BASE_URL, email),
            name,
            email,
            is_verified: true,
            rating: 5.0,
        }
    }
}

/// Public face of a listing owner.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OwnerProfile {
    pub name: String,
    pub avatar: String,
    pub rating: f32,
    pub is_verified: bool,
}

impl OwnerProfile {
    pub fn unknown(owner_id: &str) -> Self {
        Self {
            name: "Campus Student".to_string(),
            avatar: format!("{}{}", AVATAR_BASE_URL, owner_id),
            rating: 4.5,
            is_verified: false,
        }
    }
}

impl From<&User> for OwnerProfile {
    fn from(user: &User) -> Self {
        Self {
            name: user.name.clone(),
            avatar: user.avatar.clone(),
            rating: user.rating,
            is_verified: user.is_verified,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    pub id: String,
    pub owner_id: String,
    pub title: String,
    pub description: String,
    pub category: Category,
    pub price_per_day: u64,
    pub original_price: u64,
    pub image_url: String,
    pub is_available: bool,
    pub location: String,
    pub condition: Condition,
}

impl Listing {
    pub fn security_deposit(&self) -> u64 {
        pricing::security_deposit(self.original_price)
    }
}

/// The add-item form before it is published.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListingDraft {
    pub title: String,
    pub description: String,
    pub category: Category,
    pub condition: Condition,
    pub price_per_day: u64,
    pub original_price: u64,
    pub location: String,
    pub image_url: Option<String>,
}

impl Default for ListingDraft {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            category: Category::Others,
            condition: Condition::Good,
            price_per_day: 0,
            original_price: 0,
            location: String::new(),
            image_url: None,
        }
    }
}

impl ListingDraft {
    pub fn publish(self, id: String, owner_id: String) -> Listing {
        Listing {
            id,
            owner_id,
            title: self.title.trim().to_string(),
            description: self.description,
            category: self.category,
            price_per_day: self.price_per_day,
            original_price: self.original_price,
            image_url: self
                .image_url
                .filter(|url| !url.trim().is_empty())
                .unwrap_or_else(|| PLACEHOLDER_IMAGE_URL.to_string()),
            is_available: true,
            location: self.location,
            condition: self.condition,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RentalStatus {
    Pending,
    Active,
    Completed,
    Disputed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RentalRequest {
    pub id: String,
    #[serde(rename = "itemId")]
    pub listing_id: String,
    pub borrower_id: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub total_price: u64,
    pub status: RentalStatus,
}

impl RentalRequest {
    pub fn is_due_soon(&self, now: DateTime<Utc>) -> bool {
        self.end_date - now < Duration::days(1)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    #[serde(rename = "itemId")]
    pub listing_id: String,
    pub sender_id: String,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

/// Trimmed-down listing sent to the semantic search service.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchCandidate<'a> {
    pub id: &'a str,
    pub title: &'a str,
    #[serde(rename = "desc")]
    pub description: &'a str,
    #[serde(rename = "cat")]
    pub category: &'static str,
}

impl<'a> From<&'a Listing> for SearchCandidate<'a> {
    fn from(listing: &'a Listing) -> Self {
        Self {
            id: &listing.id,
            title: &listing.title,
            description: &listing.description,
            category: listing.category.label(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_serializes_as_label() {
        let json = serde_json::to_string(&Category::Clothing).unwrap();
        assert_eq!(json, "\"Clothing & Shoes\"");
        assert_eq!("lab equipment".parse::<Category>().unwrap(), Category::LabEquipment);
        assert!("Furniture".parse::<Category>().is_err());
    }

    #[test]
    fn test_condition_round_trips_through_label() {
        for condition in Condition::ALL {
            assert_eq!(condition.label().parse::<Condition>().unwrap(), condition);
        }
    }

    #[test]
    fn test_mock_account_defaults_name_to_local_part() {
        let user = User::mock_account("u9".to_string(), "rollno42@nitrr.ac.in", Some("  "));
        assert_eq!(user.name, "rollno42");
        assert!(user.is_verified);
        assert_eq!(user.rating, 5.0);
        assert!(user.avatar.ends_with("rollno42@nitrr.ac.in"));
    }

    #[test]
    fn test_draft_publish_uses_placeholder_image() {
        let draft = ListingDraft {
            title: "  Drafting kit ".to_string(),
            price_per_day: 20,
            original_price: 900,
            ..Default::default()
        };
        let listing = draft.publish("i1".to_string(), "u1".to_string());
        assert_eq!(listing.title, "Drafting kit");
        assert_eq!(listing.image_url, PLACEHOLDER_IMAGE_URL);
        assert!(listing.is_available);
        assert_eq!(listing.category, Category::Others);
        assert_eq!(listing.security_deposit(), 450);
    }

    #[test]
    fn test_rental_status_wire_format() {
        let json = serde_json::to_string(&RentalStatus::Pending).unwrap();
        assert_eq!(json, "\"PENDING\"");
    }

    #[test]
    fn test_due_soon_inside_last_day() {
        let start = Utc::now();
        let rental = RentalRequest {
            id: "t1".to_string(),
            listing_id: "i1".to_string(),
            borrower_id: "u1".to_string(),
            start_date: start,
            end_date: start + Duration::days(2),
            total_price: 100,
            status: RentalStatus::Pending,
        };
        assert!(!rental.is_due_soon(start));
        assert!(rental.is_due_soon(start + Duration::hours(30)));
    }

    #[test]
    fn test_search_candidate_uses_compact_keys() {
        let listing = ListingDraft {
            title: "Cycle pump".to_string(),
            description: "Floor pump".to_string(),
            category: Category::Sports,
            ..Default::default()
        }
        .publish("i7".to_string(), "u2".to_string());

        let value = serde_json::to_value(SearchCandidate::from(&listing)).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "id": "i7",
                "title": "Cycle pump",
                "desc": "Floor pump",
                "cat": "Sports & Fitness"
            })
        );
    }
}
