//! Listing helpers backed by the generative-text service.
//!
//! The service is optional: any transport error, bad status, empty text or
//! response that does not fit the expected schema becomes a
//! [`Suggestion::Fallback`] carrying a fixed local default.

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::core::pricing;
use crate::domain::model::{Category, Condition, Listing, SearchCandidate};
use crate::domain::ports::{GenerationRequest, TextGenerator};
use crate::utils::error::{MarketError, Result};
use crate::utils::validation::require_text;

pub const DESCRIPTION_ON_ERROR: &str = "Great item for students!";
pub const DESCRIPTION_ON_EMPTY: &str = "Could not generate description.";
pub const PRICE_FALLBACK_REASONING: &str = "Standard 5% of value estimation.";
pub const DEFAULT_SAFETY_TIPS: [&str; 3] = [
    "Inspect item before handover.",
    "Meet in a public pickup zone.",
    "Verify student ID.",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "source", content = "value", rename_all = "snake_case")]
pub enum Suggestion<T> {
    Generated(T),
    Fallback(T),
}

impl<T> Suggestion<T> {
    pub fn value(&self) -> &T {
        match self {
            Suggestion::Generated(v) | Suggestion::Fallback(v) => v,
        }
    }

    pub fn into_inner(self) -> T {
        match self {
            Suggestion::Generated(v) | Suggestion::Fallback(v) => v,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Suggestion::Fallback(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PriceSuggestion {
    pub price_per_day: u64,
    pub reasoning: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AssistantSettings {
    pub campus: String,
    pub description_temperature: f64,
}

impl Default for AssistantSettings {
    fn default() -> Self {
        Self {
            campus: "NIT Raipur".to_string(),
            description_temperature: 0.7,
        }
    }
}

#[derive(Deserialize)]
struct PriceReply {
    price: f64,
    reasoning: String,
}

#[derive(Deserialize)]
struct SearchReply {
    #[serde(rename = "matchIds", default)]
    match_ids: Vec<String>,
}

#[derive(Deserialize)]
struct SafetyReply {
    tips: Vec<String>,
}

fn malformed(message: impl Into<String>) -> MarketError {
    MarketError::MalformedResponse {
        message: message.into(),
    }
}

fn parse_price(text: &str) -> Result<PriceSuggestion> {
    let reply: PriceReply = serde_json::from_str(text)?;
    if !reply.price.is_finite() || reply.price < 0.0 {
        return Err(malformed(format!("price out of range: {}", reply.price)));
    }
    Ok(PriceSuggestion {
        price_per_day: reply.price.round() as u64,
        reasoning: reply.reasoning,
    })
}

fn parse_match_ids(text: &str) -> Result<Vec<String>> {
    let reply: SearchReply = serde_json::from_str(text)?;
    Ok(reply.match_ids)
}

fn parse_tips(text: &str) -> Result<Vec<String>> {
    let reply: SafetyReply = serde_json::from_str(text)?;
    let tips: Vec<String> = reply
        .tips
        .into_iter()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect();
    if tips.is_empty() {
        return Err(malformed("no safety tips"));
    }
    Ok(tips)
}

fn default_tips() -> Vec<String> {
    DEFAULT_SAFETY_TIPS.iter().map(|t| t.to_string()).collect()
}

pub struct Assistant<G: TextGenerator> {
    generator: G,
    settings: AssistantSettings,
}

impl<G: TextGenerator> Assistant<G> {
    pub fn new(generator: G, settings: AssistantSettings) -> Self {
        Self {
            generator,
            settings,
        }
    }

    pub fn settings(&self) -> &AssistantSettings {
        &self.settings
    }

    fn system_instruction(&self) -> String {
        format!(
            "You are an intelligent assistant for \"Campus P2P Renting\", \
             a dedicated peer-to-peer marketplace for {campus} students.\n\
             Your goal is to help students rent items efficiently, write better descriptions, \
             and ensure fair pricing in Indian Rupee (INR).\n\
             You are friendly, concise, and safety-conscious.",
            campus = self.settings.campus
        )
    }

    fn request(&self, prompt: String, schema: Option<serde_json::Value>) -> GenerationRequest {
        GenerationRequest {
            system_instruction: self.system_instruction(),
            prompt,
            temperature: None,
            response_schema: schema,
        }
    }

    /// Runs one request and hands non-empty text to `parse`; everything else yields `Err`.
    async fn ask<T>(
        &self,
        request: &GenerationRequest,
        parse: impl FnOnce(&str) -> Result<T>,
    ) -> Result<T> {
        tracing::debug!("Calling {} generator", self.generator.name());
        let text = self.generator.generate(request).await?;
        if text.trim().is_empty() {
            return Err(malformed("empty response"));
        }
        parse(&text)
    }

    /// Short listing description. Requires a title.
    pub async fn suggest_description(
        &self,
        title: &str,
        category: Category,
        condition: Condition,
    ) -> Result<Suggestion<String>> {
        require_text("title", title, "Please enter a title first.")?;

        let mut request = self.request(
            format!(
                "Write a short, appealing description (max 50 words) for a rental item.\n\
                 Item: {}\nCategory: {}\nCondition: {}\n\
                 Target Audience: Students at {}, India.",
                title.trim(),
                category,
                condition,
                self.settings.campus
            ),
            None,
        );
        request.temperature = Some(self.settings.description_temperature);

        match self.generator.generate(&request).await {
            Ok(text) if !text.trim().is_empty() => {
                Ok(Suggestion::Generated(text.trim().to_string()))
            }
            Ok(_) => {
                tracing::warn!("Description suggestion came back empty");
                Ok(Suggestion::Fallback(DESCRIPTION_ON_EMPTY.to_string()))
            }
            Err(e) => {
                tracing::warn!("Error generating description: {}", e);
                Ok(Suggestion::Fallback(DESCRIPTION_ON_ERROR.to_string()))
            }
        }
    }

    /// Daily price for an item worth `original_price`. Requires a title and a non-zero value.
    pub async fn suggest_price(
        &self,
        title: &str,
        original_price: u64,
    ) -> Result<Suggestion<PriceSuggestion>> {
        require_text("title", title, "Please enter title and original price.")?;
        if original_price == 0 {
            return Err(MarketError::validation(
                "original_price",
                "Please enter title and original price.",
            ));
        }

        let request = self.request(
            format!(
                "Suggest a daily rental price in INR (₹) for: {} which costs ₹{} new (MRP).\n\
                 The context is the {} campus (peer-to-peer). \
                 Price should be affordable for students but fair for the lender.\n\
                 Return JSON only.",
                title.trim(),
                original_price,
                self.settings.campus
            ),
            Some(json!({
                "type": "OBJECT",
                "properties": {
                    "price": {
                        "type": "NUMBER",
                        "description": "Suggested daily rental price in INR"
                    },
                    "reasoning": {
                        "type": "STRING",
                        "description": "Short explanation for the price"
                    }
                },
                "required": ["price", "reasoning"]
            })),
        );

        match self.ask(&request, parse_price).await {
            Ok(suggestion) => Ok(Suggestion::Generated(suggestion)),
            Err(e) => {
                tracing::warn!("Error suggesting price: {}", e);
                Ok(Suggestion::Fallback(PriceSuggestion {
                    price_per_day: pricing::fallback_daily_price(original_price),
                    reasoning: PRICE_FALLBACK_REASONING.to_string(),
                }))
            }
        }
    }

    /// Ids of the candidates that match the intent of `query`. Never fails; the fallback is empty.
    pub async fn match_listings(
        &self,
        query: &str,
        candidates: &[SearchCandidate<'_>],
    ) -> Suggestion<Vec<String>> {
        let items = match serde_json::to_string(candidates) {
            Ok(items) => items,
            Err(e) => {
                tracing::warn!("Could not encode search candidates: {}", e);
                return Suggestion::Fallback(Vec::new());
            }
        };

        let request = self.request(
            format!(
                "User Query: \"{}\"\nAvailable Items: {}\n\n\
                 Return a JSON object containing an array of item IDs \
                 that match the user's intent.\n\
                 Even if the words don't match exactly (e.g., \"fix bike\" -> \"cycle pump\"), \
                 make the connection.",
                query, items
            ),
            Some(json!({
                "type": "OBJECT",
                "properties": {
                    "matchIds": { "type": "ARRAY", "items": { "type": "STRING" } }
                }
            })),
        );

        match self.ask(&request, parse_match_ids).await {
            Ok(ids) => Suggestion::Generated(ids),
            Err(e) => {
                tracing::warn!("Smart search failed: {}", e);
                Suggestion::Fallback(Vec::new())
            }
        }
    }

    /// Three short safety tips for renting `listing`. Never fails.
    pub async fn safety_tips(&self, listing: &Listing) -> Suggestion<Vec<String>> {
        let request = self.request(
            format!(
                "Give 3 short safety tips for renting out or borrowing a \"{}\" ({}) \
                 in an Indian college campus context like {}.\n\
                 Include a tip about the refundable security deposit.",
                listing.title, listing.category, self.settings.campus
            ),
            Some(json!({
                "type": "OBJECT",
                "properties": {
                    "tips": { "type": "ARRAY", "items": { "type": "STRING" } }
                }
            })),
        );

        match self.ask(&request, parse_tips).await {
            Ok(tips) => Suggestion::Generated(tips),
            Err(e) => {
                tracing::warn!("Safety tips unavailable: {}", e);
                Suggestion::Fallback(default_tips())
            }
        }
    }
}
