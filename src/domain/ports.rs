use crate::utils::error::Result;
use async_trait::async_trait;

/// One call to the generative-text service.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub system_instruction: String,
    pub prompt: String,
    pub temperature: Option<f64>,
    /// When set the service is asked for JSON matching this schema.
    pub response_schema: Option<serde_json::Value>,
}

#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Single attempt, no retry. Errors are turned into fallbacks by the caller.
    async fn generate(&self, request: &GenerationRequest) -> Result<String>;

    fn name(&self) -> &'static str;
}

/// Key/value store for the few preferences that outlive a session.
pub trait PreferenceStore: Send + Sync {
    fn load(&self, key: &str) -> impl std::future::Future<Output = Result<Option<String>>> + Send;
    fn save(&self, key: &str, value: &str) -> impl std::future::Future<Output = Result<()>> + Send;
    fn remove(&self, key: &str) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn assistant_endpoint(&self) -> &str;
    fn assistant_model(&self) -> &str;
    fn assistant_enabled(&self) -> bool;
    /// `None` when no usable key is configured.
    fn api_key(&self) -> Option<&str>;
    fn campus(&self) -> &str;
    fn description_temperature(&self) -> f64;
    fn preferences_path(&self) -> &str;
    fn email_domain(&self) -> &str;
}
