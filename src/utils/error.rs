use thiserror::Error;

#[derive(Error, Debug)]
pub enum MarketError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Generative service returned status {status}: {message}")]
    ServiceError { status: u16, message: String },

    #[error("Generative service unavailable: {reason}")]
    ServiceUnavailable { reason: String },

    #[error("Malformed service response: {message}")]
    MalformedResponse { message: String },

    #[error("Configuration error in {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid {field}: {message}")]
    ValidationError { field: String, message: String },

    #[error("Sign-in required to {action}")]
    AuthRequired { action: String },

    #[error("{entity} '{id}' not found")]
    NotFound { entity: &'static str, id: String },

    #[error("Listing '{listing_id}' is not available for rent")]
    ListingUnavailable { listing_id: String },
}

pub type Result<T> = std::result::Result<T, MarketError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    ExternalService,
    UserInput,
    Authorization,
    Configuration,
    Storage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl MarketError {
    pub fn validation(field: &str, message: impl Into<String>) -> Self {
        Self::ValidationError {
            field: field.to_string(),
            message: message.into(),
        }
    }

    pub fn auth_required(action: &str) -> Self {
        Self::AuthRequired {
            action: action.to_string(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::HttpError(_)
            | Self::ServiceError { .. }
            | Self::ServiceUnavailable { .. }
            | Self::MalformedResponse { .. } => ErrorCategory::ExternalService,
            Self::IoError(_) | Self::SerializationError(_) => ErrorCategory::Storage,
            Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => ErrorCategory::Configuration,
            Self::ValidationError { .. }
            | Self::NotFound { .. }
            | Self::ListingUnavailable { .. } => ErrorCategory::UserInput,
            Self::AuthRequired { .. } => ErrorCategory::Authorization,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            // Service failures are always replaced by local defaults.
            ErrorCategory::ExternalService => ErrorSeverity::Low,
            ErrorCategory::UserInput | ErrorCategory::Authorization => ErrorSeverity::Medium,
            ErrorCategory::Storage => ErrorSeverity::High,
            ErrorCategory::Configuration => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::HttpError(_) | Self::ServiceUnavailable { .. } => {
                "Check network access and the assistant endpoint; local defaults are used meanwhile"
            }
            Self::ServiceError { .. } => "Verify the assistant API key and model name",
            Self::MalformedResponse { .. } => "Retry later; the default suggestion was used",
            Self::IoError(_) | Self::SerializationError(_) => {
                "Check that the preferences directory is writable"
            }
            Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => "Fix the configuration file and try again",
            Self::ValidationError { .. } => "Fill in the highlighted field and try again",
            Self::AuthRequired { .. } => "Sign in with your campus e-mail first",
            Self::NotFound { .. } => "Refresh the catalog and pick an existing item",
            Self::ListingUnavailable { .. } => "Pick another item or ask the owner in chat",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::ValidationError { message, .. } => message.clone(),
            Self::AuthRequired { action } => format!("Please sign in to {}.", action),
            Self::NotFound { entity, .. } => format!("That {} no longer exists.", entity),
            Self::ListingUnavailable { .. } => "This item is currently rented out.".to_string(),
            Self::ConfigValidationError { field, message } => {
                format!("Configuration problem in '{}': {}", field, message)
            }
            Self::InvalidConfigValueError { field, reason, .. } => {
                format!("Configuration value '{}' is invalid: {}", field, reason)
            }
            Self::MissingConfigError { field } => {
                format!("Configuration value '{}' is required", field)
            }
            other => other.to_string(),
        }
    }
}
