use crate::adapters::gemini::{DEFAULT_ENDPOINT, DEFAULT_MODEL};
use crate::core::assistant::AssistantSettings;
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{MarketError, Result};
use crate::utils::validation::Validate;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub assistant: AssistantConfig,
    pub preferences: PreferencesConfig,
    pub auth: AuthConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AssistantConfig {
    pub enabled: bool,
    pub endpoint: String,
    pub model: String,
    pub api_key: Option<String>,
    pub campus: String,
    pub description_temperature: f64,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key: None,
            campus: "NIT Raipur".to_string(),
            description_temperature: 0.7,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PreferencesConfig {
    pub path: String,
}

impl Default for PreferencesConfig {
    fn default() -> Self {
        Self {
            path: "./.campus-rent".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    pub email_domain: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            email_domain: "nitrr.ac.in".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl AppConfig {
    /// Loads and parses a TOML file, substituting `${VAR}` references first.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(MarketError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| MarketError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value; unknown variables are left as written.
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| MarketError::ConfigValidationError {
            field: "environment".to_string(),
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        crate::utils::validation::validate_url("assistant.endpoint", &self.assistant.endpoint)?;
        crate::utils::validation::validate_non_empty_string(
            "assistant.model",
            &self.assistant.model,
        )?;
        crate::utils::validation::validate_range(
            "assistant.description_temperature",
            self.assistant.description_temperature,
            0.0,
            2.0,
        )?;
        crate::utils::validation::validate_path("preferences.path", &self.preferences.path)?;
        crate::utils::validation::validate_non_empty_string(
            "auth.email_domain",
            &self.auth.email_domain,
        )?;

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.to_lowercase().as_str()) {
            return Err(MarketError::InvalidConfigValueError {
                field: "logging.level".to_string(),
                value: self.logging.level.clone(),
                reason: format!("Valid levels: {}", valid_levels.join(", ")),
            });
        }

        Ok(())
    }

    pub fn assistant_settings(&self) -> AssistantSettings {
        AssistantSettings {
            campus: self.assistant.campus.clone(),
            description_temperature: self.assistant.description_temperature,
        }
    }
}

impl ConfigProvider for AppConfig {
    fn assistant_endpoint(&self) -> &str {
        &self.assistant.endpoint
    }

    fn assistant_model(&self) -> &str {
        &self.assistant.model
    }

    fn assistant_enabled(&self) -> bool {
        self.assistant.enabled
    }

    fn api_key(&self) -> Option<&str> {
        self.assistant
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty() && !(key.starts_with("${") && key.ends_with('}')))
    }

    fn campus(&self) -> &str {
        &self.assistant.campus
    }

    fn description_temperature(&self) -> f64 {
        self.assistant.description_temperature
    }

    fn preferences_path(&self) -> &str {
        &self.preferences.path
    }

    fn email_domain(&self) -> &str {
        &self.auth.email_domain
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = AppConfig::from_toml_str("").unwrap();
        assert_eq!(config.assistant.model, "gemini-2.5-flash");
        assert_eq!(config.auth.email_domain, "nitrr.ac.in");
        assert!(config.api_key().is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_full_config() {
        let toml_content = r#"
[assistant]
endpoint = "https://llm.example.com"
model = "gemini-2.0-flash"
api_key = "abc123"
campus = "IIT Bhilai"
description_temperature = 0.3

[preferences]
path = "/tmp/campus"

[auth]
email_domain = "iitbhilai.ac.in"

[logging]
level = "debug"
json = true
"#;

        let config = AppConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.assistant_endpoint(), "https://llm.example.com");
        assert_eq!(config.api_key(), Some("abc123"));
        assert_eq!(config.assistant_settings().campus, "IIT Bhilai");
        assert_eq!(config.email_domain(), "iitbhilai.ac.in");
        assert!(config.logging.json);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("CAMPUS_RENT_TEST_KEY", "from-env");

        let config = AppConfig::from_toml_str(
            r#"
[assistant]
api_key = "${CAMPUS_RENT_TEST_KEY}"
"#,
        )
        .unwrap();
        assert_eq!(config.api_key(), Some("from-env"));

        std::env::remove_var("CAMPUS_RENT_TEST_KEY");
    }

    #[test]
    fn test_unresolved_key_and_disabled_flag() {
        let config = AppConfig::from_toml_str(
            r#"
[assistant]
api_key = "${CAMPUS_RENT_SURELY_UNSET_VAR}"
"#,
        )
        .unwrap();
        assert!(config.api_key().is_none());

        let config = AppConfig::from_toml_str(
            r#"
[assistant]
enabled = false
api_key = "abc"
"#,
        )
        .unwrap();
        assert!(!config.assistant_enabled());
        assert_eq!(config.api_key(), Some("abc"));
    }

    #[test]
    fn test_config_validation() {
        let config = AppConfig::from_toml_str(
            r#"
[assistant]
endpoint = "invalid-url"
"#,
        )
        .unwrap();
        assert!(config.validate().is_err());

        let config = AppConfig::from_toml_str(
            r#"
[assistant]
description_temperature = 3.5
"#,
        )
        .unwrap();
        assert!(config.validate().is_err());

        let config = AppConfig::from_toml_str(
            r#"
[logging]
level = "loud"
"#,
        )
        .unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[preferences]\npath = \"./prefs\"\n")
            .unwrap();

        let config = AppConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.preferences_path(), "./prefs");
    }
}
