//! Configuration: the card options set by the dashboard, and the TOML file
//! read by the preview CLI.

use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;
use tracing_subscriber::filter::LevelFilter;

pub const DEFAULT_ENTITY: &str = "sensor.veronika_cleaning_plan";
pub const DEFAULT_TITLE: &str = "Cleaning Plan";
pub const DEFAULT_SERVICE_DOMAIN: &str = "veronika";

/// Options the dashboard passes to the card.
///
/// The dashboard validates its own schema, so parsing here never fails:
/// unknown keys are ignored, and keys of the wrong type fall back to their
/// defaults.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CardConfig {
    entity: Option<String>,
    title: Option<String>,
    service_domain: Option<String>,
}

impl CardConfig {
    pub fn from_value(options: serde_json::Value) -> Self {
        let field = |key: &str| {
            options
                .get(key)
                .and_then(|v| v.as_str())
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };

        Self {
            entity: field("entity"),
            title: field("title"),
            service_domain: field("service_domain"),
        }
    }

    /// Entity id of the plan sensor.
    pub fn entity(&self) -> &str {
        self.entity.as_deref().unwrap_or(DEFAULT_ENTITY)
    }

    /// Card header.
    pub fn title(&self) -> &str {
        self.title.as_deref().unwrap_or(DEFAULT_TITLE)
    }

    /// Domain the start/stop services live in.
    pub fn service_domain(&self) -> &str {
        self.service_domain
            .as_deref()
            .unwrap_or(DEFAULT_SERVICE_DOMAIN)
    }
}

#[derive(
    Debug, Default, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => LevelFilter::TRACE,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Error => LevelFilter::ERROR,
        }
    }
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default)]
    pub level: LogLevel,
}

/// Configuration file for the preview CLI.
#[derive(Debug, Default, Deserialize)]
pub struct PreviewConfig {
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Card options, exactly as they would appear in a dashboard definition.
    #[serde(default)]
    pub card: toml::Table,
}

impl PreviewConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::Io(path.as_ref().to_path_buf(), e))?;

        toml::from_str(&contents).map_err(ConfigError::Parse)
    }

    /// Convert the `[card]` table to the JSON options the card consumes
    pub fn card_options(&self) -> Result<serde_json::Value, ConfigError> {
        let json_str = serde_json::to_string(&self.card).map_err(ConfigError::JsonConversion)?;

        serde_json::from_str(&json_str).map_err(ConfigError::JsonConversion)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {0}: {1}")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to convert config to JSON: {0}")]
    JsonConversion(#[source] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_card_defaults() {
        let config = CardConfig::from_value(json!({"type": "custom:veronika-plan-card"}));
        assert_eq!(config.entity(), DEFAULT_ENTITY);
        assert_eq!(config.title(), "Cleaning Plan");
        assert_eq!(config.service_domain(), "veronika");
    }

    #[test]
    fn test_card_overrides() {
        let config = CardConfig::from_value(json!({
            "entity": "sensor.upstairs_plan",
            "title": "Upstairs",
            "service_domain": "cleaner"
        }));
        assert_eq!(config.entity(), "sensor.upstairs_plan");
        assert_eq!(config.title(), "Upstairs");
        assert_eq!(config.service_domain(), "cleaner");
    }

    #[test]
    fn test_card_garbage_is_accepted() {
        let config = CardConfig::from_value(json!({"entity": 7, "title": ""}));
        assert_eq!(config.entity(), DEFAULT_ENTITY);
        assert_eq!(config.title(), DEFAULT_TITLE);

        let config = CardConfig::from_value(json!("not even an object"));
        assert_eq!(config.entity(), DEFAULT_ENTITY);
    }

    #[test]
    fn test_parse_preview_config() {
        let toml = r#"
            [logging]
            level = "debug"

            [card]
            entity = "sensor.plan"
            title = "Downstairs"
        "#;

        let config: PreviewConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.logging.level, LogLevel::Debug);

        let card = CardConfig::from_value(config.card_options().unwrap());
        assert_eq!(card.entity(), "sensor.plan");
        assert_eq!(card.title(), "Downstairs");
    }

    #[test]
    fn test_preview_config_from_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("preview.toml");
        std::fs::write(&path, "[card]\nentity = \"sensor.plan\"\n").unwrap();

        let config = PreviewConfig::from_file(&path).unwrap();
        assert_eq!(config.logging.level, LogLevel::Info);
        assert_eq!(config.card_options().unwrap(), json!({"entity": "sensor.plan"}));
    }

    #[test]
    fn test_preview_config_missing_file() {
        let err = PreviewConfig::from_file("/nonexistent/preview.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(..)));
    }
}
