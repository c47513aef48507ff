//! Settings for a `MockRest` instance.

use serde::Deserialize;

/// Environment variable that switches exchange logging off.
pub const LOG_EXCHANGES_ENV: &str = "MOCK_REST_LOG_EXCHANGES";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct MockRestConfig {
    /// Log every request/response pair after dispatch.
    pub log_exchanges: bool,
}

impl Default for MockRestConfig {
    fn default() -> Self {
        Self {
            log_exchanges: true,
        }
    }
}

impl MockRestConfig {
    /// Defaults, overridden by `MOCK_REST_LOG_EXCHANGES` when it is set.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(value) = std::env::var(LOG_EXCHANGES_ENV) {
            config.log_exchanges = parse_flag(&value).unwrap_or(config.log_exchanges);
        }
        config
    }

    pub fn log_exchanges(mut self, enabled: bool) -> Self {
        self.log_exchanges = enabled;
        self
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => Some(true),
        "0" | "false" | "off" | "no" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn logging_is_on_by_default() {
        assert!(MockRestConfig::default().log_exchanges);
    }

    #[test]
    fn flags_parse_loosely() {
        assert_eq!(parse_flag("OFF"), Some(false));
        assert_eq!(parse_flag(" 1 "), Some(true));
        assert_eq!(parse_flag("maybe"), None);
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let config: MockRestConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, MockRestConfig::default());

        let config: MockRestConfig = serde_json::from_str(r#"{"log_exchanges":false}"#).unwrap();
        assert!(!config.log_exchanges);
    }
}
