use std::{env, path::PathBuf, time::Duration};

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_DATA_DIR: &str = "data";
pub const DEFAULT_TIP_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_TIP_MODEL: &str = "gemini-2.5-flash";

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub data_dir: PathBuf,
    pub tip: TipConfig,
}

#[derive(Debug, Clone)]
pub struct TipConfig {
    pub api_key: Option<String>,
    pub endpoint: String,
    pub model: String,
    /// `None` leaves the request unbounded.
    pub timeout: Option<Duration>,
}

impl Default for TipConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: DEFAULT_TIP_ENDPOINT.to_string(),
            model: DEFAULT_TIP_MODEL.to_string(),
            timeout: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let port = non_empty("PORT")
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(DEFAULT_PORT);
        let data_dir = non_empty("APP_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));

        let tip = TipConfig {
            api_key: non_empty("GEMINI_API_KEY").or_else(|| non_empty("API_KEY")),
            endpoint: non_empty("TIP_ENDPOINT")
                .map(|value| value.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_TIP_ENDPOINT.to_string()),
            model: non_empty("TIP_MODEL").unwrap_or_else(|| DEFAULT_TIP_MODEL.to_string()),
            timeout: non_empty("TIP_TIMEOUT_SECS")
                .and_then(|value| value.parse::<u64>().ok())
                .map(Duration::from_secs),
        };

        Self {
            port,
            data_dir,
            tip,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = config_from(&[]);
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.data_dir, PathBuf::from("data"));
        assert_eq!(config.tip.api_key, None);
        assert_eq!(config.tip.model, DEFAULT_TIP_MODEL);
        assert_eq!(config.tip.timeout, None);
    }

    #[test]
    fn env_values_override_defaults() {
        let config = config_from(&[
            ("PORT", "9000"),
            ("APP_DATA_DIR", "/tmp/weights"),
            ("API_KEY", "fallback-key"),
            ("TIP_ENDPOINT", "http://localhost:1234/v1/"),
            ("TIP_TIMEOUT_SECS", "5"),
        ]);
        assert_eq!(config.port, 9000);
        assert_eq!(config.data_dir, PathBuf::from("/tmp/weights"));
        assert_eq!(config.tip.api_key.as_deref(), Some("fallback-key"));
        assert_eq!(config.tip.endpoint, "http://localhost:1234/v1");
        assert_eq!(config.tip.timeout, Some(Duration::from_secs(5)));
    }

    #[test]
    fn gemini_key_wins_and_blank_values_are_ignored() {
        let config = config_from(&[("GEMINI_API_KEY", "primary"), ("API_KEY", "other"), ("PORT", " ")]);
        assert_eq!(config.tip.api_key.as_deref(), Some("primary"));
        assert_eq!(config.port, DEFAULT_PORT);
    }

    #[test]
    fn unparsable_port_uses_default() {
        assert_eq!(config_from(&[("PORT", "eighty")]).port, DEFAULT_PORT);
    }
}
