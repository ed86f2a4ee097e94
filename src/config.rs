use serde::Deserialize;
use std::time::Duration;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:5041/api";
pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:3000";

/// Runtime settings, read from `API_BASE_URL`, `BIND_ADDRESS` and
/// `REQUEST_TIMEOUT_SECS`.
#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct Config {
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

fn default_bind_address() -> String {
    DEFAULT_BIND_ADDRESS.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            bind_address: default_bind_address(),
            request_timeout_secs: None,
        }
    }
}

impl Config {
    /// Loads `.env` when present, then reads the process environment.
    pub fn from_env() -> Result<Self, envy::Error> {
        if let Err(err) = dotenvy::dotenv() {
            if !err.not_found() {
                tracing::warn!("ignoring unreadable .env file: {}", err);
            }
        }
        envy::from_env::<Config>()
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_environment_is_empty() {
        let config: Config = envy::from_iter(Vec::<(String, String)>::new()).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.api_base_url, "http://localhost:5041/api");
        assert_eq!(config.request_timeout(), None);
    }

    #[test]
    fn reads_overrides() {
        let config: Config = envy::from_iter(vec![
            ("API_BASE_URL".to_string(), "https://qa.example.com/api/".to_string()),
            ("BIND_ADDRESS".to_string(), "127.0.0.1:8080".to_string()),
            ("REQUEST_TIMEOUT_SECS".to_string(), "30".to_string()),
        ])
        .unwrap();
        assert_eq!(config.api_base_url, "https://qa.example.com/api/");
        assert_eq!(config.bind_address, "127.0.0.1:8080");
        assert_eq!(config.request_timeout(), Some(Duration::from_secs(30)));
    }
}
