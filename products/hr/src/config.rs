pub const API_URL_ENV: &str = "ROSTER_API_URL";
pub const DEFAULT_API_URL: &str = "http://localhost:8080";

/// Where the roster backend lives.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_url: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_API_URL)
    }
}

impl ClientConfig {
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
        }
    }

    pub fn from_env() -> Self {
        std::env::var(API_URL_ENV)
            .ok()
            .map(|raw| raw.trim().to_string())
            .filter(|url| !url.is_empty())
            .map(Self::new)
            .unwrap_or_default()
    }
}
