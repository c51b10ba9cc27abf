use std::path::PathBuf;

use anyhow::{Context, Result};
use axum::http::HeaderValue;

pub const DEFAULT_DATA_FILE: &str = "salary_entries.csv";

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub data_file: PathBuf,
    /// Empty means any origin.
    pub cors_allowed_origins: Vec<HeaderValue>,
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        let data_file = std::env::var("ROSTER_DATA_FILE")
            .ok()
            .filter(|val| !val.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_FILE));

        let cors_allowed_origins =
            parse_origins(&std::env::var("CORS_ALLOWED_ORIGINS").unwrap_or_default())
                .context("invalid CORS_ALLOWED_ORIGINS")?;

        Ok(Self {
            data_file,
            cors_allowed_origins,
        })
    }

    pub fn with_data_file(mut self, data_file: Option<PathBuf>) -> Self {
        if let Some(path) = data_file {
            self.data_file = path;
        }
        self
    }
}

fn parse_origins(raw: &str) -> Result<Vec<HeaderValue>> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(|origin| {
            HeaderValue::from_str(origin).with_context(|| format!("bad origin {origin:?}"))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origins_are_trimmed_and_blank_entries_dropped() {
        assert_eq!(
            parse_origins(" http://localhost:4200, ,https://hr.example ").unwrap(),
            vec!["http://localhost:4200", "https://hr.example"]
        );
        assert!(parse_origins("").unwrap().is_empty());
    }

    #[test]
    fn unparseable_origin_is_rejected() {
        let err = parse_origins("http://localhost:4200,http://bad\u{7f}host").unwrap_err();
        assert!(err.to_string().contains("bad origin"));
    }

    #[test]
    fn flag_overrides_data_file() {
        let config = AppConfig {
            data_file: PathBuf::from(DEFAULT_DATA_FILE),
            cors_allowed_origins: vec![],
        };
        let config = config.with_data_file(Some(PathBuf::from("/tmp/roster.csv")));
        assert_eq!(config.data_file, PathBuf::from("/tmp/roster.csv"));
        assert_eq!(
            config.with_data_file(None).data_file,
            PathBuf::from("/tmp/roster.csv")
        );
    }
}
