//! Configuration management

use reqwest::header::{HeaderName, HeaderValue};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::core::errors::{ClientError, Result};

const DEFAULT_BASE_URL: &str = "http://localhost:8080";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Connection settings for [`TranslationClient`](crate::core::client::TranslationClient)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Service root, e.g. `http://localhost:8080`
    pub base_url: String,
    /// Sent verbatim as the `Cookie` header, e.g. `JSESSIONID=...`
    pub session_cookie: Option<String>,
    /// `User-Agent` header value
    pub user_agent: String,
    /// Default per-call timeout, in seconds
    pub timeout_secs: u64,
    /// Where downloaded artifacts land by default
    pub download_dir: PathBuf,
    /// Extra headers attached to every request
    pub headers: BTreeMap<String, String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            session_cookie: None,
            user_agent: format!("{}/{}", crate::NAME, crate::VERSION),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            download_dir: PathBuf::from("."),
            headers: BTreeMap::new(),
        }
    }
}

impl ClientConfig {
    /// Load configuration from environment variables, falling back to defaults
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let timeout_secs = match std::env::var("TRANSLATE_TIMEOUT_SECS") {
            Ok(raw) => raw.trim().parse::<u64>().map_err(|e| {
                ClientError::config(format!("TRANSLATE_TIMEOUT_SECS={raw}: {e}"))
            })?,
            Err(_) => defaults.timeout_secs,
        };

        Ok(Self {
            base_url: std::env::var("TRANSLATE_BASE_URL").unwrap_or(defaults.base_url),
            session_cookie: std::env::var("TRANSLATE_SESSION_COOKIE")
                .ok()
                .filter(|c| !c.is_empty()),
            user_agent: std::env::var("TRANSLATE_USER_AGENT").unwrap_or(defaults.user_agent),
            timeout_secs,
            download_dir: std::env::var("TRANSLATE_DOWNLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.download_dir),
            headers: defaults.headers,
        })
    }

    /// Load from JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| ClientError::config(format!("{}: {e}", path.display())))
    }

    /// Save configuration to file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| ClientError::config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Default per-call timeout
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Base URL without trailing slashes
    pub fn base(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        let base = self.base();
        if base.is_empty() {
            return Err(ClientError::config("base_url is required"));
        }

        if !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(ClientError::config(format!(
                "base_url must start with http:// or https://: {base}"
            )));
        }

        if self.timeout_secs == 0 {
            return Err(ClientError::config("timeout_secs must be greater than 0"));
        }

        HeaderValue::from_str(&self.user_agent)
            .map_err(|_| ClientError::config("user_agent is not a valid header value"))?;

        if let Some(cookie) = &self.session_cookie {
            HeaderValue::from_str(cookie)
                .map_err(|_| ClientError::config("session_cookie is not a valid header value"))?;
        }

        for (name, value) in &self.headers {
            HeaderName::from_bytes(name.as_bytes())
                .map_err(|_| ClientError::config(format!("invalid header name: {name}")))?;
            HeaderValue::from_str(value)
                .map_err(|_| ClientError::config(format!("invalid value for header {name}")))?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config_is_valid() {
        let config = ClientConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_base_strips_trailing_slash() {
        let config = ClientConfig {
            base_url: "http://translate.local:8080//".to_string(),
            ..Default::default()
        };
        assert_eq!(config.base(), "http://translate.local:8080");
    }

    #[test]
    fn test_config_validation_rejects_bad_values() {
        let config = ClientConfig {
            base_url: "".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = ClientConfig {
            base_url: "ftp://host".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = ClientConfig {
            timeout_secs: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = ClientConfig {
            session_cookie: Some("JSESSIONID=abc\n".to_string()),
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let mut headers = BTreeMap::new();
        headers.insert("bad header".to_string(), "v".to_string());
        let config = ClientConfig {
            headers,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_file_round_trip_and_partial_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("client.json");

        let mut config = ClientConfig::default();
        config.session_cookie = Some("JSESSIONID=076504CC".to_string());
        config.headers.insert("X-Trace".to_string(), "1".to_string());
        config.to_file(&path).unwrap();
        assert_eq!(ClientConfig::from_file(&path).unwrap(), config);

        std::fs::write(&path, r#"{"base_url": "https://example.org"}"#).unwrap();
        let partial = ClientConfig::from_file(&path).unwrap();
        assert_eq!(partial.base_url, "https://example.org");
        assert_eq!(partial.timeout_secs, 30);
    }

    #[test]
    fn test_from_file_reports_bad_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{not json").unwrap();

        let err = ClientConfig::from_file(&path).unwrap_err();
        assert_eq!(err.kind(), crate::core::errors::ErrorKind::ConfigError);
    }
}
