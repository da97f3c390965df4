//! Configuration for Verifyd
//!
//! Settings live in a single JSON file at `~/.verifyd/config.json`. Every
//! section is optional; missing fields take their defaults. A handful of
//! environment variables (optionally loaded from a `.env` file) override the
//! file so credentials never have to be written to disk.
//!
//! ```json
//! {
//!     "backend": { "url": "https://xyz.example.co", "anon_key": "..." },
//!     "cache": { "enabled": true, "ttl_secs": 300 },
//!     "search": { "max_suggestions": 5 }
//! }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, VerifydError};

/// Environment variable overriding `backend.url`.
pub const ENV_BACKEND_URL: &str = "VERIFYD_BACKEND_URL";
/// Environment variable overriding `backend.anon_key`.
pub const ENV_ANON_KEY: &str = "VERIFYD_ANON_KEY";
/// Environment variable overriding `backend.access_token`.
pub const ENV_ACCESS_TOKEN: &str = "VERIFYD_ACCESS_TOKEN";
/// Environment variable overriding `cache.ttl_secs`.
pub const ENV_CACHE_TTL_SECS: &str = "VERIFYD_CACHE_TTL_SECS";

/// Hard upper bound on autocomplete suggestions.
pub const MAX_SUGGESTIONS: usize = 5;

// ============================================================================
// Sections
// ============================================================================

/// Connection settings for the hosted backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Project base URL, without the `/rest/v1` suffix.
    pub url: String,
    /// Public anonymous API key sent as the `apikey` header.
    pub anon_key: String,
    /// Signed-in user's JWT. Falls back to the anon key when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    /// Per-request timeout.
    pub timeout_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            anon_key: String::new(),
            access_token: None,
            timeout_secs: 30,
        }
    }
}

/// Query cache settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// When false, every read goes to the backend.
    pub enabled: bool,
    /// Seconds before a cached query result is considered stale.
    pub ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            ttl_secs: 300,
        }
    }
}

/// Search suggestion settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Number of autocomplete suggestions, clamped to `1..=5`.
    pub max_suggestions: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_suggestions: MAX_SUGGESTIONS,
        }
    }
}

impl SearchConfig {
    /// Effective suggestion limit.
    pub fn limit(&self) -> usize {
        self.max_suggestions.clamp(1, MAX_SUGGESTIONS)
    }
}

// ============================================================================
// Config
// ============================================================================

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub backend: BackendConfig,
    pub cache: CacheConfig,
    pub search: SearchConfig,
}

impl Config {
    /// Configuration directory (`~/.verifyd`).
    pub fn dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".verifyd")
    }

    /// Configuration file path (`~/.verifyd/config.json`).
    pub fn path() -> PathBuf {
        Self::dir().join("config.json")
    }

    /// Load from the default path, then apply `.env` and environment overrides.
    pub fn load() -> Result<Self> {
        let _ = dotenvy::dotenv();
        let mut config = Self::load_from(&Self::path())?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from an explicit path. A missing file yields defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "Config file not found, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            VerifydError::Config(format!("Invalid config file {}: {}", path.display(), e))
        })
    }

    /// Write the configuration as pretty JSON, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Apply `VERIFYD_*` environment variables on top of file values.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|name| std::env::var(name).ok());
    }

    fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(url) = non_empty(ENV_BACKEND_URL) {
            self.backend.url = url;
        }
        if let Some(key) = non_empty(ENV_ANON_KEY) {
            self.backend.anon_key = key;
        }
        if let Some(token) = non_empty(ENV_ACCESS_TOKEN) {
            self.backend.access_token = Some(token);
        }
        if let Some(ttl) = non_empty(ENV_CACHE_TTL_SECS).and_then(|v| v.trim().parse().ok()) {
            self.cache.ttl_secs = ttl;
        }
    }

    /// Reject configurations that cannot reach the backend.
    pub fn validate(&self) -> Result<()> {
        if self.backend.url.trim().is_empty() {
            return Err(VerifydError::Config(format!(
                "backend.url is not set (add it to {} or set {})",
                Self::path().display(),
                ENV_BACKEND_URL
            )));
        }
        if !self.backend.url.starts_with("http://") && !self.backend.url.starts_with("https://") {
            return Err(VerifydError::Config(format!(
                "backend.url must be an http(s) URL, got '{}'",
                self.backend.url
            )));
        }
        if self.backend.anon_key.trim().is_empty() {
            return Err(VerifydError::Config(format!(
                "backend.anon_key is not set (set {})",
                ENV_ANON_KEY
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert!(config.backend.url.is_empty());
        assert_eq!(config.backend.timeout_secs, 30);
        assert!(config.cache.enabled);
        assert_eq!(config.cache.ttl_secs, 300);
        assert_eq!(config.search.limit(), 5);
    }

    #[test]
    fn test_load_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("nope.json")).unwrap();
        assert!(config.cache.enabled);
    }

    #[test]
    fn test_load_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(
            &path,
            r#"{"backend": {"url": "https://demo.example.co"}, "cache": {"ttl_secs": 10}}"#,
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.backend.url, "https://demo.example.co");
        assert_eq!(config.backend.timeout_secs, 30);
        assert_eq!(config.cache.ttl_secs, 10);
        assert!(config.cache.enabled);
    }

    #[test]
    fn test_load_invalid_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{ broken").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(err, VerifydError::Config(_)));
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");

        let mut config = Config::default();
        config.backend.url = "https://demo.example.co".to_string();
        config.search.max_suggestions = 3;
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.backend.url, "https://demo.example.co");
        assert_eq!(loaded.search.limit(), 3);
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = [
            (ENV_BACKEND_URL, "https://env.example.co"),
            (ENV_ANON_KEY, "anon-123"),
            (ENV_ACCESS_TOKEN, "   "),
            (ENV_CACHE_TTL_SECS, "42"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.apply_overrides(|name| vars.get(name).map(|v| v.to_string()));

        assert_eq!(config.backend.url, "https://env.example.co");
        assert_eq!(config.backend.anon_key, "anon-123");
        assert!(config.backend.access_token.is_none());
        assert_eq!(config.cache.ttl_secs, 42);
    }

    #[test]
    fn test_search_limit_clamped() {
        let search = SearchConfig { max_suggestions: 50 };
        assert_eq!(search.limit(), 5);
        let search = SearchConfig { max_suggestions: 0 };
        assert_eq!(search.limit(), 1);
    }

    #[test]
    fn test_validate() {
        let mut config = Config::default();
        assert!(config.validate().is_err());

        config.backend.url = "ftp://nope".to_string();
        config.backend.anon_key = "key".to_string();
        assert!(config.validate().is_err());

        config.backend.url = "https://demo.example.co".to_string();
        assert!(config.validate().is_ok());
    }
}
