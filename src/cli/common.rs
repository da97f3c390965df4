//! Shared helpers: configuration loading and marketplace construction.

use anyhow::{Context, Result};

use verifyd::backend::RestBackend;
use verifyd::config::Config;
use verifyd::Marketplace;

/// Load configuration and connect to the configured backend.
pub(crate) fn connect() -> Result<Marketplace<RestBackend>> {
    let config = Config::load().with_context(|| "Failed to load configuration")?;
    config
        .validate()
        .with_context(|| format!("Invalid configuration in {:?}", Config::path()))?;

    let backend =
        RestBackend::new(&config.backend).with_context(|| "Failed to build HTTP client")?;
    Ok(Marketplace::new(backend, &config))
}

/// Show a secret's first few characters only.
pub(crate) fn mask(secret: &str) -> String {
    if secret.is_empty() {
        return "(not set)".to_string();
    }
    let shown: String = secret.chars().take(4).collect();
    format!("{}…", shown)
}

pub(crate) fn cmd_config() -> Result<()> {
    let config = Config::load().with_context(|| "Failed to load configuration")?;

    println!("Config file: {}", Config::path().display());
    println!();
    println!("backend.url           {}", config.backend.url);
    println!("backend.anon_key      {}", mask(&config.backend.anon_key));
    println!(
        "backend.access_token  {}",
        mask(config.backend.access_token.as_deref().unwrap_or_default())
    );
    println!("backend.timeout_secs  {}", config.backend.timeout_secs);
    println!("cache.enabled         {}", config.cache.enabled);
    println!("cache.ttl_secs        {}", config.cache.ttl_secs);
    println!("search.max_suggestions {}", config.search.limit());

    if let Err(e) = config.validate() {
        eprintln!();
        eprintln!("Warning: {}", e);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask() {
        assert_eq!(mask(""), "(not set)");
        assert_eq!(mask("eyJhbGciOi"), "eyJh…");
        assert_eq!(mask("abc"), "abc…");
    }
}
