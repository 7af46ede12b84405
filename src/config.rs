// src/config.rs

use anyhow::{bail, Context, Result};
use std::{env, fmt};

/// Name of the environment variable holding the Census API key.
pub const API_KEY_VAR: &str = "API_KEY";

/// Runtime configuration. The API key is the only value not baked into the binary.
#[derive(Clone)]
pub struct Config {
    pub api_key: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let api_key = env::var(API_KEY_VAR)
            .with_context(|| format!("reading {} from environment", API_KEY_VAR))?;
        Self::new(api_key)
    }

    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            bail!("{} is set but empty", API_KEY_VAR);
        }
        Ok(Self { api_key })
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config").field("api_key", &"<redacted>").finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_blank_key() {
        assert!(Config::new("").is_err());
        assert!(Config::new("   ").is_err());
        assert_eq!(Config::new("abc").unwrap().api_key, "abc");
    }

    #[test]
    fn test_debug_hides_key() {
        let cfg = Config::new("super-secret").unwrap();
        let shown = format!("{:?}", cfg);
        assert!(!shown.contains("super-secret"));
        assert!(shown.contains("redacted"));
    }
}
