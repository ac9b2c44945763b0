use crate::session::Credentials;
use anyhow::{Context, Result};
use secrecy::{ExposeSecret, SecretString};
use std::path::PathBuf;

const DEFAULT_API_URL: &str = "http://localhost:8000";
const DEFAULT_CACHE_DIR: &str = "cache";
const DEFAULT_BIND: &str = "127.0.0.1:3000";
const DEFAULT_FIFA_LANGUAGE: &str = "es";

/// Settings read from the environment (and `.env`)
#[derive(Debug)]
pub struct AppConfig {
    pub api_base_url: String,
    pub email: Option<String>,
    pub password: Option<SecretString>,
    pub use_cache: bool,
    pub cache_dir: PathBuf,
    pub bind_addr: String,
    pub fifa_language: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        // Load .env file
        dotenv::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_base_url = non_empty("PRODE_API_URL")
            .unwrap_or_else(|| DEFAULT_API_URL.to_string())
            .trim_end_matches('/')
            .to_string();
        if !api_base_url.starts_with("http://") && !api_base_url.starts_with("https://") {
            anyhow::bail!("PRODE_API_URL must be an http(s) URL, got {}", api_base_url);
        }

        Ok(Self {
            api_base_url,
            email: non_empty("PRODE_EMAIL"),
            password: non_empty("PRODE_PASSWORD").map(SecretString::from),
            use_cache: lookup("USE_CACHE").unwrap_or_default() == "1",
            cache_dir: PathBuf::from(
                non_empty("PRODE_CACHE_DIR").unwrap_or_else(|| DEFAULT_CACHE_DIR.to_string()),
            ),
            bind_addr: non_empty("PRODE_BIND").unwrap_or_else(|| DEFAULT_BIND.to_string()),
            fifa_language: non_empty("FIFA_LANGUAGE")
                .unwrap_or_else(|| DEFAULT_FIFA_LANGUAGE.to_string()),
        })
    }

    /// Credentials for commands that need a session
    pub fn credentials(&self) -> Result<Credentials> {
        let email = self.email.clone().context("PRODE_EMAIL not set in .env file")?;
        let password = self
            .password
            .as_ref()
            .context("PRODE_PASSWORD not set in .env file")?;
        Ok(Credentials::new(email, password.expose_secret()))
    }

    pub fn cache_file(&self, name: &str) -> PathBuf {
        self.cache_dir.join(name)
    }
}
