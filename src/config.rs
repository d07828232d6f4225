// src/config.rs
//! Relay configuration, read from the environment (and `.env`) at startup.

use std::fmt::Debug;
use std::net::SocketAddr;
use std::path::PathBuf;

use crate::error::ConfigError;

pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";
pub const DEFAULT_SITE_URL: &str = "http://localhost:3000";
pub const DEFAULT_APP_TITLE: &str = "Abdul Wahab Portfolio AI Assistant";
pub const DEFAULT_BIND: &str = "0.0.0.0:3000";

#[derive(Clone)]
pub struct RelayConfig {
    pub bind_addr: SocketAddr,
    /// `None` disables the relay; `/api/chat` then answers 500.
    pub api_key: Option<String>,
    pub base_url: String,
    /// Sent upstream as `HTTP-Referer`.
    pub site_url: String,
    /// Sent upstream as `X-Title`.
    pub app_title: String,
    pub admin_key: Option<String>,
    pub static_dir: PathBuf,
    pub log_json: bool,
}

// Keys are reported as set or unset, never printed.
impl Debug for RelayConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RelayConfig")
            .field("bind_addr", &self.bind_addr)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("site_url", &self.site_url)
            .field("app_title", &self.app_title)
            .field("admin_key", &self.admin_key.as_ref().map(|_| "<redacted>"))
            .field("static_dir", &self.static_dir)
            .field("log_json", &self.log_json)
            .finish()
    }
}

impl RelayConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bind = lookup("RELAY_BIND").unwrap_or_else(|| DEFAULT_BIND.to_string());
        let bind_addr = bind.parse().map_err(|_| ConfigError::Invalid {
            name: "RELAY_BIND",
            value: bind.clone(),
        })?;

        let base_url = lookup("OPENROUTER_BASE_URL")
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        Ok(Self {
            bind_addr,
            api_key: non_blank(lookup("OPENROUTER_API_KEY")),
            base_url,
            site_url: lookup("SITE_URL").unwrap_or_else(|| DEFAULT_SITE_URL.to_string()),
            app_title: lookup("RELAY_APP_TITLE").unwrap_or_else(|| DEFAULT_APP_TITLE.to_string()),
            admin_key: non_blank(lookup("ADMIN_KEY")),
            static_dir: lookup("STATIC_DIR").unwrap_or_else(|| "public".to_string()).into(),
            log_json: lookup("RELAY_LOG_JSON")
                .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
                .unwrap_or(false),
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
