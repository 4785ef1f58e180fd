//! Configuration Module
//!
//! Handles loading server and cache configuration from environment variables.

use std::env;
use std::str::FromStr;

use crate::cache::{DEFAULT_MAX_ENTRIES, DEFAULT_MAX_SIZE_BYTES};
use crate::middleware::{CacheOptions, DEFAULT_EXCLUDED_HEADERS, DEFAULT_TTL_SECONDS};

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Maximum number of cached responses
    pub max_entries: usize,
    /// Maximum total body bytes held by the cache
    pub max_size_bytes: usize,
    /// Default TTL in seconds for cached responses
    pub default_ttl: u64,
    /// Namespace prepended to every generated key
    pub key_prefix: String,
    /// Whether authenticated requests may be cached (keyed per user)
    pub cache_authenticated: bool,
    /// Whether `Cache-Control` headers steer caching decisions
    pub respect_cache_control: bool,
    /// Response headers never stored
    pub exclude_headers: Vec<String>,
    /// Background expiry sweep interval in seconds, 0 disables it
    pub sweep_interval: u64,
    /// HTTP server port
    pub server_port: u16,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_MAX_ENTRIES` - Maximum cached responses (default: 1000)
    /// - `CACHE_MAX_SIZE_BYTES` - Maximum total body bytes (default: 50 MB)
    /// - `CACHE_DEFAULT_TTL` - Default TTL in seconds (default: 300)
    /// - `CACHE_KEY_PREFIX` - Key namespace (default: empty)
    /// - `CACHE_AUTHENTICATED` - Cache authenticated requests (default: false)
    /// - `CACHE_RESPECT_CACHE_CONTROL` - Honor Cache-Control (default: true)
    /// - `CACHE_EXCLUDE_HEADERS` - Comma separated header names (default: set-cookie,authorization)
    /// - `CACHE_SWEEP_INTERVAL` - Expiry sweep frequency in seconds (default: 60)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_entries: env_or("CACHE_MAX_ENTRIES", defaults.max_entries),
            max_size_bytes: env_or("CACHE_MAX_SIZE_BYTES", defaults.max_size_bytes),
            default_ttl: env_or("CACHE_DEFAULT_TTL", defaults.default_ttl),
            key_prefix: env::var("CACHE_KEY_PREFIX").unwrap_or(defaults.key_prefix),
            cache_authenticated: env_or("CACHE_AUTHENTICATED", defaults.cache_authenticated),
            respect_cache_control: env_or(
                "CACHE_RESPECT_CACHE_CONTROL",
                defaults.respect_cache_control,
            ),
            exclude_headers: env::var("CACHE_EXCLUDE_HEADERS")
                .map(|v| parse_header_list(&v))
                .unwrap_or(defaults.exclude_headers),
            sweep_interval: env_or("CACHE_SWEEP_INTERVAL", defaults.sweep_interval),
            server_port: env_or("SERVER_PORT", defaults.server_port),
        }
    }

    /// Middleware options derived from this configuration.
    pub fn cache_options(&self) -> CacheOptions {
        CacheOptions::new()
            .ttl(self.default_ttl)
            .key_prefix(self.key_prefix.clone())
            .cache_authenticated(self.cache_authenticated)
            .respect_cache_control(self.respect_cache_control)
            .exclude_headers(self.exclude_headers.iter().map(String::as_str))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_entries: DEFAULT_MAX_ENTRIES,
            max_size_bytes: DEFAULT_MAX_SIZE_BYTES,
            default_ttl: DEFAULT_TTL_SECONDS,
            key_prefix: String::new(),
            cache_authenticated: false,
            respect_cache_control: true,
            exclude_headers: DEFAULT_EXCLUDED_HEADERS.iter().map(|h| h.to_string()).collect(),
            sweep_interval: 60,
            server_port: 3000,
        }
    }
}

fn env_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

fn parse_header_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|h| h.trim().to_ascii_lowercase())
        .filter(|h| !h.is_empty())
        .collect()
}
