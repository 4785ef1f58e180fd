//! Per-middleware options.
//!
//! Several middleware instances can share one store, each with its own TTL,
//! namespace and policy switches. Store bounds are not part of these options.

use std::fmt;
use std::sync::Arc;

use axum::{
    body::Body,
    http::{HeaderMap, HeaderName, Request},
};
use tracing::warn;

use super::cache_control::CacheControl;
use super::key::default_key;
use super::{DEFAULT_EXCLUDED_HEADERS, DEFAULT_TTL_SECONDS};

/// Custom key function. Replaces the default key algorithm entirely.
pub type KeyGenerator =
    Arc<dyn Fn(&Request<Body>, Option<&CallerIdentity>) -> String + Send + Sync>;

/// Authenticated caller attached to a request as an extension by the
/// authentication layer. Its presence marks the request as authenticated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerIdentity(pub String);

impl CallerIdentity {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn id(&self) -> &str {
        &self.0
    }
}

/// Options for one response cache middleware instance.
#[derive(Clone)]
pub struct CacheOptions {
    ttl_seconds: u64,
    key_prefix: String,
    cache_authenticated: bool,
    respect_cache_control: bool,
    exclude_headers: Vec<HeaderName>,
    key_generator: Option<KeyGenerator>,
}

impl CacheOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Default TTL in seconds for stored responses.
    pub fn ttl(mut self, seconds: u64) -> Self {
        self.ttl_seconds = seconds;
        self
    }

    /// Namespace prepended to generated keys.
    pub fn key_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.key_prefix = prefix.into();
        self
    }

    /// Allows requests carrying a [`CallerIdentity`]; they are keyed per user.
    pub fn cache_authenticated(mut self, enabled: bool) -> Self {
        self.cache_authenticated = enabled;
        self
    }

    /// When disabled, `Cache-Control` on requests and responses is ignored
    /// for caching decisions and only the default TTL applies.
    pub fn respect_cache_control(mut self, enabled: bool) -> Self {
        self.respect_cache_control = enabled;
        self
    }

    /// Replaces the set of response headers stripped before storage.
    ///
    /// Names that are not valid header names are skipped.
    pub fn exclude_headers<I, S>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.exclude_headers = headers
            .into_iter()
            .filter_map(|name| {
                let name = name.as_ref();
                match HeaderName::from_bytes(name.trim().to_ascii_lowercase().as_bytes()) {
                    Ok(header) => Some(header),
                    Err(_) => {
                        warn!(header = name, "ignoring invalid excluded header name");
                        None
                    }
                }
            })
            .collect();
        self
    }

    /// Installs a custom key function.
    pub fn key_generator<F>(mut self, generator: F) -> Self
    where
        F: Fn(&Request<Body>, Option<&CallerIdentity>) -> String + Send + Sync + 'static,
    {
        self.key_generator = Some(Arc::new(generator));
        self
    }

    pub fn ttl_seconds(&self) -> u64 {
        self.ttl_seconds
    }

    pub fn prefix(&self) -> &str {
        &self.key_prefix
    }

    pub fn caches_authenticated(&self) -> bool {
        self.cache_authenticated
    }

    pub fn respects_cache_control(&self) -> bool {
        self.respect_cache_control
    }

    pub fn excluded_headers(&self) -> &[HeaderName] {
        &self.exclude_headers
    }

    /// Derives the cache key for a request.
    ///
    /// The caller identity only reaches the default algorithm when per-user
    /// caching is enabled.
    pub fn key_for(&self, request: &Request<Body>, identity: Option<&CallerIdentity>) -> String {
        if let Some(generator) = &self.key_generator {
            return generator(request, identity);
        }
        let identity = identity.filter(|_| self.cache_authenticated);
        default_key(request, identity, &self.key_prefix)
    }

    /// Copies `headers` minus the exclusion set, keeping repeated values.
    pub fn storable_headers(&self, headers: &HeaderMap) -> HeaderMap {
        let mut stored = HeaderMap::with_capacity(headers.len());
        for (name, value) in headers {
            if !self.exclude_headers.contains(name) {
                stored.append(name.clone(), value.clone());
            }
        }
        stored
    }

    /// TTL for one response: its `max-age` when the policy is enforced,
    /// otherwise the configured default.
    pub fn effective_ttl(&self, response_policy: &CacheControl) -> u64 {
        if self.respect_cache_control {
            response_policy.max_age.unwrap_or(self.ttl_seconds)
        } else {
            self.ttl_seconds
        }
    }
}

impl Default for CacheOptions {
    fn default() -> Self {
        Self {
            ttl_seconds: DEFAULT_TTL_SECONDS,
            key_prefix: String::new(),
            cache_authenticated: false,
            respect_cache_control: true,
            exclude_headers: DEFAULT_EXCLUDED_HEADERS
                .iter()
                .copied()
                .map(HeaderName::from_static)
                .collect(),
            key_generator: None,
        }
    }
}

impl fmt::Debug for CacheOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheOptions")
            .field("ttl_seconds", &self.ttl_seconds)
            .field("key_prefix", &self.key_prefix)
            .field("cache_authenticated", &self.cache_authenticated)
            .field("respect_cache_control", &self.respect_cache_control)
            .field("exclude_headers", &self.exclude_headers)
            .field("custom_key_generator", &self.key_generator.is_some())
            .finish()
    }
}
