//! `Cache-Control` parsing.

use axum::http::{header::CACHE_CONTROL, HeaderMap};

/// The directives that drive caching decisions. Unknown directives are ignored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheControl {
    pub no_store: bool,
    pub no_cache: bool,
    /// `max-age` in seconds
    pub max_age: Option<u64>,
    pub private: bool,
}

impl CacheControl {
    /// Parses one header value such as `public, max-age=60`.
    pub fn parse(value: &str) -> Self {
        let mut policy = Self::default();
        policy.merge(value);
        policy
    }

    /// Combines every `Cache-Control` header on a message.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let mut policy = Self::default();
        for value in headers.get_all(CACHE_CONTROL) {
            if let Ok(value) = value.to_str() {
                policy.merge(value);
            }
        }
        policy
    }

    /// A request carrying `no-store` or `no-cache` bypasses the store.
    pub fn forbids_lookup(&self) -> bool {
        self.no_store || self.no_cache
    }

    /// A response carrying `no-store` or `private` is never stored.
    pub fn forbids_storage(&self) -> bool {
        self.no_store || self.private
    }

    fn merge(&mut self, value: &str) {
        for directive in value.split(',') {
            let (name, arg) = match directive.split_once('=') {
                Some((name, arg)) => (name.trim(), Some(arg.trim().trim_matches('"'))),
                None => (directive.trim(), None),
            };

            if name.eq_ignore_ascii_case("no-store") {
                self.no_store = true;
            } else if name.eq_ignore_ascii_case("no-cache") {
                self.no_cache = true;
            } else if name.eq_ignore_ascii_case("private") {
                self.private = true;
            } else if name.eq_ignore_ascii_case("max-age") {
                if let Some(seconds) = arg.and_then(|a| a.parse().ok()) {
                    self.max_age = Some(seconds);
                }
            }
        }
    }
}
