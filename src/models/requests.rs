//! Request DTOs for the administrative API
//!
//! Defines the structure of incoming HTTP request bodies.

use serde::Deserialize;

/// Request body for POST /admin/cache/clear-pattern
///
/// `pattern` is a regular expression matched against cache keys. It is
/// optional at the serde level so a missing field can be reported as a
/// regular 400 with a clear message.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClearPatternRequest {
    #[serde(default)]
    pub pattern: Option<String>,
}

impl ClearPatternRequest {
    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        match self.pattern.as_deref() {
            None => Some("Pattern is required".to_string()),
            Some(p) if p.is_empty() => Some("Pattern cannot be empty".to_string()),
            Some(_) => None,
        }
    }
}
