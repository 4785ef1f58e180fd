//! Response DTOs for the administrative API
//!
//! Defines the structure of outgoing HTTP response bodies.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

use crate::cache::CacheStats;

/// Response body for the stats endpoint (GET /admin/cache/stats)
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    /// Current number of cached responses
    pub entries: usize,
    /// Total body bytes held
    pub size_bytes: usize,
    /// `size_bytes` in megabytes, two decimals
    #[serde(rename = "sizeMB")]
    pub size_mb: f64,
    pub max_size_bytes: usize,
    pub max_entries: usize,
    /// hits / (hits + misses)
    pub hit_rate: f64,
    pub total_hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub expirations: u64,
    /// Creation time of the oldest entry (RFC 3339)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub oldest_entry: Option<String>,
    /// Creation time of the newest entry (RFC 3339)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub newest_entry: Option<String>,
}

impl From<CacheStats> for StatsResponse {
    fn from(stats: CacheStats) -> Self {
        let size_mb = (stats.size_bytes as f64 / (1024.0 * 1024.0) * 100.0).round() / 100.0;
        Self {
            entries: stats.entries,
            size_bytes: stats.size_bytes,
            size_mb,
            max_size_bytes: stats.max_size_bytes,
            max_entries: stats.max_entries,
            hit_rate: stats.hit_rate(),
            total_hits: stats.total_hits(),
            misses: stats.counters.misses,
            evictions: stats.counters.evictions,
            expirations: stats.counters.expirations,
            oldest_entry: stats.oldest_entry.and_then(format_timestamp_ms),
            newest_entry: stats.newest_entry.and_then(format_timestamp_ms),
        }
    }
}

/// Response body for the clear endpoints
#[derive(Debug, Clone, Serialize)]
pub struct ClearResponse {
    pub success: bool,
    pub message: String,
    /// Number of entries removed
    pub cleared: usize,
}

impl ClearResponse {
    pub fn all(cleared: usize) -> Self {
        Self {
            success: true,
            message: format!("Cleared {} cache entries", cleared),
            cleared,
        }
    }

    pub fn matching(cleared: usize) -> Self {
        Self {
            success: true,
            message: format!("Cleared {} cache entries matching pattern", cleared),
            cleared,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: Utc::now().to_rfc3339(),
        }
    }
}

fn format_timestamp_ms(ms: u64) -> Option<String> {
    DateTime::<Utc>::from_timestamp_millis(ms as i64)
        .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Millis, true))
}
