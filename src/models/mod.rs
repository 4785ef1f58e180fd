//! Request and Response models for the administrative API
//!
//! This module defines the DTOs (Data Transfer Objects) used for
//! serializing/deserializing HTTP request and response bodies.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::ClearPatternRequest;
pub use responses::{ClearResponse, HealthResponse, StatsResponse};
