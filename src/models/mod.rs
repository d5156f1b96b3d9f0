//! Response models for the worker endpoints
//!
//! This module defines the DTOs serialized into HTTP response bodies.

pub mod responses;

// Re-export commonly used types
pub use responses::{CachesResponse, HealthResponse, StateResponse, StatsResponse};
