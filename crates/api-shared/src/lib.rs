//! # API Shared
//!
//! Request/response types for the chart HTTP API.
//!
//! Contains:
//! - JSON DTOs with OpenAPI schemas (`dto` module), plus conversions from core types
//! - `HealthService`
//!
//! Used by `api-rest` and the `chart-run` binary.

pub mod dto;
pub mod health;

pub use dto::*;
pub use health::HealthService;
