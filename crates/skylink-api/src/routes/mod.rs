//! HTTP handlers.

pub mod health;
pub mod track;

/// Tracking proxy route.
pub const TRACK_PATH: &str = "/api/track";

/// Health route.
pub const HEALTH_PATH: &str = "/api/health";
