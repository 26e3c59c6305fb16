#![forbid(unsafe_code)]
#![warn(missing_docs)]

//! SkyLink Core
//!
//! Domain types and formatting rules for the SkyLink tracking pipeline.
//! Nothing in this crate performs network I/O; the HTTP clients live in
//! `skylink-client` and the proxy in `skylink-api`.
//!
//! # Modules
//!
//! - [`error`]: Error taxonomy and Result alias
//! - [`tracking`]: Tracking numbers, the upstream envelope, and the response normalizer
//! - [`weight`]: Weight string parsing with unit inference
//! - [`dates`]: Tracking date parsing and transit estimates
//! - [`history`]: Client-side lookup history
//! - [`cms`]: Flat view models for CMS content
//! - [`config`]: Layered service configuration

pub mod cms;
pub mod config;
pub mod dates;
pub mod error;
pub mod history;
pub mod tracking;
pub mod weight;

mod proptests;
mod serde_util;

// Re-exports for convenience
pub use config::SkylinkConfig;
pub use dates::{TransitEstimate, estimated_delivery, format_tracking_date, transit_days};
pub use error::{Error, Result};
pub use history::{HistoryEntry, HistoryStore, TrackingHistory};
pub use tracking::{
    ShipmentHistoryEntry, TrackingData, TrackingEnvelope, TrackingNumber, TrackingStatus,
    ensure_success,
};
pub use weight::{ParsedWeight, WeightUnit, parse_weight};
