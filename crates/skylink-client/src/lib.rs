#![forbid(unsafe_code)]
#![warn(missing_docs)]

//! SkyLink Client
//!
//! HTTP clients for the two upstreams SkyLink talks to: the carrier's
//! tracking API and the headless CMS that serves site content.
//!
//! # Modules
//!
//! - [`tracking`]: Single-shot carrier lookups
//! - [`cms`]: Collection queries, entry flattening, and the health probe
//! - [`error`]: Transport vs. application error split

pub mod cms;
pub mod error;
pub mod tracking;

pub use cms::{CmsClient, CmsQuery, CmsStatus, flatten_entry};
pub use error::{Error, Result};
pub use tracking::TrackingClient;
