#![forbid(unsafe_code)]
#![warn(missing_docs)]

//! SkyLink API
//!
//! The HTTP surface of SkyLink:
//!
//! - `GET /api/track?awbNo=<id>` relays the carrier's tracking envelope
//! - `GET /api/health` reports service status and CMS reachability
//!
//! The proxy forwards the identifier verbatim and does not look inside the
//! envelope; interpreting the embedded status is left to the caller.

pub mod error;
pub mod routes;
pub mod server;

pub use error::{Error, Result};
pub use server::{AppState, SharedState, router, serve};
