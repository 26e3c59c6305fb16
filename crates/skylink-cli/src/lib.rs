//! # skylink-cli
//!
//! Operator CLI for SkyLink.
//!
//! - `serve`: run the tracking proxy and health API
//! - `track`, `weight`, `eta`: shipment lookups and the formatting rules behind them
//! - `history`: recent lookups kept on this machine
//! - `content`: read-only views of CMS collections
//! - `config`: inspect and edit the layered configuration

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod cli;
pub mod commands;
pub mod config_handlers;

pub use cli::{Cli, Command};
