//! Integration test suite for the SkyLink HTTP clients.
//!
//! Each test starts a `wiremock` server standing in for the carrier API or
//! the CMS and drives the real `reqwest` clients against it.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

mod common;
mod integration;
