//! Carrier tracking API client.

use crate::error::{Error, Result};
use reqwest::header::CACHE_CONTROL;
use serde_json::Value;
use skylink_core::{SkylinkConfig, TrackingEnvelope, TrackingNumber, ensure_success};

/// Query parameter the carrier expects the AWB number in.
pub const AWB_QUERY_PARAM: &str = "AWBNO";

/// Client for the carrier's `GetSkyLinkTracks` endpoint.
///
/// One request per call, no retries, no timeout beyond the HTTP client's
/// defaults.
#[derive(Debug, Clone)]
pub struct TrackingClient {
    http: reqwest::Client,
    base_url: String,
}

impl TrackingClient {
    /// Creates a client for the given endpoint URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_http_client(reqwest::Client::new(), base_url)
    }

    /// Creates a client sharing an existing `reqwest::Client`.
    pub fn with_http_client(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }

    /// Creates a client from `tracking.base_url`.
    pub fn from_config(config: &SkylinkConfig) -> Self {
        Self::new(config.tracking.base_url.clone())
    }

    /// The endpoint URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetches the raw JSON body for `awb`, forwarded verbatim.
    ///
    /// Non-2xx statuses and undecodable bodies are transport errors. The
    /// embedded application status is not inspected.
    pub async fn fetch_raw(&self, awb: &str) -> Result<Value> {
        tracing::debug!(awb = %awb, url = %self.base_url, "Fetching tracking data");

        let response = self
            .http
            .get(&self.base_url)
            .query(&[(AWB_QUERY_PARAM, awb)])
            .header(CACHE_CONTROL, "no-cache")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Status {
                status: status.as_u16(),
                url: self.base_url.clone(),
            });
        }

        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(|source| Error::Decode {
            url: self.base_url.clone(),
            source,
        })
    }

    /// Fetches and decodes the envelope for a sanitized number.
    pub async fn fetch(&self, number: &TrackingNumber) -> Result<TrackingEnvelope> {
        let value = self.fetch_raw(number.as_str()).await?;
        Ok(TrackingEnvelope::from_value(value)?)
    }

    /// Full lookup: sanitize, fetch, and reject embedded errors.
    ///
    /// Input that sanitizes to nothing fails before any request is sent.
    pub async fn track(&self, raw: &str) -> Result<TrackingEnvelope> {
        let number = TrackingNumber::parse(raw)?;
        let envelope = self.fetch(&number).await?;
        Ok(ensure_success(envelope)?)
    }
}
