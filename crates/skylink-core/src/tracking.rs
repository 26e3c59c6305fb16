//! Tracking numbers, the carrier envelope, and the response normalizer.
//!
//! The carrier reports application failures inside an HTTP 200 body, so a
//! successful transport says nothing about the lookup itself. Callers run
//! every decoded [`TrackingEnvelope`] through [`ensure_success`] before
//! treating it as a tracking result.

use crate::error::{Error, INVALID_TRACKING_NUMBER, Result};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Sentinel the carrier puts in `data.status` when a lookup failed.
pub const STATUS_ERROR: &str = "ERROR";

/// Sentinel the carrier puts in `data.status` when a lookup succeeded.
pub const STATUS_SUCCESS: &str = "SUCCESS";

/// Message used when the carrier flags an error without explaining it.
pub const DEFAULT_UPSTREAM_MESSAGE: &str = "No tracking information found for this number";

// ============================================================================
// TrackingNumber
// ============================================================================

/// A sanitized airway bill (AWB) number.
///
/// Only ASCII letters and digits survive sanitization. A value of this type
/// is never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackingNumber(String);

impl TrackingNumber {
    /// Strips whitespace and every non-alphanumeric character.
    ///
    /// # Examples
    ///
    /// ```
    /// use skylink_core::TrackingNumber;
    ///
    /// assert_eq!(TrackingNumber::sanitize(" 123-456 789 "), "123456789");
    /// assert_eq!(TrackingNumber::sanitize("--- ..."), "");
    /// ```
    pub fn sanitize(raw: &str) -> String {
        raw.chars().filter(char::is_ascii_alphanumeric).collect()
    }

    /// Sanitizes `raw` and rejects it if nothing is left.
    ///
    /// # Examples
    ///
    /// ```
    /// use skylink_core::TrackingNumber;
    ///
    /// let number = TrackingNumber::parse("SKY 0042").unwrap();
    /// assert_eq!(number.as_str(), "SKY0042");
    /// assert!(TrackingNumber::parse("#!?").is_err());
    /// ```
    pub fn parse(raw: &str) -> Result<Self> {
        let cleaned = Self::sanitize(raw);
        if cleaned.is_empty() {
            return Err(Error::invalid_field("awbNo", INVALID_TRACKING_NUMBER));
        }
        Ok(Self(cleaned))
    }

    /// Returns the tracking number as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Converts into the inner string.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for TrackingNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for TrackingNumber {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for TrackingNumber {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// ============================================================================
// Envelope
// ============================================================================

/// Top-level response from the carrier tracking API.
///
/// Fields this crate does not model are kept in `extra` so the envelope can
/// be handed back unchanged.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TrackingEnvelope {
    /// Carrier status code (number or string, carrier-defined).
    #[serde(
        rename = "statusCode",
        alias = "code",
        alias = "StatusCode",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub status_code: Option<Value>,

    /// Carrier message for the whole response.
    #[serde(alias = "Message", default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// Nested payload carrying the authoritative status. `null` decodes as
    /// an empty payload.
    #[serde(alias = "Data", default, deserialize_with = "crate::serde_util::null_as_default")]
    pub data: TrackingData,

    /// Unmodelled fields.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The nested `data` object of a [`TrackingEnvelope`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TrackingData {
    /// `"SUCCESS"` or `"ERROR"`.
    #[serde(alias = "Status", default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    /// Human-readable message, mostly present on errors.
    #[serde(alias = "Message", default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// Airway bill number echoed back by the carrier.
    #[serde(
        rename = "awbNo",
        alias = "AWBNO",
        alias = "awbNumber",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub awb_number: Option<String>,

    /// Origin country or station.
    #[serde(alias = "Origin", default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,

    /// Destination country.
    #[serde(alias = "Destination", default, skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,

    /// Booking date in `DD-MMM-YYYY` form.
    #[serde(
        rename = "bookingDate",
        alias = "BookingDate",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub booking_date: Option<String>,

    /// Raw weight as reported; unit unknown until parsed.
    #[serde(
        alias = "Weight",
        default,
        deserialize_with = "string_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub weight: Option<String>,

    /// Shipment journey in carrier order.
    #[serde(
        alias = "History",
        alias = "trackingHistory",
        alias = "TrackingHistory",
        default,
        skip_serializing_if = "Vec::is_empty"
    )]
    pub history: Vec<ShipmentHistoryEntry>,

    /// Unmodelled fields.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One step of a shipment's journey.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ShipmentHistoryEntry {
    /// Status text, e.g. "In Transit".
    #[serde(alias = "Status", default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    /// Where the event happened.
    #[serde(alias = "Location", default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    /// `DD-MMM-YYYY`.
    #[serde(alias = "Date", default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,

    /// `HH:MM:SS`.
    #[serde(alias = "Time", default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,

    /// Unmodelled fields.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Interpretation of `data.status`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackingStatus {
    /// The carrier found the shipment.
    Success,
    /// The carrier flagged the lookup as failed.
    Error,
    /// Missing or unrecognised status.
    Unknown(Option<String>),
}

impl TrackingData {
    /// Classifies `status` (ASCII case-insensitive).
    pub fn tracking_status(&self) -> TrackingStatus {
        match self.status.as_deref().map(str::trim) {
            Some(s) if s.eq_ignore_ascii_case(STATUS_SUCCESS) => TrackingStatus::Success,
            Some(s) if s.eq_ignore_ascii_case(STATUS_ERROR) => TrackingStatus::Error,
            other => TrackingStatus::Unknown(other.map(str::to_string)),
        }
    }
}

impl TrackingEnvelope {
    /// Decodes an envelope from a relayed JSON value.
    pub fn from_value(value: Value) -> Result<Self> {
        Ok(serde_json::from_value(value)?)
    }

    /// Whether `statusCode` is a 4xx/5xx code, given as a number or a string.
    pub fn has_failure_code(&self) -> bool {
        let code = match &self.status_code {
            Some(Value::Number(n)) => n.as_u64(),
            Some(Value::String(s)) => s.trim().parse().ok(),
            _ => None,
        };
        code.is_some_and(|c| (400..600).contains(&c))
    }
}

/// Rejects envelopes whose embedded status is the error sentinel.
///
/// An envelope with no embedded status but a 4xx/5xx `statusCode` (the
/// carrier sends `"data": null` for unknown numbers) is rejected too. The
/// failure carries `data.message`, else the top-level `message`, else
/// [`DEFAULT_UPSTREAM_MESSAGE`]. Anything else, including a missing status,
/// is returned unchanged.
///
/// # Examples
///
/// ```
/// use skylink_core::{ensure_success, TrackingEnvelope};
///
/// let body = serde_json::json!({"data": {"status": "ERROR", "message": "Not found"}});
/// let envelope = TrackingEnvelope::from_value(body).unwrap();
/// let err = ensure_success(envelope).unwrap_err();
/// assert_eq!(err.user_message(), "Not found");
/// ```
pub fn ensure_success(envelope: TrackingEnvelope) -> Result<TrackingEnvelope> {
    let failed = match envelope.data.tracking_status() {
        TrackingStatus::Error => true,
        TrackingStatus::Unknown(None) => envelope.has_failure_code(),
        _ => false,
    };
    if failed {
        let non_empty = |m: &Option<String>| {
            m.as_deref()
                .map(str::trim)
                .filter(|m| !m.is_empty())
                .map(str::to_string)
        };
        let message = non_empty(&envelope.data.message)
            .or_else(|| non_empty(&envelope.message))
            .unwrap_or_else(|| DEFAULT_UPSTREAM_MESSAGE.to_string());
        return Err(Error::upstream(message));
    }
    Ok(envelope)
}

/// Accepts `"1.5"`, `1.5`, or `null` for fields the carrier types loosely.
fn string_or_number<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(serde::de::Error::custom(format!(
            "expected string or number, got {other}"
        ))),
    }
}
