//! `GET /api/track?awbNo=<id>`

use crate::error::{Error, Result};
use crate::server::SharedState;
use axum::Json;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use serde::Deserialize;
use serde_json::Value;

/// Query string of the proxy route.
#[derive(Debug, Default, Deserialize)]
pub struct TrackParams {
    /// Identifier as typed by the user.
    #[serde(rename = "awbNo")]
    pub awb_no: Option<String>,
}

/// Relays the carrier envelope for `awbNo`.
///
/// The identifier is forwarded as received. A missing or empty value is a
/// 400 without any upstream call. Any upstream failure becomes a generic
/// 500; the embedded application status is not inspected here.
pub async fn track_handler(
    State(state): State<SharedState>,
    params: std::result::Result<Query<TrackParams>, QueryRejection>,
) -> Result<Json<Value>> {
    let awb = params
        .ok()
        .and_then(|Query(p)| p.awb_no)
        .filter(|awb| !awb.is_empty())
        .ok_or(Error::MissingTrackingNumber)?;

    match state.tracking.fetch_raw(&awb).await {
        Ok(body) => Ok(Json(body)),
        Err(e) => {
            tracing::error!(awb = %awb, error = %e, "Tracking lookup failed");
            Err(e.into())
        }
    }
}
