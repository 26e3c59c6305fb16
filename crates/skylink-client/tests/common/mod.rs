//! Shared fixtures for client integration tests.

use serde_json::{Value, json};

/// Path the carrier endpoint is mounted at on the mock server.
pub const TRACKING_PATH: &str = "/api/Tracking/GetSkyLinkTracks";

/// A successful carrier envelope for `awb`.
pub fn success_envelope(awb: &str) -> Value {
    json!({
        "statusCode": 200,
        "message": "OK",
        "data": {
            "status": "SUCCESS",
            "awbNo": awb,
            "origin": "INDIA",
            "destination": "UK",
            "bookingDate": "14-JUN-2025",
            "weight": "1.5kg",
            "history": [
                {"status": "Booked", "location": "DELHI", "date": "14-JUN-2025", "time": "09:30"},
                {"status": "In Transit", "location": "MUMBAI", "date": "15-JUN-2025", "time": "18:05"}
            ]
        }
    })
}

/// A carrier envelope whose embedded status is `ERROR`.
pub fn error_envelope(message: Option<&str>) -> Value {
    let mut data = json!({"status": "ERROR"});
    if let Some(message) = message {
        data["message"] = json!(message);
    }
    json!({"statusCode": 200, "data": data})
}

/// A wrapped CMS collection entry.
pub fn wrapped_entry(id: u64, attributes: Value) -> Value {
    json!({"id": id, "attributes": attributes})
}
