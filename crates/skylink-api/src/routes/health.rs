//! `GET /api/health`

use crate::server::SharedState;
use axum::Json;
use axum::extract::State;
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use skylink_client::CmsStatus;
use skylink_core::SkylinkConfig;

/// Overall service status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    /// Everything reachable, or nothing configured to check.
    Healthy,
    /// The CMS answered badly or not at all.
    Degraded,
}

/// Individual checks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthChecks {
    /// CMS reachability.
    pub strapi: CmsStatus,
    /// Resident set size in MB, when the platform exposes it.
    pub memory: Option<u64>,
    /// Seconds since the server started.
    pub uptime: u64,
}

/// Health response body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthResponse {
    /// `healthy` or `degraded`.
    pub status: HealthStatus,
    /// RFC 3339 UTC timestamp with millisecond precision.
    pub timestamp: String,
    /// Deployment environment name.
    pub environment: String,
    /// Service name.
    pub service: String,
    /// Individual checks.
    pub checks: HealthChecks,
}

impl HealthResponse {
    /// Assembles a response stamped with the current time.
    pub fn new(config: &SkylinkConfig, checks: HealthChecks) -> Self {
        let status = if checks.strapi.is_degraded() {
            HealthStatus::Degraded
        } else {
            HealthStatus::Healthy
        };

        Self {
            status,
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            environment: config.environment.clone(),
            service: config.service.clone(),
            checks,
        }
    }
}

/// Reports status. Always 200; degradation is in the body.
pub async fn health_handler(State(state): State<SharedState>) -> Json<HealthResponse> {
    let checks = HealthChecks {
        strapi: state.cms.probe().await,
        memory: resident_memory_mb().await,
        uptime: state.uptime().as_secs(),
    };

    let response = HealthResponse::new(&state.config, checks);
    if response.status == HealthStatus::Degraded {
        tracing::warn!(strapi = %response.checks.strapi, "Health check degraded");
    }
    Json(response)
}

async fn resident_memory_mb() -> Option<u64> {
    let status = tokio::fs::read_to_string("/proc/self/status").await.ok()?;
    parse_vm_rss_mb(&status)
}

/// Extracts `VmRSS` from `/proc/self/status`, rounded to MB.
fn parse_vm_rss_mb(status: &str) -> Option<u64> {
    let line = status.lines().find(|l| l.starts_with("VmRSS:"))?;
    let kb: u64 = line.split_whitespace().nth(1)?.parse().ok()?;
    Some((kb + 512) / 1024)
}
