//! Health check endpoints for Kubernetes-style probes.
//!
//! - `/livez` - Basic liveness probe (immediate 200, no checks)
//! - `/healthz` - Per-kind cache counters (fast, passive stats)

use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};

use reservas_core::cache::CacheStats;

use crate::state::AppState;

/// GET /livez - Basic liveness probe.
///
/// Returns 200 immediately. Used to check if the server is accepting connections.
#[axum::debug_handler]
pub async fn livez() -> StatusCode {
    StatusCode::OK
}

/// GET /healthz - Cache counters for every kind.
///
/// Cache faults never fail a request, so this is where they show up.
#[axum::debug_handler]
pub async fn healthz(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "cache": {
            "auth": stats_json(state.auths.stats()),
            "notification": stats_json(state.notifications.stats()),
            "reservation": stats_json(state.reservations.stats()),
        }
    }))
}

fn stats_json(stats: &CacheStats) -> Value {
    let snapshot = stats.snapshot();
    let mut value = json!(snapshot);
    value["hitRatio"] = json!(snapshot.hit_ratio());
    value
}
