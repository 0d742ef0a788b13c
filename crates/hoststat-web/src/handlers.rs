//! HTTP request handlers.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use hoststat_core::model::MetricsSnapshot;

use crate::state::AppState;

/// Response envelope shared by the `/rest` endpoints.
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct StatisticsResponse {
    pub(crate) result: Option<MetricsSnapshot>,
    pub(crate) message: String,
    pub(crate) status_code: u16,
}

impl StatisticsResponse {
    fn success(snapshot: MetricsSnapshot) -> Self {
        Self {
            result: Some(snapshot),
            message: "Success".to_string(),
            status_code: StatusCode::OK.as_u16(),
        }
    }

    fn failure(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            result: None,
            message: message.into(),
            status_code: status.as_u16(),
        }
    }
}

// ============================================================
// Health
// ============================================================

#[utoipa::path(
    get,
    path = "/api/v1/health",
    responses(
        (status = 200, description = "Service is healthy", body = String)
    )
)]
pub(crate) async fn handle_health() -> &'static str {
    "ok"
}

// ============================================================
// Statistics
// ============================================================

#[utoipa::path(
    get,
    path = "/rest/server/statistics",
    responses(
        (status = 200, description = "Fresh host metrics snapshot", body = StatisticsResponse),
        (status = 500, description = "Collection task failed", body = StatisticsResponse)
    )
)]
pub(crate) async fn handle_statistics(
    State(state): State<AppState>,
) -> (StatusCode, Json<StatisticsResponse>) {
    let provider = state.provider.clone();
    // Collection sleeps while sampling CPU load; keep it off the async workers.
    match tokio::task::spawn_blocking(move || provider.collect()).await {
        Ok(snapshot) => {
            debug!(
                volumes = snapshot.file_system_volumes.len(),
                "served statistics"
            );
            (StatusCode::OK, Json(StatisticsResponse::success(snapshot)))
        }
        Err(e) => {
            error!(error = %e, "statistics collection task failed");
            let status = StatusCode::INTERNAL_SERVER_ERROR;
            (
                status,
                Json(StatisticsResponse::failure(
                    status,
                    format!("statistics collection failed: {e}"),
                )),
            )
        }
    }
}
