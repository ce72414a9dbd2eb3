//! JSON API handlers

use crate::controller::TransactionController;
use crate::error::AppResult;
use crate::metrics::MetricsSnapshot;
use crate::session::Session;
use crate::types::history::HistoryRecord;
use crate::types::prediction::Verdict;
use crate::types::transaction::TransactionForm;
use crate::web::AppState;
use axum::extract::State;
use axum::Json;
use serde::Serialize;
use tracing::info;

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    version: &'static str,
    model: String,
    active_sessions: usize,
    animations_loaded: usize,
    metrics: MetricsSnapshot,
    timestamp: i64,
}

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        model: state.engine.model_name().to_string(),
        active_sessions: state.sessions.active_count(),
        animations_loaded: state.animations.loaded_count(),
        metrics: state.metrics.snapshot(),
        timestamp: chrono::Utc::now().timestamp(),
    })
}

#[derive(Debug, Serialize)]
pub struct PredictResponse {
    pub verdict: Verdict,
    pub record: HistoryRecord,
}

/// Score a transaction and add it to the caller's session history
pub async fn predict(
    State(state): State<AppState>,
    session: Session,
    Json(form): Json<TransactionForm>,
) -> AppResult<Json<PredictResponse>> {
    let controller = TransactionController::new(
        &state.engine,
        &state.metrics,
        state.config.ui.processing_delay(),
    );

    let submission = controller.submit(form, &session.history).await?;

    Ok(Json(PredictResponse {
        verdict: submission.verdict,
        record: submission.record,
    }))
}

pub async fn list_history(session: Session) -> Json<Vec<HistoryRecord>> {
    Json(session.history.lock().list())
}

#[derive(Debug, Serialize)]
pub struct ClearResponse {
    pub cleared: usize,
}

pub async fn clear_history(session: Session) -> Json<ClearResponse> {
    let cleared = session.history.lock().clear();
    info!(session = %session.id, removed = cleared, "History cleared");
    Json(ClearResponse { cleared })
}
