//! HTML screen handlers

use crate::controller::TransactionController;
use crate::error::AppError;
use crate::session::Session;
use crate::types::transaction::TransactionForm;
use crate::web::views::{self, DashboardOutcome};
use crate::web::{AppState, View};
use axum::extract::rejection::FormRejection;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::Form;
use serde::Deserialize;
use tracing::info;

#[derive(Debug, Deserialize)]
pub struct NavQuery {
    pub view: Option<String>,
}

/// View router: render the selected screen
pub async fn index(
    State(state): State<AppState>,
    session: Session,
    Query(nav): Query<NavQuery>,
) -> Html<String> {
    let view = View::from_slug(nav.view.as_deref());
    let ctx = state.page(view);

    let body = match view {
        View::Dashboard => views::dashboard(&ctx, None, DashboardOutcome::Empty),
        View::History => {
            let records = session.history.lock().list();
            views::history(&ctx, &records, None)
        }
        View::About => views::about(&ctx),
    };

    Html(body)
}

/// Dashboard form submission
pub async fn analyze(
    State(state): State<AppState>,
    session: Session,
    form: Result<Form<TransactionForm>, FormRejection>,
) -> Response {
    let ctx = state.page(View::Dashboard);

    let Form(form) = match form {
        Ok(form) => form,
        Err(rejection) => {
            let err = AppError::Validation(format!(
                "Please fill in every field with a valid number ({})",
                rejection.body_text()
            ));
            let body = views::dashboard(&ctx, None, DashboardOutcome::Error(&err.user_message()));
            return (err.status(), Html(body)).into_response();
        }
    };

    let controller = TransactionController::new(
        &state.engine,
        &state.metrics,
        state.config.ui.processing_delay(),
    );

    match controller.submit(form.clone(), &session.history).await {
        Ok(submission) => {
            // count changed, rebuild the chrome
            let ctx = state.page(View::Dashboard);
            let body = views::dashboard(&ctx, Some(&form), DashboardOutcome::Verdict(&submission.verdict));
            Html(body).into_response()
        }
        Err(err) => {
            let body = views::dashboard(&ctx, Some(&form), DashboardOutcome::Error(&err.user_message()));
            (err.status(), Html(body)).into_response()
        }
    }
}

/// "Clear History" action
pub async fn clear_history(State(state): State<AppState>, session: Session) -> (StatusCode, Html<String>) {
    let removed = session.history.lock().clear();
    info!(session = %session.id, removed = removed, "History cleared");

    let ctx = state.page(View::History);
    (
        StatusCode::OK,
        Html(views::history(&ctx, &[], Some("History cleared!"))),
    )
}
