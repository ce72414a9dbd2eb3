//! HTTP surface: the three-screen UI and a small JSON API

pub mod api;
pub mod handlers;
pub mod views;

use crate::animation::AnimationAssets;
use crate::config::AppConfig;
use crate::metrics::PredictionMetrics;
use crate::models::inference::InferenceEngine;
use crate::session::{attach_session, SessionRegistry};
use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{compression::CompressionLayer, trace::TraceLayer};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<InferenceEngine>,
    pub sessions: Arc<SessionRegistry>,
    pub animations: Arc<AnimationAssets>,
    pub metrics: Arc<PredictionMetrics>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(engine: InferenceEngine, animations: AnimationAssets, config: AppConfig) -> Self {
        let sessions = SessionRegistry::new(
            config.session.history_capacity(),
            config.session.idle_timeout(),
            config.session.session_limit(),
        );

        Self {
            engine: Arc::new(engine),
            sessions: Arc::new(sessions),
            animations: Arc::new(animations),
            metrics: Arc::new(PredictionMetrics::new()),
            config: Arc::new(config),
        }
    }

    /// Render context for a screen
    pub fn page(&self, view: View) -> PageContext<'_> {
        PageContext {
            view,
            animations: &self.animations,
            model_name: self.engine.model_name(),
            predictions: self.metrics.predictions.load(Ordering::Relaxed),
        }
    }
}

/// Navigation menu entries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Dashboard,
    History,
    About,
}

impl View {
    pub const ALL: [View; 3] = [View::Dashboard, View::History, View::About];

    pub fn slug(self) -> &'static str {
        match self {
            View::Dashboard => "dashboard",
            View::History => "history",
            View::About => "about",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            View::Dashboard => "Dashboard",
            View::History => "History",
            View::About => "About System",
        }
    }

    /// Unknown or missing selections land on the dashboard
    pub fn from_slug(slug: Option<&str>) -> Self {
        slug.and_then(|s| Self::ALL.into_iter().find(|v| v.slug().eq_ignore_ascii_case(s.trim())))
            .unwrap_or_default()
    }
}

/// Everything the page chrome needs
pub struct PageContext<'a> {
    pub view: View,
    pub animations: &'a AnimationAssets,
    pub model_name: &'a str,
    pub predictions: u64,
}

/// Create the main router with all routes
pub fn router(state: AppState) -> Router {
    let session_routes = Router::new()
        .route("/", get(handlers::index))
        .route("/analyze", post(handlers::analyze))
        .route("/history/clear", post(handlers::clear_history))
        .route("/api/v1/predict", post(api::predict))
        .route(
            "/api/v1/history",
            get(api::list_history).delete(api::clear_history),
        )
        .layer(middleware::from_fn_with_state(
            state.sessions.clone(),
            attach_session,
        ));

    Router::new()
        .route("/health", get(api::health))
        .merge(session_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new()),
        )
        .with_state(state)
}
