//! End-to-end tests driving the router with a stub classifier

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use fraudshield::{router, AnimationAssets, AppConfig, AppState, FraudModel, InferenceEngine, ModelOutput};
use serde_json::{json, Value};
use tower::ServiceExt;

/// Returns the same class and probability for every row
struct FixedModel {
    class: i64,
    probability: f64,
}

impl FraudModel for FixedModel {
    fn predict(&self, features: &[f32]) -> anyhow::Result<ModelOutput> {
        assert_eq!(features.len(), 4);
        Ok(ModelOutput {
            class: self.class,
            fraud_probability: self.probability,
        })
    }

    fn name(&self) -> &str {
        "fixed"
    }
}

struct FailingModel;

impl FraudModel for FailingModel {
    fn predict(&self, _features: &[f32]) -> anyhow::Result<ModelOutput> {
        anyhow::bail!("feature row rejected by model")
    }

    fn name(&self) -> &str {
        "failing"
    }
}

fn app_with<M: FraudModel + 'static>(model: M) -> Router {
    let mut config = AppConfig::default();
    config.ui.processing_delay_ms = 0;
    config.animations.enabled = false;

    let state = AppState::new(
        InferenceEngine::with_model(model),
        AnimationAssets::default(),
        config,
    );
    router(state)
}

fn fraud_app() -> Router {
    app_with(FixedModel {
        class: 1,
        probability: 0.91,
    })
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Option<String>, String) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(str::to_string);
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, cookie, String::from_utf8(body.to_vec()).unwrap())
}

fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(Method::GET).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

fn post_form(uri: &str, cookie: Option<&str>, body: &str) -> Request<Body> {
    let mut builder = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn post_json(uri: &str, cookie: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

/// Open a session and return its cookie
async fn start_session(app: &Router) -> String {
    let (status, cookie, _) = send(app, get("/", None)).await;
    assert_eq!(status, StatusCode::OK);
    cookie.expect("first visit issues a session cookie")
}

async fn history(app: &Router, cookie: &str) -> Vec<Value> {
    let (status, _, body) = send(app, get("/api/v1/history", Some(cookie))).await;
    assert_eq!(status, StatusCode::OK);
    serde_json::from_str(&body).unwrap()
}

#[tokio::test]
async fn dashboard_is_default_view() {
    let app = fraud_app();
    let (status, cookie, body) = send(&app, get("/", None)).await;

    assert_eq!(status, StatusCode::OK);
    assert!(cookie.unwrap().starts_with("fraudshield_session="));
    assert!(body.contains("Fraud Transaction Detection"));
    assert!(body.contains("Model Status: ✅ ACTIVE"));
    // no animations were loaded
    assert!(body.contains("Animation not available."));
}

#[tokio::test]
async fn known_session_is_not_reissued() {
    let app = fraud_app();
    let cookie = start_session(&app).await;

    let (_, reissued, _) = send(&app, get("/", Some(&cookie))).await;
    assert!(reissued.is_none());
}

#[tokio::test]
async fn view_router_selects_screens() {
    let app = fraud_app();
    let cookie = start_session(&app).await;

    let (_, _, about) = send(&app, get("/?view=about", Some(&cookie))).await;
    assert!(about.contains("About FraudShield AI"));

    let (_, _, history) = send(&app, get("/?view=history", Some(&cookie))).await;
    assert!(history.contains("Prediction History"));
    assert!(history.contains("No history available yet."));

    let (status, _, unknown) = send(&app, get("/?view=settings", Some(&cookie))).await;
    assert_eq!(status, StatusCode::OK);
    assert!(unknown.contains("Fraud Transaction Detection"));
}

#[tokio::test]
async fn fraud_submission_renders_verdict_and_records_history() {
    let app = fraud_app();
    let cookie = start_session(&app).await;

    let (status, _, body) = send(
        &app,
        post_form("/analyze", Some(&cookie), "amount=250.0&hour=2&day=Sunday&days_since_last=0.0"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("alert-error"));
    assert!(body.contains("Fraud Detected! Probability: <strong>0.91</strong>"));
    assert!(body.contains("Freeze transaction and start manual review."));

    let records = history(&app, &cookie).await;
    assert_eq!(records.len(), 1);
    assert_eq!(
        records[0],
        json!({
            "Amount": 250.0,
            "Hour": 2,
            "Day": "Sunday",
            "Days Since Last": 0.0,
            "Prediction": "FRAUD",
            "Fraud Probability": 0.91
        })
    );

    // navigating away and back keeps the history
    let (_, _, page) = send(&app, get("/?view=about", Some(&cookie))).await;
    assert!(page.contains("About FraudShield AI"));
    let (_, _, page) = send(&app, get("/?view=history", Some(&cookie))).await;
    assert!(page.contains("<td>Sunday</td>"));
}

#[tokio::test]
async fn legit_submission_renders_success() {
    let app = app_with(FixedModel {
        class: 0,
        probability: 0.826451,
    });
    let cookie = start_session(&app).await;

    let (status, _, body) = send(
        &app,
        post_form("/analyze", Some(&cookie), "amount=12.5&hour=14&day=Wednesday&days_since_last=3"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("alert-success"));
    assert!(body.contains("Fraud Chance: <strong>0.83</strong>"));
    assert!(body.contains("Transaction safe to approve."));

    let records = history(&app, &cookie).await;
    assert_eq!(records[0]["Fraud Probability"], 0.826);
    assert_eq!(records[0]["Prediction"], "LEGIT");
}

#[tokio::test]
async fn out_of_range_input_is_rejected_without_state_change() {
    let app = fraud_app();
    let cookie = start_session(&app).await;

    for body in [
        "amount=10&hour=24&day=Monday&days_since_last=1",
        "amount=-5&hour=3&day=Monday&days_since_last=1",
        "amount=10&hour=3&day=Monday&days_since_last=-1",
        "amount=10&hour=3&day=Someday&days_since_last=1",
        "amount=&hour=3&day=Monday&days_since_last=1",
        "hour=3&day=Monday",
    ] {
        let (status, _, page) = send(&app, post_form("/analyze", Some(&cookie), body)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "body: {body}");
        assert!(page.contains("alert-error"));
        assert!(!page.contains("Prediction Report"));
    }

    assert!(history(&app, &cookie).await.is_empty());
}

#[tokio::test]
async fn classification_failure_reports_and_skips_history() {
    let app = app_with(FailingModel);
    let cookie = start_session(&app).await;

    let (status, _, body) = send(
        &app,
        post_form("/analyze", Some(&cookie), "amount=10&hour=3&day=Friday&days_since_last=1"),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body.contains("Analysis failed"));
    assert!(!body.contains("feature row rejected"));
    assert!(history(&app, &cookie).await.is_empty());
}

#[tokio::test]
async fn clear_history_empties_view_with_confirmation() {
    let app = fraud_app();
    let cookie = start_session(&app).await;

    for hour in [1, 2] {
        send(
            &app,
            post_form(
                "/analyze",
                Some(&cookie),
                &format!("amount=99.9&hour={hour}&day=Monday&days_since_last=0.5"),
            ),
        )
        .await;
    }
    assert_eq!(history(&app, &cookie).await.len(), 2);

    let (status, _, body) = send(&app, post_form("/history/clear", Some(&cookie), "")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("History cleared!"));
    assert!(body.contains("No history available yet."));
    assert!(history(&app, &cookie).await.is_empty());
}

#[tokio::test]
async fn sessions_do_not_share_history() {
    let app = fraud_app();
    let alice = start_session(&app).await;
    let bob = start_session(&app).await;
    assert_ne!(alice, bob);

    send(
        &app,
        post_form("/analyze", Some(&alice), "amount=1&hour=1&day=Monday&days_since_last=1"),
    )
    .await;

    assert_eq!(history(&app, &alice).await.len(), 1);
    assert!(history(&app, &bob).await.is_empty());
}

#[tokio::test]
async fn json_api_preserves_insertion_order() {
    let app = fraud_app();
    let cookie = start_session(&app).await;

    for amount in [10.0, 20.0, 30.0] {
        let (status, _, body) = send(
            &app,
            post_json(
                "/api/v1/predict",
                Some(&cookie),
                json!({"amount": amount, "hour": 4, "day": "Tuesday", "days_since_last": 2.0}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let response: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(response["verdict"]["label"], "FRAUD");
        assert_eq!(response["verdict"]["display_probability"], "0.91");
        assert_eq!(response["record"]["Amount"], amount);
    }

    let amounts: Vec<f64> = history(&app, &cookie)
        .await
        .iter()
        .map(|r| r["Amount"].as_f64().unwrap())
        .collect();
    assert_eq!(amounts, vec![10.0, 20.0, 30.0]);

    let request = Request::builder()
        .method(Method::DELETE)
        .uri("/api/v1/history")
        .header(header::COOKIE, &cookie)
        .body(Body::empty())
        .unwrap();
    let (status, _, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(serde_json::from_str::<Value>(&body).unwrap()["cleared"], 3);
    assert!(history(&app, &cookie).await.is_empty());
}

#[tokio::test]
async fn json_api_validation_error() {
    let app = fraud_app();
    let cookie = start_session(&app).await;

    let (status, _, body) = send(
        &app,
        post_json(
            "/api/v1/predict",
            Some(&cookie),
            json!({"amount": 5.0, "hour": 99, "day": "Monday", "days_since_last": 0.0}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let error: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(error["status"], 422);
    assert!(history(&app, &cookie).await.is_empty());
}

#[tokio::test]
async fn health_reports_model_and_metrics() {
    let app = fraud_app();
    let cookie = start_session(&app).await;
    send(
        &app,
        post_form("/analyze", Some(&cookie), "amount=1&hour=1&day=Monday&days_since_last=1"),
    )
    .await;

    let (status, cookie_issued, body) = send(&app, get("/health", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(cookie_issued.is_none());

    let health: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(health["status"], "healthy");
    assert_eq!(health["model"], "fixed");
    assert_eq!(health["metrics"]["predictions"], 1);
    assert_eq!(health["metrics"]["fraud_predictions"], 1);
    assert_eq!(health["animations_loaded"], 0);
}
