//! Analysis client tests against an in-process stub of the analysis service.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};

use medinfo_analysis::analyze::{analyze_prescription, is_retryable_error};
use medinfo_analysis::client::{build_client_with, AnalysisClient};
use medinfo_analysis::error::AnalysisError;
use medinfo_analysis::retry::RetryPolicy;

const DELAY: Duration = Duration::from_millis(20);

const OK_BODY: &str = r#"{
    "tests": {"cbc": {"reason1": "fever", "precision1": 0.9}},
    "medicines": {"paracetamol": {"description1": "antipyretic", "precision1": 0.8, "price": 1.5}}
}"#;

#[derive(Clone)]
struct Script {
    statuses: Arc<Mutex<VecDeque<StatusCode>>>,
    calls: Arc<AtomicU32>,
    last_body: Arc<Mutex<Option<serde_json::Value>>>,
    stall: Option<Duration>,
    ok_body: &'static str,
}

impl Script {
    fn new(statuses: &[StatusCode]) -> Self {
        Self {
            statuses: Arc::new(Mutex::new(statuses.iter().copied().collect())),
            calls: Arc::new(AtomicU32::new(0)),
            last_body: Arc::new(Mutex::new(None)),
            stall: None,
            ok_body: OK_BODY,
        }
    }

    fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

async fn handle(State(script): State<Script>, Json(body): Json<serde_json::Value>) -> Response {
    script.calls.fetch_add(1, Ordering::SeqCst);
    *script.last_body.lock().unwrap() = Some(body);

    if let Some(stall) = script.stall {
        tokio::time::sleep(stall).await;
    }

    let status = script
        .statuses
        .lock()
        .unwrap()
        .pop_front()
        .unwrap_or(StatusCode::OK);

    if status == StatusCode::OK {
        (status, script.ok_body).into_response()
    } else {
        (status, "upstream unavailable").into_response()
    }
}

async fn serve(script: Script) -> String {
    let router = Router::new()
        .route("/analyze-prescription", post(handle))
        .with_state(script);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}/analyze-prescription")
}

fn client(endpoint: &str, timeout: Duration) -> AnalysisClient {
    let policy = RetryPolicy {
        max_attempts: 3,
        delay: DELAY,
        is_retryable: is_retryable_error,
    };
    build_client_with(endpoint, timeout, policy).unwrap()
}

#[tokio::test]
async fn sends_base64_image_with_context() {
    let script = Script::new(&[]);
    let endpoint = serve(script.clone()).await;

    analyze_prescription(
        &client(&endpoint, Duration::from_secs(5)),
        b"hello",
        "fever",
        "general",
    )
    .await
    .unwrap();

    let body = script.last_body.lock().unwrap().clone().unwrap();
    assert_eq!(body["file"], "aGVsbG8=");
    assert_eq!(body["symptoms"], "fever");
    assert_eq!(body["doctor_speciality"], "general");
}

#[tokio::test]
async fn success_backfills_names_from_keys() {
    let script = Script::new(&[StatusCode::OK]);
    let endpoint = serve(script.clone()).await;

    let result = analyze_prescription(&client(&endpoint, Duration::from_secs(5)), b"img", "", "")
        .await
        .unwrap();

    assert_eq!(result.tests["cbc"].name, "cbc");
    assert_eq!(result.medicines["paracetamol"].name, "paracetamol");
    assert_eq!(script.calls(), 1);
}

#[tokio::test]
async fn service_unavailable_twice_then_success() {
    let script = Script::new(&[
        StatusCode::SERVICE_UNAVAILABLE,
        StatusCode::SERVICE_UNAVAILABLE,
        StatusCode::OK,
    ]);
    let endpoint = serve(script.clone()).await;

    let started = Instant::now();
    let result =
        analyze_prescription(&client(&endpoint, Duration::from_secs(5)), b"img", "fever", "general")
            .await;

    assert!(result.is_ok());
    assert_eq!(script.calls(), 3);
    assert!(started.elapsed() >= DELAY * 2);
}

#[tokio::test]
async fn gateway_errors_exhaust_after_three_attempts() {
    let script = Script::new(&[
        StatusCode::BAD_GATEWAY,
        StatusCode::GATEWAY_TIMEOUT,
        StatusCode::SERVICE_UNAVAILABLE,
        StatusCode::OK,
    ]);
    let endpoint = serve(script.clone()).await;

    let err = analyze_prescription(&client(&endpoint, Duration::from_secs(5)), b"img", "", "")
        .await
        .unwrap_err();

    match err {
        AnalysisError::RetriesExhausted { attempts, source } => {
            assert_eq!(attempts, 3);
            assert!(matches!(*source, AnalysisError::Upstream { status: 503, .. }));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(script.calls(), 3);
}

#[tokio::test]
async fn client_errors_are_not_retried() {
    for status in [StatusCode::BAD_REQUEST, StatusCode::NOT_FOUND, StatusCode::INTERNAL_SERVER_ERROR] {
        let script = Script::new(&[status, StatusCode::OK]);
        let endpoint = serve(script.clone()).await;

        let err = analyze_prescription(&client(&endpoint, Duration::from_secs(5)), b"img", "", "")
            .await
            .unwrap_err();

        assert!(
            matches!(err, AnalysisError::Upstream { status: s, .. } if s == status.as_u16()),
            "unexpected error for {status}: {err}"
        );
        assert_eq!(script.calls(), 1);
    }
}

#[tokio::test]
async fn malformed_body_is_terminal() {
    let mut script = Script::new(&[StatusCode::OK]);
    script.ok_body = "{not json";
    let endpoint = serve(script.clone()).await;

    let err = analyze_prescription(&client(&endpoint, Duration::from_secs(5)), b"img", "", "")
        .await
        .unwrap_err();

    assert!(matches!(err, AnalysisError::ResponseParse(_)));
    assert_eq!(script.calls(), 1);
}

#[tokio::test]
async fn timeouts_are_retried_until_exhausted() {
    let mut script = Script::new(&[]);
    script.stall = Some(Duration::from_millis(500));
    let endpoint = serve(script.clone()).await;

    let err = analyze_prescription(&client(&endpoint, Duration::from_millis(50)), b"img", "", "")
        .await
        .unwrap_err();

    match err {
        AnalysisError::RetriesExhausted { attempts, source } => {
            assert_eq!(attempts, 3);
            assert!(matches!(*source, AnalysisError::Timeout(_)));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(script.calls(), 3);
}

#[tokio::test]
async fn connection_refused_is_terminal() {
    let err = analyze_prescription(
        &client("http://127.0.0.1:1/analyze-prescription", Duration::from_secs(5)),
        b"img",
        "",
        "",
    )
    .await
    .unwrap_err();

    assert!(matches!(err, AnalysisError::Http(_)));
}
