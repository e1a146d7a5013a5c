//! Common test utilities

#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::util::ServiceExt;

use loan_ledger::api::{self, AppState};
use loan_ledger::notify::{self, DispatcherConfig, Notifier, NotifyError, OutboundMessage};
use loan_ledger::store::InMemoryLoanStore;
use loan_ledger::LoanLedger;

/// Notifier that keeps every delivered message in memory
#[derive(Clone, Default)]
pub struct RecordingNotifier {
    sent: Arc<Mutex<Vec<OutboundMessage>>>,
}

impl RecordingNotifier {
    pub fn sent(&self) -> Vec<OutboundMessage> {
        self.sent.lock().unwrap().clone()
    }

    /// Wait until at least `count` messages were delivered
    pub async fn wait_for(&self, count: usize) -> Vec<OutboundMessage> {
        let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
        loop {
            let sent = self.sent();
            if sent.len() >= count || tokio::time::Instant::now() >= deadline {
                return sent;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    }
}

impl Notifier for RecordingNotifier {
    async fn deliver(&self, message: &OutboundMessage) -> Result<(), NotifyError> {
        self.sent.lock().unwrap().push(message.clone());
        Ok(())
    }
}

/// Build the full application backed by a fresh store and a recording notifier
pub fn setup_app() -> (Router, RecordingNotifier) {
    let recorder = RecordingNotifier::default();
    let (queue, _dispatcher) = notify::spawn_dispatcher(recorder.clone(), DispatcherConfig::default());
    let ledger = LoanLedger::new(Arc::new(InMemoryLoanStore::new()), queue);
    (api::build_app(AppState::new(ledger)), recorder)
}

/// Send a request and decode the JSON response body
pub async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, json)
}

pub fn create_body(principal: &str) -> Value {
    serde_json::json!({
        "borrower_id": "borrower-42",
        "principal_amount": principal,
        "rate": "0.12",
        "roi": "0.08",
        "agreement_letter": "https://docs.example.com/letter-42.pdf"
    })
}

pub fn approve_body() -> Value {
    serde_json::json!({
        "picture_proof": "https://docs.example.com/visit-42.jpg",
        "employee_id": "field-officer-9",
        "approval_date": "2026-02-01T09:00:00Z"
    })
}

pub fn invest_body(investor: &str, amount: &str) -> Value {
    serde_json::json!({ "investor_id": investor, "amount": amount })
}

pub fn disburse_body() -> Value {
    serde_json::json!({
        "signed_agreement_letter": "https://docs.example.com/signed-42.pdf",
        "employee_id": "field-officer-3"
    })
}

/// Create and approve a loan, returning its ID
pub async fn approved_loan(app: &Router, principal: &str) -> String {
    let (status, loan) = send(app, "POST", "/loans", Some(create_body(principal))).await;
    assert_eq!(status, StatusCode::OK, "create failed: {}", loan);
    let id = loan["id"].as_str().unwrap().to_string();

    let (status, loan) = send(app, "POST", &format!("/loans/{}/approve", id), Some(approve_body())).await;
    assert_eq!(status, StatusCode::OK, "approve failed: {}", loan);
    id
}
