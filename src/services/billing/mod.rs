pub mod http;

use async_trait::async_trait;
use reqwest::Method;

use crate::errors::AppError;
use crate::models::{month_from_name, BillingIntent, IntentKind, IntentRecord};
use crate::services::formatter::NOT_UNDERSTOOD;

/// Stand-in payload for every failed billing call.
pub const NO_DATA: &str = r#"{"noData":true}"#;

/// One planned request against the billing API.
#[derive(Debug, Clone, PartialEq)]
pub struct BillingCall {
    pub method: Method,
    /// Route under the billing base URL.
    pub path: &'static str,
    pub query: Vec<(&'static str, String)>,
}

impl BillingCall {
    /// `None` when the intent has no billing route.
    pub fn for_intent(intent: &BillingIntent) -> Option<Self> {
        let subscriber = ("subscriberNo", intent.subscriber().to_string());
        let period = || {
            vec![
                subscriber.clone(),
                ("month", normalize_month(intent.month.as_deref())),
                ("year", intent.year().to_string()),
            ]
        };

        let call = match &intent.kind {
            IntentKind::QueryBill => Self::get("/bill/calculate", period()),
            IntentKind::QueryBillDetailed => Self::get("/bill/detailed", period()),
            IntentKind::MakePayment => {
                let mut query = period();
                let amount = intent.amount.clone().unwrap_or_else(|| "0".to_string());
                query.push(("amount", amount));
                BillingCall {
                    method: Method::POST,
                    path: "/bill/pay",
                    query,
                }
            }
            IntentKind::BillHistory => Self::get("/bill/history", vec![subscriber.clone()]),
            IntentKind::Unsupported(_) => return None,
        };
        Some(call)
    }

    fn get(path: &'static str, query: Vec<(&'static str, String)>) -> Self {
        BillingCall {
            method: Method::GET,
            path,
            query,
        }
    }
}

/// Month names become `1`..`12`; anything else is sent as typed.
fn normalize_month(raw: Option<&str>) -> String {
    let raw = raw.unwrap_or_default();
    month_from_name(raw)
        .map(|n| n.to_string())
        .unwrap_or_else(|| raw.to_string())
}

#[derive(Debug, Clone, PartialEq)]
pub enum BillingOutcome {
    Found(serde_json::Value),
    /// The API answered 409: nothing on record for the request.
    NotFound,
    /// Any other error status, or no response at all.
    TransportError(String),
}

impl BillingOutcome {
    /// Collapses both failure cases into the `noData` sentinel.
    pub fn into_json_text(self) -> String {
        match self {
            BillingOutcome::Found(payload) => payload.to_string(),
            BillingOutcome::NotFound | BillingOutcome::TransportError(_) => NO_DATA.to_string(),
        }
    }
}

#[async_trait]
pub trait BillingBackend: Send + Sync {
    async fn send(&self, call: &BillingCall, auth_token: &str) -> BillingOutcome;

    /// Exchanges credentials for the API's `token` value.
    async fn login(
        &self,
        username: Option<&str>,
        password: Option<&str>,
    ) -> Result<Option<serde_json::Value>, AppError>;
}

/// Runs the billing call for `record` and returns the body as JSON text.
///
/// Never fails: unroutable records get a plain-text answer and downstream
/// failures become [`NO_DATA`].
pub async fn call_billing_api(
    backend: &dyn BillingBackend,
    record: &IntentRecord,
    auth_token: Option<&str>,
) -> String {
    let intent = match record {
        IntentRecord::Invalid => return NOT_UNDERSTOOD.to_string(),
        IntentRecord::Valid(intent) => intent,
    };

    let Some(call) = BillingCall::for_intent(intent) else {
        return format!("Unsupported intent: {}", intent.kind);
    };

    let outcome = backend.send(&call, auth_token.unwrap_or_default()).await;
    match &outcome {
        BillingOutcome::Found(_) => {}
        BillingOutcome::NotFound => {
            tracing::info!(intent = %intent.kind, "billing API returned 409, no data");
        }
        BillingOutcome::TransportError(detail) => {
            tracing::warn!(intent = %intent.kind, detail = %detail, "billing API call failed");
        }
    }
    outcome.into_json_text()
}
