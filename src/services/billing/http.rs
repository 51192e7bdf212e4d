use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::StatusCode;
use serde_json::Value;

use super::{BillingBackend, BillingCall, BillingOutcome};
use crate::errors::{AppError, LOGIN_FAILURE};

pub struct HttpBillingBackend {
    base_url: String,
    client: reqwest::Client,
}

impl HttpBillingBackend {
    pub fn new(base_url: String, client: reqwest::Client) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }
}

#[async_trait]
impl BillingBackend for HttpBillingBackend {
    async fn send(&self, call: &BillingCall, auth_token: &str) -> BillingOutcome {
        let url = format!("{}{}", self.base_url, call.path);

        let resp = match self
            .client
            .request(call.method.clone(), &url)
            .query(&call.query)
            .header(AUTHORIZATION, auth_token)
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await
        {
            Ok(resp) => resp,
            Err(e) => return BillingOutcome::TransportError(format!("no response: {e}")),
        };

        let status = resp.status();
        if status == StatusCode::CONFLICT {
            return BillingOutcome::NotFound;
        }
        if !status.is_success() {
            return BillingOutcome::TransportError(format!("status {status}"));
        }

        match resp.text().await {
            // Non-JSON success bodies are kept as a JSON string.
            Ok(body) => match serde_json::from_str(&body) {
                Ok(payload) => BillingOutcome::Found(payload),
                Err(_) => BillingOutcome::Found(Value::String(body)),
            },
            Err(e) => BillingOutcome::TransportError(format!("failed to read body: {e}")),
        }
    }

    async fn login(
        &self,
        username: Option<&str>,
        password: Option<&str>,
    ) -> Result<Option<Value>, AppError> {
        let mut query = Vec::new();
        if let Some(username) = username {
            query.push(("username", username));
        }
        if let Some(password) = password {
            query.push(("password", password));
        }

        let resp = self
            .client
            .post(format!("{}/auth/login", self.base_url))
            .query(&query)
            .send()
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, "login request got no response");
                AppError::Login {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    message: LOGIN_FAILURE.to_string(),
                }
            })?;

        let status = resp.status();
        let data: Value = resp.json().await.unwrap_or(Value::Null);

        if !status.is_success() {
            tracing::warn!(status = %status, body = %data, "login rejected by auth API");
            let message = data["error"]
                .as_str()
                .filter(|m| !m.is_empty())
                .unwrap_or(LOGIN_FAILURE)
                .to_string();
            return Err(AppError::Login { status, message });
        }

        Ok(data.get("token").cloned())
    }
}
