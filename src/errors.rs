use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Body returned for any failure inside `/chat`. Details stay in the logs.
pub const CHAT_FAILURE: &str = "Intent analysis or API call failed.";

pub const LOGIN_FAILURE: &str = "Login failed";

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("AI provider error: {0}")]
    Ai(String),

    #[error("login rejected ({status}): {message}")]
    Login { status: StatusCode, message: String },
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::Ai(_) => (StatusCode::INTERNAL_SERVER_ERROR, CHAT_FAILURE.to_string()),
            AppError::Login { status, message } => (status, message),
        };

        let body = serde_json::json!({ "error": message });
        (status, axum::Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_ai_error_hides_detail() {
        let res = AppError::Ai("connection refused".to_string()).into_response();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = axum::body::to_bytes(res.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], CHAT_FAILURE);
    }

    #[tokio::test]
    async fn test_login_error_mirrors_status() {
        let res = AppError::Login {
            status: StatusCode::UNAUTHORIZED,
            message: "Invalid credentials".to_string(),
        }
        .into_response();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        let body = axum::body::to_bytes(res.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], "Invalid credentials");
    }
}
