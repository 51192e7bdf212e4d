use anyhow::Context;
use async_trait::async_trait;
use serde_json::json;

use super::LlmProvider;

pub struct OllamaProvider {
    url: String,
    model: String,
    client: reqwest::Client,
}

impl OllamaProvider {
    pub fn new(url: String, model: String, client: reqwest::Client) -> Self {
        Self {
            url: url.trim_end_matches('/').to_string(),
            model,
            client,
        }
    }
}

#[async_trait]
impl LlmProvider for OllamaProvider {
    async fn generate(&self, prompt: &str) -> anyhow::Result<String> {
        let body = json!({
            "model": self.model,
            "prompt": prompt,
            "stream": false,
        });

        let resp = self
            .client
            .post(format!("{}/api/generate", self.url))
            .json(&body)
            .send()
            .await
            .context("failed to call Ollama API")?;

        let status = resp.status();
        let data: serde_json::Value = resp
            .json()
            .await
            .context("failed to parse Ollama response")?;

        if !status.is_success() {
            anyhow::bail!("Ollama API error ({}): {}", status, data);
        }

        data["response"]
            .as_str()
            .map(|s| s.to_string())
            .ok_or_else(|| anyhow::anyhow!("missing response in Ollama reply"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use axum::routing::post;
    use axum::{Json, Router};

    async fn serve(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    #[tokio::test]
    async fn test_generate_sends_non_streaming_request() {
        let app = Router::new().route(
            "/api/generate",
            post(|Json(body): Json<serde_json::Value>| async move {
                assert_eq!(body["model"], "mistral");
                assert_eq!(body["stream"], false);
                let prompt = body["prompt"].as_str().unwrap_or_default();
                Json(json!({ "response": format!("echo:{}", prompt.len()) }))
            }),
        );
        let url = serve(app).await;

        let provider = OllamaProvider::new(url, "mistral".to_string(), reqwest::Client::new());
        let reply = provider.generate("hello").await.unwrap();
        assert_eq!(reply, "echo:5");
    }

    #[tokio::test]
    async fn test_generate_fails_on_error_status() {
        let app = Router::new().route(
            "/api/generate",
            post(|| async {
                (
                    StatusCode::NOT_FOUND,
                    Json(json!({ "error": "model 'mistral' not found" })),
                )
            }),
        );
        let url = serve(app).await;

        let provider = OllamaProvider::new(url, "mistral".to_string(), reqwest::Client::new());
        let err = provider.generate("hello").await.unwrap_err();
        assert!(err.to_string().contains("404"));
    }

    #[tokio::test]
    async fn test_generate_fails_without_response_field() {
        let app = Router::new().route("/api/generate", post(|| async { Json(json!({})) }));
        let url = serve(app).await;

        let provider = OllamaProvider::new(url, "mistral".to_string(), reqwest::Client::new());
        assert!(provider.generate("hello").await.is_err());
    }
}
