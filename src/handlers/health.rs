pub async fn health() -> &'static str {
    "API Gateway is running."
}
