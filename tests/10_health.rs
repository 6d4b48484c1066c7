mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::json;

#[tokio::test]
async fn health_endpoint_responds() -> Result<()> {
    let server = common::seeded_server().await?;

    let (status, body) = common::json_response(server.get("/health").send().await?).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    Ok(())
}

#[tokio::test]
async fn unknown_route_uses_error_envelope() -> Result<()> {
    let server = common::seeded_server().await?;

    let (status, body) = common::json_response(server.get("/no-such-thing").send().await?).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"error": {"message": "Not Found", "status": 404}}));
    Ok(())
}
