//! Outgoing and incoming webhook helpers.

use serde_json::Value;
use tracing::debug;

/// POST `data` as JSON to `url` and hand back the response.
///
/// Only transport failures are errors; the caller decides what a non-2xx status means.
pub async fn send_webhook(
    client: &reqwest::Client,
    url: &str,
    data: &Value,
) -> anyhow::Result<reqwest::Response> {
    let response = client.post(url).json(data).send().await?;
    debug!(url, status = %response.status(), "webhook delivered");
    Ok(response)
}

/// Acknowledge an incoming webhook payload.
pub fn process_webhook(data: &Value) -> String {
    format!("Webhook received with data: {data}")
}
