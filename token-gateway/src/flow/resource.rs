use crate::errors::FlowError;
use crate::models::ResourceRecord;
use http::header::{ACCEPT, AUTHORIZATION};
use log::debug;
use reqwest::Client;

/// Fetches the caller's resource record with the access token as bearer credential
pub async fn fetch_resource(
    client: &Client,
    url: &str,
    access_token: &str,
) -> Result<ResourceRecord, FlowError> {
    debug!("Fetching resource record from: {}", url);
    let response = client
        .get(url)
        .header(AUTHORIZATION, format!("Bearer {access_token}"))
        .header(ACCEPT, "application/json")
        .send()
        .await
        .map_err(|e| FlowError::UpstreamResource(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        return Err(FlowError::UpstreamResource(format!(
            "resource API returned status {status}"
        )));
    }

    let body = response
        .bytes()
        .await
        .map_err(|e| FlowError::UpstreamResource(e.to_string()))?;
    let record: ResourceRecord = serde_json::from_slice(&body)
        .map_err(|e| FlowError::UpstreamResource(format!("invalid resource record: {e}")))?;

    debug!(
        "Fetched {} transactions (userId present: {})",
        record.transactions.len(),
        record.user_id.is_some()
    );
    Ok(record)
}
