// ── Socratic Engine: Invite Redemption ─────────────────────────────────────
// One-shot redemption of a Sensay invitation code for an organization API
// key. Lives outside the chat path entirely; the returned key is shown to
// the operator once and never stored by the engine.

use log::info;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::atoms::constants::SENSAY_BASE_URL;
use crate::atoms::error::{EngineError, EngineResult};
use crate::engine::sensay::extract_api_error;

#[derive(Debug, Serialize)]
pub struct RedeemRequest {
    #[serde(rename = "organizationName")]
    pub organization_name: String,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct RedeemResponse {
    #[serde(rename = "apiKey")]
    pub api_key: String,
    #[serde(rename = "organizationID")]
    pub organization_id: String,
    #[serde(rename = "validUntil", default)]
    pub valid_until: Option<String>,
}

/// Redeem `code` for an organization API key.
pub async fn redeem_invite(
    base_url: &str,
    code: &str,
    request: &RedeemRequest,
) -> EngineResult<RedeemResponse> {
    let url = format!(
        "{}/v1/api-keys/invites/{}/redeem",
        base_url.trim_end_matches('/'),
        code
    );
    info!("[invites] redeeming invitation code");

    let resp = Client::new().post(&url).json(request).send().await?;

    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(EngineError::from_status(
            status.as_u16(),
            extract_api_error(status, &body),
        ));
    }
    Ok(resp.json::<RedeemResponse>().await?)
}

/// Redeem against the production service.
pub async fn redeem(code: &str, request: &RedeemRequest) -> EngineResult<RedeemResponse> {
    redeem_invite(SENSAY_BASE_URL, code, request).await
}
