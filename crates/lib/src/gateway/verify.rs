//! Webhook subscription handshake (`hub.mode` / `hub.verify_token` / `hub.challenge`).

use serde::Deserialize;

/// Query parameters of the verification GET.
#[derive(Debug, Default, Deserialize)]
pub struct VerifyParams {
    #[serde(rename = "hub.mode")]
    pub mode: Option<String>,
    #[serde(rename = "hub.verify_token")]
    pub token: Option<String>,
    #[serde(rename = "hub.challenge")]
    pub challenge: Option<String>,
}

/// Returns the challenge to echo when the request is a subscribe with the expected token.
/// `None` means forbidden, including when no token is configured.
pub fn verify_subscription(params: &VerifyParams, expected: Option<&str>) -> Option<String> {
    let expected = expected?;
    if params.mode.as_deref() == Some("subscribe") && params.token.as_deref() == Some(expected) {
        Some(params.challenge.clone().unwrap_or_default())
    } else {
        None
    }
}
