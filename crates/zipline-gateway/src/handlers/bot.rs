use crate::handlers::parse_absolute_url;
use crate::line::WebhookPayload;
use crate::state::AppState;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use tracing::{debug, warn};
use zipline_core::ShortenRequest;

/// Header carrying the channel-secret HMAC of the request body.
const SIGNATURE_HEADER: &str = "x-line-signature";

/// Handles LINE webhook callbacks.
///
/// The body is taken raw so the signature check covers the exact bytes
/// LINE delivered; unsigned or mis-signed deliveries are rejected
/// before any parsing. Each text message that parses as an absolute URL
/// is shortened and answered with the short link; anything else gets a
/// rejection reply. Verified deliveries answer 200 even when a reply
/// fails — failures are logged, since LINE retries non-2xx deliveries.
pub async fn webhook_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> StatusCode {
    let Some(line) = state.line.clone() else {
        // Route is only mounted when the client is configured.
        return StatusCode::NOT_FOUND;
    };

    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|value| value.to_str().ok());
    let Some(signature) = signature else {
        warn!("webhook delivery without a signature header");
        return StatusCode::UNAUTHORIZED;
    };
    if !line.verify_signature(signature, &body) {
        warn!("webhook signature did not verify");
        return StatusCode::UNAUTHORIZED;
    }

    let payload: WebhookPayload = match serde_json::from_slice(&body) {
        Ok(payload) => payload,
        Err(e) => {
            warn!(error = %e, "unparseable webhook payload");
            return StatusCode::BAD_REQUEST;
        }
    };

    for event in payload.events {
        if event.kind != "message" {
            continue;
        }
        let Some(reply_token) = event.reply_token.as_deref() else {
            continue;
        };
        let Some(text) = event
            .message
            .as_ref()
            .filter(|m| m.kind == "text")
            .and_then(|m| m.text.as_deref())
        else {
            continue;
        };

        let reply = match parse_absolute_url(text) {
            Some(url) => {
                match state
                    .shortener
                    .shorten(ShortenRequest::new(url.to_string()))
                    .await
                {
                    Ok(code) => {
                        debug!(code = %code, "shortened url from bot message");
                        code.to_url(&state.base_url)
                    }
                    Err(e) => {
                        warn!(error = %e, "bot shorten failed");
                        "Something went wrong, try again later".to_string()
                    }
                }
            }
            None => "It's not a valid url".to_string(),
        };

        if let Err(e) = line.reply(reply_token, &reply).await {
            warn!(error = %e, "line reply failed");
        }
    }

    StatusCode::OK
}
