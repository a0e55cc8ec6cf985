//! Thin client for the LINE messaging reply API, plus the webhook
//! payload shapes the bot handler consumes.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use tracing::debug;

type HmacSha256 = Hmac<Sha256>;

const REPLY_ENDPOINT: &str = "https://api.line.me/v2/bot/message/reply";

/// Client for the LINE messaging channel: verifies inbound webhook
/// signatures with the channel secret and sends replies with the
/// channel token.
#[derive(Debug, Clone)]
pub struct LineClient {
    http: reqwest::Client,
    channel_token: String,
    channel_secret: String,
}

#[derive(Debug, Serialize)]
struct ReplyRequest<'a> {
    #[serde(rename = "replyToken")]
    reply_token: &'a str,
    messages: Vec<TextMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct TextMessage<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    text: &'a str,
}

impl LineClient {
    pub fn new(channel_token: impl Into<String>, channel_secret: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            channel_token: channel_token.into(),
            channel_secret: channel_secret.into(),
        }
    }

    /// Checks an `x-line-signature` header value against the raw
    /// request body: base64 of HMAC-SHA256 over the body, keyed by the
    /// channel secret. Anything that does not verify is rejected,
    /// including undecodable signatures.
    pub fn verify_signature(&self, signature: &str, body: &[u8]) -> bool {
        let Ok(mut mac) = HmacSha256::new_from_slice(self.channel_secret.as_bytes()) else {
            return false;
        };
        mac.update(body);

        let Ok(claimed) = STANDARD.decode(signature) else {
            return false;
        };
        mac.verify_slice(&claimed).is_ok()
    }

    /// Sends a single text message in reply to a webhook event.
    pub async fn reply(&self, reply_token: &str, text: &str) -> Result<(), reqwest::Error> {
        let body = ReplyRequest {
            reply_token,
            messages: vec![TextMessage { kind: "text", text }],
        };

        self.http
            .post(REPLY_ENDPOINT)
            .bearer_auth(&self.channel_token)
            .json(&body)
            .send()
            .await?
            .error_for_status()?;

        debug!("sent line reply");
        Ok(())
    }
}

/// Webhook request body: a batch of events.
#[derive(Debug, Deserialize)]
pub struct WebhookPayload {
    #[serde(default)]
    pub events: Vec<WebhookEvent>,
}

#[derive(Debug, Deserialize)]
pub struct WebhookEvent {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(rename = "replyToken")]
    pub reply_token: Option<String>,
    pub message: Option<EventMessage>,
}

#[derive(Debug, Deserialize)]
pub struct EventMessage {
    #[serde(rename = "type")]
    pub kind: String,
    pub text: Option<String>,
}
