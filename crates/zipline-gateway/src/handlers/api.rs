use crate::error::{AppError, Result};
use crate::handlers::parse_absolute_url;
use crate::handlers::pages::custom_ttl_from;
use crate::state::AppState;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use zipline_core::ShortenRequest;

#[derive(Debug, Deserialize)]
pub struct CreateUrlRequest {
    pub url: String,
    pub ttl_days: Option<u64>,
    pub ttl_hours: Option<u64>,
}

#[derive(Debug, Serialize)]
pub struct UrlResponse {
    pub code: String,
    pub short_url: String,
}

pub async fn create_url_handler(
    State(state): State<AppState>,
    Json(request): Json<CreateUrlRequest>,
) -> Result<(StatusCode, Json<UrlResponse>)> {
    let url = parse_absolute_url(&request.url)
        .ok_or_else(|| AppError::Validation("url must be an absolute http(s) URL".to_string()))?;

    let code = state
        .shortener
        .shorten(ShortenRequest {
            original_url: url.to_string(),
            custom_ttl: custom_ttl_from(request.ttl_days, request.ttl_hours),
        })
        .await?;

    let response = UrlResponse {
        short_url: code.to_url(&state.base_url),
        code: code.to_string(),
    };
    Ok((StatusCode::CREATED, Json(response)))
}
