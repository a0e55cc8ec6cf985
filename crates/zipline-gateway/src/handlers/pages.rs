use crate::error::{AppError, Result};
use crate::handlers::parse_absolute_url;
use crate::render;
use crate::state::AppState;
use axum::extract::State;
use axum::response::Html;
use axum::Form;
use serde::Deserialize;
use zipline_core::{CustomTtl, ShortenRequest};

pub async fn index_handler() -> Html<String> {
    render::index_page()
}

pub async fn health_handler() -> &'static str {
    "ok"
}

/// Submission form. The TTL fields arrive as strings because empty
/// number inputs are posted as empty strings, which would fail a
/// direct `Option<u64>` deserialization.
#[derive(Debug, Deserialize)]
pub struct ShortenForm {
    #[serde(rename = "inputURL")]
    pub input_url: String,
    #[serde(rename = "ttlDays", default)]
    pub ttl_days: Option<String>,
    #[serde(rename = "ttlHours", default)]
    pub ttl_hours: Option<String>,
}

fn parse_ttl_field(field: Option<&str>, name: &str) -> Result<Option<u64>> {
    match field.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value.parse::<u64>().map(Some).map_err(|_| {
            AppError::Validation(format!("{name} must be a non-negative whole number"))
        }),
    }
}

pub(crate) fn custom_ttl_from(days: Option<u64>, hours: Option<u64>) -> Option<CustomTtl> {
    if days.is_none() && hours.is_none() {
        return None;
    }
    Some(CustomTtl::new(days.unwrap_or(0), hours.unwrap_or(0)))
}

pub async fn shorten_form_handler(
    State(state): State<AppState>,
    Form(form): Form<ShortenForm>,
) -> Result<Html<String>> {
    let url = parse_absolute_url(&form.input_url)
        .ok_or_else(|| AppError::Validation("that is not a valid absolute URL".to_string()))?;

    let days = parse_ttl_field(form.ttl_days.as_deref(), "expiry days")?;
    let hours = parse_ttl_field(form.ttl_hours.as_deref(), "expiry hours")?;

    let request = ShortenRequest {
        original_url: url.to_string(),
        custom_ttl: custom_ttl_from(days, hours),
    };

    let code = state.shortener.shorten(request).await?;
    Ok(render::result_page(
        &code.to_url(&state.base_url),
        url.as_str(),
    ))
}
