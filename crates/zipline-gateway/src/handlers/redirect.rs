use crate::error::Result;
use crate::render;
use crate::state::AppState;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use tracing::trace;
use zipline_core::ShortCode;

pub async fn redirect_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<Response> {
    // A path segment that is not a well-formed code cannot exist in
    // either tier; short-circuit without touching the backends.
    let Ok(code) = ShortCode::new(code) else {
        trace!("malformed short code in path");
        return Ok(not_found());
    };

    match state.resolver.resolve(&code).await? {
        Some(url) => Ok(Redirect::permanent(&url).into_response()),
        None => Ok(not_found()),
    }
}

fn not_found() -> Response {
    (StatusCode::NOT_FOUND, render::not_found_page()).into_response()
}
