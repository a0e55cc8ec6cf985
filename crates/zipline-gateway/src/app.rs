use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::handlers::pages::{health_handler, index_handler, shorten_form_handler};
use crate::handlers::{api, bot, redirect};
use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    let mut router = Router::new()
        .route("/", get(index_handler))
        .route("/new", post(shorten_form_handler))
        .route("/api/urls", post(api::create_url_handler))
        .route("/health", get(health_handler))
        .route("/{code}", get(redirect::redirect_handler));

    if state.line.is_some() {
        router = router.route("/bot/callback", post(bot::webhook_handler));
    }

    router
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
