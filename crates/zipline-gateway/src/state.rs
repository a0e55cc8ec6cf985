use crate::line::LineClient;
use std::sync::Arc;
use zipline_core::{Resolver, Shortener};

/// Shared handler state: the two core services behind trait objects,
/// plus boundary concerns the core never sees.
#[derive(Clone)]
pub struct AppState {
    pub shortener: Arc<dyn Shortener>,
    pub resolver: Arc<dyn Resolver>,
    pub base_url: String,
    pub line: Option<Arc<LineClient>>,
}

impl AppState {
    pub fn new(
        shortener: Arc<dyn Shortener>,
        resolver: Arc<dyn Resolver>,
        public_base_url: impl Into<String>,
    ) -> Self {
        Self {
            shortener,
            resolver,
            base_url: public_base_url.into(),
            line: None,
        }
    }

    pub fn with_line(mut self, line: LineClient) -> Self {
        self.line = Some(Arc::new(line));
        self
    }
}
