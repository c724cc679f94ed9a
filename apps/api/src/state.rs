use std::sync::Arc;

use crate::config::Config;
use crate::embedding::TextEncoder;
use crate::grammar::GrammarChecker;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Sentence encoder, loaded once at startup and shared by every request.
    pub encoder: Arc<dyn TextEncoder>,
    /// Grammar backend. Default: LanguageTool over HTTP.
    pub grammar: Arc<dyn GrammarChecker>,
}
