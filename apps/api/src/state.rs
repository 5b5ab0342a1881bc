use std::sync::Arc;

use crate::config::Config;
use crate::recommendation::recommender::Recommender;
use crate::session::store::SessionStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<SessionStore>,
    /// Pluggable recommender. `LlmRecommender` when a key is configured, otherwise the fallback.
    pub recommender: Arc<dyn Recommender>,
    pub config: Config,
}
