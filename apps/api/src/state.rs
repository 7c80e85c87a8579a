use std::sync::Arc;

use crate::assistant::session::SessionManager;
use crate::matching::ranking::BatchRanker;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// One assistant per chat session, evicted after the idle TTL.
    pub sessions: Arc<SessionManager>,
    /// Bounded fan-out ranker shared by every ranking request.
    pub ranker: Arc<BatchRanker>,
}
