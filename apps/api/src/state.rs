use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::ranking::oracle::ScoringOracle;

/// Shared application state injected into all route handlers via Axum extractors.
///
/// There is no persistence layer: every ranking request is self-contained and
/// nothing here holds request-scoped mutable state.
#[derive(Clone)]
pub struct AppState {
    /// Used directly by the enhancement endpoint (free-text rewrite).
    pub llm: LlmClient,
    /// Pluggable scoring oracle. Production: `LlmScoringOracle`; tests swap in
    /// a scripted implementation.
    pub oracle: Arc<dyn ScoringOracle>,
    pub config: Config,
}
