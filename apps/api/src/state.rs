use std::sync::Arc;

use crate::agent::CvAgent;
use crate::config::Config;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// The single agent instance; holds the uploaded CV for the whole process.
    pub agent: Arc<CvAgent>,
    pub config: Config,
}
