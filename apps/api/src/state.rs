use std::sync::Arc;

use crate::config::Config;
use crate::screening::pipeline::ScreeningPipeline;
use crate::session::SessionRegistry;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<SessionRegistry>,
    pub pipeline: Arc<ScreeningPipeline>,
    pub config: Config,
}
