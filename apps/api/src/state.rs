use crate::config::Config;
use crate::portfolio::pipeline::Pipeline;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Extractor, inference client and packager wired for one-shot generation runs.
    pub pipeline: Pipeline,
    pub config: Config,
}
