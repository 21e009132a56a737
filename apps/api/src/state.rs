use std::sync::Arc;

use crate::config::Config;
use crate::matcher::Matcher;

/// Shared application state injected into all route handlers via Axum
/// extractors. The matcher is built once at startup and shared by
/// reference; there is no module-level singleton.
#[derive(Clone)]
pub struct AppState {
    pub matcher: Arc<Matcher>,
    pub config: Config,
}
