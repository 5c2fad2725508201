use crate::config::Config;
use crate::matching::pipeline::MatchingServices;

/// Shared application state injected into all route handlers via Axum extractors.
///
/// Holds no per-user data: analyses travel back and forth in request bodies.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Embedder, keyword extractor and advisor. The embedder owns the
    /// process-wide model handle.
    pub services: MatchingServices,
}

impl AppState {
    /// The per-request credential, falling back to the configured key.
    pub fn resolve_api_key<'a>(&'a self, header_key: Option<&'a str>) -> Option<&'a str> {
        header_key
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .or(self.config.llm_api_key.as_deref())
    }
}
