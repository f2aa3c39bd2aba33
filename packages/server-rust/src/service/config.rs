use std::num::NonZeroU32;

use tasking_core::models::CORE;
use url::Url;

/// Server-level configuration for the orchestration layer.
///
/// Controls how links are addressed, search page bounds, and the landing page.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Public base URL used for every link href. When `None`, the base is derived from
    /// each request's `Host` header.
    pub public_base_url: Option<Url>,
    /// Largest `limit` a search may ask for. `None` means unbounded.
    pub max_limit: Option<NonZeroU32>,
    /// Landing page identifier.
    pub id: String,
    /// Landing page title.
    pub title: String,
    /// Landing page description.
    pub description: String,
    /// Conformance class URIs advertised by `/conformance` and the landing page.
    pub conformances: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            public_base_url: None,
            max_limit: None,
            id: "stapi".to_string(),
            title: "Tasking API".to_string(),
            description: "Search feasibility windows and place tasking orders".to_string(),
            conformances: vec![CORE.to_string()],
        }
    }
}
