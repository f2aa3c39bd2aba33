//! Landing page and conformance handlers.

use axum::extract::State;
use axum::Json;
use tasking_core::models::{Conformance, RootDocument};

use super::AppState;
use crate::network::extract::RequestCtx;
use crate::service::links::root_links;

/// `GET /`
pub async fn root_handler(State(state): State<AppState>, ctx: RequestCtx) -> Json<RootDocument> {
    let config = &state.config;
    Json(RootDocument {
        id: config.id.clone(),
        title: config.title.clone(),
        description: config.description.clone(),
        conforms_to: config.conformances.clone(),
        links: root_links(&ctx),
    })
}

/// `GET /conformance`
pub async fn conformance_handler(State(state): State<AppState>) -> Json<Conformance> {
    Json(Conformance {
        conforms_to: state.config.conformances.clone(),
    })
}
