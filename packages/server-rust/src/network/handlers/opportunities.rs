//! Opportunity search handler.

use axum::extract::{Path, State};
use tasking_core::{OpportunityCollection, OpportunityPayload};

use super::AppState;
use crate::network::error::{ApiResult, ForRequest};
use crate::network::extract::{ApiJson, GeoJson, RequestCtx};

/// `POST /products/{product_id}/opportunities`
pub async fn search_opportunities_handler(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
    ctx: RequestCtx,
    ApiJson(payload): ApiJson<OpportunityPayload>,
) -> ApiResult<GeoJson<OpportunityCollection>> {
    let product = state.products.lookup(&product_id).for_request(&ctx)?;
    state
        .opportunities
        .search(&product, payload, &ctx)
        .await
        .map(GeoJson)
        .for_request(&ctx)
}
