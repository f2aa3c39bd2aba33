//! Product discovery handlers.

use axum::extract::{Path, State};
use axum::Json;
use tasking_core::models::{ProductDocument, ProductsCollection, TYPE_JSON};
use tasking_core::{JsonSchemaModel, Rel};

use super::AppState;
use crate::network::error::{ApiResult, ForRequest};
use crate::network::extract::RequestCtx;
use crate::service::links::{link, product_links, Route};
use crate::service::Product;

fn document(product: &Product, ctx: &RequestCtx) -> ProductDocument {
    ProductDocument::new(
        product.id(),
        product.metadata().clone(),
        product_links(product.id(), ctx),
    )
}

/// `GET /products`
pub async fn get_products_handler(
    State(state): State<AppState>,
    ctx: RequestCtx,
) -> Json<ProductsCollection> {
    let products = state
        .products
        .products()
        .map(|product| document(product, &ctx))
        .collect();
    let links = vec![link(Route::Products, &ctx, Rel::SelfLink, TYPE_JSON)];
    Json(ProductsCollection::new(products, links))
}

/// `GET /products/{product_id}`
pub async fn get_product_handler(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
    ctx: RequestCtx,
) -> ApiResult<Json<ProductDocument>> {
    let product = state.products.lookup(&product_id).for_request(&ctx)?;
    Ok(Json(document(&product, &ctx)))
}

/// `GET /products/{product_id}/constraints`
pub async fn constraints_handler(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
    ctx: RequestCtx,
) -> ApiResult<Json<JsonSchemaModel>> {
    state
        .products
        .constraints(&product_id)
        .map(Json)
        .for_request(&ctx)
}

/// `GET /products/{product_id}/order-parameters`
pub async fn order_parameters_handler(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
    ctx: RequestCtx,
) -> ApiResult<Json<JsonSchemaModel>> {
    state
        .products
        .order_parameters(&product_id)
        .map(Json)
        .for_request(&ctx)
}
