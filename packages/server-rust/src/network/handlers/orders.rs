//! Order placement and order read handlers.

use axum::extract::{Path, State};
use axum::http::header::LOCATION;
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::Value;
use tasking_core::models::OrderStatuses;
use tasking_core::{Order, OrderCollection, OrderPayload, ValidationResult};
use tracing::debug;

use super::AppState;
use crate::network::error::{ApiError, ApiResult, ForRequest};
use crate::network::extract::{ApiJson, GeoJson, RequestCtx};

/// `POST /products/{product_id}/orders`
///
/// Order parameters are checked against the product's order-parameter schema first; a
/// payload that fails never reaches the backend. A placed order is answered with
/// `201 Created` and a `Location` header pointing at the order.
pub async fn create_order_handler(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
    ctx: RequestCtx,
    ApiJson(payload): ApiJson<OrderPayload>,
) -> ApiResult<Response> {
    let product = state.products.lookup(&product_id).for_request(&ctx)?;

    let order_parameters = Value::Object(payload.order_parameters.clone());
    if let ValidationResult::Invalid { errors } =
        product.order_parameters().validate(&order_parameters)
    {
        debug!(product_id = %product_id, ?errors, "order parameters rejected");
        return Err(ApiError::validation("Order parameters are invalid", errors)
            .with_request_id(ctx.request_id.as_str()));
    }

    let created = state
        .orders
        .create_order(&product, &payload, &ctx)
        .await
        .for_request(&ctx)?;

    let mut response = (StatusCode::CREATED, GeoJson(created.order)).into_response();
    if let Ok(location) = HeaderValue::from_str(created.location.as_str()) {
        response.headers_mut().insert(LOCATION, location);
    }
    Ok(response)
}

/// `GET /orders`
pub async fn get_orders_handler(
    State(state): State<AppState>,
    ctx: RequestCtx,
) -> ApiResult<GeoJson<OrderCollection>> {
    state.orders.get_orders(&ctx).await.map(GeoJson).for_request(&ctx)
}

/// `GET /orders/{order_id}`
pub async fn get_order_handler(
    State(state): State<AppState>,
    Path(order_id): Path<String>,
    ctx: RequestCtx,
) -> ApiResult<GeoJson<Order>> {
    state
        .orders
        .get_order(&order_id, &ctx)
        .await
        .map(GeoJson)
        .for_request(&ctx)
}

/// `GET /orders/{order_id}/statuses`
pub async fn get_order_statuses_handler(
    State(state): State<AppState>,
    Path(order_id): Path<String>,
    ctx: RequestCtx,
) -> ApiResult<Json<OrderStatuses>> {
    state
        .orders
        .get_order_statuses(&order_id, &ctx)
        .await
        .map(Json)
        .for_request(&ctx)
}
