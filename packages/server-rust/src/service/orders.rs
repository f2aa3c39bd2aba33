//! Order placement and order read paths.

use std::sync::Arc;

use tasking_core::models::{OrderStatuses, TYPE_GEOJSON, TYPE_JSON};
use tasking_core::{Order, OrderCollection, OrderPayload, Rel, RequestContext};
use tracing::{info, info_span, Instrument};
use url::Url;

use super::error::{settle, ServiceError};
use super::links::{link, order_links, Route};
use super::product::Product;
use crate::traits::OrderBackend;

const CREATE_ACTION: &str = "creating order";
const CREATE_MESSAGE: &str = "Error creating order";
const READ_ACTION: &str = "retrieving orders";
const READ_MESSAGE: &str = "Error retrieving orders";

/// A newly placed order and where it can be fetched from.
#[derive(Debug, Clone, PartialEq)]
pub struct CreatedOrder {
    pub order: Order,
    pub location: Url,
}

/// Places orders through product backends and serves them back through the server-wide
/// [`OrderBackend`].
#[derive(Clone)]
pub struct OrderService {
    backend: Arc<dyn OrderBackend>,
}

impl std::fmt::Debug for OrderService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrderService").finish_non_exhaustive()
    }
}

impl OrderService {
    pub fn new(backend: Arc<dyn OrderBackend>) -> Self {
        Self { backend }
    }

    /// Places an order for `product`.
    ///
    /// The backend is called exactly once. On success the order gets its `self`,
    /// `monitor` and `product` links, and `location` is the order's own URL.
    ///
    /// # Errors
    ///
    /// - `ServiceError::ConstraintViolation` if the backend rejected the order.
    /// - `ServiceError::Internal` for any backend failure.
    pub async fn create_order(
        &self,
        product: &Product,
        payload: &OrderPayload,
        ctx: &RequestContext,
    ) -> Result<CreatedOrder, ServiceError> {
        let span = info_span!(
            "create_order",
            product_id = product.id(),
            request_id = %ctx.request_id,
        );

        async move {
            let outcome = product.backend().create_order(product, payload, ctx).await;
            let mut order = settle(outcome, CREATE_ACTION, CREATE_MESSAGE)?;

            let links = order_links(&order, ctx);
            order.links.extend(links);
            let location = Route::Order(&order.id).href(ctx);
            info!(order_id = %order.id, "order created");

            Ok(CreatedOrder { order, location })
        }
        .instrument(span)
        .await
    }

    /// All orders, each with its navigational links.
    ///
    /// # Errors
    ///
    /// `ServiceError::ConstraintViolation` or `ServiceError::Internal` from the backend.
    pub async fn get_orders(&self, ctx: &RequestContext) -> Result<OrderCollection, ServiceError> {
        let outcome = self.backend.get_orders(ctx).await;
        let mut orders = settle(outcome, READ_ACTION, READ_MESSAGE)?;
        for order in &mut orders {
            let links = order_links(order, ctx);
            order.links.extend(links);
        }
        let links = vec![link(Route::Orders, ctx, Rel::SelfLink, TYPE_GEOJSON)];
        Ok(OrderCollection::new(orders, links))
    }

    /// One order by id.
    ///
    /// # Errors
    ///
    /// `ServiceError::NotFound` if the backend does not know the order, otherwise as
    /// [`get_orders`](Self::get_orders).
    pub async fn get_order(
        &self,
        order_id: &str,
        ctx: &RequestContext,
    ) -> Result<Order, ServiceError> {
        let outcome = self.backend.get_order(order_id, ctx).await;
        let mut order = settle(outcome, READ_ACTION, READ_MESSAGE)?
            .ok_or_else(|| ServiceError::not_found("order", order_id))?;
        let links = order_links(&order, ctx);
        order.links.extend(links);
        Ok(order)
    }

    /// Status history of one order, newest first.
    ///
    /// # Errors
    ///
    /// `ServiceError::NotFound` if the order does not exist, otherwise as
    /// [`get_orders`](Self::get_orders).
    pub async fn get_order_statuses(
        &self,
        order_id: &str,
        ctx: &RequestContext,
    ) -> Result<OrderStatuses, ServiceError> {
        let exists = settle(
            self.backend.get_order(order_id, ctx).await,
            READ_ACTION,
            READ_MESSAGE,
        )?;
        if exists.is_none() {
            return Err(ServiceError::not_found("order", order_id));
        }

        let statuses = settle(
            self.backend.get_order_statuses(order_id, ctx).await,
            READ_ACTION,
            READ_MESSAGE,
        )?;
        let links = vec![link(
            Route::OrderStatuses(order_id),
            ctx,
            Rel::SelfLink,
            TYPE_JSON,
        )];
        Ok(OrderStatuses { statuses, links })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
