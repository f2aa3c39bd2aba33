use std::num::NonZeroU32;

use async_trait::async_trait;
use tasking_core::{
    Opportunity, OpportunitySearch, Order, OrderPayload, OrderStatus, Outcome, RequestContext,
};

use crate::service::product::Product;

/// One page of opportunities returned by a product backend.
#[derive(Debug, Clone, Default)]
pub struct OpportunityPage {
    pub opportunities: Vec<Opportunity>,
    /// Opaque cursor for the following page. `None` on the last page.
    pub next: Option<String>,
}

impl OpportunityPage {
    #[must_use]
    pub fn new(opportunities: Vec<Opportunity>, next: Option<String>) -> Self {
        Self {
            opportunities,
            next,
        }
    }
}

/// Per-product compute backend: finds opportunities and places orders.
///
/// Both calls report through [`Outcome`]. Business-rule rejections (invalid filter,
/// unsatisfiable constraints, unknown cursor) must be returned as
/// `Outcome::ConstraintViolation`; anything returned as `Outcome::Failure` is treated as an
/// internal error and hidden from the client.
#[async_trait]
pub trait ProductBackend: Send + Sync {
    /// Search for opportunities matching `search`.
    ///
    /// `next` is a cursor this backend issued on a previous page, passed back unchanged.
    /// At most `limit` opportunities should be returned.
    async fn search_opportunities(
        &self,
        product: &Product,
        search: &OpportunitySearch,
        next: Option<&str>,
        limit: NonZeroU32,
        ctx: &RequestContext,
    ) -> Outcome<OpportunityPage>;

    /// Place an order. The payload has already been validated against the product's
    /// order-parameter schema.
    async fn create_order(
        &self,
        product: &Product,
        payload: &OrderPayload,
        ctx: &RequestContext,
    ) -> Outcome<Order>;
}

/// Server-wide order store backing the order read paths.
#[async_trait]
pub trait OrderBackend: Send + Sync {
    /// All orders visible to the caller.
    async fn get_orders(&self, ctx: &RequestContext) -> Outcome<Vec<Order>>;

    /// A single order. `Success(None)` means not found (or not visible to the caller).
    async fn get_order(&self, order_id: &str, ctx: &RequestContext) -> Outcome<Option<Order>>;

    /// Status history of an order, newest first.
    async fn get_order_statuses(
        &self,
        order_id: &str,
        ctx: &RequestContext,
    ) -> Outcome<Vec<OrderStatus>>;
}
