//! In-memory product and order backend.
//!
//! Serves a fixed set of opportunity templates for every search and keeps placed orders
//! in process memory. Cursors are decimal offsets into the template list; they are
//! opaque to everything except this module.

use std::num::NonZeroU32;

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use parking_lot::RwLock;
use serde_json::{json, Map, Value};
use tasking_core::models::{FeatureType, OrderProperties};
use tasking_core::{
    Opportunity, OpportunityProperties, OpportunitySearch, Order, OrderPayload, OrderStatus,
    OrderStatusCode, Outcome, RequestContext,
};
use tracing::debug;

use crate::service::Product;
use crate::traits::{OpportunityPage, OrderBackend, ProductBackend};

/// Product and order backend held entirely in memory.
///
/// Orders are keyed in a `DashMap`; the id list that preserves placement order sits
/// behind a `parking_lot` lock. Status histories are kept newest first.
#[derive(Debug, Default)]
pub struct InMemoryBackend {
    templates: Vec<Map<String, Value>>,
    orders: DashMap<String, Order>,
    statuses: DashMap<String, Vec<OrderStatus>>,
    placed: RwLock<Vec<String>>,
}

impl InMemoryBackend {
    /// A backend with no opportunity templates; every search returns an empty page.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an opportunity template. Its entries become the product-specific
    /// properties of one opportunity in every search result.
    #[must_use]
    pub fn with_opportunity(mut self, properties: Map<String, Value>) -> Self {
        self.templates.push(properties);
        self
    }

    /// Sample templates with off-nadir ranges and vehicle ids.
    #[must_use]
    pub fn seeded() -> Self {
        [(0, 15, 1), (10, 25, 2), (20, 35, 5), (30, 45, 7)]
            .into_iter()
            .fold(Self::new(), |backend, (minimum, maximum, vehicle)| {
                let properties = json!({
                    "off_nadir": {"minimum": minimum, "maximum": maximum},
                    "vehicle_id": [vehicle],
                    "platform": "platform_id",
                });
                match properties {
                    Value::Object(map) => backend.with_opportunity(map),
                    _ => backend,
                }
            })
    }

    /// Appends a status to an order's history. Returns `false` if the order is unknown.
    pub fn push_status(&self, order_id: &str, status: OrderStatus) -> bool {
        let Some(mut order) = self.orders.get_mut(order_id) else {
            return false;
        };
        order.status = status.clone();
        self.statuses
            .entry(order_id.to_string())
            .or_default()
            .insert(0, status);
        true
    }

    fn parse_cursor(cursor: Option<&str>) -> Result<usize, Value> {
        match cursor {
            None => Ok(0),
            Some(raw) => raw.parse::<usize>().map_err(|_| {
                json!({
                    "field": "next",
                    "reason": "unrecognised pagination cursor",
                })
            }),
        }
    }
}

#[async_trait]
impl ProductBackend for InMemoryBackend {
    async fn search_opportunities(
        &self,
        product: &Product,
        search: &OpportunitySearch,
        next: Option<&str>,
        limit: NonZeroU32,
        _ctx: &RequestContext,
    ) -> Outcome<OpportunityPage> {
        let offset = match Self::parse_cursor(next) {
            Ok(offset) => offset,
            Err(detail) => return Outcome::violation(detail),
        };
        if offset > self.templates.len() {
            return Outcome::violation(json!({
                "field": "next",
                "reason": "pagination cursor is past the end of the results",
            }));
        }

        let limit = usize::try_from(limit.get()).unwrap_or(usize::MAX);
        let end = offset.saturating_add(limit).min(self.templates.len());
        let opportunities = self.templates[offset..end]
            .iter()
            .enumerate()
            .map(|(i, extra)| Opportunity {
                kind: FeatureType::Feature,
                id: Some(format!("{}-{}", product.id(), offset + i)),
                geometry: search.geometry.clone(),
                properties: OpportunityProperties {
                    datetime: search.datetime,
                    product_id: product.id().to_string(),
                    extra: extra.clone(),
                },
                links: Vec::new(),
            })
            .collect();

        let next = (end < self.templates.len()).then(|| end.to_string());
        debug!(offset, end, has_next = next.is_some(), "served opportunity page");
        Outcome::Success(OpportunityPage::new(opportunities, next))
    }

    async fn create_order(
        &self,
        product: &Product,
        payload: &OrderPayload,
        _ctx: &RequestContext,
    ) -> Outcome<Order> {
        let now = Utc::now();
        let status = OrderStatus::new(now, OrderStatusCode::Received);
        let id = uuid::Uuid::new_v4().to_string();

        let mut opportunity_properties = Map::new();
        opportunity_properties.insert(
            "datetime".to_string(),
            Value::String(payload.datetime.to_string()),
        );

        let order = Order {
            kind: FeatureType::Feature,
            id: id.clone(),
            status: status.clone(),
            geometry: Some(payload.geometry.clone()),
            properties: OrderProperties {
                product_id: product.id().to_string(),
                created: now,
                search_parameters: payload.search(),
                order_parameters: payload.order_parameters.clone(),
                opportunity_properties,
            },
            links: Vec::new(),
        };

        self.orders.insert(id.clone(), order.clone());
        self.statuses.insert(id.clone(), vec![status]);
        self.placed.write().push(id);
        Outcome::Success(order)
    }
}

#[async_trait]
impl OrderBackend for InMemoryBackend {
    async fn get_orders(&self, _ctx: &RequestContext) -> Outcome<Vec<Order>> {
        let orders = self
            .placed
            .read()
            .iter()
            .filter_map(|id| self.orders.get(id).map(|order| order.clone()))
            .collect();
        Outcome::Success(orders)
    }

    async fn get_order(&self, order_id: &str, _ctx: &RequestContext) -> Outcome<Option<Order>> {
        Outcome::Success(self.orders.get(order_id).map(|order| order.clone()))
    }

    async fn get_order_statuses(
        &self,
        order_id: &str,
        _ctx: &RequestContext,
    ) -> Outcome<Vec<OrderStatus>> {
        Outcome::Success(
            self.statuses
                .get(order_id)
                .map(|statuses| statuses.clone())
                .unwrap_or_default(),
        )
    }
}
