//! Scripted backend and fixtures shared by the service unit tests.

use std::num::NonZeroU32;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use parking_lot::Mutex;
use serde_json::{Map, Value};
use tasking_core::models::{FeatureType, OrderProperties};
use tasking_core::{
    DatetimeInterval, Geometry, Opportunity, OpportunityPayload, OpportunityProperties,
    OpportunitySearch, Order, OrderPayload, OrderStatus, OrderStatusCode, Outcome,
    RequestContext,
};
use url::Url;

use super::product::Product;
use crate::traits::{OpportunityPage, ProductBackend};

/// What the scripted search call returns.
#[derive(Debug, Clone, Default)]
pub enum SearchScript {
    #[default]
    Empty,
    Page { count: usize, next: Option<String> },
    Violation(Value),
    Failure(String),
    /// One opportunity stamped with a different product id.
    Foreign(String),
    /// Never completes.
    Pending,
}

/// What the scripted create-order call returns.
#[derive(Debug, Clone, Default)]
pub enum OrderScript {
    #[default]
    Accept,
    Violation(Value),
    Failure(String),
}

#[derive(Debug, Default)]
pub struct ScriptedBackend {
    pub search: SearchScript,
    pub order: OrderScript,
    pub search_calls: AtomicUsize,
    pub order_calls: AtomicUsize,
    pub last_cursor: Mutex<Option<String>>,
    pub last_limit: Mutex<Option<u32>>,
}

impl ScriptedBackend {
    pub fn searching(search: SearchScript) -> Self {
        Self {
            search,
            ..Self::default()
        }
    }

    pub fn ordering(order: OrderScript) -> Self {
        Self {
            order,
            ..Self::default()
        }
    }
}

#[async_trait]
impl ProductBackend for ScriptedBackend {
    async fn search_opportunities(
        &self,
        product: &Product,
        search: &OpportunitySearch,
        next: Option<&str>,
        limit: NonZeroU32,
        _ctx: &RequestContext,
    ) -> Outcome<OpportunityPage> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_cursor.lock() = next.map(str::to_string);
        *self.last_limit.lock() = Some(limit.get());

        match &self.search {
            SearchScript::Empty => Outcome::Success(OpportunityPage::default()),
            SearchScript::Page { count, next } => Outcome::Success(OpportunityPage::new(
                (0..*count)
                    .map(|i| opportunity(product.id(), search, i))
                    .collect(),
                next.clone(),
            )),
            SearchScript::Violation(detail) => Outcome::violation(detail.clone()),
            SearchScript::Failure(message) => Outcome::failure(anyhow::anyhow!(message.clone())),
            SearchScript::Foreign(product_id) => Outcome::Success(OpportunityPage::new(
                vec![
                    opportunity(product.id(), search, 0),
                    opportunity(product_id, search, 1),
                ],
                None,
            )),
            SearchScript::Pending => std::future::pending().await,
        }
    }

    async fn create_order(
        &self,
        product: &Product,
        payload: &OrderPayload,
        _ctx: &RequestContext,
    ) -> Outcome<Order> {
        self.order_calls.fetch_add(1, Ordering::SeqCst);
        match &self.order {
            OrderScript::Accept => Outcome::Success(order("order-1", product.id(), payload)),
            OrderScript::Violation(detail) => Outcome::violation(detail.clone()),
            OrderScript::Failure(message) => Outcome::failure(anyhow::anyhow!(message.clone())),
        }
    }
}

pub fn ctx() -> RequestContext {
    RequestContext::new(
        "req-test",
        Url::parse("http://stapiserver/").unwrap(),
        Url::parse("http://stapiserver/products/test-spotlight/opportunities").unwrap(),
    )
}

pub fn interval() -> DatetimeInterval {
    DatetimeInterval::new(
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap(),
    )
    .unwrap()
}

pub fn payload(limit: u32) -> OpportunityPayload {
    OpportunityPayload {
        limit: NonZeroU32::new(limit).unwrap(),
        ..OpportunityPayload::new(interval(), Geometry::point(0.0, 0.0))
    }
}

pub fn order_payload() -> OrderPayload {
    OrderPayload {
        datetime: interval(),
        geometry: Geometry::point(0.0, 0.0),
        filter: None,
        order_parameters: Map::new(),
    }
}

pub fn opportunity(product_id: &str, search: &OpportunitySearch, index: usize) -> Opportunity {
    let mut extra = Map::new();
    extra.insert("off_nadir".to_string(), Value::from(20 + index));
    Opportunity {
        kind: FeatureType::Feature,
        id: Some(format!("opp-{index}")),
        geometry: search.geometry.clone(),
        properties: OpportunityProperties {
            datetime: search.datetime,
            product_id: product_id.to_string(),
            extra,
        },
        links: Vec::new(),
    }
}

pub fn order(id: &str, product_id: &str, payload: &OrderPayload) -> Order {
    let created = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
    Order {
        kind: FeatureType::Feature,
        id: id.to_string(),
        status: OrderStatus::new(created, OrderStatusCode::Received),
        geometry: Some(payload.geometry.clone()),
        properties: OrderProperties {
            product_id: product_id.to_string(),
            created,
            search_parameters: payload.search(),
            order_parameters: payload.order_parameters.clone(),
            opportunity_properties: Map::new(),
        },
        links: Vec::new(),
    }
}

/// Collects formatted log output so tests can assert on what was (not) logged.
#[derive(Debug, Clone, Default)]
pub struct LogCapture(std::sync::Arc<Mutex<Vec<u8>>>);

impl LogCapture {
    /// Installs a subscriber writing into this capture for the current thread.
    pub fn install(&self) -> tracing::subscriber::DefaultGuard {
        let subscriber = tracing_subscriber::fmt()
            .with_writer(self.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::TRACE)
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock()).into_owned()
    }
}

impl std::io::Write for LogCapture {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for LogCapture {
    type Writer = LogCapture;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}
