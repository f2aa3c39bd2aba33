//! HTTP handler definitions for the tasking server.
//!
//! This module defines `AppState` (the shared state carried through axum
//! extractors) and re-exports all handler functions for convenient access
//! when building the router.

pub mod health;
pub mod opportunities;
pub mod orders;
pub mod products;
pub mod root;

pub use health::{health_handler, liveness_handler, readiness_handler};
pub use opportunities::search_opportunities_handler;
pub use orders::{
    create_order_handler, get_order_handler, get_order_statuses_handler, get_orders_handler,
};
pub use products::{
    constraints_handler, get_product_handler, get_products_handler, order_parameters_handler,
};
pub use root::{conformance_handler, root_handler};

use std::sync::Arc;
use std::time::Instant;

use super::ShutdownController;
use crate::service::{OpportunityService, OrderService, ProductRegistry, ServerConfig};

/// Shared application state passed to all axum handlers via `State` extraction.
///
/// Holds `Arc` references to shared resources so cloning is cheap.
#[derive(Clone)]
pub struct AppState {
    /// Products and their backends. Read-only once the server is built.
    pub products: Arc<ProductRegistry>,
    /// Opportunity search orchestrator.
    pub opportunities: OpportunityService,
    /// Order placement and read paths.
    pub orders: OrderService,
    /// Addressing, paging bounds and landing page content.
    pub config: Arc<ServerConfig>,
    /// Graceful shutdown controller with health state and in-flight tracking.
    pub shutdown: Arc<ShutdownController>,
    /// Server process start time, used for uptime calculation.
    pub start_time: Instant,
}

impl AppState {
    /// Wires the orchestrators around a registry and an order store.
    pub fn new(
        products: Arc<ProductRegistry>,
        orders: Arc<dyn crate::traits::OrderBackend>,
        config: Arc<ServerConfig>,
        shutdown: Arc<ShutdownController>,
    ) -> Self {
        Self {
            products,
            opportunities: OpportunityService::new(Arc::clone(&config)),
            orders: OrderService::new(orders),
            config,
            shutdown,
            start_time: Instant::now(),
        }
    }
}
