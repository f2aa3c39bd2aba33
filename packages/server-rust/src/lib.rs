//! Tasking server: a product registry, opportunity-search and order orchestration over
//! pluggable product backends, and the axum HTTP surface that exposes them.

pub mod backend;
pub mod network;
pub mod observability;
pub mod service;
pub mod traits;

pub use backend::InMemoryBackend;
pub use network::{build_router, NetworkConfig, NetworkModule};
pub use service::{OpportunityService, OrderService, Product, ProductRegistry, ServerConfig};
pub use traits::{OpportunityPage, OrderBackend, ProductBackend};
