//! Product orchestration layer.
//!
//! 1. **Registry** (`registry`, `product`): products and their backends, fixed at startup
//! 2. **Links** (`links`): route identities and hypermedia link construction
//! 3. **Orchestrators** (`opportunities`, `orders`): one backend call per request, outcome
//!    resolution, link assembly
//! 4. **Errors** (`error`): the single place backend outcomes become client-facing errors

pub mod config;
pub mod error;
pub mod links;
pub mod opportunities;
pub mod orders;
pub mod product;
pub mod registry;

#[cfg(test)]
pub mod test_support;

// Re-export key types for convenient access.
pub use config::ServerConfig;
pub use error::{settle, ServiceError};
pub use links::Route;
pub use opportunities::OpportunityService;
pub use orders::{CreatedOrder, OrderService};
pub use product::Product;
pub use registry::{ProductRegistry, RegistryError};
