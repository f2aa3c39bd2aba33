//! Tasking core: opportunity/order models, hypermedia links, the outcome protocol,
//! and product schema descriptors.

pub mod context;
pub mod models;
pub mod outcome;
pub mod schema;

pub use context::RequestContext;
pub use models::{
    DatetimeInterval, Geometry, Link, Opportunity, OpportunityCollection, OpportunityPayload,
    OpportunityProperties, OpportunitySearch, Order, OrderCollection, OrderPayload, OrderStatus,
    OrderStatusCode, Rel,
};
pub use outcome::{ConstraintViolation, Outcome};
pub use schema::{JsonSchemaModel, SchemaError, ValidationResult};

#[cfg(test)]
mod tests {
    #[test]
    fn crate_loads() {
        // Empty body: if this test runs, the crate compiles and loads.
    }
}
