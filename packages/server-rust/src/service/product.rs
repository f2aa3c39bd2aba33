//! Product descriptors.

use std::fmt;
use std::sync::Arc;

use tasking_core::models::ProductMetadata;
use tasking_core::JsonSchemaModel;

use crate::traits::ProductBackend;

/// A registered product: its schemas plus the backend that serves it.
///
/// Built with the `with_*` methods, then handed to
/// [`ProductRegistry::register`](super::registry::ProductRegistry::register); the registry
/// only exposes it behind `Arc`, so it is immutable from then on.
#[derive(Clone)]
pub struct Product {
    id: String,
    metadata: ProductMetadata,
    constraints: JsonSchemaModel,
    opportunity_properties: JsonSchemaModel,
    order_parameters: JsonSchemaModel,
    backend: Arc<dyn ProductBackend>,
}

impl Product {
    /// Creates a product with open (`{"type": "object"}`) schemas.
    pub fn new(id: impl Into<String>, backend: Arc<dyn ProductBackend>) -> Self {
        Self {
            id: id.into(),
            metadata: ProductMetadata::default(),
            constraints: JsonSchemaModel::any_object(),
            opportunity_properties: JsonSchemaModel::any_object(),
            order_parameters: JsonSchemaModel::any_object(),
            backend,
        }
    }

    #[must_use]
    pub fn with_metadata(mut self, metadata: ProductMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    #[must_use]
    pub fn with_constraints(mut self, schema: JsonSchemaModel) -> Self {
        self.constraints = schema;
        self
    }

    #[must_use]
    pub fn with_opportunity_properties(mut self, schema: JsonSchemaModel) -> Self {
        self.opportunity_properties = schema;
        self
    }

    #[must_use]
    pub fn with_order_parameters(mut self, schema: JsonSchemaModel) -> Self {
        self.order_parameters = schema;
        self
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn metadata(&self) -> &ProductMetadata {
        &self.metadata
    }

    #[must_use]
    pub fn constraints(&self) -> &JsonSchemaModel {
        &self.constraints
    }

    #[must_use]
    pub fn opportunity_properties(&self) -> &JsonSchemaModel {
        &self.opportunity_properties
    }

    #[must_use]
    pub fn order_parameters(&self) -> &JsonSchemaModel {
        &self.order_parameters
    }

    #[must_use]
    pub fn backend(&self) -> &dyn ProductBackend {
        self.backend.as_ref()
    }
}

impl fmt::Debug for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Product")
            .field("id", &self.id)
            .field("metadata", &self.metadata)
            .finish_non_exhaustive()
    }
}
