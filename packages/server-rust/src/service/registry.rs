use std::collections::HashMap;
use std::sync::Arc;

use tasking_core::JsonSchemaModel;

use super::product::Product;

// ---------------------------------------------------------------------------
// RegistryError
// ---------------------------------------------------------------------------

/// Errors from registering or resolving products.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("product already registered: {id}")]
    DuplicateProduct { id: String },
    #[error("product not found: {id}")]
    NotFound { id: String },
}

// ---------------------------------------------------------------------------
// ProductRegistry
// ---------------------------------------------------------------------------

/// Registry of products keyed by id.
///
/// Populated during startup through `&mut self`, then shared as `Arc<ProductRegistry>`
/// with every request handler. Once shared there is no way to mutate it, so lookups take
/// no locks.
///
/// Iteration follows registration order.
#[derive(Debug, Default)]
pub struct ProductRegistry {
    by_id: HashMap<String, Arc<Product>>,
    order: Vec<String>,
}

impl ProductRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a product.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::DuplicateProduct` if a product with the same id exists.
    pub fn register(&mut self, product: Product) -> Result<(), RegistryError> {
        let id = product.id().to_string();
        if self.by_id.contains_key(&id) {
            return Err(RegistryError::DuplicateProduct { id });
        }
        self.by_id.insert(id.clone(), Arc::new(product));
        self.order.push(id);
        Ok(())
    }

    /// Retrieve a product by id.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::NotFound` if no product has this id.
    pub fn lookup(&self, id: &str) -> Result<Arc<Product>, RegistryError> {
        self.by_id
            .get(id)
            .cloned()
            .ok_or_else(|| RegistryError::NotFound { id: id.to_string() })
    }

    /// Constraints schema of a product.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::NotFound` if no product has this id.
    pub fn constraints(&self, id: &str) -> Result<JsonSchemaModel, RegistryError> {
        self.lookup(id).map(|p| p.constraints().clone())
    }

    /// Order-parameter schema of a product.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::NotFound` if no product has this id.
    pub fn order_parameters(&self, id: &str) -> Result<JsonSchemaModel, RegistryError> {
        self.lookup(id).map(|p| p.order_parameters().clone())
    }

    /// Opportunity-property schema of a product.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::NotFound` if no product has this id.
    pub fn opportunity_properties(&self, id: &str) -> Result<JsonSchemaModel, RegistryError> {
        self.lookup(id).map(|p| p.opportunity_properties().clone())
    }

    /// All products in registration order.
    pub fn products(&self) -> impl Iterator<Item = &Arc<Product>> {
        self.order.iter().filter_map(|id| self.by_id.get(id))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
