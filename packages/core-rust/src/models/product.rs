//! Product metadata documents.

use serde::{Deserialize, Serialize};

use super::link::Link;

/// Role a provider plays for a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderRole {
    Licensor,
    Producer,
    Processor,
    Host,
}

/// An organisation involved in producing or serving a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Provider {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub roles: Vec<ProviderRole>,
    pub url: String,
}

/// Descriptive, client-facing fields of a product.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub providers: Vec<Provider>,
}

/// Product document served by `GET /products/{product_id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductDocument {
    #[serde(rename = "type")]
    pub kind: String,
    pub id: String,
    #[serde(flatten)]
    pub metadata: ProductMetadata,
    #[serde(default)]
    pub links: Vec<Link>,
}

impl ProductDocument {
    #[must_use]
    pub fn new(id: impl Into<String>, metadata: ProductMetadata, links: Vec<Link>) -> Self {
        Self {
            kind: "Product".to_string(),
            id: id.into(),
            metadata,
            links,
        }
    }
}

/// Product list served by `GET /products`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductsCollection {
    #[serde(rename = "type")]
    pub kind: String,
    pub products: Vec<ProductDocument>,
    #[serde(default)]
    pub links: Vec<Link>,
}

impl ProductsCollection {
    #[must_use]
    pub fn new(products: Vec<ProductDocument>, links: Vec<Link>) -> Self {
        Self {
            kind: "ProductCollection".to_string(),
            products,
            links,
        }
    }
}
