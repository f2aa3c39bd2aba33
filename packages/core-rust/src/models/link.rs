//! Hypermedia link records.
//!
//! A link is either plain navigation (`href` + `rel` + `type`) or an actionable request,
//! which additionally carries an HTTP `method` and the JSON `body` to send. The two
//! constructors keep that pairing intact: a link never has a method without a body.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Media type for plain JSON documents.
pub const TYPE_JSON: &str = "application/json";

/// Media type for GeoJSON documents (opportunity collections, orders).
pub const TYPE_GEOJSON: &str = "application/geo+json";

/// Link relation names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Rel {
    #[serde(rename = "self")]
    SelfLink,
    Constraints,
    OrderParameters,
    Opportunities,
    CreateOrder,
    Next,
    Conformance,
    Products,
    Orders,
    Product,
    Monitor,
}

impl Rel {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SelfLink => "self",
            Self::Constraints => "constraints",
            Self::OrderParameters => "order-parameters",
            Self::Opportunities => "opportunities",
            Self::CreateOrder => "create-order",
            Self::Next => "next",
            Self::Conformance => "conformance",
            Self::Products => "products",
            Self::Orders => "orders",
            Self::Product => "product",
            Self::Monitor => "monitor",
        }
    }
}

impl fmt::Display for Rel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A hypermedia link.
///
/// `method` and `body` are either both present or both absent. Deserialization
/// rejects any document that breaks the pairing; an explicit `"body": null`
/// counts as present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawLink")]
pub struct Link {
    pub href: String,
    pub rel: Rel,
    #[serde(rename = "type")]
    pub media_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    method: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    body: Option<Value>,
}

/// Wire shape of [`Link`] before the method/body pairing is checked.
#[derive(Deserialize)]
struct RawLink {
    href: String,
    rel: Rel,
    #[serde(rename = "type")]
    media_type: String,
    #[serde(default)]
    method: Option<String>,
    #[serde(default, deserialize_with = "present")]
    body: Option<Value>,
}

/// Any value that appears on the wire, `null` included, is `Some`.
fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

impl TryFrom<RawLink> for Link {
    type Error = &'static str;

    fn try_from(raw: RawLink) -> Result<Self, Self::Error> {
        match (&raw.method, &raw.body) {
            (Some(_), None) => Err("link has a method but no body"),
            (None, Some(_)) => Err("link has a body but no method"),
            _ => Ok(Self {
                href: raw.href,
                rel: raw.rel,
                media_type: raw.media_type,
                method: raw.method,
                body: raw.body,
            }),
        }
    }
}

impl Link {
    /// A plain navigational link.
    #[must_use]
    pub fn navigation(href: impl Into<String>, rel: Rel, media_type: &str) -> Self {
        Self {
            href: href.into(),
            rel,
            media_type: media_type.to_string(),
            method: None,
            body: None,
        }
    }

    /// An actionable link: following it means sending `body` with `method` to `href`.
    #[must_use]
    pub fn action(
        href: impl Into<String>,
        rel: Rel,
        media_type: &str,
        method: &str,
        body: Value,
    ) -> Self {
        Self {
            href: href.into(),
            rel,
            media_type: media_type.to_string(),
            method: Some(method.to_string()),
            body: Some(body),
        }
    }

    /// Whether this link describes a request to send rather than a page to fetch.
    #[must_use]
    pub const fn is_action(&self) -> bool {
        self.method.is_some()
    }

    /// HTTP method for an actionable link.
    #[must_use]
    pub fn method(&self) -> Option<&str> {
        self.method.as_deref()
    }

    /// Request body for an actionable link.
    #[must_use]
    pub const fn body(&self) -> Option<&Value> {
        self.body.as_ref()
    }
}

/// Finds the first link with the given relation.
#[must_use]
pub fn find_link(links: &[Link], rel: Rel) -> Option<&Link> {
    links.iter().find(|link| link.rel == rel)
}
