//! Opportunity search payloads and results.
//!
//! Wire shapes follow GeoJSON: an [`Opportunity`] is a `Feature` and an
//! [`OpportunityCollection`] is a `FeatureCollection`, both extended with `links`.

use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::datetime::DatetimeInterval;
use super::geometry::Geometry;
use super::link::Link;

/// Page size used when a search omits `limit`.
pub const DEFAULT_LIMIT: NonZeroU32 = match NonZeroU32::new(10) {
    Some(limit) => limit,
    None => unreachable!(),
};

fn default_limit() -> NonZeroU32 {
    DEFAULT_LIMIT
}

/// GeoJSON `Feature` type tag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeatureType {
    #[default]
    Feature,
}

/// GeoJSON `FeatureCollection` type tag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeatureCollectionType {
    #[default]
    FeatureCollection,
}

/// The filtering fields of a search: what to look for, without pagination state.
///
/// This is also the body of a `create-order` link, so a client can order exactly what it
/// searched for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpportunitySearch {
    pub datetime: DatetimeInterval,
    pub geometry: Geometry,
    /// CQL2 JSON filter expression, opaque to the orchestration layer.
    #[serde(default)]
    pub filter: Option<Value>,
}

/// Request body of `POST /products/{product_id}/opportunities`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpportunityPayload {
    pub datetime: DatetimeInterval,
    pub geometry: Geometry,
    #[serde(default)]
    pub filter: Option<Value>,
    /// Pagination cursor issued by the product backend on a previous page.
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default = "default_limit")]
    pub limit: NonZeroU32,
}

impl OpportunityPayload {
    /// Builds a first-page payload with the default limit.
    #[must_use]
    pub fn new(datetime: DatetimeInterval, geometry: Geometry) -> Self {
        Self {
            datetime,
            geometry,
            filter: None,
            next: None,
            limit: DEFAULT_LIMIT,
        }
    }

    /// The filtering fields only.
    #[must_use]
    pub fn search(&self) -> OpportunitySearch {
        OpportunitySearch {
            datetime: self.datetime,
            geometry: self.geometry.clone(),
            filter: self.filter.clone(),
        }
    }

    /// The same request positioned at another page.
    #[must_use]
    pub fn with_next(&self, cursor: impl Into<String>) -> Self {
        Self {
            next: Some(cursor.into()),
            ..self.clone()
        }
    }
}

/// Opportunity properties. `datetime` and `product_id` are always present; everything
/// else is product-specific and described by the product's opportunity-property schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpportunityProperties {
    pub datetime: DatetimeInterval,
    pub product_id: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A feasibility window offered by a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Opportunity {
    #[serde(rename = "type", default)]
    pub kind: FeatureType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub geometry: Geometry,
    pub properties: OpportunityProperties,
    #[serde(default)]
    pub links: Vec<Link>,
}

/// One page of search results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpportunityCollection {
    #[serde(rename = "type", default)]
    pub kind: FeatureCollectionType,
    pub features: Vec<Opportunity>,
    #[serde(default)]
    pub links: Vec<Link>,
}

impl OpportunityCollection {
    #[must_use]
    pub fn new(features: Vec<Opportunity>, links: Vec<Link>) -> Self {
        Self {
            kind: FeatureCollectionType::FeatureCollection,
            features,
            links,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn payload_json() -> Value {
        json!({
            "datetime": ["2024-01-01T00:00:00Z", "2024-01-02T00:00:00Z"],
            "geometry": {"type": "Point", "coordinates": [0.0, 0.0]},
            "limit": 2
        })
    }

    #[test]
    fn payload_defaults() {
        let payload: OpportunityPayload = serde_json::from_value(json!({
            "datetime": ["2024-01-01T00:00:00Z", "2024-01-02T00:00:00Z"],
            "geometry": {"type": "Point", "coordinates": [0.0, 0.0]}
        }))
        .unwrap();
        assert_eq!(payload.limit, DEFAULT_LIMIT);
        assert!(payload.next.is_none());
        assert!(payload.filter.is_none());
    }

    #[test]
    fn zero_limit_rejected() {
        let mut body = payload_json();
        body["limit"] = json!(0);
        assert!(serde_json::from_value::<OpportunityPayload>(body).is_err());
    }

    #[test]
    fn search_body_has_only_filtering_fields() {
        let payload: OpportunityPayload = serde_json::from_value(payload_json()).unwrap();
        let body = serde_json::to_value(payload.with_next("abc").search()).unwrap();
        let keys: Vec<&str> = body.as_object().unwrap().keys().map(String::as_str).collect();
        assert_eq!(keys.len(), 3);
        for key in ["datetime", "geometry", "filter"] {
            assert!(keys.contains(&key), "missing {key}");
        }
    }

    #[test]
    fn with_next_changes_only_cursor() {
        let payload: OpportunityPayload = serde_json::from_value(payload_json()).unwrap();
        let paged = payload.with_next("abc");
        assert_eq!(paged.next.as_deref(), Some("abc"));
        assert_eq!(OpportunityPayload { next: None, ..paged }, payload);
    }

    #[test]
    fn opportunity_keeps_product_specific_properties() {
        let opportunity: Opportunity = serde_json::from_value(json!({
            "type": "Feature",
            "geometry": {"type": "Point", "coordinates": [0.0, 0.0]},
            "properties": {
                "datetime": ["2024-01-01T00:00:00Z", "2024-01-02T00:00:00Z"],
                "product_id": "test-spotlight",
                "off_nadir": {"minimum": 20, "maximum": 22}
            }
        }))
        .unwrap();
        assert_eq!(opportunity.properties.product_id, "test-spotlight");
        assert_eq!(
            opportunity.properties.extra["off_nadir"],
            json!({"minimum": 20, "maximum": 22})
        );

        let back = serde_json::to_value(&opportunity).unwrap();
        assert_eq!(back["properties"]["off_nadir"]["maximum"], 22);
        assert_eq!(back["type"], "Feature");
    }

    #[test]
    fn collection_serializes_as_feature_collection() {
        let value = serde_json::to_value(OpportunityCollection::new(vec![], vec![])).unwrap();
        assert_eq!(value, json!({"type": "FeatureCollection", "features": [], "links": []}));
    }
}
