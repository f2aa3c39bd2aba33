//! Order payloads, orders, and order status history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::datetime::DatetimeInterval;
use super::geometry::Geometry;
use super::link::Link;
use super::opportunity::{FeatureCollectionType, FeatureType, OpportunitySearch};

/// Request body of `POST /products/{product_id}/orders`.
///
/// The leading fields are the same filtering fields a `create-order` link carries;
/// `order_parameters` is product-specific and checked against the product's
/// order-parameter schema before the backend sees it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderPayload {
    pub datetime: DatetimeInterval,
    pub geometry: Geometry,
    #[serde(default)]
    pub filter: Option<Value>,
    #[serde(default)]
    pub order_parameters: Map<String, Value>,
}

impl OrderPayload {
    #[must_use]
    pub fn search(&self) -> OpportunitySearch {
        OpportunitySearch {
            datetime: self.datetime,
            geometry: self.geometry.clone(),
            filter: self.filter.clone(),
        }
    }
}

/// Lifecycle state of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatusCode {
    Received,
    Accepted,
    Rejected,
    Completed,
    Canceled,
    Scheduled,
    Held,
    Processing,
    Reserved,
    Tasked,
    UserCancelled,
}

/// One entry in an order's status history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderStatus {
    pub timestamp: DateTime<Utc>,
    pub status_code: OrderStatusCode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason_text: Option<String>,
    #[serde(default)]
    pub links: Vec<Link>,
}

impl OrderStatus {
    #[must_use]
    pub fn new(timestamp: DateTime<Utc>, status_code: OrderStatusCode) -> Self {
        Self {
            timestamp,
            status_code,
            reason_code: None,
            reason_text: None,
            links: Vec::new(),
        }
    }
}

/// Descriptive order properties.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderProperties {
    pub product_id: String,
    pub created: DateTime<Utc>,
    pub search_parameters: OpportunitySearch,
    #[serde(default)]
    pub order_parameters: Map<String, Value>,
    #[serde(default)]
    pub opportunity_properties: Map<String, Value>,
}

/// A committed order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    #[serde(rename = "type", default)]
    pub kind: FeatureType,
    pub id: String,
    pub status: OrderStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geometry: Option<Geometry>,
    pub properties: OrderProperties,
    #[serde(default)]
    pub links: Vec<Link>,
}

/// A list of orders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderCollection {
    #[serde(rename = "type", default)]
    pub kind: FeatureCollectionType,
    pub features: Vec<Order>,
    #[serde(default)]
    pub links: Vec<Link>,
}

impl OrderCollection {
    #[must_use]
    pub fn new(features: Vec<Order>, links: Vec<Link>) -> Self {
        Self {
            kind: FeatureCollectionType::FeatureCollection,
            features,
            links,
        }
    }
}

/// Status history served by `GET /orders/{order_id}/statuses`, newest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderStatuses {
    pub statuses: Vec<OrderStatus>,
    #[serde(default)]
    pub links: Vec<Link>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn order_payload_accepts_create_order_link_body() {
        // A create-order link body has no order_parameters; it must still parse.
        let payload: OrderPayload = serde_json::from_value(json!({
            "datetime": ["2024-01-01T00:00:00Z", "2024-01-02T00:00:00Z"],
            "geometry": {"type": "Point", "coordinates": [0.0, 0.0]},
            "filter": null
        }))
        .unwrap();
        assert!(payload.order_parameters.is_empty());
        assert_eq!(payload.search().filter, None);
    }

    #[test]
    fn status_code_wire_names() {
        assert_eq!(
            serde_json::to_value(OrderStatusCode::UserCancelled).unwrap(),
            json!("user_cancelled")
        );
        assert_eq!(
            serde_json::from_value::<OrderStatusCode>(json!("received")).unwrap(),
            OrderStatusCode::Received
        );
    }

    #[test]
    fn status_omits_empty_reasons() {
        let status = OrderStatus::new(
            "2024-01-01T00:00:00Z".parse().unwrap(),
            OrderStatusCode::Accepted,
        );
        let value = serde_json::to_value(status).unwrap();
        assert!(value.get("reason_code").is_none());
        assert_eq!(value["status_code"], "accepted");
    }
}
