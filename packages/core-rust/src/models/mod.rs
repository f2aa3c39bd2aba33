//! Wire and domain types shared by the orchestration engine and its backends.

pub mod datetime;
pub mod geometry;
pub mod link;
pub mod opportunity;
pub mod order;
pub mod product;
pub mod root;

pub use datetime::{DatetimeInterval, DatetimeIntervalError};
pub use geometry::{Geometry, Position};
pub use link::{find_link, Link, Rel, TYPE_GEOJSON, TYPE_JSON};
pub use opportunity::{
    FeatureCollectionType, FeatureType, Opportunity, OpportunityCollection, OpportunityPayload,
    OpportunityProperties, OpportunitySearch, DEFAULT_LIMIT,
};
pub use order::{
    Order, OrderCollection, OrderPayload, OrderProperties, OrderStatus, OrderStatusCode,
    OrderStatuses,
};
pub use product::{ProductDocument, ProductMetadata, ProductsCollection, Provider, ProviderRole};
pub use root::{Conformance, RootDocument, CORE};
