//! Route identities and hypermedia link construction.
//!
//! Everything here is a pure function of its arguments: the same route, request context,
//! relation and body always produce the same [`Link`]. Nothing reads or writes shared
//! state, so links can be built any number of times per request.

use serde_json::Value;
use tasking_core::models::{TYPE_GEOJSON, TYPE_JSON};
use tasking_core::{Link, Order, Rel, RequestContext};
use url::Url;

/// HTTP method of actionable links.
pub const METHOD_POST: &str = "POST";

// ---------------------------------------------------------------------------
// Route
// ---------------------------------------------------------------------------

/// A named API route, optionally bound to a product or order id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route<'a> {
    Root,
    Conformance,
    Products,
    Product(&'a str),
    Constraints(&'a str),
    OrderParameters(&'a str),
    SearchOpportunities(&'a str),
    CreateOrder(&'a str),
    Orders,
    Order(&'a str),
    OrderStatuses(&'a str),
}

impl Route<'_> {
    /// Path segments below the base URL. Ids are single segments and get percent-encoded
    /// when the href is built.
    fn segments(&self) -> Vec<&str> {
        match *self {
            Self::Root => vec![],
            Self::Conformance => vec!["conformance"],
            Self::Products => vec!["products"],
            Self::Product(id) => vec!["products", id],
            Self::Constraints(id) => vec!["products", id, "constraints"],
            Self::OrderParameters(id) => vec!["products", id, "order-parameters"],
            Self::SearchOpportunities(id) => vec!["products", id, "opportunities"],
            Self::CreateOrder(id) => vec!["products", id, "orders"],
            Self::Orders => vec!["orders"],
            Self::Order(id) => vec!["orders", id],
            Self::OrderStatuses(id) => vec!["orders", id, "statuses"],
        }
    }

    /// Absolute URL of this route under the request's base URL.
    #[must_use]
    pub fn href(&self, ctx: &RequestContext) -> Url {
        let mut url = ctx.base_url.clone();
        url.set_query(None);
        url.set_fragment(None);

        let segments = self.segments();
        if segments.is_empty() {
            return url;
        }
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }
}

// ---------------------------------------------------------------------------
// Link constructors
// ---------------------------------------------------------------------------

/// A navigational link to `route`.
#[must_use]
pub fn link(route: Route<'_>, ctx: &RequestContext, rel: Rel, media_type: &str) -> Link {
    Link::navigation(route.href(ctx), rel, media_type)
}

/// An actionable link: `POST` `body` to `route`.
#[must_use]
pub fn action_link(
    route: Route<'_>,
    ctx: &RequestContext,
    rel: Rel,
    media_type: &str,
    body: Value,
) -> Link {
    Link::action(route.href(ctx), rel, media_type, METHOD_POST, body)
}

/// `create-order` link for a product. `search_body` is the filtering fields of the
/// search that produced it.
#[must_use]
pub fn create_order_link(product_id: &str, ctx: &RequestContext, search_body: Value) -> Link {
    action_link(
        Route::CreateOrder(product_id),
        ctx,
        Rel::CreateOrder,
        TYPE_JSON,
        search_body,
    )
}

/// `next` link: re-send `request_body` (already carrying the new cursor) to the URL of
/// the current request.
#[must_use]
pub fn next_link(ctx: &RequestContext, request_body: Value) -> Link {
    Link::action(
        ctx.url.as_str(),
        Rel::Next,
        TYPE_JSON,
        METHOD_POST,
        request_body,
    )
}

/// Links of a product document.
#[must_use]
pub fn product_links(product_id: &str, ctx: &RequestContext) -> Vec<Link> {
    vec![
        link(Route::Product(product_id), ctx, Rel::SelfLink, TYPE_JSON),
        link(Route::Constraints(product_id), ctx, Rel::Constraints, TYPE_JSON),
        link(
            Route::OrderParameters(product_id),
            ctx,
            Rel::OrderParameters,
            TYPE_JSON,
        ),
        link(
            Route::SearchOpportunities(product_id),
            ctx,
            Rel::Opportunities,
            TYPE_JSON,
        ),
        link(Route::CreateOrder(product_id), ctx, Rel::CreateOrder, TYPE_JSON),
    ]
}

/// Top-level navigational links of an order.
#[must_use]
pub fn order_links(order: &Order, ctx: &RequestContext) -> Vec<Link> {
    vec![
        link(Route::Order(&order.id), ctx, Rel::SelfLink, TYPE_GEOJSON),
        link(Route::OrderStatuses(&order.id), ctx, Rel::Monitor, TYPE_JSON),
        link(
            Route::Product(&order.properties.product_id),
            ctx,
            Rel::Product,
            TYPE_JSON,
        ),
    ]
}

/// Links of the landing page.
#[must_use]
pub fn root_links(ctx: &RequestContext) -> Vec<Link> {
    vec![
        link(Route::Root, ctx, Rel::SelfLink, TYPE_JSON),
        link(Route::Conformance, ctx, Rel::Conformance, TYPE_JSON),
        link(Route::Products, ctx, Rel::Products, TYPE_JSON),
        link(Route::Orders, ctx, Rel::Orders, TYPE_GEOJSON),
    ]
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
