//! Opportunity search orchestration.

use std::sync::Arc;
use std::time::Instant;

use tasking_core::{OpportunityCollection, OpportunityPayload, RequestContext};
use tracing::{error, info_span, warn, Instrument};

use super::config::ServerConfig;
use super::error::{internal, settle, ServiceError};
use super::links::{create_order_link, next_link};
use super::product::Product;

const ACTION: &str = "searching opportunities";
const PUBLIC_MESSAGE: &str = "Error searching opportunities";

/// Runs one page of an opportunity search against a product backend and attaches the
/// `create-order` and `next` links to the result.
#[derive(Debug, Clone, Default)]
pub struct OpportunityService {
    config: Arc<ServerConfig>,
}

impl OpportunityService {
    #[must_use]
    pub fn new(config: Arc<ServerConfig>) -> Self {
        Self { config }
    }

    /// Searches one page of opportunities.
    ///
    /// The backend is called exactly once. The cursor in `payload.next` reaches it
    /// untouched, and the cursor it returns is placed, untouched, in the body of the
    /// `next` link.
    ///
    /// # Errors
    ///
    /// - `ServiceError::Validation` if `limit` exceeds the configured maximum.
    /// - `ServiceError::ConstraintViolation` if the backend rejected the search.
    /// - `ServiceError::Internal` for any backend failure, or if the backend returned an
    ///   opportunity whose `product_id` is not this product's.
    pub async fn search(
        &self,
        product: &Product,
        payload: OpportunityPayload,
        ctx: &RequestContext,
    ) -> Result<OpportunityCollection, ServiceError> {
        if let Some(max) = self.config.max_limit {
            if payload.limit > max {
                return Err(ServiceError::validation(vec![format!(
                    "limit {} exceeds maximum of {max}",
                    payload.limit
                )]));
            }
        }

        let span = info_span!(
            "search_opportunities",
            product_id = product.id(),
            request_id = %ctx.request_id,
            limit = payload.limit.get(),
            returned = tracing::field::Empty,
        );

        async move {
            let search = payload.search();
            let start = Instant::now();
            let outcome = product
                .backend()
                .search_opportunities(
                    product,
                    &search,
                    payload.next.as_deref(),
                    payload.limit,
                    ctx,
                )
                .await;
            #[allow(clippy::cast_possible_truncation)]
            let duration_ms = start.elapsed().as_millis() as u64;
            tracing::debug!(duration_ms, "backend search returned");

            let mut page = settle(outcome, ACTION, PUBLIC_MESSAGE)?;

            if let Some(foreign) = page
                .opportunities
                .iter()
                .find(|o| o.properties.product_id != product.id())
            {
                error!(
                    foreign_product_id = %foreign.properties.product_id,
                    opportunity_id = ?foreign.id,
                    "backend returned an opportunity for another product"
                );
                return Err(ServiceError::Internal {
                    message: PUBLIC_MESSAGE,
                });
            }

            let limit = usize::try_from(payload.limit.get()).unwrap_or(usize::MAX);
            if page.opportunities.len() > limit {
                warn!(
                    returned = page.opportunities.len(),
                    limit, "backend returned more opportunities than requested; truncating"
                );
                page.opportunities.truncate(limit);
            }
            tracing::Span::current().record("returned", page.opportunities.len());

            let search_body =
                serde_json::to_value(&search).map_err(|e| internal(&e, ACTION, PUBLIC_MESSAGE))?;
            let mut links = vec![create_order_link(product.id(), ctx, search_body)];

            if let Some(cursor) = page.next {
                let request_body = serde_json::to_value(payload.with_next(cursor))
                    .map_err(|e| internal(&e, ACTION, PUBLIC_MESSAGE))?;
                links.push(next_link(ctx, request_body));
            }

            Ok(OpportunityCollection::new(page.opportunities, links))
        }
        .instrument(span)
        .await
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::num::NonZeroU32;
    use std::sync::atomic::Ordering;
    use std::time::Duration;

    use serde_json::json;
    use tasking_core::Rel;

    use super::*;
    use crate::service::registry::ProductRegistry;
    use crate::service::test_support::{ctx, payload, LogCapture, ScriptedBackend, SearchScript};

    fn product(backend: &Arc<ScriptedBackend>) -> Product {
        Product::new("test-spotlight", backend.clone())
    }

    fn service() -> OpportunityService {
        OpportunityService::default()
    }

    #[tokio::test]
    async fn page_with_cursor_gets_create_order_and_next() {
        let backend = Arc::new(ScriptedBackend::searching(SearchScript::Page {
            count: 2,
            next: Some("abc".into()),
        }));
        let request = payload(10);

        let page = service()
            .search(&product(&backend), request.clone(), &ctx())
            .await
            .unwrap();

        assert_eq!(page.features.len(), 2);
        let rels: Vec<Rel> = page.links.iter().map(|l| l.rel).collect();
        assert_eq!(rels, vec![Rel::CreateOrder, Rel::Next]);

        let create = &page.links[0];
        assert_eq!(create.href, "http://stapiserver/products/test-spotlight/orders");
        assert_eq!(create.method(), Some("POST"));
        let body = create.body().unwrap().as_object().unwrap();
        let mut keys: Vec<&str> = body.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(keys, vec!["datetime", "filter", "geometry"]);

        let next = &page.links[1];
        assert_eq!(next.href, ctx().url.as_str());
        assert_eq!(next.method(), Some("POST"));
        let expected = serde_json::to_value(request.with_next("abc")).unwrap();
        assert_eq!(next.body().unwrap(), &expected);
    }

    #[tokio::test]
    async fn next_body_is_normalised_request() {
        let backend = Arc::new(ScriptedBackend::searching(SearchScript::Page {
            count: 1,
            next: Some("p2".into()),
        }));
        let request: OpportunityPayload = serde_json::from_value(json!({
            "datetime": "2024-01-01T00:00:00Z/2024-01-02T00:00:00Z",
            "geometry": {"type": "Point", "coordinates": [5, 10]},
            "limit": 10,
        }))
        .unwrap();

        let page = service()
            .search(&product(&backend), request, &ctx())
            .await
            .unwrap();

        let body = page.links[1].body().unwrap();
        assert_eq!(
            body["datetime"],
            json!(["2024-01-01T00:00:00Z", "2024-01-02T00:00:00Z"])
        );
        assert_eq!(body["geometry"]["coordinates"], json!([5.0, 10.0]));
        assert_eq!(body["next"], "p2");
    }

    #[tokio::test]
    async fn last_page_has_only_create_order() {
        let backend = Arc::new(ScriptedBackend::searching(SearchScript::Empty));

        let page = service()
            .search(&product(&backend), payload(10), &ctx())
            .await
            .unwrap();

        assert!(page.features.is_empty());
        assert_eq!(page.links.len(), 1);
        assert_eq!(page.links[0].rel, Rel::CreateOrder);
    }

    #[tokio::test]
    async fn cursor_and_limit_reach_backend_unchanged() {
        let backend = Arc::new(ScriptedBackend::searching(SearchScript::Empty));
        let request = payload(5).with_next("opaque/cursor==");

        service()
            .search(&product(&backend), request, &ctx())
            .await
            .unwrap();

        assert_eq!(backend.search_calls.load(Ordering::SeqCst), 1);
        assert_eq!(backend.last_cursor.lock().as_deref(), Some("opaque/cursor=="));
        assert_eq!(*backend.last_limit.lock(), Some(5));
    }

    #[tokio::test]
    async fn filter_is_carried_into_links() {
        let backend = Arc::new(ScriptedBackend::searching(SearchScript::Page {
            count: 1,
            next: Some("p2".into()),
        }));
        let filter = json!({"op": "<", "args": [{"property": "off_nadir"}, 30]});
        let mut request = payload(10);
        request.filter = Some(filter.clone());

        let page = service()
            .search(&product(&backend), request, &ctx())
            .await
            .unwrap();

        for link in &page.links {
            assert_eq!(link.body().unwrap()["filter"], filter);
        }
    }

    #[tokio::test]
    async fn violation_detail_passes_through() {
        let detail = json!({"field": "filter", "reason": "unsupported property"});
        let backend = Arc::new(ScriptedBackend::searching(SearchScript::Violation(
            detail.clone(),
        )));

        let err = service()
            .search(&product(&backend), payload(10), &ctx())
            .await
            .unwrap_err();

        match err {
            ServiceError::ConstraintViolation(v) => assert_eq!(v.detail, detail),
            other => panic!("expected violation, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn failure_is_generic_and_logged() {
        let capture = LogCapture::default();
        let _guard = capture.install();
        let backend = Arc::new(ScriptedBackend::searching(SearchScript::Failure(
            "upstream timeout talking to tasking-db".into(),
        )));

        let err = service()
            .search(&product(&backend), payload(10), &ctx())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ServiceError::Internal {
                message: "Error searching opportunities"
            }
        ));
        assert!(!err.to_string().contains("tasking-db"));
        let logs = capture.contents();
        assert!(logs.contains("ERROR"));
        assert!(logs.contains("tasking-db"));
    }

    #[tokio::test]
    async fn opportunity_for_another_product_is_internal_error() {
        let capture = LogCapture::default();
        let _guard = capture.install();
        let backend = Arc::new(ScriptedBackend::searching(SearchScript::Foreign(
            "someone-else".into(),
        )));

        let err = service()
            .search(&product(&backend), payload(10), &ctx())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ServiceError::Internal {
                message: "Error searching opportunities"
            }
        ));
        assert!(!err.to_string().contains("someone-else"));
        let logs = capture.contents();
        assert!(logs.contains("ERROR"));
        assert!(logs.contains("someone-else"));
    }

    #[tokio::test]
    async fn violation_is_not_logged_as_error() {
        let capture = LogCapture::default();
        let _guard = capture.install();
        let backend = Arc::new(ScriptedBackend::searching(SearchScript::Violation(json!(
            "too cloudy"
        ))));

        let _ = service()
            .search(&product(&backend), payload(10), &ctx())
            .await;

        assert!(!capture.contents().contains("ERROR"));
    }

    #[tokio::test]
    async fn oversized_page_is_truncated() {
        let backend = Arc::new(ScriptedBackend::searching(SearchScript::Page {
            count: 7,
            next: None,
        }));

        let page = service()
            .search(&product(&backend), payload(3), &ctx())
            .await
            .unwrap();

        assert_eq!(page.features.len(), 3);
    }

    #[tokio::test]
    async fn limit_above_maximum_skips_backend() {
        let config = ServerConfig {
            max_limit: NonZeroU32::new(50),
            ..ServerConfig::default()
        };
        let service = OpportunityService::new(Arc::new(config));
        let backend = Arc::new(ScriptedBackend::searching(SearchScript::Empty));

        let err = service
            .search(&product(&backend), payload(51), &ctx())
            .await
            .unwrap_err();

        assert!(matches!(err, ServiceError::Validation { .. }));
        assert_eq!(backend.search_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn identical_requests_produce_identical_pages() {
        let backend = Arc::new(ScriptedBackend::searching(SearchScript::Page {
            count: 2,
            next: Some("abc".into()),
        }));
        let product = product(&backend);

        let a = service().search(&product, payload(10), &ctx()).await.unwrap();
        let b = service().search(&product, payload(10), &ctx()).await.unwrap();

        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn cancelled_search_leaves_registry_usable() {
        let backend = Arc::new(ScriptedBackend::searching(SearchScript::Pending));
        let mut registry = ProductRegistry::new();
        registry.register(product(&backend)).unwrap();
        let registry = Arc::new(registry);

        let product = registry.lookup("test-spotlight").unwrap();
        let result = tokio::time::timeout(
            Duration::from_millis(20),
            service().search(&product, payload(10), &ctx()),
        )
        .await;

        assert!(result.is_err());
        assert_eq!(registry.len(), 1);
        assert!(registry.lookup("test-spotlight").is_ok());
        assert_eq!(backend.search_calls.load(Ordering::SeqCst), 1);
    }
}
