//! Request extractors and response wrappers shared by the handlers.

use std::ops::Deref;

use axum::extract::{FromRequest, FromRequestParts, Request};
use axum::http::header::{CONTENT_TYPE, HOST};
use axum::http::request::Parts;
use axum::http::{HeaderMap, HeaderValue};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tasking_core::models::TYPE_GEOJSON;
use tasking_core::RequestContext;
use url::Url;

use super::error::ApiError;
use super::handlers::AppState;

/// Header name for request IDs.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// [`RequestContext`] extracted from the incoming request.
///
/// The base URL is the configured public URL when there is one, otherwise it is built from
/// `X-Forwarded-Proto`/`X-Forwarded-Host` or `Host`. The request id is taken from
/// `x-request-id`, which the request-id layer sets on every request.
#[derive(Debug, Clone)]
pub struct RequestCtx(pub RequestContext);

impl Deref for RequestCtx {
    type Target = RequestContext;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequestParts<AppState> for RequestCtx {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(existing) = parts.extensions.get::<Self>() {
            return Ok(existing.clone());
        }

        let request_id = request_id_from_headers(&parts.headers)
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

        let base_url = match &state.config.public_base_url {
            Some(url) => url.clone(),
            None => base_url_from_headers(&parts.headers).ok_or_else(|| {
                ApiError::bad_request("missing or invalid Host header")
                    .with_request_id(request_id.clone())
            })?,
        };

        // The request URL is resolved against the normalised base, so build the context
        // first and fill in the URL afterwards.
        let mut ctx = RequestContext::new(request_id.clone(), base_url.clone(), base_url);
        let path = parts
            .uri
            .path_and_query()
            .map_or("", |pq| pq.as_str())
            .trim_start_matches('/');
        ctx.url = ctx.base_url.join(path).map_err(|_| {
            ApiError::bad_request("request path cannot be resolved").with_request_id(request_id)
        })?;

        let ctx = Self(ctx);
        parts.extensions.insert(ctx.clone());
        Ok(ctx)
    }
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

fn request_id_from_headers(headers: &HeaderMap) -> Option<String> {
    header_str(headers, REQUEST_ID_HEADER).map(str::to_string)
}

fn base_url_from_headers(headers: &HeaderMap) -> Option<Url> {
    let scheme = header_str(headers, "x-forwarded-proto")
        .and_then(|value| value.split(',').next())
        .map_or("http", str::trim);
    let host = header_str(headers, "x-forwarded-host")
        .or_else(|| header_str(headers, HOST.as_str()))?;
    Url::parse(&format!("{scheme}://{host}/")).ok()
}

/// JSON body extractor whose rejections are [`ApiError`]s.
#[derive(Debug, Clone)]
pub struct ApiJson<T>(pub T);

impl<S, T> FromRequest<S> for ApiJson<T>
where
    Json<T>: FromRequest<S, Rejection = axum::extract::rejection::JsonRejection>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let request_id = request_id_from_headers(req.headers());
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => {
                let err = ApiError::from_rejection(&rejection);
                Err(match request_id {
                    Some(id) => err.with_request_id(id),
                    None => err,
                })
            }
        }
    }
}

/// JSON response served as `application/geo+json`.
#[derive(Debug, Clone)]
pub struct GeoJson<T>(pub T);

impl<T: Serialize> IntoResponse for GeoJson<T> {
    fn into_response(self) -> Response {
        let mut response = Json(self.0).into_response();
        if response.status().is_success() {
            response
                .headers_mut()
                .insert(CONTENT_TYPE, HeaderValue::from_static(TYPE_GEOJSON));
        }
        response
    }
}
