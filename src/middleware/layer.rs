//! Cache middleware.
//!
//! Per request: ineligible requests pass straight through; eligible ones are
//! looked up by key and either replayed from the store (hit) or handed to the
//! rest of the stack with their response body wrapped in a [`CaptureBody`]
//! (miss).

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{HeaderName, HeaderValue, Method, Request, StatusCode},
    middleware::Next,
    response::Response,
};
use tracing::{debug, instrument};

use super::cache_control::CacheControl;
use super::capture::{CaptureBody, PendingEntry};
use super::options::{CacheOptions, CallerIdentity};
use super::{X_CACHE, X_CACHE_HITS};
use crate::cache::{current_timestamp_ms, read_store, write_store, CacheEntry, SharedStore};

/// State for one middleware instance: the shared store plus this instance's
/// options.
#[derive(Clone, Debug)]
pub struct ResponseCache {
    store: SharedStore,
    options: Arc<CacheOptions>,
}

impl ResponseCache {
    pub fn new(store: SharedStore, options: CacheOptions) -> Self {
        Self {
            store,
            options: Arc::new(options),
        }
    }

    pub fn store(&self) -> &SharedStore {
        &self.store
    }

    pub fn options(&self) -> &CacheOptions {
        &self.options
    }

    /// GET only; authenticated callers only with per-user caching; and no
    /// `no-store` / `no-cache` on the request when the policy is enforced.
    fn is_eligible(&self, request: &Request<Body>, identity: Option<&CallerIdentity>) -> bool {
        if request.method() != Method::GET {
            return false;
        }
        if identity.is_some() && !self.options.caches_authenticated() {
            return false;
        }
        if self.options.respects_cache_control()
            && CacheControl::from_headers(request.headers()).forbids_lookup()
        {
            return false;
        }
        true
    }
}

/// Response cache middleware, installed with
/// `axum::middleware::from_fn_with_state(cache, response_cache)`.
///
/// Cache failures never change the response: a broken or full store only
/// means the next request is a miss.
#[instrument(skip_all, fields(method = %request.method(), path = %request.uri().path()))]
pub async fn response_cache(
    State(cache): State<ResponseCache>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let identity = request.extensions().get::<CallerIdentity>().cloned();
    if !cache.is_eligible(&request, identity.as_ref()) {
        return next.run(request).await;
    }

    let key = cache.options.key_for(&request, identity.as_ref());

    let cached = write_store(&cache.store, "middleware.get").get(&key);
    if let Some(entry) = cached {
        debug!(
            key = %key,
            hits = entry.hit_count,
            age_ms = entry.age_ms(current_timestamp_ms()),
            "cache hit"
        );
        return replay(entry);
    }

    debug!(key = %key, "cache miss, running handler");
    let response = next.run(request).await;
    let (mut parts, body) = response.into_parts();

    let stored_headers = cache.options.storable_headers(&parts.headers);
    parts
        .headers
        .insert(HeaderName::from_static(X_CACHE), HeaderValue::from_static("MISS"));

    if !parts.status.is_success() {
        debug!(
            key = %key,
            status = parts.status.as_u16(),
            "status not cacheable, not capturing"
        );
        return Response::from_parts(parts, body);
    }

    let policy = if cache.options.respects_cache_control() {
        CacheControl::from_headers(&parts.headers)
    } else {
        CacheControl::default()
    };
    if policy.forbids_storage() {
        debug!(key = %key, "response marked no-store or private, not caching");
        return Response::from_parts(parts, body);
    }

    let limit = read_store(&cache.store, "middleware.limit").max_size_bytes();
    let pending = PendingEntry {
        store: cache.store.clone(),
        key,
        status: parts.status,
        headers: stored_headers,
        ttl_seconds: cache.options.effective_ttl(&policy),
    };

    Response::from_parts(parts, Body::new(CaptureBody::new(body, pending, limit)))
}

/// Rebuilds a response from a stored entry, adding the hit markers.
fn replay(entry: CacheEntry) -> Response {
    let mut response = Response::new(Body::from(entry.body));
    *response.status_mut() = StatusCode::from_u16(entry.status).unwrap_or(StatusCode::OK);
    *response.headers_mut() = entry.headers;

    let headers = response.headers_mut();
    headers.insert(HeaderName::from_static(X_CACHE), HeaderValue::from_static("HIT"));
    headers.insert(
        HeaderName::from_static(X_CACHE_HITS),
        HeaderValue::from(entry.hit_count),
    );
    response
}
