//! Default cache key algorithm.

use axum::{
    body::Body,
    http::{
        header::{ACCEPT, ACCEPT_ENCODING, ACCEPT_LANGUAGE},
        HeaderName, Request,
    },
};
use sha2::{Digest, Sha256};

use super::options::CallerIdentity;

/// Derives a request's cache key.
///
/// Method, path and query, the three content-negotiation headers and, when
/// given, a `user:<id>` token are hashed in that order, each preceded by its
/// length so no bytes can shift from one field into the next. The key is
/// `prefix` followed by the first 128 bits of the SHA-256 digest in hex.
pub fn default_key(
    request: &Request<Body>,
    identity: Option<&CallerIdentity>,
    prefix: &str,
) -> String {
    let path_and_query = request
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or("/");
    let user = identity.map(|caller| format!("user:{}", caller.id()));

    let mut parts = vec![
        request.method().as_str(),
        path_and_query,
        header_str(request, &ACCEPT),
        header_str(request, &ACCEPT_LANGUAGE),
        header_str(request, &ACCEPT_ENCODING),
    ];
    if let Some(user) = &user {
        parts.push(user.as_str());
    }

    let mut hasher = Sha256::new();
    for part in &parts {
        hasher.update((part.len() as u64).to_be_bytes());
        hasher.update(part.as_bytes());
    }
    let digest = hasher.finalize();
    format!("{}{}", prefix, hex::encode(&digest[..16]))
}

fn header_str<'a>(request: &'a Request<Body>, name: &HeaderName) -> &'a str {
    request
        .headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
}
