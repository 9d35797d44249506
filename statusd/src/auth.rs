use std::collections::HashSet;
use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::warn;

use crate::errors::{AuthError, Error};
use crate::metrics::AUTH_FAILURES_TOTAL;

pub const API_KEY_HEADER: &str = "X-API-Key";

/// Checks presented API keys against the allow-list loaded at startup.
///
/// Comparison is plain equality against a static set; there is no rotation,
/// hashing, or per-key scoping.
#[derive(Debug, Clone)]
pub struct Authenticator {
    keys: HashSet<String>,
}

impl Authenticator {
    pub fn new(keys: &[String]) -> Self {
        Self {
            keys: keys.iter().cloned().collect(),
        }
    }

    pub fn authenticate(&self, presented: Option<&str>) -> Result<(), AuthError> {
        match presented {
            None => Err(AuthError::MissingKey),
            Some(key) if self.keys.contains(key) => Ok(()),
            Some(_) => Err(AuthError::InvalidKey),
        }
    }
}

/// API key middleware for the status routes. `/health` and `/metrics` are
/// registered outside the gated router and never pass through here.
pub async fn api_key_auth(
    State(auth): State<Arc<Authenticator>>,
    headers: HeaderMap,
    request: Request,
    next: Next,
) -> Response {
    // A present header whose value is not valid header text still counts as
    // a presented (and necessarily unlisted) credential, not a missing one.
    let checked = match headers.get(API_KEY_HEADER) {
        None => Err(AuthError::MissingKey),
        Some(value) => match value.to_str() {
            Ok(key) => auth.authenticate(Some(key)),
            Err(_) => Err(AuthError::InvalidKey),
        },
    };

    match checked {
        Ok(()) => next.run(request).await,
        Err(e) => {
            AUTH_FAILURES_TOTAL.inc();
            warn!("Rejected request to {}: {}", request.uri().path(), e);
            Error::Auth(e).into_response()
        }
    }
}
