use axum::extract::FromRequestParts;
use http::request::Parts;
use std::convert::Infallible;

/// Copy of the request head, for the helpers that need the whole request and
/// not a single extracted value.
#[derive(Debug, Clone)]
pub struct RequestHead(pub Parts);

impl<S> FromRequestParts<S> for RequestHead
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(RequestHead(parts.clone()))
    }
}
