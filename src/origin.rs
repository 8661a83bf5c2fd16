use axum::extract::FromRequestParts;
use http::{HeaderMap, header::HOST, request::Parts, uri::Authority};
use std::{convert::Infallible, fmt::Display};

const X_FORWARDED_PROTO_HEADER_KEY: &str = "X-Forwarded-Proto";

/// Host returned when no source yields a value.
pub const DEFAULT_HOST: &str = "localhost:8080";

/// Tells if the original request was made over HTTPS, even when it was routed
/// through a reverse proxy doing SSL termination.
///
/// The checks are made in order, first match wins:
/// - scheme of the request URI
/// - `X-Forwarded-Proto` header equal to `https`
///
/// The protocol version says nothing about TLS: `http::Version` only knows `HTTP/x`.
pub fn is_https(parts: &Parts) -> bool {
    parts.uri.scheme_str() == Some("https")
        || header_str(&parts.headers, X_FORWARDED_PROTO_HEADER_KEY) == Some("https")
}

pub fn scheme(parts: &Parts) -> &'static str {
    if is_https(parts) { "https" } else { "http" }
}

/// A place where the host of a request may be found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostSource {
    /// `Host` header
    Host,
    /// Authority of the request URI, without user info
    UriAuthority,
    Header(&'static str),
}

impl HostSource {
    /// Default resolution order. `X-Forwarded-For` usually carries client addresses
    /// and not hostnames, but it is kept here for compatibility with existing deployments.
    pub const DEFAULT: [HostSource; 5] = [
        HostSource::Host,
        HostSource::UriAuthority,
        HostSource::Header("X-Forwarded-For"),
        HostSource::Header("X-Host"),
        HostSource::Header("XFF"),
    ];

    pub const WITHOUT_CLIENT_IP: [HostSource; 4] = [
        HostSource::Host,
        HostSource::UriAuthority,
        HostSource::Header("X-Host"),
        HostSource::Header("XFF"),
    ];

    fn extract<'a>(&self, parts: &'a Parts) -> Option<&'a str> {
        match self {
            HostSource::Host => header_str(&parts.headers, HOST.as_str()),
            HostSource::UriAuthority => parts.uri.authority().map(parse_authority),
            HostSource::Header(name) => header_str(&parts.headers, name),
        }
    }
}

/// Returns the first non empty host found in `sources`, or [`DEFAULT_HOST`].
pub fn host_from(parts: &Parts, sources: &[HostSource]) -> String {
    sources
        .iter()
        .filter_map(|source| source.extract(parts))
        .find(|host| !host.is_empty())
        .unwrap_or(DEFAULT_HOST)
        .to_owned()
}

pub fn host(parts: &Parts) -> String {
    host_from(parts, &HostSource::DEFAULT)
}

/// Scheme and host of the request, the path is excluded.
pub fn url(parts: &Parts) -> String {
    format!("{}://{}", scheme(parts), host(parts))
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|value| value.to_str().ok())
}

fn parse_authority(auth: &Authority) -> &str {
    auth.as_str()
        .rsplit('@')
        .next()
        .expect("split always has at least 1 item")
}

/// Extractor giving the scheme and host the client used to reach us.
///
/// It never rejects: missing information falls back to `http` and [`DEFAULT_HOST`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestOrigin {
    pub scheme: &'static str,
    pub host: String,
}

impl RequestOrigin {
    pub fn from_parts(parts: &Parts) -> Self {
        RequestOrigin {
            scheme: scheme(parts),
            host: host(parts),
        }
    }

    pub fn is_https(&self) -> bool {
        self.scheme == "https"
    }

    pub fn url(&self) -> String {
        self.to_string()
    }
}

impl Display for RequestOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}://{}", self.scheme, self.host)
    }
}

impl<S> FromRequestParts<S> for RequestOrigin
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(RequestOrigin::from_parts(parts))
    }
}
