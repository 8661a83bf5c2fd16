use axum_extra::extract::{
    PrivateCookieJar,
    cookie::{Cookie, CookieJar},
};
use http::request::Parts;
use time::Duration;

use crate::origin::is_https;

pub const DELETED_VALUE: &str = "deleted";

/// A cookie jar, plain or encrypted.
pub trait CookieStore: Sized {
    /// Value as the application sees it, `None` if absent or not readable.
    fn value(&self, name: &str) -> Option<String>;
    fn with(self, cookie: Cookie<'static>) -> Self;
}

impl CookieStore for CookieJar {
    fn value(&self, name: &str) -> Option<String> {
        self.get(name).map(|cookie| cookie.value().to_owned())
    }

    fn with(self, cookie: Cookie<'static>) -> Self {
        self.add(cookie)
    }
}

// Cookies that fail to decrypt are not returned
impl CookieStore for PrivateCookieJar {
    fn value(&self, name: &str) -> Option<String> {
        self.get(name).map(|cookie| cookie.value().to_owned())
    }

    fn with(self, cookie: Cookie<'static>) -> Self {
        self.add(cookie)
    }
}

/// Gets a cookie value, an absent cookie gives an empty string.
pub fn get_cookie<J: CookieStore>(jar: &J, name: &str) -> String {
    jar.value(name).unwrap_or_default()
}

/// Writes an http only cookie for the whole site, secured if the request came through HTTPS.
pub fn set_cookie<J: CookieStore>(jar: J, parts: &Parts, name: &str, value: &str) -> J {
    jar.with(site_cookie(parts, name, value, true))
}

/// Overwrites the cookie with an already expired one.
pub fn delete_cookie<J: CookieStore>(jar: J, parts: &Parts, name: &str) -> J {
    let mut cookie = Cookie::build((name.to_owned(), DELETED_VALUE.to_owned()))
        .path("/")
        .max_age(Duration::seconds(-1))
        .build();
    if let Some(domain) = request_domain(parts) {
        cookie.set_domain(domain);
    }
    jar.with(cookie)
}

pub(crate) fn site_cookie(
    parts: &Parts,
    name: &str,
    value: &str,
    http_only: bool,
) -> Cookie<'static> {
    let mut cookie = Cookie::build((name.to_owned(), value.to_owned()))
        .path("/")
        .http_only(http_only)
        .secure(is_https(parts))
        .build();
    if let Some(domain) = request_domain(parts) {
        cookie.set_domain(domain);
    }
    cookie
}

// The port is not part of a cookie domain
fn request_domain(parts: &Parts) -> Option<String> {
    parts
        .uri
        .host()
        .filter(|host| !host.is_empty())
        .map(|host| host.to_owned())
}
