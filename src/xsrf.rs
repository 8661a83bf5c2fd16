//! Stateless cross site request forgery protection.
//!
//! A token is `base64url(signature).issue_time_millis`, the signature being an
//! HMAC-SHA256 of the subject (the user login), the scope and the issue time, keyed
//! with a caller managed secret. Nothing is stored server side: a token is valid
//! as long as it was signed with the same secret for the same login and is younger
//! than the validity window.

use aws_lc_rs::hmac;
use axum_extra::extract::cookie::CookieJar;
use base64ct::{Base64UrlUnpadded, Encoding};
use headers::HeaderMapExt;
use http::{Method, request::Parts};
use time::{Duration, OffsetDateTime};
use tracing::debug;

use crate::{cookies::site_cookie, headers::XsrfToken};

pub const XSRF_COOKIE_NAME: &str = "XSRF-TOKEN";
/// Every token is scoped to the whole site.
pub const SCOPE: &str = "/";
pub const DEFAULT_VALIDITY: Duration = Duration::hours(24);
// Tolerance for tokens issued by a server whose clock is slightly ahead
const CLOCK_SKEW: Duration = Duration::minutes(1);

pub trait Clock: Send + Sync {
    fn now(&self) -> OffsetDateTime;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc()
    }
}

/// Keyed, time windowed token primitive.
pub trait TokenSigner: Send + Sync {
    fn generate(&self, secret: &str, subject: &str, scope: &str) -> String;

    /// Must not fail: any malformed, forged or expired token is simply not valid.
    fn validate(
        &self,
        token: &str,
        secret: &str,
        subject: &str,
        scope: &str,
        window: Duration,
    ) -> bool;
}

#[derive(Debug, Default, Clone)]
pub struct HmacSigner<C = SystemClock> {
    clock: C,
}

impl HmacSigner {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<C: Clock> HmacSigner<C> {
    pub fn with_clock(clock: C) -> Self {
        HmacSigner { clock }
    }

    fn sign(secret: &str, subject: &str, scope: &str, issued: i64) -> hmac::Tag {
        let key = hmac::Key::new(hmac::HMAC_SHA256, secret.as_bytes());
        hmac::sign(&key, message(subject, scope, issued).as_bytes())
    }
}

impl<C: Clock> TokenSigner for HmacSigner<C> {
    fn generate(&self, secret: &str, subject: &str, scope: &str) -> String {
        let issued = unix_millis(self.clock.now());
        let tag = Self::sign(secret, subject, scope, issued);
        format!("{}.{issued}", Base64UrlUnpadded::encode_string(tag.as_ref()))
    }

    fn validate(
        &self,
        token: &str,
        secret: &str,
        subject: &str,
        scope: &str,
        window: Duration,
    ) -> bool {
        let Some((signature, issued)) = token.rsplit_once('.') else {
            return false;
        };
        let Ok(issued) = issued.parse::<i64>() else {
            return false;
        };
        let Ok(issued_at) =
            OffsetDateTime::from_unix_timestamp_nanos(i128::from(issued) * 1_000_000)
        else {
            return false;
        };

        let now = self.clock.now();
        if now - issued_at >= window || issued_at > now + CLOCK_SKEW {
            return false;
        }

        let Ok(signature) = Base64UrlUnpadded::decode_vec(signature) else {
            return false;
        };
        let key = hmac::Key::new(hmac::HMAC_SHA256, secret.as_bytes());
        // Constant time comparison
        hmac::verify(&key, message(subject, scope, issued).as_bytes(), &signature).is_ok()
    }
}

// Escape the separator so that ("a:b", "c") and ("a", "b:c") sign different messages
fn clean(field: &str) -> String {
    field.replace(':', "_:")
}

fn message(subject: &str, scope: &str, issued: i64) -> String {
    format!("{}:{}:{issued}", clean(subject), clean(scope))
}

fn unix_millis(time: OffsetDateTime) -> i64 {
    (time.unix_timestamp_nanos() / 1_000_000) as i64
}

/// Methods exempted from the check by default, as they must not have side effects.
pub fn default_safe_methods() -> Vec<Method> {
    vec![Method::GET, Method::HEAD, Method::OPTIONS]
}

/// Issues and checks XSRF tokens bound to a user login.
#[derive(Debug, Clone)]
pub struct XsrfGuard<T = HmacSigner> {
    signer: T,
    window: Duration,
    safe_methods: Vec<Method>,
}

impl Default for XsrfGuard {
    fn default() -> Self {
        XsrfGuard::with_signer(HmacSigner::default())
    }
}

impl XsrfGuard {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<T: TokenSigner> XsrfGuard<T> {
    pub fn with_signer(signer: T) -> Self {
        XsrfGuard {
            signer,
            window: DEFAULT_VALIDITY,
            safe_methods: default_safe_methods(),
        }
    }

    pub fn with_window(mut self, window: Duration) -> Self {
        self.window = window;
        self
    }

    /// An empty set means that every request must carry a valid token.
    pub fn with_safe_methods(mut self, methods: impl IntoIterator<Item = Method>) -> Self {
        self.safe_methods = methods.into_iter().collect();
        self
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    pub fn safe_methods(&self) -> &[Method] {
        &self.safe_methods
    }

    pub fn is_safe(&self, method: &Method) -> bool {
        self.safe_methods.contains(method)
    }

    pub fn generate(&self, secret: &str, login: &str) -> String {
        self.signer.generate(secret, login, SCOPE)
    }

    pub fn validate(&self, token: &str, secret: &str, login: &str) -> bool {
        self.signer
            .validate(token, secret, login, SCOPE, self.window)
    }

    /// Safe methods always pass, others must carry a valid `X-XSRF-TOKEN` header.
    pub fn check_request(&self, parts: &Parts, secret: &str, login: &str) -> bool {
        if self.is_safe(&parts.method) {
            return true;
        }
        let Some(XsrfToken(token)) = parts.headers.typed_get::<XsrfToken>() else {
            debug!(method = %parts.method, uri = %parts.uri, "xsrf token not provided");
            return false;
        };
        let valid = self.validate(&token, secret, login);
        if !valid {
            debug!(method = %parts.method, uri = %parts.uri, login, "xsrf token rejected");
        }
        valid
    }

    /// Writes a fresh token in a cookie readable by the browser scripts.
    pub fn set_xsrf_cookie(
        &self,
        jar: CookieJar,
        parts: &Parts,
        secret: &str,
        login: &str,
    ) -> CookieJar {
        let token = self.generate(secret, login);
        jar.add(site_cookie(parts, XSRF_COOKIE_NAME, &token, false))
    }
}
