use headers::{Header, HeaderName, HeaderValue};

/// Token sent back by the browser script on state changing requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XsrfToken(pub String);

pub static XSRF_TOKEN: HeaderName = HeaderName::from_static("x-xsrf-token");

impl Header for XsrfToken {
    fn name() -> &'static HeaderName {
        &XSRF_TOKEN
    }

    fn decode<'i, I>(values: &mut I) -> Result<Self, headers::Error>
    where
        I: Iterator<Item = &'i HeaderValue>,
    {
        let value = values.next().ok_or_else(headers::Error::invalid)?;
        let v = value.to_str().map_err(|_| headers::Error::invalid())?;

        Ok(XsrfToken(v.to_owned()))
    }

    fn encode<E>(&self, values: &mut E)
    where
        E: Extend<HeaderValue>,
    {
        if let Ok(v) = HeaderValue::from_str(&self.0) {
            values.extend(std::iter::once(v));
        }
    }
}
