use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::PrivateCookieJar;

use crate::{
    appstate::{Guard, XsrfKey},
    cookies::get_cookie,
    errors::ErrResponse,
    users::LOGIN_COOKIE_NAME,
};

/// Rejects state changing requests whose `X-XSRF-TOKEN` header was not issued
/// for the logged in user.
pub async fn xsrf_middleware(
    State(guard): State<Guard>,
    State(key): State<XsrfKey>,
    jar: PrivateCookieJar,
    req: Request,
    next: Next,
) -> Result<Response, ErrResponse> {
    let login = get_cookie(&jar, LOGIN_COOKIE_NAME);
    let (parts, body) = req.into_parts();
    if !guard.is_safe(&parts.method) {
        if login.is_empty() {
            return Err(ErrResponse::S401("no user found"));
        }
        if !guard.check_request(&parts, &key, &login) {
            return Err(ErrResponse::S403("xsrf token doesn't match"));
        }
    }
    Ok(next.run(Request::from_parts(parts, body)).await)
}
