use axum::{Json, extract::State};
use axum_extra::extract::{PrivateCookieJar, cookie::CookieJar};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    appstate::{Guard, XsrfKey},
    cookies::{delete_cookie, get_cookie, set_cookie},
    errors::ErrResponse,
    extractors::RequestHead,
    origin::RequestOrigin,
    utils::string_trim,
    xsrf::XSRF_COOKIE_NAME,
};

/// Encrypted with the cookie key, so that a client cannot pick its own login.
pub static LOGIN_COOKIE_NAME: &str = "HTTPUTIL_LOGIN";

#[derive(Deserialize, Serialize)]
pub struct LoginPayload {
    #[serde(deserialize_with = "string_trim")]
    pub login: String,
}

#[derive(Deserialize, Serialize)]
pub struct LoginResponse {
    pub login: String,
    pub xsrf_token: String,
}

#[derive(Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct WhoAmI {
    pub scheme: String,
    pub host: String,
    pub url: String,
    pub login: String,
}

pub async fn login(
    State(guard): State<Guard>,
    State(key): State<XsrfKey>,
    RequestHead(parts): RequestHead,
    private_jar: PrivateCookieJar,
    jar: CookieJar,
    Json(payload): Json<LoginPayload>,
) -> Result<(PrivateCookieJar, CookieJar, Json<LoginResponse>), ErrResponse> {
    if payload.login.is_empty() {
        return Err(ErrResponse::S400("login is required"));
    }

    let private_jar = set_cookie(private_jar, &parts, LOGIN_COOKIE_NAME, &payload.login);
    let jar = guard.set_xsrf_cookie(jar, &parts, &key, &payload.login);
    let xsrf_token = get_cookie(&jar, XSRF_COOKIE_NAME);

    info!(
        "LOGIN of {} from {}",
        payload.login,
        RequestOrigin::from_parts(&parts)
    );

    Ok((
        private_jar,
        jar,
        Json(LoginResponse {
            login: payload.login,
            xsrf_token,
        }),
    ))
}

pub async fn logout(
    RequestHead(parts): RequestHead,
    private_jar: PrivateCookieJar,
    jar: CookieJar,
) -> CookieJar {
    let login = get_cookie(&private_jar, LOGIN_COOKIE_NAME);
    if !login.is_empty() {
        info!("LOGOUT of {login}");
    }
    let jar = delete_cookie(jar, &parts, LOGIN_COOKIE_NAME);
    delete_cookie(jar, &parts, XSRF_COOKIE_NAME)
}

pub async fn whoami(origin: RequestOrigin, jar: PrivateCookieJar) -> Json<WhoAmI> {
    Json(WhoAmI {
        url: origin.url(),
        scheme: origin.scheme.to_owned(),
        host: origin.host,
        login: get_cookie(&jar, LOGIN_COOKIE_NAME),
    })
}
