use std::{
    error::Error,
    fmt::{self, Display, Formatter},
};

use axum::response::{IntoResponse, Response};
use http::StatusCode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrResponse {
    S400(&'static str),
    S401(&'static str),
    S403(&'static str),
}

impl From<ErrResponse> for (StatusCode, &'static str) {
    fn from(err: ErrResponse) -> Self {
        match err {
            ErrResponse::S400(message) => (StatusCode::BAD_REQUEST, message),
            ErrResponse::S401(message) => (StatusCode::UNAUTHORIZED, message),
            ErrResponse::S403(message) => (StatusCode::FORBIDDEN, message),
        }
    }
}

impl IntoResponse for ErrResponse {
    fn into_response(self) -> Response {
        Into::<(StatusCode, &'static str)>::into(self).into_response()
    }
}

impl Display for ErrResponse {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl Error for ErrResponse {}
