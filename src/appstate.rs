use crate::{configuration::Config, xsrf::XsrfGuard};
use anyhow::Result;
use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;
use std::sync::Arc;

pub type Guard = Arc<XsrfGuard>;
pub type XsrfKey = Arc<String>;

#[derive(Clone)]
pub struct AppState {
    guard: Guard,
    xsrf_key: XsrfKey,
    cookie_key: Key,
}

impl AppState {
    pub fn new(guard: XsrfGuard, xsrf_key: String, cookie_key: Key) -> Self {
        AppState {
            guard: Arc::new(guard),
            xsrf_key: Arc::new(xsrf_key),
            cookie_key,
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(AppState::new(
            config.xsrf_guard()?,
            config.xsrf_key()?.to_owned(),
            config.cookie_key()?,
        ))
    }
}

impl FromRef<AppState> for Guard {
    fn from_ref(state: &AppState) -> Self {
        Arc::clone(&state.guard)
    }
}

impl FromRef<AppState> for XsrfKey {
    fn from_ref(state: &AppState) -> Self {
        Arc::clone(&state.xsrf_key)
    }
}

impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Self {
        state.cookie_key.clone()
    }
}
