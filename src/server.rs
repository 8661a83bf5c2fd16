use anyhow::Result;
use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::{
    appstate::AppState,
    configuration::{Config, load_config},
    logger::log_request,
    middlewares::xsrf_middleware,
    users::{login, logout, whoami},
};

pub struct Server {
    pub router: Router,
    pub port: u16,
}

impl Server {
    pub async fn build(config_file: &str) -> Result<Self> {
        let config = load_config(config_file).await?;
        Server::from_config(&config)
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let state = AppState::from_config(config)?;
        tracing::info!(
            "XSRF tokens valid for {} hours, safe methods: {:?}",
            config.xsrf_validity_hours,
            config.safe_methods
        );

        let api_router = Router::new()
            .route("/whoami", get(whoami))
            .route("/echo", post(|body: String| async move { body }))
            .layer(middleware::from_fn_with_state(
                state.clone(),
                xsrf_middleware,
            ));

        let router = Router::new()
            .route("/auth/login", post(login))
            .route("/auth/logout", get(logout))
            .nest("/api", api_router)
            .layer(middleware::from_fn(log_request))
            .with_state(state);

        Ok(Server {
            router,
            port: config.http_port,
        })
    }
}
