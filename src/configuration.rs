use crate::{
    utils::{is_default, option_string_trim, random_string, vec_trim_remove_empties},
    xsrf::XsrfGuard,
};
use anyhow::{Context, Result, anyhow, ensure};
use axum_extra::extract::cookie::Key;
use http::Method;
use serde::{Deserialize, Serialize};
use std::path::Path;
use time::Duration;

pub const PORT_ENV_VAR: &str = "HTTPUTIL_PORT";

fn http_port() -> u16 {
    8080
}

fn xsrf_validity_hours() -> i64 {
    24
}

fn safe_methods() -> Vec<String> {
    vec!["GET".to_owned(), "HEAD".to_owned(), "OPTIONS".to_owned()]
}

#[derive(Deserialize, Serialize, Debug, PartialEq, Clone)]
pub struct Config {
    #[serde(default = "http_port")]
    pub http_port: u16,
    #[serde(default, skip_serializing_if = "is_default")]
    pub debug_mode: bool,
    #[serde(default, skip_serializing_if = "is_default")]
    pub log_to_file: bool,
    #[serde(
        default,
        skip_serializing_if = "is_default",
        deserialize_with = "option_string_trim"
    )]
    pub xsrf_key: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "is_default",
        deserialize_with = "option_string_trim"
    )]
    pub cookie_key: Option<String>,
    #[serde(default = "xsrf_validity_hours")]
    pub xsrf_validity_hours: i64,
    #[serde(default = "safe_methods", deserialize_with = "vec_trim_remove_empties")]
    pub safe_methods: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            http_port: http_port(),
            debug_mode: false,
            log_to_file: false,
            xsrf_key: None,
            cookie_key: None,
            xsrf_validity_hours: xsrf_validity_hours(),
            safe_methods: safe_methods(),
        }
    }
}

impl Config {
    pub async fn from_file(filepath: &str) -> Result<Self> {
        let data = tokio::fs::read_to_string(filepath).await?;
        let config = serde_yaml_ng::from_str::<Config>(&data)?;
        Ok(config)
    }

    pub async fn to_file(&self, filepath: &str) -> Result<()> {
        let contents = serde_yaml_ng::to_string::<Config>(self)?;
        tokio::fs::write(filepath, contents).await?;
        Ok(())
    }

    pub fn xsrf_key(&self) -> Result<&str> {
        self.xsrf_key
            .as_deref()
            .context("the xsrf key is not configured")
    }

    /// Key encrypting the login cookie, it must be at least 64 bytes long.
    pub fn cookie_key(&self) -> Result<Key> {
        let key = self
            .cookie_key
            .as_deref()
            .context("the cookie key is not configured")?;
        Key::try_from(key.as_bytes())
            .map_err(|e| anyhow!("the cookie key is not usable: {e}"))
    }

    pub fn xsrf_guard(&self) -> Result<XsrfGuard> {
        ensure!(
            self.xsrf_validity_hours > 0,
            "xsrf_validity_hours must be positive, got {}",
            self.xsrf_validity_hours
        );
        let window = self
            .xsrf_validity_hours
            .checked_mul(3600)
            .map(Duration::seconds)
            .with_context(|| {
                format!(
                    "xsrf_validity_hours is too large, got {}",
                    self.xsrf_validity_hours
                )
            })?;
        let methods = self
            .safe_methods
            .iter()
            .map(|m| {
                Method::from_bytes(m.to_uppercase().as_bytes())
                    .with_context(|| format!("invalid safe method: {m}"))
            })
            .collect::<Result<Vec<Method>>>()?;
        Ok(XsrfGuard::new()
            .with_window(window)
            .with_safe_methods(methods))
    }
}

/// Reads the configuration, creating the file with defaults if it does not exist.
pub async fn load_config(config_file: &str) -> Result<Config> {
    let mut config = if Path::new(config_file).exists() {
        Config::from_file(config_file)
            .await
            .with_context(|| format!("could not read configuration from {config_file}"))?
    } else {
        Config::default()
    };
    // if the keys are not present, generate them and store them
    let mut generated = false;
    if config.xsrf_key.is_none() {
        config.xsrf_key = Some(random_string(64));
        generated = true;
    }
    if config.cookie_key.is_none() {
        config.cookie_key = Some(random_string(64));
        generated = true;
    }
    if generated {
        config.to_file(config_file).await?;
    }
    // Allow overriding the port with env variable
    if let Some(port) = std::env::var(PORT_ENV_VAR).ok() {
        config.http_port = port
            .parse()
            .with_context(|| format!("{PORT_ENV_VAR} is not a valid port"))?;
    }
    // Fail early on unusable keys or xsrf configuration
    config.cookie_key()?;
    config.xsrf_guard()?;
    Ok(config)
}
