use crate::error::AppError;
use config::{Config as Cfg, File};
use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_port() -> u16 {
    3000
}

impl Config {
    /// Load `.env`, an optional `configuration` file and `APP__*` overrides.
    ///
    /// A plain `PORT` variable wins over everything else so the service runs
    /// unchanged on hosts that only hand out `PORT`.
    pub fn load() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let port = match env::var("PORT") {
            Ok(raw) => Some(raw.trim().parse::<u16>().map_err(|e| {
                AppError::ConfigError(anyhow::anyhow!("PORT is not a valid port: {}", e))
            })?),
            Err(_) => None,
        };

        let config = Cfg::builder()
            .add_source(File::with_name("configuration").required(false))
            .add_source(config::Environment::with_prefix("APP").separator("__"))
            .set_override_option("port", port.map(i64::from))?
            .build()?;

        Ok(config.try_deserialize()?)
    }
}
