use std::num::NonZeroUsize;
use std::path::Path;

use serde::Deserialize;
use sqlx::postgres::{PgConnectOptions, PgSslMode};
use urlencoding::encode;

use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub listeners: Listeners,
    pub rabbitmq: RabbitMq,
    #[serde(rename = "postgreSQL")]
    pub postgresql: PostgreSql,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Listeners {
    pub number: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RabbitMq {
    pub queue: String,
    pub username: String,
    pub password: String,
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PostgreSql {
    pub db: String,
    pub username: String,
    pub password: String,
    pub host: String,
    pub port: u16,
}

impl Config {
    /// Read and parse a TOML config file.
    pub fn load(path: impl AsRef<Path>) -> AppResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> AppResult<Self> {
        Ok(toml::from_str(contents)?)
    }
}

impl Listeners {
    /// Number of listeners to launch; must be at least one.
    pub fn worker_count(&self) -> AppResult<NonZeroUsize> {
        NonZeroUsize::new(self.number).ok_or(AppError::InvalidWorkerCount(self.number))
    }
}

impl RabbitMq {
    /// AMQP URI for the default vhost.
    pub fn uri(&self) -> String {
        format!(
            "amqp://{username}:{password}@{host}:{port}/",
            username = encode(&self.username),
            password = encode(&self.password),
            host = self.host,
            port = self.port,
        )
    }
}

impl PostgreSql {
    pub fn connect_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.username)
            .password(&self.password)
            .database(&self.db)
            .ssl_mode(PgSslMode::Disable)
    }
}
