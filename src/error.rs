use thiserror::Error;

pub type AppResult<T> = std::result::Result<T, AppError>;

/// Errors that stop the process: startup failures and lost broker channels.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum AppError {
    #[error("failed to read config file")]
    ReadConfig { source: std::io::Error },
    #[error("failed to parse config file")]
    ParseConfig {
        #[from]
        source: toml::de::Error,
    },
    #[error("invalid number of listeners: {0}")]
    InvalidWorkerCount(usize),
    #[error("broker error")]
    Broker {
        #[from]
        source: lapin::Error,
    },
    #[error("database error")]
    Database {
        #[from]
        source: sqlx::Error,
    },
    #[error("channel of listener {listener} was closed")]
    ChannelClosed { listener: usize },
}

/// Errors scoped to a single message. These are logged and the message is
/// dropped; the listener keeps consuming.
#[derive(Error, Debug)]
pub enum MessageError {
    #[error("error decoding JSON")]
    Decode {
        #[from]
        source: serde_json::Error,
    },
    #[error("missing required field '{0}'")]
    MissingField(&'static str),
    #[error("error parsing expiration date")]
    Expiration {
        #[from]
        source: chrono::ParseError,
    },
    #[error("error inserting paste into db")]
    Insert { source: AppError },
}

impl From<std::io::Error> for AppError {
    fn from(source: std::io::Error) -> Self {
        AppError::ReadConfig { source }
    }
}
