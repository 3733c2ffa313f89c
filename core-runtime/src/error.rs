use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Missing setting: {setting} - {message}")]
    MissingSetting { setting: String, message: String },
}

pub type Result<T> = std::result::Result<T, Error>;
