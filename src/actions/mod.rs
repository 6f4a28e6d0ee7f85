use thiserror::Error;

pub mod containers;
pub mod groups;
pub mod items;
pub mod items_upload;
pub mod users;
pub mod utils;

#[derive(Debug, Error)]
pub enum CliActionError {
    #[error("{0}")]
    JsonError(#[from] serde_json::Error),

    #[error("{0}")]
    ApiError(#[from] crate::nimbus_v1::ApiError),

    #[error("{0}")]
    CsvError(#[from] csv::Error),

    #[error("{0}")]
    UtfError(#[from] std::string::FromUtf8Error),

    #[error("{0}")]
    ConfigurationError(#[from] crate::configuration::ConfigurationError),

    #[error("ERROR: Unsupported output format: {0}")]
    UnsupportedOutputFormat(String),

    #[error("{0}")]
    FormattingError(#[from] crate::format::FormattingError),

    #[error("Missing required argument: {0}")]
    MissingRequiredArgument(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}
