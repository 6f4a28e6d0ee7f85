use thiserror::Error;

use crate::{actions::CliActionError, exit_codes::NbcliExitCode, nimbus_v1};

/// Error types that can occur during CLI command execution
#[derive(Debug, Error)]
pub enum CliError {
    /// Error when an unsupported or undefined subcommand is encountered
    #[error("Undefined or unsupported subcommand: {0}")]
    UnsupportedSubcommand(String),
    /// Error related to configuration loading or management
    #[error("Configuration error: {0}")]
    ConfigurationError(#[from] crate::configuration::ConfigurationError),
    /// Error related to data formatting
    #[error("Formatting error: {0}")]
    FormattingError(#[from] crate::format::FormattingError),
    /// Error related to JSON serialization/deserialization
    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("API error: {0}")]
    NimbusApiError(#[from] nimbus_v1::ApiError),

    #[error("{0}")]
    ActionError(#[from] CliActionError),
}

impl CliError {
    /// Get the appropriate exit code for this error
    pub fn exit_code(&self) -> NbcliExitCode {
        match self {
            CliError::UnsupportedSubcommand(_) => NbcliExitCode::UsageError,
            CliError::ConfigurationError(_) => NbcliExitCode::ConfigError,
            CliError::FormattingError(_) => NbcliExitCode::DataError,
            CliError::JsonError(_) => NbcliExitCode::DataError,
            CliError::NimbusApiError(e) => api_exit_code(e),
            CliError::ActionError(e) => match e {
                CliActionError::ApiError(e) => api_exit_code(e),
                CliActionError::ConfigurationError(_) => NbcliExitCode::ConfigError,
                CliActionError::MissingRequiredArgument(_) => NbcliExitCode::UsageError,
                CliActionError::UnsupportedOutputFormat(_) => NbcliExitCode::UsageError,
                CliActionError::IoError(_) => NbcliExitCode::DataError,
                _ => NbcliExitCode::SoftwareError,
            },
        }
    }
}

fn api_exit_code(error: &nimbus_v1::ApiError) -> NbcliExitCode {
    match error {
        nimbus_v1::ApiError::HttpError(_) => NbcliExitCode::NetworkError,
        nimbus_v1::ApiError::Transport { .. } => NbcliExitCode::ApiError,
        nimbus_v1::ApiError::NotFound(_) | nimbus_v1::ApiError::ContainerNotFound(_) => {
            NbcliExitCode::NotFound
        }
        nimbus_v1::ApiError::Forbidden(_) => NbcliExitCode::AuthError,
        nimbus_v1::ApiError::ConfigurationError(_) => NbcliExitCode::ConfigError,
        nimbus_v1::ApiError::InvalidReference(_)
        | nimbus_v1::ApiError::InvalidDestination(_)
        | nimbus_v1::ApiError::UnsupportedQuery(_)
        | nimbus_v1::ApiError::MissingCapability(_) => NbcliExitCode::UsageError,
        _ => NbcliExitCode::SoftwareError,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_code_mapping() {
        let usage = CliError::UnsupportedSubcommand("bogus".to_string());
        assert_eq!(usage.exit_code(), NbcliExitCode::UsageError);

        let transport = CliError::NimbusApiError(nimbus_v1::ApiError::Transport {
            status: 500,
            detail: "boom".to_string(),
        });
        assert_eq!(transport.exit_code(), NbcliExitCode::ApiError);
    }
}
