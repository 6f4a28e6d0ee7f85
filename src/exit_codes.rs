//! Custom exit codes for the NBCLI application
//!
//! This module defines specific exit codes for different error conditions
//! to make scripting and automation easier.

/// Custom exit codes for NBCLI
///
/// These codes follow the BSD sysexits.h conventions where possible:
/// - 0: Success
/// - 64-78: Standard exit codes from sysexits.h
/// - 100+: Custom application-specific codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NbcliExitCode {
    /// Success (0) - Command completed successfully
    Success = 0,

    /// Command line usage error (64) - User input error
    UsageError = 64,

    /// Data format error (65) - Input data was incorrect
    DataError = 65,

    /// Addressee unknown (67) - User or resource not found
    NotFound = 67,

    /// Internal software error (70) - Unexpected application error
    SoftwareError = 70,

    /// Configuration error (78) - Application configuration issue
    ConfigError = 78,

    /// Authentication error (100) - Login or token issues
    AuthError = 100,

    /// Network error (101) - Connection or communication issues
    NetworkError = 101,

    /// API error (102) - Remote API returned an error
    ApiError = 102,
}

impl NbcliExitCode {
    /// Convert to numeric exit code
    pub fn code(&self) -> i32 {
        *self as i32
    }

    /// Get descriptive message for the exit code
    pub fn message(&self) -> &'static str {
        match self {
            NbcliExitCode::Success => "Success",
            NbcliExitCode::UsageError => "Command line usage error",
            NbcliExitCode::DataError => "Data format error",
            NbcliExitCode::NotFound => "Resource not found",
            NbcliExitCode::SoftwareError => "Internal software error",
            NbcliExitCode::ConfigError => "Configuration error",
            NbcliExitCode::AuthError => "Authentication error",
            NbcliExitCode::NetworkError => "Network communication error",
            NbcliExitCode::ApiError => "Remote API error",
        }
    }
}

impl From<NbcliExitCode> for i32 {
    fn from(code: NbcliExitCode) -> Self {
        code.code()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_code_values() {
        assert_eq!(NbcliExitCode::Success.code(), 0);
        assert_eq!(NbcliExitCode::UsageError.code(), 64);
        assert_eq!(NbcliExitCode::ConfigError.code(), 78);
        assert_eq!(NbcliExitCode::ApiError.code(), 102);
    }
}
