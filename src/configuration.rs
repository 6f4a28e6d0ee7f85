use dirs::config_dir;
use serde::{Deserialize, Serialize};
use std::{
    fs::{self, File},
    io::Write,
    path::PathBuf,
};
use strum::{Display, EnumString};
use tracing::debug;
use url::Url;

pub const DEFAULT_APPLICATION_ID: &str = "nbcli";
pub const DEFAULT_CONFIGURATION_FILE_NAME: &str = "config.yml";
pub const DEFAULT_API_BASE_URL: &str = "https://api.nimbusworkspace.com/v1";

/// Environment variable overriding the configuration directory.
pub const CONFIG_DIR_ENV_VAR: &str = "NBCLI_CONFIG_DIR";
/// Environment variable carrying the bearer token for the Nimbus API.
/// Token acquisition itself is handled outside of this tool.
pub const TOKEN_ENV_VAR: &str = "NBCLI_TOKEN";

#[derive(Debug, thiserror::Error)]
pub enum ConfigurationError {
    #[error("failed to resolve the configuration directory")]
    FailedToFindConfigurationDirectory,
    #[error("failed to load configuration data, because of: {cause:?}")]
    FailedToLoadData { cause: Box<dyn std::error::Error> },
    #[error("failed to write configuration data to file, because of: {cause:?}")]
    FailedToWriteData { cause: Box<dyn std::error::Error> },
}

/// The kind of account the configured credentials belong to.
///
/// Some directory operations (groups, shared-with-me) are only available to
/// managed organizational accounts.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, Default,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum AccountType {
    #[default]
    Organizational,
    Personal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Configuration {
    #[serde(default = "Configuration::default_base_url")]
    base_url: Url,
    #[serde(default)]
    account_type: AccountType,
    /// Container addressed when a command does not name one explicitly.
    /// When absent, the caller's own default container route is used.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    default_container_id: Option<String>,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            base_url: Self::default_base_url(),
            account_type: AccountType::default(),
            default_container_id: None,
        }
    }
}

impl Configuration {
    fn default_base_url() -> Url {
        Url::parse(DEFAULT_API_BASE_URL).unwrap()
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn account_type(&self) -> AccountType {
        self.account_type
    }

    pub fn default_container_id(&self) -> Option<&String> {
        self.default_container_id.as_ref()
    }

    pub fn set_default_container_id(&mut self, container_id: Option<String>) {
        self.default_container_id = container_id;
    }

    /// Read the bearer token from the environment.
    pub fn access_token() -> Option<String> {
        std::env::var(TOKEN_ENV_VAR).ok().filter(|t| !t.is_empty())
    }

    pub fn get_default_configuration_file_path() -> Result<PathBuf, ConfigurationError> {
        // Check for NBCLI_CONFIG_DIR environment variable first
        if let Ok(config_dir_str) = std::env::var(CONFIG_DIR_ENV_VAR) {
            let mut config_path = PathBuf::from(config_dir_str);
            config_path.push(DEFAULT_CONFIGURATION_FILE_NAME);
            return Ok(config_path);
        }

        match config_dir() {
            Some(configuration_directory) => {
                let mut default_config_file_path = configuration_directory;
                default_config_file_path.push(DEFAULT_APPLICATION_ID);
                default_config_file_path.push(DEFAULT_CONFIGURATION_FILE_NAME);

                Ok(default_config_file_path)
            }
            None => Err(ConfigurationError::FailedToFindConfigurationDirectory),
        }
    }

    pub fn load_default() -> Result<Configuration, ConfigurationError> {
        let default_file_path = Configuration::get_default_configuration_file_path()?;
        debug!("Loading configuration from {:?}...", default_file_path);
        Configuration::load_from_file(default_file_path)
    }

    /// Load default configuration, creating a default one if none exists.
    /// This is more user-friendly for first-time users.
    pub fn load_or_create_default() -> Result<Configuration, ConfigurationError> {
        let default_file_path = Configuration::get_default_configuration_file_path()?;

        match Configuration::load_from_file(default_file_path.clone()) {
            Ok(config) => Ok(config),
            Err(ConfigurationError::FailedToLoadData { cause }) => {
                let not_found = cause
                    .downcast_ref::<std::io::Error>()
                    .map(|io_err| io_err.kind() == std::io::ErrorKind::NotFound)
                    .unwrap_or(false);

                if not_found {
                    debug!("Configuration file not found, creating default configuration");
                    let default_config = Configuration::default();
                    default_config.save(&default_file_path)?;
                    Ok(default_config)
                } else {
                    Err(ConfigurationError::FailedToLoadData { cause })
                }
            }
            Err(e) => Err(e),
        }
    }

    pub fn load_from_file(path: PathBuf) -> Result<Configuration, ConfigurationError> {
        let contents = fs::read_to_string(path)
            .map_err(|e| ConfigurationError::FailedToLoadData { cause: Box::new(e) })?;
        let configuration: Configuration = serde_yaml::from_str(&contents)
            .map_err(|e| ConfigurationError::FailedToLoadData { cause: Box::new(e) })?;

        Ok(configuration)
    }

    pub fn save(&self, path: &PathBuf) -> Result<(), ConfigurationError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| ConfigurationError::FailedToWriteData { cause: Box::new(e) })?;
        }

        let contents = serde_yaml::to_string(self)
            .map_err(|e| ConfigurationError::FailedToWriteData { cause: Box::new(e) })?;
        let mut file = File::create(path)
            .map_err(|e| ConfigurationError::FailedToWriteData { cause: Box::new(e) })?;
        file.write_all(contents.as_bytes())
            .map_err(|e| ConfigurationError::FailedToWriteData { cause: Box::new(e) })?;

        Ok(())
    }

    pub fn save_to_default(&self) -> Result<(), ConfigurationError> {
        let path = Configuration::get_default_configuration_file_path()?;
        self.save(&path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_configuration() {
        let configuration = Configuration::default();
        assert_eq!(configuration.base_url().as_str(), DEFAULT_API_BASE_URL);
        assert_eq!(configuration.account_type(), AccountType::Organizational);
        assert!(configuration.default_container_id().is_none());
    }

    #[test]
    fn test_account_type_parsing() {
        use std::str::FromStr;

        assert_eq!(
            AccountType::from_str("personal").unwrap(),
            AccountType::Personal
        );
        assert_eq!(
            AccountType::from_str("Organizational").unwrap(),
            AccountType::Organizational
        );
        assert!(AccountType::from_str("guest").is_err());
    }

    #[test]
    fn test_configuration_yaml_round_trip() {
        let mut configuration = Configuration::default();
        configuration.set_default_container_id(Some("b!mF9vQ2".to_string()));

        let yaml = serde_yaml::to_string(&configuration).unwrap();
        let parsed: Configuration = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed, configuration);
    }

    #[test]
    fn test_save_and_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_CONFIGURATION_FILE_NAME);

        let configuration = Configuration::default();
        configuration.save(&path).unwrap();

        let loaded = Configuration::load_from_file(path).unwrap();
        assert_eq!(loaded, configuration);
    }
}
