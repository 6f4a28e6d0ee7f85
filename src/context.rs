//! Execution context for CLI commands.
//!
//! Most commands need the same things: the loaded configuration and a ready
//! API client. The context is built once per top-level invocation and
//! carries every default explicitly — there is no ambient mutable state
//! shared between operations.

use clap::ArgMatches;

use crate::actions::CliActionError;
use crate::commands::params::PARAMETER_CONTAINER;
use crate::configuration::Configuration;
use crate::nimbus_v1::NimbusApiClient;
use crate::resolve::ContainerRef;

pub struct ExecutionContext {
    pub configuration: Configuration,
    pub api: NimbusApiClient,
}

impl ExecutionContext {
    /// Load the configuration and build the API client from it.
    pub fn initialize() -> Result<Self, CliActionError> {
        let configuration = Configuration::load_or_create_default()?;
        let api = NimbusApiClient::from_configuration(&configuration)?;

        Ok(ExecutionContext { configuration, api })
    }

    /// The container addressed by this invocation: the `--container`
    /// argument when given, else the configured default container, else the
    /// caller's own container.
    pub fn container_ref(&self, matches: &ArgMatches) -> ContainerRef {
        ContainerRef::from_parameter(
            matches.get_one::<String>(PARAMETER_CONTAINER),
            self.configuration.default_container_id(),
        )
    }

    pub fn api(&self) -> &NimbusApiClient {
        &self.api
    }

    pub fn configuration(&self) -> &Configuration {
        &self.configuration
    }
}
