//! Container action implementations.

use clap::ArgMatches;
use tracing::trace;

use crate::actions::utils::{output_format, print_formatted, report_recoverable};
use crate::actions::CliActionError;
use crate::commands::params::PARAMETER_REFERENCE;
use crate::context::ExecutionContext;
use crate::model::ContainerList;
use crate::resolve::ContainerRef;

/// List the containers available to the caller.
pub async fn list_containers(matches: &ArgMatches) -> Result<(), CliActionError> {
    trace!("Executing \"container list\" command...");

    let format = output_format(matches)?;
    let ctx = ExecutionContext::initialize()?;

    match ctx.api().list_containers().await {
        Ok(containers) => {
            if containers.is_empty() {
                println!("No containers found.");
                return Ok(());
            }
            print_formatted(&ContainerList { containers }, &format)
        }
        Err(e) => report_recoverable(e),
    }
}

/// Get a single container by reference, defaulting to the caller's own.
pub async fn get_container(matches: &ArgMatches) -> Result<(), CliActionError> {
    trace!("Executing \"container get\" command...");

    let format = output_format(matches)?;
    let ctx = ExecutionContext::initialize()?;

    let reference = ContainerRef::from_parameter(
        matches.get_one::<String>(PARAMETER_REFERENCE),
        ctx.configuration().default_container_id(),
    );

    match ctx.api().get_container(&reference).await {
        Ok(container) => print_formatted(&container, &format),
        Err(e) => report_recoverable(e),
    }
}
