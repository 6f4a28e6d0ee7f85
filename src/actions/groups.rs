//! Group action implementations.
//!
//! Group operations require a managed organizational account; the API
//! client checks that capability before composing any request.

use clap::ArgMatches;
use tracing::trace;

use crate::actions::utils::{output_format, print_formatted, query_options, report_recoverable};
use crate::actions::CliActionError;
use crate::commands::params::PARAMETER_GROUP_ID;
use crate::context::ExecutionContext;
use crate::model::{GroupList, UserList};

fn group_id(matches: &ArgMatches) -> Result<&String, CliActionError> {
    matches
        .get_one::<String>(PARAMETER_GROUP_ID)
        .ok_or_else(|| CliActionError::MissingRequiredArgument("group id is required".to_string()))
}

/// List groups in the directory.
pub async fn list_groups(matches: &ArgMatches) -> Result<(), CliActionError> {
    trace!("Executing \"group list\" command...");

    let format = output_format(matches)?;
    let options = query_options(matches);
    let ctx = ExecutionContext::initialize()?;

    match ctx.api().list_groups(&options).await {
        Ok(groups) => {
            if groups.is_empty() {
                println!("No groups found.");
                return Ok(());
            }
            print_formatted(&GroupList { groups }, &format)
        }
        Err(e) => report_recoverable(e),
    }
}

/// Get details for a specific group.
pub async fn get_group(matches: &ArgMatches) -> Result<(), CliActionError> {
    trace!("Executing \"group get\" command...");

    let group_id = group_id(matches)?;
    let format = output_format(matches)?;
    let ctx = ExecutionContext::initialize()?;

    match ctx.api().get_group(group_id).await {
        Ok(Some(group)) => print_formatted(&group, &format),
        Ok(None) => {
            println!("No group found with id '{}'.", group_id);
            Ok(())
        }
        Err(e) => report_recoverable(e),
    }
}

/// List the members of a group.
pub async fn list_group_members(matches: &ArgMatches) -> Result<(), CliActionError> {
    trace!("Executing \"group members\" command...");

    let group_id = group_id(matches)?;
    let format = output_format(matches)?;
    let ctx = ExecutionContext::initialize()?;

    match ctx.api().list_group_members(group_id).await {
        Ok(members) => {
            if members.is_empty() {
                println!("Group '{}' has no members.", group_id);
                return Ok(());
            }
            print_formatted(&UserList { users: members }, &format)
        }
        Err(e) => report_recoverable(e),
    }
}
