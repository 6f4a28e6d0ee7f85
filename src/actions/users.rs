//! User action implementations.
//!
//! This module contains the logic for user-related commands: listing the
//! directory's users and fetching a single user by identifier.

use clap::ArgMatches;
use tracing::trace;

use crate::actions::utils::{output_format, print_formatted, query_options, report_recoverable};
use crate::actions::CliActionError;
use crate::commands::params::PARAMETER_USER_ID;
use crate::context::ExecutionContext;
use crate::model::UserList;

/// List users in the directory.
pub async fn list_users(matches: &ArgMatches) -> Result<(), CliActionError> {
    trace!("Executing \"user list\" command...");

    let format = output_format(matches)?;
    let options = query_options(matches);
    let ctx = ExecutionContext::initialize()?;

    match ctx.api().list_users(&options).await {
        Ok(users) => {
            if users.is_empty() {
                println!("No users found.");
                return Ok(());
            }
            print_formatted(&UserList { users }, &format)
        }
        Err(e) => report_recoverable(e),
    }
}

/// Get details for a specific user.
pub async fn get_user(matches: &ArgMatches) -> Result<(), CliActionError> {
    trace!("Executing \"user get\" command...");

    let user_id = matches
        .get_one::<String>(PARAMETER_USER_ID)
        .ok_or_else(|| CliActionError::MissingRequiredArgument("user id is required".to_string()))?;

    let format = output_format(matches)?;
    let options = query_options(matches);
    let ctx = ExecutionContext::initialize()?;

    match ctx.api().get_user(user_id, options.select).await {
        Ok(Some(user)) => print_formatted(&user, &format),
        Ok(None) => {
            println!("No user found with id '{}'.", user_id);
            Ok(())
        }
        Err(e) => report_recoverable(e),
    }
}
