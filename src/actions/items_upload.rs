//! Upload a local file into a container.
//!
//! The heavy lifting — destination resolution, the single-shot versus
//! session decision, chunking — happens in the upload policy behind the API
//! client; this action only shapes the arguments and reports the outcome.

use clap::ArgMatches;
use std::path::PathBuf;
use tracing::trace;

use crate::actions::utils::{output_format, print_formatted, report_recoverable};
use crate::actions::CliActionError;
use crate::commands::params::{PARAMETER_CONFLICT, PARAMETER_DESTINATION, PARAMETER_LOCAL_PATH};
use crate::context::ExecutionContext;
use crate::resolve::ItemRef;
use crate::upload::ConflictBehavior;

/// Upload one local file to a destination path in a container.
pub async fn upload_item(matches: &ArgMatches) -> Result<(), CliActionError> {
    trace!("Executing \"item upload\" command...");

    let local_path = matches
        .get_one::<PathBuf>(PARAMETER_LOCAL_PATH)
        .ok_or_else(|| {
            CliActionError::MissingRequiredArgument("local file path is required".to_string())
        })?;

    if !local_path.is_file() {
        return Err(CliActionError::IoError(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("local path is not a file: {:?}", local_path),
        )));
    }

    let conflict = ConflictBehavior::from_parameter(matches.get_one::<String>(PARAMETER_CONFLICT))
        .map_err(CliActionError::ApiError)?;

    let destination = ItemRef::from_parameter(matches.get_one::<String>(PARAMETER_DESTINATION));
    let format = output_format(matches)?;
    let ctx = ExecutionContext::initialize()?;
    let container = ctx.container_ref(matches);

    match ctx
        .api()
        .upload_file(&container, &destination, local_path, conflict)
        .await
    {
        Ok(item) => print_formatted(&item, &format),
        Err(e) => report_recoverable(e),
    }
}
