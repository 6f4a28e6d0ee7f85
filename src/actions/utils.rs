//! Shared helpers for the action layer.

use clap::ArgMatches;
use tracing::warn;

use crate::actions::CliActionError;
use crate::commands::params::{
    PARAMETER_FORMAT, PARAMETER_HEADERS, PARAMETER_INCLUDE, PARAMETER_PRETTY, PARAMETER_SELECT,
};
use crate::format::{Formattable, OutputFormat, OutputFormatOptions};
use crate::nimbus_v1::ApiError;
use crate::query::QueryOptions;

/// Build the output format from the common format parameters.
pub fn output_format(matches: &ArgMatches) -> Result<OutputFormat, CliActionError> {
    let format_str = matches
        .get_one::<String>(PARAMETER_FORMAT)
        .map(|s| s.as_str())
        .unwrap_or(crate::format::JSON);

    let options = OutputFormatOptions {
        with_headers: matches.get_flag(PARAMETER_HEADERS),
        pretty: matches.get_flag(PARAMETER_PRETTY),
    };

    OutputFormat::from_string_with_options(format_str, options)
        .map_err(|_| CliActionError::UnsupportedOutputFormat(format_str.to_string()))
}

/// Build query options from the common selection and include parameters.
/// Not every command defines both, so the lookups are tolerant.
pub fn query_options(matches: &ArgMatches) -> QueryOptions {
    let select = matches
        .try_get_many::<String>(PARAMETER_SELECT)
        .ok()
        .flatten()
        .map(|values| values.cloned().collect::<Vec<_>>());
    let include = matches
        .try_get_one::<String>(PARAMETER_INCLUDE)
        .ok()
        .flatten()
        .cloned();

    QueryOptions::default()
        .with_select(select)
        .with_include(include)
}

/// Format and print a result to standard output.
pub fn print_formatted<T: Formattable>(
    result: &T,
    format: &OutputFormat,
) -> Result<(), CliActionError> {
    println!("{}", result.format(format)?);
    Ok(())
}

/// Report a recoverable API condition as a warning and continue, so chained
/// invocations over empty results do not cascade into failures. Fatal
/// errors propagate unchanged.
pub fn report_recoverable(error: ApiError) -> Result<(), CliActionError> {
    if error.is_recoverable() {
        warn!("{}", error);
        eprintln!("WARNING: {}", error);
        Ok(())
    } else {
        Err(error.into())
    }
}
