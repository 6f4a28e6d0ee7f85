//! Command-line parameter names and shared argument builders.

use clap::{Arg, ArgAction};
use std::path::PathBuf;

use crate::format::OutputFormat;
use crate::resolve::SpecialFolder;
use crate::upload::ConflictBehavior;
use strum::IntoEnumIterator;

pub const PARAMETER_FORMAT: &str = "format";
pub const PARAMETER_HEADERS: &str = "headers";
pub const PARAMETER_PRETTY: &str = "pretty";
pub const PARAMETER_SELECT: &str = "select";
pub const PARAMETER_INCLUDE: &str = "include";
pub const PARAMETER_CONTAINER: &str = "container";
pub const PARAMETER_USER_ID: &str = "user-id";
pub const PARAMETER_GROUP_ID: &str = "group-id";
pub const PARAMETER_REFERENCE: &str = "reference";
pub const PARAMETER_PATH: &str = "path";
pub const PARAMETER_SPECIAL: &str = "special";
pub const PARAMETER_FOLDERS_ONLY: &str = "folders-only";
pub const PARAMETER_FILES_ONLY: &str = "files-only";
pub const PARAMETER_SEARCH_TERM: &str = "term";
pub const PARAMETER_NEW_NAME: &str = "new-name";
pub const PARAMETER_LOCAL_PATH: &str = "local-path";
pub const PARAMETER_DESTINATION: &str = "destination";
pub const PARAMETER_CONFLICT: &str = "conflict";
pub const PARAMETER_CONTAINER_ID: &str = "container-id";

pub fn format_parameter() -> Arg {
    Arg::new(PARAMETER_FORMAT)
        .short('f')
        .long(PARAMETER_FORMAT)
        .num_args(1)
        .required(false)
        .default_value("json")
        .help("Output data format")
        .value_parser(OutputFormat::names())
}

pub fn headers_flag() -> Arg {
    Arg::new(PARAMETER_HEADERS)
        .long(PARAMETER_HEADERS)
        .action(ArgAction::SetTrue)
        .help("Include a header row in CSV output")
}

pub fn pretty_flag() -> Arg {
    Arg::new(PARAMETER_PRETTY)
        .long(PARAMETER_PRETTY)
        .action(ArgAction::SetTrue)
        .help("Pretty-print JSON output")
}

pub fn select_parameter() -> Arg {
    Arg::new(PARAMETER_SELECT)
        .long(PARAMETER_SELECT)
        .num_args(1..)
        .value_delimiter(',')
        .required(false)
        .help("Restrict the returned properties to the named ones")
}

pub fn include_parameter() -> Arg {
    Arg::new(PARAMETER_INCLUDE)
        .short('i')
        .long(PARAMETER_INCLUDE)
        .num_args(1)
        .required(false)
        .help("Name filter; supports prefix (token*) and suffix (*token) wildcards")
}

pub fn container_parameter() -> Arg {
    Arg::new(PARAMETER_CONTAINER)
        .short('c')
        .long(PARAMETER_CONTAINER)
        .num_args(1)
        .required(false)
        .help("Container to address; defaults to the configured or caller's own container")
}

pub fn special_parameter() -> Arg {
    let keywords: Vec<String> = SpecialFolder::iter().map(|k| k.to_string()).collect();
    Arg::new(PARAMETER_SPECIAL)
        .long(PARAMETER_SPECIAL)
        .num_args(1)
        .required(false)
        .conflicts_with(PARAMETER_PATH)
        .help(format!("Address a special folder ({})", keywords.join(", ")))
}

pub fn folders_only_flag() -> Arg {
    Arg::new(PARAMETER_FOLDERS_ONLY)
        .long(PARAMETER_FOLDERS_ONLY)
        .action(ArgAction::SetTrue)
        .conflicts_with(PARAMETER_FILES_ONLY)
        .help("Only return folders")
}

pub fn files_only_flag() -> Arg {
    Arg::new(PARAMETER_FILES_ONLY)
        .long(PARAMETER_FILES_ONLY)
        .action(ArgAction::SetTrue)
        .help("Only return files")
}

pub fn conflict_parameter() -> Arg {
    Arg::new(PARAMETER_CONFLICT)
        .long(PARAMETER_CONFLICT)
        .num_args(1)
        .required(false)
        .default_value("replace")
        .value_parser(ConflictBehavior::names())
        .help("What to do when the target name already exists")
}

pub fn local_path_parameter() -> Arg {
    Arg::new(PARAMETER_LOCAL_PATH)
        .num_args(1)
        .required(true)
        .value_parser(clap::value_parser!(PathBuf))
        .help("Local file to upload")
}
