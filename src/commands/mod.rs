//! CLI command tree definition.

use clap::{Arg, ArgMatches, Command};

pub mod params;

use self::params::*;

pub const COMMAND_USER: &str = "user";
pub const COMMAND_GROUP: &str = "group";
pub const COMMAND_CONTAINER: &str = "container";
pub const COMMAND_ITEM: &str = "item";
pub const COMMAND_CONFIG: &str = "config";

pub const COMMAND_LIST: &str = "list";
pub const COMMAND_GET: &str = "get";
pub const COMMAND_MEMBERS: &str = "members";
pub const COMMAND_SEARCH: &str = "search";
pub const COMMAND_SHARED: &str = "shared";
pub const COMMAND_UPLOAD: &str = "upload";
pub const COMMAND_MKDIR: &str = "mkdir";
pub const COMMAND_RENAME: &str = "rename";
pub const COMMAND_DELETE: &str = "delete";
pub const COMMAND_SHOW: &str = "show";
pub const COMMAND_SET: &str = "set";
pub const COMMAND_PATH: &str = "path";

fn with_output_args(command: Command) -> Command {
    command
        .arg(format_parameter())
        .arg(headers_flag())
        .arg(pretty_flag())
}

pub fn build_cli() -> Command {
    Command::new(env!("CARGO_PKG_NAME"))
        .version(env!("CARGO_PKG_VERSION"))
        .author(env!("CARGO_PKG_AUTHORS"))
        .about(env!("CARGO_PKG_DESCRIPTION"))
        .propagate_version(true)
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new(COMMAND_USER)
                .about("working with directory users")
                .subcommand_required(true)
                .subcommand(with_output_args(
                    Command::new(COMMAND_LIST)
                        .about("lists users in the directory")
                        .arg(include_parameter())
                        .arg(select_parameter()),
                ))
                .subcommand(with_output_args(
                    Command::new(COMMAND_GET)
                        .about("shows one user")
                        .arg(
                            Arg::new(PARAMETER_USER_ID)
                                .num_args(1)
                                .required(true)
                                .help("User identifier or principal name"),
                        )
                        .arg(select_parameter()),
                )),
        )
        .subcommand(
            Command::new(COMMAND_GROUP)
                .about("working with directory groups (organizational accounts only)")
                .subcommand_required(true)
                .subcommand(with_output_args(
                    Command::new(COMMAND_LIST)
                        .about("lists groups in the directory")
                        .arg(include_parameter())
                        .arg(select_parameter()),
                ))
                .subcommand(with_output_args(
                    Command::new(COMMAND_GET).about("shows one group").arg(
                        Arg::new(PARAMETER_GROUP_ID)
                            .num_args(1)
                            .required(true)
                            .help("Group identifier"),
                    ),
                ))
                .subcommand(with_output_args(
                    Command::new(COMMAND_MEMBERS)
                        .about("lists the members of a group")
                        .arg(
                            Arg::new(PARAMETER_GROUP_ID)
                                .num_args(1)
                                .required(true)
                                .help("Group identifier"),
                        ),
                )),
        )
        .subcommand(
            Command::new(COMMAND_CONTAINER)
                .about("working with storage containers")
                .subcommand_required(true)
                .subcommand(with_output_args(
                    Command::new(COMMAND_LIST).about("lists the containers available to you"),
                ))
                .subcommand(with_output_args(
                    Command::new(COMMAND_GET)
                        .about("shows one container; defaults to your own")
                        .arg(
                            Arg::new(PARAMETER_REFERENCE)
                                .num_args(1)
                                .required(false)
                                .help("Container identifier"),
                        ),
                )),
        )
        .subcommand(
            Command::new(COMMAND_ITEM)
                .about("working with files and folders inside a container")
                .subcommand_required(true)
                .subcommand(with_output_args(
                    Command::new(COMMAND_LIST)
                        .about("lists the children of a folder")
                        .arg(
                            Arg::new(PARAMETER_PATH)
                                .num_args(1)
                                .required(false)
                                .help("Folder path, identifier, or root when omitted"),
                        )
                        .arg(container_parameter())
                        .arg(special_parameter())
                        .arg(folders_only_flag())
                        .arg(files_only_flag())
                        .arg(include_parameter())
                        .arg(select_parameter()),
                ))
                .subcommand(with_output_args(
                    Command::new(COMMAND_GET)
                        .about("shows one file or folder")
                        .arg(
                            Arg::new(PARAMETER_PATH)
                                .num_args(1)
                                .required(false)
                                .help("Item path or identifier"),
                        )
                        .arg(container_parameter())
                        .arg(special_parameter())
                        .arg(select_parameter()),
                ))
                .subcommand(with_output_args(
                    Command::new(COMMAND_SEARCH)
                        .about("searches items by free text")
                        .arg(
                            Arg::new(PARAMETER_SEARCH_TERM)
                                .num_args(1)
                                .required(true)
                                .help("Search term"),
                        )
                        .arg(
                            Arg::new(PARAMETER_PATH)
                                .long(PARAMETER_PATH)
                                .num_args(1)
                                .required(false)
                                .help("Folder to search within; the container root when omitted"),
                        )
                        .arg(container_parameter()),
                ))
                .subcommand(with_output_args(
                    Command::new(COMMAND_SHARED)
                        .about("lists items shared with you (organizational accounts only)"),
                ))
                .subcommand(with_output_args(
                    Command::new(COMMAND_UPLOAD)
                        .about("uploads a local file")
                        .arg(local_path_parameter())
                        .arg(
                            Arg::new(PARAMETER_DESTINATION)
                                .num_args(1)
                                .required(false)
                                .help("Destination folder or file path; the root when omitted"),
                        )
                        .arg(container_parameter())
                        .arg(conflict_parameter()),
                ))
                .subcommand(with_output_args(
                    Command::new(COMMAND_MKDIR)
                        .about("creates a folder")
                        .arg(
                            Arg::new(PARAMETER_PATH)
                                .num_args(1)
                                .required(true)
                                .help("Path of the folder to create"),
                        )
                        .arg(container_parameter()),
                ))
                .subcommand(with_output_args(
                    Command::new(COMMAND_RENAME)
                        .about("renames a file or folder")
                        .arg(
                            Arg::new(PARAMETER_PATH)
                                .num_args(1)
                                .required(true)
                                .help("Item path or identifier"),
                        )
                        .arg(
                            Arg::new(PARAMETER_NEW_NAME)
                                .num_args(1)
                                .required(true)
                                .help("New item name"),
                        )
                        .arg(container_parameter()),
                ))
                .subcommand(
                    Command::new(COMMAND_DELETE)
                        .about("deletes a file or folder")
                        .arg(
                            Arg::new(PARAMETER_PATH)
                                .num_args(1)
                                .required(true)
                                .help("Item path or identifier"),
                        )
                        .arg(container_parameter()),
                ),
        )
        .subcommand(
            Command::new(COMMAND_CONFIG)
                .about("working with configuration")
                .subcommand_required(true)
                .subcommand(
                    Command::new(COMMAND_SHOW).about("displays the current configuration"),
                )
                .subcommand(
                    Command::new(COMMAND_GET)
                        .about("displays configuration details")
                        .subcommand_required(true)
                        .subcommand(
                            Command::new(COMMAND_PATH).about("shows the configuration file path"),
                        ),
                )
                .subcommand(
                    Command::new(COMMAND_SET)
                        .about("sets a configuration property")
                        .subcommand_required(true)
                        .subcommand(
                            Command::new(COMMAND_CONTAINER)
                                .about("sets the default container")
                                .arg(
                                    Arg::new(PARAMETER_CONTAINER_ID)
                                        .num_args(1)
                                        .required(true)
                                        .help("Container identifier to address by default"),
                                ),
                        ),
                ),
        )
}

pub fn create_cli_commands() -> ArgMatches {
    build_cli().get_matches()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_tree_is_well_formed() {
        build_cli().debug_assert();
    }

    #[test]
    fn test_item_list_accepts_path_and_filters() {
        let matches = build_cli()
            .try_get_matches_from(vec![
                "nbcli",
                "item",
                "list",
                "Documents/Reports",
                "--folders-only",
                "--include",
                "budget*",
            ])
            .unwrap();

        let (command, sub_matches) = matches.subcommand().unwrap();
        assert_eq!(command, COMMAND_ITEM);
        let (sub_command, leaf) = sub_matches.subcommand().unwrap();
        assert_eq!(sub_command, COMMAND_LIST);
        assert_eq!(
            leaf.get_one::<String>(PARAMETER_PATH).unwrap(),
            "Documents/Reports"
        );
        assert!(leaf.get_flag(PARAMETER_FOLDERS_ONLY));
    }

    #[test]
    fn test_special_folder_conflicts_with_path() {
        let result = build_cli().try_get_matches_from(vec![
            "nbcli",
            "item",
            "list",
            "Documents",
            "--special",
            "documents",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_upload_conflict_values_are_validated() {
        let result = build_cli().try_get_matches_from(vec![
            "nbcli",
            "item",
            "upload",
            "./report.pdf",
            "--conflict",
            "merge",
        ]);
        assert!(result.is_err());
    }
}
