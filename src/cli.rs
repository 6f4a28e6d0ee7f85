//! Top-level command dispatch.
//!
//! Parses the command tree and routes each leaf to its action. The shape
//! mirrors the tree in `commands`: object kind first, verb second.

use clap::ArgMatches;

use crate::actions;
use crate::commands::{
    create_cli_commands, COMMAND_CONFIG, COMMAND_CONTAINER, COMMAND_DELETE, COMMAND_GET,
    COMMAND_GROUP, COMMAND_ITEM, COMMAND_LIST, COMMAND_MEMBERS, COMMAND_MKDIR, COMMAND_PATH,
    COMMAND_RENAME, COMMAND_SEARCH, COMMAND_SET, COMMAND_SHARED, COMMAND_SHOW, COMMAND_UPLOAD,
    COMMAND_USER,
};
use crate::commands::params::PARAMETER_CONTAINER_ID;
use crate::configuration::Configuration;
use crate::error::CliError;

fn extract_subcommand_name(sub_matches: &ArgMatches) -> String {
    match sub_matches.subcommand() {
        Some((name, _)) => name.to_string(),
        None => "unknown".to_string(),
    }
}

pub async fn execute_command() -> Result<(), CliError> {
    let commands = create_cli_commands();

    match commands.subcommand() {
        // Users
        Some((COMMAND_USER, sub_matches)) => match sub_matches.subcommand() {
            Some((COMMAND_LIST, sub_matches)) => Ok(actions::users::list_users(sub_matches).await?),
            Some((COMMAND_GET, sub_matches)) => Ok(actions::users::get_user(sub_matches).await?),
            _ => Err(CliError::UnsupportedSubcommand(extract_subcommand_name(
                sub_matches,
            ))),
        },
        // Groups
        Some((COMMAND_GROUP, sub_matches)) => match sub_matches.subcommand() {
            Some((COMMAND_LIST, sub_matches)) => {
                Ok(actions::groups::list_groups(sub_matches).await?)
            }
            Some((COMMAND_GET, sub_matches)) => Ok(actions::groups::get_group(sub_matches).await?),
            Some((COMMAND_MEMBERS, sub_matches)) => {
                Ok(actions::groups::list_group_members(sub_matches).await?)
            }
            _ => Err(CliError::UnsupportedSubcommand(extract_subcommand_name(
                sub_matches,
            ))),
        },
        // Containers
        Some((COMMAND_CONTAINER, sub_matches)) => match sub_matches.subcommand() {
            Some((COMMAND_LIST, sub_matches)) => {
                Ok(actions::containers::list_containers(sub_matches).await?)
            }
            Some((COMMAND_GET, sub_matches)) => {
                Ok(actions::containers::get_container(sub_matches).await?)
            }
            _ => Err(CliError::UnsupportedSubcommand(extract_subcommand_name(
                sub_matches,
            ))),
        },
        // Items
        Some((COMMAND_ITEM, sub_matches)) => match sub_matches.subcommand() {
            Some((COMMAND_LIST, sub_matches)) => Ok(actions::items::list_items(sub_matches).await?),
            Some((COMMAND_GET, sub_matches)) => Ok(actions::items::get_item(sub_matches).await?),
            Some((COMMAND_SEARCH, sub_matches)) => {
                Ok(actions::items::search_items(sub_matches).await?)
            }
            Some((COMMAND_SHARED, sub_matches)) => {
                Ok(actions::items::shared_items(sub_matches).await?)
            }
            Some((COMMAND_UPLOAD, sub_matches)) => {
                Ok(actions::items_upload::upload_item(sub_matches).await?)
            }
            Some((COMMAND_MKDIR, sub_matches)) => {
                Ok(actions::items::make_folder(sub_matches).await?)
            }
            Some((COMMAND_RENAME, sub_matches)) => {
                Ok(actions::items::rename_item(sub_matches).await?)
            }
            Some((COMMAND_DELETE, sub_matches)) => {
                Ok(actions::items::delete_item(sub_matches).await?)
            }
            _ => Err(CliError::UnsupportedSubcommand(extract_subcommand_name(
                sub_matches,
            ))),
        },
        // Configuration
        Some((COMMAND_CONFIG, sub_matches)) => match sub_matches.subcommand() {
            Some((COMMAND_SHOW, _)) => {
                let configuration = Configuration::load_or_create_default()?;
                println!("{}", serde_json::to_string_pretty(&configuration)?);
                Ok(())
            }
            Some((COMMAND_GET, sub_matches)) => match sub_matches.subcommand() {
                Some((COMMAND_PATH, _)) => {
                    let path = Configuration::get_default_configuration_file_path()?;
                    println!("{}", path.display());
                    Ok(())
                }
                _ => Err(CliError::UnsupportedSubcommand(extract_subcommand_name(
                    sub_matches,
                ))),
            },
            Some((COMMAND_SET, sub_matches)) => match sub_matches.subcommand() {
                Some((COMMAND_CONTAINER, sub_matches)) => {
                    // Mandatory argument, enforced by clap before this point
                    let container_id = sub_matches
                        .get_one::<String>(PARAMETER_CONTAINER_ID)
                        .unwrap();
                    let mut configuration = Configuration::load_or_create_default()?;
                    configuration.set_default_container_id(Some(container_id.to_owned()));
                    configuration.save_to_default()?;
                    Ok(())
                }
                _ => Err(CliError::UnsupportedSubcommand(extract_subcommand_name(
                    sub_matches,
                ))),
            },
            _ => Err(CliError::UnsupportedSubcommand(extract_subcommand_name(
                sub_matches,
            ))),
        },
        _ => Err(CliError::UnsupportedSubcommand("unknown".to_string())),
    }
}
