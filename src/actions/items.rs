//! Item action implementations: listing folder children, fetching single
//! items, free-text search, the shared-with-me view, folder creation,
//! renames and deletes.

use clap::ArgMatches;
use std::str::FromStr;
use tracing::trace;

use crate::actions::utils::{output_format, print_formatted, query_options, report_recoverable};
use crate::actions::CliActionError;
use crate::commands::params::{
    PARAMETER_FILES_ONLY, PARAMETER_FOLDERS_ONLY, PARAMETER_NEW_NAME, PARAMETER_PATH,
    PARAMETER_SEARCH_TERM, PARAMETER_SPECIAL,
};
use crate::context::ExecutionContext;
use crate::dispatch::ItemPostFilter;
use crate::model::ItemList;
use crate::nimbus_v1::ApiError;
use crate::resolve::{ItemRef, SpecialFolder};

/// Build the item reference for a command: an explicit special-folder
/// keyword wins over a path argument; no argument at all addresses the
/// container root.
fn item_ref(matches: &ArgMatches) -> Result<ItemRef, CliActionError> {
    let special = matches
        .try_get_one::<String>(PARAMETER_SPECIAL)
        .ok()
        .flatten();
    if let Some(keyword) = special {
        let folder = SpecialFolder::from_str(keyword).map_err(|_| {
            CliActionError::ApiError(ApiError::InvalidReference(format!(
                "unknown special folder: {}",
                keyword
            )))
        })?;
        return Ok(ItemRef::Special(folder));
    }

    Ok(ItemRef::from_parameter(
        matches.get_one::<String>(PARAMETER_PATH),
    ))
}

fn post_filter(matches: &ArgMatches) -> ItemPostFilter {
    if matches.get_flag(PARAMETER_FOLDERS_ONLY) {
        ItemPostFilter::FoldersOnly
    } else if matches.get_flag(PARAMETER_FILES_ONLY) {
        ItemPostFilter::FilesOnly
    } else {
        ItemPostFilter::All
    }
}

/// List the children of a folder.
pub async fn list_items(matches: &ArgMatches) -> Result<(), CliActionError> {
    trace!("Executing \"item list\" command...");

    let format = output_format(matches)?;
    let options = query_options(matches);
    let filter = post_filter(matches);
    let folder = item_ref(matches)?;
    let ctx = ExecutionContext::initialize()?;
    let container = ctx.container_ref(matches);

    match ctx
        .api()
        .list_children(&container, &folder, filter, &options)
        .await
    {
        Ok(items) => {
            if items.is_empty() {
                println!("No matching items.");
                return Ok(());
            }
            print_formatted(&ItemList { items }, &format)
        }
        Err(e) => report_recoverable(e),
    }
}

/// Get a single item by path or identifier.
pub async fn get_item(matches: &ArgMatches) -> Result<(), CliActionError> {
    trace!("Executing \"item get\" command...");

    let format = output_format(matches)?;
    let options = query_options(matches);
    let item = item_ref(matches)?;
    let ctx = ExecutionContext::initialize()?;
    let container = ctx.container_ref(matches);

    match ctx.api().get_item(&container, &item, options.select).await {
        Ok(Some(item)) => print_formatted(&item, &format),
        Ok(None) => {
            println!("No such item.");
            Ok(())
        }
        Err(e) => report_recoverable(e),
    }
}

/// Search for items by free text, scoped to a folder or the container root.
///
/// A term carrying a wildcard is not free text: it becomes a server-side
/// name filter over the scope's children. The pattern is validated before
/// anything touches the network, so an untranslatable shape never turns
/// into a request.
pub async fn search_items(matches: &ArgMatches) -> Result<(), CliActionError> {
    trace!("Executing \"item search\" command...");

    let term = matches
        .get_one::<String>(PARAMETER_SEARCH_TERM)
        .ok_or_else(|| {
            CliActionError::MissingRequiredArgument("search term is required".to_string())
        })?;

    let format = output_format(matches)?;
    let scope = item_ref(matches)?;

    let wildcard_options = if term.contains('*') {
        if let Err(e) = crate::query::include_filter(term) {
            return report_recoverable(e);
        }
        Some(crate::query::QueryOptions::default().with_include(Some(term.clone())))
    } else {
        None
    };

    let ctx = ExecutionContext::initialize()?;
    let container = ctx.container_ref(matches);

    let result = match &wildcard_options {
        Some(options) => {
            ctx.api()
                .list_children(&container, &scope, ItemPostFilter::All, options)
                .await
        }
        None => ctx.api().search_items(&container, &scope, term).await,
    };

    match result {
        Ok(items) => {
            if items.is_empty() {
                println!("No items matched '{}'.", term);
                return Ok(());
            }
            print_formatted(&ItemList { items }, &format)
        }
        Err(e) => report_recoverable(e),
    }
}

/// List items shared with the caller.
pub async fn shared_items(matches: &ArgMatches) -> Result<(), CliActionError> {
    trace!("Executing \"item shared\" command...");

    let format = output_format(matches)?;
    let ctx = ExecutionContext::initialize()?;

    match ctx.api().list_shared_with_me().await {
        Ok(items) => {
            if items.is_empty() {
                println!("Nothing has been shared with you.");
                return Ok(());
            }
            print_formatted(&ItemList { items }, &format)
        }
        Err(e) => report_recoverable(e),
    }
}

/// Create a folder at the given path.
pub async fn make_folder(matches: &ArgMatches) -> Result<(), CliActionError> {
    trace!("Executing \"item mkdir\" command...");

    let path = matches.get_one::<String>(PARAMETER_PATH).ok_or_else(|| {
        CliActionError::MissingRequiredArgument("folder path is required".to_string())
    })?;

    let format = output_format(matches)?;
    let ctx = ExecutionContext::initialize()?;
    let container = ctx.container_ref(matches);

    // The mkdir argument is always a path; a bare segment names a folder
    // under the root rather than an identifier.
    let canonical = if path.contains('/') || path.contains(':') {
        ItemRef::Reference(path.clone())
            .resolve()
            .map_err(CliActionError::ApiError)?
    } else {
        format!("root:/{}:", path)
    };
    let (parent_path, name) = match crate::resolve::split_item_path(&canonical) {
        Some((parent, name)) => (ItemRef::Reference(parent), name),
        None => {
            return report_recoverable(ApiError::InvalidReference(format!(
                "cannot derive a parent folder from '{}'",
                path
            )))
        }
    };

    match ctx
        .api()
        .create_folder(&container, &parent_path, &name)
        .await
    {
        Ok(item) => print_formatted(&item, &format),
        Err(e) => report_recoverable(e),
    }
}

/// Rename an item.
pub async fn rename_item(matches: &ArgMatches) -> Result<(), CliActionError> {
    trace!("Executing \"item rename\" command...");

    let new_name = matches
        .get_one::<String>(PARAMETER_NEW_NAME)
        .ok_or_else(|| {
            CliActionError::MissingRequiredArgument("new name is required".to_string())
        })?;

    let format = output_format(matches)?;
    let item = item_ref(matches)?;
    let ctx = ExecutionContext::initialize()?;
    let container = ctx.container_ref(matches);

    match ctx.api().rename_item(&container, &item, new_name).await {
        Ok(Some(item)) => print_formatted(&item, &format),
        Ok(None) => {
            println!("No such item; nothing was renamed.");
            Ok(())
        }
        Err(e) => report_recoverable(e),
    }
}

/// Delete an item.
pub async fn delete_item(matches: &ArgMatches) -> Result<(), CliActionError> {
    trace!("Executing \"item delete\" command...");

    let item = item_ref(matches)?;
    let ctx = ExecutionContext::initialize()?;
    let container = ctx.container_ref(matches);

    match ctx.api().delete_item(&container, &item).await {
        Ok(true) => {
            println!("Deleted.");
            Ok(())
        }
        Ok(false) => {
            println!("No such item; nothing was deleted.");
            Ok(())
        }
        Err(e) => report_recoverable(e),
    }
}
