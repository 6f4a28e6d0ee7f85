//! Nimbus Workspace V1 API client implementation.
//!
//! Every operation follows the same funnel: a caller-supplied reference is
//! resolved to a canonical path, the query composer builds the request URI,
//! the dispatcher executes it (following continuation links), and the
//! result adapter annotates and orders what comes back. Write operations go
//! through the upload policy instead of the read path.
//!
//! Recoverable conditions (missing resources, insufficient scope) are
//! absorbed here: the operation logs a warning and yields an empty result,
//! so pipelines composed over these operations never see a cascading
//! failure. Only genuine transport failures propagate.

use serde_json::{json, Value};
use std::path::Path;
use strum::Display;
use tracing::{debug, warn};

use crate::adapt::{adapt_container, adapt_group, adapt_item, adapt_user, sort_collection};
use crate::client::{HttpClient, HttpRequestConfig};
use crate::configuration::{AccountType, Configuration};
use crate::container_cache::ContainerNameCache;
use crate::dispatch::{self, ItemPostFilter, RequestSpec};
use crate::model::{Container, Group, Item, User};
use crate::query::{self, QueryOptions};
use crate::resolve::{ContainerRef, ItemRef};
use crate::upload::{self, ConflictBehavior};

/// Error emitted by the Nimbus V1 API client.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),
    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("configuration error: {0}")]
    ConfigurationError(#[from] crate::configuration::ConfigurationError),
    #[error("invalid resource reference: {0}")]
    InvalidReference(String),
    #[error("invalid upload destination: {0}")]
    InvalidDestination(String),
    #[error("container not found: {0}")]
    ContainerNotFound(String),
    #[error("resource not found: {0}")]
    NotFound(String),
    #[error("access to {0} was denied; verify that the granted scopes cover this operation")]
    Forbidden(String),
    #[error("write conflict: {0}")]
    Conflict(String),
    #[error("unsupported query: {0}")]
    UnsupportedQuery(String),
    #[error("this operation requires the {0} capability, which the configured account does not have")]
    MissingCapability(Capability),
    #[error("transport failure (HTTP {status}): {detail}")]
    Transport { status: u16, detail: String },
}

impl ApiError {
    /// Whether the condition is expected and reportable rather than fatal.
    /// Recoverable errors become warnings plus an empty result; everything
    /// else aborts the operation.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            ApiError::InvalidReference(_)
                | ApiError::InvalidDestination(_)
                | ApiError::ContainerNotFound(_)
                | ApiError::NotFound(_)
                | ApiError::Forbidden(_)
                | ApiError::Conflict(_)
                | ApiError::UnsupportedQuery(_)
                | ApiError::MissingCapability(_)
        )
    }
}

/// Account capabilities gating certain operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "kebab-case")]
pub enum Capability {
    OrganizationalAccount,
}

/// Fallible counterpart of `Default` for clients that need configuration to
/// exist.
pub trait TryDefault: Sized {
    type Error;
    fn try_default() -> Result<Self, Self::Error>;
}

pub struct NimbusApiClient {
    http: HttpClient,
    access_token: Option<String>,
    account_type: AccountType,
    container_names: ContainerNameCache,
}

impl NimbusApiClient {
    pub fn new(http: HttpClient, account_type: AccountType) -> Self {
        Self {
            http,
            access_token: None,
            account_type,
            container_names: ContainerNameCache::new(),
        }
    }

    pub fn from_configuration(configuration: &Configuration) -> Result<Self, ApiError> {
        let http = HttpClient::new(HttpRequestConfig::from_configuration(configuration))?;
        let mut client = Self::new(http, configuration.account_type());
        client.access_token = Configuration::access_token();
        Ok(client)
    }

    pub fn with_access_token(mut self, token: String) -> Self {
        self.access_token = Some(token);
        self
    }

    /// The container id to display-name lookup populated by successful
    /// container resolutions.
    pub fn container_names(&self) -> &ContainerNameCache {
        &self.container_names
    }

    fn token(&self) -> Option<&str> {
        self.access_token.as_deref()
    }

    fn has_capability(&self, capability: Capability) -> bool {
        match capability {
            Capability::OrganizationalAccount => self.account_type == AccountType::Organizational,
        }
    }

    fn require_capability(&self, capability: Capability) -> Result<(), ApiError> {
        if self.has_capability(capability) {
            Ok(())
        } else {
            Err(ApiError::MissingCapability(capability))
        }
    }

    /// Convert a recoverable miss on a collection fetch into an empty
    /// result plus a warning, preserving pipeline composability.
    fn absorb_collection(
        result: Result<Vec<Value>, ApiError>,
        context: &str,
    ) -> Result<Vec<Value>, ApiError> {
        match result {
            Ok(results) => Ok(results),
            Err(e @ (ApiError::NotFound(_) | ApiError::Forbidden(_))) => {
                warn!("{} while listing {}; returning no results", e, context);
                Ok(Vec::new())
            }
            Err(e) => Err(e),
        }
    }

    /// Convert a recoverable miss on a single-resource fetch into `None`
    /// plus a warning.
    fn absorb_single(
        result: Result<Value, ApiError>,
        context: &str,
    ) -> Result<Option<Value>, ApiError> {
        match result {
            Ok(result) => Ok(Some(result)),
            Err(e @ (ApiError::NotFound(_) | ApiError::Forbidden(_))) => {
                warn!("{} while fetching {}", e, context);
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    // ---- users ----

    pub async fn list_users(&self, options: &QueryOptions) -> Result<Vec<User>, ApiError> {
        let uri = query::compose("users", options)?;
        let raw = Self::absorb_collection(
            dispatch::collect_collection(
                &self.http,
                self.token(),
                RequestSpec::get(uri),
                ItemPostFilter::All,
            )
            .await,
            "users",
        )?;

        let mut users = raw
            .into_iter()
            .map(adapt_user)
            .collect::<Result<Vec<_>, _>>()?;
        sort_collection(&mut users);
        Ok(users)
    }

    pub async fn get_user(
        &self,
        user_id: &str,
        select: Option<Vec<String>>,
    ) -> Result<Option<User>, ApiError> {
        let options = QueryOptions::default().with_select(select);
        let uri = query::compose(&format!("users/{}", user_id), &options)?;
        let raw = Self::absorb_single(
            dispatch::dispatch_single(&self.http, self.token(), RequestSpec::get(uri)).await,
            &format!("user {}", user_id),
        )?;

        raw.map(adapt_user).transpose()
    }

    // ---- groups ----

    pub async fn list_groups(&self, options: &QueryOptions) -> Result<Vec<Group>, ApiError> {
        self.require_capability(Capability::OrganizationalAccount)?;

        let uri = query::compose("groups", options)?;
        let raw = Self::absorb_collection(
            dispatch::collect_collection(
                &self.http,
                self.token(),
                RequestSpec::get(uri),
                ItemPostFilter::All,
            )
            .await,
            "groups",
        )?;

        let mut groups = raw
            .into_iter()
            .map(adapt_group)
            .collect::<Result<Vec<_>, _>>()?;
        sort_collection(&mut groups);
        Ok(groups)
    }

    pub async fn get_group(&self, group_id: &str) -> Result<Option<Group>, ApiError> {
        self.require_capability(Capability::OrganizationalAccount)?;

        let uri = format!("groups/{}", group_id);
        let raw = Self::absorb_single(
            dispatch::dispatch_single(&self.http, self.token(), RequestSpec::get(uri)).await,
            &format!("group {}", group_id),
        )?;

        raw.map(adapt_group).transpose()
    }

    pub async fn list_group_members(&self, group_id: &str) -> Result<Vec<User>, ApiError> {
        self.require_capability(Capability::OrganizationalAccount)?;

        let uri = format!("groups/{}/members", group_id);
        let raw = Self::absorb_collection(
            dispatch::collect_collection(
                &self.http,
                self.token(),
                RequestSpec::get(uri),
                ItemPostFilter::All,
            )
            .await,
            &format!("members of group {}", group_id),
        )?;

        let mut members = raw
            .into_iter()
            .map(adapt_user)
            .collect::<Result<Vec<_>, _>>()?;
        sort_collection(&mut members);
        Ok(members)
    }

    // ---- containers ----

    pub async fn list_containers(&self) -> Result<Vec<Container>, ApiError> {
        let raw = Self::absorb_collection(
            dispatch::collect_collection(
                &self.http,
                self.token(),
                RequestSpec::get("me/containers"),
                ItemPostFilter::All,
            )
            .await,
            "containers",
        )?;

        let mut containers = raw
            .into_iter()
            .map(adapt_container)
            .collect::<Result<Vec<_>, _>>()?;
        for container in &containers {
            self.container_names
                .record(&container.id, container.display_name());
        }
        sort_collection(&mut containers);
        Ok(containers)
    }

    /// Dereference a container reference, confirming it is accessible.
    ///
    /// This is the one place where resolution touches the network. A miss
    /// is a container-not-found condition, never a path-syntax error.
    pub async fn get_container(&self, reference: &ContainerRef) -> Result<Container, ApiError> {
        let path = reference.resolve()?;

        match dispatch::dispatch_single(&self.http, self.token(), RequestSpec::get(path.clone()))
            .await
        {
            Ok(raw) => {
                let container = adapt_container(raw)?;
                self.container_names
                    .record(&container.id, container.display_name());
                Ok(container)
            }
            Err(ApiError::NotFound(_)) => Err(ApiError::ContainerNotFound(path)),
            Err(e) => Err(e),
        }
    }

    /// Resolve a container reference down to the canonical `containers/{id}`
    /// scope used by item operations, along with the bare id for result
    /// back-references.
    async fn container_scope(
        &self,
        reference: &ContainerRef,
    ) -> Result<(String, String), ApiError> {
        let container = self.get_container(reference).await?;
        Ok((format!("containers/{}", container.id), container.id))
    }

    // ---- items ----

    pub async fn list_children(
        &self,
        container: &ContainerRef,
        folder: &ItemRef,
        filter: ItemPostFilter,
        options: &QueryOptions,
    ) -> Result<Vec<Item>, ApiError> {
        let (container_path, container_id) = self.container_scope(container).await?;
        let folder_path = folder.resolve()?;
        let uri = query::compose(&format!("{}/{}/children", container_path, folder_path), options)?;

        let raw = Self::absorb_collection(
            dispatch::collect_collection(&self.http, self.token(), RequestSpec::get(uri), filter)
                .await,
            &format!("children of {}", folder_path),
        )?;

        let mut items = raw
            .into_iter()
            .map(|value| adapt_item(value, &container_id))
            .collect::<Result<Vec<_>, _>>()?;
        sort_collection(&mut items);
        Ok(items)
    }

    pub async fn get_item(
        &self,
        container: &ContainerRef,
        item: &ItemRef,
        select: Option<Vec<String>>,
    ) -> Result<Option<Item>, ApiError> {
        let (container_path, container_id) = self.container_scope(container).await?;
        let item_path = item.resolve()?;
        let options = QueryOptions::default().with_select(select);
        let uri = query::compose(&format!("{}/{}", container_path, item_path), &options)?;

        let raw = Self::absorb_single(
            dispatch::dispatch_single(&self.http, self.token(), RequestSpec::get(uri)).await,
            &item_path,
        )?;

        raw.map(|value| adapt_item(value, &container_id)).transpose()
    }

    /// Free-text search scoped to a folder, or to the container root when
    /// the caller names none.
    pub async fn search_items(
        &self,
        container: &ContainerRef,
        scope: &ItemRef,
        term: &str,
    ) -> Result<Vec<Item>, ApiError> {
        let (container_path, container_id) = self.container_scope(container).await?;
        let scope_path = scope.resolve()?;
        let options = QueryOptions {
            search: Some(term.to_string()),
            ..Default::default()
        };
        let uri = query::compose(&format!("{}/{}", container_path, scope_path), &options)?;

        let raw = Self::absorb_collection(
            dispatch::collect_collection(
                &self.http,
                self.token(),
                RequestSpec::get(uri),
                ItemPostFilter::All,
            )
            .await,
            &format!("search results in {}", scope_path),
        )?;

        let mut items = raw
            .into_iter()
            .map(|value| adapt_item(value, &container_id))
            .collect::<Result<Vec<_>, _>>()?;
        sort_collection(&mut items);
        Ok(items)
    }

    /// Items other people shared with the caller. Cannot be combined with
    /// free-text search; the query composer rejects that shape up front.
    pub async fn list_shared_with_me(&self) -> Result<Vec<Item>, ApiError> {
        self.require_capability(Capability::OrganizationalAccount)?;

        let (container_path, container_id) = self.container_scope(&ContainerRef::Default).await?;
        let uri = format!("{}/sharedWithMe", container_path);

        let raw = Self::absorb_collection(
            dispatch::collect_collection(
                &self.http,
                self.token(),
                RequestSpec::get(uri),
                ItemPostFilter::All,
            )
            .await,
            "shared items",
        )?;

        let mut items = raw
            .into_iter()
            .map(|value| adapt_item(value, &container_id))
            .collect::<Result<Vec<_>, _>>()?;
        sort_collection(&mut items);
        Ok(items)
    }

    pub async fn create_folder(
        &self,
        container: &ContainerRef,
        parent: &ItemRef,
        name: &str,
    ) -> Result<Item, ApiError> {
        let (container_path, container_id) = self.container_scope(container).await?;
        let parent_path = parent.resolve()?;
        let uri = format!("{}/{}/children", container_path, parent_path);
        let body = json!({ "name": name, "folder": {} });

        let raw =
            dispatch::dispatch_single(&self.http, self.token(), RequestSpec::post(uri, body))
                .await?;
        adapt_item(raw, &container_id)
    }

    pub async fn rename_item(
        &self,
        container: &ContainerRef,
        item: &ItemRef,
        new_name: &str,
    ) -> Result<Option<Item>, ApiError> {
        let (container_path, container_id) = self.container_scope(container).await?;
        let item_path = item.resolve()?;
        let uri = format!("{}/{}", container_path, item_path);
        let body = json!({ "name": new_name });

        let raw = Self::absorb_single(
            dispatch::dispatch_single(&self.http, self.token(), RequestSpec::patch(uri, body))
                .await,
            &item_path,
        )?;

        raw.map(|value| adapt_item(value, &container_id)).transpose()
    }

    /// Delete an item. A missing item is reported and absorbed; the return
    /// value tells whether a deletion actually happened.
    pub async fn delete_item(
        &self,
        container: &ContainerRef,
        item: &ItemRef,
    ) -> Result<bool, ApiError> {
        let (container_path, _) = self.container_scope(container).await?;
        let item_path = item.resolve()?;
        let uri = format!("{}/{}", container_path, item_path);

        match dispatch::dispatch_single(&self.http, self.token(), RequestSpec::delete(uri)).await {
            Ok(_) => {
                debug!("Deleted {}", item_path);
                Ok(true)
            }
            Err(e @ (ApiError::NotFound(_) | ApiError::Forbidden(_))) => {
                warn!("{} while deleting {}", e, item_path);
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }

    /// Upload a local file. Destination handling and the single-shot versus
    /// session decision live in the upload policy.
    pub async fn upload_file(
        &self,
        container: &ContainerRef,
        destination: &ItemRef,
        local_path: &Path,
        conflict: ConflictBehavior,
    ) -> Result<Item, ApiError> {
        let (container_path, container_id) = self.container_scope(container).await?;

        let file_name = local_path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| {
                ApiError::InvalidDestination(format!(
                    "local path {:?} has no usable file name",
                    local_path
                ))
            })?;

        let target_path = upload::resolve_destination(
            &self.http,
            self.token(),
            &container_path,
            destination,
            file_name,
        )
        .await?;

        let raw = upload::upload_payload(
            &self.http,
            self.token(),
            &container_path,
            &target_path,
            local_path,
            conflict,
        )
        .await?;

        upload::finish_upload(raw, &container_id)
    }
}

impl TryDefault for NimbusApiClient {
    type Error = ApiError;

    fn try_default() -> Result<Self, ApiError> {
        let configuration = Configuration::load_or_create_default()?;
        NimbusApiClient::from_configuration(&configuration)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client_with_account(account_type: AccountType) -> NimbusApiClient {
        let http = HttpClient::new(HttpRequestConfig::default()).unwrap();
        NimbusApiClient::new(http, account_type)
    }

    #[test]
    fn test_capability_gating() {
        let organizational = client_with_account(AccountType::Organizational);
        let personal = client_with_account(AccountType::Personal);

        assert!(organizational
            .require_capability(Capability::OrganizationalAccount)
            .is_ok());
        assert!(matches!(
            personal.require_capability(Capability::OrganizationalAccount),
            Err(ApiError::MissingCapability(_))
        ));
    }

    #[test]
    fn test_absorb_collection_converts_missing_to_empty() {
        let missing: Result<Vec<Value>, ApiError> =
            Err(ApiError::NotFound("containers/b!x/root/children".to_string()));
        let absorbed = NimbusApiClient::absorb_collection(missing, "children").unwrap();
        assert!(absorbed.is_empty());
    }

    #[test]
    fn test_absorb_collection_passes_transport_through() {
        let fatal: Result<Vec<Value>, ApiError> = Err(ApiError::Transport {
            status: 503,
            detail: "service unavailable".to_string(),
        });
        assert!(matches!(
            NimbusApiClient::absorb_collection(fatal, "children"),
            Err(ApiError::Transport { status: 503, .. })
        ));
    }

    #[test]
    fn test_absorb_single_converts_forbidden_to_none() {
        let forbidden: Result<Value, ApiError> =
            Err(ApiError::Forbidden("users/ada".to_string()));
        assert!(NimbusApiClient::absorb_single(forbidden, "user ada")
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_error_recoverability() {
        assert!(ApiError::NotFound("x".to_string()).is_recoverable());
        assert!(ApiError::UnsupportedQuery("x".to_string()).is_recoverable());
        assert!(ApiError::Conflict("x".to_string()).is_recoverable());
        assert!(!ApiError::Transport {
            status: 500,
            detail: "x".to_string()
        }
        .is_recoverable());
    }
}
