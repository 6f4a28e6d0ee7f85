//! Data models for Nimbus entities (users, groups, containers, items).
//!
//! Every model is materialized from a property bag that has already been
//! stripped of transport annotations and enriched by the result adapter
//! with a caller-convenience identifier alias (and, for container-scoped
//! results, the owning-container back-reference). Once returned, a model is
//! exclusively owned by the caller.

use crate::format::{Formattable, FormattingError, OutputFormat};
use serde::{Deserialize, Serialize};

/// Types that carry a display name used for deterministic result ordering.
pub trait NamedResult {
    fn sort_name(&self) -> &str;
}

/// A user in the directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// The unique identifier for the user
    pub id: String,
    /// Caller-convenience alias for the identifier, added by the adapter
    #[serde(rename = "userId", skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(rename = "displayName", default)]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mail: Option<String>,
    #[serde(
        rename = "userPrincipalName",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub user_principal_name: Option<String>,
    #[serde(
        rename = "accountEnabled",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub account_enabled: Option<bool>,
}

impl NamedResult for User {
    fn sort_name(&self) -> &str {
        self.display_name.as_deref().unwrap_or("")
    }
}

/// A security or collaboration group in the directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub id: String,
    /// Caller-convenience alias for the identifier, added by the adapter
    #[serde(rename = "groupId", skip_serializing_if = "Option::is_none")]
    pub group_id: Option<String>,
    #[serde(rename = "displayName", default)]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mail: Option<String>,
}

impl NamedResult for Group {
    fn sort_name(&self) -> &str {
        self.display_name.as_deref().unwrap_or("")
    }
}

/// A storage container (drive).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Container {
    pub id: String,
    /// Caller-convenience alias for the identifier, added by the adapter
    #[serde(rename = "containerId", skip_serializing_if = "Option::is_none")]
    pub container_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(
        rename = "containerType",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub container_type: Option<String>,
}

impl Container {
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }
}

impl NamedResult for Container {
    fn sort_name(&self) -> &str {
        self.name.as_deref().unwrap_or("")
    }
}

/// The folder facet of an item; present when the item is a folder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FolderFacet {
    #[serde(rename = "childCount", default, skip_serializing_if = "Option::is_none")]
    pub child_count: Option<i64>,
}

/// The file facet of an item; present when the item is a file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileFacet {
    #[serde(rename = "mimeType", default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
}

/// A file or folder within a container.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: String,
    /// Caller-convenience alias for the identifier, added by the adapter
    #[serde(rename = "itemId", skip_serializing_if = "Option::is_none")]
    pub item_id: Option<String>,
    /// Identifier of the owning container, added by the adapter. This is a
    /// weak back-reference for pipeline convenience; it never implies
    /// ownership of the container itself.
    #[serde(rename = "containerId", default, skip_serializing_if = "Option::is_none")]
    pub container_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub folder: Option<FolderFacet>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<FileFacet>,
    #[serde(rename = "webUrl", default, skip_serializing_if = "Option::is_none")]
    pub web_url: Option<String>,
    #[serde(
        rename = "createdDateTime",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub created_date_time: Option<String>,
    #[serde(
        rename = "lastModifiedDateTime",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub last_modified_date_time: Option<String>,
}

impl Item {
    pub fn is_folder(&self) -> bool {
        self.folder.is_some()
    }

    pub fn kind(&self) -> &'static str {
        if self.is_folder() {
            "folder"
        } else {
            "file"
        }
    }
}

impl NamedResult for Item {
    fn sort_name(&self) -> &str {
        self.name.as_deref().unwrap_or("")
    }
}

/// A server-issued resumable upload session. Lives only for the duration of
/// one chunked upload and is discarded afterwards.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct UploadSession {
    #[serde(rename = "uploadUrl")]
    pub upload_url: String,
    #[serde(rename = "expirationDateTime", default)]
    pub expiration_date_time: Option<String>,
}

fn to_json<T: Serialize>(value: &T, pretty: bool) -> Result<String, FormattingError> {
    let json = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    json.map_err(FormattingError::JsonSerializationError)
}

impl Formattable for User {
    fn format(&self, format: &OutputFormat) -> Result<String, FormattingError> {
        UserList {
            users: vec![self.clone()],
        }
        .format(format)
    }
}

/// A list of users, as returned by list operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserList {
    pub users: Vec<User>,
}

impl Formattable for UserList {
    fn format(&self, format: &OutputFormat) -> Result<String, FormattingError> {
        match format {
            OutputFormat::Json(options) => to_json(self, options.pretty),
            OutputFormat::Csv(options) => {
                let mut wtr = csv::Writer::from_writer(vec![]);

                if options.with_headers {
                    wtr.serialize(("USER_ID", "DISPLAY_NAME", "MAIL", "USER_PRINCIPAL_NAME"))?;
                }

                for user in &self.users {
                    wtr.serialize((
                        &user.id,
                        &user.display_name,
                        &user.mail,
                        &user.user_principal_name,
                    ))?;
                }

                let data = wtr.into_inner()?;
                String::from_utf8(data).map_err(FormattingError::Utf8Error)
            }
        }
    }
}

impl Formattable for Group {
    fn format(&self, format: &OutputFormat) -> Result<String, FormattingError> {
        GroupList {
            groups: vec![self.clone()],
        }
        .format(format)
    }
}

/// A list of groups, as returned by list operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupList {
    pub groups: Vec<Group>,
}

impl Formattable for GroupList {
    fn format(&self, format: &OutputFormat) -> Result<String, FormattingError> {
        match format {
            OutputFormat::Json(options) => to_json(self, options.pretty),
            OutputFormat::Csv(options) => {
                let mut wtr = csv::Writer::from_writer(vec![]);

                if options.with_headers {
                    wtr.serialize(("GROUP_ID", "DISPLAY_NAME", "MAIL", "DESCRIPTION"))?;
                }

                for group in &self.groups {
                    wtr.serialize((&group.id, &group.display_name, &group.mail, &group.description))?;
                }

                let data = wtr.into_inner()?;
                String::from_utf8(data).map_err(FormattingError::Utf8Error)
            }
        }
    }
}

impl Formattable for Container {
    fn format(&self, format: &OutputFormat) -> Result<String, FormattingError> {
        ContainerList {
            containers: vec![self.clone()],
        }
        .format(format)
    }
}

/// A list of containers, as returned by list operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContainerList {
    pub containers: Vec<Container>,
}

impl Formattable for ContainerList {
    fn format(&self, format: &OutputFormat) -> Result<String, FormattingError> {
        match format {
            OutputFormat::Json(options) => to_json(self, options.pretty),
            OutputFormat::Csv(options) => {
                let mut wtr = csv::Writer::from_writer(vec![]);

                if options.with_headers {
                    wtr.serialize(("CONTAINER_ID", "NAME", "TYPE"))?;
                }

                for container in &self.containers {
                    wtr.serialize((&container.id, &container.name, &container.container_type))?;
                }

                let data = wtr.into_inner()?;
                String::from_utf8(data).map_err(FormattingError::Utf8Error)
            }
        }
    }
}

impl Formattable for Item {
    fn format(&self, format: &OutputFormat) -> Result<String, FormattingError> {
        ItemList {
            items: vec![self.clone()],
        }
        .format(format)
    }
}

/// A list of items, as returned by children, search and shared listings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemList {
    pub items: Vec<Item>,
}

impl Formattable for ItemList {
    fn format(&self, format: &OutputFormat) -> Result<String, FormattingError> {
        match format {
            OutputFormat::Json(options) => to_json(self, options.pretty),
            OutputFormat::Csv(options) => {
                let mut wtr = csv::Writer::from_writer(vec![]);

                if options.with_headers {
                    wtr.serialize(("ITEM_ID", "NAME", "KIND", "SIZE", "MODIFIED", "CONTAINER_ID"))?;
                }

                for item in &self.items {
                    wtr.serialize((
                        &item.id,
                        &item.name,
                        item.kind(),
                        &item.size,
                        &item.last_modified_date_time,
                        &item.container_id,
                    ))?;
                }

                let data = wtr.into_inner()?;
                String::from_utf8(data).map_err(FormattingError::Utf8Error)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::OutputFormatOptions;
    use serde_json::json;

    fn sample_item() -> Item {
        serde_json::from_value(json!({
            "id": "01BYE5RZ",
            "itemId": "01BYE5RZ",
            "containerId": "b!x",
            "name": "report.pdf",
            "size": 4096,
            "file": { "mimeType": "application/pdf" },
            "lastModifiedDateTime": "2024-11-02T09:30:00Z"
        }))
        .unwrap()
    }

    #[test]
    fn test_item_deserialization() {
        let item = sample_item();
        assert_eq!(item.id, "01BYE5RZ");
        assert_eq!(item.item_id.as_deref(), Some("01BYE5RZ"));
        assert_eq!(item.container_id.as_deref(), Some("b!x"));
        assert!(!item.is_folder());
        assert_eq!(item.kind(), "file");
    }

    #[test]
    fn test_item_tolerates_unknown_properties() {
        let item: Item = serde_json::from_value(json!({
            "id": "01BYE5RZ",
            "name": "Documents",
            "folder": { "childCount": 12 },
            "someFutureProperty": { "nested": true }
        }))
        .unwrap();
        assert!(item.is_folder());
        assert_eq!(item.folder.unwrap().child_count, Some(12));
    }

    #[test]
    fn test_user_sort_name_defaults_to_empty() {
        let user: User = serde_json::from_value(json!({ "id": "u1" })).unwrap();
        assert_eq!(user.sort_name(), "");
    }

    #[test]
    fn test_item_list_csv_with_headers() {
        let list = ItemList {
            items: vec![sample_item()],
        };
        let format = OutputFormat::Csv(OutputFormatOptions {
            with_headers: true,
            pretty: false,
        });
        let csv = list.format(&format).unwrap();
        let mut lines = csv.lines();
        assert_eq!(
            lines.next().unwrap(),
            "ITEM_ID,NAME,KIND,SIZE,MODIFIED,CONTAINER_ID"
        );
        assert!(lines.next().unwrap().starts_with("01BYE5RZ,report.pdf,file,4096"));
    }

    #[test]
    fn test_upload_session_deserialization() {
        let session: UploadSession = serde_json::from_value(json!({
            "uploadUrl": "https://upload.example.com/session/abc",
            "expirationDateTime": "2024-11-02T10:00:00Z"
        }))
        .unwrap();
        assert_eq!(session.upload_url, "https://upload.example.com/session/abc");
        assert!(session.expiration_date_time.is_some());
    }
}
