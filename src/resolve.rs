//! Resource reference resolution for the Nimbus CLI client.
//!
//! Callers address containers and items in many shapes: raw identifiers,
//! slash-delimited paths, previously fetched objects, special-folder
//! keywords, or nothing at all (the caller's own default container). This
//! module turns each of those shapes into the single canonical path segment
//! used to build a request URI.
//!
//! Resolution is pure string work and performs no I/O. The one exception in
//! the overall flow — dereferencing a container to confirm it is accessible —
//! is delegated to the request dispatcher by the API client, and its failure
//! is reported as a container-not-found condition rather than a path-syntax
//! error.

use crate::nimbus_v1::ApiError;
use strum::{Display, EnumIter, EnumString};

/// Route addressing the caller's own container.
pub const DEFAULT_CONTAINER_ROUTE: &str = "me/container";

/// Canonical path of a container root.
pub const ROOT_PATH: &str = "root";

/// A reference to a storage container.
///
/// Exactly one variant is active; resolution either yields a canonical
/// relative path or fails with `InvalidReference`.
#[derive(Debug, Clone, PartialEq)]
pub enum ContainerRef {
    /// The caller's own default container.
    Default,
    /// A raw identifier or an explicit container route.
    Reference(String),
    /// A previously fetched object carrying its own identifiers. An item
    /// carries the identifier of its owning container; a container carries
    /// its own.
    Resolved {
        id: Option<String>,
        container_id: Option<String>,
    },
}

impl ContainerRef {
    /// Build a reference from an optional command-line argument, falling
    /// back to a configured default container id and finally to the
    /// caller's own container route.
    pub fn from_parameter(parameter: Option<&String>, configured: Option<&String>) -> ContainerRef {
        match parameter.or(configured) {
            Some(reference) => ContainerRef::Reference(reference.clone()),
            None => ContainerRef::Default,
        }
    }

    /// Resolve the reference to a canonical container path segment.
    ///
    /// The rules are applied in priority order:
    /// 1. an object exposing the owning-container identifier wins,
    /// 2. then an object exposing its own identifier,
    /// 3. then a bare string without a path separator (treated as an id),
    /// 4. otherwise the string already names a container route.
    ///
    /// One leading and one trailing separator are stripped so the result
    /// composes cleanly into a larger URI template.
    pub fn resolve(&self) -> Result<String, ApiError> {
        let path = match self {
            ContainerRef::Default => DEFAULT_CONTAINER_ROUTE.to_string(),
            ContainerRef::Resolved {
                container_id: Some(container_id),
                ..
            } => format!("containers/{}", container_id),
            ContainerRef::Resolved { id: Some(id), .. } => format!("containers/{}", id),
            ContainerRef::Resolved { .. } => {
                return Err(ApiError::InvalidReference(
                    "object reference carries no identifier".to_string(),
                ))
            }
            ContainerRef::Reference(reference) => {
                let trimmed = trim_separators(reference);
                if trimmed.is_empty() {
                    return Err(ApiError::InvalidReference(
                        "empty container reference".to_string(),
                    ));
                }
                if !trimmed.contains('/') {
                    format!("containers/{}", trimmed)
                } else {
                    trimmed.to_string()
                }
            }
        };

        Ok(trim_separators(&path).to_string())
    }
}

/// Named virtual folders recognized by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, EnumIter)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum SpecialFolder {
    Documents,
    Photos,
    CameraRoll,
    AppRoot,
    Music,
    Desktop,
    Downloads,
}

/// A reference to an item (file or folder) within a container.
#[derive(Debug, Clone, PartialEq)]
pub enum ItemRef {
    /// The container root.
    Root,
    /// A raw identifier, an `items/{id}` form, a root marker, or a slash
    /// path relative to the root.
    Reference(String),
    /// A previously fetched item carrying its own identifier.
    Resolved { id: String },
    /// A named virtual folder; bypasses all path parsing.
    Special(SpecialFolder),
}

impl ItemRef {
    /// Build a reference from an optional command-line path argument.
    pub fn from_parameter(parameter: Option<&String>) -> ItemRef {
        match parameter {
            Some(reference) => ItemRef::Reference(reference.clone()),
            None => ItemRef::Root,
        }
    }

    /// Resolve the reference to a canonical item path segment.
    ///
    /// String references are canonicalized in order:
    /// a. an `items/{id}` form passes through unchanged,
    /// b. a bare identifier is prefixed with `items/`,
    /// c. a root marker (`/`, `root:`, `root:/`) canonicalizes to `root`,
    /// d. a `root:`-prefixed path gets its trailing separators and colons
    ///    normalized to a single trailing colon,
    /// e. anything else is a slash path relative to the root and is wrapped
    ///    as `root:/{path}:` after trimming separators.
    pub fn resolve(&self) -> Result<String, ApiError> {
        match self {
            ItemRef::Root => Ok(ROOT_PATH.to_string()),
            ItemRef::Resolved { id } => Ok(format!("items/{}", id)),
            ItemRef::Special(folder) => Ok(format!("special/{}", folder)),
            ItemRef::Reference(reference) => resolve_item_reference(reference),
        }
    }
}

fn resolve_item_reference(reference: &str) -> Result<String, ApiError> {
    if reference.starts_with("items/") {
        return Ok(reference.to_string());
    }

    if !reference.is_empty() && !reference.contains('/') && !reference.contains(':') {
        // A bare identifier; "root" itself is already canonical.
        if reference == ROOT_PATH {
            return Ok(ROOT_PATH.to_string());
        }
        return Ok(format!("items/{}", reference));
    }

    if reference == "/" || reference == "root:" || reference == "root:/" {
        return Ok(ROOT_PATH.to_string());
    }

    if let Some(remainder) = reference.strip_prefix("root:") {
        let body = remainder.trim_matches(|c| c == '/' || c == ':');
        if body.is_empty() {
            return Ok(ROOT_PATH.to_string());
        }
        return Ok(format!("root:/{}:", body));
    }

    let trimmed = trim_separators(reference);
    if trimmed.is_empty() {
        return Ok(ROOT_PATH.to_string());
    }

    Ok(format!("root:/{}:", trimmed))
}

/// Strip one leading and one trailing path separator.
pub(crate) fn trim_separators(path: &str) -> &str {
    let path = path.strip_prefix('/').unwrap_or(path);
    path.strip_suffix('/').unwrap_or(path)
}

/// Append a child name to a canonical item path, yielding the canonical
/// path of the child.
pub fn join_item_path(parent: &str, name: &str) -> String {
    if parent == ROOT_PATH {
        return format!("root:/{}:", name);
    }
    if let Some(body) = parent.strip_suffix(':') {
        return format!("{}/{}:", body, name);
    }
    // An id-addressed or special-folder parent switches to path addressing.
    format!("{}:/{}:", parent, name)
}

/// Split a canonical path-form item path into its parent canonical path and
/// leaf name. Identifier-addressed paths have no derivable parent.
pub fn split_item_path(path: &str) -> Option<(String, String)> {
    let body = path.strip_prefix("root:/")?.strip_suffix(':')?;
    match body.rsplit_once('/') {
        Some((parent, name)) => Some((format!("root:/{}:", parent), name.to_string())),
        None => Some((ROOT_PATH.to_string(), body.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_container_default_resolves_to_me_route() {
        assert_eq!(
            ContainerRef::Default.resolve().unwrap(),
            DEFAULT_CONTAINER_ROUTE
        );
    }

    #[test]
    fn test_container_bare_identifier() {
        let reference = ContainerRef::Reference("b!mF9vQ2".to_string());
        assert_eq!(reference.resolve().unwrap(), "containers/b!mF9vQ2");
    }

    #[test]
    fn test_container_route_passes_through_trimmed() {
        let reference = ContainerRef::Reference("/users/ada@example.com/container/".to_string());
        assert_eq!(
            reference.resolve().unwrap(),
            "users/ada@example.com/container"
        );
    }

    #[test]
    fn test_container_object_prefers_owning_container_id() {
        let reference = ContainerRef::Resolved {
            id: Some("item-1".to_string()),
            container_id: Some("b!owner".to_string()),
        };
        assert_eq!(reference.resolve().unwrap(), "containers/b!owner");
    }

    #[test]
    fn test_container_object_falls_back_to_own_id() {
        let reference = ContainerRef::Resolved {
            id: Some("b!self".to_string()),
            container_id: None,
        };
        assert_eq!(reference.resolve().unwrap(), "containers/b!self");
    }

    #[test]
    fn test_container_object_without_ids_is_invalid() {
        let reference = ContainerRef::Resolved {
            id: None,
            container_id: None,
        };
        assert!(matches!(
            reference.resolve(),
            Err(ApiError::InvalidReference(_))
        ));
    }

    #[test]
    fn test_root_markers_resolve_to_root() {
        for marker in ["/", "root:", "root:/"] {
            let reference = ItemRef::Reference(marker.to_string());
            assert_eq!(reference.resolve().unwrap(), "root", "marker {:?}", marker);
        }
        assert_eq!(ItemRef::Root.resolve().unwrap(), "root");
    }

    #[test]
    fn test_bare_item_identifier() {
        let reference = ItemRef::Reference("01BYE5RZ6QN3ZWBT".to_string());
        assert_eq!(reference.resolve().unwrap(), "items/01BYE5RZ6QN3ZWBT");
    }

    #[test]
    fn test_items_form_passes_through() {
        let reference = ItemRef::Reference("items/01BYE5RZ6QN3ZWBT".to_string());
        assert_eq!(reference.resolve().unwrap(), "items/01BYE5RZ6QN3ZWBT");
    }

    #[test]
    fn test_slash_path_wraps_as_root_path() {
        let reference = ItemRef::Reference("Documents/Project-X".to_string());
        assert_eq!(reference.resolve().unwrap(), "root:/Documents/Project-X:");
    }

    #[test]
    fn test_slash_path_trims_leading_and_trailing_separators() {
        let reference = ItemRef::Reference("/Documents/Reports/".to_string());
        assert_eq!(reference.resolve().unwrap(), "root:/Documents/Reports:");
    }

    #[test]
    fn test_root_prefixed_path_normalizes_trailing_colon() {
        for raw in ["root:/Documents", "root:/Documents/", "root:/Documents:"] {
            let reference = ItemRef::Reference(raw.to_string());
            assert_eq!(
                reference.resolve().unwrap(),
                "root:/Documents:",
                "raw {:?}",
                raw
            );
        }
    }

    #[test]
    fn test_resolution_is_idempotent() {
        let references = [
            ItemRef::Reference("Documents/Project-X".to_string()),
            ItemRef::Reference("/".to_string()),
            ItemRef::Reference("01BYE5RZ".to_string()),
            ItemRef::Special(SpecialFolder::Documents),
        ];
        for reference in references {
            assert_eq!(
                reference.resolve().unwrap(),
                reference.resolve().unwrap(),
                "reference {:?}",
                reference
            );
        }
    }

    #[test]
    fn test_special_folder_bypasses_path_rules() {
        let reference = ItemRef::Special(SpecialFolder::CameraRoll);
        assert_eq!(reference.resolve().unwrap(), "special/cameraroll");
    }

    #[test]
    fn test_special_folder_keyword_parsing() {
        use std::str::FromStr;

        assert_eq!(
            SpecialFolder::from_str("Documents").unwrap(),
            SpecialFolder::Documents
        );
        assert_eq!(
            SpecialFolder::from_str("cameraroll").unwrap(),
            SpecialFolder::CameraRoll
        );
        assert!(SpecialFolder::from_str("attic").is_err());
    }

    #[test]
    fn test_join_item_path() {
        assert_eq!(join_item_path("root", "report.pdf"), "root:/report.pdf:");
        assert_eq!(
            join_item_path("root:/Documents:", "report.pdf"),
            "root:/Documents/report.pdf:"
        );
        assert_eq!(
            join_item_path("items/01BYE5RZ", "report.pdf"),
            "items/01BYE5RZ:/report.pdf:"
        );
    }

    #[test]
    fn test_split_item_path() {
        assert_eq!(
            split_item_path("root:/Documents/report.pdf:"),
            Some(("root:/Documents:".to_string(), "report.pdf".to_string()))
        );
        assert_eq!(
            split_item_path("root:/report.pdf:"),
            Some(("root".to_string(), "report.pdf".to_string()))
        );
        assert_eq!(split_item_path("items/01BYE5RZ"), None);
        assert_eq!(split_item_path("root"), None);
    }
}
