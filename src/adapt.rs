//! Result adaptation for the Nimbus CLI client.
//!
//! Raw property bags coming out of the dispatcher are enriched here before
//! they become typed results: every object gains a caller-facing identifier
//! alias next to the raw `id` field, container-scoped objects gain the
//! owning-container back-reference, and collection results are put into
//! deterministic name-ascending order regardless of how the server chose to
//! return them.

use serde_json::Value;

use crate::model::{Container, Group, Item, NamedResult, User};
use crate::nimbus_v1::ApiError;

fn inject_alias(raw: &mut Value, alias: &str) {
    if let Some(id) = raw.get("id").cloned() {
        if let Some(map) = raw.as_object_mut() {
            map.insert(alias.to_string(), id);
        }
    }
}

fn inject_container_backref(raw: &mut Value, container_id: &str) {
    if let Some(map) = raw.as_object_mut() {
        map.insert(
            "containerId".to_string(),
            Value::String(container_id.to_string()),
        );
    }
}

pub fn adapt_user(mut raw: Value) -> Result<User, ApiError> {
    inject_alias(&mut raw, "userId");
    Ok(serde_json::from_value(raw)?)
}

pub fn adapt_group(mut raw: Value) -> Result<Group, ApiError> {
    inject_alias(&mut raw, "groupId");
    Ok(serde_json::from_value(raw)?)
}

pub fn adapt_container(mut raw: Value) -> Result<Container, ApiError> {
    inject_alias(&mut raw, "containerId");
    Ok(serde_json::from_value(raw)?)
}

/// Adapt an item, attaching the identifier of the container it was fetched
/// from as a weak back-reference.
pub fn adapt_item(mut raw: Value, container_id: &str) -> Result<Item, ApiError> {
    inject_alias(&mut raw, "itemId");
    inject_container_backref(&mut raw, container_id);
    Ok(serde_json::from_value(raw)?)
}

/// Sort a collection by display name, ascending. Applied as the final step
/// of every operation that returns a collection, so callers always observe
/// the same order for the same content.
pub fn sort_collection<T: NamedResult>(results: &mut [T]) {
    results.sort_by(|a, b| a.sort_name().cmp(b.sort_name()));
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_adapt_user_adds_alias() {
        let user = adapt_user(json!({ "id": "u1", "displayName": "Ada" })).unwrap();
        assert_eq!(user.id, "u1");
        assert_eq!(user.user_id.as_deref(), Some("u1"));
    }

    #[test]
    fn test_adapt_item_adds_alias_and_backref() {
        let raw = json!({ "id": "01BYE5RZ", "name": "report.pdf", "size": 10 });
        let item = adapt_item(raw, "b!x").unwrap();
        assert_eq!(item.id, "01BYE5RZ");
        assert_eq!(item.item_id.as_deref(), Some("01BYE5RZ"));
        assert_eq!(item.container_id.as_deref(), Some("b!x"));
    }

    #[test]
    fn test_adapt_item_backref_overrides_stale_value() {
        let raw = json!({ "id": "01BYE5RZ", "containerId": "b!old" });
        let item = adapt_item(raw, "b!new").unwrap();
        assert_eq!(item.container_id.as_deref(), Some("b!new"));
    }

    #[test]
    fn test_sort_collection_is_name_ascending() {
        let mut items: Vec<Item> = ["pear", "apple", "mango"]
            .iter()
            .enumerate()
            .map(|(i, name)| {
                serde_json::from_value(json!({ "id": format!("{}", i), "name": name })).unwrap()
            })
            .collect();

        sort_collection(&mut items);

        let names: Vec<&str> = items.iter().map(|i| i.sort_name()).collect();
        assert_eq!(names, vec!["apple", "mango", "pear"]);
        for pair in names.windows(2) {
            assert!(pair[0] <= pair[1]);
        }
    }

    #[test]
    fn test_adapt_rejects_malformed_payload() {
        // Missing the mandatory raw identifier.
        assert!(adapt_user(json!({ "displayName": "Ada" })).is_err());
    }
}
