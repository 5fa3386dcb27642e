//! JSON outline snapshots

use serde::{Deserialize, Serialize};
use wsjf_domain::{Item, ItemId, Page};

/// One page with its top-level items
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageTree {
    /// Page identity
    pub page: Page,
    /// Top-level items in document order
    #[serde(default)]
    pub items: Vec<Item>,
}

/// Serializable state of a [`MemoryHost`](crate::MemoryHost)
///
/// ```json
/// {
///   "current_page": "backlog",
///   "pages": [
///     {
///       "page": { "name": "backlog", "original_name": "Backlog" },
///       "items": [
///         {
///           "id": "01890f6e-6d2c-7cc1-b2a4-5c1c1b0f0a11",
///           "content": "TODO ship it",
///           "properties": { ".bv": 8, ".tc": 5, ".rr": 3, ".js": 2 }
///         }
///       ]
///     }
///   ]
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Pages in insertion order
    #[serde(default)]
    pub pages: Vec<PageTree>,

    /// Normalized name of the open page
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_page: Option<String>,

    /// Item under the cursor
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_item: Option<ItemId>,
}

/// Depth-first search for `id`
pub(crate) fn find<'a>(items: &'a [Item], id: ItemId) -> Option<&'a Item> {
    for item in items {
        if item.id == id {
            return Some(item);
        }
        if let Some(found) = find(&item.children, id) {
            return Some(found);
        }
    }
    None
}

pub(crate) fn find_mut<'a>(items: &'a mut [Item], id: ItemId) -> Option<&'a mut Item> {
    for item in items {
        if item.id == id {
            return Some(item);
        }
        if let Some(found) = find_mut(&mut item.children, id) {
            return Some(found);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use wsjf_domain::{Factor, PropertyValue};

    #[test]
    fn test_find_nested() {
        let grandchild = Item::new("leaf");
        let id = grandchild.id;
        let items = vec![
            Item::new("a"),
            Item::new("b").with_child(Item::new("c").with_child(grandchild)),
        ];

        assert_eq!(find(&items, id).map(|i| i.content.as_str()), Some("leaf"));
        assert!(find(&items, ItemId::new()).is_none());
    }

    #[test]
    fn test_snapshot_from_natural_json() {
        let json = r#"{
            "current_page": "backlog",
            "pages": [{
                "page": { "name": "backlog", "original_name": "Backlog" },
                "items": [{
                    "id": "01890f6e-6d2c-7cc1-b2a4-5c1c1b0f0a11",
                    "content": "TODO ship it",
                    "properties": { ".bv": 8, ".tc": "5", ".rr": null, "archived": false }
                }]
            }]
        }"#;

        let snapshot: Snapshot = serde_json::from_str(json).unwrap();
        assert_eq!(snapshot.current_page.as_deref(), Some("backlog"));
        let item = &snapshot.pages[0].items[0];
        assert_eq!(item.property(".bv").and_then(|v| v.as_number()), Some(8.0));
        assert_eq!(item.property(".tc").and_then(|v| v.as_number()), Some(5.0));
        assert_eq!(item.property("archived").and_then(|v| v.as_number()), None);
        assert_eq!(item.property(".rr"), Some(&PropertyValue::Null));
        assert_eq!(Factor::RiskReduction.resolve(&item.properties), None);
    }
}
