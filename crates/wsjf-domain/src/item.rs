//! Item module - outline nodes owned by the host document store

use crate::DomainError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Unique identifier for an outline item
///
/// Hosts address blocks by UUID. New identifiers are UUIDv7 so that items
/// created by test harnesses sort chronologically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(uuid::Uuid);

impl ItemId {
    /// Generate a new UUIDv7-based ItemId
    ///
    /// # Examples
    ///
    /// ```
    /// use wsjf_domain::ItemId;
    ///
    /// let a = ItemId::new();
    /// let b = ItemId::new();
    /// assert_ne!(a, b);
    /// ```
    pub fn new() -> Self {
        Self(uuid::Uuid::now_v7())
    }

    /// Parse an ItemId from its hyphenated string form
    pub fn parse(s: &str) -> Result<Self, DomainError> {
        uuid::Uuid::parse_str(s.trim())
            .map(Self)
            .map_err(|e| DomainError::InvalidItemId(format!("{s}: {e}")))
    }
}

impl Default for ItemId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ItemId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// A scalar property value as stored by the host
///
/// Hosts hand back whatever the user typed, so the same logical value may be
/// a number in one item and text in another.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    /// Explicit null; reads as absent
    Null,
    /// Boolean flag
    Bool(bool),
    /// Numeric value
    Number(f64),
    /// Free text
    Text(String),
}

impl PropertyValue {
    /// Numeric view of the value, if it has one
    ///
    /// Numbers must be finite. Text is trimmed and its leading numeric prefix
    /// is parsed, so `"8 - High impact"` yields `8.0`. Booleans and empty or
    /// non-numeric text have no numeric view, and neither does null.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            PropertyValue::Number(n) if n.is_finite() => Some(*n),
            PropertyValue::Null | PropertyValue::Number(_) | PropertyValue::Bool(_) => None,
            PropertyValue::Text(s) => parse_leading_number(s),
        }
    }

    /// True for null or empty text, which hosts use for "cleared"
    pub fn is_blank(&self) -> bool {
        match self {
            PropertyValue::Null => true,
            PropertyValue::Text(s) => s.is_empty(),
            _ => false,
        }
    }
}

impl From<f64> for PropertyValue {
    fn from(value: f64) -> Self {
        PropertyValue::Number(value)
    }
}

impl From<i64> for PropertyValue {
    fn from(value: i64) -> Self {
        PropertyValue::Number(value as f64)
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        PropertyValue::Text(value.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        PropertyValue::Text(value)
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValue::Null => Ok(()),
            PropertyValue::Bool(b) => write!(f, "{b}"),
            PropertyValue::Number(n) => write!(f, "{n}"),
            PropertyValue::Text(s) => f.write_str(s),
        }
    }
}

/// Parse the longest numeric prefix of `s` after leading whitespace
fn parse_leading_number(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end += 1;
    }
    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;
    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        if digits > 0 {
            end = frac_end;
        }
    }
    if digits == 0 {
        return None;
    }
    // Exponent only counts when at least one digit follows it
    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+') | Some(b'-')) {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    s[..end].parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Property mapping of an item, ordered by key
pub type Properties = BTreeMap<String, PropertyValue>;

/// An outline item (block) in the host document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    /// Unique identifier
    pub id: ItemId,

    /// Free-text content
    #[serde(default)]
    pub content: String,

    /// Key/value metadata
    #[serde(default, skip_serializing_if = "Properties::is_empty")]
    pub properties: Properties,

    /// Nested child items, in document order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Item>,
}

impl Item {
    /// Create an item with content and no properties
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            id: ItemId::new(),
            content: content.into(),
            properties: Properties::new(),
            children: Vec::new(),
        }
    }

    /// Builder-style property setter
    pub fn with_property(
        mut self,
        key: impl Into<String>,
        value: impl Into<PropertyValue>,
    ) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// Builder-style child append
    pub fn with_child(mut self, child: Item) -> Self {
        self.children.push(child);
        self
    }

    /// Whether the item carries any properties at all
    pub fn has_properties(&self) -> bool {
        !self.properties.is_empty()
    }

    /// Look up a property by exact (case-sensitive) key
    pub fn property(&self, key: &str) -> Option<&PropertyValue> {
        self.properties.get(key)
    }

    /// Copy of this item without its children
    pub fn shallow(&self) -> Self {
        Self {
            id: self.id,
            content: self.content.clone(),
            properties: self.properties.clone(),
            children: Vec::new(),
        }
    }
}

/// A page in the host document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    /// Normalized (lowercase) page name
    #[serde(default)]
    pub name: String,

    /// Name as the user wrote it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_name: Option<String>,
}

impl Page {
    /// Create a page whose normalized name is the lowercase of `name`
    pub fn new(name: impl Into<String>) -> Self {
        let original: String = name.into();
        Self {
            name: original.to_lowercase(),
            original_name: Some(original),
        }
    }

    /// Name used to address the page tree, preferring the original spelling
    ///
    /// Returns `None` when the host handed back a page with no usable name.
    pub fn display_name(&self) -> Option<&str> {
        self.original_name
            .as_deref()
            .filter(|n| !n.is_empty())
            .or_else(|| Some(self.name.as_str()).filter(|n| !n.is_empty()))
    }
}
