//! Trait definitions for host interactions
//!
//! The host document application owns every item and all UI chrome. These
//! traits are the only way the rest of the workspace reads or changes
//! anything. There is no multi-property transaction: each upsert or removal
//! is its own round trip.

use crate::{Item, ItemId, Page, PropertyValue};
use async_trait::async_trait;
use std::fmt;
use tokio::sync::mpsc::UnboundedSender;

/// Severity of a transient user-visible message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageLevel {
    /// Operation succeeded
    Success,
    /// Informational
    Info,
    /// Operation refused or incomplete input
    Warning,
    /// Operation failed
    Error,
}

impl MessageLevel {
    /// Level name as hosts spell it
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageLevel::Success => "success",
            MessageLevel::Info => "info",
            MessageLevel::Warning => "warning",
            MessageLevel::Error => "error",
        }
    }
}

impl fmt::Display for MessageLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Document read/mutate surface used by the sync controller
#[async_trait]
pub trait DocumentHost: Send + Sync {
    /// Error type for host operations
    type Error: fmt::Display + Send + Sync;

    /// Read an item, optionally with its subtree
    async fn get_item(
        &self,
        id: ItemId,
        include_children: bool,
    ) -> Result<Option<Item>, Self::Error>;

    /// Item under the editing cursor
    async fn current_item(&self) -> Result<Option<Item>, Self::Error>;

    /// Page currently open
    async fn current_page(&self) -> Result<Option<Page>, Self::Error>;

    /// Top-level items of a page with their subtrees; `None` if no such page
    async fn page_item_tree(&self, page_name: &str) -> Result<Option<Vec<Item>>, Self::Error>;

    /// Set a single property
    async fn upsert_property(
        &self,
        id: ItemId,
        key: &str,
        value: PropertyValue,
    ) -> Result<(), Self::Error>;

    /// Remove a single property; removing an absent key is not an error
    async fn remove_property(&self, id: ItemId, key: &str) -> Result<(), Self::Error>;

    /// Replace an item's text content
    async fn update_content(&self, id: ItemId, content: &str) -> Result<(), Self::Error>;

    /// Show a transient message to the user
    async fn show_message(&self, text: &str, level: MessageLevel) -> Result<(), Self::Error>;
}

/// Something the user can trigger from a registered entry point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Open the prioritization form for the item under the cursor
    OpenForm,
    /// Recalculate scores across the open page
    RecalculatePage,
    /// Open the prioritization form for a specific item
    OpenFormFor,
    /// Add a migration marker to an item
    MarkMigrated,
    /// Apply the open form
    SubmitForm,
    /// Dismiss the open form
    CancelForm,
}

/// A floating UI fragment rendered by the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiSlot {
    /// Slot key; rendering an empty template into a key closes it
    pub key: String,
    /// HTML template
    pub template: String,
    /// Inline style pairs applied to the container
    pub style: Vec<(String, String)>,
}

impl UiSlot {
    /// Empty template for `key`, which dismisses the slot
    pub fn closed(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            template: String::new(),
            style: Vec::new(),
        }
    }

    /// Whether this slot dismisses rather than renders
    pub fn is_closed(&self) -> bool {
        self.template.is_empty()
    }
}

/// A toolbar button
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolbarItem {
    /// Unique key
    pub key: String,
    /// Button markup
    pub template: String,
    /// Action fired on click
    pub action: Action,
}

/// Items the host reports as changed
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ChangeEvent {
    /// Changed items (without children)
    pub items: Vec<Item>,
}

/// UI and registration surface used by the interaction layer
#[async_trait]
pub trait UiHost: DocumentHost {
    /// Make `id` the current item
    async fn select_item(&self, id: ItemId) -> Result<(), Self::Error>;

    /// Render (or, with an empty template, dismiss) a floating UI fragment
    async fn render_ui(&self, slot: UiSlot) -> Result<(), Self::Error>;

    /// Register a slash command
    async fn register_slash_command(&self, label: &str, action: Action) -> Result<(), Self::Error>;

    /// Register an item context-menu entry
    async fn register_context_menu_item(
        &self,
        label: &str,
        action: Action,
    ) -> Result<(), Self::Error>;

    /// Register a toolbar button
    async fn register_toolbar_item(&self, item: ToolbarItem) -> Result<(), Self::Error>;

    /// Subscribe to item change notifications
    async fn register_change_listener(
        &self,
        sender: UnboundedSender<ChangeEvent>,
    ) -> Result<(), Self::Error>;
}
