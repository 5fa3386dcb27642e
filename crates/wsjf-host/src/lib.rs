//! WSJF In-Memory Host
//!
//! Implements the `DocumentHost` and `UiHost` traits over an in-memory outline.
//!
//! # Architecture
//!
//! - Pages hold trees of items, addressed by UUID
//! - Every mutation is appended to a journal so callers can assert on exactly
//!   which writes happened
//! - Messages, UI renders and registrations are recorded, not displayed
//! - Failures can be injected to exercise best-effort error paths
//! - State loads from and saves to a JSON snapshot
//!
//! # Examples
//!
//! ```
//! use wsjf_domain::Item;
//! use wsjf_host::MemoryHost;
//!
//! let host = MemoryHost::new();
//! let item = Item::new("TODO write report").with_property(".bv", 8.0);
//! let id = item.id;
//! host.add_page("Backlog", vec![item]);
//!
//! assert!(host.item(id).is_some());
//! ```

#![warn(missing_docs)]

mod snapshot;

pub use snapshot::{PageTree, Snapshot};

use async_trait::async_trait;
use snapshot::{find, find_mut};
use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};
use thiserror::Error;
use tokio::sync::mpsc::UnboundedSender;
use wsjf_domain::traits::{
    Action, ChangeEvent, DocumentHost, MessageLevel, ToolbarItem, UiHost, UiSlot,
};
use wsjf_domain::{Item, ItemId, Page, PropertyValue};

/// Errors that can occur during host operations
#[derive(Error, Debug)]
pub enum HostError {
    /// Item not found
    #[error("Item not found: {0}")]
    ItemNotFound(ItemId),

    /// Failure injected by a test
    #[error("Injected failure: {0}")]
    Injected(&'static str),

    /// I/O error reading or writing a snapshot
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed snapshot
    #[error("Snapshot error: {0}")]
    Snapshot(#[from] serde_json::Error),
}

/// A mutation applied through the document API
#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    /// Property set
    Upsert {
        /// Target item
        id: ItemId,
        /// Property key
        key: String,
        /// New value
        value: PropertyValue,
    },
    /// Property removed
    Remove {
        /// Target item
        id: ItemId,
        /// Property key
        key: String,
    },
    /// Content replaced
    Content {
        /// Target item
        id: ItemId,
        /// New content
        content: String,
    },
}

impl Mutation {
    /// Item the mutation targeted
    pub fn id(&self) -> ItemId {
        match self {
            Mutation::Upsert { id, .. }
            | Mutation::Remove { id, .. }
            | Mutation::Content { id, .. } => *id,
        }
    }

    /// Property key, for property mutations
    pub fn key(&self) -> Option<&str> {
        match self {
            Mutation::Upsert { key, .. } | Mutation::Remove { key, .. } => Some(key.as_str()),
            Mutation::Content { .. } => None,
        }
    }
}

/// A transient message shown to the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// Text
    pub text: String,
    /// Severity
    pub level: MessageLevel,
}

#[derive(Debug, Default)]
struct Failures {
    writes_remaining: Option<usize>,
    reads: bool,
    messages: bool,
}

#[derive(Debug, Default)]
struct State {
    snapshot: Snapshot,
    journal: Vec<Mutation>,
    messages: Vec<Message>,
    renders: Vec<UiSlot>,
    slash_commands: Vec<(String, Action)>,
    context_menu: Vec<(String, Action)>,
    toolbar: Vec<ToolbarItem>,
    listeners: Vec<UnboundedSender<ChangeEvent>>,
    failures: Failures,
}

impl State {
    fn item(&self, id: ItemId) -> Option<&Item> {
        self.snapshot.pages.iter().find_map(|tree| find(&tree.items, id))
    }

    fn item_mut(&mut self, id: ItemId) -> Option<&mut Item> {
        self.snapshot
            .pages
            .iter_mut()
            .find_map(|tree| find_mut(&mut tree.items, id))
    }

    fn page(&self, name: &str) -> Option<&PageTree> {
        let normalized = name.to_lowercase();
        self.snapshot.pages.iter().find(|tree| tree.page.name == normalized)
    }

    fn check_read(&self) -> Result<(), HostError> {
        if self.failures.reads {
            return Err(HostError::Injected("read"));
        }
        Ok(())
    }

    fn check_write(&mut self) -> Result<(), HostError> {
        match self.failures.writes_remaining.as_mut() {
            Some(0) => Err(HostError::Injected("write")),
            Some(n) => {
                *n -= 1;
                Ok(())
            }
            None => Ok(()),
        }
    }
}

/// In-memory implementation of the host document and UI surfaces
///
/// Interior mutability lets the controller share the host through an `Arc`
/// while tests inspect it. Locks are never held across an await point.
#[derive(Debug, Default)]
pub struct MemoryHost {
    state: Mutex<State>,
}

impl MemoryHost {
    /// Create an empty host with no pages
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a host from a snapshot
    pub fn from_snapshot(snapshot: Snapshot) -> Self {
        Self {
            state: Mutex::new(State {
                snapshot,
                ..State::default()
            }),
        }
    }

    /// Parse a snapshot from JSON text
    pub fn from_json(json: &str) -> Result<Self, HostError> {
        Ok(Self::from_snapshot(serde_json::from_str(json)?))
    }

    /// Load a snapshot from a JSON file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, HostError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// Current state as a snapshot
    pub fn snapshot(&self) -> Snapshot {
        self.lock().snapshot.clone()
    }

    /// Current state as pretty-printed JSON
    pub fn to_json(&self) -> Result<String, HostError> {
        Ok(serde_json::to_string_pretty(&self.lock().snapshot)?)
    }

    /// Write the current state to a JSON file
    pub fn save_json_file<P: AsRef<Path>>(&self, path: P) -> Result<(), HostError> {
        let json = self.to_json()?;
        std::fs::write(path, json)?;
        Ok(())
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Add a page with top-level items; it becomes the current page
    pub fn add_page(&self, name: &str, items: Vec<Item>) -> Page {
        let page = Page::new(name);
        let mut state = self.lock();
        state.snapshot.current_page = Some(page.name.clone());
        state.snapshot.pages.push(PageTree {
            page: page.clone(),
            items,
        });
        page
    }

    /// Add a page record whose name fields are set verbatim
    pub fn add_raw_page(&self, page: Page, items: Vec<Item>) {
        let mut state = self.lock();
        state.snapshot.current_page = Some(page.name.clone());
        state.snapshot.pages.push(PageTree { page, items });
    }

    /// Open a page by name, or close every page with `None`
    pub fn set_current_page(&self, name: Option<&str>) {
        self.lock().snapshot.current_page = name.map(str::to_lowercase);
    }

    /// Place the cursor in an item, or nowhere with `None`
    pub fn set_current_item(&self, id: Option<ItemId>) {
        self.lock().snapshot.current_item = id;
    }

    /// Item with its subtree
    pub fn item(&self, id: ItemId) -> Option<Item> {
        self.lock().item(id).cloned()
    }

    /// Mutations applied so far, oldest first
    pub fn journal(&self) -> Vec<Mutation> {
        self.lock().journal.clone()
    }

    /// Mutations that targeted `key`
    pub fn writes_to(&self, key: &str) -> Vec<Mutation> {
        self.lock()
            .journal
            .iter()
            .filter(|m| m.key() == Some(key))
            .cloned()
            .collect()
    }

    /// Forget recorded mutations
    pub fn clear_journal(&self) {
        self.lock().journal.clear();
    }

    /// Messages shown so far, oldest first
    pub fn messages(&self) -> Vec<Message> {
        self.lock().messages.clone()
    }

    /// Most recent message
    pub fn last_message(&self) -> Option<Message> {
        self.lock().messages.last().cloned()
    }

    /// UI renders so far, oldest first
    pub fn renders(&self) -> Vec<UiSlot> {
        self.lock().renders.clone()
    }

    /// Most recent render into `key`
    pub fn last_render(&self, key: &str) -> Option<UiSlot> {
        self.lock().renders.iter().rev().find(|s| s.key == key).cloned()
    }

    /// Registered slash commands
    pub fn slash_commands(&self) -> Vec<(String, Action)> {
        self.lock().slash_commands.clone()
    }

    /// Registered context-menu entries
    pub fn context_menu_items(&self) -> Vec<(String, Action)> {
        self.lock().context_menu.clone()
    }

    /// Registered toolbar buttons
    pub fn toolbar_items(&self) -> Vec<ToolbarItem> {
        self.lock().toolbar.clone()
    }

    /// Send a change event for `ids` to every registered listener
    ///
    /// Returns the number of listeners reached. Closed listeners are dropped.
    pub fn emit_change(&self, ids: &[ItemId]) -> usize {
        let mut state = self.lock();
        let items: Vec<Item> = ids
            .iter()
            .filter_map(|id| state.item(*id).map(Item::shallow))
            .collect();
        let event = ChangeEvent { items };
        state.listeners.retain(|tx| tx.send(event.clone()).is_ok());
        state.listeners.len()
    }

    /// Drop every change listener, closing their channels
    pub fn close_listeners(&self) {
        self.lock().listeners.clear();
    }

    /// Let `n` more mutations succeed, then fail every one after
    pub fn fail_writes_after(&self, n: usize) {
        self.lock().failures.writes_remaining = Some(n);
    }

    /// Fail every item and page read
    pub fn fail_reads(&self) {
        self.lock().failures.reads = true;
    }

    /// Fail every attempt to show a message
    pub fn fail_messages(&self) {
        self.lock().failures.messages = true;
    }

    /// Remove all injected failures
    pub fn clear_failures(&self) {
        self.lock().failures = Failures::default();
    }
}

#[async_trait]
impl DocumentHost for MemoryHost {
    type Error = HostError;

    async fn get_item(
        &self,
        id: ItemId,
        include_children: bool,
    ) -> Result<Option<Item>, Self::Error> {
        let state = self.lock();
        state.check_read()?;
        Ok(state.item(id).map(|item| {
            if include_children {
                item.clone()
            } else {
                item.shallow()
            }
        }))
    }

    async fn current_item(&self) -> Result<Option<Item>, Self::Error> {
        let state = self.lock();
        state.check_read()?;
        Ok(state
            .snapshot
            .current_item
            .and_then(|id| state.item(id))
            .map(Item::shallow))
    }

    async fn current_page(&self) -> Result<Option<Page>, Self::Error> {
        let state = self.lock();
        state.check_read()?;
        let Some(name) = state.snapshot.current_page.as_deref() else {
            return Ok(None);
        };
        Ok(state
            .snapshot
            .pages
            .iter()
            .find(|tree| tree.page.name == name)
            .map(|tree| tree.page.clone()))
    }

    async fn page_item_tree(&self, page_name: &str) -> Result<Option<Vec<Item>>, Self::Error> {
        let state = self.lock();
        state.check_read()?;
        Ok(state.page(page_name).map(|tree| tree.items.clone()))
    }

    async fn upsert_property(
        &self,
        id: ItemId,
        key: &str,
        value: PropertyValue,
    ) -> Result<(), Self::Error> {
        let mut state = self.lock();
        state.check_write()?;
        let item = state.item_mut(id).ok_or(HostError::ItemNotFound(id))?;
        item.properties.insert(key.to_string(), value.clone());
        tracing::trace!(item = %id, key, "upsert property");
        state.journal.push(Mutation::Upsert {
            id,
            key: key.to_string(),
            value,
        });
        Ok(())
    }

    async fn remove_property(&self, id: ItemId, key: &str) -> Result<(), Self::Error> {
        let mut state = self.lock();
        state.check_write()?;
        let item = state.item_mut(id).ok_or(HostError::ItemNotFound(id))?;
        item.properties.remove(key);
        tracing::trace!(item = %id, key, "remove property");
        state.journal.push(Mutation::Remove {
            id,
            key: key.to_string(),
        });
        Ok(())
    }

    async fn update_content(&self, id: ItemId, content: &str) -> Result<(), Self::Error> {
        let mut state = self.lock();
        state.check_write()?;
        let item = state.item_mut(id).ok_or(HostError::ItemNotFound(id))?;
        item.content = content.to_string();
        state.journal.push(Mutation::Content {
            id,
            content: content.to_string(),
        });
        Ok(())
    }

    async fn show_message(&self, text: &str, level: MessageLevel) -> Result<(), Self::Error> {
        let mut state = self.lock();
        if state.failures.messages {
            return Err(HostError::Injected("message"));
        }
        tracing::debug!(%level, "{}", text);
        state.messages.push(Message {
            text: text.to_string(),
            level,
        });
        Ok(())
    }
}

#[async_trait]
impl UiHost for MemoryHost {
    async fn select_item(&self, id: ItemId) -> Result<(), Self::Error> {
        let mut state = self.lock();
        if state.item(id).is_none() {
            return Err(HostError::ItemNotFound(id));
        }
        state.snapshot.current_item = Some(id);
        Ok(())
    }

    async fn render_ui(&self, slot: UiSlot) -> Result<(), Self::Error> {
        self.lock().renders.push(slot);
        Ok(())
    }

    async fn register_slash_command(&self, label: &str, action: Action) -> Result<(), Self::Error> {
        self.lock().slash_commands.push((label.to_string(), action));
        Ok(())
    }

    async fn register_context_menu_item(
        &self,
        label: &str,
        action: Action,
    ) -> Result<(), Self::Error> {
        self.lock().context_menu.push((label.to_string(), action));
        Ok(())
    }

    async fn register_toolbar_item(&self, item: ToolbarItem) -> Result<(), Self::Error> {
        self.lock().toolbar.push(item);
        Ok(())
    }

    async fn register_change_listener(
        &self,
        sender: UnboundedSender<ChangeEvent>,
    ) -> Result<(), Self::Error> {
        self.lock().listeners.push(sender);
        Ok(())
    }
}
