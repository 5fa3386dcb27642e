//! Command registration and action dispatch

use crate::form::{FormSubmission, PrioritizationForm, FORM_SLOT};
use crate::PluginError;
use std::fmt::Display;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, error, info, warn};
use wsjf_domain::traits::{Action, ToolbarItem, UiHost, UiSlot};
use wsjf_domain::{ItemId, PropertyValue};
use wsjf_sync::{ItemOutcome, MigrationOutcome, SyncConfig, SyncController, TreeOutcome};

/// Slash command that opens the form for the item under the cursor
pub const PRIORITIZE_COMMAND: &str = "WSJF: Prioritize";

/// Slash command that recalculates the open page
pub const CALCULATE_COMMAND: &str = "Calculate WSJF";

/// Context-menu entry that opens the form for the clicked item
pub const PRIORITIZE_MENU_ITEM: &str = "Prioritisation for this block";

/// Context-menu entry that marks the clicked item as migrated
pub const MIGRATE_MENU_ITEM: &str = "Mark as Migrated";

/// Toolbar button key
pub const TOOLBAR_KEY: &str = "wsjf-calculator";

const TOOLBAR_TEMPLATE: &str = "<a class=\"button\" data-on-click=\"calculateWSJF\" \
    title=\"Calculate WSJF for current page\"><i class=\"ti ti-calculator\"></i></a>";

fn host_error<E: Display>(e: E) -> PluginError {
    PluginError::Host(e.to_string())
}

/// What a dispatched action did
#[derive(Debug, Clone, PartialEq)]
pub enum DispatchOutcome {
    /// Form rendered
    FormOpened(PrioritizationForm),
    /// Form inputs written and the item reconciled
    FormApplied(ItemOutcome),
    /// Form dismissed without writes
    FormClosed,
    /// Page recalculation ran
    Recalculated(TreeOutcome),
    /// Migration ran
    Migrated(MigrationOutcome),
    /// Refused with a warning to the user; nothing written
    Refused(PluginError),
    /// Host call failed; reported to the user
    Failed(PluginError),
}

/// The prioritization plugin: entry points wired to the sync controller
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
/// use wsjf_domain::traits::Action;
/// use wsjf_host::MemoryHost;
/// use wsjf_plugin::WsjfPlugin;
/// use wsjf_sync::SyncConfig;
///
/// # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
/// let host = Arc::new(MemoryHost::new());
/// let plugin = WsjfPlugin::new(host, SyncConfig::default());
/// plugin.register().await?;
/// plugin.dispatch(Action::RecalculatePage, None).await;
/// # Ok(())
/// # }
/// ```
pub struct WsjfPlugin<H> {
    controller: Arc<SyncController<H>>,
    open_form: Mutex<Option<ItemId>>,
}

impl<H: UiHost> WsjfPlugin<H> {
    /// Create a plugin over `host`
    pub fn new(host: Arc<H>, config: SyncConfig) -> Self {
        Self::with_controller(Arc::new(SyncController::new(host, config)))
    }

    /// Create a plugin sharing an existing controller
    pub fn with_controller(controller: Arc<SyncController<H>>) -> Self {
        Self {
            controller,
            open_form: Mutex::new(None),
        }
    }

    /// Controller behind the entry points
    pub fn controller(&self) -> &Arc<SyncController<H>> {
        &self.controller
    }

    fn host(&self) -> &H {
        self.controller.host()
    }

    fn config(&self) -> &SyncConfig {
        self.controller.config()
    }

    fn form_target(&self) -> MutexGuard<'_, Option<ItemId>> {
        self.open_form.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Item the open form scores, if a form is open
    pub fn open_form_target(&self) -> Option<ItemId> {
        *self.form_target()
    }

    /// Register slash commands, context-menu entries and the toolbar button
    pub async fn register(&self) -> Result<(), PluginError> {
        let host = self.host();
        host.register_slash_command(PRIORITIZE_COMMAND, Action::OpenForm)
            .await
            .map_err(host_error)?;
        host.register_slash_command(CALCULATE_COMMAND, Action::RecalculatePage)
            .await
            .map_err(host_error)?;
        host.register_context_menu_item(PRIORITIZE_MENU_ITEM, Action::OpenFormFor)
            .await
            .map_err(host_error)?;
        host.register_context_menu_item(MIGRATE_MENU_ITEM, Action::MarkMigrated)
            .await
            .map_err(host_error)?;
        host.register_toolbar_item(ToolbarItem {
            key: TOOLBAR_KEY.to_string(),
            template: TOOLBAR_TEMPLATE.to_string(),
            action: Action::RecalculatePage,
        })
        .await
        .map_err(host_error)?;

        info!("WSJF plugin registered");
        Ok(())
    }

    /// Run an action fired from a registered entry point
    ///
    /// `target` is the clicked item for context-menu actions. Form values
    /// arrive through [`submit`](Self::submit); dispatching
    /// [`Action::SubmitForm`] directly submits an empty form.
    pub async fn dispatch(&self, action: Action, target: Option<ItemId>) -> DispatchOutcome {
        debug!(?action, ?target, "Dispatching action");
        let result = match action {
            Action::OpenForm => self.open_form().await,
            Action::OpenFormFor => match target {
                Some(id) => self.open_form_for(id).await,
                None => Err(PluginError::MissingTarget(action)),
            },
            Action::RecalculatePage => Ok(DispatchOutcome::Recalculated(
                self.controller.reconcile_current_page().await,
            )),
            Action::MarkMigrated => match target {
                Some(id) => Ok(DispatchOutcome::Migrated(self.controller.mark_migrated(id).await)),
                None => Err(PluginError::MissingTarget(action)),
            },
            Action::SubmitForm => self.apply(FormSubmission::default()).await,
            Action::CancelForm => self.cancel().await,
        };
        self.settle(result).await
    }

    /// Apply the open form with the user's selections
    pub async fn submit(&self, submission: FormSubmission) -> DispatchOutcome {
        let result = self.apply(submission).await;
        self.settle(result).await
    }

    async fn settle(&self, result: Result<DispatchOutcome, PluginError>) -> DispatchOutcome {
        match result {
            Ok(outcome) => outcome,
            Err(e) => {
                let (text, level) = e.user_message();
                match e {
                    PluginError::Host(_) => error!("WSJF action failed: {}", e),
                    _ => warn!("WSJF action refused: {}", e),
                }
                if let Err(show) = self.host().show_message(text, level).await {
                    warn!("Failed to show message: {}", show);
                }
                match e {
                    PluginError::Host(_) => DispatchOutcome::Failed(e),
                    _ => DispatchOutcome::Refused(e),
                }
            }
        }
    }

    async fn open_form_for(&self, id: ItemId) -> Result<DispatchOutcome, PluginError> {
        self.host().select_item(id).await.map_err(host_error)?;
        self.open_form().await
    }

    async fn open_form(&self) -> Result<DispatchOutcome, PluginError> {
        let item = self
            .host()
            .current_item()
            .await
            .map_err(host_error)?
            .ok_or(PluginError::NoCurrentItem)?;

        let form = PrioritizationForm::new(item.id, &item.properties, &self.config().scales);
        self.host().render_ui(form.slot()).await.map_err(host_error)?;
        *self.form_target() = Some(item.id);

        debug!(item = %item.id, "Prioritization form opened");
        Ok(DispatchOutcome::FormOpened(form))
    }

    async fn apply(&self, submission: FormSubmission) -> Result<DispatchOutcome, PluginError> {
        let values = submission.validate()?;
        let id = self.open_form_target().ok_or(PluginError::NoOpenForm)?;

        for (factor, value) in values {
            let key = factor.primary_key();
            if self.config().dry_run {
                info!(item = %id, key, value, "DRY RUN: would set property");
                continue;
            }
            self.host()
                .upsert_property(id, key, PropertyValue::Number(f64::from(value)))
                .await
                .map_err(host_error)?;
        }

        self.close().await?;

        let delay = self.config().settle_delay();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        Ok(DispatchOutcome::FormApplied(self.controller.reconcile_item(id).await))
    }

    async fn cancel(&self) -> Result<DispatchOutcome, PluginError> {
        if self.open_form_target().is_none() {
            return Err(PluginError::NoOpenForm);
        }
        self.close().await?;
        Ok(DispatchOutcome::FormClosed)
    }

    async fn close(&self) -> Result<(), PluginError> {
        self.host()
            .render_ui(UiSlot::closed(FORM_SLOT))
            .await
            .map_err(host_error)?;
        *self.form_target() = None;
        Ok(())
    }
}
