//! Integration tests for the interaction surface

use std::sync::Arc;
use wsjf_domain::traits::{Action, MessageLevel};
use wsjf_domain::{keys, Factor, Item, Score};
use wsjf_host::MemoryHost;
use wsjf_plugin::form::FORM_SLOT;
use wsjf_plugin::{
    DispatchOutcome, FormSubmission, PluginError, WsjfPlugin, CALCULATE_COMMAND,
    MIGRATE_MENU_ITEM, PRIORITIZE_COMMAND, PRIORITIZE_MENU_ITEM, TOOLBAR_KEY,
};
use wsjf_sync::{ItemOutcome, MigrationOutcome, SyncConfig, TreeOutcome};

fn setup(items: Vec<Item>) -> (Arc<MemoryHost>, WsjfPlugin<MemoryHost>) {
    let host = Arc::new(MemoryHost::new());
    host.add_page("Backlog", items);
    let plugin = WsjfPlugin::new(Arc::clone(&host), SyncConfig::immediate());
    (host, plugin)
}

#[tokio::test]
async fn test_register_entry_points() {
    let (host, plugin) = setup(vec![]);

    plugin.register().await.unwrap();

    assert_eq!(
        host.slash_commands(),
        vec![
            (PRIORITIZE_COMMAND.to_string(), Action::OpenForm),
            (CALCULATE_COMMAND.to_string(), Action::RecalculatePage),
        ]
    );
    assert_eq!(
        host.context_menu_items(),
        vec![
            (PRIORITIZE_MENU_ITEM.to_string(), Action::OpenFormFor),
            (MIGRATE_MENU_ITEM.to_string(), Action::MarkMigrated),
        ]
    );
    let toolbar = host.toolbar_items();
    assert_eq!(toolbar.len(), 1);
    assert_eq!(toolbar[0].key, TOOLBAR_KEY);
    assert_eq!(toolbar[0].action, Action::RecalculatePage);
}

#[tokio::test]
async fn test_open_form_without_cursor_warns() {
    let (host, plugin) = setup(vec![Item::new("task")]);

    let outcome = plugin.dispatch(Action::OpenForm, None).await;

    assert_eq!(outcome, DispatchOutcome::Refused(PluginError::NoCurrentItem));
    assert_eq!(
        host.last_message().map(|m| (m.text, m.level)),
        Some((
            "Please place cursor in a block first".to_string(),
            MessageLevel::Warning
        ))
    );
    assert!(host.renders().is_empty());
}

#[tokio::test]
async fn test_open_form_preselects_existing_values() {
    let item = Item::new("task").with_property(".bv", 13.0).with_property("js", "3");
    let id = item.id;
    let (host, plugin) = setup(vec![item]);
    host.set_current_item(Some(id));

    let DispatchOutcome::FormOpened(form) = plugin.dispatch(Action::OpenForm, None).await else {
        panic!("form should open");
    };

    assert_eq!(form.item, id);
    assert_eq!(form.selected(Factor::BusinessValue), Some(13));
    assert_eq!(form.selected(Factor::JobSize), Some(3));
    assert_eq!(form.selected(Factor::TimeCriticality), None);

    let slot = host.last_render(FORM_SLOT).unwrap();
    assert!(slot.template.contains("<option value=\"13\" selected>"));
    assert_eq!(plugin.open_form_target(), Some(id));
}

#[tokio::test]
async fn test_context_menu_form_selects_item() {
    let item = Item::new("task");
    let id = item.id;
    let (host, plugin) = setup(vec![item]);

    let outcome = plugin.dispatch(Action::OpenFormFor, Some(id)).await;

    assert!(matches!(outcome, DispatchOutcome::FormOpened(ref f) if f.item == id));
    assert_eq!(host.snapshot().current_item, Some(id));
}

#[tokio::test]
async fn test_item_actions_require_target() {
    let (host, plugin) = setup(vec![]);

    assert_eq!(
        plugin.dispatch(Action::MarkMigrated, None).await,
        DispatchOutcome::Refused(PluginError::MissingTarget(Action::MarkMigrated))
    );
    assert_eq!(host.last_message().map(|m| m.level), Some(MessageLevel::Warning));
}

#[tokio::test]
async fn test_submit_writes_inputs_and_reconciles() {
    let item = Item::new("task").with_property("wsjf", 2.0);
    let id = item.id;
    let (host, plugin) = setup(vec![item]);
    host.set_current_item(Some(id));
    plugin.dispatch(Action::OpenForm, None).await;

    let outcome = plugin.submit(FormSubmission::new(8, 5, 3, 2)).await;

    assert_eq!(
        outcome,
        DispatchOutcome::FormApplied(ItemOutcome::Scored {
            score: Score::from_value(8.0),
            writes: 3
        })
    );
    let stored = host.item(id).unwrap();
    for (key, value) in [(".bv", 8.0), (".tc", 5.0), (".rr", 3.0), (".js", 2.0)] {
        assert_eq!(stored.property(key).and_then(|v| v.as_number()), Some(value));
    }
    assert_eq!(stored.property(keys::SCORE).and_then(|v| v.as_number()), Some(8.0));
    assert!(stored.property(keys::LEGACY_SCORE).is_none());
    assert!(host.last_render(FORM_SLOT).unwrap().is_closed());
    assert_eq!(plugin.open_form_target(), None);
}

#[tokio::test]
async fn test_incomplete_submission_writes_nothing() {
    let item = Item::new("task");
    let id = item.id;
    let (host, plugin) = setup(vec![item]);
    host.set_current_item(Some(id));
    plugin.dispatch(Action::OpenForm, None).await;

    let outcome = plugin.submit(FormSubmission::from_raw(["8", "", "3", "2"])).await;

    assert_eq!(outcome, DispatchOutcome::Refused(PluginError::IncompleteForm));
    assert!(host.journal().is_empty());
    assert_eq!(
        host.last_message().map(|m| (m.text, m.level)),
        Some(("Please fill all fields".to_string(), MessageLevel::Warning))
    );
    // Form stays open for correction
    assert_eq!(plugin.open_form_target(), Some(id));
    assert!(!host.last_render(FORM_SLOT).unwrap().is_closed());
}

#[tokio::test]
async fn test_submit_action_without_values_is_incomplete() {
    let item = Item::new("task");
    let id = item.id;
    let (host, plugin) = setup(vec![item]);
    host.set_current_item(Some(id));
    plugin.dispatch(Action::OpenForm, None).await;

    assert_eq!(
        plugin.dispatch(Action::SubmitForm, None).await,
        DispatchOutcome::Refused(PluginError::IncompleteForm)
    );
    assert!(host.journal().is_empty());
}

#[tokio::test]
async fn test_submit_without_open_form() {
    let (host, plugin) = setup(vec![]);

    assert_eq!(
        plugin.submit(FormSubmission::new(1, 1, 1, 1)).await,
        DispatchOutcome::Refused(PluginError::NoOpenForm)
    );
    assert!(host.journal().is_empty());
}

#[tokio::test]
async fn test_cancel_closes_without_writes() {
    let item = Item::new("task");
    let id = item.id;
    let (host, plugin) = setup(vec![item]);
    host.set_current_item(Some(id));
    plugin.dispatch(Action::OpenForm, None).await;

    assert_eq!(plugin.dispatch(Action::CancelForm, None).await, DispatchOutcome::FormClosed);
    assert!(host.last_render(FORM_SLOT).unwrap().is_closed());
    assert!(host.journal().is_empty());
    assert_eq!(plugin.open_form_target(), None);
}

#[tokio::test]
async fn test_host_failure_during_apply_is_reported() {
    let item = Item::new("task");
    let id = item.id;
    let (host, plugin) = setup(vec![item]);
    host.set_current_item(Some(id));
    plugin.dispatch(Action::OpenForm, None).await;
    host.fail_writes_after(2);

    let outcome = plugin.submit(FormSubmission::new(8, 5, 3, 2)).await;

    assert!(matches!(outcome, DispatchOutcome::Failed(PluginError::Host(_))));
    assert_eq!(host.journal().len(), 2);
    assert_eq!(host.last_message().map(|m| m.level), Some(MessageLevel::Error));
}

#[tokio::test]
async fn test_recalculate_and_migrate_dispatch() {
    let task = Item::new("TODO ship")
        .with_property(".bv", 21.0)
        .with_property(".tc", 21.0)
        .with_property(".rr", 21.0)
        .with_property(".js", 1.0);
    let id = task.id;
    let (host, plugin) = setup(vec![task]);

    let outcome = plugin.dispatch(Action::RecalculatePage, None).await;
    assert!(matches!(
        outcome,
        DispatchOutcome::Recalculated(TreeOutcome::Completed(ref r)) if r.updated == 1
    ));

    let outcome = plugin.dispatch(Action::MarkMigrated, Some(id)).await;
    assert!(matches!(
        outcome,
        DispatchOutcome::Migrated(MigrationOutcome::Migrated { remaining: 2, .. })
    ));
    assert_eq!(host.item(id).unwrap().content, "TODO ➡️ ship");
}

#[tokio::test]
async fn test_recalculate_without_page() {
    let (host, plugin) = setup(vec![]);
    host.set_current_page(None);

    assert_eq!(
        plugin.dispatch(Action::RecalculatePage, None).await,
        DispatchOutcome::Recalculated(TreeOutcome::NoPage)
    );
    assert_eq!(
        host.last_message().map(|m| m.text),
        Some("No page is currently open".to_string())
    );
}
