//! Dispatcher tests against the recording mock runner

use std::sync::Arc;
use std::time::Duration;

use obsidian_core::{Dispatcher, MockRunner, ParamBag, RunOptions, SchemaCatalog, ToolError};
use serde_json::json;

fn dispatcher_with(runner: &Arc<MockRunner>, defaults: RunOptions) -> Dispatcher {
    Dispatcher::new(SchemaCatalog::builtin(), runner.clone(), defaults)
}

fn dispatcher(runner: &Arc<MockRunner>) -> Dispatcher {
    dispatcher_with(runner, RunOptions::default())
}

fn bag(value: serde_json::Value) -> ParamBag {
    ParamBag::from_json(&value)
}

#[tokio::test]
async fn test_create_note_forces_silent() {
    let runner = Arc::new(MockRunner::new());
    runner.push_ok("ok\n");

    let result = dispatcher(&runner)
        .invoke("create_note", &bag(json!({ "name": "Session 1" })))
        .await
        .unwrap();

    assert_eq!(result, "ok");
    assert_eq!(runner.calls(), vec![vec!["create", "name=Session 1", "silent"]]);
}

#[tokio::test]
async fn test_create_note_keeps_parameter_order() {
    let runner = Arc::new(MockRunner::new());

    dispatcher(&runner)
        .invoke(
            "create_note",
            &bag(json!({
                "overwrite": true,
                "content": "# Hello",
                "name": "Greeting"
            })),
        )
        .await
        .unwrap();

    assert_eq!(
        runner.calls()[0],
        vec!["create", "name=Greeting", "content=# Hello", "overwrite", "silent"]
    );
}

#[tokio::test]
async fn test_search_defaults_to_json_format() {
    let runner = Arc::new(MockRunner::new());

    dispatcher(&runner)
        .invoke("search_vault", &bag(json!({ "query": "TODO" })))
        .await
        .unwrap();

    let args = &runner.calls()[0];
    assert_eq!(args[0], "search");
    assert!(args.contains(&"query=TODO".to_string()));
    assert!(args.contains(&"format=json".to_string()));
}

#[tokio::test]
async fn test_search_respects_explicit_format() {
    let runner = Arc::new(MockRunner::new());

    dispatcher(&runner)
        .invoke("search_vault", &bag(json!({ "query": "TODO", "format": "text", "limit": 5 })))
        .await
        .unwrap();

    assert_eq!(
        runner.calls()[0],
        vec!["search", "query=TODO", "limit=5", "format=text"]
    );
}

#[tokio::test]
async fn test_list_tags_always_requests_all_counts() {
    let runner = Arc::new(MockRunner::new());

    dispatcher(&runner)
        .invoke("list_tags", &bag(json!({ "sort": "name" })))
        .await
        .unwrap();

    assert_eq!(runner.calls()[0], vec!["tags", "all", "counts", "sort=name"]);
}

#[tokio::test]
async fn test_list_properties_with_and_without_file() {
    let runner = Arc::new(MockRunner::new());
    let dispatcher = dispatcher(&runner);

    dispatcher.invoke("list_properties", &ParamBag::new()).await.unwrap();
    dispatcher
        .invoke("list_properties", &bag(json!({ "file": "Recipe" })))
        .await
        .unwrap();

    let calls = runner.calls();
    assert_eq!(calls[0], vec!["properties", "all", "counts"]);
    assert_eq!(calls[1], vec!["properties", "file=Recipe"]);
}

#[tokio::test]
async fn test_list_tasks_status_and_verbose() {
    let runner = Arc::new(MockRunner::new());
    let dispatcher = dispatcher(&runner);

    dispatcher
        .invoke("list_tasks", &bag(json!({ "file": "Inbox", "status": "todo" })))
        .await
        .unwrap();
    dispatcher
        .invoke("list_tasks", &bag(json!({ "status": "all" })))
        .await
        .unwrap();

    let calls = runner.calls();
    assert_eq!(calls[0], vec!["tasks", "file=Inbox", "todo", "verbose"]);
    assert_eq!(calls[1], vec!["tasks", "verbose"]);
}

#[tokio::test]
async fn test_set_property_maps_all_fields() {
    let runner = Arc::new(MockRunner::new());

    dispatcher(&runner)
        .invoke(
            "set_property",
            &bag(json!({ "name": "priority", "value": "5", "type": "number", "file": "Plan" })),
        )
        .await
        .unwrap();

    assert_eq!(
        runner.calls()[0],
        vec!["property:set", "name=priority", "value=5", "type=number", "file=Plan"]
    );
}

#[tokio::test]
async fn test_delete_false_flag_is_omitted() {
    let runner = Arc::new(MockRunner::new());

    dispatcher(&runner)
        .invoke("delete_note", &bag(json!({ "file": "Old", "permanent": false })))
        .await
        .unwrap();

    assert_eq!(runner.calls()[0], vec!["delete", "file=Old"]);
}

#[tokio::test]
async fn test_add_task_builds_checklist_line() {
    let runner = Arc::new(MockRunner::new());

    dispatcher(&runner)
        .invoke("add_task", &bag(json!({ "file": "Inbox", "text": "Call Sam" })))
        .await
        .unwrap();

    assert_eq!(runner.calls()[0], vec!["append", "file=Inbox", "content=- [ ] Call Sam"]);
}

// ═══════════════════════════════════════════════════════════════════════════
// Vault targeting
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_default_vault_is_appended_last() {
    let runner = Arc::new(MockRunner::new());
    let defaults = RunOptions::default().with_vault(Some("Work".to_string()));

    dispatcher_with(&runner, defaults)
        .invoke("read_note", &bag(json!({ "file": "Standup" })))
        .await
        .unwrap();

    assert_eq!(runner.calls()[0], vec!["read", "file=Standup", "vault=Work"]);
}

#[tokio::test]
async fn test_per_call_vault_overrides_default() {
    let runner = Arc::new(MockRunner::new());
    let defaults = RunOptions::default().with_vault(Some("Work".to_string()));

    dispatcher_with(&runner, defaults)
        .invoke("read_note", &bag(json!({ "vault": "Personal", "file": "Diary" })))
        .await
        .unwrap();

    assert_eq!(runner.calls()[0], vec!["read", "file=Diary", "vault=Personal"]);
}

#[tokio::test]
async fn test_no_vault_means_no_vault_token() {
    let runner = Arc::new(MockRunner::new());

    dispatcher(&runner)
        .invoke("list_orphans", &ParamBag::new())
        .await
        .unwrap();

    assert_eq!(runner.calls()[0], vec!["orphans"]);
}

// ═══════════════════════════════════════════════════════════════════════════
// Failures
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_validation_failures_spawn_nothing() {
    let runner = Arc::new(MockRunner::new());
    let dispatcher = dispatcher(&runner);

    let cases = vec![
        ("no_such_tool", json!({})),
        ("create_note", json!({})),
        ("create_note", json!({ "name": "  " })),
        ("create_note", json!({ "name": "A", "overwrite": "yes" })),
        ("set_property", json!({ "name": "priority", "value": "5", "type": "integer" })),
    ];

    for (tool, args) in cases {
        let err = dispatcher.invoke(tool, &bag(args)).await.unwrap_err();
        assert!(err.is_validation(), "{tool}: {err}");
    }

    assert_eq!(runner.call_count(), 0);
}

#[tokio::test]
async fn test_invalid_enum_scenario() {
    let runner = Arc::new(MockRunner::new());

    let err = dispatcher(&runner)
        .invoke(
            "set_property",
            &bag(json!({ "name": "priority", "value": "5", "type": "integer" })),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, ToolError::InvalidEnum { ref value, .. } if value == "integer"));
}

#[tokio::test]
async fn test_cli_diagnostics_pass_through() {
    let runner = Arc::new(MockRunner::new());
    runner.push_exit(1, "some stdout", "Vault \"Nope\" not found\n");

    let err = dispatcher(&runner)
        .invoke("read_note", &bag(json!({ "file": "X", "vault": "Nope" })))
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "Vault \"Nope\" not found");
    assert_eq!(err.exit_code(), Some(1));
}

#[tokio::test]
async fn test_timeout_passes_through() {
    let runner = Arc::new(MockRunner::new());
    runner.push_timeout();
    let defaults = RunOptions::default().with_timeout(Duration::from_millis(1500));

    let err = dispatcher_with(&runner, defaults)
        .invoke("list_tags", &ParamBag::new())
        .await
        .unwrap_err();

    match err {
        ToolError::Timeout { timeout_ms, command } => {
            assert_eq!(timeout_ms, 1500);
            assert_eq!(command, "obsidian tags all counts");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Compound operations
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_complete_task_reads_then_overwrites() {
    let runner = Arc::new(MockRunner::new());
    runner.push_ok("- [ ] Fix bug\n- [ ] Write docs\n");
    runner.push_ok("");

    let result = dispatcher(&runner)
        .invoke("complete_task", &bag(json!({ "path": "Inbox.md", "match": "Fix bug" })))
        .await
        .unwrap();

    assert!(result.contains("Fix bug"));

    let calls = runner.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0], vec!["read", "path=Inbox.md"]);

    let write = &calls[1];
    assert_eq!(write[0], "create");
    assert_eq!(write[1], "path=Inbox.md");
    assert!(write[2].starts_with("content=- [x] Fix bug @done ("));
    assert!(write[2].ends_with(")\n- [ ] Write docs"));
    assert_eq!(&write[3..], ["overwrite", "silent"]);
}

#[tokio::test]
async fn test_complete_task_not_found_skips_write() {
    let runner = Arc::new(MockRunner::new());
    runner.push_ok("- [ ] Fix bug\n- [ ] Write docs\n");

    let err = dispatcher(&runner)
        .invoke("complete_task", &bag(json!({ "path": "Inbox.md", "match": "nonexistent" })))
        .await
        .unwrap_err();

    assert!(matches!(err, ToolError::NotFound { .. }));
    assert_eq!(runner.call_count(), 1);
}

#[tokio::test]
async fn test_complete_task_read_failure_is_process_error() {
    let runner = Arc::new(MockRunner::new());
    runner.push_exit(1, "", "File not found");

    let err = dispatcher(&runner)
        .invoke("complete_task", &bag(json!({ "path": "Missing.md", "match": "x" })))
        .await
        .unwrap_err();

    assert!(matches!(err, ToolError::NonZeroExit { .. }));
    assert_eq!(runner.call_count(), 1);
}

#[tokio::test]
async fn test_complete_project_task_targets_project_file() {
    let runner = Arc::new(MockRunner::new());
    runner.push_ok("- [ ] Draft plan");
    runner.push_ok("");

    dispatcher(&runner)
        .invoke(
            "complete_project_task",
            &bag(json!({ "name": "Apollo", "match": "Draft", "vault": "Work" })),
        )
        .await
        .unwrap();

    let calls = runner.calls();
    assert_eq!(calls[0], vec!["read", "path=Projects/Apollo/Tasks.md", "vault=Work"]);
    assert_eq!(calls[1].last().map(String::as_str), Some("vault=Work"));
}

#[tokio::test]
async fn test_list_projects_groups_folders() {
    let runner = Arc::new(MockRunner::new());
    runner.push_ok(
        "Projects/Apollo/README.md\nProjects/Apollo/Tasks.md\nProjects/Beacon/README.md\nProjects/notes.md\n",
    );

    let result = dispatcher(&runner)
        .invoke("list_projects", &ParamBag::new())
        .await
        .unwrap();

    assert_eq!(result, "Apollo\nBeacon");
    assert_eq!(runner.calls()[0], vec!["files", "folder=Projects"]);
}

#[tokio::test]
async fn test_create_project_issues_two_creates() {
    let runner = Arc::new(MockRunner::new());

    let result = dispatcher(&runner)
        .invoke(
            "create_project",
            &bag(json!({ "name": "Apollo", "description": "Moon landing", "status": "paused" })),
        )
        .await
        .unwrap();

    assert!(result.contains("Apollo"));

    let calls = runner.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0][1], "path=Projects/Apollo/README.md");
    assert!(calls[0][2].starts_with("content=---\nstatus: paused\n"));
    assert!(calls[0][2].contains("Moon landing"));
    assert_eq!(calls[0][3], "silent");
    assert_eq!(
        calls[1],
        vec!["create", "path=Projects/Apollo/Tasks.md", "content=", "silent"]
    );
}

#[tokio::test]
async fn test_create_project_second_step_failure_is_partial() {
    let runner = Arc::new(MockRunner::new());
    runner.push_ok("");
    runner.push_exit(1, "", "File already exists");

    let err = dispatcher(&runner)
        .invoke("create_project", &bag(json!({ "name": "Apollo" })))
        .await
        .unwrap_err();

    match err {
        ToolError::PartialFailure { completed, source } => {
            assert_eq!(completed, "Created Projects/Apollo/README.md");
            assert_eq!(source.to_string(), "File already exists");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(runner.call_count(), 2);
}

#[tokio::test]
async fn test_create_project_first_step_failure_stops() {
    let runner = Arc::new(MockRunner::new());
    runner.push_exit(1, "", "File already exists");

    let err = dispatcher(&runner)
        .invoke("create_project", &bag(json!({ "name": "Apollo" })))
        .await
        .unwrap_err();

    assert!(matches!(err, ToolError::NonZeroExit { .. }));
    assert_eq!(runner.call_count(), 1);
}

#[tokio::test]
async fn test_project_names_are_trimmed_everywhere() {
    let runner = Arc::new(MockRunner::new());
    let dispatcher = dispatcher(&runner);

    dispatcher
        .invoke("create_project", &bag(json!({ "name": "Apollo " })))
        .await
        .unwrap();
    dispatcher
        .invoke("get_project", &bag(json!({ "name": "Apollo " })))
        .await
        .unwrap();
    dispatcher
        .invoke("list_project_tasks", &bag(json!({ "name": " Apollo" })))
        .await
        .unwrap();
    dispatcher
        .invoke("add_project_task", &bag(json!({ "name": "Apollo ", "text": "Launch" })))
        .await
        .unwrap();
    runner.push_ok("- [ ] Launch");
    dispatcher
        .invoke("complete_project_task", &bag(json!({ "name": "Apollo ", "match": "Launch" })))
        .await
        .unwrap();

    let calls = runner.calls();
    assert_eq!(calls[0][1], "path=Projects/Apollo/README.md");
    assert_eq!(calls[1][1], "path=Projects/Apollo/Tasks.md");
    assert_eq!(calls[2], vec!["read", "path=Projects/Apollo/README.md"]);
    assert_eq!(calls[3], vec!["tasks", "path=Projects/Apollo/Tasks.md", "verbose"]);
    assert_eq!(
        calls[4],
        vec!["append", "path=Projects/Apollo/Tasks.md", "content=- [ ] Launch"]
    );
    assert_eq!(calls[5], vec!["read", "path=Projects/Apollo/Tasks.md"]);
    assert_eq!(calls[6][1], "path=Projects/Apollo/Tasks.md");
}
