//! Tests for the gateway operations over a scripted remote.

mod common;

use std::sync::Arc;

use courier::clock::ManualClock;
use courier::error::CourierError;
use courier::gateway::{Gateway, StartedConversation, UNSPECIFIED};
use courier::remote::RemoteRunStatus;
use courier::run::{RunEngine, RunOutcome};
use courier::session::{InMemorySessionStore, SessionStatus, SessionStore};
use courier::tools::{StaticToolSource, ToolDescriptor, ToolParameters, ToolRegistry, ToolSource};
use pretty_assertions::assert_eq;
use serde_json::json;

use common::{call, text_message, RecordingTool, ScriptedRemote, Step};

struct Harness {
    remote: Arc<ScriptedRemote>,
    sessions: Arc<InMemorySessionStore>,
    gateway: Gateway,
}

fn harness(remote: ScriptedRemote, tools: ToolRegistry) -> Harness {
    let remote = Arc::new(remote);
    let sessions = Arc::new(InMemorySessionStore::new());
    let engine = RunEngine::new(remote.clone(), Arc::new(ManualClock::new()));
    let gateway = Gateway::new(
        remote.clone(),
        sessions.clone(),
        engine,
        Arc::new(tools),
        "asst_test",
    );
    Harness {
        remote,
        sessions,
        gateway,
    }
}

#[tokio::test]
async fn start_conversation_creates_then_reuses() {
    let h = harness(ScriptedRemote::default(), ToolRegistry::new());

    let first = h
        .gateway
        .start_conversation(Some("whatsapp"), Some("ana"))
        .await
        .unwrap();
    assert_eq!(
        first,
        StartedConversation {
            thread_id: "thread_1".into(),
            reused: false,
        }
    );

    let again = h
        .gateway
        .start_conversation(Some("whatsapp"), Some("ana"))
        .await
        .unwrap();
    assert_eq!(again.thread_id, "thread_1");
    assert!(again.reused);
    assert_eq!(h.remote.threads_created(), 1);

    let stored = h.sessions.find("whatsapp", "ana").unwrap().unwrap();
    assert_eq!(stored.status, SessionStatus::Arrived);
}

#[tokio::test]
async fn different_users_get_different_threads() {
    let h = harness(ScriptedRemote::default(), ToolRegistry::new());
    let a = h.gateway.start_conversation(Some("web"), Some("ana")).await.unwrap();
    let b = h.gateway.start_conversation(Some("web"), Some("luis")).await.unwrap();
    assert_ne!(a.thread_id, b.thread_id);
    assert_eq!(h.remote.threads_created(), 2);
}

#[tokio::test]
async fn missing_labels_default_to_not_specified() {
    let h = harness(ScriptedRemote::default(), ToolRegistry::new());
    let started = h.gateway.start_conversation(None, Some("  ")).await.unwrap();

    let stored = h.sessions.find(UNSPECIFIED, UNSPECIFIED).unwrap().unwrap();
    assert_eq!(stored.thread_id, started.thread_id);
    assert_eq!(stored.platform, "Not Specified");
}

#[tokio::test]
async fn send_message_creates_run_and_engages_session() {
    let h = harness(ScriptedRemote::default(), ToolRegistry::new());
    let started = h
        .gateway
        .start_conversation(Some("web"), Some("ana"))
        .await
        .unwrap();

    let run_id = h
        .gateway
        .send_message(&started.thread_id, "What plans do you have?")
        .await
        .unwrap();

    assert_eq!(run_id, "run_1");
    assert_eq!(
        h.remote.created_messages(),
        vec![(started.thread_id.clone(), "What plans do you have?".to_string())]
    );
    assert_eq!(
        h.remote.created_runs(),
        vec![(started.thread_id.clone(), "asst_test".to_string())]
    );
    let stored = h.sessions.find_by_thread(&started.thread_id).unwrap().unwrap();
    assert_eq!(stored.status, SessionStatus::Engaged);
}

#[tokio::test]
async fn send_message_to_unknown_thread_still_starts_a_run() {
    let h = harness(ScriptedRemote::default(), ToolRegistry::new());
    let run_id = h.gateway.send_message("thread_external", "hi").await.unwrap();
    assert_eq!(run_id, "run_1");
    assert!(h.sessions.find_by_thread("thread_external").unwrap().is_none());
}

#[tokio::test]
async fn send_message_requires_thread_id() {
    let h = harness(ScriptedRemote::default(), ToolRegistry::new());
    let err = h.gateway.send_message(" ", "hi").await.unwrap_err();
    assert!(matches!(err, CourierError::MissingIdentifier("thread_id")));
    assert!(err.is_precondition());
    assert!(h.remote.created_messages().is_empty());
}

#[tokio::test]
async fn check_run_uses_startup_registry() {
    let lookup = RecordingTool::new("lookup", json!("ok"));
    let mut tools = ToolRegistry::new();
    tools.register(lookup.clone());

    let remote = ScriptedRemote::new(vec![
        Step::tools(vec![call("call_1", "lookup", "{}")]),
        Step::status(RemoteRunStatus::Completed),
    ])
    .with_messages(vec![text_message("**Done**")]);
    let h = harness(remote, tools);

    let outcome = h.gateway.check_run("thread_1", "run_1").await.unwrap();
    assert_eq!(outcome, RunOutcome::completed("Done"));
    assert_eq!(lookup.calls().len(), 1);
    assert_eq!(h.remote.submissions().len(), 1);
}

#[tokio::test]
async fn check_run_requires_run_id() {
    let h = harness(ScriptedRemote::default(), ToolRegistry::new());
    let err = h.gateway.check_run("thread_1", "").await.unwrap_err();
    assert!(matches!(err, CourierError::MissingIdentifier("run_id")));
    assert_eq!(h.remote.polls(), 0);
}

#[tokio::test]
async fn tool_descriptors_come_from_the_registry() {
    let source = StaticToolSource::new("lookup")
        .with_descriptor(ToolDescriptor::function(
            "lookup",
            "Look something up",
            ToolParameters::object().build(),
        ))
        .with_tool(RecordingTool::new("lookup", json!("ok")));
    let sources: Vec<Box<dyn ToolSource>> = vec![Box::new(source)];
    let tools = ToolRegistry::discover(&sources).unwrap();
    let h = harness(ScriptedRemote::default(), tools);
    let names: Vec<&str> = h.gateway.tool_descriptors().iter().map(|d| d.name()).collect();
    assert_eq!(names, vec!["lookup"]);
}
