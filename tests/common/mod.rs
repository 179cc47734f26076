//! Shared test helpers and a scripted remote execution service.
#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use courier::clock::ManualClock;
use courier::error::CourierError;
use courier::remote::{
    MessageContent, RemoteExecutionService, RemoteRunStatus, RunSnapshot, ThreadMessage,
    ToolCallRequest, ToolOutput,
};
use courier::tools::{FnTool, Tool, ToolArguments};

/// One scripted answer to `retrieve_run`.
pub enum Step {
    Snapshot(RunSnapshot),
    Error,
}

impl Step {
    pub fn status(status: RemoteRunStatus) -> Self {
        Self::Snapshot(RunSnapshot::new(status))
    }

    pub fn tools(calls: Vec<ToolCallRequest>) -> Self {
        Self::Snapshot(RunSnapshot::requires_tools(calls))
    }
}

pub fn call(id: &str, name: &str, args: &str) -> ToolCallRequest {
    ToolCallRequest {
        call_id: id.to_string(),
        function_name: name.to_string(),
        raw_arguments: args.to_string(),
    }
}

pub fn text_message(text: &str) -> ThreadMessage {
    ThreadMessage {
        id: "msg_reply".to_string(),
        role: "assistant".to_string(),
        content: vec![MessageContent::Text(text.to_string())],
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub thread_id: String,
    pub run_id: String,
    pub output: ToolOutput,
}

/// Remote service that replays a fixed script of run statuses. Once the
/// script runs out every poll reports `in_progress`.
#[derive(Default)]
pub struct ScriptedRemote {
    script: Mutex<VecDeque<Step>>,
    messages: Mutex<Vec<ThreadMessage>>,
    submissions: Mutex<Vec<Submission>>,
    created_messages: Mutex<Vec<(String, String)>>,
    created_runs: Mutex<Vec<(String, String)>>,
    polls: Mutex<u32>,
    threads_created: Mutex<u32>,
    fail_submissions: Mutex<bool>,
    latency: Option<(Arc<ManualClock>, Duration)>,
}

impl ScriptedRemote {
    pub fn new(steps: Vec<Step>) -> Self {
        Self {
            script: Mutex::new(steps.into()),
            ..Default::default()
        }
    }

    /// Each status query costs `latency` of virtual time on `clock`.
    pub fn with_latency(mut self, clock: Arc<ManualClock>, latency: Duration) -> Self {
        self.latency = Some((clock, latency));
        self
    }

    pub fn with_messages(self, messages: Vec<ThreadMessage>) -> Self {
        *self.messages.lock().unwrap() = messages;
        self
    }

    pub fn failing_submissions(self) -> Self {
        *self.fail_submissions.lock().unwrap() = true;
        self
    }

    pub fn polls(&self) -> u32 {
        *self.polls.lock().unwrap()
    }

    pub fn submissions(&self) -> Vec<Submission> {
        self.submissions.lock().unwrap().clone()
    }

    pub fn created_messages(&self) -> Vec<(String, String)> {
        self.created_messages.lock().unwrap().clone()
    }

    pub fn created_runs(&self) -> Vec<(String, String)> {
        self.created_runs.lock().unwrap().clone()
    }

    pub fn threads_created(&self) -> u32 {
        *self.threads_created.lock().unwrap()
    }
}

#[async_trait]
impl RemoteExecutionService for ScriptedRemote {
    async fn retrieve_run(&self, _thread_id: &str, _run_id: &str) -> Result<RunSnapshot, CourierError> {
        *self.polls.lock().unwrap() += 1;
        if let Some((clock, latency)) = &self.latency {
            clock.advance(*latency);
        }
        match self.script.lock().unwrap().pop_front() {
            Some(Step::Snapshot(snapshot)) => Ok(snapshot),
            Some(Step::Error) => Err(CourierError::api(503, "service unavailable")),
            None => Ok(RunSnapshot::new(RemoteRunStatus::InProgress)),
        }
    }

    async fn list_messages(&self, _thread_id: &str) -> Result<Vec<ThreadMessage>, CourierError> {
        Ok(self.messages.lock().unwrap().clone())
    }

    async fn submit_tool_outputs(
        &self,
        thread_id: &str,
        run_id: &str,
        outputs: &[ToolOutput],
    ) -> Result<(), CourierError> {
        if *self.fail_submissions.lock().unwrap() {
            return Err(CourierError::api(400, "run is not waiting for outputs"));
        }
        let mut submissions = self.submissions.lock().unwrap();
        for output in outputs {
            submissions.push(Submission {
                thread_id: thread_id.to_string(),
                run_id: run_id.to_string(),
                output: output.clone(),
            });
        }
        Ok(())
    }

    async fn create_thread(&self) -> Result<String, CourierError> {
        let mut count = self.threads_created.lock().unwrap();
        *count += 1;
        Ok(format!("thread_{count}"))
    }

    async fn create_message(&self, thread_id: &str, content: &str) -> Result<String, CourierError> {
        let mut created = self.created_messages.lock().unwrap();
        created.push((thread_id.to_string(), content.to_string()));
        Ok(format!("msg_{}", created.len()))
    }

    async fn create_run(&self, thread_id: &str, assistant_id: &str) -> Result<String, CourierError> {
        let mut runs = self.created_runs.lock().unwrap();
        runs.push((thread_id.to_string(), assistant_id.to_string()));
        Ok(format!("run_{}", runs.len()))
    }
}

/// Tool that records the arguments of every invocation.
pub struct RecordingTool {
    name: String,
    reply: serde_json::Value,
    pub calls: Mutex<Vec<serde_json::Value>>,
}

impl RecordingTool {
    pub fn new(name: &str, reply: serde_json::Value) -> Arc<Self> {
        Arc::new(Self {
            name: name.to_string(),
            reply,
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> Vec<serde_json::Value> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Tool for RecordingTool {
    fn name(&self) -> &str {
        &self.name
    }

    async fn invoke(&self, args: &ToolArguments) -> Result<serde_json::Value, CourierError> {
        self.calls.lock().unwrap().push(args.raw().clone());
        Ok(self.reply.clone())
    }
}

pub fn failing_tool(name: &str) -> Arc<dyn Tool> {
    let tool_name = name.to_string();
    Arc::new(FnTool::new(name, move |_args| {
        let tool_name = tool_name.clone();
        async move { Err(CourierError::tool(tool_name, "downstream exploded")) }
    }))
}
