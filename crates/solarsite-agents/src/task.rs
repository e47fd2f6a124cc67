//! Task definitions and the runner seam.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{RunnerError, Toolbox};

/// Persona a runner adopts for a task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentProfile {
    pub role: String,
    pub goal: String,
    pub backstory: String,
    pub allow_delegation: bool,
}

/// One argument of a planned tool call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolArg {
    Literal(Value),
    /// The text returned by the preceding call in the plan.
    PreviousOutput,
}

/// A tool invocation the task description asks for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    pub tool: String,
    pub args: Vec<(String, ToolArg)>,
}

impl ToolCall {
    pub fn new(tool: impl Into<String>) -> Self {
        Self {
            tool: tool.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.args.push((name.into(), ToolArg::Literal(value.into())));
        self
    }

    pub fn previous_output(mut self, name: impl Into<String>) -> Self {
        self.args.push((name.into(), ToolArg::PreviousOutput));
        self
    }
}

/// A unit of work for a runner.
///
/// `plan` spells out the tool calls the description narrates. Runners that
/// reason over `description` are free to ignore it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub description: String,
    pub expected_output: String,
    pub agent: AgentProfile,
    pub plan: Vec<ToolCall>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskOutput {
    pub result: String,
}

/// What a runner returns: the final answer text and per-task results.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunOutput {
    pub raw: Option<String>,
    pub tasks_output: Vec<TaskOutput>,
}

/// Executes a natural-language task with a set of tools.
#[async_trait]
pub trait TaskRunner: Send + Sync {
    async fn submit(&self, task: &Task, tools: &Toolbox) -> Result<RunOutput, RunnerError>;
}
