//! Agent-facing layer: tools, task definitions, the runner seam, and
//! feasibility report assembly.
//!
//! Natural-language task execution is delegated to a [`TaskRunner`]. This
//! crate defines what each agent may call and how its answer is read back;
//! [`ScriptedRunner`] executes a task's tool plan directly.

pub mod agents;
pub mod answer;
pub mod assessment;
mod error;
pub mod scripted;
pub mod task;
pub mod tool;
pub mod tools;

pub use answer::{AgentAnswer, parse_run_output};
pub use assessment::{AssessmentRequest, Assessor, FeasibilityReport};
pub use error::RunnerError;
pub use scripted::ScriptedRunner;
pub use task::{AgentProfile, RunOutput, Task, TaskOutput, TaskRunner, ToolArg, ToolCall};
pub use tool::{Tool, Toolbox};
