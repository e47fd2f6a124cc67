//! A runner that executes a task's tool plan verbatim.

use async_trait::async_trait;
use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::{RunOutput, RunnerError, Task, TaskOutput, TaskRunner, ToolArg, Toolbox};

/// Executes [`Task::plan`] in order against the toolbox, piping each call's
/// output to the next where the plan asks for it. The last call's output is
/// the answer.
#[derive(Debug, Default, Clone, Copy)]
pub struct ScriptedRunner;

impl ScriptedRunner {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl TaskRunner for ScriptedRunner {
    async fn submit(&self, task: &Task, tools: &Toolbox) -> Result<RunOutput, RunnerError> {
        if task.plan.is_empty() {
            return Err(RunnerError::Unsupported(format!(
                "task for `{}` has no tool plan",
                task.agent.role
            )));
        }

        info!(role = %task.agent.role, steps = task.plan.len(), "running scripted task");
        let mut previous: Option<String> = None;

        for call in &task.plan {
            let mut args = Map::new();
            for (name, arg) in &call.args {
                let value = match arg {
                    ToolArg::Literal(v) => v.clone(),
                    ToolArg::PreviousOutput => {
                        let prev = previous.clone().ok_or_else(|| {
                            RunnerError::Unsupported(format!(
                                "`{}` wants the previous output but is the first call",
                                call.tool
                            ))
                        })?;
                        Value::String(prev)
                    }
                };
                args.insert(name.clone(), value);
            }

            debug!(tool = %call.tool, "invoking tool");
            previous = Some(tools.invoke(&call.tool, &args).await?);
        }

        let result = previous.unwrap_or_default();
        Ok(RunOutput {
            raw: Some(result.clone()),
            tasks_output: vec![TaskOutput { result }],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::{permitting_task, permitting_toolbox, research_task, research_toolbox};
    use crate::tools::SiteImpactResearchTool;
    use crate::{AgentProfile, ToolCall, parse_run_output};
    use solarsite_core::Settings;

    fn bare_task(plan: Vec<ToolCall>) -> Task {
        Task {
            description: String::new(),
            expected_output: String::new(),
            agent: AgentProfile {
                role: "tester".into(),
                goal: String::new(),
                backstory: String::new(),
                allow_delegation: false,
            },
            plan,
        }
    }

    #[tokio::test]
    async fn permitting_plan_produces_package() {
        let settings = Settings::builder().build().unwrap();
        let task = permitting_task("123 Main St, Los Angeles, CA", "7kW", "24");
        let out = ScriptedRunner
            .submit(&task, &permitting_toolbox(&settings))
            .await
            .unwrap();
        let answer = parse_run_output(&out);
        let v = answer.as_structured().unwrap();
        assert_eq!(v["permit_form"]["jurisdiction"], "City of Los Angeles");
        assert_eq!(v["permit_form"]["fees"], 500);
        assert_eq!(v["permit_form"]["panel_count"], "24");
        assert_eq!(v["jurisdiction_contact"], "ladbs.lacity.org");
    }

    #[tokio::test]
    async fn research_plan_without_token_yields_error_text() {
        let task = research_task("California");
        let out = ScriptedRunner
            .submit(&task, &research_toolbox(SiteImpactResearchTool::unconfigured()))
            .await
            .unwrap();
        assert_eq!(
            out.raw.as_deref(),
            Some("Error: NEWS_API_TOKEN environment variable not set")
        );
    }

    #[tokio::test]
    async fn empty_plan_is_unsupported() {
        let err = ScriptedRunner
            .submit(&bare_task(vec![]), &Toolbox::new())
            .await
            .unwrap_err();
        assert!(matches!(err, RunnerError::Unsupported(_)));
    }

    #[tokio::test]
    async fn previous_output_on_first_call_is_unsupported() {
        let task = bare_task(vec![
            ToolCall::new("classify_jurisdiction_tool").previous_output("address"),
        ]);
        let settings = Settings::builder().build().unwrap();
        let err = ScriptedRunner
            .submit(&task, &permitting_toolbox(&settings))
            .await
            .unwrap_err();
        assert!(matches!(err, RunnerError::Unsupported(_)));
    }

    #[tokio::test]
    async fn unknown_tool_surfaces() {
        let task = bare_task(vec![ToolCall::new("weather_tool")]);
        let err = ScriptedRunner
            .submit(&task, &Toolbox::new())
            .await
            .unwrap_err();
        assert!(matches!(err, RunnerError::UnknownTool(_)));
    }
}
