//! The seam between agents and the functions they may call.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::RunnerError;

/// A function an agent may invoke. Arguments arrive as a JSON object and
/// the result leaves as text, since that is what crosses the runner
/// boundary.
#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &'static str;

    fn description(&self) -> &'static str;

    async fn invoke(&self, args: &Map<String, Value>) -> Result<String, RunnerError>;
}

/// Tools handed to a runner for one task, in registration order.
#[derive(Clone, Default)]
pub struct Toolbox {
    tools: Vec<Arc<dyn Tool>>,
}

impl Toolbox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, tool: Arc<dyn Tool>) -> Self {
        self.tools.retain(|t| t.name() != tool.name());
        self.tools.push(tool);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn Tool>> {
        self.tools.iter().find(|t| t.name() == name)
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.tools.iter().map(|t| t.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    pub async fn invoke(
        &self,
        name: &str,
        args: &Map<String, Value>,
    ) -> Result<String, RunnerError> {
        let tool = self
            .get(name)
            .ok_or_else(|| RunnerError::UnknownTool(name.to_string()))?;
        tool.invoke(args).await
    }
}

/// Read a required string argument.
pub(crate) fn required_str<'a>(
    tool: &str,
    args: &'a Map<String, Value>,
    key: &str,
) -> Result<&'a str, RunnerError> {
    args.get(key)
        .and_then(Value::as_str)
        .ok_or_else(|| RunnerError::Tool {
            tool: tool.to_string(),
            reason: format!("missing string argument `{key}`"),
        })
}

/// Read an optional string argument; `null` counts as absent.
pub(crate) fn optional_str<'a>(
    tool: &str,
    args: &'a Map<String, Value>,
    key: &str,
) -> Result<Option<&'a str>, RunnerError> {
    match args.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(_) => Err(RunnerError::Tool {
            tool: tool.to_string(),
            reason: format!("argument `{key}` must be a string"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Echo(&'static str);

    #[async_trait]
    impl Tool for Echo {
        fn name(&self) -> &'static str {
            self.0
        }

        fn description(&self) -> &'static str {
            "echoes its arguments"
        }

        async fn invoke(&self, args: &Map<String, Value>) -> Result<String, RunnerError> {
            Ok(Value::Object(args.clone()).to_string())
        }
    }

    #[tokio::test]
    async fn invokes_by_name() {
        let toolbox = Toolbox::new().with(Arc::new(Echo("echo")));
        let mut args = Map::new();
        args.insert("x".into(), 1.into());
        assert_eq!(toolbox.invoke("echo", &args).await.unwrap(), r#"{"x":1}"#);
    }

    #[tokio::test]
    async fn unknown_tool_is_an_error() {
        let toolbox = Toolbox::new();
        let err = toolbox.invoke("nope", &Map::new()).await.unwrap_err();
        assert!(matches!(err, RunnerError::UnknownTool(name) if name == "nope"));
    }

    #[test]
    fn later_registration_replaces_same_name() {
        let toolbox = Toolbox::new()
            .with(Arc::new(Echo("a")))
            .with(Arc::new(Echo("b")))
            .with(Arc::new(Echo("a")));
        assert_eq!(toolbox.names(), vec!["b", "a"]);
        assert_eq!(toolbox.len(), 2);
    }

    #[test]
    fn argument_helpers() {
        let mut args = Map::new();
        args.insert("s".into(), "v".into());
        args.insert("n".into(), Value::Null);
        args.insert("i".into(), 3.into());
        assert_eq!(required_str("t", &args, "s").unwrap(), "v");
        assert!(required_str("t", &args, "missing").is_err());
        assert_eq!(optional_str("t", &args, "n").unwrap(), None);
        assert_eq!(optional_str("t", &args, "missing").unwrap(), None);
        assert!(optional_str("t", &args, "i").is_err());
    }
}
