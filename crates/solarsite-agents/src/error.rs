use thiserror::Error;

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("unknown tool: {0}")]
    UnknownTool(String),

    #[error("tool `{tool}` failed: {reason}")]
    Tool { tool: String, reason: String },

    #[error("task cannot be executed: {0}")]
    Unsupported(String),

    #[error("runner unavailable: {0}")]
    Unavailable(String),
}
