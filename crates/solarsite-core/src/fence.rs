//! Code-fence adapter for JSON exchanged with agent runners.
//!
//! Runners frequently wrap JSON in Markdown fences. This is the one place
//! that knowledge lives; everything in-process passes typed values.

use serde::de::DeserializeOwned;
use tracing::{debug, warn};

const JSON_FENCE: &str = "```json";
const FENCE: &str = "```";

/// Strip a surrounding ```` ```json ```` or ```` ``` ```` fence, if the
/// trimmed text both starts and ends with one.
pub fn strip_code_fence(text: &str) -> &str {
    let text = text.trim();
    if text.len() >= JSON_FENCE.len() + FENCE.len()
        && text.starts_with(JSON_FENCE)
        && text.ends_with(FENCE)
    {
        debug!("stripping ```json fence");
        return text[JSON_FENCE.len()..text.len() - FENCE.len()].trim();
    }
    if text.len() >= 2 * FENCE.len() && text.starts_with(FENCE) && text.ends_with(FENCE) {
        debug!("stripping ``` fence");
        return text[FENCE.len()..text.len() - FENCE.len()].trim();
    }
    text
}

/// Strip fences and decode. Decode failures are logged with a short preview.
pub fn parse_fenced<T: DeserializeOwned>(text: &str) -> Result<T, serde_json::Error> {
    let body = strip_code_fence(text);
    serde_json::from_str(body).inspect_err(|e| {
        let preview: String = body.chars().take(100).collect();
        warn!(error = %e, preview = %preview, "failed to decode JSON payload");
    })
}
