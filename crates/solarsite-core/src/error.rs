use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid setting `{field}`: {reason}")]
    InvalidSetting { field: &'static str, reason: String },

    #[error("invalid or unparseable jurisdiction data: {0}")]
    JurisdictionData(String),

    #[error("invalid system details: {0}")]
    SystemDetails(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
