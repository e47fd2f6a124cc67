//! The tools exposed to the permitting and research agents.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value};
use solarsite_core::permit::generate_permit_package_from_text;
use solarsite_core::{Settings, classify};
use solarsite_news::{ArticleSource, NewsClient, NewsError, site_impact_research};
use tracing::{info, warn};

use crate::tool::{Tool, optional_str, required_str};
use crate::RunnerError;

pub const CLASSIFY_JURISDICTION: &str = "classify_jurisdiction_tool";
pub const GENERATE_PERMIT_FORM: &str = "generate_permit_form_tool";
pub const SITE_IMPACT_RESEARCH: &str = "site_impact_research_tool";

const INVALID_JURISDICTION_DATA: &str =
    "Error: Invalid or unparseable jurisdiction data provided to generate_permit_form_tool.";

fn encode<T: serde::Serialize>(tool: &str, value: &T) -> Result<String, RunnerError> {
    serde_json::to_string(value).map_err(|e| RunnerError::Tool {
        tool: tool.to_string(),
        reason: e.to_string(),
    })
}

/// Classifies an address into a jurisdiction and returns its rules.
pub struct ClassifyJurisdictionTool;

#[async_trait]
impl Tool for ClassifyJurisdictionTool {
    fn name(&self) -> &'static str {
        CLASSIFY_JURISDICTION
    }

    fn description(&self) -> &'static str {
        "Classifies the jurisdiction based on address and returns permitting rules as a JSON string."
    }

    async fn invoke(&self, args: &Map<String, Value>) -> Result<String, RunnerError> {
        let address = required_str(CLASSIFY_JURISDICTION, args, "address")?;
        let classification = classify(address);
        info!(
            jurisdiction = %classification.classified_jurisdiction,
            "classified address"
        );
        encode(CLASSIFY_JURISDICTION, &classification)
    }
}

/// Fills a permit form from classifier output and system details.
pub struct GeneratePermitFormTool {
    submission_date: String,
}

impl GeneratePermitFormTool {
    pub fn new(submission_date: impl Into<String>) -> Self {
        Self {
            submission_date: submission_date.into(),
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.assessment_date_string())
    }
}

#[async_trait]
impl Tool for GeneratePermitFormTool {
    fn name(&self) -> &'static str {
        GENERATE_PERMIT_FORM
    }

    fn description(&self) -> &'static str {
        "Generates a filled permit form based on jurisdiction rules and system details."
    }

    async fn invoke(&self, args: &Map<String, Value>) -> Result<String, RunnerError> {
        let address = required_str(GENERATE_PERMIT_FORM, args, "address")?;
        let jurisdiction_data =
            optional_str(GENERATE_PERMIT_FORM, args, "jurisdiction_data")?.unwrap_or_default();
        let system_details =
            optional_str(GENERATE_PERMIT_FORM, args, "system_details")?.unwrap_or_default();

        match generate_permit_package_from_text(
            address,
            jurisdiction_data,
            system_details,
            &self.submission_date,
        ) {
            Ok(package) => encode(GENERATE_PERMIT_FORM, &package),
            Err(e) => {
                warn!(error = %e, "rejecting jurisdiction data");
                Ok(INVALID_JURISDICTION_DATA.to_string())
            }
        }
    }
}

/// Researches news coverage that could affect solar development.
pub struct SiteImpactResearchTool {
    source: Option<Arc<dyn ArticleSource>>,
}

impl SiteImpactResearchTool {
    pub fn new(source: Arc<dyn ArticleSource>) -> Self {
        Self {
            source: Some(source),
        }
    }

    /// A tool with no news access; every call reports the missing token.
    pub fn unconfigured() -> Self {
        Self { source: None }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        match NewsClient::from_settings(settings) {
            Ok(client) => Self::new(Arc::new(client)),
            Err(_) => Self::unconfigured(),
        }
    }
}

#[async_trait]
impl Tool for SiteImpactResearchTool {
    fn name(&self) -> &'static str {
        SITE_IMPACT_RESEARCH
    }

    fn description(&self) -> &'static str {
        "Researches news articles for moratoriums, environmental restrictions, and site development impacts using news API."
    }

    async fn invoke(&self, args: &Map<String, Value>) -> Result<String, RunnerError> {
        let location = optional_str(SITE_IMPACT_RESEARCH, args, "location")?;
        let Some(source) = &self.source else {
            warn!("news research requested without an API token");
            return Ok(format!("Error: {}", NewsError::MissingToken));
        };
        let report = site_impact_research(source.as_ref(), location).await;
        encode(SITE_IMPACT_RESEARCH, &report)
    }
}
