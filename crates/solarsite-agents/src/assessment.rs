//! End-to-end site assessment: permitting, research, scoring, report.

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use solarsite_core::scoring::format_amount;
use solarsite_core::{
    Decision, FeasibilityResult, RiskLevel, ScoreBasis, Settings, calculate_feasibility,
    location_for,
};
use solarsite_news::ArticleSource;
use tracing::{info, warn};

use crate::agents::{permitting_task, permitting_toolbox, research_task, research_toolbox};
use crate::tools::SiteImpactResearchTool;
use crate::{AgentAnswer, Task, TaskRunner, Toolbox, parse_run_output};

pub const DEFAULT_SYSTEM_SIZE: &str = "5kW";
pub const DEFAULT_PANEL_COUNT: &str = "20";

/// What to assess.
#[derive(Debug, Clone, PartialEq)]
pub struct AssessmentRequest {
    pub address: String,
    pub system_size: String,
    pub panel_count: String,
}

impl AssessmentRequest {
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            system_size: DEFAULT_SYSTEM_SIZE.to_string(),
            panel_count: DEFAULT_PANEL_COUNT.to_string(),
        }
    }

    pub fn system(mut self, size: impl Into<String>, panel_count: impl Into<String>) -> Self {
        self.system_size = size.into();
        self.panel_count = panel_count.into();
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    pub permitting_score: f64,
    pub research_score: f64,
    pub permitting_basis: ScoreBasis,
    pub research_basis: ScoreBasis,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeyFactors {
    pub estimated_fees: String,
    pub processing_time: String,
    pub location_research: String,
}

/// The final Go/No-Go report. Both agent answers are kept verbatim.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeasibilityReport {
    pub address: String,
    pub system_specs: String,
    pub assessment_date: String,
    pub feasibility_score: f64,
    pub decision: Decision,
    pub risk_level: RiskLevel,
    pub breakdown: ScoreBreakdown,
    pub key_factors: KeyFactors,
    pub justification: String,
    pub raw_permitting_data: Value,
    pub raw_research_data: Value,
}

impl FeasibilityReport {
    fn assemble(
        request: &AssessmentRequest,
        assessment_date: String,
        location: &str,
        feasibility: FeasibilityResult,
        permitting: &AgentAnswer,
        research: &AgentAnswer,
    ) -> Self {
        let fees = format_amount(feasibility.fees);
        let justification = justification(&feasibility, &fees);

        Self {
            address: request.address.clone(),
            system_specs: format!(
                "{} system, {} panels",
                request.system_size, request.panel_count
            ),
            assessment_date,
            feasibility_score: feasibility.overall_score,
            decision: feasibility.decision,
            risk_level: feasibility.risk_level,
            breakdown: ScoreBreakdown {
                permitting_score: feasibility.permit_score,
                research_score: feasibility.research_score,
                permitting_basis: feasibility.permit_basis,
                research_basis: feasibility.research_basis,
            },
            key_factors: KeyFactors {
                estimated_fees: format!("${fees}"),
                processing_time: format!("{} weeks", feasibility.processing_weeks),
                location_research: location.to_string(),
            },
            justification,
            raw_permitting_data: permitting.to_raw_value(),
            raw_research_data: research.to_raw_value(),
        }
    }
}

fn justification(f: &FeasibilityResult, fees: &str) -> String {
    format!(
        "DECISION: {decision}\n\
         \n\
         Reasoning:\n\
         \u{2022} Permitting Score: {permit:.1}/100 (fees: ${fees}, time: {weeks} weeks)\n\
         \u{2022} Research Score: {research:.1}/100 (regulatory environment analysis)\n\
         \u{2022} Overall Score: {overall:.1}/100\n\
         \n\
         Risk Level: {risk}",
        decision = f.decision,
        permit = f.permit_score,
        weeks = f.processing_weeks,
        research = f.research_score,
        overall = f.overall_score,
        risk = f.risk_level,
    )
}

/// Runs assessments against a task runner.
///
/// The two agent runs are sequential and every failure degrades into the
/// report; [`Assessor::assess`] cannot fail.
pub struct Assessor {
    runner: Arc<dyn TaskRunner>,
    settings: Settings,
    news: Option<Arc<dyn ArticleSource>>,
}

impl Assessor {
    /// Build with news access derived from `settings`.
    pub fn new(settings: Settings, runner: Arc<dyn TaskRunner>) -> Self {
        let news = solarsite_news::NewsClient::from_settings(&settings)
            .ok()
            .map(|c| Arc::new(c) as Arc<dyn ArticleSource>);
        Self {
            runner,
            settings,
            news,
        }
    }

    /// Replace the article source used by the research tool.
    pub fn with_article_source(mut self, source: Arc<dyn ArticleSource>) -> Self {
        self.news = Some(source);
        self
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    fn research_tool(&self) -> SiteImpactResearchTool {
        match &self.news {
            Some(source) => SiteImpactResearchTool::new(Arc::clone(source)),
            None => SiteImpactResearchTool::unconfigured(),
        }
    }

    async fn run(&self, stage: &str, task: &Task, tools: &Toolbox) -> AgentAnswer {
        match self.runner.submit(task, tools).await {
            Ok(output) => parse_run_output(&output),
            Err(e) => {
                warn!(stage, error = %e, "agent run failed");
                AgentAnswer::Unavailable {
                    reason: e.to_string(),
                }
            }
        }
    }

    pub async fn assess(&self, request: &AssessmentRequest) -> FeasibilityReport {
        info!(
            address = %request.address,
            system_size = %request.system_size,
            panel_count = %request.panel_count,
            "starting solar feasibility assessment"
        );

        info!("running permitting analysis");
        let task = permitting_task(&request.address, &request.system_size, &request.panel_count);
        let permitting = self
            .run("permitting", &task, &permitting_toolbox(&self.settings))
            .await;

        info!("running site research analysis");
        let location = location_for(&request.address);
        let task = research_task(location);
        let research = self
            .run("research", &task, &research_toolbox(self.research_tool()))
            .await;

        info!("calculating final feasibility score");
        let feasibility =
            calculate_feasibility(&permitting.scoring_input(), &research.scoring_input());
        info!(
            score = feasibility.overall_score,
            decision = %feasibility.decision,
            "assessment complete"
        );

        FeasibilityReport::assemble(
            request,
            self.settings.assessment_date_string(),
            location,
            feasibility,
            &permitting,
            &research,
        )
    }
}
