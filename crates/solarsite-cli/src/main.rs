mod cli;
mod display;

use std::sync::Arc;

use clap::Parser;
use solarsite_agents::assessment::{DEFAULT_PANEL_COUNT, DEFAULT_SYSTEM_SIZE};
use solarsite_agents::tools::SiteImpactResearchTool;
use solarsite_agents::{AssessmentRequest, Assessor, ScriptedRunner, Tool};
use solarsite_core::classify;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Command, EXAMPLE_ADDRESS, EXAMPLE_PANEL_COUNT, EXAMPLE_SYSTEM_SIZE};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();
    tracing::info!("solarsite v{}", env!("CARGO_PKG_VERSION"));

    let cli = Cli::parse();
    let settings = cli.settings()?;
    tracing::debug!(model = %settings.model_name(), "task runner model");

    match cli.command.unwrap_or_default() {
        Command::Assess {
            address,
            system_size,
            panel_count,
            json,
        } => {
            let request = match address {
                Some(address) => AssessmentRequest::new(address).system(
                    system_size.as_deref().unwrap_or(DEFAULT_SYSTEM_SIZE),
                    panel_count.as_deref().unwrap_or(DEFAULT_PANEL_COUNT),
                ),
                None => AssessmentRequest::new(EXAMPLE_ADDRESS).system(
                    system_size.as_deref().unwrap_or(EXAMPLE_SYSTEM_SIZE),
                    panel_count.as_deref().unwrap_or(EXAMPLE_PANEL_COUNT),
                ),
            };

            if !json {
                display::print_assessment_banner(&request);
            }
            let assessor = Assessor::new(settings, Arc::new(ScriptedRunner));
            let report = assessor.assess(&request).await;

            if json {
                println!("{}", display::render_json(&report)?);
            } else {
                display::print_report(&report);
            }
        }
        Command::Classify { address } => {
            println!("{}", serde_json::to_string_pretty(&classify(&address))?);
        }
        Command::Research { location } => {
            let tool = SiteImpactResearchTool::from_settings(&settings);
            let mut args = serde_json::Map::new();
            if let Some(location) = location {
                args.insert("location".into(), location.into());
            }
            let out = tool.invoke(&args).await?;
            match serde_json::from_str::<serde_json::Value>(&out) {
                Ok(v) => println!("{}", serde_json::to_string_pretty(&v)?),
                Err(_) => anyhow::bail!("{out}"),
            }
        }
    }

    Ok(())
}
