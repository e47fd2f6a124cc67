use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use solarsite_core::Settings;
use solarsite_core::config::{DEFAULT_MODEL_NAME, DEFAULT_NEWS_API_HOST};

pub const EXAMPLE_ADDRESS: &str = "8770 W Olympic Blvd, Los Angeles, California 90035";
pub const EXAMPLE_SYSTEM_SIZE: &str = "7kW";
pub const EXAMPLE_PANEL_COUNT: &str = "24";

/// Solar site feasibility: permitting, regulatory news, and a Go/No-Go call.
#[derive(Debug, Parser)]
#[command(name = "solarsite", version, about)]
pub struct Cli {
    /// News API token.
    #[arg(long, env = "NEWS_API_TOKEN", hide_env_values = true, global = true)]
    pub news_api_token: Option<String>,

    /// News API host, optionally with a scheme.
    #[arg(long, env = "NEWS_API_HOST", default_value = DEFAULT_NEWS_API_HOST, global = true)]
    pub news_api_host: String,

    /// Model name passed to natural-language task runners.
    #[arg(long, env = "OPENAI_MODEL_NAME", default_value = DEFAULT_MODEL_NAME, global = true)]
    pub model_name: String,

    /// Date stamped on permit forms and reports (YYYY-MM-DD).
    #[arg(long, env = "SOLARSITE_ASSESSMENT_DATE", global = true)]
    pub assessment_date: Option<NaiveDate>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Assess a site and print a Go/No-Go report.
    Assess {
        /// Site address. Without one, the built-in example site is assessed.
        #[arg(long)]
        address: Option<String>,
        /// System size, e.g. `5kW`.
        #[arg(long)]
        system_size: Option<String>,
        /// Number of panels.
        #[arg(long)]
        panel_count: Option<String>,
        /// Print the full report as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Classify an address into a permitting jurisdiction.
    Classify { address: String },
    /// Search regulatory news for a location.
    Research {
        #[arg(long)]
        location: Option<String>,
    },
}

impl Default for Command {
    fn default() -> Self {
        Self::Assess {
            address: None,
            system_size: None,
            panel_count: None,
            json: false,
        }
    }
}

impl Cli {
    pub fn settings(&self) -> anyhow::Result<Settings> {
        let mut builder = Settings::builder()
            .news_api_host(&self.news_api_host)
            .model_name(&self.model_name);
        if let Some(token) = &self.news_api_token {
            builder = builder.news_api_token(token);
        }
        if let Some(date) = self.assessment_date {
            builder = builder.assessment_date(date);
        }
        Ok(builder.build()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("solarsite").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn no_subcommand_means_example_assessment() {
        let cli = parse(&["--news-api-host", "api.thenewsapi.com"]);
        assert!(cli.command.is_none());
        assert!(matches!(
            Command::default(),
            Command::Assess { address: None, json: false, .. }
        ));
    }

    #[test]
    fn assess_arguments() {
        let cli = parse(&[
            "assess",
            "--address",
            "1 Market St, San Francisco",
            "--system-size",
            "6kW",
            "--json",
        ]);
        match cli.command {
            Some(Command::Assess {
                address,
                system_size,
                panel_count,
                json,
            }) => {
                assert_eq!(address.as_deref(), Some("1 Market St, San Francisco"));
                assert_eq!(system_size.as_deref(), Some("6kW"));
                assert!(panel_count.is_none());
                assert!(json);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn settings_from_flags() {
        let cli = parse(&[
            "--news-api-token",
            "tok",
            "--news-api-host",
            "http://127.0.0.1:8080",
            "--assessment-date",
            "2025-03-01",
            "classify",
            "Anytown",
        ]);
        let settings = cli.settings().unwrap();
        assert_eq!(settings.news_api_token(), Some("tok"));
        assert_eq!(settings.news_api_host(), "http://127.0.0.1:8080");
        assert_eq!(settings.assessment_date_string(), "2025-03-01");
    }

    #[test]
    fn invalid_host_is_rejected() {
        let cli = parse(&["--news-api-host", "example.com/path", "classify", "x"]);
        assert!(cli.settings().is_err());
    }
}
