//! Explicit process configuration, validated once at construction.

use chrono::NaiveDate;

use crate::CoreError;

pub const DEFAULT_NEWS_API_HOST: &str = "api.thenewsapi.com";
pub const DEFAULT_MODEL_NAME: &str = "gpt-4o-mini";

/// Date stamped on permit forms and reports unless overridden.
pub fn default_assessment_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 7, 18).unwrap_or_default()
}

/// Settings shared by the news adapter, agent runners, and report assembly.
#[derive(Debug, Clone)]
pub struct Settings {
    news_api_token: Option<String>,
    news_api_host: String,
    model_name: String,
    assessment_date: NaiveDate,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            news_api_token: None,
            news_api_host: DEFAULT_NEWS_API_HOST.to_string(),
            model_name: DEFAULT_MODEL_NAME.to_string(),
            assessment_date: default_assessment_date(),
        }
    }
}

impl Settings {
    pub fn builder() -> SettingsBuilder {
        SettingsBuilder::default()
    }

    /// The news API token, or `None` when unset or blank.
    pub fn news_api_token(&self) -> Option<&str> {
        self.news_api_token.as_deref()
    }

    pub fn news_api_host(&self) -> &str {
        &self.news_api_host
    }

    /// Model name handed to natural-language task runners.
    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    pub fn assessment_date(&self) -> NaiveDate {
        self.assessment_date
    }

    /// `YYYY-MM-DD`, as written into permit forms and reports.
    pub fn assessment_date_string(&self) -> String {
        self.assessment_date.format("%Y-%m-%d").to_string()
    }
}

#[derive(Debug, Default)]
pub struct SettingsBuilder {
    news_api_token: Option<String>,
    news_api_host: Option<String>,
    model_name: Option<String>,
    assessment_date: Option<NaiveDate>,
}

impl SettingsBuilder {
    pub fn news_api_token(mut self, token: impl Into<String>) -> Self {
        self.news_api_token = Some(token.into());
        self
    }

    pub fn news_api_host(mut self, host: impl Into<String>) -> Self {
        self.news_api_host = Some(host.into());
        self
    }

    pub fn model_name(mut self, name: impl Into<String>) -> Self {
        self.model_name = Some(name.into());
        self
    }

    pub fn assessment_date(mut self, date: NaiveDate) -> Self {
        self.assessment_date = Some(date);
        self
    }

    /// Validate and build.
    ///
    /// A blank token is not an error here: the research tool reports it
    /// when it is actually needed, so permitting still runs without one.
    pub fn build(self) -> Result<Settings, CoreError> {
        let defaults = Settings::default();

        let news_api_token = self
            .news_api_token
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty());

        let news_api_host = match self.news_api_host {
            Some(host) => validate_host(host.trim())?,
            None => defaults.news_api_host,
        };

        let model_name = match self.model_name {
            Some(name) if name.trim().is_empty() => {
                return Err(CoreError::InvalidSetting {
                    field: "model_name",
                    reason: "must not be empty".into(),
                });
            }
            Some(name) => name.trim().to_string(),
            None => defaults.model_name,
        };

        Ok(Settings {
            news_api_token,
            news_api_host,
            model_name,
            assessment_date: self.assessment_date.unwrap_or(defaults.assessment_date),
        })
    }
}

fn validate_host(host: &str) -> Result<String, CoreError> {
    let invalid = |reason: &str| CoreError::InvalidSetting {
        field: "news_api_host",
        reason: reason.to_string(),
    };
    if host.is_empty() {
        return Err(invalid("must not be empty"));
    }
    let authority = host.split_once("://").map_or(host, |(_, rest)| rest);
    let authority = authority.trim_end_matches('/');
    if authority.is_empty() {
        return Err(invalid("missing host name"));
    }
    if authority.contains('/') || authority.contains('?') {
        return Err(invalid("must be a host, not a URL with a path"));
    }
    Ok(host.trim_end_matches('/').to_string())
}
