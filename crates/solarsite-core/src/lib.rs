//! Core solarsite types: jurisdiction rules, permit forms, news articles,
//! feasibility scoring, and shared configuration.

pub mod article;
pub mod config;
mod error;
pub mod fence;
pub mod jurisdiction;
pub mod permit;
pub mod scoring;

pub use article::{NewsArticle, dedup_by_title};
pub use config::{Settings, SettingsBuilder};
pub use error::CoreError;
pub use jurisdiction::{Classification, JurisdictionId, JurisdictionRule, classify, location_for};
pub use permit::{PermitForm, PermitPackage, SystemDetails, generate_permit_package};
pub use scoring::{Decision, FeasibilityResult, RiskLevel, ScoreBasis, calculate_feasibility};
