//! News layer: the upstream news API client and site-impact research.

pub mod client;
pub mod research;

pub use client::{ArticleSource, NewsClient, NewsError};
pub use research::{ResearchReport, SEARCH_TERMS, search_phrases, site_impact_research};
