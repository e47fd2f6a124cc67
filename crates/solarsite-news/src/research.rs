//! Site-impact research: fan a fixed set of solar phrases out to the news
//! API and collect the unique headlines.

use serde::{Deserialize, Serialize};
use solarsite_core::{NewsArticle, dedup_by_title};
use tracing::{info, warn};

use crate::client::ArticleSource;

/// Base search phrases, issued in this order.
pub const SEARCH_TERMS: [&str; 8] = [
    "solar development moratorium",
    "solar project restriction",
    "renewable energy policy",
    "solar zoning restriction",
    "solar panel installation ban",
    "solar incentive program",
    "solar permit requirement",
    "utility interconnection solar",
];

/// Articles kept in a report.
pub const MAX_ARTICLES: usize = 10;

const GENERAL_LOCATION: &str = "General";

/// Search phrases, each suffixed with the location when one is given.
pub fn search_phrases(location: Option<&str>) -> Vec<String> {
    match location.filter(|l| !l.is_empty()) {
        Some(loc) => SEARCH_TERMS.iter().map(|t| format!("{t} {loc}")).collect(),
        None => SEARCH_TERMS.iter().map(|t| t.to_string()).collect(),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResearchReport {
    /// Unique titled articles found, before truncation.
    pub total_articles: usize,
    /// The first [`MAX_ARTICLES`] unique articles.
    pub articles: Vec<NewsArticle>,
    pub search_location: String,
    /// Searches that failed and contributed nothing.
    #[serde(default)]
    pub failed_searches: usize,
}

/// Run every search phrase in turn and summarise the unique results.
///
/// A failed search is logged and contributes no articles.
pub async fn site_impact_research<S>(source: &S, location: Option<&str>) -> ResearchReport
where
    S: ArticleSource + ?Sized,
{
    let mut all = Vec::new();
    let mut failed_searches = 0;

    for phrase in search_phrases(location) {
        match source.search(&phrase).await {
            Ok(articles) => all.extend(articles),
            Err(e) => {
                warn!(error = %e, search = %phrase, "error searching news");
                failed_searches += 1;
            }
        }
    }

    let mut unique = dedup_by_title(all);
    let total_articles = unique.len();
    unique.truncate(MAX_ARTICLES);

    let search_location = location
        .filter(|l| !l.is_empty())
        .unwrap_or(GENERAL_LOCATION)
        .to_string();
    info!(
        total_articles,
        failed_searches,
        location = %search_location,
        "site impact research complete"
    );

    ResearchReport {
        total_articles,
        articles: unique,
        search_location,
        failed_searches,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::NewsError;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;

    /// Returns a canned page per call and records the phrases it saw.
    struct Canned {
        pages: Mutex<Vec<Result<Vec<NewsArticle>, NewsError>>>,
        seen: Mutex<Vec<String>>,
    }

    impl Canned {
        fn new(pages: Vec<Result<Vec<NewsArticle>, NewsError>>) -> Self {
            Self {
                pages: Mutex::new(pages),
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl ArticleSource for Canned {
        async fn search(&self, phrase: &str) -> Result<Vec<NewsArticle>, NewsError> {
            self.seen.lock().unwrap().push(phrase.to_string());
            let mut pages = self.pages.lock().unwrap();
            if pages.is_empty() {
                Ok(Vec::new())
            } else {
                pages.remove(0)
            }
        }
    }

    fn titled(titles: &[&str]) -> Vec<NewsArticle> {
        titles
            .iter()
            .map(|t| serde_json::from_value(json!({"title": t})).unwrap())
            .collect()
    }

    #[test]
    fn phrases_without_location() {
        let phrases = search_phrases(None);
        assert_eq!(phrases.len(), 8);
        assert_eq!(phrases[0], "solar development moratorium");
        assert_eq!(search_phrases(Some("")), phrases);
    }

    #[test]
    fn phrases_with_location() {
        let phrases = search_phrases(Some("San Francisco California"));
        assert_eq!(phrases[7], "utility interconnection solar San Francisco California");
    }

    #[tokio::test]
    async fn one_search_per_phrase() {
        let source = Canned::new(vec![]);
        let report = site_impact_research(&source, Some("California")).await;
        let seen = source.seen.lock().unwrap();
        assert_eq!(seen.len(), 8);
        assert!(seen.iter().all(|p| p.ends_with(" California")));
        assert_eq!(report.total_articles, 0);
        assert_eq!(report.search_location, "California");
    }

    #[tokio::test]
    async fn results_are_deduplicated_across_phrases() {
        let source = Canned::new(vec![
            Ok(titled(&["A", "B"])),
            Ok(titled(&["B", "", "C"])),
            Ok(titled(&["A"])),
        ]);
        let report = site_impact_research(&source, None).await;
        let titles: Vec<&str> = report.articles.iter().map(|a| a.title()).collect();
        assert_eq!(titles, vec!["A", "B", "C"]);
        assert_eq!(report.total_articles, 3);
        assert_eq!(report.search_location, "General");
    }

    #[tokio::test]
    async fn articles_are_capped_but_total_is_not() {
        let many: Vec<String> = (0..14).map(|i| format!("headline {i}")).collect();
        let refs: Vec<&str> = many.iter().map(String::as_str).collect();
        let source = Canned::new(vec![Ok(titled(&refs))]);
        let report = site_impact_research(&source, None).await;
        assert_eq!(report.total_articles, 14);
        assert_eq!(report.articles.len(), MAX_ARTICLES);
        assert_eq!(report.articles[9].title(), "headline 9");
    }

    #[tokio::test]
    async fn failed_searches_are_counted_and_skipped() {
        let source = Canned::new(vec![
            Err(NewsError::Server {
                status: 429,
                body: "rate limited".into(),
            }),
            Ok(titled(&["Only"])),
        ]);
        let report = site_impact_research(&source, None).await;
        assert_eq!(report.failed_searches, 1);
        assert_eq!(report.total_articles, 1);
    }

    #[test]
    fn report_json_shape() {
        let report = ResearchReport {
            total_articles: 1,
            articles: titled(&["T"]),
            search_location: "General".into(),
            failed_searches: 0,
        };
        let v = serde_json::to_value(&report).unwrap();
        assert_eq!(v["total_articles"], 1);
        assert_eq!(v["articles"][0]["title"], "T");
        assert_eq!(v["search_location"], "General");
    }
}
