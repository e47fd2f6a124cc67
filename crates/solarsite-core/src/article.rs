//! News articles as returned by the upstream API.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// An upstream article, kept verbatim. Only `title` is interpreted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NewsArticle(Map<String, Value>);

impl NewsArticle {
    /// The article title, or `""` when absent or not a string.
    pub fn title(&self) -> &str {
        self.0.get("title").and_then(Value::as_str).unwrap_or("")
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }
}

impl From<Map<String, Value>> for NewsArticle {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// Keep the first article for each distinct title, in input order.
/// Articles with an empty title are dropped.
pub fn dedup_by_title<I>(articles: I) -> Vec<NewsArticle>
where
    I: IntoIterator<Item = NewsArticle>,
{
    let mut seen = HashSet::new();
    articles
        .into_iter()
        .filter(|a| {
            let title = a.title();
            !title.is_empty() && seen.insert(title.to_string())
        })
        .collect()
}
