use std::collections::HashMap;

use async_trait::async_trait;
use nt_core::text::content_terms;
use nt_core::{LabelModel, Result};

/// Labels a set of headlines with its most frequent content terms.
#[derive(Debug, Clone)]
pub struct KeywordLabeler {
    top_n: usize,
}

impl KeywordLabeler {
    pub fn new(top_n: usize) -> Self {
        Self { top_n: top_n.max(1) }
    }

    /// Terms ranked by frequency, ties broken by first appearance.
    pub fn top_terms(&self, titles: &[String]) -> Vec<(String, usize)> {
        let mut counts: HashMap<String, (usize, usize)> = HashMap::new();
        let mut order = 0;
        for title in titles {
            for term in content_terms(title) {
                let entry = counts.entry(term).or_insert_with(|| {
                    order += 1;
                    (0, order)
                });
                entry.0 += 1;
            }
        }

        let mut ranked: Vec<(String, usize, usize)> = counts
            .into_iter()
            .map(|(term, (count, first))| (term, count, first))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));
        ranked
            .into_iter()
            .take(self.top_n)
            .map(|(term, count, _)| (term, count))
            .collect()
    }
}

impl Default for KeywordLabeler {
    fn default() -> Self {
        Self::new(3)
    }
}

#[async_trait]
impl LabelModel for KeywordLabeler {
    async fn summarize(&self, titles: &[String]) -> Result<String> {
        Ok(self
            .top_terms(titles)
            .into_iter()
            .map(|(term, _)| term)
            .collect::<Vec<_>>()
            .join(" "))
    }
}
