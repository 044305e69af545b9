use std::collections::HashSet;
use std::sync::Arc;

use nt_core::text::{is_degenerate_label, truncate_chars};
use nt_core::{cosine_similarity, Article, EmbeddedArticle, LabelModel};
use tracing::{debug, warn};

use crate::cluster::ClusterTree;

const UNTITLED: &str = "untitled";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabeledSubgroup {
    pub label: String,
    pub articles: Vec<Article>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabeledGroup {
    pub label: String,
    pub subgroups: Vec<LabeledSubgroup>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabeledTree {
    pub groups: Vec<LabeledGroup>,
}

/// Names every group and subgroup of a cluster tree.
pub struct LabelSynthesizer {
    labeler: Arc<dyn LabelModel>,
    max_label_len: usize,
}

impl LabelSynthesizer {
    pub fn new(labeler: Arc<dyn LabelModel>, max_label_len: usize) -> Self {
        Self {
            labeler,
            max_label_len: max_label_len.max(1),
        }
    }

    pub async fn label_tree(&self, articles: &[EmbeddedArticle], tree: &ClusterTree) -> LabeledTree {
        let mut groups = Vec::with_capacity(tree.groups.len());
        for group in &tree.groups {
            let members: Vec<usize> = group.members().collect();
            let group_label = self.label_cluster(articles, &members, &group.centroid).await;

            let mut subgroup_labels = Vec::with_capacity(group.subgroups.len());
            for subgroup in &group.subgroups {
                subgroup_labels.push(
                    self.label_cluster(articles, &subgroup.members, &subgroup.centroid)
                        .await,
                );
            }

            let subgroups = disambiguate(subgroup_labels)
                .into_iter()
                .zip(&group.subgroups)
                .map(|(label, subgroup)| LabeledSubgroup {
                    label,
                    articles: subgroup
                        .members
                        .iter()
                        .map(|&m| articles[m].article.clone())
                        .collect(),
                })
                .collect();

            groups.push(LabeledGroup {
                label: group_label,
                subgroups,
            });
        }

        let group_labels = disambiguate(groups.iter().map(|g| g.label.clone()).collect());
        for (group, label) in groups.iter_mut().zip(group_labels) {
            group.label = label;
        }
        LabeledTree { groups }
    }

    /// Collaborator label, or the centroid-nearest title when it is unusable.
    async fn label_cluster(&self, articles: &[EmbeddedArticle], members: &[usize], centroid: &[f32]) -> String {
        let titles: Vec<String> = members.iter().map(|&m| articles[m].article.title.clone()).collect();
        match self.labeler.summarize(&titles).await {
            Ok(label) if !is_degenerate_label(&label) => {
                return truncate_chars(&label, self.max_label_len);
            }
            Ok(label) => debug!(label = %label, "Degenerate label, falling back to nearest title"),
            Err(e) => warn!("⚠️ Labeler failed, falling back to nearest title: {}", e),
        }

        let fallback = nearest_to_centroid(articles, members, centroid)
            .map(|m| truncate_chars(&articles[m].article.title, self.max_label_len))
            .unwrap_or_default();
        if fallback.is_empty() {
            UNTITLED.to_string()
        } else {
            fallback
        }
    }
}

/// Member closest to `centroid`; earliest member on ties.
fn nearest_to_centroid(articles: &[EmbeddedArticle], members: &[usize], centroid: &[f32]) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for &m in members {
        let score = cosine_similarity(&articles[m].vector, centroid);
        if best.map_or(true, |(_, s)| score > s) {
            best = Some((m, score));
        }
    }
    best.map(|(m, _)| m)
}

/// Makes sibling labels unique: repeats become `"label (2)"`, `"label (3)"`, ...
pub fn disambiguate(labels: Vec<String>) -> Vec<String> {
    let mut taken: HashSet<String> = HashSet::new();
    let mut result = Vec::with_capacity(labels.len());
    for label in labels {
        let unique = if taken.contains(&label) {
            (2..)
                .map(|n| format!("{} ({})", label, n))
                .find(|candidate| !taken.contains(candidate))
                .unwrap_or_else(|| label.clone())
        } else {
            label
        };
        taken.insert(unique.clone());
        result.push(unique);
    }
    result
}
