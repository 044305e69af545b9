use nt_core::config::GroupingConfig;
use nt_core::{EmbeddedArticle, Result};
use tracing::info;

use crate::similarity::{centroid, validate_vectors, SimilarityMatrix};

/// Near-duplicate coverage of one story.
#[derive(Debug, Clone, PartialEq)]
pub struct Subgroup {
    /// Indices into the clustered slice, ascending
    pub members: Vec<usize>,
    pub centroid: Vec<f32>,
}

/// Broad topic made of related subgroups.
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    pub subgroups: Vec<Subgroup>,
    pub centroid: Vec<f32>,
}

impl Group {
    pub fn members(&self) -> impl Iterator<Item = usize> + '_ {
        self.subgroups.iter().flat_map(|s| s.members.iter().copied())
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClusterTree {
    pub groups: Vec<Group>,
}

impl ClusterTree {
    pub fn subgroup_count(&self) -> usize {
        self.groups.iter().map(|g| g.subgroups.len()).sum()
    }

    pub fn article_count(&self) -> usize {
        self.groups.iter().map(|g| g.members().count()).sum()
    }
}

/// Two-pass single-linkage agglomeration over headline embeddings.
#[derive(Debug, Clone)]
pub struct Clusterer {
    subgroup_threshold: f32,
    group_threshold: f32,
}

impl Clusterer {
    pub fn new(subgroup_threshold: f32, group_threshold: f32) -> Self {
        Self {
            subgroup_threshold,
            group_threshold,
        }
    }

    pub fn from_config(config: &GroupingConfig) -> Self {
        Self::new(config.subgroup_threshold, config.group_threshold)
    }

    /// Partitions `articles` into groups of subgroups.
    ///
    /// Fails only on malformed vectors, before any grouping happens.
    pub fn cluster(&self, articles: &[EmbeddedArticle]) -> Result<ClusterTree> {
        let dimension = validate_vectors(articles)?;
        if articles.is_empty() {
            return Ok(ClusterTree::default());
        }

        let vectors: Vec<&[f32]> = articles.iter().map(|a| a.vector.as_slice()).collect();
        let matrix = SimilarityMatrix::from_vectors(&vectors);

        let subgroups: Vec<Subgroup> =
            single_linkage(matrix.len(), |i, j| matrix.get(i, j), self.subgroup_threshold)
                .into_iter()
                .map(|members| {
                    let centroid = centroid(members.iter().map(|&m| vectors[m]), dimension);
                    Subgroup { members, centroid }
                })
                .collect();

        let centroids: Vec<&[f32]> = subgroups.iter().map(|s| s.centroid.as_slice()).collect();
        let centroid_matrix = SimilarityMatrix::from_vectors(&centroids);
        let group_members = single_linkage(
            centroid_matrix.len(),
            |i, j| centroid_matrix.get(i, j),
            self.group_threshold,
        );

        let groups: Vec<Group> = group_members
            .into_iter()
            .map(|indices| {
                let centroid = centroid(
                    indices
                        .iter()
                        .flat_map(|&s| subgroups[s].members.iter().map(|&m| vectors[m])),
                    dimension,
                );
                Group {
                    subgroups: indices.iter().map(|&s| subgroups[s].clone()).collect(),
                    centroid,
                }
            })
            .collect();

        let tree = ClusterTree { groups };
        info!(
            "🧩 Clustered {} articles into {} subgroups and {} groups",
            articles.len(),
            tree.subgroup_count(),
            tree.groups.len()
        );
        Ok(tree)
    }
}

/// Greedy single-linkage agglomeration of items `0..n`.
///
/// Items are visited in order. An item reaching existing clusters (max
/// similarity to any member at or above `threshold`) joins the one it is most
/// similar to, earliest cluster on ties, and every other cluster it reaches is
/// merged into that one. The result equals the connected components of the
/// thresholded similarity graph; clusters come back ordered by their first
/// member, members ascending.
pub fn single_linkage(n: usize, sim: impl Fn(usize, usize) -> f32, threshold: f32) -> Vec<Vec<usize>> {
    let mut clusters: Vec<Option<Vec<usize>>> = Vec::new();

    for item in 0..n {
        let mut best: Option<(usize, f32)> = None;
        let mut reached: Vec<usize> = Vec::new();

        for (id, cluster) in clusters.iter().enumerate() {
            let Some(members) = cluster else { continue };
            let linkage = members
                .iter()
                .map(|&m| sim(item, m))
                .fold(f32::NEG_INFINITY, f32::max);
            if linkage >= threshold {
                reached.push(id);
                if best.map_or(true, |(_, score)| linkage > score) {
                    best = Some((id, linkage));
                }
            }
        }

        match best {
            None => clusters.push(Some(vec![item])),
            Some((target, _)) => {
                let mut merged = Vec::new();
                for id in reached.into_iter().filter(|&id| id != target) {
                    if let Some(mut members) = clusters[id].take() {
                        merged.append(&mut members);
                    }
                }
                if let Some(members) = clusters[target].as_mut() {
                    members.append(&mut merged);
                    members.push(item);
                    members.sort_unstable();
                }
            }
        }
    }

    let mut result: Vec<Vec<usize>> = clusters.into_iter().flatten().collect();
    result.sort_by_key(|members| members[0]);
    result
}
