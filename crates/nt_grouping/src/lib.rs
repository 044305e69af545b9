pub mod cluster;
pub mod document;
pub mod labels;
pub mod schema;
pub mod similarity;

pub use cluster::{ClusterTree, Clusterer, Group, Subgroup};
pub use document::{ArticleEntry, OrderedMap, VisualizationDocument};
pub use labels::{disambiguate, LabelSynthesizer, LabeledGroup, LabeledSubgroup, LabeledTree};
pub use schema::{validate_document, validate_metadata};

pub mod prelude {
    pub use super::{validate_document, validate_metadata, Clusterer, LabelSynthesizer, VisualizationDocument};
}
