use std::fmt;
use std::marker::PhantomData;

use nt_core::{Article, Result};
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::labels::{disambiguate, LabeledTree};

/// JSON object that keeps insertion order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderedMap<V>(Vec<(String, V)>);

impl<V> OrderedMap<V> {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn push(&mut self, key: impl Into<String>, value: V) {
        self.0.push((key.into(), value));
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<V> Default for OrderedMap<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Serialize> Serialize for OrderedMap<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, value) in &self.0 {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

struct OrderedMapVisitor<V>(PhantomData<V>);

impl<'de, V: Deserialize<'de>> Visitor<'de> for OrderedMapVisitor<V> {
    type Value = OrderedMap<V>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a JSON object")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> std::result::Result<Self::Value, A::Error> {
        let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
        while let Some((key, value)) = access.next_entry::<String, V>()? {
            entries.push((key, value));
        }
        Ok(OrderedMap(entries))
    }
}

impl<'de, V: Deserialize<'de>> Deserialize<'de> for OrderedMap<V> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_map(OrderedMapVisitor(PhantomData))
    }
}

/// One headline as persisted in the published document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleEntry {
    pub title: String,
    pub link: String,
    pub timestamp: String,
    pub source: String,
}

impl From<&Article> for ArticleEntry {
    fn from(article: &Article) -> Self {
        Self {
            title: article.title.clone(),
            link: article.link.clone(),
            timestamp: article.published.clone(),
            source: article.source.clone(),
        }
    }
}

pub type SubgroupMap = OrderedMap<ArticleEntry>;
pub type GroupMap = OrderedMap<SubgroupMap>;

/// `group label -> subgroup label -> article title -> entry`, in display order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VisualizationDocument(pub OrderedMap<GroupMap>);

impl VisualizationDocument {
    /// Builds the nested mapping, keeping cluster creation order.
    pub fn assemble(tree: &LabeledTree) -> Self {
        let mut groups = OrderedMap::new();
        for group in &tree.groups {
            let mut subgroups = OrderedMap::new();
            for subgroup in &group.subgroups {
                let keys = disambiguate(subgroup.articles.iter().map(|a| a.title.clone()).collect());
                let mut entries = OrderedMap::new();
                for (key, article) in keys.into_iter().zip(&subgroup.articles) {
                    entries.push(key, ArticleEntry::from(article));
                }
                subgroups.push(subgroup.label.clone(), entries);
            }
            groups.push(group.label.clone(), subgroups);
        }
        Self(groups)
    }

    pub fn groups(&self) -> &OrderedMap<GroupMap> {
        &self.0
    }

    pub fn group_count(&self) -> usize {
        self.0.len()
    }

    pub fn subgroup_count(&self) -> usize {
        self.0.iter().map(|(_, g)| g.len()).sum()
    }

    pub fn article_count(&self) -> usize {
        self.entries().count()
    }

    /// Every article entry, in document order.
    pub fn entries(&self) -> impl Iterator<Item = &ArticleEntry> {
        self.0
            .iter()
            .flat_map(|(_, group)| group.iter())
            .flat_map(|(_, subgroup)| subgroup.iter().map(|(_, entry)| entry))
    }

    pub fn to_json_bytes(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }

    pub fn from_json_slice(bytes: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }
}
