use std::collections::HashSet;

use chrono::NaiveDateTime;
use nt_core::timestamp::is_valid_timestamp;
use nt_core::types::METADATA_DATETIME_FORMAT;
use nt_core::{Error, Metadata, Result};
use url::Url;

use crate::document::{ArticleEntry, OrderedMap, VisualizationDocument};

/// Checks a document against the published schema.
///
/// All violations are collected and reported in a single `Error::Validation`.
pub fn validate_document(document: &VisualizationDocument) -> Result<()> {
    let mut problems = Vec::new();

    check_keys(document.groups(), "group", &mut problems);
    for (group, subgroups) in document.groups().iter() {
        check_keys(subgroups, &format!("subgroup in '{}'", group), &mut problems);
        for (subgroup, entries) in subgroups.iter() {
            check_keys(entries, &format!("article in '{}/{}'", group, subgroup), &mut problems);
            for (key, entry) in entries.iter() {
                check_entry(entry, &format!("{}/{}/{}", group, subgroup, key), &mut problems);
            }
        }
    }

    if problems.is_empty() {
        Ok(())
    } else {
        Err(Error::Validation(problems.join("; ")))
    }
}

fn check_keys<V>(map: &OrderedMap<V>, what: &str, problems: &mut Vec<String>) {
    let mut seen = HashSet::new();
    for key in map.keys() {
        if key.trim().is_empty() {
            problems.push(format!("empty {} key", what));
        } else if !seen.insert(key) {
            problems.push(format!("duplicate {} key '{}'", what, key));
        }
    }
}

fn check_entry(entry: &ArticleEntry, path: &str, problems: &mut Vec<String>) {
    let fields = [
        ("title", &entry.title),
        ("link", &entry.link),
        ("timestamp", &entry.timestamp),
        ("source", &entry.source),
    ];
    for (name, value) in fields {
        if value.trim().is_empty() {
            problems.push(format!("{}: empty {}", path, name));
        }
    }

    for (name, value) in [("link", &entry.link), ("source", &entry.source)] {
        if !value.trim().is_empty() && Url::parse(value).is_err() {
            problems.push(format!("{}: {} '{}' is not an absolute URI", path, name, value));
        }
    }

    if !entry.timestamp.trim().is_empty() && !is_valid_timestamp(&entry.timestamp) {
        problems.push(format!("{}: unparseable timestamp '{}'", path, entry.timestamp));
    }
}

/// `datetime` must be `YYYY-MM-DDTHH:mm:ss`, `version` must be `major.minor.patch`.
pub fn validate_metadata(metadata: &Metadata) -> Result<()> {
    let datetime_ok = metadata.datetime.len() == 19
        && NaiveDateTime::parse_from_str(&metadata.datetime, METADATA_DATETIME_FORMAT).is_ok();
    if !datetime_ok {
        return Err(Error::Validation(format!(
            "metadata datetime '{}' is not YYYY-MM-DDTHH:mm:ss",
            metadata.datetime
        )));
    }
    if !is_semver_triple(&metadata.version) {
        return Err(Error::Validation(format!(
            "metadata version '{}' is not major.minor.patch",
            metadata.version
        )));
    }
    Ok(())
}

fn is_semver_triple(version: &str) -> bool {
    let parts: Vec<&str> = version.split('.').collect();
    parts.len() == 3
        && parts
            .iter()
            .all(|p| !p.is_empty() && p.chars().all(|c| c.is_ascii_digit()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::labels::{LabeledGroup, LabeledSubgroup, LabeledTree};
    use nt_core::Article;

    fn document_with(article: Article) -> VisualizationDocument {
        VisualizationDocument::assemble(&LabeledTree {
            groups: vec![LabeledGroup {
                label: "Economy".to_string(),
                subgroups: vec![LabeledSubgroup {
                    label: "Rates".to_string(),
                    articles: vec![article],
                }],
            }],
        })
    }

    fn good_article() -> Article {
        Article::new(
            "Central bank holds rates",
            "https://news.example.com/rates",
            "Sat, 16 Aug 2025 18:51:12 GMT",
            "https://news.example.com/rss",
        )
    }

    fn metadata(datetime: &str, version: &str) -> Metadata {
        Metadata {
            datetime: datetime.to_string(),
            version: version.to_string(),
        }
    }

    #[test]
    fn test_valid_document() {
        assert!(validate_document(&document_with(good_article())).is_ok());
        assert!(validate_document(&VisualizationDocument::default()).is_ok());
    }

    #[test]
    fn test_accepted_timestamp_formats() {
        for timestamp in [
            "Sat, 16 Aug 2025 18:51:12 +0000",
            "Wed, 15 Jan 2025 14:30:00 EST",
            "2025-01-15T14:30:00Z",
            "2025-01-15T14:30:00",
            "2025-01-15",
        ] {
            let mut article = good_article();
            article.published = timestamp.to_string();
            assert!(validate_document(&document_with(article)).is_ok(), "{}", timestamp);
        }
    }

    #[test]
    fn test_invalid_entries_are_reported() {
        let mut article = good_article();
        article.link = "not-a-uri".to_string();
        article.published = "yesterday".to_string();

        let message = match validate_document(&document_with(article)) {
            Err(Error::Validation(message)) => message,
            other => panic!("expected validation error, got {:?}", other),
        };
        assert!(message.contains("link 'not-a-uri'"));
        assert!(message.contains("unparseable timestamp 'yesterday'"));
    }

    #[test]
    fn test_empty_fields_are_rejected() {
        let mut article = good_article();
        article.source = String::new();
        assert!(matches!(
            validate_document(&document_with(article)),
            Err(Error::Validation(m)) if m.contains("empty source")
        ));
    }

    #[test]
    fn test_duplicate_sibling_keys_are_rejected() {
        let json = r#"{"A":{"x":{}},"A":{"y":{}}}"#;
        let document = VisualizationDocument::from_json_slice(json.as_bytes()).unwrap();
        assert!(matches!(
            validate_document(&document),
            Err(Error::Validation(m)) if m.contains("duplicate group key 'A'")
        ));

        let json = r#"{" ":{}}"#;
        let document = VisualizationDocument::from_json_slice(json.as_bytes()).unwrap();
        assert!(validate_document(&document).is_err());
    }

    #[test]
    fn test_metadata_validation() {
        assert!(validate_metadata(&metadata("2025-01-16T10:30:45", "0.2.1")).is_ok());
        assert!(validate_metadata(&metadata("2025-01-16T10:30:45", "10.20.30")).is_ok());

        for version in ["1.0", "1.0.0.0", "v1.0.0", "1.0.a", "", "1..0"] {
            assert!(validate_metadata(&metadata("2025-01-16T10:30:45", version)).is_err(), "{}", version);
        }
        for datetime in ["2025-01-16 10:30:45", "2025-01-16T10:30:45Z", "2025-01-16", "2025-13-01T00:00:00"] {
            assert!(validate_metadata(&metadata(datetime, "0.2.1")).is_err(), "{}", datetime);
        }
    }

    #[test]
    fn test_run_metadata_is_valid() {
        assert!(validate_metadata(&Metadata::for_run(chrono::Utc::now())).is_ok());
    }
}
