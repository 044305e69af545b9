use std::path::Path;

use nt_core::Result;
use tracing::warn;
use url::Url;

/// Reads a feed list: one URL per line, blank lines and `#` comments ignored.
pub fn load_feed_list(path: impl AsRef<Path>) -> Result<Vec<String>> {
    let content = std::fs::read_to_string(path.as_ref())?;
    Ok(parse_feed_list(&content))
}

pub fn parse_feed_list(content: &str) -> Vec<String> {
    let mut feeds: Vec<String> = Vec::new();
    for line in content.lines().map(str::trim) {
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        match Url::parse(line) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {
                if !feeds.iter().any(|f| f == line) {
                    feeds.push(line.to_string());
                }
            }
            _ => warn!(line, "⚠️ Ignoring invalid feed URL"),
        }
    }
    feeds
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_feed_list() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            "  https://example.com/feed1.xml  \n\n# comment\nhttps://example.com/feed2.xml\nnot a url\nhttps://example.com/feed1.xml\n"
        )
        .unwrap();

        let feeds = load_feed_list(file.path()).unwrap();
        assert_eq!(
            feeds,
            vec!["https://example.com/feed1.xml", "https://example.com/feed2.xml"]
        );
    }

    #[test]
    fn test_empty_feed_list() {
        let file = tempfile::NamedTempFile::new().unwrap();
        assert!(load_feed_list(file.path()).unwrap().is_empty());
    }

    #[test]
    fn test_missing_file() {
        assert!(load_feed_list("/definitely/not/here.txt").is_err());
    }
}
