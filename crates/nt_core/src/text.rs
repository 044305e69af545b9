//! Headline text helpers shared by the filter, the labeler and the label synthesizer.

const STOPWORDS: &[&str] = &[
    "a", "about", "above", "according", "across", "after", "afterwards", "again", "against",
    "ago", "all", "almost", "along", "already", "also", "although", "always", "am", "among",
    "an", "and", "another", "any", "anyone", "anything", "are", "around", "as", "at", "back",
    "be", "became", "because", "become", "been", "before", "being", "below", "between", "both",
    "but", "by", "can", "cannot", "could", "did", "do", "does", "doing", "done", "down",
    "during", "each", "either", "else", "even", "ever", "every", "few", "first", "for",
    "from", "further", "get", "gets", "got", "had", "has", "have", "having", "he", "her",
    "here", "hers", "herself", "him", "himself", "his", "how", "however", "i", "if", "in",
    "into", "is", "it", "it's", "its", "itself", "just", "last", "least", "less", "like",
    "made", "make", "makes", "many", "may", "me", "might", "more", "most", "much", "must",
    "my", "myself", "new", "next", "no", "nor", "not", "now", "of", "off", "on", "once",
    "one", "only", "onto", "or", "other", "others", "our", "ours", "ourselves", "out", "over",
    "own", "per", "said", "same", "say", "says", "see", "she", "should", "since", "so",
    "some", "still", "such", "take", "than", "that", "that's", "the", "their", "theirs",
    "them", "themselves", "then", "there", "these", "they", "this", "those", "though",
    "through", "to", "too", "toward", "towards", "two", "under", "until", "up", "upon", "us",
    "very", "via", "vs", "was", "way", "we", "well", "were", "what", "when", "where",
    "whether", "which", "while", "who", "whom", "whose", "why", "will", "with", "within",
    "without", "would", "yet", "you", "your", "yours", "yourself", "yourselves",
];

pub fn is_stopword(word: &str) -> bool {
    let lower = word.to_lowercase();
    STOPWORDS.contains(&lower.as_str())
}

/// Case-folded, punctuation-free, whitespace-collapsed title used as the dedup key.
pub fn normalize_title(title: &str) -> String {
    let stripped: String = title
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() || c.is_whitespace() { c } else { ' ' })
        .collect();
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Lowercases and drops anything that cannot be part of a word.
///
/// Letters, apostrophes and in-word hyphens survive; digits, underscores and
/// other symbols are removed and dots become word breaks. When a title carries
/// more than one apostrophe they are treated as quotes and removed too.
pub fn clean_text(text: &str) -> String {
    let lowered = text.to_lowercase().replace("<i>", "").replace("</i>", "");
    let mut cleaned = String::with_capacity(lowered.len());
    for c in lowered.chars() {
        match c {
            c if c.is_alphabetic() => cleaned.push(c),
            '\'' | '\u{2019}' => cleaned.push('\''),
            '-' => cleaned.push('-'),
            '.' => cleaned.push(' '),
            c if c.is_whitespace() => cleaned.push(' '),
            _ => {}
        }
    }

    let apostrophes = cleaned.matches('\'').count();
    cleaned
        .split_whitespace()
        .map(|word| word.trim_matches('-'))
        .map(|word| {
            if apostrophes > 1 {
                word.replace('\'', "")
            } else {
                word.to_string()
            }
        })
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Cleaned, stop-word free terms of a headline.
pub fn content_terms(sentence: &str) -> Vec<String> {
    clean_text(sentence)
        .split(' ')
        .map(|w| w.trim_matches('\''))
        .filter(|w| w.chars().count() > 1 && !is_stopword(w))
        .map(str::to_string)
        .collect()
}

/// True when a label carries no content term at all.
pub fn is_degenerate_label(label: &str) -> bool {
    content_terms(label).is_empty()
}

/// Cuts `text` to at most `max_chars` characters, never splitting a char.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    let trimmed = text.trim();
    match trimmed.char_indices().nth(max_chars) {
        Some((idx, _)) => trimmed[..idx].trim_end().to_string(),
        None => trimmed.to_string(),
    }
}

/// Cosine similarity; a zero-norm vector is similar to nothing.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let mut dot = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;
    for (x, y) in a.iter().zip(b.iter()) {
        let (x, y) = (*x as f64, *y as f64);
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    (dot / (norm_a.sqrt() * norm_b.sqrt())) as f32
}
