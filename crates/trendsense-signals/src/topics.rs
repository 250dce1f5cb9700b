//! Hashtag topic extraction.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;

static HASHTAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#([a-z0-9_]+)").expect("valid hashtag regex"));

/// Extract every `#word` token from `text`, lowercased and without the `#`.
///
/// A word is a run of ASCII letters, digits, and underscores. Matching is
/// done on the lowercased text, so `#MustHave` and `#musthave` collapse.
#[must_use]
pub fn extract_topics(text: &str) -> BTreeSet<String> {
    if text.is_empty() {
        return BTreeSet::new();
    }
    let lowered = text.to_lowercase();
    HASHTAG_RE
        .captures_iter(&lowered)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .collect()
}
