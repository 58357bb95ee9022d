//! In-memory search over the page index.
//!
//! The index holds one normalized text blob per page (title, logical path,
//! category, and an optional content snippet fetched lazily at build time).
//! Queries are answered by a deterministic scorer combining exact,
//! substring, and edit-distance matches; see [`SearchIndex::query`].

use crate::config::IndexConfig;
use crate::render::strip_markdown;
use crate::source::ContentSource;
use crate::types::PageRecord;
use tracing::{debug, warn};

/// Punctuation removed during normalization.
const PUNCTUATION: &[char] = &[
    '.', ',', ';', ':', '!', '?', '\'', '"', '(', ')', '[', ']', '{', '}', '#', '*', '`', '~',
    '|', '<', '>',
];

/// One indexed page.
#[derive(Debug, Clone)]
pub struct SearchIndexEntry {
    /// The page this entry indexes.
    pub page: PageRecord,
    /// Lowercased, punctuation-stripped, whitespace-collapsed concatenation
    /// of title, logical path, category, and snippet.
    pub normalized: String,
    /// First characters of the fetched, markdown-stripped body; empty when
    /// the body was not fetched (or could not be).
    pub snippet: String,
}

/// A scored query hit.
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// The matching page.
    pub page: PageRecord,
    /// Accumulated match score; always positive.
    pub score: u32,
    /// Context around the first snippet match, empty when no snippet exists.
    pub excerpt: String,
}

/// The wholesale-built search index. Rebuilt per scan, never partially
/// mutated.
#[derive(Debug, Clone, Default)]
pub struct SearchIndex {
    entries: Vec<SearchIndexEntry>,
}

impl SearchIndex {
    /// Builds the index from a page list, fetching content snippets for at
    /// most `limits.max_content_pages` pages, sequentially.
    ///
    /// A failed body fetch degrades that page to metadata-only indexing;
    /// it never aborts the build.
    pub async fn build(
        pages: &[PageRecord],
        source: &dyn ContentSource,
        limits: &IndexConfig,
    ) -> Self {
        let mut entries = Vec::with_capacity(pages.len());

        for (position, page) in pages.iter().enumerate() {
            let snippet = if position < limits.max_content_pages {
                match source.fetch_raw(&page.download_url).await {
                    Ok(body) => truncate_chars(&strip_markdown(&body), limits.snippet_chars),
                    Err(err) => {
                        warn!(
                            "indexing '{}' without content ({})",
                            page.logical_path, err
                        );
                        String::new()
                    }
                }
            } else {
                String::new()
            };

            let normalized = normalize(&format!(
                "{} {} {} {}",
                page.title, page.logical_path, page.category, snippet
            ));
            entries.push(SearchIndexEntry {
                page: page.clone(),
                normalized,
                snippet,
            });
        }

        debug!("indexed {} pages", entries.len());
        Self { entries }
    }

    /// Number of indexed pages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the index is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Answers a query with a scored, ranked result list.
    ///
    /// Scoring is additive, higher wins:
    ///
    /// - exact (case-insensitive) equality with the title `+100` or the
    ///   logical path `+90`
    /// - substring containment in the title `+60`, logical path `+40`,
    ///   category `+20`, or the full normalized text `+15`
    /// - fuzzy bonus from the edit distance between the first query token
    ///   and the closest entry token: distance `<= 1` gives `+15`, distance
    ///   `2` gives `+8`
    ///
    /// Zero-score entries are excluded. Ties order by logical path
    /// ascending, making the result fully deterministic for a fixed index.
    #[must_use]
    pub fn query(&self, raw_query: &str) -> Vec<SearchResult> {
        let query = normalize(raw_query);
        if query.is_empty() {
            return Vec::new();
        }

        let mut results: Vec<SearchResult> = self
            .entries
            .iter()
            .filter_map(|entry| {
                let score = score_entry(entry, &query);
                if score == 0 {
                    return None;
                }
                let excerpt = if entry.snippet.is_empty() {
                    String::new()
                } else {
                    excerpt(&entry.snippet, raw_query, 50, 100)
                };
                Some(SearchResult {
                    page: entry.page.clone(),
                    score,
                    excerpt,
                })
            })
            .collect();

        results.sort_by(|a, b| {
            b.score
                .cmp(&a.score)
                .then_with(|| a.page.logical_path.cmp(&b.page.logical_path))
        });
        results
    }
}

/// Substring-only lookup over bare page metadata, for use before an index
/// has been built. No snippets, no fuzzy matching; preserves page order.
#[must_use]
pub fn quick_query(pages: &[PageRecord], raw_query: &str) -> Vec<PageRecord> {
    let query = raw_query.trim().to_lowercase();
    if query.is_empty() {
        return Vec::new();
    }
    pages
        .iter()
        .filter(|page| {
            page.title.to_lowercase().contains(&query)
                || page.logical_path.to_lowercase().contains(&query)
                || page.category.to_lowercase().contains(&query)
        })
        .cloned()
        .collect()
}

fn score_entry(entry: &SearchIndexEntry, query: &str) -> u32 {
    let mut score = 0;

    let title = normalize(&entry.page.title);
    let path = normalize(&entry.page.logical_path);
    let category = normalize(&entry.page.category);

    if query == title {
        score += 100;
    }
    if query == path {
        score += 90;
    }
    if title.contains(query) {
        score += 60;
    }
    if path.contains(query) {
        score += 40;
    }
    if category.contains(query) {
        score += 20;
    }
    if entry.normalized.contains(query) {
        score += 15;
    }

    if let Some(token) = query.split_whitespace().next() {
        score += fuzzy_bonus(token, &entry.normalized);
    }

    score
}

/// Fuzzy bonus for `token` against the closest-length tokens of
/// `normalized`: `+15` at edit distance one or less, `+8` at two.
fn fuzzy_bonus(token: &str, normalized: &str) -> u32 {
    let token_len = token.chars().count();
    let mut best = usize::MAX;

    for candidate in normalized.split_whitespace() {
        let candidate_len = candidate.chars().count();
        if candidate_len.abs_diff(token_len) > 2 {
            continue;
        }
        best = best.min(edit_distance(token, candidate));
        if best == 0 {
            break;
        }
    }

    match best {
        0 | 1 => 15,
        2 => 8,
        _ => 0,
    }
}

/// Classic insert/delete/substitute edit distance over characters.
#[must_use]
pub fn edit_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for (i, &ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, &cb) in b.iter().enumerate() {
            let substitute = prev[j] + usize::from(ca != cb);
            let delete = prev[j + 1] + 1;
            let insert = curr[j] + 1;
            curr[j + 1] = substitute.min(delete).min(insert);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

/// Lowercases, strips the punctuation set, and collapses whitespace runs to
/// single spaces.
#[must_use]
pub fn normalize(text: &str) -> String {
    let lowered: String = text
        .to_lowercase()
        .chars()
        .filter(|c| !PUNCTUATION.contains(c))
        .collect();
    lowered.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Truncates to at most `max_chars` characters, on a character boundary.
#[must_use]
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

/// Context window around the first case-insensitive occurrence of `query`
/// in `content`, with ellipses marking trimmed ends. Falls back to the head
/// of the content when the query does not occur.
#[must_use]
pub fn excerpt(content: &str, query: &str, before: usize, after: usize) -> String {
    let haystack = content.to_lowercase();
    let needle = query.trim().to_lowercase();

    let Some(pos) = (!needle.is_empty())
        .then(|| haystack.find(&needle))
        .flatten()
    else {
        let head = truncate_chars(content, before + after);
        return if head.len() < content.len() {
            format!("{head}...")
        } else {
            head
        };
    };

    let start = floor_char_boundary(content, pos.saturating_sub(before));
    let end = ceil_char_boundary(content, (pos + needle.len() + after).min(content.len()));

    let mut result = String::new();
    if start > 0 {
        result.push_str("...");
    }
    result.push_str(&content[start..end]);
    if end < content.len() {
        result.push_str("...");
    }
    result
}

fn floor_char_boundary(s: &str, mut index: usize) -> usize {
    index = index.min(s.len());
    while index > 0 && !s.is_char_boundary(index) {
        index -= 1;
    }
    index
}

fn ceil_char_boundary(s: &str, mut index: usize) -> usize {
    index = index.min(s.len());
    while index < s.len() && !s.is_char_boundary(index) {
        index += 1;
    }
    index
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::testutil::MockSource;

    fn page(title: &str, logical_path: &str, category: &str) -> PageRecord {
        PageRecord {
            title: title.to_string(),
            logical_path: logical_path.to_string(),
            download_url: format!("https://raw.example.com/{logical_path}.md"),
            size: 100,
            category: category.to_string(),
        }
    }

    fn metadata_entry(title: &str, logical_path: &str, category: &str) -> SearchIndexEntry {
        let page = page(title, logical_path, category);
        let normalized = normalize(&format!(
            "{} {} {} ",
            page.title, page.logical_path, page.category
        ));
        SearchIndexEntry {
            page,
            normalized,
            snippet: String::new(),
        }
    }

    fn index_of(entries: Vec<SearchIndexEntry>) -> SearchIndex {
        SearchIndex { entries }
    }

    #[test]
    fn normalize_lowercases_strips_and_collapses() {
        assert_eq!(normalize("  Hello,   World!  "), "hello world");
        assert_eq!(normalize("Getting*Started#Guide"), "gettingstartedguide");
        assert_eq!(normalize("a\tb\nc"), "a b c");
    }

    #[test]
    fn edit_distance_classic_cases() {
        assert_eq!(edit_distance("python", "python"), 0);
        assert_eq!(edit_distance("pythn", "python"), 1);
        assert_eq!(edit_distance("pyton", "python"), 1);
        assert_eq!(edit_distance("pithon", "python"), 1);
        assert_eq!(edit_distance("kitten", "sitting"), 3);
        assert_eq!(edit_distance("", "abc"), 3);
        assert_eq!(edit_distance("abc", ""), 3);
    }

    #[test]
    fn exact_title_outranks_substring_outranks_miss() {
        let index = index_of(vec![
            metadata_entry("Python", "langs/python", "langs"),
            metadata_entry("Python Basics", "langs/python-basics", "langs"),
            metadata_entry("Snakes", "animals/snakes", "animals"),
        ]);

        let results = index.query("python");
        assert_eq!(results.len(), 2, "'Snakes' must not match");
        assert_eq!(results[0].page.title, "Python");
        assert_eq!(results[1].page.title, "Python Basics");
        assert!(results[0].score > results[1].score);
    }

    #[test]
    fn fuzzy_single_deletion_matches_but_garbage_does_not() {
        let index = index_of(vec![metadata_entry("Python", "langs/python", "langs")]);

        let close = index.query("pythn");
        assert_eq!(close.len(), 1);
        assert!(close[0].score >= 15);

        assert!(index.query("zzzzz").is_empty());
    }

    #[test]
    fn distance_two_scores_lower_than_distance_one() {
        let index = index_of(vec![metadata_entry("Python", "langs/python", "langs")]);
        let one = index.query("pythn")[0].score;
        let two = index.query("pthn")[0].score;
        assert_eq!(one, 15);
        assert_eq!(two, 8);
    }

    #[test]
    fn ties_break_by_logical_path_ascending() {
        let index = index_of(vec![
            metadata_entry("Guide", "zeta/guide", "zeta"),
            metadata_entry("Guide", "alpha/guide", "alpha"),
        ]);

        let results = index.query("guide");
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].score, results[1].score);
        assert_eq!(results[0].page.logical_path, "alpha/guide");
    }

    #[test]
    fn query_is_deterministic() {
        let index = index_of(vec![
            metadata_entry("One", "a/one", "a"),
            metadata_entry("Two", "b/two", "b"),
            metadata_entry("One Two", "c/one-two", "c"),
        ]);
        let first: Vec<String> = index
            .query("one")
            .into_iter()
            .map(|r| r.page.logical_path)
            .collect();
        let second: Vec<String> = index
            .query("one")
            .into_iter()
            .map(|r| r.page.logical_path)
            .collect();
        assert_eq!(first, second);
    }

    #[test]
    fn empty_query_yields_nothing() {
        let index = index_of(vec![metadata_entry("Python", "langs/python", "langs")]);
        assert!(index.query("").is_empty());
        assert!(index.query("   ").is_empty());
    }

    #[tokio::test]
    async fn build_fetches_snippets_and_degrades_on_failure() {
        let pages = vec![
            page("Home", "home", "uncategorized"),
            page("Broken", "broken", "uncategorized"),
        ];
        let source =
            MockSource::new().body("home.md", "# Home\n\nWelcome to the **wiki** garden.");

        let limits = IndexConfig {
            max_content_pages: 10,
            snippet_chars: 100,
        };
        let index = SearchIndex::build(&pages, &source, &limits).await;

        assert_eq!(index.len(), 2);
        assert!(index.entries[0].snippet.contains("wiki garden"));
        assert!(
            index.entries[0].snippet.find('#').is_none(),
            "snippet must be markdown-stripped"
        );
        assert!(index.entries[1].snippet.is_empty());

        // Content-only terms are findable through the snippet.
        let results = index.query("garden");
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].page.title, "Home");
    }

    #[tokio::test]
    async fn build_caps_content_fetches() {
        let pages: Vec<PageRecord> = (0..5)
            .map(|i| page(&format!("P{i}"), &format!("p{i}"), "uncategorized"))
            .collect();
        let source = pages.iter().fold(MockSource::new(), |source, p| {
            source.body(&format!("{}.md", p.logical_path), &format!("body of {}", p.title))
        });

        let limits = IndexConfig {
            max_content_pages: 2,
            snippet_chars: 100,
        };
        let index = SearchIndex::build(&pages, &source, &limits).await;

        let with_content = index
            .entries
            .iter()
            .filter(|e| !e.snippet.is_empty())
            .count();
        assert_eq!(with_content, 2);
    }

    #[test]
    fn quick_query_is_substring_only() {
        let pages = vec![
            page("Python", "langs/python", "langs"),
            page("Snakes", "animals/snakes", "animals"),
        ];
        let hits = quick_query(&pages, "PYTH");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].title, "Python");

        // No fuzzy matching in the fallback mode.
        assert!(quick_query(&pages, "pythn").is_empty());
    }

    #[test]
    fn excerpt_windows_around_the_match() {
        let content = "a".repeat(200) + " needle " + &"b".repeat(200);
        let result = excerpt(&content, "needle", 20, 20);
        assert!(result.starts_with("..."));
        assert!(result.ends_with("..."));
        assert!(result.contains("needle"));
        assert!(result.len() < 80);
    }

    #[test]
    fn excerpt_falls_back_to_the_head() {
        let content = "short body with no match in it";
        let result = excerpt(content, "zzz", 50, 100);
        assert_eq!(result, content);
    }
}
