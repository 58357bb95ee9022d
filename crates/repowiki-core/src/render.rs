//! Markdown-to-markup conversion.
//!
//! A fixed, order-significant pipeline of pattern substitutions: headings
//! (most specific first, so `###` is never swallowed by the `#` pattern),
//! bold before italic (a lone-asterisk pattern must not eat the pairs bold
//! already consumed), code, images, links, wiki links, rules, lists, then
//! paragraph folding. Code-span and fence bodies are HTML-escaped and
//! parked behind opaque placeholders until the very end, so no later step
//! ever rewrites them.
//!
//! Deliberately not a real parser: nested emphasis, nested lists, tables,
//! and backslash escapes are out of scope for the restricted dialect the
//! wiki corpus uses.

use crate::config::Config;
use crate::deeplink::ViewState;
use crate::types::PageRecord;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

#[allow(clippy::expect_used)]
fn pattern(re: &str) -> Regex {
    Regex::new(re).expect("hard-coded pattern must compile")
}

static FENCE: Lazy<Regex> = Lazy::new(|| pattern(r"(?s)```([A-Za-z0-9_+-]*)\n(.*?)\n?```"));
static H3: Lazy<Regex> = Lazy::new(|| pattern(r"(?m)^### (.+)$"));
static H2: Lazy<Regex> = Lazy::new(|| pattern(r"(?m)^## (.+)$"));
static H1: Lazy<Regex> = Lazy::new(|| pattern(r"(?m)^# (.+)$"));
static BOLD: Lazy<Regex> = Lazy::new(|| pattern(r"\*\*([^\n]+?)\*\*"));
static ITALIC: Lazy<Regex> = Lazy::new(|| pattern(r"\*([^*\n]+)\*"));
static INLINE_CODE: Lazy<Regex> = Lazy::new(|| pattern(r"`([^`\n]+)`"));
static IMAGE: Lazy<Regex> = Lazy::new(|| pattern(r"!\[([^\]]*)\]\(([^)\s]+)\)"));
static EXTERNAL_LINK: Lazy<Regex> = Lazy::new(|| pattern(r"\[([^\]]+)\]\((https?://[^)\s]+)\)"));
static WIKI_LINK: Lazy<Regex> = Lazy::new(|| pattern(r"\[\[([^\[\]]+)\]\]"));
static RULE: Lazy<Regex> = Lazy::new(|| pattern(r"(?m)^-{3,}\s*$"));
static LIST_ITEM: Lazy<Regex> = Lazy::new(|| pattern(r"(?m)^- (.+)$"));
static LIST_RUN: Lazy<Regex> = Lazy::new(|| pattern(r"(?m)(?:^<li>.*</li>$\n?)+"));
static BLANK_LINES: Lazy<Regex> = Lazy::new(|| pattern(r"\n[ \t]*\n+"));

// Placeholders use a control character that cannot appear in page bodies
// fetched as text.
const STASH_MARK: char = '\u{1A}';

/// Renders wiki Markdown into presentational markup.
///
/// Internal wiki links are resolved against the page index the renderer was
/// built with; the emitted anchors carry the target's logical path as data
/// (`href="?page=…"` plus `data-page`), leaving action binding to the
/// presentation layer.
pub struct Renderer<'a> {
    pages: &'a [PageRecord],
    image_base: String,
}

impl<'a> Renderer<'a> {
    /// Creates a renderer resolving wiki links against `pages` and relative
    /// image sources against the configured raw-content base joined with
    /// the pages root.
    #[must_use]
    pub fn new(pages: &'a [PageRecord], config: &Config) -> Self {
        Self {
            pages,
            image_base: format!(
                "{}/{}",
                config.raw_base(),
                config.scan.pages_root.trim_matches('/')
            ),
        }
    }

    /// Converts one Markdown document to markup.
    #[must_use]
    pub fn render(&self, markdown: &str) -> String {
        let mut stash: Vec<String> = Vec::new();

        // Fence and code-span bodies leave the pipeline here and come back
        // verbatim after the last step.
        let mut html = FENCE
            .replace_all(markdown, |caps: &Captures<'_>| {
                let lang = &caps[1];
                let body = html_escape::encode_text(&caps[2]);
                let block = if lang.is_empty() {
                    format!("<pre><code>{body}</code></pre>")
                } else {
                    format!("<pre><code class=\"language-{lang}\">{body}</code></pre>")
                };
                stash_token(&mut stash, block)
            })
            .into_owned();

        html = H3.replace_all(&html, "<h3>$1</h3>").into_owned();
        html = H2.replace_all(&html, "<h2>$1</h2>").into_owned();
        html = H1.replace_all(&html, "<h1>$1</h1>").into_owned();

        html = BOLD.replace_all(&html, "<strong>$1</strong>").into_owned();
        html = ITALIC.replace_all(&html, "<em>$1</em>").into_owned();

        html = INLINE_CODE
            .replace_all(&html, |caps: &Captures<'_>| {
                let body = html_escape::encode_text(&caps[1]);
                stash_token(&mut stash, format!("<code>{body}</code>"))
            })
            .into_owned();

        html = IMAGE
            .replace_all(&html, |caps: &Captures<'_>| {
                let alt = html_escape::encode_double_quoted_attribute(&caps[1]);
                let src = self.resolve_image(&caps[2]);
                format!("<img src=\"{src}\" alt=\"{alt}\">")
            })
            .into_owned();

        html = EXTERNAL_LINK
            .replace_all(
                &html,
                "<a href=\"$2\" target=\"_blank\" rel=\"noopener\">$1</a>",
            )
            .into_owned();

        html = WIKI_LINK
            .replace_all(&html, |caps: &Captures<'_>| self.wiki_link(&caps[1]))
            .into_owned();

        html = RULE.replace_all(&html, "<hr>").into_owned();

        html = LIST_ITEM.replace_all(&html, "<li>$1</li>").into_owned();
        html = LIST_RUN
            .replace_all(&html, |caps: &Captures<'_>| {
                format!("<ul>{}</ul>", caps[0].trim_end_matches('\n'))
            })
            .into_owned();

        html = fold_paragraphs(&html);

        restore_stash(&html, &stash)
    }

    fn resolve_image(&self, src: &str) -> String {
        if src.starts_with("http://") || src.starts_with("https://") {
            src.to_string()
        } else {
            format!("{}/{}", self.image_base, src.trim_start_matches('/'))
        }
    }

    // Exact match against title or logical path; unresolved names become an
    // inert span instead of a dead link.
    fn wiki_link(&self, name: &str) -> String {
        let target = self
            .pages
            .iter()
            .find(|p| p.title == name || p.logical_path == name);

        match target {
            Some(page) => {
                let query = ViewState::Page(page.logical_path.clone()).to_query();
                let data = html_escape::encode_double_quoted_attribute(&page.logical_path);
                format!("<a href=\"{query}\" data-page=\"{data}\">{name}</a>")
            }
            None => {
                format!("<span class=\"page-missing\" title=\"page not found\">{name}</span>")
            }
        }
    }
}

fn stash_token(stash: &mut Vec<String>, rendered: String) -> String {
    stash.push(rendered);
    format!("{STASH_MARK}{}{STASH_MARK}", stash.len() - 1)
}

fn restore_stash(html: &str, stash: &[String]) -> String {
    let mut result = html.to_string();
    for (i, rendered) in stash.iter().enumerate() {
        result = result.replace(&format!("{STASH_MARK}{i}{STASH_MARK}"), rendered);
    }
    result
}

// Blank-line-separated blocks become paragraphs; remaining single newlines
// become line breaks unless they sit on a tag boundary. Blocks that already
// start with a block-level construct (or a stashed fence) pass through
// unwrapped, which keeps rendering idempotent on already-converted text.
fn fold_paragraphs(html: &str) -> String {
    let mut out: Vec<String> = Vec::new();

    for block in BLANK_LINES.split(html) {
        let block = block.trim();
        if block.is_empty() {
            continue;
        }
        if block.starts_with('<') || block.starts_with(STASH_MARK) {
            out.push(join_lines(block));
        } else {
            out.push(format!("<p>{}</p>", join_lines(block)));
        }
    }

    out.join("\n")
}

fn join_lines(block: &str) -> String {
    let lines: Vec<&str> = block.lines().map(str::trim_end).collect();
    let mut result = String::new();

    for (i, line) in lines.iter().enumerate() {
        if i > 0 {
            let prev = lines[i - 1];
            let structural = prev.ends_with('>') || line.starts_with('<');
            result.push_str(if structural { "\n" } else { "<br>" });
        }
        result.push_str(line);
    }
    result
}

/// Strips markdown syntax for plain-text uses (search snippets), leaving
/// whitespace-collapsed prose.
#[must_use]
pub fn strip_markdown(text: &str) -> String {
    let mut s = FENCE.replace_all(text, " $2 ").into_owned();
    s = IMAGE.replace_all(&s, "$1").into_owned();
    s = EXTERNAL_LINK.replace_all(&s, "$1").into_owned();
    s = WIKI_LINK.replace_all(&s, "$1").into_owned();
    s = RULE.replace_all(&s, " ").into_owned();
    s = LIST_ITEM.replace_all(&s, "$1").into_owned();
    let s: String = s
        .chars()
        .filter(|c| !matches!(c, '#' | '*' | '`'))
        .collect();
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
