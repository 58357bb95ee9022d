//! Tree builder: reconstructs a hierarchical page tree from the flat
//! listings served by the remote contents API.
//!
//! The walk is sequential and depth-first, one listing request per
//! directory. A failed listing for a subdirectory drops only that subtree;
//! siblings and the overall build continue, and the omission is recorded as
//! a warning on the [`ScanOutcome`]. Only a failure at the configured pages
//! root escalates, and even that first falls back to scanning the
//! repository root for top-level documents.

use crate::config::{Config, DOC_EXTENSION};
use crate::source::{ContentSource, RemoteEntry};
use crate::types::ContentNode;
use crate::{Error, Result};
use std::future::Future;
use std::pin::Pin;
use tracing::{debug, warn};

/// Result of a repository scan: the content tree plus any warnings
/// accumulated while subtrees were dropped or limits were hit.
#[derive(Debug, Clone)]
pub struct ScanOutcome {
    /// Root of the reconstructed tree.
    pub root: ContentNode,
    /// Human-readable notes about omitted subtrees and pruned branches.
    pub warnings: Vec<String>,
    /// True when the pages root was unreachable and the repository root
    /// was scanned instead.
    pub used_fallback: bool,
}

struct WalkState {
    nodes: usize,
    max_nodes: usize,
    max_depth: usize,
    warnings: Vec<String>,
}

/// Builds the content tree rooted at the configured pages root.
///
/// See the module docs for the failure policy. Errors are returned only when
/// neither the pages root nor the repository-root fallback yields any
/// documents, or when the fallback listing itself cannot be fetched.
pub async fn build_tree(source: &dyn ContentSource, config: &Config) -> Result<ScanOutcome> {
    let root_path = config.scan.pages_root.trim_matches('/').to_string();

    match source.list(&root_path).await {
        Ok(entries) => {
            let mut state = WalkState {
                nodes: 1,
                max_nodes: config.scan.max_nodes,
                max_depth: config.scan.max_depth,
                warnings: Vec::new(),
            };
            let mut root = ContentNode::directory(root_name(&root_path), root_path);
            attach_children(source, &mut root, entries, 1, &mut state).await;
            Ok(ScanOutcome {
                root,
                warnings: state.warnings,
                used_fallback: false,
            })
        }
        Err(err) => {
            warn!(
                "pages root '{}' unavailable ({}), scanning repository root",
                root_path, err
            );
            fallback_root_scan(source, &root_path).await
        }
    }
}

fn root_name(root_path: &str) -> String {
    root_path
        .rsplit('/')
        .next()
        .filter(|s| !s.is_empty())
        .unwrap_or("root")
        .to_string()
}

fn document_stem(name: &str) -> Option<&str> {
    name.strip_suffix(DOC_EXTENSION).filter(|s| !s.is_empty())
}

fn file_node(entry: &RemoteEntry, stem: &str) -> Option<ContentNode> {
    let Some(url) = entry.download_url.as_deref() else {
        warn!("'{}' has no download address, skipping", entry.path);
        return None;
    };
    Some(ContentNode::file(
        stem,
        entry.path.clone(),
        url,
        entry.size.unwrap_or(0),
    ))
}

// Async recursion needs an explicitly boxed future.
fn attach_children<'a>(
    source: &'a dyn ContentSource,
    node: &'a mut ContentNode,
    entries: Vec<RemoteEntry>,
    depth: usize,
    state: &'a mut WalkState,
) -> Pin<Box<dyn Future<Output = ()> + Send + 'a>> {
    Box::pin(async move {
        for entry in entries {
            if state.nodes >= state.max_nodes {
                let note = format!(
                    "node budget of {} exhausted at '{}', remaining entries skipped",
                    state.max_nodes, entry.path
                );
                warn!("{}", note);
                state.warnings.push(note);
                return;
            }

            if entry.is_dir() {
                if depth >= state.max_depth {
                    let note = format!(
                        "'{}' exceeds the depth limit of {}, subtree skipped",
                        entry.path, state.max_depth
                    );
                    warn!("{}", note);
                    state.warnings.push(note);
                    continue;
                }

                match source.list(&entry.path).await {
                    Ok(child_entries) => {
                        let mut child = ContentNode::directory(entry.name.clone(), entry.path);
                        state.nodes += 1;
                        attach_children(source, &mut child, child_entries, depth + 1, state).await;
                        node.children.push(child);
                    }
                    Err(err) => {
                        // Partial results are expected: drop this subtree,
                        // keep scanning siblings.
                        let note = format!("could not list '{}': {}", entry.path, err);
                        warn!("{}", note);
                        state.warnings.push(note);
                    }
                }
            } else if entry.is_file() {
                let Some(stem) = document_stem(&entry.name) else {
                    debug!("ignoring non-document '{}'", entry.path);
                    continue;
                };
                if let Some(file) = file_node(&entry, stem) {
                    node.children.push(file);
                    state.nodes += 1;
                }
            }
        }
    })
}

/// Scans the repository root for top-level documents after the pages root
/// turned out to be unreachable. A reserved readme file is excluded. Yields
/// [`Error::NoContentFound`] when nothing qualifies.
async fn fallback_root_scan(source: &dyn ContentSource, root_path: &str) -> Result<ScanOutcome> {
    let entries = source.list("").await?;

    let mut root = ContentNode::directory(root_name(root_path), "");
    for entry in entries {
        if !entry.is_file() {
            continue;
        }
        let Some(stem) = document_stem(&entry.name) else {
            continue;
        };
        if stem.eq_ignore_ascii_case("readme") {
            continue;
        }
        if let Some(file) = file_node(&entry, stem) {
            root.children.push(file);
        }
    }

    if root.children.is_empty() {
        return Err(Error::NoContentFound(format!(
            "neither '{root_path}' nor the repository root contain any {DOC_EXTENSION} documents"
        )));
    }

    Ok(ScanOutcome {
        root,
        warnings: vec![format!(
            "pages root '{root_path}' unavailable, indexed top-level documents instead"
        )],
        used_fallback: true,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::testutil::MockSource;
    use crate::types::NodeKind;

    fn config() -> Config {
        let mut config = Config::default();
        config.set_repo_slug("octo/wiki").unwrap();
        config
    }

    #[tokio::test]
    async fn builds_nested_tree_in_listing_order() {
        let source = MockSource::new()
            .listing(
                "pages",
                vec![
                    MockSource::dir("pages/guides"),
                    MockSource::file("pages/home.md", 64),
                    MockSource::file("pages/image.png", 900),
                ],
            )
            .listing("pages/guides", vec![MockSource::file("pages/guides/intro.md", 120)]);

        let outcome = build_tree(&source, &config()).await.unwrap();
        assert!(!outcome.used_fallback);
        assert!(outcome.warnings.is_empty());

        let root = &outcome.root;
        assert_eq!(root.path, "pages");
        assert_eq!(root.kind, NodeKind::Directory);
        // Listing order preserved: the directory first, then home.md; the
        // png is ignored.
        assert_eq!(root.children.len(), 2);
        assert_eq!(root.children[0].name, "guides");
        assert_eq!(root.children[0].children[0].name, "intro");
        assert_eq!(root.children[1].name, "home");
        assert_eq!(root.children[1].size, Some(64));
    }

    #[tokio::test]
    async fn failed_subtree_is_dropped_but_siblings_survive() {
        let source = MockSource::new()
            .listing(
                "pages",
                vec![
                    MockSource::dir("pages/broken"),
                    MockSource::dir("pages/guides"),
                ],
            )
            .failing("pages/broken", 500)
            .listing("pages/guides", vec![MockSource::file("pages/guides/intro.md", 120)]);

        let outcome = build_tree(&source, &config()).await.unwrap();
        assert_eq!(outcome.root.children.len(), 1);
        assert_eq!(outcome.root.children[0].name, "guides");
        assert_eq!(outcome.warnings.len(), 1);
        assert!(outcome.warnings[0].contains("pages/broken"));
    }

    #[tokio::test]
    async fn missing_root_falls_back_to_repository_root() {
        let source = MockSource::new().failing("pages", 404).listing(
            "",
            vec![
                MockSource::file("README.md", 10),
                MockSource::file("notes.md", 30),
                MockSource::file("logo.svg", 5),
            ],
        );

        let outcome = build_tree(&source, &config()).await.unwrap();
        assert!(outcome.used_fallback);
        assert_eq!(outcome.root.children.len(), 1);
        assert_eq!(outcome.root.children[0].name, "notes");
    }

    #[tokio::test]
    async fn empty_fallback_is_no_content_found() {
        let source = MockSource::new()
            .failing("pages", 404)
            .listing("", vec![MockSource::file("README.md", 10)]);

        let err = build_tree(&source, &config()).await.unwrap_err();
        assert!(matches!(err, Error::NoContentFound(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn failing_fallback_is_fatal() {
        let source = MockSource::new().failing("pages", 404).failing("", 500);

        let err = build_tree(&source, &config()).await.unwrap_err();
        assert!(matches!(err, Error::Http { status: 500, .. }), "got {err:?}");
    }

    #[tokio::test]
    async fn depth_limit_prunes_with_warning() {
        let mut config = config();
        config.scan.max_depth = 1;

        let source = MockSource::new()
            .listing(
                "pages",
                vec![MockSource::dir("pages/deep"), MockSource::file("pages/home.md", 64)],
            )
            .listing("pages/deep", vec![MockSource::file("pages/deep/a.md", 1)]);

        let outcome = build_tree(&source, &config).await.unwrap();
        assert_eq!(outcome.root.children.len(), 1);
        assert_eq!(outcome.root.children[0].name, "home");
        assert!(outcome.warnings.iter().any(|w| w.contains("depth limit")));
    }

    #[tokio::test]
    async fn node_budget_stops_the_walk() {
        let mut config = config();
        config.scan.max_nodes = 2;

        let source = MockSource::new().listing(
            "pages",
            vec![
                MockSource::file("pages/a.md", 1),
                MockSource::file("pages/b.md", 1),
                MockSource::file("pages/c.md", 1),
            ],
        );

        let outcome = build_tree(&source, &config).await.unwrap();
        assert_eq!(outcome.root.children.len(), 1);
        assert!(outcome.warnings.iter().any(|w| w.contains("node budget")));
    }
}
