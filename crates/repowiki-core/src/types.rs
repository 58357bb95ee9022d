//! Core data types shared across the scan/search/render pipeline.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kind of a node in the scanned content tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    /// A Markdown document.
    File,
    /// A directory with child nodes.
    Directory,
}

/// A node in the content tree reconstructed from the remote listing API.
///
/// `File` nodes never have children; `Directory` nodes keep their children in
/// the order the listing API returned them. The root node is synthesized
/// locally from the configured pages root rather than fetched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentNode {
    /// Entry name (directory name, or file name without its extension).
    pub name: String,
    /// Repository-relative, slash-separated path.
    pub path: String,
    /// File or directory.
    pub kind: NodeKind,
    /// Child nodes, directories only.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ContentNode>,
    /// Raw content address, files only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub download_url: Option<String>,
    /// File size in bytes, files only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
}

impl ContentNode {
    /// Creates an empty directory node.
    #[must_use]
    pub fn directory(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            kind: NodeKind::Directory,
            children: Vec::new(),
            download_url: None,
            size: None,
        }
    }

    /// Creates a file node carrying its content address and size.
    #[must_use]
    pub fn file(
        name: impl Into<String>,
        path: impl Into<String>,
        download_url: impl Into<String>,
        size: u64,
    ) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            kind: NodeKind::File,
            children: Vec::new(),
            download_url: Some(download_url.into()),
            size: Some(size),
        }
    }

    /// Whether this node is a file.
    #[must_use]
    pub fn is_file(&self) -> bool {
        self.kind == NodeKind::File
    }

    /// Number of directory nodes in this subtree, including this one when it
    /// is a directory.
    #[must_use]
    pub fn directory_count(&self) -> usize {
        if self.kind != NodeKind::Directory {
            return 0;
        }
        1 + self
            .children
            .iter()
            .map(ContentNode::directory_count)
            .sum::<usize>()
    }
}

/// A flattened page derived from a `File` node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRecord {
    /// Display title (file name without extension).
    pub title: String,
    /// Navigation identity: repo path minus the pages root and extension.
    pub logical_path: String,
    /// Address the raw page body can be fetched from.
    pub download_url: String,
    /// Size of the raw body in bytes.
    pub size: u64,
    /// First segment of the logical path, or the uncategorized label.
    pub category: String,
}

/// Label used for pages that live directly under the pages root.
pub const UNCATEGORIZED: &str = "uncategorized";

/// Summary numbers for a completed scan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WikiStats {
    /// Total pages discovered.
    pub pages: usize,
    /// Distinct categories among those pages.
    pub categories: usize,
    /// Directory nodes in the scanned tree (including the root).
    pub directories: usize,
    /// Sum of all page sizes in bytes.
    pub total_bytes: u64,
    /// When the scan that produced these numbers completed.
    pub captured_at: Option<DateTime<Utc>>,
}

impl WikiStats {
    /// Computes stats from a page list and the tree it came from.
    #[must_use]
    pub fn compute(
        pages: &[PageRecord],
        tree: Option<&ContentNode>,
        captured_at: Option<DateTime<Utc>>,
    ) -> Self {
        let mut categories: Vec<&str> = pages.iter().map(|p| p.category.as_str()).collect();
        categories.sort_unstable();
        categories.dedup();

        Self {
            pages: pages.len(),
            categories: categories.len(),
            directories: tree.map_or(0, ContentNode::directory_count),
            total_bytes: pages.iter().map(|p| p.size).sum(),
            captured_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_tree() -> ContentNode {
        let mut root = ContentNode::directory("pages", "pages");
        let mut guides = ContentNode::directory("guides", "pages/guides");
        guides.children.push(ContentNode::file(
            "intro",
            "pages/guides/intro.md",
            "https://raw.example.com/pages/guides/intro.md",
            120,
        ));
        root.children.push(guides);
        root.children.push(ContentNode::file(
            "home",
            "pages/home.md",
            "https://raw.example.com/pages/home.md",
            64,
        ));
        root
    }

    #[test]
    fn file_nodes_have_no_children() {
        let node = ContentNode::file("a", "pages/a.md", "u", 1);
        assert!(node.is_file());
        assert!(node.children.is_empty());
        assert_eq!(node.size, Some(1));
    }

    #[test]
    fn directory_count_includes_root() {
        let tree = sample_tree();
        assert_eq!(tree.directory_count(), 2);
        assert_eq!(ContentNode::file("a", "a.md", "u", 1).directory_count(), 0);
    }

    #[test]
    fn stats_dedupe_categories() {
        let pages = vec![
            PageRecord {
                title: "intro".into(),
                logical_path: "guides/intro".into(),
                download_url: "u1".into(),
                size: 120,
                category: "guides".into(),
            },
            PageRecord {
                title: "setup".into(),
                logical_path: "guides/setup".into(),
                download_url: "u2".into(),
                size: 30,
                category: "guides".into(),
            },
            PageRecord {
                title: "home".into(),
                logical_path: "home".into(),
                download_url: "u3".into(),
                size: 64,
                category: UNCATEGORIZED.into(),
            },
        ];
        let tree = sample_tree();
        let stats = WikiStats::compute(&pages, Some(&tree), None);
        assert_eq!(stats.pages, 3);
        assert_eq!(stats.categories, 2);
        assert_eq!(stats.directories, 2);
        assert_eq!(stats.total_bytes, 214);
    }
}
