//! Flattens a scanned content tree into the linear page index.

use crate::config::{Config, DOC_EXTENSION};
use crate::types::{ContentNode, PageRecord, UNCATEGORIZED};
use std::collections::HashMap;
use tracing::warn;

/// Extracts one [`PageRecord`] per file node, in depth-first traversal
/// order.
///
/// The logical path is the node's repository path with the configured pages
/// root and the document extension stripped; the category is its first
/// segment when one exists. Two files normalizing to the same logical path
/// collide: the later one wins and the collision is logged.
#[must_use]
pub fn extract_pages(root: &ContentNode, config: &Config) -> Vec<PageRecord> {
    let prefix = format!("{}/", config.scan.pages_root.trim_matches('/'));

    let mut pages: Vec<PageRecord> = Vec::new();
    let mut by_logical_path: HashMap<String, usize> = HashMap::new();
    collect(root, &prefix, &mut pages, &mut by_logical_path);
    pages
}

fn collect(
    node: &ContentNode,
    prefix: &str,
    pages: &mut Vec<PageRecord>,
    by_logical_path: &mut HashMap<String, usize>,
) {
    if node.is_file() {
        let record = to_record(node, prefix);
        if let Some(&existing) = by_logical_path.get(&record.logical_path) {
            warn!(
                "'{}' and '{}' both resolve to '{}', keeping the latter",
                pages[existing].download_url, record.download_url, record.logical_path
            );
            pages[existing] = record;
        } else {
            by_logical_path.insert(record.logical_path.clone(), pages.len());
            pages.push(record);
        }
        return;
    }
    for child in &node.children {
        collect(child, prefix, pages, by_logical_path);
    }
}

fn to_record(node: &ContentNode, prefix: &str) -> PageRecord {
    let trimmed = node.path.strip_prefix(prefix).unwrap_or(&node.path);
    let logical_path = trimmed.strip_suffix(DOC_EXTENSION).unwrap_or(trimmed);

    let category = match logical_path.split_once('/') {
        Some((first, _)) => first.to_string(),
        None => UNCATEGORIZED.to_string(),
    };

    PageRecord {
        title: node.name.clone(),
        logical_path: logical_path.to_string(),
        download_url: node.download_url.clone().unwrap_or_default(),
        size: node.size.unwrap_or(0),
        category,
    }
}
