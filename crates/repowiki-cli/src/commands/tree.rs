//! Tree command implementation: the navigation hierarchy.

use anyhow::Result;
use colored::Colorize;
use repowiki_core::{ContentNode, NodeKind, WikiSession};

/// Prints the scanned content tree, directories first-class, pages
/// indented beneath them.
pub async fn execute(session: &mut WikiSession) -> Result<()> {
    session.ensure_loaded().await?;

    match session.tree() {
        Some(root) => print_node(root, 0),
        None => println!("No structure cached yet. Run 'repowiki scan' first."),
    }
    Ok(())
}

fn print_node(node: &ContentNode, level: usize) {
    let indent = "  ".repeat(level);
    match node.kind {
        NodeKind::Directory => {
            println!("{indent}{}/", node.name.bold());
            for child in &node.children {
                print_node(child, level + 1);
            }
        }
        NodeKind::File => println!("{indent}{}", node.name.cyan()),
    }
}
