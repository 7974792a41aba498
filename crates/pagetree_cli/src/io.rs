//! JSON document collection files.
//!
//! A collection file is a JSON array of documents in the core's camelCase
//! shape (`id`, `title`, `parentId`, `order`, plus any opaque fields).

use anyhow::{Context, Result};
use pagetree_core::{Document, TreeNode};
use serde::Serialize;
use std::path::Path;

pub fn read_documents(path: &Path) -> Result<Vec<Document>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read documents file: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse documents file: {}", path.display()))
}

pub fn write_documents(path: &Path, documents: &[Document]) -> Result<()> {
    let content = serde_json::to_string_pretty(documents)?;
    std::fs::write(path, content + "\n")
        .with_context(|| format!("Failed to write documents file: {}", path.display()))
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Indented outline, two spaces per level.
pub fn render_outline(forest: &[TreeNode], untitled_label: &str) -> String {
    let mut out = String::new();
    let mut stack: Vec<(&TreeNode, usize)> = forest.iter().rev().map(|node| (node, 0)).collect();
    while let Some((node, depth)) = stack.pop() {
        out.push_str(&"  ".repeat(depth));
        out.push_str("- ");
        out.push_str(node.document.display_title_or(untitled_label));
        out.push('\n');
        stack.extend(node.children.iter().rev().map(|child| (child, depth + 1)));
    }
    out
}
