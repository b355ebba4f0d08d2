//! Finding component files and stylesheets on disk, and locating style sections in markup.
//!
//! Discovery mirrors a `**/*.ext` glob: recursive, hidden entries skipped, nothing
//! else filtered. Locating parses the component with its format's tree-sitter grammar
//! and reports each top-level style element with byte-accurate content offsets.

use crate::error::MigrateError;
use crate::formats::Format;
use crate::section::StyleSection;
use ignore::WalkBuilder;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use streaming_iterator::StreamingIterator;
use tree_sitter::{Node, Parser, Query, QueryCursor};

/// Recursively collect regular files under `root` whose extension is one of `extensions`.
///
/// Results are sorted by path so runs are deterministic.
///
/// # Errors
///
/// Returns `Discovery` if the directory walk fails.
pub fn find_files(root: &Path, extensions: &[String]) -> Result<Vec<PathBuf>, MigrateError> {
    let mut builder = WalkBuilder::new(root);
    builder.standard_filters(false);
    builder.hidden(true);

    let mut files = Vec::new();
    for entry in builder.build() {
        let entry = entry?;
        if !entry.file_type().is_some_and(|t| t.is_file()) {
            continue;
        }
        let matches = entry
            .path()
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| extensions.iter().any(|wanted| wanted == ext));
        if matches {
            files.push(entry.into_path());
        }
    }
    files.sort();
    Ok(files)
}

/// Locate the top-level style sections of a component file, in document order.
///
/// Style elements without content are skipped.
///
/// # Errors
///
/// Returns `Parse` if the grammar cannot be loaded or produces no tree, and
/// `MalformedStyleElement` if a style element is unterminated, has a broken start tag,
/// or holds anything but a single text node.
pub fn extract_style_sections<F: Format>(
    source: &str,
    format: &F,
    path: &Path,
) -> Result<Vec<StyleSection>, MigrateError> {
    let parse_error = |message: String| MigrateError::Parse {
        path: path.to_path_buf(),
        message,
    };

    let language = format.language();
    let mut parser = Parser::new();
    parser
        .set_language(&language)
        .map_err(|e| parse_error(e.to_string()))?;
    let tree = parser
        .parse(source, None)
        .ok_or_else(|| parse_error("parser returned no tree".to_string()))?;

    reject_unparsed_style_elements(tree.root_node(), source, path)?;

    let query =
        Query::new(&language, format.style_query()).map_err(|e| parse_error(e.to_string()))?;
    let mut cursor = QueryCursor::new();
    let mut matches = cursor.matches(&query, tree.root_node(), source.as_bytes());

    let mut elements = Vec::new();
    while let Some(m) = matches.next() {
        for capture in m.captures {
            elements.push(capture.node);
        }
    }
    elements.sort_by_key(Node::start_byte);
    elements.dedup_by_key(|n| n.start_byte());

    let mut sections = Vec::new();
    for element in elements {
        if let Some(section) = read_style_element(element, source, sections.len(), path)? {
            sections.push(section);
        }
    }
    Ok(sections)
}

/// Fail on style elements the grammar could only recover from, such as a missing end
/// tag or a broken start tag. Those never reach the style query and would otherwise be
/// skipped without notice.
fn reject_unparsed_style_elements(
    root: Node<'_>,
    source: &str,
    path: &Path,
) -> Result<(), MigrateError> {
    let mut walker = root.walk();
    let mut pending = vec![root];
    while let Some(node) = pending.pop() {
        if !node.has_error() {
            continue;
        }
        let broken = node.kind() == "style_element"
            || (node.is_error()
                && source
                    .get(node.byte_range())
                    .is_some_and(|text| text.to_ascii_lowercase().contains("<style")));
        if broken {
            let start = node.start_position();
            return Err(MigrateError::MalformedStyleElement {
                path: path.to_path_buf(),
                reason: format!(
                    "unterminated or invalid style element at {}:{}",
                    start.row + 1,
                    start.column + 1
                ),
            });
        }
        pending.extend(node.children(&mut walker));
    }
    Ok(())
}

fn read_style_element(
    element: Node<'_>,
    source: &str,
    index: usize,
    path: &Path,
) -> Result<Option<StyleSection>, MigrateError> {
    let malformed = |reason: &str| MigrateError::MalformedStyleElement {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    };

    let mut walker = element.walk();
    let mut attributes = HashMap::new();
    let mut content = Vec::new();
    for child in element.named_children(&mut walker) {
        match child.kind() {
            "start_tag" => attributes = read_attributes(child, source),
            "end_tag" => {}
            // zero-width raw text is how the grammar spells an empty element
            "raw_text" if child.byte_range().is_empty() => {}
            _ => content.push(child),
        }
    }

    match content.as_slice() {
        [] => Ok(None),
        [text] if text.kind() == "raw_text" => Ok(Some(StyleSection {
            content: source[text.byte_range()].to_string(),
            attributes,
            byte_start: text.start_byte(),
            byte_end: text.end_byte(),
            index,
        })),
        [_] => Err(malformed("expected text node as style element child")),
        _ => Err(malformed("unexpected multiple children of style element")),
    }
}

fn read_attributes(start_tag: Node<'_>, source: &str) -> HashMap<String, Option<String>> {
    let mut attributes = HashMap::new();
    let mut walker = start_tag.walk();
    for attribute in start_tag.named_children(&mut walker) {
        if attribute.kind() != "attribute" {
            continue;
        }
        let mut name = None;
        let mut value = None;
        let mut parts = attribute.walk();
        for part in attribute.named_children(&mut parts) {
            match part.kind() {
                "attribute_name" => name = Some(source[part.byte_range()].to_string()),
                "attribute_value" => value = Some(source[part.byte_range()].to_string()),
                "quoted_attribute_value" => {
                    let mut inner = part.walk();
                    let text = part
                        .named_children(&mut inner)
                        .find(|n| n.kind() == "attribute_value")
                        .map(|n| source[n.byte_range()].to_string());
                    value = Some(text.unwrap_or_default());
                }
                _ => {}
            }
        }
        if let Some(name) = name {
            attributes.insert(name, value);
        }
    }
    attributes
}

#[cfg(test)]
#[path = "tests/input.rs"]
mod tests;
