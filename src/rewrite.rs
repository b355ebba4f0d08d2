//! Rewrites legacy deep selectors into the `:deep` pseudo-class form.
//!
//! Two passes run over every style rule, in this order:
//!
//! 1. Legacy combinators (`>>>` and `/deep/`) become a `:deep` pseudo-class flanked by
//!    descendant combinators wherever it sits between compounds.
//! 2. If a direct child rule glues a tag straight onto the nesting placeholder
//!    (`&-suffix`, `&__elem`), each branch of this rule that ends on `:deep(<one selector>)`
//!    has the argument hoisted out (`:deep .x`), because `:deep(.x)-suffix` cannot be
//!    expressed. When every branch is unfixable the concatenating children are dropped.
//!
//! Both passes are idempotent.

use crate::error::MigrateError;
use crate::selector::{NodeId, PseudoArgument, SelectorKind, SelectorTree};
use crate::style_lang::StyleLang;
use crate::stylesheet::{Node, Rule, Stylesheet};
use std::fs;
use std::path::Path;

/// Combinator spellings replaced by `:deep`.
pub const LEGACY_DEEP_COMBINATORS: &[&str] = &[">>>", "/deep/"];

/// Name of the deep pseudo-class.
pub const DEEP_PSEUDO: &str = ":deep";

/// Some selector branches can be fixed and some cannot.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("some but not all selectors end on a deep pseudo-class, cannot fix automatically: {selector}")]
pub struct UnfixableSelector {
    /// The rule's selector after combinator normalization.
    pub selector: String,
}

/// Result of trying to make one branch accept a concatenating nested selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FixOutcome {
    /// The branch did not end on a pseudo-class that needs fixing.
    OriginalValid,
    /// The trailing `:deep(...)` argument was hoisted to the top level.
    Fixed,
    /// The branch ends on a `:deep` without exactly one argument selector.
    Unfixable,
}

/// Read, rewrite and (if anything changed) write back a stylesheet file.
///
/// Returns whether the file was modified. A failing file is never partially written.
///
/// # Errors
///
/// Returns `UnknownStyleLanguage` for an unexpected extension, `Io` on read/write
/// failures and `UnfixableSelectorAmbiguity` when a rule cannot be fixed unambiguously.
pub fn rewrite_stylesheet_file(path: &Path) -> Result<bool, MigrateError> {
    let lang = StyleLang::from_path(path)?;
    let source = fs::read_to_string(path).map_err(|e| MigrateError::io(path, e))?;
    let output = rewrite_source(&source, lang).map_err(|e| {
        MigrateError::UnfixableSelectorAmbiguity {
            path: path.to_path_buf(),
            selector: e.selector,
        }
    })?;
    if output == source {
        tracing::debug!(path = %path.display(), "selectors already canonical");
        return Ok(false);
    }
    fs::write(path, output).map_err(|e| MigrateError::io(path, e))?;
    Ok(true)
}

/// Rewrite every rule of a stylesheet given as text.
///
/// # Errors
///
/// Returns `UnfixableSelector` when some branches of a rule are fixable and others not.
pub fn rewrite_source(source: &str, lang: StyleLang) -> Result<String, UnfixableSelector> {
    let mut sheet = Stylesheet::parse(source, lang);
    rewrite_nodes(&mut sheet.nodes)?;
    Ok(sheet.to_string())
}

/// Rewrite all rules among `nodes`, parents before their children.
///
/// # Errors
///
/// Propagates the first `UnfixableSelector`.
pub fn rewrite_nodes(nodes: &mut [Node]) -> Result<(), UnfixableSelector> {
    for node in nodes {
        match node {
            Node::Rule(rule) => {
                rewrite_rule(rule)?;
                rewrite_nodes(&mut rule.nodes)?;
            }
            Node::Block(block) => rewrite_nodes(&mut block.nodes)?,
            Node::Text(_) => {}
        }
    }
    Ok(())
}

/// Rewrite one rule's selector, and drop its unreachable children if it has to.
///
/// # Errors
///
/// Returns `UnfixableSelector` when some branches are fixable and others not.
pub fn rewrite_rule(rule: &mut Rule) -> Result<(), UnfixableSelector> {
    let has_concatenating_child = rule
        .nested_rules()
        .any(|child| has_concatenating_nesting_selector(&child.selector));

    let mut tree = SelectorTree::parse(&rule.selector);
    normalize_legacy_combinators(&mut tree);

    if has_concatenating_child {
        let branches = tree.branches().to_vec();
        let unfixable = branches
            .iter()
            .filter(|branch| fix_branch(&mut tree, **branch) == FixOutcome::Unfixable)
            .count();
        if unfixable > 0 && unfixable < branches.len() {
            return Err(UnfixableSelector {
                selector: tree.to_string(),
            });
        }
        if unfixable > 0 {
            let before = rule.nodes.len();
            rule.nodes.retain(|node| {
                !matches!(node, Node::Rule(child) if has_concatenating_nesting_selector(&child.selector))
            });
            tracing::warn!(
                selector = %rule.selector,
                dropped = before - rule.nodes.len(),
                "dropping nested rules concatenated onto an unfixable deep selector"
            );
        }
    }

    rule.selector = tree.to_string();
    Ok(())
}

/// Replace every legacy deep combinator with `:deep`, keeping compounds separated.
pub fn normalize_legacy_combinators(tree: &mut SelectorTree) {
    let legacy: Vec<_> = tree
        .descendants()
        .into_iter()
        .filter(|id| tree.is_combinator(*id, LEGACY_DEEP_COMBINATORS))
        .collect();

    for combinator in legacy {
        let Some(parent) = tree.parent(combinator) else {
            continue;
        };
        let siblings = tree.children(parent).to_vec();
        let Some(index) = siblings.iter().position(|c| *c == combinator) else {
            continue;
        };

        let mut replacement = Vec::new();
        if index > 0 {
            replacement.push(new_descendant_combinator(tree));
        }
        replacement.push(new_deep_pseudo(tree));
        if index + 1 < siblings.len() {
            replacement.push(new_descendant_combinator(tree));
        }

        let mut nodes = siblings[..index].to_vec();
        nodes.extend(replacement);
        nodes.extend_from_slice(&siblings[index + 1..]);
        tree.set_children(parent, nodes);
    }
}

/// Try to hoist the argument of a trailing `:deep(...)` in one branch.
pub fn fix_branch(tree: &mut SelectorTree, branch: NodeId) -> FixOutcome {
    let siblings = tree.children(branch).to_vec();
    let Some(&last) = siblings.last() else {
        return FixOutcome::OriginalValid;
    };
    let SelectorKind::Pseudo { value, argument } = tree.kind(last) else {
        return FixOutcome::OriginalValid;
    };
    if value != DEEP_PSEUDO {
        return FixOutcome::OriginalValid;
    }

    let arguments = match argument {
        PseudoArgument::Selectors => tree.children(last).to_vec(),
        PseudoArgument::None | PseudoArgument::Raw(_) => Vec::new(),
    };
    let [argument] = arguments.as_slice() else {
        return FixOutcome::Unfixable;
    };

    let mut nodes = siblings[..siblings.len() - 1].to_vec();
    nodes.push(new_deep_pseudo(tree));
    nodes.push(new_descendant_combinator(tree));
    nodes.extend_from_slice(tree.children(*argument));
    tree.set_children(branch, nodes);
    FixOutcome::Fixed
}

#[must_use]
/// Does `selector` glue a tag directly onto the nesting placeholder anywhere?
pub fn has_concatenating_nesting_selector(selector: &str) -> bool {
    let tree = SelectorTree::parse(selector);
    tree.descendants().into_iter().any(|id| {
        tree.kind(id) == &SelectorKind::Nesting
            && tree
                .next(id)
                .is_some_and(|next| matches!(tree.kind(next), SelectorKind::Tag(_)))
    })
}

fn new_deep_pseudo(tree: &mut SelectorTree) -> NodeId {
    tree.alloc(SelectorKind::Pseudo {
        value: DEEP_PSEUDO.to_string(),
        argument: PseudoArgument::None,
    })
}

fn new_descendant_combinator(tree: &mut SelectorTree) -> NodeId {
    tree.alloc(SelectorKind::Combinator {
        value: " ".to_string(),
        raw: " ".to_string(),
    })
}

#[cfg(test)]
#[path = "tests/rewrite.rs"]
mod tests;
