//! Lossless selector syntax tree.
//!
//! Selectors are parsed into an arena of nodes addressed by [`NodeId`]. Every node
//! knows its parent, but the arena owns all nodes, so there are no ownership cycles.
//! Children lists are only ever replaced through [`SelectorTree::set_children`],
//! which relinks the new children to their parent in the same step.
//!
//! The tree is lossless: serializing an untouched tree reproduces the input exactly,
//! including whitespace around combinators and commas.

use std::fmt;

/// Pseudo-classes whose argument is itself a selector list.
const SELECTOR_LIST_PSEUDOS: &[&str] = &[
    "not",
    "is",
    "where",
    "has",
    "matches",
    "any",
    "-moz-any",
    "-webkit-any",
    "deep",
    "v-deep",
    "slotted",
    "v-slotted",
    "global",
    "v-global",
    "host",
    "host-context",
    "current",
    "past",
    "future",
];

/// Index of a node in a [`SelectorTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// Argument carried by a pseudo-class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PseudoArgument {
    /// No parentheses at all.
    None,
    /// Parenthesised selector list; the selectors are the node's children.
    Selectors,
    /// Parenthesised text that is not a selector list, such as `2n+1`.
    Raw(String),
}

/// What a selector node is. Simple selectors keep their source text verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectorKind {
    /// Comma separated list of selectors; children are `Selector` nodes.
    Root,
    /// One comma separated branch; children form the compound/combinator sequence.
    Selector {
        /// Whitespace preceding the branch.
        before: String,
        /// Whitespace following the branch.
        after: String,
    },
    /// Type selector, or any bare identifier such as `-suffix` after `&`.
    Tag(String),
    /// `*`.
    Universal(String),
    /// `.name`.
    Class(String),
    /// `#name`.
    Id(String),
    /// `[attr...]`.
    Attribute(String),
    /// The nesting placeholder `&`.
    Nesting,
    /// `:name` or `::name`, possibly with an argument.
    Pseudo {
        /// Name including its leading colons.
        value: String,
        /// Argument shape.
        argument: PseudoArgument,
    },
    /// Combinator between compounds.
    Combinator {
        /// Significant value: `" "` for descendant, otherwise `>`, `+`, `~`, `>>>`, `/deep/`.
        value: String,
        /// Exact source text including surrounding whitespace.
        raw: String,
    },
    /// `/* ... */` inside a selector.
    Comment(String),
    /// Anything else kept verbatim, e.g. `#{$interpolation}`.
    Other(String),
}

/// One arena slot.
#[derive(Debug, Clone)]
pub struct SelectorNode {
    /// Node payload.
    pub kind: SelectorKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// Arena-backed selector list.
#[derive(Debug, Clone)]
pub struct SelectorTree {
    nodes: Vec<SelectorNode>,
    root: NodeId,
}

impl SelectorTree {
    #[must_use]
    /// Parse a selector list. Parsing never fails; unknown input is kept as `Other`.
    pub fn parse(text: &str) -> Self {
        let mut tree = Self {
            nodes: Vec::new(),
            root: NodeId(0),
        };
        let root = tree.alloc(SelectorKind::Root);
        tree.root = root;
        tree.parse_list(text, root);
        tree
    }

    #[must_use]
    /// Top-level comma separated branches.
    pub fn branches(&self) -> &[NodeId] {
        self.children(self.root)
    }

    #[must_use]
    /// Payload of `id`.
    pub fn kind(&self, id: NodeId) -> &SelectorKind {
        &self.nodes[id.0].kind
    }

    #[must_use]
    /// Children of `id` in order.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    #[must_use]
    /// Parent of `id`, if it is linked into the tree.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    #[must_use]
    /// Position of `id` among its parent's children.
    pub fn index(&self, id: NodeId) -> Option<usize> {
        let parent = self.parent(id)?;
        self.children(parent).iter().position(|c| *c == id)
    }

    #[must_use]
    /// Sibling directly after `id`.
    pub fn next(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.parent(id)?;
        let index = self.index(id)?;
        self.children(parent).get(index + 1).copied()
    }

    /// Add an unlinked node to the arena.
    pub fn alloc(&mut self, kind: SelectorKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(SelectorNode {
            kind,
            parent: None,
            children: Vec::new(),
        });
        id
    }

    /// Replace the children of `parent`, relinking every new child to it.
    ///
    /// Children that are dropped lose their back-reference.
    pub fn set_children(&mut self, parent: NodeId, children: Vec<NodeId>) {
        let old = std::mem::take(&mut self.nodes[parent.0].children);
        for child in old {
            if self.nodes[child.0].parent == Some(parent) {
                self.nodes[child.0].parent = None;
            }
        }
        for child in &children {
            self.nodes[child.0].parent = Some(parent);
        }
        self.nodes[parent.0].children = children;
    }

    #[must_use]
    /// Every node reachable from the root, in pre-order.
    pub fn descendants(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.children(id).iter().rev());
        }
        out
    }

    #[must_use]
    /// Is `id` a combinator with one of the given values?
    pub fn is_combinator(&self, id: NodeId, values: &[&str]) -> bool {
        matches!(self.kind(id), SelectorKind::Combinator { value, .. } if values.contains(&value.as_str()))
    }

    fn parse_list(&mut self, text: &str, parent: NodeId) {
        let mut branches = Vec::new();
        for segment in split_top_level(text) {
            let core = segment.trim();
            let lead = segment.len() - segment.trim_start().len();
            let before = segment[..lead].to_string();
            let after = segment[lead + core.len()..].to_string();
            let branch = self.alloc(SelectorKind::Selector { before, after });
            let nodes = self.parse_sequence(core);
            self.set_children(branch, nodes);
            branches.push(branch);
        }
        self.set_children(parent, branches);
    }

    fn parse_sequence(&mut self, text: &str) -> Vec<NodeId> {
        let bytes = text.as_bytes();
        let mut nodes = Vec::new();
        let mut i = 0;
        while i < bytes.len() {
            let c = bytes[i];
            if c.is_ascii_whitespace() {
                let ws_end = skip_whitespace(bytes, i);
                if let Some(len) = explicit_combinator_len(&text[ws_end..]) {
                    let end = skip_whitespace(bytes, ws_end + len);
                    nodes.push(self.alloc(SelectorKind::Combinator {
                        value: text[ws_end..ws_end + len].to_string(),
                        raw: text[i..end].to_string(),
                    }));
                    i = end;
                } else {
                    nodes.push(self.alloc(SelectorKind::Combinator {
                        value: " ".to_string(),
                        raw: text[i..ws_end].to_string(),
                    }));
                    i = ws_end;
                }
                continue;
            }
            if let Some(len) = explicit_combinator_len(&text[i..]) {
                let end = skip_whitespace(bytes, i + len);
                nodes.push(self.alloc(SelectorKind::Combinator {
                    value: text[i..i + len].to_string(),
                    raw: text[i..end].to_string(),
                }));
                i = end;
                continue;
            }
            let (kind, end) = match c {
                b'/' if text[i..].starts_with("/*") => {
                    let end = text[i + 2..].find("*/").map_or(text.len(), |p| i + 2 + p + 2);
                    (SelectorKind::Comment(text[i..end].to_string()), end)
                }
                b'.' => {
                    let end = scan_ident(bytes, i + 1);
                    (SelectorKind::Class(text[i..end].to_string()), end)
                }
                b'#' if bytes.get(i + 1) == Some(&b'{') => {
                    let end = scan_balanced(bytes, i + 1, b'{', b'}');
                    (SelectorKind::Other(text[i..end].to_string()), end)
                }
                b'#' => {
                    let end = scan_ident(bytes, i + 1);
                    (SelectorKind::Id(text[i..end].to_string()), end)
                }
                b'[' => {
                    let end = scan_balanced(bytes, i, b'[', b']');
                    (SelectorKind::Attribute(text[i..end].to_string()), end)
                }
                b'&' => (SelectorKind::Nesting, i + 1),
                b'*' => (SelectorKind::Universal("*".to_string()), i + 1),
                b':' => {
                    let end = self.parse_pseudo(text, i, &mut nodes);
                    i = end;
                    continue;
                }
                _ if is_ident_byte(c) => {
                    let end = scan_ident(bytes, i);
                    (SelectorKind::Tag(text[i..end].to_string()), end)
                }
                _ => {
                    let len = text[i..].chars().next().map_or(1, char::len_utf8);
                    (SelectorKind::Other(text[i..i + len].to_string()), i + len)
                }
            };
            nodes.push(self.alloc(kind));
            i = end;
        }
        nodes
    }

    fn parse_pseudo(&mut self, text: &str, start: usize, nodes: &mut Vec<NodeId>) -> usize {
        let bytes = text.as_bytes();
        let mut name_start = start + 1;
        if bytes.get(name_start) == Some(&b':') {
            name_start += 1;
        }
        let name_end = scan_ident(bytes, name_start);
        let value = text[start..name_end].to_string();

        if bytes.get(name_end) != Some(&b'(') {
            nodes.push(self.alloc(SelectorKind::Pseudo {
                value,
                argument: PseudoArgument::None,
            }));
            return name_end;
        }

        let end = scan_balanced(bytes, name_end, b'(', b')');
        let inner_end = if bytes.get(end - 1) == Some(&b')') && end - 1 > name_end {
            end - 1
        } else {
            end
        };
        let inner = &text[name_end + 1..inner_end];
        let name = text[name_start..name_end].to_ascii_lowercase();

        if SELECTOR_LIST_PSEUDOS.contains(&name.as_str()) && !inner.trim().is_empty() {
            let pseudo = self.alloc(SelectorKind::Pseudo {
                value,
                argument: PseudoArgument::Selectors,
            });
            self.parse_list(inner, pseudo);
            nodes.push(pseudo);
        } else {
            nodes.push(self.alloc(SelectorKind::Pseudo {
                value,
                argument: PseudoArgument::Raw(inner.to_string()),
            }));
        }
        end
    }

    fn write_node(&self, id: NodeId, out: &mut String) {
        match self.kind(id) {
            SelectorKind::Root => self.write_list(id, out),
            SelectorKind::Selector { before, after } => {
                out.push_str(before);
                for child in self.children(id) {
                    self.write_node(*child, out);
                }
                out.push_str(after);
            }
            SelectorKind::Tag(s)
            | SelectorKind::Universal(s)
            | SelectorKind::Class(s)
            | SelectorKind::Id(s)
            | SelectorKind::Attribute(s)
            | SelectorKind::Comment(s)
            | SelectorKind::Other(s)
            | SelectorKind::Combinator { raw: s, .. } => out.push_str(s),
            SelectorKind::Nesting => out.push('&'),
            SelectorKind::Pseudo { value, argument } => {
                out.push_str(value);
                match argument {
                    PseudoArgument::None => {}
                    PseudoArgument::Selectors => {
                        out.push('(');
                        self.write_list(id, out);
                        out.push(')');
                    }
                    PseudoArgument::Raw(raw) => {
                        out.push('(');
                        out.push_str(raw);
                        out.push(')');
                    }
                }
            }
        }
    }

    fn write_list(&self, id: NodeId, out: &mut String) {
        for (i, child) in self.children(id).iter().enumerate() {
            if i > 0 {
                out.push(',');
            }
            self.write_node(*child, out);
        }
    }
}

impl fmt::Display for SelectorTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        self.write_node(self.root, &mut out);
        f.write_str(&out)
    }
}

fn explicit_combinator_len(rest: &str) -> Option<usize> {
    if rest.starts_with(">>>") {
        Some(3)
    } else if rest.starts_with("/deep/") {
        Some(6)
    } else if rest.starts_with(['>', '+', '~']) {
        Some(1)
    } else {
        None
    }
}

fn skip_whitespace(bytes: &[u8], mut i: usize) -> usize {
    while i < bytes.len() && bytes[i].is_ascii_whitespace() {
        i += 1;
    }
    i
}

fn is_ident_byte(c: u8) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, b'-' | b'_' | b'%' | b'\\') || c >= 0x80
}

fn scan_ident(bytes: &[u8], mut i: usize) -> usize {
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i = (i + 2).min(bytes.len()),
            b'#' if bytes.get(i + 1) == Some(&b'{') => i = scan_balanced(bytes, i + 1, b'{', b'}'),
            c if is_ident_byte(c) => i += 1,
            _ => break,
        }
    }
    // an escape may have stepped into the middle of a multi-byte character
    while i < bytes.len() && (bytes[i] & 0xC0) == 0x80 {
        i += 1;
    }
    i
}

/// Scan from the opening delimiter at `start` to just past its matching close.
/// Quoted strings are skipped; an unbalanced group runs to the end of input.
fn scan_balanced(bytes: &[u8], start: usize, open: u8, close: u8) -> usize {
    let mut depth = 0usize;
    let mut i = start;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => {
                i += 2;
                continue;
            }
            q @ (b'"' | b'\'') => {
                i += 1;
                while i < bytes.len() && bytes[i] != q {
                    if bytes[i] == b'\\' {
                        i += 1;
                    }
                    i += 1;
                }
            }
            c if c == open => depth += 1,
            c if c == close => {
                depth -= 1;
                if depth == 0 {
                    return i + 1;
                }
            }
            _ => {}
        }
        i += 1;
    }
    bytes.len()
}

/// Split on commas outside of parentheses, brackets, strings and interpolation.
fn split_top_level(text: &str) -> Vec<&str> {
    if text.trim().is_empty() {
        return Vec::new();
    }
    let bytes = text.as_bytes();
    let mut segments = Vec::new();
    let mut start = 0;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 1,
            b'(' => {
                i = scan_balanced(bytes, i, b'(', b')');
                continue;
            }
            b'[' => {
                i = scan_balanced(bytes, i, b'[', b']');
                continue;
            }
            b'{' => {
                i = scan_balanced(bytes, i, b'{', b'}');
                continue;
            }
            q @ (b'"' | b'\'') => {
                i += 1;
                while i < bytes.len() && bytes[i] != q {
                    if bytes[i] == b'\\' {
                        i += 1;
                    }
                    i += 1;
                }
            }
            b',' => {
                segments.push(&text[start..i]);
                start = i + 1;
            }
            _ => {}
        }
        i += 1;
    }
    segments.push(&text[start..]);
    segments
}

#[cfg(test)]
#[path = "tests/selector.rs"]
mod tests;
