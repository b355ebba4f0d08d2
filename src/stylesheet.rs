//! Lossless rule tree for stylesheets.
//!
//! Only what the selector rewrite needs is structured: style rules with their
//! selector and nested children. Declarations, comments and at-rule preludes are
//! kept as opaque text, so serializing an untouched tree gives back the input.
//!
//! Brace syntaxes (css, scss) and the indented sass syntax produce the same tree
//! shape; the sass variant just has empty open/close delimiters.

use crate::style_lang::StyleLang;
use std::fmt;

/// A node of the stylesheet tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// Style rule with a selector.
    Rule(Rule),
    /// At-rule or nested property with a body; its children are still visited.
    Block(Block),
    /// Anything else, verbatim.
    Text(String),
}

/// A style rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    /// Whitespace preceding the selector, owned by the rule so removing it leaves no residue.
    pub before: String,
    /// Selector text without surrounding whitespace.
    pub selector: String,
    /// Text between the selector and the body (whitespace, or the sass line break).
    pub between: String,
    /// Child nodes of the body.
    pub nodes: Vec<Node>,
    open: &'static str,
    close: String,
}

/// A non-rule node with a body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    /// Everything up to the body.
    pub header: String,
    /// Child nodes of the body.
    pub nodes: Vec<Node>,
    open: &'static str,
    close: String,
}

impl Rule {
    /// Direct child rules, not looking into nested blocks.
    pub fn nested_rules(&self) -> impl Iterator<Item = &Rule> {
        self.nodes.iter().filter_map(|n| match n {
            Node::Rule(rule) => Some(rule),
            _ => None,
        })
    }
}

/// A parsed stylesheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stylesheet {
    /// Top-level nodes.
    pub nodes: Vec<Node>,
}

impl Stylesheet {
    #[must_use]
    /// Parse `source` in the given dialect. Parsing is tolerant and never fails.
    pub fn parse(source: &str, lang: StyleLang) -> Self {
        let nodes = match lang {
            StyleLang::Css => BraceParser::new(source, false).parse_all(),
            StyleLang::Scss => BraceParser::new(source, true).parse_all(),
            StyleLang::Sass => IndentParser::new(source).parse_all(),
        };
        Self { nodes }
    }
}

impl fmt::Display for Stylesheet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_nodes(&self.nodes, f)
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::Rule(rule) => {
                f.write_str(&rule.before)?;
                f.write_str(&rule.selector)?;
                f.write_str(&rule.between)?;
                f.write_str(rule.open)?;
                write_nodes(&rule.nodes, f)?;
                f.write_str(&rule.close)
            }
            Self::Block(block) => {
                f.write_str(&block.header)?;
                f.write_str(block.open)?;
                write_nodes(&block.nodes, f)?;
                f.write_str(&block.close)
            }
        }
    }
}

fn write_nodes(nodes: &[Node], f: &mut fmt::Formatter<'_>) -> fmt::Result {
    nodes.iter().try_for_each(|node| write!(f, "{node}"))
}

/// `font: {` / `font: 12px {` style headers open nested declarations, not rules.
fn is_nested_property(header: &str) -> bool {
    let header = header.trim();
    let Some(colon) = header.find(':') else {
        return false;
    };
    let (name, rest) = header.split_at(colon);
    let rest = &rest[1..];
    !name.is_empty()
        && name
            .trim_end()
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
        && (rest.is_empty() || rest.starts_with(char::is_whitespace))
}

enum Terminator {
    Semicolon,
    Open(usize),
    End,
}

struct BraceParser<'a> {
    src: &'a str,
    pos: usize,
    line_comments: bool,
}

impl<'a> BraceParser<'a> {
    fn new(src: &'a str, line_comments: bool) -> Self {
        Self {
            src,
            pos: 0,
            line_comments,
        }
    }

    fn bytes(&self) -> &'a [u8] {
        self.src.as_bytes()
    }

    fn parse_all(&mut self) -> Vec<Node> {
        let mut nodes = Vec::new();
        loop {
            nodes.extend(self.parse_nodes());
            if self.pos >= self.src.len() {
                return nodes;
            }
            // stray closing brace at top level
            nodes.push(Node::Text("}".to_string()));
            self.pos += 1;
        }
    }

    /// Parse statements until an unmatched `}` (left unconsumed) or end of input.
    fn parse_nodes(&mut self) -> Vec<Node> {
        let mut nodes = Vec::new();
        loop {
            let trivia_start = self.pos;
            let ws_start = self.skip_trivia();
            if ws_start > trivia_start {
                nodes.push(Node::Text(self.src[trivia_start..ws_start].to_string()));
            }
            let before = &self.src[ws_start..self.pos];
            if self.pos >= self.src.len() || self.bytes()[self.pos] == b'}' {
                if !before.is_empty() {
                    nodes.push(Node::Text(before.to_string()));
                }
                return nodes;
            }

            let stmt_start = self.pos;
            match self.scan_statement() {
                Terminator::Semicolon | Terminator::End => {
                    nodes.push(Node::Text(self.src[ws_start..self.pos].to_string()));
                }
                Terminator::Open(brace) => {
                    let header = &self.src[stmt_start..brace];
                    self.pos = brace + 1;
                    let children = self.parse_nodes();
                    let close = if self.pos < self.src.len() {
                        self.pos += 1;
                        "}".to_string()
                    } else {
                        String::new()
                    };
                    let trimmed = header.trim_end();
                    if trimmed.starts_with('@') || is_nested_property(trimmed) {
                        nodes.push(Node::Block(Block {
                            header: format!("{before}{header}"),
                            nodes: children,
                            open: "{",
                            close,
                        }));
                    } else {
                        nodes.push(Node::Rule(Rule {
                            before: before.to_string(),
                            selector: trimmed.to_string(),
                            between: header[trimmed.len()..].to_string(),
                            nodes: children,
                            open: "{",
                            close,
                        }));
                    }
                }
            }
        }
    }

    /// Skip whitespace and comments. Returns where the trailing whitespace run starts.
    fn skip_trivia(&mut self) -> usize {
        let bytes = self.bytes();
        let mut ws_start = self.pos;
        loop {
            while self.pos < bytes.len() && bytes[self.pos].is_ascii_whitespace() {
                self.pos += 1;
            }
            let rest = &self.src[self.pos..];
            if rest.starts_with("/*") {
                self.pos = rest[2..].find("*/").map_or(self.src.len(), |p| self.pos + 2 + p + 2);
                ws_start = self.pos;
            } else if self.line_comments && rest.starts_with("//") {
                self.pos = rest.find('\n').map_or(self.src.len(), |p| self.pos + p);
                ws_start = self.pos;
            } else {
                return ws_start;
            }
        }
    }

    /// Advance to the end of the current statement.
    ///
    /// A `;` is consumed; `{` is reported but not consumed; `}` is left in place.
    fn scan_statement(&mut self) -> Terminator {
        let bytes = self.bytes();
        let mut depth = 0usize;
        while self.pos < bytes.len() {
            let c = bytes[self.pos];
            match c {
                b'\\' => self.pos += 1,
                b'"' | b'\'' => {
                    self.pos += 1;
                    while self.pos < bytes.len() && bytes[self.pos] != c {
                        if bytes[self.pos] == b'\\' {
                            self.pos += 1;
                        }
                        self.pos += 1;
                    }
                }
                b'/' if self.src[self.pos..].starts_with("/*") => {
                    let rest = &self.src[self.pos + 2..];
                    self.pos = rest.find("*/").map_or(bytes.len(), |p| self.pos + 2 + p + 1);
                }
                b'/' if self.line_comments
                    && depth == 0
                    && self.src[self.pos..].starts_with("//") =>
                {
                    let rest = &self.src[self.pos..];
                    self.pos = rest.find('\n').map_or(bytes.len(), |p| self.pos + p);
                    continue;
                }
                b'#' if bytes.get(self.pos + 1) == Some(&b'{') => {
                    self.pos = skip_interpolation(bytes, self.pos + 1);
                    continue;
                }
                b'(' | b'[' => depth += 1,
                b')' | b']' => depth = depth.saturating_sub(1),
                b';' if depth == 0 => {
                    self.pos += 1;
                    return Terminator::Semicolon;
                }
                b'{' if depth == 0 => return Terminator::Open(self.pos),
                b'}' if depth == 0 => return Terminator::End,
                _ => {}
            }
            self.pos += 1;
        }
        self.pos = self.pos.min(bytes.len());
        Terminator::End
    }
}

/// From the `{` of an interpolation to just past its matching `}`.
fn skip_interpolation(bytes: &[u8], start: usize) -> usize {
    let mut depth = 0usize;
    let mut i = start;
    while i < bytes.len() {
        match bytes[i] {
            b'{' => depth += 1,
            b'}' => {
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

struct Line<'a> {
    text: &'a str,
    indent: usize,
    blank: bool,
}

impl<'a> Line<'a> {
    fn new(text: &'a str) -> Self {
        let content = text.trim_end_matches(['\n', '\r']);
        let indent = content.len() - content.trim_start_matches([' ', '\t']).len();
        Self {
            text,
            indent,
            blank: content.trim().is_empty(),
        }
    }

    fn content(&self) -> &'a str {
        self.text.trim_end_matches(['\n', '\r'])
    }

    fn trimmed(&self) -> &'a str {
        self.content().trim()
    }
}

struct IndentParser<'a> {
    lines: Vec<Line<'a>>,
    idx: usize,
}

impl<'a> IndentParser<'a> {
    fn new(src: &'a str) -> Self {
        Self {
            lines: src.split_inclusive('\n').map(Line::new).collect(),
            idx: 0,
        }
    }

    fn parse_all(&mut self) -> Vec<Node> {
        self.parse_level(None)
    }

    fn next_content_indent(&self, from: usize) -> Option<usize> {
        self.lines[from..]
            .iter()
            .find(|l| !l.blank)
            .map(|l| l.indent)
    }

    fn belongs(&self, indent: Option<usize>, parent: Option<usize>) -> bool {
        match (indent, parent) {
            (_, None) => true,
            (None, Some(_)) => false,
            (Some(indent), Some(parent)) => indent > parent,
        }
    }

    fn parse_level(&mut self, parent: Option<usize>) -> Vec<Node> {
        let mut nodes = Vec::new();
        while self.idx < self.lines.len() {
            let line = &self.lines[self.idx];
            if line.blank {
                // trailing blank lines go to whichever level the next content line is on
                if !self.belongs(self.next_content_indent(self.idx), parent) {
                    return nodes;
                }
                nodes.push(Node::Text(line.text.to_string()));
                self.idx += 1;
                continue;
            }
            if !self.belongs(Some(line.indent), parent) {
                return nodes;
            }

            let indent = line.indent;
            let first = self.idx;
            let mut last = first;
            while self.lines[last].trimmed().ends_with(',') && last + 1 < self.lines.len() {
                last += 1;
            }
            let has_body = self
                .next_content_indent(last + 1)
                .is_some_and(|next| next > indent);
            if !has_body {
                nodes.push(Node::Text(line.text.to_string()));
                self.idx += 1;
                continue;
            }

            let header = self.lines[first].trimmed();
            if header.starts_with("//") || header.starts_with("/*") {
                let mut text = String::new();
                self.idx = first;
                while self.idx < self.lines.len() {
                    let l = &self.lines[self.idx];
                    if self.idx > first && !l.blank && l.indent <= indent {
                        break;
                    }
                    text.push_str(l.text);
                    self.idx += 1;
                }
                nodes.push(Node::Text(text));
                continue;
            }

            let header_text: String = self.lines[first..=last].iter().map(|l| l.text).collect();
            self.idx = last + 1;
            let is_block = header.starts_with(['@', '+', '='])
                || is_nested_property(header);
            let children = self.parse_level(Some(indent));

            if is_block {
                nodes.push(Node::Block(Block {
                    header: header_text,
                    nodes: children,
                    open: "",
                    close: String::new(),
                }));
            } else {
                let body = header_text.trim_end();
                let selector = body.trim_start();
                nodes.push(Node::Rule(Rule {
                    before: body[..body.len() - selector.len()].to_string(),
                    selector: selector.to_string(),
                    between: header_text[body.len()..].to_string(),
                    nodes: children,
                    open: "",
                    close: String::new(),
                }));
            }
        }
        nodes
    }
}

#[cfg(test)]
#[path = "tests/stylesheet.rs"]
mod tests;
