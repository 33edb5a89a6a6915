//! Structured markup renderer and its parser.
//!
//! One element per line, two spaces of indentation per level:
//!
//! ```text
//! <directory name="proj">
//!   <directory name="src">
//!     <file name="main.rs"/>
//!   </directory>
//!   <directory name="empty"/>
//!   <file name="README.md"/>
//! </directory>
//! ```

use crate::tree::TreeNode;
use std::collections::BTreeSet;
use thiserror::Error;

const INDENT: &str = "  ";

/// Errors from [`parse_paths`]
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MarkupError {
    #[error("line {line}: unexpected content: {content}")]
    UnexpectedLine { line: usize, content: String },

    #[error("line {line}: closing tag without an open directory")]
    UnbalancedClose { line: usize },

    #[error("line {line}: content after the root directory was closed")]
    TrailingContent { line: usize },

    #[error("line {line}: invalid escape in name: {name}")]
    InvalidEscape { line: usize, name: String },

    #[error("{0} directory element(s) left open")]
    Unclosed(usize),

    #[error("no root directory element")]
    MissingRoot,
}

/// Render a tree as markup. The root is the outermost `<directory>`.
pub fn render(root: &TreeNode) -> String {
    let mut lines = Vec::new();
    render_node(root, 0, &mut lines);
    lines.join("\n")
}

fn render_node(node: &TreeNode, depth: usize, lines: &mut Vec<String>) {
    let indent = INDENT.repeat(depth);
    let name = escape_attr(&node.name);
    if !node.is_dir() {
        lines.push(format!("{}<file name=\"{}\"/>", indent, name));
    } else if node.children.is_empty() {
        lines.push(format!("{}<directory name=\"{}\"/>", indent, name));
    } else {
        lines.push(format!("{}<directory name=\"{}\">", indent, name));
        for child in &node.children {
            render_node(child, depth + 1, lines);
        }
        lines.push(format!("{}</directory>", indent));
    }
}

/// Parse markup produced by [`render`] back into the set of root-relative
/// paths, in the same form as [`TreeNode::paths`] (directories end in `/`).
pub fn parse_paths(markup: &str) -> Result<BTreeSet<String>, MarkupError> {
    let mut paths = BTreeSet::new();
    let mut stack: Vec<String> = Vec::new();
    let mut root_seen = false;

    for (index, raw) in markup.lines().enumerate() {
        let line = index + 1;
        let content = raw.trim();
        if content.is_empty() {
            continue;
        }
        if root_seen && stack.is_empty() {
            return Err(MarkupError::TrailingContent { line });
        }

        if content == "</directory>" {
            if stack.pop().is_none() {
                return Err(MarkupError::UnbalancedClose { line });
            }
            continue;
        }

        let (name, element) = parse_element(content)
            .ok_or_else(|| MarkupError::UnexpectedLine {
                line,
                content: content.to_string(),
            })?;
        let name = unescape_attr(name).ok_or_else(|| MarkupError::InvalidEscape {
            line,
            name: name.to_string(),
        })?;

        if !root_seen {
            if element == Element::File {
                return Err(MarkupError::UnexpectedLine {
                    line,
                    content: content.to_string(),
                });
            }
            root_seen = true;
            if element == Element::OpenDirectory {
                stack.push(name);
            }
            continue;
        }

        let prefix: String = stack.iter().skip(1).map(|s| format!("{}/", s)).collect();
        match element {
            Element::File => {
                paths.insert(format!("{}{}", prefix, name));
            }
            Element::EmptyDirectory => {
                paths.insert(format!("{}{}/", prefix, name));
            }
            Element::OpenDirectory => {
                paths.insert(format!("{}{}/", prefix, name));
                stack.push(name);
            }
        }
    }

    if !root_seen {
        return Err(MarkupError::MissingRoot);
    }
    if !stack.is_empty() {
        return Err(MarkupError::Unclosed(stack.len()));
    }
    Ok(paths)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Element {
    File,
    EmptyDirectory,
    OpenDirectory,
}

fn parse_element(content: &str) -> Option<(&str, Element)> {
    if let Some(rest) = content.strip_prefix("<file name=\"") {
        return rest.strip_suffix("\"/>").map(|name| (name, Element::File));
    }
    let rest = content.strip_prefix("<directory name=\"")?;
    if let Some(name) = rest.strip_suffix("\"/>") {
        return Some((name, Element::EmptyDirectory));
    }
    rest.strip_suffix("\">")
        .map(|name| (name, Element::OpenDirectory))
}

/// Escape a name for use inside a double-quoted attribute. Control
/// characters become numeric references so every element stays on one line.
pub fn escape_attr(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c if c.is_control() => out.push_str(&format!("&#{};", u32::from(c))),
            _ => out.push(c),
        }
    }
    out
}

/// Reverse of [`escape_attr`]. Accepts decimal (`&#10;`) and hex (`&#xA;`)
/// character references. Returns `None` on an unknown or unterminated
/// entity, or on a raw `"`.
pub fn unescape_attr(value: &str) -> Option<String> {
    let mut out = String::with_capacity(value.len());
    let mut rest = value;
    while let Some(pos) = rest.find(['&', '"']) {
        out.push_str(&rest[..pos]);
        if rest[pos..].starts_with('"') {
            return None;
        }
        let end = rest[pos..].find(';')? + pos;
        let decoded = match &rest[pos + 1..end] {
            "amp" => '&',
            "lt" => '<',
            "gt" => '>',
            "quot" => '"',
            "apos" => '\'',
            entity => decode_char_ref(entity)?,
        };
        out.push(decoded);
        rest = &rest[end + 1..];
    }
    out.push_str(rest);
    Some(out)
}

fn decode_char_ref(entity: &str) -> Option<char> {
    let number = entity.strip_prefix('#')?;
    let code = match number.strip_prefix(['x', 'X']) {
        Some(hex) => u32::from_str_radix(hex, 16).ok()?,
        None => number.parse::<u32>().ok()?,
    };
    char::from_u32(code)
}
