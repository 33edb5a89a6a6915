//! Visual tree renderer.
//!
//! ```text
//! proj/
//! ├── src/
//! │   └── main.rs
//! └── README.md
//! ```

use crate::tree::TreeNode;

const BRANCH: &str = "├── ";
const LAST_BRANCH: &str = "└── ";
const PIPE: &str = "│   ";
const SPACE: &str = "    ";

pub fn render(root: &TreeNode) -> String {
    let mut lines = vec![label(root)];
    render_children(root, "", &mut lines);
    lines.join("\n")
}

fn render_children(node: &TreeNode, prefix: &str, lines: &mut Vec<String>) {
    let count = node.children.len();
    for (i, child) in node.children.iter().enumerate() {
        let is_last = i + 1 == count;
        let connector = if is_last { LAST_BRANCH } else { BRANCH };
        lines.push(format!("{}{}{}", prefix, connector, label(child)));
        if child.is_dir() && !child.children.is_empty() {
            let continuation = if is_last { SPACE } else { PIPE };
            render_children(child, &format!("{}{}", prefix, continuation), lines);
        }
    }
}

fn label(node: &TreeNode) -> String {
    let name = display_name(&node.name);
    if node.is_dir() {
        format!("{}/", name)
    } else {
        name
    }
}

/// Control characters are shown escaped so each entry keeps one line.
fn display_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.chars() {
        match c {
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => out.push_str(&format!("\\u{{{:x}}}", u32::from(c))),
            _ => out.push(c),
        }
    }
    out
}
