//! The rule document written to disk: front matter, a heading, and the
//! rendered structure in a code block. No timestamps, so an unchanged tree
//! yields a byte-identical document.

const FRONT_MATTER: &str = "---\nalwaysApply: true\n---\n\n";
const FENCE: &str = "```";

pub fn render_document(project_name: &str, body: &str) -> String {
    format!(
        "{}# {} Structure\n\n{}\n{}\n{}\n",
        FRONT_MATTER, project_name, FENCE, body, FENCE
    )
}

/// Extract the rendered body from a document produced by [`render_document`].
pub fn extract_body(document: &str) -> Option<&str> {
    let rest = document.strip_prefix(FRONT_MATTER)?;
    let start = rest.find("\n```\n")? + "\n```\n".len();
    let body = &rest[start..];
    let end = body.rfind("\n```")?;
    Some(&body[..end])
}
