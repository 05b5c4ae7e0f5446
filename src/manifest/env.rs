//! versions.env rendering
//!
//! Every dependency contributes `<NAME>_TAG`, `<NAME>_COMMIT` and
//! `<NAME>_REPO`. Lines are sorted so the output does not depend on map order.

use crate::domain::Dependencies;
use regex::Regex;
use std::sync::LazyLock;

static INVALID_ENV_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Z0-9_]").unwrap());

/// Shell variable prefix for a dependency name
pub fn env_var_prefix(name: &str) -> String {
    INVALID_ENV_CHARS
        .replace_all(&name.to_uppercase(), "_")
        .into_owned()
}

/// Render the full versions.env content
pub fn render_env(dependencies: &Dependencies) -> String {
    let mut lines: Vec<String> = dependencies
        .iter()
        .flat_map(|(name, record)| {
            let prefix = env_var_prefix(name);
            [
                format!("export {}_TAG={}", prefix, record.version_label()),
                format!("export {}_COMMIT={}", prefix, record.commit),
                format!("export {}_REPO={}.git", prefix, record.repo_url()),
            ]
        })
        .collect();

    lines.sort();

    let mut content = lines.join("\n");
    if !content.is_empty() {
        content.push('\n');
    }
    content
}
