//! `:name` placeholder substitution in path templates.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde_json::Value;
use tracing::warn;

use crate::types::VariablesMap;

/// A colon followed by one or more ASCII word characters.
static PLACEHOLDER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r":([A-Za-z0-9_]+)").expect("placeholder regex should be valid")
});

/// Result of filling a template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilledPath {
    pub path: String,
    /// Placeholder names left in `path`, one entry per occurrence.
    pub unresolved: Vec<String>,
}

/// Placeholder names in `template`, deduplicated, in order of first
/// appearance.
pub fn placeholder_names(template: &str) -> Vec<&str> {
    let mut names: Vec<&str> = Vec::new();
    for caps in PLACEHOLDER.captures_iter(template) {
        if let Some(name) = caps.get(1).map(|m| m.as_str()) {
            if !names.contains(&name) {
                names.push(name);
            }
        }
    }
    names
}

/// Substitute placeholders in `template` from `vars`.
///
/// A single pass: replacement text is never rescanned. Tokens with no value
/// (or a null value) stay verbatim and produce one warning each.
pub fn fill_path(template: &str, vars: &VariablesMap) -> String {
    fill_path_checked(template, vars).path
}

/// Like [`fill_path`], also reporting which placeholders were left in place.
pub fn fill_path_checked(template: &str, vars: &VariablesMap) -> FilledPath {
    let mut unresolved = Vec::new();
    let path = PLACEHOLDER
        .replace_all(template, |caps: &Captures<'_>| {
            let name = &caps[1];
            match vars.get(name).and_then(render) {
                Some(replacement) => replacement,
                None => {
                    warn!(
                        placeholder = %&caps[0],
                        template = %template,
                        "url placeholder has no matching replacement value"
                    );
                    unresolved.push(name.to_string());
                    caps[0].to_string()
                }
            }
        })
        .into_owned();
    FilledPath { path, unresolved }
}

fn render(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
