//! Documentation comments for synthesized declarations.

use dtsdoc_ast::DocComment;
use serde_json::Value;

use crate::doclet::{DocParam, Doclet};

/// Raw comments this short (`/***/`) carry no documentation.
const MIN_COMMENT_LEN: usize = 4;

/// Build the leading `/** .. */` comment for a doclet, if it has one.
pub fn doc_comment(doclet: &Doclet) -> Option<DocComment> {
    if doclet.comment.chars().count() <= MIN_COMMENT_LEN {
        return None;
    }

    let mut lines = Vec::new();

    let description = doclet
        .description
        .as_deref()
        .filter(|text| !text.trim().is_empty())
        .or_else(|| doclet.classdesc.as_deref().filter(|text| !text.trim().is_empty()));
    if let Some(text) = description {
        push_text(&mut lines, "", text);
    }

    for example in &doclet.examples {
        lines.push("@example".to_string());
        for line in example.lines() {
            lines.push(line.trim_end().to_string());
        }
    }

    if !doclet.is_enum() {
        for prop in &doclet.properties {
            push_entry(&mut lines, "@property", prop);
        }
    }

    for param in &doclet.params {
        push_entry(&mut lines, "@param", param);
    }

    for ret in &doclet.returns {
        if let Some(text) = ret.description.as_deref().filter(|t| !t.trim().is_empty()) {
            push_text(&mut lines, "@returns ", text);
        }
    }

    if lines.is_empty() {
        None
    } else {
        Some(DocComment::new(lines))
    }
}

/// A single-description comment, used for class property members.
pub fn description_comment(description: Option<&str>) -> Option<DocComment> {
    let text = description.filter(|text| !text.trim().is_empty())?;
    let mut lines = Vec::new();
    push_text(&mut lines, "", text);
    Some(DocComment::new(lines))
}

fn push_entry(lines: &mut Vec<String>, tag: &str, entry: &DocParam) {
    let Some(text) = entry.description.as_deref().filter(|t| !t.trim().is_empty()) else {
        return;
    };
    let name = if entry.optional {
        match entry.defaultvalue.as_ref() {
            Some(default) => format!("[{} = {}]", entry.name, default_text(default)),
            None => format!("[{}]", entry.name),
        }
    } else {
        entry.name.clone()
    };
    push_text(lines, &format!("{tag} {name} - "), text);
}

fn default_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Push `text` with `prefix` on its first line; later lines follow as-is.
fn push_text(lines: &mut Vec<String>, prefix: &str, text: &str) {
    let mut text_lines = text.trim().lines();
    let first = text_lines.next().unwrap_or_default();
    lines.push(format!("{prefix}{}", first.trim_end()));
    lines.extend(text_lines.map(|line| line.trim_end().to_string()));
}
