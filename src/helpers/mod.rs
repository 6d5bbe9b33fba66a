//! Response unwrapping and selection-set building shared by queries and mutations.

use anyhow::{bail, Context, Result};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::client::Executor;

/// Errors reported by the GraphQL server inside an otherwise successful HTTP response.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("GraphQL error while reading '{name}': {}", .messages.join("; "))]
pub struct GraphQlError {
    pub name: String,
    pub messages: Vec<String>,
}

/// Unwrap the `name` field of a raw GraphQL response.
///
/// A response carrying `errors` (or a bare `error`) becomes a [`GraphQlError`];
/// otherwise the value under `data.<name>` is returned, `null` when missing.
pub fn format_result(name: &str, mut response: Value) -> Result<Value> {
    if let Some(messages) = error_messages(&response) {
        return Err(GraphQlError { name: name.to_string(), messages }.into());
    }
    let value = response
        .get_mut("data")
        .and_then(|data| data.get_mut(name))
        .map(Value::take)
        .unwrap_or(Value::Null);
    Ok(value)
}

fn error_messages(response: &Value) -> Option<Vec<String>> {
    match response.get("errors") {
        Some(Value::Array(errors)) if !errors.is_empty() => {
            return Some(errors.iter().map(message_of).collect());
        }
        Some(Value::Null) | Some(Value::Array(_)) | None => {}
        Some(other) => return Some(vec![message_of(other)]),
    }
    match response.get("error") {
        None | Some(Value::Null) => None,
        Some(error) => Some(vec![message_of(error)]),
    }
}

fn message_of(error: &Value) -> String {
    match error {
        Value::String(s) => s.clone(),
        other => other
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| other.to_string()),
    }
}

/// Serialize `variables`, run `document` once and unwrap the `"data"` field.
pub(crate) async fn execute_data<E, V>(client: &E, document: &str, variables: &V) -> Result<Value>
where
    E: Executor + ?Sized,
    V: Serialize + ?Sized,
{
    let variables =
        serde_json::to_value(variables).context("failed to serialize GraphQL variables")?;
    let response = client.execute(document, variables).await?;
    format_result("data", response)
}

/// Build a GraphQL selection set from field paths such as `"organization.id"`.
///
/// The first segment of each path must appear in `allowed`. Fields listed in
/// `objects` need a sub-selection; every other field must be a bare name.
pub fn fragment_builder<S: AsRef<str>>(
    fields: &[S],
    allowed: &[&str],
    objects: &[&str],
) -> Result<String> {
    if fields.is_empty() {
        bail!("at least one field must be requested");
    }
    let mut root = Selection::default();
    for field in fields {
        let field = field.as_ref().trim();
        let path: Vec<&str> = field.split('.').map(str::trim).collect();
        if path.iter().any(|segment| segment.is_empty()) {
            bail!("invalid field path '{}'", field);
        }
        if !allowed.contains(&path[0]) {
            bail!(
                "unknown field '{}'; possible fields are: {}",
                path[0],
                allowed.join(", ")
            );
        }
        let is_object = objects.contains(&path[0]);
        if is_object && path.len() == 1 {
            bail!("'{}' is an object; select a sub-field such as '{}.id'", field, field);
        }
        if !is_object && path.len() > 1 {
            bail!("'{}' has no sub-fields, cannot select '{}'", path[0], field);
        }
        root.insert(&path);
    }
    let mut out = String::new();
    root.render(&mut out);
    Ok(out)
}

#[derive(Debug, Default)]
struct Selection {
    children: Vec<(String, Selection)>,
}

impl Selection {
    fn insert(&mut self, path: &[&str]) {
        let Some((head, rest)) = path.split_first() else { return };
        let idx = match self.children.iter().position(|(name, _)| name == head) {
            Some(idx) => idx,
            None => {
                self.children.push((head.to_string(), Selection::default()));
                self.children.len() - 1
            }
        };
        self.children[idx].1.insert(rest);
    }

    fn render(&self, out: &mut String) {
        for (i, (name, child)) in self.children.iter().enumerate() {
            if i > 0 {
                out.push(' ');
            }
            out.push_str(name);
            if !child.children.is_empty() {
                out.push_str(" { ");
                child.render(out);
                out.push_str(" }");
            }
        }
    }
}
