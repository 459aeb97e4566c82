//! Referential integrity between metadata and method signatures.

use crate::error::{GenerateError, Result};

/// Fail with `UnboundParameter` unless `referenced` is one of `parameters`.
pub fn ensure_parameter_exists<S: AsRef<str>>(
    method: &str,
    parameters: &[S],
    referenced: &str,
) -> Result<()> {
    if parameters.iter().any(|p| p.as_ref() == referenced) {
        return Ok(());
    }
    Err(GenerateError::UnboundParameter {
        method: method.to_string(),
        parameter: referenced.to_string(),
    })
}

/// Names of the `{placeholder}`s in a path template, in order of first
/// appearance. Placeholders may share a segment with literal text
/// (`/files/{name}.json`). Names are taken verbatim, so `{ id }` names
/// ` id ` and only binds to a parameter of that exact name.
pub fn path_placeholders(path: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    let mut rest = path;
    while let Some(start) = rest.find('{') {
        let after = &rest[start + 1..];
        let Some(end) = after.find('}') else {
            break;
        };
        let name = &after[..end];
        if !name.is_empty() && !names.iter().any(|n| n == name) {
            names.push(name.to_string());
        }
        rest = &after[end + 1..];
    }
    names
}
