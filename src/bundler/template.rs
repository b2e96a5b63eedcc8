//! Placeholder substitution for `{a.b.c}` expressions.
//!
//! Placeholders are resolved against a JSON value by walking the dotted key
//! path. Unknown keys are left untouched, so rendering never fails. Output is
//! re-rendered until it stops changing, which lets values refer to other
//! placeholders.

use regex::{Captures, Regex};
use serde_json::Value;
use std::sync::LazyLock;

/// Upper bound on substitution passes for self-referential data.
pub const MAX_RENDER_PASSES: usize = 32;

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{([A-Za-z0-9_.$\-]+)\}").expect("placeholder pattern is a valid regex")
});

/// Render `template` against `data` until a fixed point is reached.
///
/// ```
/// use kodegen_bundler_artifacts::bundler::render;
/// use serde_json::json;
///
/// let data = json!({ "a": "{b}", "b": "x" });
/// assert_eq!(render("{a}", &data), "x");
/// assert_eq!(render("{missing}", &data), "{missing}");
/// ```
pub fn render(template: &str, data: &Value) -> String {
    let mut current = template.to_string();
    for _ in 0..MAX_RENDER_PASSES {
        let next = render_once(&current, data);
        if next == current {
            return next;
        }
        current = next;
    }
    log::warn!(
        "Template '{}' did not settle after {} passes; using '{}'",
        template,
        MAX_RENDER_PASSES,
        current
    );
    current
}

/// Single substitution pass.
fn render_once(template: &str, data: &Value) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &Captures<'_>| {
            let expr = &caps[1];
            match lookup(data, expr) {
                Some(value) => stringify(value),
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}

/// Walk `data` along the dotted key path `expr`.
fn lookup<'a>(data: &'a Value, expr: &str) -> Option<&'a Value> {
    expr.split('.').try_fold(data, |value, key| match value {
        Value::Object(map) => map.get(key),
        Value::Array(items) => key.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    })
}

fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}
