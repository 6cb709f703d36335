//! `${name}` placeholder substitution for monitor field values.
//!
//! A placeholder may carry a fallback after the first colon:
//! `${base_url:https://example.com}`. Substitution never fails the caller;
//! problems are reported through the diagnostics sink and the value is kept.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;
use synthmon_commons::DiagnosticsSink;
use thiserror::Error;

use crate::params::ParamsMap;
use crate::value::display_value;

const PLACEHOLDER_OPEN: &str = "${";
const PLACEHOLDER_CLOSE: char = '}';
const DEFAULT_SEPARATOR: char = ':';

/// Matches a complete `${...}` placeholder, capturing its body.
static PLACEHOLDER_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\{([^}]*)\}").expect("Failed to compile placeholder regex")
});

/// One segment of a parsed template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParsedVar<'a> {
    Text(&'a str),
    Var {
        name: &'a str,
        default: Option<&'a str>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    #[error("unterminated placeholder starting at byte {offset}")]
    Unterminated { offset: usize },
    #[error("placeholder at byte {offset} has an empty name")]
    EmptyName { offset: usize },
}

/// Split `input` into literal text and placeholders.
pub fn parse_vars(input: &str) -> Result<Vec<ParsedVar<'_>>, TemplateError> {
    let mut parts = Vec::new();
    let mut last_end = 0;

    for captures in PLACEHOLDER_REGEX.captures_iter(input) {
        let (Some(whole), Some(body)) = (captures.get(0), captures.get(1)) else {
            continue;
        };

        let text = input.get(last_end..whole.start()).unwrap_or_default();
        if !text.is_empty() {
            parts.push(ParsedVar::Text(text));
        }

        let (name, default) = match body.as_str().split_once(DEFAULT_SEPARATOR) {
            Some((name, default)) => (name.trim(), Some(default)),
            None => (body.as_str().trim(), None),
        };
        if name.is_empty() {
            return Err(TemplateError::EmptyName {
                offset: whole.start(),
            });
        }
        parts.push(ParsedVar::Var { name, default });
        last_end = whole.end();
    }

    let rest = input.get(last_end..).unwrap_or_default();
    if let Some(start) = rest.find(PLACEHOLDER_OPEN) {
        return Err(TemplateError::Unterminated {
            offset: last_end + start,
        });
    }
    if !rest.is_empty() {
        parts.push(ParsedVar::Text(rest));
    }
    Ok(parts)
}

/// Join parsed segments, resolving placeholders from `params`. Placeholders
/// with neither a param nor a default are kept verbatim and reported once
/// each.
pub fn replace_vars_with_params(
    vars: &[ParsedVar<'_>],
    params: &ParamsMap,
    diagnostics: &dyn DiagnosticsSink,
) -> String {
    let mut output = String::new();
    for var in vars {
        match *var {
            ParsedVar::Text(text) => output.push_str(text),
            ParsedVar::Var { name, default } => match (params.get(name), default) {
                (Some(value), _) => output.push_str(&display_value(value)),
                (None, Some(default)) => output.push_str(default),
                (None, None) => {
                    diagnostics.warn(&format!(
                        "no value found for parameter `{name}`, keeping placeholder"
                    ));
                    output.push_str(PLACEHOLDER_OPEN);
                    output.push_str(name);
                    output.push(PLACEHOLDER_CLOSE);
                }
            },
        }
    }
    output
}

fn substitute(
    input: &str,
    params: &ParamsMap,
    diagnostics: &dyn DiagnosticsSink,
) -> Result<String, TemplateError> {
    let vars = parse_vars(input)?;
    Ok(replace_vars_with_params(&vars, params, diagnostics))
}

/// Substitute placeholders in a field value.
///
/// Falsy values (`null`, booleans, `""`, `0`) are returned unchanged. Strings
/// are substituted directly; any other value is JSON-encoded, substituted and
/// decoded again, keeping the original if the result is no longer valid JSON.
pub fn replace_string_with_params(
    value: &Value,
    params: &ParamsMap,
    diagnostics: &dyn DiagnosticsSink,
) -> Value {
    match value {
        Value::Null | Value::Bool(_) => value.clone(),
        Value::String(text) if text.is_empty() => value.clone(),
        Value::Number(_) if !crate::value::is_truthy(value) => value.clone(),
        Value::String(text) => {
            if !text.contains(PLACEHOLDER_OPEN) {
                return value.clone();
            }
            match substitute(text, params, diagnostics) {
                Ok(replaced) => Value::String(replaced),
                Err(err) => {
                    diagnostics.error(&format!("error parsing vars for value {value}: {err}"));
                    value.clone()
                }
            }
        }
        other => {
            let encoded = other.to_string();
            if !encoded.contains(PLACEHOLDER_OPEN) {
                return value.clone();
            }
            let replaced = match substitute(&encoded, params, diagnostics) {
                Ok(replaced) => replaced,
                Err(err) => {
                    diagnostics.error(&format!("error parsing vars for value {value}: {err}"));
                    return value.clone();
                }
            };
            match serde_json::from_str(&replaced) {
                Ok(decoded) => decoded,
                Err(err) => {
                    diagnostics.error(&format!("error parsing vars for value {value}: {err}"));
                    value.clone()
                }
            }
        }
    }
}
