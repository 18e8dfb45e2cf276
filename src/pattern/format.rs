use super::{ParameterKind, ParameterPart, Part, RoutePattern};
use crate::value::{RouteValue, RouteValues};

/// Renders `pattern` back into a route template, substituting its required values.
///
/// A parameter whose required value is set, non-empty and not
/// [`RouteValue::Any`] is replaced by that value.
pub fn debug_string(pattern: &RoutePattern) -> String {
    render(pattern, Some(pattern.required_values()))
}

pub(super) fn render(pattern: &RoutePattern, required: Option<&RouteValues>) -> String {
    let mut buf = String::new();

    let raw = pattern.raw_text().unwrap_or("");
    if raw.starts_with("~/") {
        buf.push_str("~/");
    } else if raw.starts_with('/') {
        buf.push('/');
    }

    for (i, segment) in pattern.path_segments().iter().enumerate() {
        if i > 0 {
            buf.push('/');
        }
        for part in segment.parts() {
            match part {
                Part::Literal(s) | Part::Separator(s) => buf.push_str(s),
                Part::Parameter(p) => match required.and_then(|r| substitute(r, p)) {
                    Some(value) => buf.push_str(&value.to_text()),
                    None => write_parameter(&mut buf, p),
                },
            }
        }
    }

    if raw.len() > 1 && raw.ends_with('/') && !buf.ends_with('/') {
        buf.push('/');
    }

    if buf.is_empty() {
        buf.push('/');
    }
    buf
}

fn substitute<'a>(required: &'a RouteValues, parameter: &ParameterPart) -> Option<&'a RouteValue> {
    required
        .get(parameter.name())
        .filter(|v| !v.is_null_or_empty() && !v.is_any())
}

fn write_parameter(buf: &mut String, parameter: &ParameterPart) {
    buf.push('{');
    if parameter.kind() == ParameterKind::CatchAll {
        buf.push('*');
        if !parameter.encode_slashes() {
            buf.push('*');
        }
    }
    buf.push_str(parameter.name());
    for policy in parameter.policies() {
        buf.push(':');
        buf.push_str(&policy.text());
    }
    if let Some(default) = parameter.default() {
        buf.push('=');
        buf.push_str(&default.to_text());
    }
    if parameter.is_optional() {
        buf.push('?');
    }
    buf.push('}');
}

pub(super) fn parameter_to_string(parameter: &ParameterPart) -> String {
    let mut buf = String::new();
    write_parameter(&mut buf, parameter);
    buf
}

pub(super) fn part_to_string(part: &Part) -> String {
    match part {
        Part::Literal(s) | Part::Separator(s) => s.to_string(),
        Part::Parameter(p) => parameter_to_string(p),
    }
}

pub(super) fn segment_to_string(parts: &[Part]) -> String {
    parts.iter().map(part_to_string).collect()
}
