use super::parser::{repeated_parameter, validate_catch_all};
use super::{Error, PatternBuildError, PatternParseError, RoutePattern};
use crate::strmap::StrMap;

pub(super) fn combine(left: &RoutePattern, right: &RoutePattern) -> Result<RoutePattern, Error> {
    let raw_text = combine_raw_text(left.raw_text(), right.raw_text());
    let raw_display = raw_text.as_deref().unwrap_or("");

    let mut names: StrMap<()> = StrMap::new();
    let mut parameters = Vec::with_capacity(left.parameters.len() + right.parameters.len());
    for parameter in left.parameters.iter().chain(right.parameters.iter()) {
        if !names.try_insert(parameter.name(), ()) {
            return Err(PatternParseError::new(repeated_parameter(parameter.name()), raw_display).into());
        }
        parameters.push(parameter.clone());
    }

    let mut path_segments = left.path_segments.clone();
    path_segments.extend(right.path_segments.iter().cloned());
    validate_catch_all(&path_segments).map_err(|msg| PatternParseError::new(msg, raw_display))?;

    let defaults = combine_values("Defaults", raw_display, &left.defaults, &right.defaults)?;
    let required_values = combine_values(
        "RequiredValues",
        raw_display,
        &left.required_values,
        &right.required_values,
    )?;

    let mut parameter_policies = left.parameter_policies.clone();
    for (key, value) in right.parameter_policies.iter() {
        if !parameter_policies.try_insert(key, value.clone()) {
            return Err(repeated_entry("ParameterPolicies", raw_display, key).into());
        }
    }

    debug!(pattern = raw_display, "combined route patterns");

    Ok(RoutePattern {
        raw_text: raw_text.map(Into::into),
        defaults,
        parameter_policies,
        required_values,
        parameters,
        path_segments,
    })
}

fn combine_values<T: Clone + PartialEq>(
    dictionary: &str,
    raw_text: &str,
    left: &StrMap<T>,
    right: &StrMap<T>,
) -> Result<StrMap<T>, PatternBuildError> {
    let mut combined = left.clone();
    for (key, value) in right.iter() {
        match combined.get(key) {
            Some(existing) if existing == value => {}
            Some(_) => return Err(repeated_entry(dictionary, raw_text, key)),
            None => {
                combined.insert(key, value.clone());
            }
        }
    }
    Ok(combined)
}

fn repeated_entry(dictionary: &str, raw_text: &str, key: &str) -> PatternBuildError {
    PatternBuildError::new(format!(
        "The route pattern '{}' has multiple values for the '{}' key '{}'. The combined patterns must not define different values for the same key.",
        raw_text, dictionary, key
    ))
}

/// Joins two raw texts with exactly one `/` between non-empty halves.
fn combine_raw_text(left: Option<&str>, right: Option<&str>) -> Option<String> {
    let (left, right) = match (left, right) {
        (None | Some(""), right) => return right.map(str::to_owned),
        (left, None | Some("")) => return left.map(str::to_owned),
        (Some(left), Some(right)) => (left, right),
    };

    let joined = match (left.ends_with('/'), right.starts_with('/')) {
        (true, true) => format!("{}{}", left, &right[1..]),
        (false, false) => format!("{}/{}", left, right),
        _ => format!("{}{}", left, right),
    };
    Some(joined)
}
