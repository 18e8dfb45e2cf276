//! Building patterns from text or from parts.
//!
//! ```
//! use nuclear_route_pattern::{route_values, PatternBuilder, PolicyValue, PolicyValues};
//!
//! let policies: PolicyValues = [("id", PolicyValue::from(r"\d+"))].into_iter().collect();
//! let pattern = PatternBuilder::new("{controller}/{action}/{id?}")
//!     .defaults(route_values! { "controller" => "Home", "action" => "Index" })
//!     .policies(policies)
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(pattern.parameters().len(), 3);
//! assert_eq!(pattern.defaults().len(), 2);
//! ```

use super::parser::{self, invalid_parameter_name, is_valid_parameter_name, OPTIONAL_CANNOT_HAVE_DEFAULT};
use super::{Error, ParameterKind, ParameterPart, Part, PathSegment, PatternBuildError, RoutePattern};
use crate::policy::{ParameterPolicy, PolicyReference, PolicyValue, PolicyValues, RegexPolicy};
use crate::strmap::{eq_ignore_case, StrMap};
use crate::value::{RouteValue, RouteValues};

use std::sync::Arc;

/// Assembles a [`RoutePattern`] from a template or from path segments,
/// merging in out-of-line defaults, parameter policies and required values.
#[derive(Debug, Clone)]
pub struct PatternBuilder<'a> {
    source: Source<'a>,
    defaults: Option<RouteValues>,
    policies: Option<PolicyValues>,
    required_values: Option<RouteValues>,
}

#[derive(Debug, Clone)]
enum Source<'a> {
    Text(&'a str),
    Segments {
        raw_text: Option<&'a str>,
        segments: Vec<PathSegment>,
    },
}

impl<'a> PatternBuilder<'a> {
    /// Starts from a route template.
    pub fn new(pattern: &'a str) -> Self {
        Self::with_source(Source::Text(pattern))
    }

    /// Starts from segments built with [`segment`] and the part constructors.
    pub fn from_segments(raw_text: Option<&'a str>, segments: Vec<PathSegment>) -> Self {
        Self::with_source(Source::Segments { raw_text, segments })
    }

    fn with_source(source: Source<'a>) -> Self {
        Self {
            source,
            defaults: None,
            policies: None,
            required_values: None,
        }
    }

    pub fn defaults(mut self, defaults: RouteValues) -> Self {
        self.defaults = Some(defaults);
        self
    }

    pub fn policies(mut self, policies: PolicyValues) -> Self {
        self.policies = Some(policies);
        self
    }

    pub fn required_values(mut self, required_values: RouteValues) -> Self {
        self.required_values = Some(required_values);
        self
    }

    pub fn build(self) -> Result<RoutePattern, Error> {
        let (raw_text, segments) = match self.source {
            Source::Text(text) => match parser::parse_segments(text) {
                Ok(segments) => {
                    trace!(pattern = text, "parsed route pattern");
                    (Some(text), segments)
                }
                Err(err) => {
                    debug!(pattern = text, %err, "invalid route pattern");
                    return Err(err.into());
                }
            },
            Source::Segments { raw_text, mut segments } => {
                if let Err(msg) = parser::validate_segments(&mut segments) {
                    debug!(pattern = raw_text.unwrap_or(""), %msg, "invalid route pattern segments");
                    return Err(PatternBuildError::new(msg).into());
                }
                (raw_text, segments)
            }
        };

        let pattern = pattern_core(
            raw_text,
            self.defaults,
            self.policies.as_ref(),
            self.required_values,
            segments,
        )?;
        Ok(pattern)
    }
}

fn pattern_core(
    raw_text: Option<&str>,
    defaults: Option<RouteValues>,
    policies: Option<&PolicyValues>,
    required_values: Option<RouteValues>,
    segments: Vec<PathSegment>,
) -> Result<RoutePattern, PatternBuildError> {
    let mut merged_defaults = defaults.unwrap_or_default();

    let mut merged_policies: StrMap<Vec<PolicyReference>> = StrMap::new();
    if let Some(policies) = policies {
        for (key, value) in policies.iter() {
            let references = match value {
                PolicyValue::List(items) => items
                    .iter()
                    .map(|item| match item {
                        PolicyValue::List(_) => Err(invalid_constraint(item)),
                        _ => constraint_reference(item),
                    })
                    .collect::<Result<Vec<_>, _>>()?,
                _ => vec![constraint_reference(value)?],
            };
            merged_policies.insert(key, references);
        }
    }

    let mut parameters = Vec::new();
    let mut path_segments = Vec::with_capacity(segments.len());
    for segment in segments {
        let mut parts = Vec::with_capacity(segment.parts.len());
        for part in segment.parts {
            let part = match part {
                Part::Parameter(p) => {
                    let p = visit_parameter(&p, &mut merged_defaults, &mut merged_policies)?;
                    parameters.push(p.clone());
                    Part::Parameter(p)
                }
                other => other,
            };
            parts.push(part);
        }
        path_segments.push(PathSegment::new(parts));
    }

    let required_values = required_values.unwrap_or_default();
    for (key, value) in required_values.iter() {
        let found = value.is_any()
            || value.is_null_or_empty()
            || parameters.iter().any(|p| eq_ignore_case(p.name(), key))
            || merged_defaults
                .get(key)
                .map_or(false, |default| value.equivalent(default));
        if !found {
            return Err(PatternBuildError::new(format!(
                "No corresponding parameter or default value could be found for the required value '{}={}'. A non-null required value must correspond to a route parameter or the route pattern must have a matching default value.",
                key, value
            )));
        }
    }

    Ok(RoutePattern {
        raw_text: raw_text.map(Into::into),
        defaults: merged_defaults,
        parameter_policies: merged_policies,
        required_values,
        parameters,
        path_segments,
    })
}

fn visit_parameter(
    parameter: &ParameterPart,
    defaults: &mut RouteValues,
    policies: &mut StrMap<Vec<PolicyReference>>,
) -> Result<ParameterPart, PatternBuildError> {
    let name = parameter.name();

    let mut default = parameter.default().cloned();
    if let Some(explicit) = defaults.get(name) {
        if let Some(inline) = parameter.default() {
            if inline != explicit {
                return Err(PatternBuildError::new(format!(
                    "The route parameter '{}' has both an inline default value and an explicit default value specified. A route parameter cannot contain an inline default value when a default value is specified explicitly. Consider removing one of them.",
                    name
                )));
            }
        }
        if parameter.is_optional() {
            return Err(PatternBuildError::new(OPTIONAL_CANNOT_HAVE_DEFAULT));
        }
        default = Some(explicit.clone());
    }
    if let Some(inline) = parameter.default() {
        defaults.insert(name, inline.clone());
    }

    // Out-of-line policies come before inline ones.
    let inline = parameter.policies();
    let merged = if inline.is_empty() && !policies.contains_key(name) {
        Vec::new()
    } else {
        let references = policies.find_mut_with(name, Vec::new);
        references.extend(inline.iter().cloned());
        references.clone()
    };

    Ok(parameter.with_merged(default, merged))
}

fn invalid_constraint(value: &PolicyValue) -> PatternBuildError {
    PatternBuildError::new(format!(
        "Invalid constraint '{}'. A constraint must be of type 'string' or implement 'ParameterPolicy'.",
        value
    ))
}

fn constraint_reference(value: &PolicyValue) -> Result<PolicyReference, PatternBuildError> {
    match value {
        PolicyValue::Policy(policy) => Ok(PolicyReference::from_policy(policy.clone())),
        PolicyValue::Text(text) => regex_reference(text),
        PolicyValue::Value(RouteValue::String(text)) => regex_reference(text),
        _ => Err(invalid_constraint(value)),
    }
}

fn regex_reference(text: &str) -> Result<PolicyReference, PatternBuildError> {
    let policy = RegexPolicy::anchored(text).map_err(|err| {
        PatternBuildError::new(format!("Invalid constraint '{}'. {}", text, err))
    })?;
    Ok(PolicyReference::from_policy(Arc::new(policy)))
}

/// Converts an out-of-line constraint value into a policy reference.
///
/// Text is promoted to a case-insensitive regex policy matching `^(text)$`.
pub fn constraint(value: impl Into<PolicyValue>) -> Result<PolicyReference, PatternBuildError> {
    constraint_reference(&value.into())
}

/// A policy reference holding unresolved constraint text such as `int`.
pub fn parameter_policy(content: &str) -> Result<PolicyReference, PatternBuildError> {
    if content.is_empty() {
        return Err(PatternBuildError::new("The policy content must be non-empty."));
    }
    Ok(PolicyReference::from_content(content))
}

/// A policy reference holding a resolved policy.
pub fn policy(policy: Arc<dyn ParameterPolicy>) -> PolicyReference {
    PolicyReference::from_policy(policy)
}

pub fn segment(parts: Vec<Part>) -> Result<PathSegment, PatternBuildError> {
    if parts.is_empty() {
        return Err(PatternBuildError::new("A path segment must contain at least one part."));
    }
    Ok(PathSegment::new(parts))
}

pub fn literal_part(content: &str) -> Result<Part, PatternBuildError> {
    if content.is_empty() {
        return Err(PatternBuildError::new("The literal content must be non-empty."));
    }
    if content.contains('?') {
        return Err(PatternBuildError::new(parser::invalid_literal(content)));
    }
    Ok(Part::Literal(content.into()))
}

pub fn separator_part(content: &str) -> Result<Part, PatternBuildError> {
    if content.is_empty() {
        return Err(PatternBuildError::new("The separator content must be non-empty."));
    }
    Ok(Part::Separator(content.into()))
}

/// A standard parameter with no default and no policies.
pub fn parameter_part(name: &str) -> Result<Part, PatternBuildError> {
    parameter_part_with(name, None, ParameterKind::Standard, Vec::new())
}

pub fn parameter_part_with(
    name: &str,
    default: Option<RouteValue>,
    kind: ParameterKind,
    policies: Vec<PolicyReference>,
) -> Result<Part, PatternBuildError> {
    if !is_valid_parameter_name(name) {
        return Err(PatternBuildError::new(invalid_parameter_name(name)));
    }
    if kind == ParameterKind::Optional && default.is_some() {
        return Err(PatternBuildError::new(OPTIONAL_CANNOT_HAVE_DEFAULT));
    }
    Ok(Part::Parameter(ParameterPart::new(name, default, kind, policies, true)))
}
