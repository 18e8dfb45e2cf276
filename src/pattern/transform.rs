use super::{Part, PathSegment, RoutePattern};
use crate::policy::{ParameterPolicy, PolicyResolver, RegexPolicyResolver};
use crate::value::RouteValues;

use std::sync::Arc;

/// Specializes patterns for a set of required values.
pub struct PatternTransformer {
    resolver: Box<dyn PolicyResolver>,
}

impl Default for PatternTransformer {
    fn default() -> Self {
        Self::new(RegexPolicyResolver)
    }
}

impl PatternTransformer {
    /// `resolver` turns inline constraint text into policies when checking
    /// required values against constraints.
    pub fn new(resolver: impl PolicyResolver + 'static) -> Self {
        Self {
            resolver: Box::new(resolver),
        }
    }

    /// Returns a copy of `original` that carries `required_values`, or `None`
    /// when the pattern could never match them.
    ///
    /// Each required value must be one of:
    /// - null or empty, for a key that is neither a parameter nor a default with another value
    /// - [`RouteValue::Any`](crate::RouteValue::Any), unless the key only has a non-empty default
    /// - a value for a parameter that satisfies its constraints
    /// - equal to a non-parameter default
    ///
    /// Parameter defaults that disagree with a required value are dropped.
    pub fn substitute_required_values(
        &self,
        original: &RoutePattern,
        required_values: &RouteValues,
    ) -> Option<RoutePattern> {
        for (key, value) in required_values.iter() {
            let parameter = original.get_parameter(key);
            let default = original.defaults().get(key);

            if value.is_null_or_empty() {
                if parameter.is_some() {
                    trace!(key, "required value is empty for a parameter");
                    return None;
                }
                if default.map_or(false, |d| !value.equivalent(d)) {
                    trace!(key, "required value is empty for a non-empty default");
                    return None;
                }
            } else if value.is_any() {
                if parameter.is_none() && default.map_or(false, |d| !d.is_null_or_empty()) {
                    trace!(key, "required value is any for a fixed default");
                    return None;
                }
            } else if parameter.is_some() || default.map_or(false, |d| value.equivalent(d)) {
                if !self.matches_constraints(original, key, required_values) {
                    trace!(key, "required value rejected by a constraint");
                    return None;
                }
            } else {
                trace!(key, "required value has no parameter or default");
                return None;
            }
        }

        let mut defaults = original.defaults().clone();
        let mut parameters = Vec::with_capacity(original.parameters().len());
        let mut path_segments = Vec::with_capacity(original.path_segments().len());
        for segment in original.path_segments() {
            let parts = segment
                .parts()
                .iter()
                .map(|part| match part {
                    Part::Parameter(p) => {
                        let conflicting = match (required_values.get(p.name()), p.default()) {
                            (Some(required), Some(default)) => {
                                !required.is_any() && !required.equivalent(default)
                            }
                            _ => false,
                        };
                        let p = if conflicting {
                            defaults.remove(p.name());
                            p.with_default(None)
                        } else {
                            p.clone()
                        };
                        parameters.push(p.clone());
                        Part::Parameter(p)
                    }
                    other => other.clone(),
                })
                .collect();
            path_segments.push(PathSegment::new(parts));
        }

        let mut merged_required = required_values.clone();
        for (key, value) in original.required_values().iter() {
            merged_required.try_insert(key, value.clone());
        }

        Some(RoutePattern {
            raw_text: original.raw_text.clone(),
            defaults,
            parameter_policies: original.parameter_policies.clone(),
            required_values: merged_required,
            parameters,
            path_segments,
        })
    }

    fn matches_constraints(&self, pattern: &RoutePattern, key: &str, values: &RouteValues) -> bool {
        let references = match pattern.parameter_policies().get(key) {
            Some(references) => references,
            None => return true,
        };
        for reference in references {
            let policy: Arc<dyn ParameterPolicy> = match (reference.policy(), reference.content()) {
                (Some(policy), _) => policy.clone(),
                (None, Some(content)) => match self.resolver.resolve(content) {
                    Some(policy) => policy,
                    None => {
                        trace!(key, content, "unresolved policy ignored");
                        continue;
                    }
                },
                (None, None) => continue,
            };
            if let Some(constraint) = policy.as_constraint() {
                if !constraint.matches(key, values) {
                    return false;
                }
            }
        }
        true
    }
}

impl std::fmt::Debug for PatternTransformer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PatternTransformer").finish_non_exhaustive()
    }
}
