mod combine;
mod error;
mod format;
mod parameter;
mod parser;
mod transform;

pub mod factory;

pub use self::error::{Error, PatternBuildError, PatternParseError};
pub use self::factory::PatternBuilder;
pub use self::format::debug_string;
pub use self::parameter::parse_parameter;
pub use self::transform::PatternTransformer;

use crate::policy::PolicyReference;
use crate::strmap::{eq_ignore_case, StrMap};
use crate::value::{RouteValue, RouteValues};

use std::fmt;

/// A parsed route template.
///
/// Patterns are immutable once built and can be shared between threads.
#[derive(Debug, Clone)]
pub struct RoutePattern {
    raw_text: Option<Box<str>>,
    defaults: RouteValues,
    parameter_policies: StrMap<Vec<PolicyReference>>,
    required_values: RouteValues,
    parameters: Vec<ParameterPart>,
    path_segments: Vec<PathSegment>,
}

/// One `/`-delimited segment of a pattern.
#[derive(Debug, Clone)]
pub struct PathSegment {
    parts: Vec<Part>,
}

#[derive(Debug, Clone)]
pub enum Part {
    Literal(Box<str>),
    Parameter(ParameterPart),
    /// A literal that introduces a trailing optional parameter, as `.` in `{name}.{ext?}`.
    Separator(Box<str>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterKind {
    Standard,
    Optional,
    CatchAll,
}

#[derive(Debug, Clone)]
pub struct ParameterPart {
    name: Box<str>,
    default: Option<RouteValue>,
    kind: ParameterKind,
    policies: Vec<PolicyReference>,
    encode_slashes: bool,
}

impl RoutePattern {
    /// Value of a required value that matches any value, including none.
    pub const REQUIRED_VALUE_ANY: RouteValue = RouteValue::Any;

    /// Parses a route template.
    ///
    /// See [`PatternBuilder`] for supplying defaults, policies and required values.
    pub fn parse(pattern: &str) -> Result<Self, Error> {
        PatternBuilder::new(pattern).build()
    }

    /// Concatenates `self` and `right` into a new pattern.
    pub fn combine(&self, right: &RoutePattern) -> Result<RoutePattern, Error> {
        combine::combine(self, right)
    }

    pub fn raw_text(&self) -> Option<&str> {
        self.raw_text.as_deref()
    }

    pub fn defaults(&self) -> &RouteValues {
        &self.defaults
    }

    pub fn parameter_policies(&self) -> &StrMap<Vec<PolicyReference>> {
        &self.parameter_policies
    }

    pub fn required_values(&self) -> &RouteValues {
        &self.required_values
    }

    pub fn parameters(&self) -> &[ParameterPart] {
        &self.parameters
    }

    pub fn path_segments(&self) -> &[PathSegment] {
        &self.path_segments
    }

    pub fn get_parameter(&self, name: &str) -> Option<&ParameterPart> {
        self.parameters
            .iter()
            .find(|p| eq_ignore_case(&p.name, name))
    }

    /// Renders the pattern with its required values substituted.
    pub fn debug_string(&self) -> String {
        format::debug_string(self)
    }
}

impl fmt::Display for RoutePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.raw_text {
            Some(raw) => f.write_str(raw),
            None => f.write_str(&format::render(self, None)),
        }
    }
}

impl PathSegment {
    pub(crate) fn new(parts: Vec<Part>) -> Self {
        Self { parts }
    }

    pub fn parts(&self) -> &[Part] {
        &self.parts
    }

    /// A segment with exactly one part.
    pub fn is_simple(&self) -> bool {
        self.parts.len() == 1
    }

    /// The parameter of a simple parameter segment.
    pub(crate) fn simple_parameter(&self) -> Option<&ParameterPart> {
        match &*self.parts {
            [Part::Parameter(p)] => Some(p),
            _ => None,
        }
    }
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format::segment_to_string(&self.parts))
    }
}

impl Part {
    pub fn is_literal(&self) -> bool {
        matches!(self, Part::Literal(_))
    }

    pub fn is_parameter(&self) -> bool {
        matches!(self, Part::Parameter(_))
    }

    pub fn is_separator(&self) -> bool {
        matches!(self, Part::Separator(_))
    }

    pub fn as_parameter(&self) -> Option<&ParameterPart> {
        match self {
            Part::Parameter(p) => Some(p),
            _ => None,
        }
    }

    /// Text of a literal or separator part.
    pub fn content(&self) -> Option<&str> {
        match self {
            Part::Literal(s) | Part::Separator(s) => Some(s),
            Part::Parameter(_) => None,
        }
    }
}

impl fmt::Display for Part {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format::part_to_string(self))
    }
}

impl ParameterPart {
    pub(crate) fn new(
        name: &str,
        default: Option<RouteValue>,
        kind: ParameterKind,
        policies: Vec<PolicyReference>,
        encode_slashes: bool,
    ) -> Self {
        Self {
            name: name.into(),
            default,
            kind,
            policies,
            encode_slashes,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn default(&self) -> Option<&RouteValue> {
        self.default.as_ref()
    }

    pub fn kind(&self) -> ParameterKind {
        self.kind
    }

    pub fn policies(&self) -> &[PolicyReference] {
        &self.policies
    }

    /// `false` for catch-all parameters declared with `**`.
    pub fn encode_slashes(&self) -> bool {
        self.encode_slashes
    }

    pub fn is_optional(&self) -> bool {
        self.kind == ParameterKind::Optional
    }

    pub fn is_catch_all(&self) -> bool {
        self.kind == ParameterKind::CatchAll
    }

    pub(crate) fn with_default(&self, default: Option<RouteValue>) -> Self {
        Self {
            default,
            ..self.clone()
        }
    }

    pub(crate) fn with_merged(&self, default: Option<RouteValue>, policies: Vec<PolicyReference>) -> Self {
        Self {
            default,
            policies,
            ..self.clone()
        }
    }
}

impl fmt::Display for ParameterPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format::parameter_to_string(self))
    }
}
