use crate::strmap::StrMap;
use crate::value::{RouteValue, RouteValues};

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use regex::{Regex, RegexBuilder};

/// Out-of-line parameter policies keyed by parameter name.
pub type PolicyValues = StrMap<PolicyValue>;

/// A rule attached to a route parameter.
///
/// Implementors that restrict the values a parameter accepts also implement
/// [`RouteConstraint`] and return themselves from [`as_constraint`](Self::as_constraint).
pub trait ParameterPolicy: fmt::Debug + Send + Sync {
    /// Text rendered for this policy in a route template.
    fn describe(&self) -> Cow<'_, str>;

    fn as_constraint(&self) -> Option<&dyn RouteConstraint> {
        None
    }
}

/// A policy that decides whether a route value is acceptable.
pub trait RouteConstraint: Send + Sync {
    fn matches(&self, key: &str, values: &RouteValues) -> bool;
}

/// Turns inline constraint text such as `int` or `regex(\d+)` into a policy.
pub trait PolicyResolver: Send + Sync {
    fn resolve(&self, content: &str) -> Option<Arc<dyn ParameterPolicy>>;
}

/// A policy attached to a parameter, either as unresolved text or as a
/// resolved instance.
#[derive(Clone)]
pub struct PolicyReference {
    content: Option<Box<str>>,
    policy: Option<Arc<dyn ParameterPolicy>>,
}

impl PolicyReference {
    pub(crate) fn from_content(content: &str) -> Self {
        Self {
            content: Some(content.into()),
            policy: None,
        }
    }

    pub(crate) fn from_policy(policy: Arc<dyn ParameterPolicy>) -> Self {
        Self {
            content: None,
            policy: Some(policy),
        }
    }

    pub fn content(&self) -> Option<&str> {
        self.content.as_deref()
    }

    pub fn policy(&self) -> Option<&Arc<dyn ParameterPolicy>> {
        self.policy.as_ref()
    }

    /// The text of this reference as it appears in a route template.
    pub fn text(&self) -> Cow<'_, str> {
        match (&self.content, &self.policy) {
            (Some(content), _) => Cow::Borrowed(content),
            (None, Some(policy)) => policy.describe(),
            (None, None) => Cow::Borrowed(""),
        }
    }
}

impl fmt::Debug for PolicyReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.content, &self.policy) {
            (Some(content), _) => f.debug_tuple("Content").field(content).finish(),
            (None, Some(policy)) => f.debug_tuple("Policy").field(policy).finish(),
            (None, None) => f.write_str("Empty"),
        }
    }
}

/// An out-of-line constraint value supplied when building a pattern.
///
/// Only text, policies and lists of those are accepted. Anything else is
/// reported as an invalid constraint.
#[derive(Debug, Clone)]
pub enum PolicyValue {
    /// Promoted to a [`RegexPolicy`] anchored as `^(text)$`.
    Text(String),
    Policy(Arc<dyn ParameterPolicy>),
    List(Vec<PolicyValue>),
    Value(RouteValue),
}

impl fmt::Display for PolicyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PolicyValue::Text(s) => f.write_str(s),
            PolicyValue::Policy(p) => f.write_str(&p.describe()),
            PolicyValue::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    fmt::Display::fmt(item, f)?;
                }
                f.write_str("]")
            }
            PolicyValue::Value(v) => fmt::Display::fmt(v, f),
        }
    }
}

impl From<&str> for PolicyValue {
    fn from(s: &str) -> Self {
        PolicyValue::Text(s.to_owned())
    }
}

impl From<String> for PolicyValue {
    fn from(s: String) -> Self {
        PolicyValue::Text(s)
    }
}

impl From<Arc<dyn ParameterPolicy>> for PolicyValue {
    fn from(p: Arc<dyn ParameterPolicy>) -> Self {
        PolicyValue::Policy(p)
    }
}

impl From<RegexPolicy> for PolicyValue {
    fn from(p: RegexPolicy) -> Self {
        PolicyValue::Policy(Arc::new(p))
    }
}

impl From<Vec<PolicyValue>> for PolicyValue {
    fn from(items: Vec<PolicyValue>) -> Self {
        PolicyValue::List(items)
    }
}

impl From<RouteValue> for PolicyValue {
    fn from(v: RouteValue) -> Self {
        PolicyValue::Value(v)
    }
}

/// A constraint that matches the textual form of a value against a regular
/// expression, ignoring case.
#[derive(Debug, Clone)]
pub struct RegexPolicy {
    regex: Regex,
}

impl RegexPolicy {
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        let regex = RegexBuilder::new(pattern).case_insensitive(true).build()?;
        Ok(Self { regex })
    }

    /// A policy that must match `text` in full: `^(text)$`.
    pub fn anchored(text: &str) -> Result<Self, regex::Error> {
        Self::new(&format!("^({})$", text))
    }

    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }
}

impl ParameterPolicy for RegexPolicy {
    fn describe(&self) -> Cow<'_, str> {
        Cow::Owned(format!("regex({})", self.regex.as_str()))
    }

    fn as_constraint(&self) -> Option<&dyn RouteConstraint> {
        Some(self)
    }
}

impl RouteConstraint for RegexPolicy {
    fn matches(&self, key: &str, values: &RouteValues) -> bool {
        match values.get(key) {
            Some(value) => self.is_match(&value.to_text()),
            None => self.is_match(""),
        }
    }
}

/// Resolves `regex(<expr>)` constraint text. Every other token is left
/// unresolved.
#[derive(Debug, Default, Clone, Copy)]
pub struct RegexPolicyResolver;

impl PolicyResolver for RegexPolicyResolver {
    fn resolve(&self, content: &str) -> Option<Arc<dyn ParameterPolicy>> {
        let pattern = content.strip_prefix("regex(")?.strip_suffix(')')?;
        match RegexPolicy::new(pattern) {
            Ok(policy) => Some(Arc::new(policy)),
            Err(err) => {
                warn!(content, %err, "invalid inline regex constraint");
                None
            }
        }
    }
}
