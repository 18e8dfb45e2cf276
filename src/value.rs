use crate::strmap::{eq_ignore_case, StrMap};

use std::borrow::Cow;
use std::fmt;

/// Route values keyed by name, compared without regard to case.
pub type RouteValues = StrMap<RouteValue>;

/// A default, required or matched route value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RouteValue {
    Null,
    String(String),
    Integer(i64),
    Boolean(bool),
    /// Required value sentinel meaning "any value, including none".
    Any,
}

impl RouteValue {
    pub fn is_null(&self) -> bool {
        matches!(self, RouteValue::Null)
    }

    pub fn is_any(&self) -> bool {
        matches!(self, RouteValue::Any)
    }

    /// `Null` or the empty string.
    pub fn is_null_or_empty(&self) -> bool {
        match self {
            RouteValue::Null => true,
            RouteValue::String(s) => s.is_empty(),
            _ => false,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            RouteValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// The textual form used when a value is substituted into a path.
    pub fn to_text(&self) -> Cow<'_, str> {
        match self {
            RouteValue::Null => Cow::Borrowed(""),
            RouteValue::String(s) => Cow::Borrowed(s),
            RouteValue::Integer(n) => Cow::Owned(n.to_string()),
            RouteValue::Boolean(b) => Cow::Owned(b.to_string()),
            RouteValue::Any => Cow::Borrowed("*"),
        }
    }

    /// Loose equality used for required values.
    ///
    /// Values compare by their textual form ignoring case. `Null` and the
    /// empty string are equivalent. `Any` is only equivalent to itself.
    pub fn equivalent(&self, other: &RouteValue) -> bool {
        match (self, other) {
            (RouteValue::Any, RouteValue::Any) => true,
            (RouteValue::Any, _) | (_, RouteValue::Any) => false,
            _ => {
                let (a, b) = (self.to_text(), other.to_text());
                if a.is_empty() || b.is_empty() {
                    a.is_empty() && b.is_empty()
                } else {
                    eq_ignore_case(&a, &b)
                }
            }
        }
    }
}

impl Default for RouteValue {
    fn default() -> Self {
        RouteValue::Null
    }
}

impl fmt::Display for RouteValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

impl From<&str> for RouteValue {
    fn from(s: &str) -> Self {
        RouteValue::String(s.to_owned())
    }
}

impl From<String> for RouteValue {
    fn from(s: String) -> Self {
        RouteValue::String(s)
    }
}

impl From<i64> for RouteValue {
    fn from(n: i64) -> Self {
        RouteValue::Integer(n)
    }
}

impl From<i32> for RouteValue {
    fn from(n: i32) -> Self {
        RouteValue::Integer(n.into())
    }
}

impl From<bool> for RouteValue {
    fn from(b: bool) -> Self {
        RouteValue::Boolean(b)
    }
}

impl<T: Into<RouteValue>> From<Option<T>> for RouteValue {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(v) => v.into(),
            None => RouteValue::Null,
        }
    }
}

/// Builds [`RouteValues`](crate::RouteValues) from `key => value` pairs.
///
/// ```
/// use nuclear_route_pattern::{route_values, RouteValue};
///
/// let values = route_values! {
///     "controller" => "Home",
///     "id" => 42,
///     "area" => RouteValue::Null,
/// };
/// assert_eq!(values.get("CONTROLLER"), Some(&RouteValue::from("Home")));
/// ```
#[macro_export]
macro_rules! route_values {
    () => {
        $crate::RouteValues::new()
    };
    {$($key:expr => $value:expr),+ $(,)?} => {{
        let mut __values = $crate::RouteValues::new();
        $(
            __values.insert($key, $crate::RouteValue::from($value));
        )+
        __values
    }};
}
