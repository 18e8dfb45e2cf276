//! Route templates such as `{controller=Home}/{action=Index}/{id?}`.
//!
//! Templates are parsed into a [`RoutePattern`], matched against request
//! paths with a [`PatternMatcher`], combined with [`RoutePattern::combine`]
//! and rendered back with [`debug_string`].
//!
//! ```
//! use nuclear_route_pattern::{PatternMatcher, RoutePattern, RouteValue, RouteValues};
//!
//! let pattern = RoutePattern::parse("{controller=Home}/{action=Index}/{id?}").unwrap();
//! let matcher = PatternMatcher::new(pattern);
//!
//! let mut values = RouteValues::new();
//! assert!(matcher.try_match("/Products/Details/42", &mut values));
//! assert_eq!(values.get("id"), Some(&RouteValue::from("42")));
//! ```

#![forbid(unsafe_code)]

#[macro_use]
mod log;

mod matcher;
mod pattern;
mod policy;
mod strmap;
mod value;

pub use self::matcher::PatternMatcher;
pub use self::pattern::factory;
pub use self::pattern::{
    debug_string, parse_parameter, Error, ParameterKind, ParameterPart, Part, PathSegment,
    PatternBuildError, PatternBuilder, PatternParseError, PatternTransformer, RoutePattern,
};
pub use self::policy::{
    ParameterPolicy, PolicyReference, PolicyResolver, PolicyValue, PolicyValues, RegexPolicy,
    RegexPolicyResolver, RouteConstraint,
};
pub use self::strmap::StrMap;
pub use self::value::{RouteValue, RouteValues};
