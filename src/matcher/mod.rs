mod complex;

use crate::pattern::{Part, RoutePattern};
use crate::strmap::eq_ignore_case;
use crate::value::{RouteValue, RouteValues};

use smallvec::SmallVec;

/// Matches request paths against a [`RoutePattern`].
///
/// Matching never mutates the matcher, so one instance can serve any number
/// of threads.
#[derive(Debug, Clone)]
pub struct PatternMatcher {
    pattern: RoutePattern,
    defaults: RouteValues,
    segment_defaults: Vec<Option<RouteValue>>,
}

impl PatternMatcher {
    pub fn new(pattern: RoutePattern) -> Self {
        let defaults = pattern.defaults().clone();
        Self::with_defaults(pattern, defaults)
    }

    /// Uses `defaults` in place of the pattern's own defaults.
    pub fn with_defaults(pattern: RoutePattern, defaults: RouteValues) -> Self {
        let segment_defaults = pattern
            .path_segments()
            .iter()
            .map(|segment| {
                let parameter = segment.simple_parameter()?;
                defaults.get(parameter.name()).cloned()
            })
            .collect();

        Self {
            pattern,
            defaults,
            segment_defaults,
        }
    }

    pub fn pattern(&self) -> &RoutePattern {
        &self.pattern
    }

    pub fn defaults(&self) -> &RouteValues {
        &self.defaults
    }

    /// Matches `path` and writes the bound parameters and defaults into `values`.
    ///
    /// Values already present in `values` survive unless the path supplies
    /// one. On failure `values` may hold partial results.
    pub fn try_match(&self, path: &str, values: &mut RouteValues) -> bool {
        let parts = split_path(path);
        let segments = self.pattern.path_segments();

        if !self.match_literals(&parts) {
            return false;
        }

        let mut bound = 0;
        for (i, &part) in parts.iter().enumerate() {
            let segment = &segments[i];
            bound = i + 1;

            if let Some(parameter) = segment.simple_parameter() {
                if parameter.is_catch_all() {
                    let tail = &path[offset(path, part)..];
                    if !tail.is_empty() {
                        values.insert(parameter.name(), RouteValue::from(tail));
                    } else if let Some(default) = &self.segment_defaults[i] {
                        values.insert(parameter.name(), default.clone());
                    }
                    break;
                }
                values.insert(parameter.name(), RouteValue::from(part));
            } else if !segment.is_simple() && !complex::match_complex_segment(segment, part, values) {
                return false;
            }
        }

        // Segments the path ran out for.
        for (j, default) in self.segment_defaults.iter().enumerate().skip(bound) {
            if let (Some(default), Some(parameter)) = (default, segments[j].simple_parameter()) {
                values.try_insert(parameter.name(), default.clone());
            }
        }

        for (key, value) in self.defaults.iter() {
            values.try_insert(key, value.clone());
        }

        true
    }

    /// First pass: checks literals and segment counts without binding anything.
    fn match_literals(&self, parts: &[&str]) -> bool {
        let segments = self.pattern.path_segments();

        let mut i = 0;
        while i < parts.len() {
            let segment = match segments.get(i) {
                Some(segment) => segment,
                None => return false,
            };
            let part = parts[i];

            if segment.simple_parameter().map_or(false, |p| p.is_catch_all()) {
                return true;
            }
            if part.is_empty() {
                return false;
            }
            if let [Part::Literal(literal)] = segment.parts() {
                if !eq_ignore_case(literal, part) {
                    return false;
                }
            }
            i += 1;
        }

        segments[i..].iter().enumerate().all(|(j, segment)| {
            match segment.simple_parameter() {
                Some(parameter) => {
                    parameter.is_optional()
                        || parameter.is_catch_all()
                        || self.segment_defaults[i + j].is_some()
                }
                None => false,
            }
        })
    }
}

/// Splits a request path into segments. One leading and one trailing `/` are
/// ignored, `""` and `"/"` have no segments.
fn split_path(path: &str) -> SmallVec<[&str; 8]> {
    let path = trim_first_slash(path);
    if path.is_empty() {
        return SmallVec::new();
    }
    let path = path.strip_suffix('/').unwrap_or(path);
    path.split('/').collect()
}

#[inline]
fn trim_first_slash(s: &str) -> &str {
    s.strip_prefix('/').unwrap_or(s)
}

/// Byte offset of `dst` within `src`. `dst` must be a subslice of `src`.
#[inline]
fn offset(src: &str, dst: &str) -> usize {
    let p2 = dst.as_ptr() as usize;
    let p1 = src.as_ptr() as usize;
    p2 - p1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_segments() {
        let cases: &[(&str, &[&str])] = &[
            ("", &[]),
            ("/", &[]),
            ("/a", &["a"]),
            ("a/b", &["a", "b"]),
            ("/a/", &["a"]),
            ("/a//", &["a", ""]),
            ("//", &[""]),
            ("/a//b", &["a", "", "b"]),
        ];
        for &(path, expected) in cases {
            assert_eq!(&*split_path(path), expected, "{:?}", path);
        }
    }

    #[test]
    fn tail_offset() {
        let path = "/a/b/c";
        let parts = split_path(path);
        assert_eq!(&path[offset(path, parts[1])..], "b/c");
    }
}
