use super::format::{part_to_string, segment_to_string};
use super::parameter::parse_parameter;
use super::{ParameterKind, Part, PathSegment, PatternParseError};
use crate::strmap::StrMap;

const INVALID_ROUTE_TEMPLATE: &str =
    "The route template cannot start with a '~' character unless followed by a '/'.";
const CONSECUTIVE_SEPARATORS: &str = "The route template separator character '/' cannot appear consecutively. It must be separated by either a parameter or a literal value.";
const MISMATCHED_PARAMETER: &str = "There is an incomplete parameter in the route template. Check that each '{' character has a matching '}' character.";
const UNESCAPED_BRACE: &str = "In a route parameter, '{' and '}' must be escaped with '{{' and '}}'.";
const CATCH_ALL_CANNOT_BE_OPTIONAL: &str = "A catch-all parameter cannot be marked optional.";
pub(super) const OPTIONAL_CANNOT_HAVE_DEFAULT: &str = "An optional parameter cannot have default value.";
const CATCH_ALL_MUST_BE_LAST: &str =
    "A catch-all parameter can only appear as the last segment of the route template.";
const CATCH_ALL_IN_MULTI_PART_SEGMENT: &str = "A path segment that contains more than one section, such as a literal section or a parameter, cannot contain a catch-all parameter.";
const CONSECUTIVE_PARAMETERS: &str = "A path segment cannot contain two consecutive parameters. They must be separated by a '/' or by a literal string.";

pub(super) const INVALID_NAME_CHARS: &[char] = &['/', '{', '}', '?', '*'];

pub(super) fn invalid_parameter_name(name: &str) -> String {
    format!(
        "The route parameter name '{}' is invalid. Route parameter names must be non-empty and cannot contain these characters: '{{', '}}', '/'. The '?' character marks a parameter as optional, and can occur only at the end of the parameter. The '*' character marks a parameter as catch-all, and can occur only at the start of the parameter.",
        name
    )
}

pub(super) fn repeated_parameter(name: &str) -> String {
    format!(
        "The route parameter name '{}' appears more than one time in the route template.",
        name
    )
}

pub(super) fn invalid_literal(literal: &str) -> String {
    format!(
        "The literal section '{}' is invalid. Literal sections cannot contain the '?' character.",
        literal
    )
}

pub(super) fn is_valid_parameter_name(name: &str) -> bool {
    !name.is_empty() && !name.contains(INVALID_NAME_CHARS)
}

/// Splits a route template into path segments.
pub(super) fn parse_segments(pattern: &str) -> Result<Vec<PathSegment>, PatternParseError> {
    let mut parser = Parser {
        text: trim_prefix(pattern).map_err(|msg| PatternParseError::new(msg, pattern))?,
        names: StrMap::new(),
    };
    parser
        .parse()
        .map_err(|msg| PatternParseError::new(msg, pattern))
}

fn trim_prefix(pattern: &str) -> Result<&str, &'static str> {
    if let Some(rest) = pattern.strip_prefix("~/") {
        return Ok(rest);
    }
    if let Some(rest) = pattern.strip_prefix('/') {
        return Ok(rest);
    }
    if pattern.starts_with('~') {
        return Err(INVALID_ROUTE_TEMPLATE);
    }
    Ok(pattern)
}

struct Parser<'a> {
    text: &'a str,
    names: StrMap<()>,
}

type ParseResult<T> = Result<T, String>;

impl Parser<'_> {
    fn byte(&self, pos: usize) -> Option<u8> {
        self.text.as_bytes().get(pos).copied()
    }

    fn parse(&mut self) -> ParseResult<Vec<PathSegment>> {
        let mut segments = Vec::new();
        let mut pos = 0;
        while pos < self.text.len() {
            if self.byte(pos) == Some(b'/') {
                return Err(CONSECUTIVE_SEPARATORS.into());
            }
            let (parts, next) = self.parse_segment(pos)?;
            segments.push(PathSegment::new(parts));
            pos = next + 1;
        }

        validate_catch_all(&segments)?;
        Ok(segments)
    }

    /// Parses the parts of the segment starting at `pos`. Returns them and the
    /// position of the terminating `/` or the end of the text.
    fn parse_segment(&mut self, mut pos: usize) -> ParseResult<(Vec<Part>, usize)> {
        let mut parts = Vec::new();
        loop {
            pos = match (self.byte(pos), self.byte(pos + 1)) {
                (Some(b'{'), None) => return Err(MISMATCHED_PARAMETER.into()),
                (Some(b'{'), Some(b'{')) => self.parse_literal(pos, &mut parts)?,
                (Some(b'{'), Some(_)) => self.parse_parameter(pos, &mut parts)?,
                _ => self.parse_literal(pos, &mut parts)?,
            };
            match self.byte(pos) {
                None | Some(b'/') => break,
                Some(_) => {}
            }
        }

        validate_segment(&mut parts)?;
        Ok((parts, pos))
    }

    /// `pos` is at the opening brace, which is not followed by another one.
    fn parse_parameter(&mut self, start: usize, parts: &mut Vec<Part>) -> ParseResult<usize> {
        let mut pos = start + 1;
        loop {
            match self.byte(pos) {
                Some(b'{') => match self.byte(pos + 1) {
                    Some(b'{') => pos += 1,
                    Some(_) => return Err(UNESCAPED_BRACE.into()),
                    None => return Err(MISMATCHED_PARAMETER.into()),
                },
                Some(b'}') => match self.byte(pos + 1) {
                    Some(b'}') => pos += 1,
                    _ => {
                        pos += 1;
                        break;
                    }
                },
                Some(_) => {}
                None => return Err(MISMATCHED_PARAMETER.into()),
            }
            pos += 1;
            if pos >= self.text.len() {
                return Err(MISMATCHED_PARAMETER.into());
            }
        }

        let raw = &self.text[start..pos];
        if raw == "{}" {
            return Err(invalid_parameter_name(""));
        }

        let inside = unescape(&raw[1..raw.len() - 1]);
        let parameter = parse_parameter(&inside);

        if inside.starts_with('*') && inside.ends_with('?') {
            return Err(CATCH_ALL_CANNOT_BE_OPTIONAL.into());
        }
        if parameter.is_optional() && parameter.default().is_some() {
            return Err(OPTIONAL_CANNOT_HAVE_DEFAULT.into());
        }
        let name = parameter.name();
        if !is_valid_parameter_name(name) {
            return Err(invalid_parameter_name(name));
        }
        if !self.names.try_insert(name, ()) {
            return Err(repeated_parameter(name));
        }

        parts.push(Part::Parameter(parameter));
        Ok(pos)
    }

    fn parse_literal(&self, start: usize, parts: &mut Vec<Part>) -> ParseResult<usize> {
        let mut pos = start;
        loop {
            match self.byte(pos) {
                Some(b'/') | None => break,
                Some(b'{') => match self.byte(pos + 1) {
                    Some(b'{') => pos += 1,
                    Some(_) => break,
                    None => return Err(MISMATCHED_PARAMETER.into()),
                },
                Some(b'}') => match self.byte(pos + 1) {
                    Some(b'}') => pos += 1,
                    _ => return Err(MISMATCHED_PARAMETER.into()),
                },
                Some(_) => {}
            }
            pos += 1;
        }

        let literal = unescape(&self.text[start..pos]);
        if literal.contains('?') {
            return Err(invalid_literal(&literal));
        }
        parts.push(Part::Literal(literal.into()));
        Ok(pos)
    }
}

fn unescape(text: &str) -> String {
    text.replace("}}", "}").replace("{{", "{")
}

fn validate_segment(parts: &mut [Part]) -> ParseResult<()> {
    if parts.len() > 1 && parts.iter().any(|p| p.as_parameter().map_or(false, |p| p.is_catch_all())) {
        return Err(CATCH_ALL_IN_MULTI_PART_SEGMENT.into());
    }

    for i in 0..parts.len() {
        let parameter = match &parts[i] {
            Part::Parameter(p) => p,
            _ => continue,
        };

        if parameter.is_optional() {
            if let Some(next) = parts.get(i + 1) {
                return Err(format!(
                    "An optional parameter must be at the end of the segment. In the segment '{}', optional parameter '{}' is followed by '{}'.",
                    segment_to_string(parts),
                    parameter.name(),
                    part_to_string(next)
                ));
            }
            if i > 0 {
                let name = parameter.name().to_owned();
                match &parts[i - 1] {
                    Part::Separator(_) => {}
                    Part::Literal(lit) if &**lit == "." => {
                        let separator = Part::Separator(lit.clone());
                        parts[i - 1] = separator;
                    }
                    previous => {
                        return Err(format!(
                            "In the segment '{}', the optional parameter '{}' is preceded by an invalid segment '{}'. Only a period (.) can precede an optional parameter.",
                            segment_to_string(parts),
                            name,
                            part_to_string(previous)
                        ));
                    }
                }
            }
        }

        if i > 0 && parts[i - 1].is_parameter() {
            return Err(CONSECUTIVE_PARAMETERS.into());
        }
    }

    Ok(())
}

/// Checks segments that were assembled without going through the parser:
/// part placement in every segment, catch-all placement and unique names.
pub(super) fn validate_segments(segments: &mut [PathSegment]) -> ParseResult<()> {
    let mut names: StrMap<()> = StrMap::new();
    for segment in segments.iter_mut() {
        validate_segment(&mut segment.parts)?;
        for parameter in segment.parts.iter().filter_map(Part::as_parameter) {
            if !names.try_insert(parameter.name(), ()) {
                return Err(repeated_parameter(parameter.name()));
            }
        }
    }
    validate_catch_all(segments)
}

pub(super) fn validate_catch_all(segments: &[PathSegment]) -> ParseResult<()> {
    let last = segments.len().saturating_sub(1);
    for (i, segment) in segments.iter().enumerate() {
        let parts = segment.parts();
        for (j, part) in parts.iter().enumerate() {
            let is_catch_all = part
                .as_parameter()
                .map_or(false, |p| p.kind() == ParameterKind::CatchAll);
            if is_catch_all && (i != last || j != parts.len() - 1) {
                return Err(CATCH_ALL_MUST_BE_LAST.into());
            }
        }
    }
    Ok(())
}
