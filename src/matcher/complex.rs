use crate::pattern::{ParameterPart, Part, PathSegment};
use crate::strmap::{ends_with_ignore_case, rfind_ignore_case};
use crate::value::{RouteValue, RouteValues};

use smallvec::SmallVec;

/// Matches a segment with several parts such as `{name}.{ext?}` against one
/// path segment.
pub(super) fn match_complex_segment(segment: &PathSegment, request: &str, values: &mut RouteValues) -> bool {
    let parts = segment.parts();
    let last = parts.len() - 1;

    // `{name}.{ext?}`: try with the optional parameter first, then without it
    // and its separator.
    if let (Part::Parameter(p), Some(Part::Separator(separator))) = (&parts[last], last.checked_sub(1).map(|i| &parts[i])) {
        if p.is_optional() {
            if match_core(parts, request, values, last) {
                return true;
            }
            if ends_with_ignore_case(request, separator) {
                return false;
            }
            return match last.checked_sub(2) {
                Some(i) => match_core(parts, request, values, i),
                None => false,
            };
        }
    }

    match_core(parts, request, values, last)
}

/// Matches `parts[..=last_used]` against `request` from right to left.
///
/// Each literal is anchored at its last occurrence before the text already
/// consumed, leaving at least one character for a parameter on its right.
fn match_core(parts: &[Part], request: &str, values: &mut RouteValues, last_used: usize) -> bool {
    let mut last_index = request.len();
    let mut pending: Option<&ParameterPart> = None;
    let mut captured: SmallVec<[(&str, &str); 4]> = SmallVec::new();

    for i in (0..=last_used).rev() {
        let part = &parts[i];
        let mut new_last_index = last_index;
        let mut literal_end = last_index;

        match part {
            Part::Parameter(p) => pending = Some(p),
            Part::Literal(literal) | Part::Separator(literal) => {
                let search_end = if pending.is_some() {
                    prev_char_boundary(request, last_index)
                } else {
                    last_index
                };
                if search_end == 0 {
                    return false;
                }
                let (start, end) = match rfind_ignore_case(&request[..search_end], literal) {
                    Some(found) => found,
                    None => return false,
                };
                // A trailing literal must end the request.
                if i == parts.len() - 1 && end != request.len() {
                    return false;
                }
                new_last_index = start;
                literal_end = end;
            }
        }

        if let Some(parameter) = pending {
            if !part.is_parameter() || i == 0 {
                let value = if part.is_parameter() {
                    &request[..last_index]
                } else {
                    &request[literal_end..last_index]
                };
                if value.is_empty() {
                    return false;
                }
                captured.push((parameter.name(), value));
                pending = None;
            }
        }

        last_index = new_last_index;
    }

    if last_index == 0 || parts[0].is_parameter() {
        for (name, value) in captured {
            values.insert(name, RouteValue::from(value));
        }
        true
    } else {
        false
    }
}

fn prev_char_boundary(s: &str, index: usize) -> usize {
    match s[..index].chars().next_back() {
        Some(c) => index - c.len_utf8(),
        None => 0,
    }
}
