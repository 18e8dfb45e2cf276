use super::{ParameterKind, ParameterPart};
use crate::policy::PolicyReference;
use crate::value::RouteValue;

/// Parses the text inside one `{...}` token.
///
/// Never fails: malformed constraint syntax degrades into constraint text.
/// Name validation is left to the caller.
pub fn parse_parameter(parameter: &str) -> ParameterPart {
    if parameter.is_empty() {
        return ParameterPart::new("", None, ParameterKind::Standard, Vec::new(), true);
    }

    let bytes = parameter.as_bytes();
    let mut start = 0;
    let mut end = bytes.len();
    let mut kind = ParameterKind::Standard;
    let mut encode_slashes = true;

    if parameter.starts_with("**") {
        kind = ParameterKind::CatchAll;
        encode_slashes = false;
        start = 2;
    } else if bytes[0] == b'*' {
        kind = ParameterKind::CatchAll;
        start = 1;
    }

    if bytes[end - 1] == b'?' {
        kind = ParameterKind::Optional;
        end -= 1;
    }

    // The name runs up to the first ':' or '=' that is not its first character.
    let mut name = "";
    let mut current = start;
    let mut constraints_from = None;
    while current < end {
        let c = bytes[current];
        if (c == b':' || c == b'=') && current != start {
            name = &parameter[start..current];
            constraints_from = Some(current - 1);
            break;
        }
        if current == end - 1 {
            name = &parameter[start..end];
        }
        current += 1;
    }

    let (policies, current) = match constraints_from {
        Some(from) => parse_constraints(parameter, from, end),
        None => (Vec::new(), current),
    };

    let default = if current < end && bytes[current] == b'=' {
        Some(RouteValue::from(&parameter[current + 1..end]))
    } else {
        None
    };

    ParameterPart::new(name, default, kind, policies, encode_slashes)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Start,
    ParsingName,
    InsideParenthesis,
    End,
}

/// Scans `:constraint` tokens starting at `from` (the last character of the
/// name). Returns the tokens and the position where scanning stopped.
fn parse_constraints(text: &str, from: usize, end: usize) -> (Vec<PolicyReference>, usize) {
    let bytes = text.as_bytes();
    let at = |i: isize| -> Option<u8> {
        if i < 0 || i as usize >= end {
            None
        } else {
            Some(bytes[i as usize])
        }
    };
    let slice = |a: isize, b: isize| &text[a as usize..b as usize];

    let mut policies = Vec::new();
    let mut state = State::Start;
    let mut current = from as isize;
    let mut token_start = current;

    loop {
        let c = at(current);
        match state {
            State::Start => match c {
                None => state = State::End,
                Some(b':') => {
                    state = State::ParsingName;
                    token_start = current + 1;
                }
                Some(b'(') => state = State::InsideParenthesis,
                Some(b'=') => {
                    state = State::End;
                    current -= 1;
                }
                Some(_) => {}
            },
            State::InsideParenthesis => match c {
                None => {
                    state = State::End;
                    policies.push(PolicyReference::from_content(slice(token_start, current)));
                }
                Some(b')') => match at(current + 1) {
                    None => {
                        state = State::End;
                        policies.push(PolicyReference::from_content(slice(token_start, current + 1)));
                    }
                    Some(b':') => {
                        state = State::Start;
                        policies.push(PolicyReference::from_content(slice(token_start, current + 1)));
                        token_start = current + 1;
                    }
                    Some(b'=') => {
                        state = State::End;
                        policies.push(PolicyReference::from_content(slice(token_start, current + 1)));
                    }
                    Some(_) => {}
                },
                Some(delimiter @ (b':' | b'=')) => {
                    // A delimiter inside parentheses belongs to the argument
                    // unless no closing parenthesis follows.
                    let closing = bytes[current as usize + 1..]
                        .iter()
                        .position(|&b| b == b')')
                        .map(|i| current + 1 + i as isize);
                    match closing {
                        Some(closing) => current = closing - 1,
                        None => {
                            policies.push(PolicyReference::from_content(slice(token_start, current)));
                            if delimiter == b':' {
                                state = State::ParsingName;
                                token_start = current + 1;
                            } else {
                                state = State::End;
                                current -= 1;
                            }
                        }
                    }
                }
                Some(_) => {}
            },
            State::ParsingName => match c {
                None => {
                    state = State::End;
                    if current > token_start {
                        policies.push(PolicyReference::from_content(slice(token_start, current)));
                    }
                }
                Some(b':') => {
                    if current > token_start {
                        policies.push(PolicyReference::from_content(slice(token_start, current)));
                    }
                    token_start = current + 1;
                }
                Some(b'(') => state = State::InsideParenthesis,
                Some(b'=') => {
                    state = State::End;
                    if current > token_start {
                        policies.push(PolicyReference::from_content(slice(token_start, current)));
                    }
                    current -= 1;
                }
                Some(_) => {}
            },
            State::End => {}
        }

        current += 1;
        if state == State::End {
            break;
        }
    }

    (policies, current as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contents(part: &ParameterPart) -> Vec<&str> {
        part.policies().iter().filter_map(|p| p.content()).collect()
    }

    #[test]
    fn name_only() {
        let p = parse_parameter("param");
        assert_eq!(p.name(), "param");
        assert_eq!(p.kind(), ParameterKind::Standard);
        assert!(p.default().is_none());
        assert!(p.policies().is_empty());
        assert!(p.encode_slashes());
    }

    #[test]
    fn empty_text() {
        let p = parse_parameter("");
        assert_eq!(p.name(), "");
        assert!(p.default().is_none());
    }

    #[test]
    fn catch_all_markers() {
        let p = parse_parameter("*path");
        assert_eq!(p.name(), "path");
        assert!(p.is_catch_all());
        assert!(p.encode_slashes());

        let p = parse_parameter("**path");
        assert_eq!(p.name(), "path");
        assert!(p.is_catch_all());
        assert!(!p.encode_slashes());
    }

    #[test]
    fn optional_with_default_question_mark() {
        let p = parse_parameter("param:int=12??");
        assert_eq!(p.name(), "param");
        assert_eq!(p.default(), Some(&RouteValue::from("12?")));
        assert!(p.is_optional());
        assert_eq!(contents(&p), ["int"]);
    }

    #[test]
    fn trailing_delimiters() {
        let p = parse_parameter("param=");
        assert_eq!(p.name(), "param");
        assert_eq!(p.default(), Some(&RouteValue::from("")));

        let p = parse_parameter("param:");
        assert_eq!(p.name(), "param");
        assert!(p.policies().is_empty());
        assert!(p.default().is_none());

        let p = parse_parameter(":param:test:");
        assert_eq!(p.name(), ":param");
        assert_eq!(contents(&p), ["test"]);
    }

    #[test]
    fn constraints() {
        let cases: &[(&str, &str, &[&str], Option<&str>)] = &[
            ("param:int", "param", &["int"], None),
            ("param::int", "param", &["int"], None),
            (r"param:test(\d+)", "param", &[r"test(\d+)"], None),
            (r"param:test(\w:+)", "param", &[r"test(\w:+)"], None),
            ("param:test(a):test2(b)=def", "param", &["test(a)", "test2(b)"], Some("def")),
            ("param:test(x=y)", "param", &["test(x=y)"], None),
            ("param:int=a=b", "param", &["int"], Some("a=b")),
            ("param:test(a:b", "param", &["test(a", "b"], None),
            ("p:min(3):max(10)", "p", &["min(3)", "max(10)"], None),
            ("comparison-operator:length(6)", "comparison-operator", &["length(6)"], None),
        ];

        for &(text, name, policies, default) in cases {
            let p = parse_parameter(text);
            assert_eq!(p.name(), name, "{}", text);
            assert_eq!(contents(&p), policies, "{}", text);
            assert_eq!(p.default().and_then(RouteValue::as_str), default, "{}", text);
        }
    }
}
