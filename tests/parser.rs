use nuclear_route_pattern::{ParameterKind, Part, RoutePattern, RouteValue};

fn parse(template: &str) -> RoutePattern {
    RoutePattern::parse(template).unwrap()
}

fn parse_err(template: &str) -> String {
    match RoutePattern::parse(template) {
        Ok(pattern) => panic!("{:?} parsed into {:?}", template, pattern),
        Err(err) => {
            assert!(err.is_parse(), "{:?}: {}", template, err);
            err.to_string()
        }
    }
}

/// Renders each segment as a list of tagged parts, e.g. `["L:a", "P:b", "S:."]`.
fn shape(pattern: &RoutePattern) -> Vec<Vec<String>> {
    pattern
        .path_segments()
        .iter()
        .map(|segment| {
            segment
                .parts()
                .iter()
                .map(|part| match part {
                    Part::Literal(s) => format!("L:{}", s),
                    Part::Separator(s) => format!("S:{}", s),
                    Part::Parameter(p) => format!("P:{}", p.name()),
                })
                .collect()
        })
        .collect()
}

#[test]
fn parse_segments() {
    let cases: &[(&str, &[&[&str]])] = &[
        ("cool", &[&["L:cool"]]),
        ("{p}", &[&["P:p"]]),
        ("{p?}", &[&["P:p"]]),
        ("cool/awesome/super", &[&["L:cool"], &["L:awesome"], &["L:super"]]),
        ("{p1}/{p2}/{*p3}", &[&["P:p1"], &["P:p2"], &["P:p3"]]),
        ("cool-{p1}", &[&["L:cool-", "P:p1"]]),
        ("{p1}-cool", &[&["P:p1", "L:-cool"]]),
        ("{p1}-cool-{p2}", &[&["P:p1", "L:-cool-", "P:p2"]]),
        ("cool-{p1}-awesome", &[&["L:cool-", "P:p1", "L:-awesome"]]),
        ("{p1}.{p2?}", &[&["P:p1", "S:.", "P:p2"]]),
        ("{p1}.{p2}", &[&["P:p1", "L:.", "P:p2"]]),
        ("{p1}.{p2}.{p3?}", &[&["P:p1", "L:.", "P:p2", "S:.", "P:p3"]]),
        ("{p1}.{p2}.{p3}", &[&["P:p1", "L:.", "P:p2", "L:.", "P:p3"]]),
        (
            "{p1}.{p2?}/{p3}",
            &[&["P:p1", "S:.", "P:p2"], &["P:p3"]],
        ),
        (
            "{p1}/{p2}.{p3?}",
            &[&["P:p1"], &["P:p2", "S:.", "P:p3"]],
        ),
        ("{p1}/.{p2?}", &[&["P:p1"], &["S:.", "P:p2"]]),
        ("a{{b}}c", &[&["L:a{b}c"]]),
        ("/", &[]),
        ("", &[]),
        ("a/", &[&["L:a"]]),
    ];

    for &(template, expected) in cases {
        let pattern = parse(template);
        let expected: Vec<Vec<String>> = expected
            .iter()
            .map(|s| s.iter().map(|p| p.to_string()).collect())
            .collect();
        assert_eq!(shape(&pattern), expected, "{}", template);
        assert_eq!(pattern.raw_text(), Some(template));
    }
}

#[test]
fn parse_parameters() {
    let pattern = parse("{controller=Home}/{action=Index}/{id:int?}/{*rest}");
    let params = pattern.parameters();
    assert_eq!(params.len(), 4);

    assert_eq!(params[0].name(), "controller");
    assert_eq!(params[0].default(), Some(&RouteValue::from("Home")));
    assert_eq!(params[0].kind(), ParameterKind::Standard);

    assert_eq!(params[2].name(), "id");
    assert!(params[2].is_optional());
    assert_eq!(params[2].policies()[0].content(), Some("int"));

    assert!(params[3].is_catch_all());
    assert!(params[3].encode_slashes());

    assert_eq!(pattern.defaults().get("CONTROLLER"), Some(&RouteValue::from("Home")));
    assert_eq!(pattern.defaults().get("action"), Some(&RouteValue::from("Index")));
    assert_eq!(pattern.parameter_policies().get("id").map(Vec::len), Some(1));
    assert!(pattern.get_parameter("ID").is_some());
    assert!(pattern.get_parameter("missing").is_none());

    let pattern = parse("files/{**path}");
    assert!(!pattern.parameters()[0].encode_slashes());
}

#[test]
fn parse_regular_expressions() {
    let cases = [
        (r"{p1:regex(^\d{{3}}-\d{{3}}-\d{{4}}$)}", r"regex(^\d{3}-\d{3}-\d{4}$)"),
        (r"{p1:regex(^\d{{1,2}}\/\d{{1,2}}\/\d{{4}}$)}", r"regex(^\d{1,2}\/\d{1,2}\/\d{4}$)"),
        (r"{p1:regex(^\w+\@\w+\.\w+)}", r"regex(^\w+\@\w+\.\w+)"),
        (r"{p1:regex(([}}])\w+)}", r"regex(([}])\w+)"),
        (r"{p1:regex(([{{(])\w+)}", r"regex(([{(])\w+)"),
    ];
    for &(template, constraint) in cases.iter() {
        let pattern = parse(template);
        let p = &pattern.parameters()[0];
        assert_eq!(p.name(), "p1");
        assert_eq!(p.policies()[0].content(), Some(constraint), "{}", template);
    }
}

#[test]
fn invalid_regular_expressions() {
    let cases = [
        r"{p1:regex(^\d{{3}}-\d{{3}}-\d{{4}}}$)}",
        r"{p1:regex(^\d{{3}}-\d{{3}}-\d{{4}}$)}}",
        r"{{p1:regex(^\d{{3}}-\d{{3}}-\d{{4}}$)}",
        r"{p1:regex(([}])\w+}",
        r"{p1:regex(^\d{{3}}-\d{{3}}-\d{{4}$)}",
        r"{p1:regex(abc)",
        r"{p1:regex(^\d{{3}}-\d{{3}}-\d{{{4}}$)}",
        r"{p1:regex(^\d{{3}}-\d{{3}}-\d{4}}$)}",
    ];
    for &template in cases.iter() {
        parse_err(template);
    }
}

#[test]
fn optional_parameter_not_last() {
    let cases = [
        ("{p1}.{p2?}.{p3}", "p2", "."),
        ("{p1?}{p2}", "p1", "{p2}"),
        ("{p1?}{p2?}", "p1", "{p2?}"),
        ("{p1}.{p2?})", "p2", ")"),
        ("{foorb?}-bar-{z}", "foorb", "-bar-"),
    ];
    for &(template, parameter, invalid) in cases.iter() {
        let msg = parse_err(template);
        let expected = format!(
            "In the segment '{}', optional parameter '{}' is followed by '{}'.",
            template, parameter, invalid
        );
        assert!(msg.ends_with(&expected), "{}", msg);
    }
}

#[test]
fn optional_parameter_preceded_by_non_period() {
    let cases = [
        ("{p1}-{p2?}", "-"),
        ("{p1}..{p2?}", ".."),
        ("..{p2?}", ".."),
        ("{p1}.abc.{p2?}", ".abc."),
        ("{p1}{p2?}", "{p1}"),
    ];
    for &(template, invalid) in cases.iter() {
        let msg = parse_err(template);
        let expected = format!(
            "In the segment '{}', the optional parameter 'p2' is preceded by an invalid segment '{}'.",
            template, invalid
        );
        assert!(msg.starts_with(&expected), "{}", msg);
    }
}

#[test]
fn repeated_parameters() {
    let cases = [
        ("{Controller}.mvc/{id}/{controller}", "controller"),
        ("{aaa}/{AAA}", "AAA"),
        ("{aaa}/{*AAA}", "AAA"),
    ];
    for &(template, name) in cases.iter() {
        let msg = parse_err(template);
        assert_eq!(
            msg,
            format!(
                "The route parameter name '{}' appears more than one time in the route template.",
                name
            )
        );
    }
}

#[test]
fn mismatched_braces() {
    let cases = [
        "123{a}abc{",
        "123{a}abc}",
        "xyz}123{a}abc}",
        "{{p1}",
        "{p1}}",
        "p1}}p2{",
        "foo/{{p1}",
        "foo/{p1}}",
        "{a}/{aa}a}/{z}",
    ];
    for &template in cases.iter() {
        let msg = parse_err(template);
        assert!(msg.starts_with("There is an incomplete parameter"), "{}: {}", template, msg);
    }
}

#[test]
fn invalid_parameter_names() {
    let cases = [
        ("{a*}", "a*"),
        ("{*a*}", "a*"),
        ("{*a*:int}", "a*"),
        ("{*a*=5}", "a*"),
        ("{*a*b=5}", "a*b"),
        ("{p1?}.{p2/}/{p3}", "p2/"),
        ("{p{{}", "p{"),
        ("{p}}}", "p}"),
        ("{p/}", "p/"),
        ("foo/{*}", ""),
        ("{a}/{}/{z}", ""),
        ("{Controller}.mvc/{?}", ""),
        ("{foor?b}", "foor?b"),
    ];
    for &(template, name) in cases.iter() {
        let msg = parse_err(template);
        let expected = format!("The route parameter name '{}' is invalid.", name);
        assert!(msg.starts_with(&expected), "{}: {}", template, msg);
    }
}

#[test]
fn structural_errors() {
    let cases = [
        ("123{a}abc{*moo}", "A path segment that contains more than one section"),
        ("{*p1}abc{*p2}", "A path segment that contains more than one section"),
        ("{*p1}/{*p2}", "A catch-all parameter can only appear as the last segment"),
        ("foo/{p1}/{*p2}/{p3}", "A catch-all parameter can only appear as the last segment"),
        ("{a}/{a{aa}/{z}", "In a route parameter, '{' and '}' must be escaped"),
        ("{a}//{z}", "The route template separator character '/' cannot appear consecutively"),
        ("foo/aa{p1}{p2}", "A path segment cannot contain two consecutive parameters"),
        ("~foo", "The route template cannot start with a '~' character"),
        ("foor?bar", "The literal section 'foor?bar' is invalid"),
        ("{a}/{*b?}", "A catch-all parameter cannot be marked optional"),
        ("{a=b?}", "An optional parameter cannot have default value"),
    ];
    for &(template, prefix) in cases.iter() {
        let msg = parse_err(template);
        assert!(msg.starts_with(prefix), "{}: {}", template, msg);
    }
}

#[test]
fn parse_error_carries_template() {
    let err = match RoutePattern::parse("{a}//{z}") {
        Err(nuclear_route_pattern::Error::Parse(err)) => err,
        other => panic!("{:?}", other),
    };
    assert_eq!(err.pattern(), "{a}//{z}");
}

#[test]
fn template_can_start_with_slash_or_tilde_slash() {
    for &template in ["/foo", "~/foo"].iter() {
        let pattern = parse(template);
        assert_eq!(pattern.raw_text(), Some(template));
        assert_eq!(shape(&pattern), vec![vec!["L:foo".to_string()]]);
    }
}

#[test]
fn parameter_invariants() {
    let templates = [
        "{controller=Home}/{action=Index}/{id?}",
        "{p1}.{p2}.{p3?}",
        "api/{version:int}/{**path}",
        "x-{a}-y/{b=5}/{c?}",
    ];
    for &template in templates.iter() {
        let pattern = parse(template);
        let params = pattern.parameters();
        for (i, a) in params.iter().enumerate() {
            for b in &params[i + 1..] {
                assert!(!a.name().eq_ignore_ascii_case(b.name()));
            }
            assert!(!(a.is_optional() && a.default().is_some()));
        }
        let catch_alls = params.iter().filter(|p| p.is_catch_all()).count();
        assert!(catch_alls <= 1);
        if catch_alls == 1 {
            let last = pattern.path_segments().last().unwrap().parts();
            assert!(last.last().unwrap().as_parameter().unwrap().is_catch_all());
        }
    }
}
