//! Golden tests for rendered outcomes and traces.

mod common;

use common::{plain, traced};
use parsinator::{
    alt, display_result, display_result_with, display_trace, fault, literal, ok, ser,
    DisplayOptions, LineIndex, Value,
};

#[test]
fn test_success_report() {
    let outcome = literal("ab").parse("ab").unwrap();
    assert_eq!(
        display_result(&outcome, &plain()),
        "Parsed successfully through line 1 column 2. Result:\n\"ab\""
    );
}

#[test]
fn test_success_report_without_consuming() {
    let outcome = ok(Value::Nil).parse("x").unwrap();
    assert_eq!(
        display_result(&outcome, &plain()),
        "Parsed successfully through line 1 column 0. Result:\nnull"
    );
}

#[test]
fn test_success_report_serializes_the_value() {
    let outcome = ser!["a\n", "b"].parse("a\nb").unwrap();
    assert_eq!(
        display_result(&outcome, &plain()),
        "Parsed successfully through line 2 column 1. Result:\n[\"a\\n\",\"b\"]"
    );
}

#[test]
fn test_failure_report_lists_expected() {
    let outcome = alt!["a", "b", "c"].parse("d").unwrap();
    assert_eq!(
        display_result(&outcome, &plain()),
        "Couldn't continue past line 1 column 1. Expected: \"a\", \"b\" or \"c\".\n 1 | d\n     ^"
    );
}

#[test]
fn test_failure_at_end_of_input() {
    let outcome = ser!["a", "b"].parse("a").unwrap();
    assert_eq!(
        display_result(&outcome, &plain()),
        "Couldn't continue past line 1 column 2. Expected: \"b\".\n 1 | a\n      ^"
    );
}

#[test]
fn test_failure_report_shows_surrounding_lines() {
    let outcome = ser!["a\na\naaa", "bb\nbbb\nb"]
        .parse("a\na\naaaxx\nxxx\nxxxxxx")
        .unwrap();
    let expected = [
        r#"Couldn't continue past line 3 column 4. Expected: "bb\nbbb\nb"."#,
        " 1 | a",
        " 2 | a",
        " 3 | aaaxx",
        "        ^",
        " 4 | xxx",
        " 5 | xxxxxx",
    ]
    .join("\n");
    assert_eq!(display_result(&outcome, &plain()), expected);
}

#[test]
fn test_failure_report_limits_context_lines() {
    let input = "1\n2\n3\n4\n5\n6\n7\n8\nx\n10\n11\n12";
    let outcome = ser!["1\n2\n3\n4\n5\n6\n7\n8\n", "9"].parse(input).unwrap();
    let options = DisplayOptions {
        lines_before: 2,
        lines_after: 1,
        ..plain()
    };
    let expected = [
        r#"Couldn't continue past line 9 column 1. Expected: "9"."#,
        "  7 | 7",
        "  8 | 8",
        "  9 | x",
        "      ^",
        " 10 | 10",
    ]
    .join("\n");
    assert_eq!(display_result(&outcome, &options), expected);
}

#[test]
fn test_fault_report() {
    let p = ser!["x", literal("a").chain(|_, _| Err(fault!("boom")))];
    let outcome = traced(&p, "xab");
    let options = DisplayOptions {
        show_trace: false,
        ..plain()
    };
    assert_eq!(
        display_result(&outcome, &options),
        "Couldn't continue past line 1 column 2.\n 1 | xab\n      ^\nIn parser '\"a\"', got boom"
    );
}

#[test]
fn test_trace_rendering() {
    let outcome = traced(&alt!["a", "b"], "bb");
    let trace = outcome.trace().unwrap();
    assert_eq!(
        display_trace(trace, &plain()),
        "alt(\"a\", \"b\"): [1:1] matched \"b\"\n \"a\": [1:1] failed \"bb\"\n \"b\": [1:1] matched \"b\""
    );
}

#[test]
fn test_result_includes_trace_when_recorded() {
    let outcome = traced(&alt!["a", "b"], "bb");
    assert_eq!(
        display_result(&outcome, &plain()),
        [
            "alt(\"a\", \"b\"): [1:1] matched \"b\"",
            " \"a\": [1:1] failed \"bb\"",
            " \"b\": [1:1] matched \"b\"",
            "Parsed successfully through line 1 column 1. Result:",
            "\"b\"",
        ]
        .join("\n")
    );

    let hidden = DisplayOptions {
        show_trace: false,
        ..plain()
    };
    assert_eq!(
        display_result(&outcome, &hidden),
        "Parsed successfully through line 1 column 1. Result:\n\"b\""
    );
}

#[test]
fn test_long_matches_are_summarized() {
    let options = DisplayOptions {
        max_match_chars: 3,
        ..plain()
    };
    let outcome = traced(&ser!["abcd", "e"], "abcdx");
    assert_eq!(
        display_trace(outcome.trace().unwrap(), &options),
        [
            "ser(\"abcd\", \"e\"): [1:1] failed \"abc\"",
            " \"abcd\": [1:1] matched 4 characters",
            " \"e\": [1:5] failed \"x\"",
        ]
        .join("\n")
    );
}

#[test]
fn test_trace_shows_state_changes() {
    let p = ser![
        literal("a").value(|ctx, v| {
            ctx.set("n", 1.0);
            Ok(v)
        }),
        "b"
    ];
    let outcome = traced(&p, "ab");
    assert_eq!(
        display_trace(outcome.trace().unwrap(), &plain()),
        [
            "ser(value(\"a\"), \"b\"): [1:1] matched \"ab\" {n:->1}",
            " \"a\": [1:1] matched \"a\"",
            " \"b\": [1:2] matched \"b\" {*no change*}",
        ]
        .join("\n")
    );
}

#[test]
fn test_colors_are_optional() {
    let outcome = alt!["a", "b"].parse("c").unwrap();
    let colored = DisplayOptions {
        colors: true,
        ..plain()
    };
    assert!(display_result(&outcome, &colored).contains("\u{1b}["));
    assert!(!display_result(&outcome, &plain()).contains("\u{1b}["));
}

#[test]
fn test_custom_locator() {
    let outcome = ser!["a", "b"].parse("a").unwrap();
    let input = outcome.input().to_string();
    let locator = LineIndex::new(&input);
    assert_eq!(
        display_result_with(&outcome, &plain(), &locator),
        display_result(&outcome, &plain())
    );
}
