//! Shared helpers for the integration tests.

#![allow(dead_code)]

use parsinator::{DisplayOptions, Outcome, ParseOptions, Parser, Value};

/// Parses `input` and returns the success value, panicking with the rendered outcome
/// otherwise.
pub fn parse_value(parser: &Parser, input: &str) -> Value {
    let outcome = parser.parse(input).expect("parse faulted");
    match outcome.value() {
        Some(value) => value.clone(),
        None => panic!(
            "expected success on {:?}:\n{}",
            input,
            parsinator::display_result(&outcome, &plain())
        ),
    }
}

/// Parses `input`, expecting a failure; returns its index and expected labels.
pub fn parse_failure(parser: &Parser, input: &str) -> (usize, Vec<String>) {
    let outcome = parser.parse(input).expect("parse faulted");
    let expected = outcome
        .expected()
        .unwrap_or_else(|| panic!("expected failure on {:?}, got {:?}", input, outcome.value()));
    (
        outcome.index(),
        expected.iter().map(str::to_string).collect(),
    )
}

pub fn traced(parser: &Parser, input: &str) -> Outcome {
    parser
        .parse_with(input, &ParseOptions::traced())
        .expect("traced parses report faults in the outcome")
}

/// Display options without colors.
pub fn plain() -> DisplayOptions {
    DisplayOptions::default()
}

pub fn strings(items: &[&str]) -> Value {
    Value::List(items.iter().map(|s| Value::from(*s)).collect())
}

pub fn labels(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Digits, valued as a number.
pub fn number() -> Parser {
    parsinator::pattern("[0-9]+").unwrap().value(|_, v| {
        let text = v.as_str().unwrap_or_default();
        text.parse::<f64>()
            .map(Value::from)
            .map_err(|e| parsinator::fault!("bad number {}: {}", text, e))
    })
}

/// The middle element of a three-element list value, such as a bracketed expression.
pub fn middle(value: Value) -> Value {
    value
        .as_list()
        .and_then(|items| items.get(1))
        .cloned()
        .unwrap_or_default()
}

pub fn numbers(items: &[f64]) -> Value {
    Value::List(items.iter().map(|n| Value::from(*n)).collect())
}
