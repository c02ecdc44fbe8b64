//! Deferred construction and recursive grammars.

mod common;

use common::{middle, number, numbers, parse_failure, parse_value, strings};
use parsinator::{
    alt, lazy, lazy_parsers, list_of, literal, ser, times, FaultKind, Grammar, Lazy, Parser,
    RuleFn, Value,
};

fn nested_lists() -> Grammar {
    Grammar::new()
        .define("list", |g, _, _| {
            Ok(ser!["(", list_of(g.rule("item"), " "), ")"].value(|_, v| Ok(middle(v))))
        })
        .define("item", |g, _, _| Ok(alt![number(), g.rule("list")]))
}

#[test]
fn test_mutually_recursive_rules() {
    let grammar = nested_lists();
    assert_eq!(
        parse_value(&grammar.rule("list"), "((1 2) (3 4))"),
        Value::List(vec![numbers(&[1.0, 2.0]), numbers(&[3.0, 4.0])])
    );
    assert_eq!(parse_value(&grammar.rule("list"), "()"), Value::List(vec![]));
    assert_eq!(parse_failure(&grammar.rule("list"), "((1 2)"), (6, vec![")".to_string()]));
}

#[test]
fn test_rules_are_looked_up_when_they_run() {
    let grammar = Grammar::new().define("greeting", |g, _, _| Ok(ser!["hi ", g.rule("name")]));
    let greeting = grammar.rule("greeting");

    let fault = greeting.parse("hi bob").unwrap_err();
    assert_eq!(
        fault.kind,
        FaultKind::UnknownRule {
            name: "name".to_string()
        }
    );

    let grammar = grammar.define("name", |_, _, _| Ok(literal("bob")));
    assert!(grammar.contains("name"));
    assert_eq!(grammar.names(), vec!["greeting".to_string(), "name".to_string()]);
    assert_eq!(parse_value(&greeting, "hi bob"), strings(&["hi ", "bob"]));
}

#[test]
fn test_redefining_a_rule_replaces_it() {
    let grammar = Grammar::new().define("word", |_, _, _| Ok(literal("a")));
    let word = grammar.rule("word");
    assert_eq!(parse_value(&word, "a"), Value::from("a"));
    let _ = grammar.define("word", |_, _, _| Ok(literal("b")));
    assert_eq!(parse_value(&word, "b"), Value::from("b"));
}

#[test]
fn test_rule_takes_the_rule_name() {
    let grammar = nested_lists();
    assert_eq!(grammar.rule("list").name(), "list");
    let outcome = grammar
        .rule("list")
        .parse_with("(1)", &parsinator::ParseOptions::traced())
        .unwrap();
    let trace = outcome.trace().unwrap();
    assert_eq!(trace.roots[0].name, "list");
    assert!(trace.find("item").is_some());
}

#[test]
fn test_builder_state_reaches_the_built_parser() {
    let grammar = Grammar::new()
        .define("block", |g, ctx, _| {
            ctx.set("indent", 4.0);
            Ok(g.rule("body"))
        })
        .define("body", |_, ctx, _| {
            let width = ctx.get("indent").and_then(Value::as_number).unwrap_or(0.0);
            Ok(ser![times(width as usize, " "), "x"])
        });
    let outcome = grammar.rule("block").parse("    x").unwrap();
    assert!(outcome.is_ok());
    assert_eq!(outcome.get("indent"), Some(&Value::Number(4.0)));
    assert_eq!(parse_failure(&grammar.rule("block"), "   x"), (3, vec![" ".to_string()]));
}

#[test]
fn test_rule_arguments() {
    let grammar = Grammar::new().define("repeat", |_, _, args| {
        let count = args.first().and_then(Value::as_number).unwrap_or(1.0);
        Ok(times(count as usize, "a").join())
    });
    let three = grammar.rule_with("repeat", vec![3.0.into()]);
    assert_eq!(parse_value(&three, "aaaa"), Value::from("aaa"));
    assert_eq!(parse_value(&grammar.rule("repeat"), "aaaa"), Value::from("a"));
}

#[test]
fn test_lazy_factory_call() {
    let word = lazy("word", |_, args| {
        let text = args.first().and_then(Value::as_str).unwrap_or_default();
        Ok(literal(text))
    });
    let hi = word.call(vec!["hi".into()]);
    assert_eq!(hi.name(), "word");
    assert_eq!(parse_value(&hi, "hi"), Value::from("hi"));
    assert_eq!(parse_failure(&hi, "ho"), (0, vec!["hi".to_string()]));
}

#[test]
fn test_lazy_is_accepted_as_a_parser() {
    let digit = lazy("digit", |_, _| Ok(alt!["0", "1"]));
    let p = ser![&digit, &digit];
    assert_eq!(parse_value(&p, "10"), strings(&["1", "0"]));

    let anonymous = Lazy::anonymous(|_, _| Ok(literal("z")));
    assert_eq!(anonymous.name(), "lazy");
    assert_eq!(parse_value(&anonymous.parser(), "z"), Value::from("z"));
}

fn expr() -> Parser {
    lazy("expr", |_, _| {
        Ok(alt![
            number(),
            ser!["(", list_of(expr(), " "), ")"].value(|_, v| Ok(middle(v)))
        ])
    })
    .parser()
}

#[test]
fn test_self_referencing_lazy_parser() {
    assert_eq!(
        parse_value(&expr(), "(1 (2 3))"),
        Value::List(vec![1.0.into(), numbers(&[2.0, 3.0])])
    );
}

#[test]
fn test_builder_faults_propagate() {
    let broken = lazy("broken", |_, _| Err(parsinator::fault!("no parser today")));
    let fault = ser!["a", broken.parser()].parse("ab").unwrap_err();
    assert_eq!(fault.to_string(), "no parser today");
}

#[test]
fn test_lazy_parsers_table() {
    let rules: [(&str, RuleFn); 2] = [
        ("pair", |g, _, _| Ok(ser![g.rule("bit"), g.rule("bit")].join())),
        ("bit", |_, _, _| Ok(alt!["0", "1"])),
    ];
    let grammar = lazy_parsers(rules);
    assert_eq!(parse_value(&grammar.rule("pair"), "01"), Value::from("01"));
}
