//! Memoization: replayed outcomes and call counts.

mod common;

use common::{labels, parse_failure, parse_value, strings};
use parsinator::{
    alt, literal, memoize, memoize_fn, memoize_with, ok, ser, MemoOptions, Parser, Value,
};
use std::cell::Cell;
use std::rc::Rc;

/// Matches `text`, counting every invocation in `calls`.
fn counted(text: &'static str, calls: &Rc<Cell<usize>>) -> Parser {
    let calls = Rc::clone(calls);
    Parser::new(format!("counted({})", text), move |ctx| {
        calls.set(calls.get() + 1);
        if ctx.remaining().starts_with(text) {
            ctx.succeed(ctx.index() + text.len(), text)
        } else {
            ctx.fail(ctx.index(), text)
        }
    })
}

fn set_noise(level: f64) -> Parser {
    ok(Value::Nil).value(move |ctx, v| {
        ctx.set("noise", level);
        Ok(v)
    })
}

#[test]
fn test_memoized_parser_runs_once_per_position() {
    let calls = Rc::new(Cell::new(0));
    let word = memoize(counted("a", &calls));
    let p = alt![ser![&word, "b"], ser![&word, "c"]];
    assert_eq!(parse_value(&p, "ac"), strings(&["a", "c"]));
    assert_eq!(calls.get(), 1);
}

#[test]
fn test_unmemoized_parser_runs_every_time() {
    let calls = Rc::new(Cell::new(0));
    let word = counted("a", &calls);
    let p = alt![ser![&word, "b"], ser![&word, "c"]];
    assert_eq!(parse_value(&p, "ac"), strings(&["a", "c"]));
    assert_eq!(calls.get(), 2);
}

#[test]
fn test_replay_matches_the_first_outcome() {
    let calls = Rc::new(Cell::new(0));
    let word = memoize(ser![counted("a", &calls), "b"]);
    let first = word.parse("ab").unwrap();
    let second = word.parse("ab").unwrap();
    assert_eq!(first.value(), second.value());
    assert_eq!(first.index(), second.index());
    assert_eq!(calls.get(), 1);
}

#[test]
fn test_failures_are_replayed() {
    let calls = Rc::new(Cell::new(0));
    let word = memoize(ser![counted("a", &calls), "b"]);
    let p = alt![ser![&word, "x"], &word];
    assert_eq!(parse_failure(&p, "ac"), (1, labels(&["b"])));
    assert_eq!(calls.get(), 1);
}

#[test]
fn test_new_input_clears_the_cache() {
    let calls = Rc::new(Cell::new(0));
    let word = memoize(counted("a", &calls));
    assert!(word.parse("a").unwrap().is_ok());
    assert!(!word.parse("b").unwrap().is_ok());
    assert_eq!(calls.get(), 2);
}

#[test]
fn test_state_changes_are_replayed() {
    let calls = Rc::new(Cell::new(0));
    let flagged = counted("a", &calls).value(|ctx, v| {
        ctx.set("seen", true);
        Ok(v)
    });
    let word = memoize(flagged);
    let p = alt![ser![&word, "b"], ser![&word, "c"]];
    let outcome = p.parse("ac").unwrap();
    assert!(outcome.is_ok());
    assert_eq!(outcome.get("seen"), Some(&Value::Bool(true)));
    assert_eq!(calls.get(), 1);
}

#[test]
fn test_state_is_part_of_the_key() {
    let calls = Rc::new(Cell::new(0));
    let word = memoize(counted("a", &calls));
    let p = alt![
        ser![set_noise(1.0), &word, "x"],
        ser![set_noise(2.0), &word, "y"]
    ];
    assert!(p.parse("ay").unwrap().is_ok());
    assert_eq!(calls.get(), 2);
}

#[test]
fn test_state_keys_narrow_the_key() {
    let calls = Rc::new(Cell::new(0));
    let word = memoize_with(MemoOptions::state_keys(["mode"]), counted("a", &calls));
    let p = alt![
        ser![set_noise(1.0), &word, "x"],
        ser![set_noise(2.0), &word, "y"]
    ];
    assert!(p.parse("ay").unwrap().is_ok());
    assert_eq!(calls.get(), 1);
}

#[test]
fn test_memoized_factory_shares_one_cache() {
    let builds = Rc::new(Cell::new(0));
    let counter = Rc::clone(&builds);
    let word = memoize_fn("word", move |args| {
        counter.set(counter.get() + 1);
        let text = args.first().and_then(Value::as_str).unwrap_or_default();
        Ok(literal(text))
    });

    let a = || word.call(vec!["a".into()]);
    assert_eq!(a().name(), r#"memoize(word)("a")"#);
    let p = alt![ser![a(), "b"], ser![a(), "c"]];
    assert_eq!(parse_value(&p, "ac"), strings(&["a", "c"]));
    assert_eq!(builds.get(), 1);
    assert_eq!(word.cached(), 1);

    let p = alt![ser![word.call(vec!["x".into()]), "c"], ser![a(), "c"]];
    assert_eq!(parse_value(&p, "ac"), strings(&["a", "c"]));
    assert_eq!(builds.get(), 2);
    assert_eq!(word.cached(), 2);
}

#[test]
fn test_memoized_parser_name() {
    assert_eq!(memoize("a").name(), r#"memoize("a")"#);
}

#[test]
fn test_nil_and_nan_arguments_are_cached_apart() {
    let builds = Rc::new(Cell::new(0));
    let counter = Rc::clone(&builds);
    let echo = memoize_fn("echo", move |args| {
        counter.set(counter.get() + 1);
        Ok(ok(args.first().cloned().unwrap_or_default()))
    });

    assert_eq!(parse_value(&echo.call(vec![Value::Nil]), ""), Value::Nil);
    let nan = parse_value(&echo.call(vec![f64::NAN.into()]), "");
    assert_eq!(nan.as_number().map(f64::is_nan), Some(true));
    assert_eq!(builds.get(), 2);

    // NaN keys still hit themselves
    parse_value(&echo.call(vec![f64::NAN.into()]), "");
    assert_eq!(builds.get(), 2);
}
