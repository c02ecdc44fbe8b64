//! Memoization.
//!
//! A memoized parser remembers how it ended at each (input, index, arguments, state)
//! and replays that ending instead of running again. Entries keep only the end index,
//! the value or expected set, and the state keys that changed; never a context.

use crate::combinators::{resolve, ParserLike};
use crate::engine::{diff_state, Context, Parser, State, Status, Step};
use crate::errors::Fault;
use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

/// Options for [`memoize_with`] and [`memoize_fn`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoOptions {
    /// State keys that distinguish cache entries. `None` means every key.
    pub state_keys: Option<Vec<String>>,
}

impl MemoOptions {
    pub fn state_keys<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            state_keys: Some(keys.into_iter().map(Into::into).collect()),
        }
    }
}

/// Hashable image of a [`Value`]. Numbers compare by bit pattern with every NaN folded
/// into one and `-0.0` into `0.0`, so keys stay distinct from `Nil` and reflexive.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum KeyValue {
    Nil,
    Bool(bool),
    Number(u64),
    String(String),
    List(Vec<KeyValue>),
    Map(Vec<(String, KeyValue)>),
    Node(String, Box<KeyValue>, usize, usize),
}

impl From<&Value> for KeyValue {
    fn from(value: &Value) -> Self {
        match value {
            Value::Nil => KeyValue::Nil,
            Value::Bool(b) => KeyValue::Bool(*b),
            Value::Number(n) if n.is_nan() => KeyValue::Number(f64::NAN.to_bits()),
            Value::Number(n) if *n == 0.0 => KeyValue::Number(0.0_f64.to_bits()),
            Value::Number(n) => KeyValue::Number(n.to_bits()),
            Value::String(s) => KeyValue::String(s.clone()),
            Value::List(items) => KeyValue::List(items.iter().map(KeyValue::from).collect()),
            Value::Map(map) => KeyValue::Map(
                map.iter()
                    .map(|(k, v)| (k.clone(), KeyValue::from(v)))
                    .collect(),
            ),
            Value::Node(node) => KeyValue::Node(
                node.name.clone(),
                Box::new(KeyValue::from(&node.value)),
                node.start,
                node.end,
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct MemoKey {
    index: usize,
    args: Vec<KeyValue>,
    state: Vec<(String, KeyValue)>,
}

#[derive(Debug, Clone)]
struct Entry {
    end: usize,
    status: Status,
    delta: Vec<(String, Option<Value>)>,
}

#[derive(Default)]
struct MemoCache {
    input: Option<Rc<str>>,
    entries: HashMap<MemoKey, Entry>,
}

impl MemoCache {
    /// Drops all entries when `input` differs from the input they were recorded on.
    fn bind(&mut self, input: &Rc<str>) {
        match &self.input {
            Some(current) if Rc::ptr_eq(current, input) => {}
            Some(current) if **current == **input => self.input = Some(Rc::clone(input)),
            _ => {
                self.entries.clear();
                self.input = Some(Rc::clone(input));
            }
        }
    }

    fn lookup(&mut self, input: &Rc<str>, key: &MemoKey) -> Option<Entry> {
        self.bind(input);
        self.entries.get(key).cloned()
    }
}

fn memo_key(ctx: &Context, args: &[Value], options: &MemoOptions) -> MemoKey {
    let state: State = match &options.state_keys {
        None => ctx.state().clone(),
        Some(keys) => keys
            .iter()
            .filter_map(|k| ctx.get(k).map(|v| (k.clone(), v.clone())))
            .collect(),
    };
    MemoKey {
        index: ctx.index(),
        args: args.iter().map(KeyValue::from).collect(),
        state: state
            .iter()
            .map(|(k, v)| (k.clone(), KeyValue::from(v)))
            .collect(),
    }
}

fn replay(ctx: &Context, entry: Entry) -> Step {
    let mut next = ctx.clone();
    for (key, value) in entry.delta {
        match value {
            Some(value) => next.set(key, value),
            None => {
                next.remove(&key);
            }
        }
    }
    match entry.status {
        Status::Matched(value) => next.succeed(entry.end, value),
        Status::Failed(expected) => ctx.fail(entry.end, expected),
        Status::Faulted(fault) => Err(*fault),
    }
}

fn memo_parser<F>(
    name: String,
    cache: Rc<RefCell<MemoCache>>,
    options: Rc<MemoOptions>,
    args: Vec<Value>,
    build: F,
) -> Parser
where
    F: Fn(&[Value]) -> Result<Parser, Fault> + 'static,
{
    Parser::new(name.clone(), move |ctx: &Context| {
        let key = memo_key(ctx, &args, &options);
        let hit = cache.borrow_mut().lookup(ctx.shared_input(), &key);
        if let Some(entry) = hit {
            log::trace!("memo hit for `{}` at {}", name, key.index);
            return replay(ctx, entry);
        }
        log::trace!("memo miss for `{}` at {}", name, key.index);

        let parser = build(&args)?;
        let outcome = ctx.parse(&parser)?;
        let entry = Entry {
            end: outcome.index(),
            status: outcome.status().clone(),
            delta: match outcome.status() {
                Status::Matched(_) => diff_state(ctx.state(), outcome.context().state())
                    .into_iter()
                    .map(|change| (change.key, change.after))
                    .collect(),
                _ => Vec::new(),
            },
        };
        cache.borrow_mut().entries.insert(key, entry);
        Ok(outcome)
    })
}

/// Memoizes `parser`, keyed on every state key.
///
/// ```rust
/// use parsinator::{alt, memoize, ser};
/// let word = memoize("a");
/// let p = alt![ser![&word, "b"], ser![&word, "c"]];
/// assert!(p.parse("ac").unwrap().is_ok());
/// ```
pub fn memoize(parser: impl Into<ParserLike>) -> Parser {
    memoize_with(MemoOptions::default(), parser)
}

pub fn memoize_with(options: MemoOptions, parser: impl Into<ParserLike>) -> Parser {
    let parser = resolve(parser);
    memo_parser(
        format!("memoize({})", parser.name()),
        Rc::new(RefCell::new(MemoCache::default())),
        Rc::new(options),
        Vec::new(),
        move |_| Ok(parser.clone()),
    )
}

/// A memoized parser factory. Every parser it returns shares one cache, keyed also on
/// the call arguments.
#[derive(Clone)]
pub struct MemoFn {
    name: String,
    factory: Rc<dyn Fn(&[Value]) -> Result<Parser, Fault>>,
    cache: Rc<RefCell<MemoCache>>,
    options: Rc<MemoOptions>,
}

/// Memoizes a parser factory.
pub fn memoize_fn<F>(name: impl Into<String>, factory: F) -> MemoFn
where
    F: Fn(&[Value]) -> Result<Parser, Fault> + 'static,
{
    memoize_fn_with(MemoOptions::default(), name, factory)
}

pub fn memoize_fn_with<F>(options: MemoOptions, name: impl Into<String>, factory: F) -> MemoFn
where
    F: Fn(&[Value]) -> Result<Parser, Fault> + 'static,
{
    MemoFn {
        name: name.into(),
        factory: Rc::new(factory),
        cache: Rc::new(RefCell::new(MemoCache::default())),
        options: Rc::new(options),
    }
}

impl MemoFn {
    pub fn parser(&self) -> Parser {
        self.call(Vec::new())
    }

    pub fn call(&self, args: Vec<Value>) -> Parser {
        let factory = Rc::clone(&self.factory);
        let rendered: Vec<String> = args.iter().map(Value::to_json).collect();
        memo_parser(
            format!("memoize({})({})", self.name, rendered.join(", ")),
            Rc::clone(&self.cache),
            Rc::clone(&self.options),
            args,
            move |args| factory(args),
        )
    }

    /// Number of cached entries for the input most recently parsed.
    pub fn cached(&self) -> usize {
        self.cache.borrow().entries.len()
    }
}

impl fmt::Debug for MemoFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoFn")
            .field("name", &self.name)
            .field("cached", &self.cached())
            .finish()
    }
}
