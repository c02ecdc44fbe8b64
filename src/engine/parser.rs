//! The `Parser` type and the invocation algorithm shared by every combinator.

use crate::engine::context::Context;
use crate::engine::outcome::{Outcome, Status, Step};
use crate::errors::{Fault, FaultKind};
use crate::options::ParseOptions;
use crate::value::Value;
use std::fmt;
use std::rc::Rc;

type Action = Rc<dyn Fn(&Context) -> Step>;
type Continuation = Rc<dyn Fn(&mut Context, Value) -> Result<Parser, Fault>>;

/// Stack that must remain before a frame runs; below it the parse continues on a new
/// segment, so grammar nesting is bounded by `max_depth` rather than the thread stack.
const RED_ZONE: usize = 64 * 1024;
const STACK_SEGMENT: usize = 1024 * 1024;

#[derive(Clone)]
struct ParserInner {
    name: String,
    action: Action,
    continuations: Vec<Continuation>,
    /// The parser without its continuations; runs as the first leg of a chain.
    base: Option<Parser>,
    hidden: bool,
    debug: bool,
}

/// An immutable, cheaply clonable parser.
///
/// # Examples
///
/// ```rust
/// use parsinator::{alt, Value};
/// let parser = alt!["a", "b"];
/// let outcome = parser.parse("b").unwrap();
/// assert_eq!(outcome.value(), Some(&Value::from("b")));
/// ```
#[derive(Clone)]
pub struct Parser {
    inner: Rc<ParserInner>,
}

impl Parser {
    /// Creates a parser from a name and an action.
    ///
    /// The action receives the context to parse from and returns an outcome built with
    /// [`Context::succeed`] or [`Context::fail`]. Sub-parsers must be run through
    /// [`Context::parse`].
    pub fn new(name: impl Into<String>, action: impl Fn(&Context) -> Step + 'static) -> Self {
        Self {
            inner: Rc::new(ParserInner {
                name: name.into(),
                action: Rc::new(action),
                continuations: Vec::new(),
                base: None,
                hidden: false,
                debug: false,
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    pub fn is_hidden(&self) -> bool {
        self.inner.hidden
    }

    fn rebuild(&self, edit: impl FnOnce(&mut ParserInner)) -> Parser {
        let mut inner = (*self.inner).clone();
        edit(&mut inner);
        Parser {
            inner: Rc::new(inner),
        }
    }

    /// Returns a copy of this parser with a different name. A renamed parser is always
    /// visible in traces.
    pub fn renamed(&self, name: impl Into<String>) -> Parser {
        let name = name.into();
        self.rebuild(|inner| {
            inner.name = name;
            inner.hidden = false;
        })
    }

    pub(crate) fn hidden(&self) -> Parser {
        self.rebuild(|inner| inner.hidden = true)
    }

    /// Turns tracing on or off for parses started from this parser.
    pub fn debug(&self, on: bool) -> Parser {
        self.rebuild(|inner| inner.debug = on)
    }

    // ========================================================================
    // POST-PROCESSING
    // ========================================================================

    /// Appends a continuation. On success, `next` receives the context and the value of
    /// the previous leg and returns the parser to run from there.
    ///
    /// The chain's value is the list of every leg's value, in order.
    pub fn chain<F>(&self, next: F) -> Parser
    where
        F: Fn(&mut Context, Value) -> Result<Parser, Fault> + 'static,
    {
        let base = match &self.inner.base {
            Some(base) => base.clone(),
            None => self.clone(),
        };
        self.rebuild(move |inner| {
            inner.base = Some(base);
            inner.continuations.push(Rc::new(next));
        })
    }

    /// Replaces a success value with `f(context, value)`. Failures pass through.
    ///
    /// State written to the context inside `f` is kept.
    pub fn value<F>(&self, f: F) -> Parser
    where
        F: Fn(&mut Context, Value) -> Result<Value, Fault> + 'static,
    {
        let parser = self.clone();
        Parser::new(format!("value({})", self.name()), move |ctx| {
            ctx.parse(&parser)?.and_then_value(|ctx, value| f(ctx, value))
        })
        .hidden()
    }

    /// Applies `f` to each element of a list success value. A non-list value is a fault.
    pub fn map<F>(&self, f: F) -> Parser
    where
        F: Fn(&mut Context, Value) -> Result<Value, Fault> + 'static,
    {
        let parser = self.clone();
        Parser::new(format!("map({})", self.name()), move |ctx| {
            ctx.parse(&parser)?.and_then_value(|ctx, value| {
                let found = value.type_name();
                let items = value
                    .into_list()
                    .ok_or_else(|| Fault::new(FaultKind::NotAList { found }))?;
                items
                    .into_iter()
                    .map(|item| f(ctx, item))
                    .collect::<Result<Vec<_>, _>>()
                    .map(Value::List)
            })
        })
        .hidden()
    }

    /// Flattens a success value made of nested string lists into a single string.
    ///
    /// ```rust
    /// use parsinator::{ser, Value};
    /// let word = ser!["a", "b", "c"].join();
    /// assert_eq!(word.parse("abc").unwrap().value(), Some(&Value::from("abc")));
    /// ```
    pub fn join(&self) -> Parser {
        self.value(|_, value| {
            let mut out = String::new();
            join_into(&value, &mut out)?;
            Ok(Value::String(out))
        })
    }

    // ========================================================================
    // ENTRY POINTS
    // ========================================================================

    /// Parses `input` from the start with default options.
    ///
    /// Returns `Err` only for faults in an untraced parse; ordinary failures are
    /// `Ok` outcomes whose status is [`Status::Failed`].
    pub fn parse(&self, input: &str) -> Result<Outcome, Fault> {
        self.parse_with(input, &ParseOptions::default())
    }

    pub fn parse_with(&self, input: &str, options: &ParseOptions) -> Result<Outcome, Fault> {
        let tracing = options.trace || self.inner.debug;
        let input: Rc<str> = Rc::from(input);
        let root = Context::root(Rc::clone(&input), options.max_depth, tracing);
        log::debug!(
            "parsing {} bytes with `{}`{}",
            input.len(),
            self.name(),
            if tracing { " (traced)" } else { "" }
        );

        let step = root.parse(self);
        let trace = root
            .trace
            .as_ref()
            .map(|cursor| Box::new(cursor.freeze(Rc::clone(&input))));
        match step {
            Ok(mut outcome) => {
                outcome.context.detach();
                outcome.trace = trace;
                log::debug!(
                    "`{}` {} at {}",
                    self.name(),
                    if outcome.is_ok() { "matched" } else { "failed" },
                    outcome.index()
                );
                Ok(outcome)
            }
            Err(fault) if tracing => {
                let mut context = root.at(fault.index().unwrap_or(0));
                context.detach();
                Ok(Outcome {
                    context,
                    status: Status::Faulted(Box::new(fault)),
                    trace,
                })
            }
            Err(fault) => {
                log::debug!("`{}` faulted: {}", self.name(), fault);
                Err(fault)
            }
        }
    }

    // ========================================================================
    // INVOCATION
    // ========================================================================

    /// Runs this parser as a sub-parse of `caller`.
    ///
    /// Hidden parsers run directly on `caller`: they take no depth and record no trace
    /// node, so their sub-parses attach to the nearest visible ancestor.
    pub(crate) fn run(&self, caller: &Context) -> Step {
        if self.inner.hidden && self.inner.continuations.is_empty() {
            return self.invoke(caller);
        }
        if caller.depth >= caller.max_depth {
            return Err(Fault::new(FaultKind::RecursionLimit {
                limit: caller.max_depth,
            }));
        }
        stacker::maybe_grow(RED_ZONE, STACK_SEGMENT, || self.run_frame(caller))
    }

    fn run_frame(&self, caller: &Context) -> Step {
        let mut frame = caller.clone();
        frame.depth += 1;
        if let Some(cursor) = &caller.trace {
            let label = if self.inner.continuations.is_empty() {
                self.name()
            } else {
                "chain"
            };
            frame.trace = Some(cursor.open(label, caller.index(), caller.state().clone()));
        }

        let step = self.invoke(&frame);
        let Some(cursor) = &frame.trace else {
            return step.map(|mut outcome| {
                outcome.context.rebind(caller);
                outcome
            });
        };
        match step {
            Ok(mut outcome) => {
                cursor.resolve(
                    outcome.index(),
                    outcome.context.state().clone(),
                    outcome.status.clone(),
                );
                outcome.context.rebind(caller);
                Ok(outcome)
            }
            Err(fault) => {
                let fault = fault.located(self.name(), caller.index());
                log::debug!("fault recorded in `{}`: {}", self.name(), fault);
                cursor.resolve(
                    caller.index(),
                    caller.state().clone(),
                    Status::Faulted(Box::new(fault.clone())),
                );
                Err(fault)
            }
        }
    }

    fn invoke(&self, frame: &Context) -> Step {
        let base = match &self.inner.base {
            Some(base) if !self.inner.continuations.is_empty() => base,
            _ => return (self.inner.action)(frame),
        };
        let mut outcome = frame.parse(base)?;
        let mut values = Vec::with_capacity(self.inner.continuations.len() + 1);
        for continuation in &self.inner.continuations {
            let (mut context, status) = outcome.into_parts();
            let previous = match status {
                Status::Matched(value) => value,
                status => return Ok(Outcome::new(context, status)),
            };
            values.push(previous.clone());
            let next = continuation(&mut context, previous)?;
            outcome = context.parse(&next)?;
        }
        outcome.and_then_value(|_, last| {
            values.push(last);
            Ok(Value::List(values))
        })
    }
}

fn join_into(value: &Value, out: &mut String) -> Result<(), Fault> {
    match value {
        Value::String(s) => out.push_str(s),
        Value::List(items) => {
            for item in items {
                join_into(item, out)?;
            }
        }
        other => {
            return Err(Fault::new(FaultKind::InvalidJoin {
                value: other.to_json(),
            }))
        }
    }
    Ok(())
}

impl fmt::Debug for Parser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Parser")
            .field("name", &self.inner.name)
            .field("continuations", &self.inner.continuations.len())
            .field("hidden", &self.inner.hidden)
            .finish()
    }
}

impl fmt::Display for Parser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.inner.name)
    }
}
