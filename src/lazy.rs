//! Deferred parser construction and recursive grammars.
//!
//! A [`Lazy`] factory builds its parser only when it runs, so parsers can refer to
//! themselves or to rules defined later. A [`Grammar`] is a table of such rules
//! referenced by name.
//!
//! ```rust
//! use parsinator::{alt, ser, Grammar, Value};
//!
//! // nested = "(" nested ")" | "x"
//! let grammar = Grammar::new()
//!     .define("nested", |g, _, _| Ok(alt![ser!["(", g.rule("nested"), ")"], "x"]));
//! assert!(grammar.rule("nested").parse("((x))").unwrap().is_ok());
//! ```

use crate::engine::{Context, Parser};
use crate::errors::{Fault, FaultKind};
use crate::value::Value;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

type Builder = Rc<dyn Fn(&mut Context, &[Value]) -> Result<Parser, Fault>>;

/// A parser factory whose parser is built at invocation time.
#[derive(Clone)]
pub struct Lazy {
    name: Option<String>,
    builder: Builder,
}

/// Creates a named parser factory.
///
/// When the resulting parser runs, `builder` receives the current context (writable,
/// so it may set state for the parser it returns) and the call arguments. The parser it
/// returns is renamed to `name` and run from that context.
pub fn lazy<F>(name: impl Into<String>, builder: F) -> Lazy
where
    F: Fn(&mut Context, &[Value]) -> Result<Parser, Fault> + 'static,
{
    Lazy {
        name: Some(name.into()),
        builder: Rc::new(builder),
    }
}

impl Lazy {
    /// A factory that keeps the built parser's own name.
    pub fn anonymous<F>(builder: F) -> Self
    where
        F: Fn(&mut Context, &[Value]) -> Result<Parser, Fault> + 'static,
    {
        Self {
            name: None,
            builder: Rc::new(builder),
        }
    }

    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or("lazy")
    }

    /// The parser with no arguments.
    pub fn parser(&self) -> Parser {
        self.call(Vec::new())
    }

    /// The parser with `args` passed to the builder.
    pub fn call(&self, args: Vec<Value>) -> Parser {
        let builder = Rc::clone(&self.builder);
        deferred(self.name.clone(), args, move |ctx, args| builder(ctx, args))
    }
}

impl fmt::Debug for Lazy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Lazy").field("name", &self.name()).finish()
    }
}

/// The hidden parser behind every lazy reference.
fn deferred<F>(name: Option<String>, args: Vec<Value>, build: F) -> Parser
where
    F: Fn(&mut Context, &[Value]) -> Result<Parser, Fault> + 'static,
{
    let label = name.clone().unwrap_or_else(|| "lazy".to_string());
    Parser::new(label.clone(), move |ctx: &Context| {
        let mut scope = ctx.clone();
        let parser = build(&mut scope, &args)?;
        let parser = match &name {
            Some(name) => parser.renamed(name.as_str()),
            None => parser,
        };
        log::trace!("resolved `{}` to `{}` at {}", label, parser.name(), ctx.index());
        scope.parse(&parser)
    })
    .hidden()
}

// ============================================================================
// GRAMMARS
// ============================================================================

type RuleBuilder = Rc<dyn Fn(&Grammar, &mut Context, &[Value]) -> Result<Parser, Fault>>;

/// Signature of a rule builder, for declaring rule tables with non-capturing closures.
pub type RuleFn = fn(&Grammar, &mut Context, &[Value]) -> Result<Parser, Fault>;

/// A set of named, mutually recursive rules.
///
/// Rules are looked up when a reference runs, not when it is created, so rules may
/// reference each other in any order. Builders receive the grammar itself to make those
/// references.
#[derive(Clone, Default)]
pub struct Grammar {
    rules: Rc<RefCell<BTreeMap<String, RuleBuilder>>>,
}

/// Builds a [`Grammar`] from `(name, builder)` pairs.
///
/// ```rust
/// use parsinator::{alt, lazy_parsers, Grammar, RuleFn};
/// let rules: [(&str, RuleFn); 2] = [
///     ("greeting", |g, _, _| Ok(alt!["hi ", g.rule("name")])),
///     ("name", |_, _, _| Ok(parsinator::literal("bob"))),
/// ];
/// let grammar = lazy_parsers(rules);
/// assert!(grammar.rule("greeting").parse("bob").unwrap().is_ok());
/// ```
pub fn lazy_parsers<I, N, F>(rules: I) -> Grammar
where
    I: IntoIterator<Item = (N, F)>,
    N: Into<String>,
    F: Fn(&Grammar, &mut Context, &[Value]) -> Result<Parser, Fault> + 'static,
{
    rules
        .into_iter()
        .fold(Grammar::new(), |grammar, (name, builder)| {
            grammar.define(name, builder)
        })
}

impl Grammar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a rule.
    pub fn define<F>(self, name: impl Into<String>, builder: F) -> Self
    where
        F: Fn(&Grammar, &mut Context, &[Value]) -> Result<Parser, Fault> + 'static,
    {
        self.rules
            .borrow_mut()
            .insert(name.into(), Rc::new(builder));
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.rules.borrow().contains_key(name)
    }

    pub fn names(&self) -> Vec<String> {
        self.rules.borrow().keys().cloned().collect()
    }

    /// A reference to the rule `name`.
    pub fn rule(&self, name: &str) -> Parser {
        self.rule_with(name, Vec::new())
    }

    /// A reference to the rule `name`, passing `args` to its builder.
    pub fn rule_with(&self, name: &str, args: Vec<Value>) -> Parser {
        let grammar = self.clone();
        let rule = name.to_string();
        deferred(Some(rule.clone()), args, move |ctx, args| {
            let builder = grammar.lookup(&rule)?;
            builder(&grammar, ctx, args)
        })
    }

    fn lookup(&self, name: &str) -> Result<RuleBuilder, Fault> {
        self.rules.borrow().get(name).cloned().ok_or_else(|| {
            Fault::new(FaultKind::UnknownRule {
                name: name.to_string(),
            })
        })
    }
}

impl fmt::Debug for Grammar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Grammar")
            .field("rules", &self.names())
            .finish()
    }
}
