//! Values produced by parsers and stored in parse state.
//!
//! Parsers in a grammar are heterogeneous: a literal yields a string, `ser` yields a list
//! or a labeled map, `node` yields a span record. `Value` is the single dynamic type that
//! flows through all of them.

use im::OrdMap;
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use std::fmt;

/// Ordered label→value mapping used by labeled `ser` results.
pub type ValueMap = OrdMap<String, Value>;

/// A value produced by a parser.
///
/// # Examples
///
/// ```rust
/// use parsinator::Value;
/// let v = Value::from("abc");
/// assert_eq!(v.as_str(), Some("abc"));
/// assert!(Value::default().is_nil());
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Nil,
    Bool(bool),
    Number(f64),
    String(String),
    List(Vec<Value>),
    Map(ValueMap),
    Node(Box<Node>),
}

/// A span record produced by [`node`](crate::combinators::node).
///
/// `input[start..end]` is exactly the text consumed by the wrapped parser.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub name: String,
    pub value: Value,
    pub start: usize,
    pub end: usize,
}

impl Value {
    /// Returns the type name of the value as a string.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Nil => "Nil",
            Value::Bool(_) => "Bool",
            Value::Number(_) => "Number",
            Value::String(_) => "String",
            Value::List(_) => "List",
            Value::Map(_) => "Map",
            Value::Node(_) => "Node",
        }
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&ValueMap> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_node(&self) -> Option<&Node> {
        match self {
            Value::Node(node) => Some(node),
            _ => None,
        }
    }

    /// Consumes the value, returning the items if it is a list.
    pub fn into_list(self) -> Option<Vec<Value>> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    /// Looks up a label in a map value.
    ///
    /// ```rust
    /// use parsinator::{Value, ValueMap};
    /// let map: ValueMap = [("x".to_string(), Value::from(1.0))].into_iter().collect();
    /// assert_eq!(Value::Map(map).get("x"), Some(&Value::Number(1.0)));
    /// ```
    pub fn get(&self, label: &str) -> Option<&Value> {
        self.as_map().and_then(|map| map.get(label))
    }

    /// Renders the value as compact JSON.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| self.to_string())
    }

    /// Integral numbers print without a fraction; past 2^53 the `f64` form is used since
    /// an `i64` cast would saturate.
    fn fmt_number(f: &mut fmt::Formatter<'_>, n: f64) -> fmt::Result {
        if n.fract() == 0.0 && n.is_finite() && n.abs() < 9.0e15 {
            write!(f, "{}", n as i64)
        } else {
            write!(f, "{}", n)
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => write!(f, "nil"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Number(n) => Value::fmt_number(f, *n),
            Value::String(s) => write!(f, "{}", s),
            Value::List(_) | Value::Map(_) | Value::Node(_) => {
                let json = serde_json::to_string(self).map_err(|_| fmt::Error)?;
                write!(f, "{}", json)
            }
        }
    }
}

// Integral numbers serialize as JSON integers so `12.0` renders as `12`.
impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Nil => serializer.serialize_none(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Number(n) if n.fract() == 0.0 && n.is_finite() && n.abs() < 9.0e15 => {
                serializer.serialize_i64(*n as i64)
            }
            Value::Number(n) => serializer.serialize_f64(*n),
            Value::String(s) => serializer.serialize_str(s),
            Value::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Map(map) => {
                let mut out = serializer.serialize_map(Some(map.len()))?;
                for (k, v) in map.iter() {
                    out.serialize_entry(k, v)?;
                }
                out.end()
            }
            Value::Node(node) => node.serialize(serializer),
        }
    }
}

impl Serialize for Node {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut out = serializer.serialize_map(Some(4))?;
        out.serialize_entry("name", &self.name)?;
        out.serialize_entry("value", &self.value)?;
        out.serialize_entry("start", &self.start)?;
        out.serialize_entry("end", &self.end)?;
        out.end()
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
    }
}

impl From<usize> for Value {
    fn from(n: usize) -> Self {
        Value::Number(n as f64)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}

impl From<ValueMap> for Value {
    fn from(map: ValueMap) -> Self {
        Value::Map(map)
    }
}

impl From<Node> for Value {
    fn from(node: Node) -> Self {
        Value::Node(Box::new(node))
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or_default()
    }
}
