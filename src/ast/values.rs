use std::fmt::{Display, Formatter};
use std::rc::Rc;

use itertools::Itertools;

use crate::heap::ObjId;
use crate::ErrorKind;

/// Which of the two lazy container kinds an object is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContainerKind {
    Listing,
    Mapping,
}

impl Display for ContainerKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ContainerKind::Listing => write!(f, "Listing"),
            ContainerKind::Mapping => write!(f, "Mapping"),
        }
    }
}

/// Outer shape of a value, as far as union casting is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Container(ContainerKind),
    Other,
}

/// A runtime value.
///
/// `Listing` and `Mapping` are handles into the evaluator's heap; their
/// members stay unevaluated until read. `List` and `Pair` are eager and
/// shared by reference.
///
/// `PartialEq` here is shallow: containers compare by handle. Language
/// equality lives in `Evaluator::values_equal`.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(isize),
    Float(f64),
    Str(String),
    Listing(ObjId),
    Mapping(ObjId),
    List(Rc<Vec<Value>>),
    Pair(Rc<(Value, Value)>),
}

impl Value {
    pub fn container(kind: ContainerKind, id: ObjId) -> Self {
        match kind {
            ContainerKind::Listing => Value::Listing(id),
            ContainerKind::Mapping => Value::Mapping(id),
        }
    }

    pub fn as_container(&self) -> Option<(ContainerKind, ObjId)> {
        match self {
            Value::Listing(id) => Some((ContainerKind::Listing, *id)),
            Value::Mapping(id) => Some((ContainerKind::Mapping, *id)),
            _ => None,
        }
    }

    pub fn expect_container(&self) -> Result<(ContainerKind, ObjId), ErrorKind> {
        self.as_container()
            .ok_or_else(|| ErrorKind::NotAContainer {
                actual: self.type_str().to_string(),
            })
    }

    pub fn shape(&self) -> Shape {
        match self.as_container() {
            Some((kind, _)) => Shape::Container(kind),
            None => Shape::Other,
        }
    }

    pub fn list(items: Vec<Value>) -> Self {
        Value::List(Rc::new(items))
    }

    pub fn pair(first: Value, second: Value) -> Self {
        Value::Pair(Rc::new((first, second)))
    }

    pub fn type_str(&self) -> &'static str {
        match self {
            Value::Null => "Null",
            Value::Bool(_) => "Boolean",
            Value::Int(_) => "Int",
            Value::Float(_) => "Float",
            Value::Str(_) => "String",
            Value::Listing(_) => "Listing",
            Value::Mapping(_) => "Mapping",
            Value::List(_) => "List",
            Value::Pair(_) => "Pair",
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(x) => x.fmt(f),
            Value::Int(x) => x.fmt(f),
            Value::Float(x) => x.fmt(f),
            Value::Str(x) => write!(f, "{x:?}"),
            Value::Listing(id) => write!(f, "Listing#{}", id.index()),
            Value::Mapping(id) => write!(f, "Mapping#{}", id.index()),
            Value::List(items) => write!(f, "List({})", items.iter().join(", ")),
            Value::Pair(pair) => write!(f, "Pair({}, {})", pair.0, pair.1),
        }
    }
}

/**********************************************\
|* Forced keys                                *|
\**********************************************/

/// A deep-forced, hashable snapshot of a value.
///
/// Mapping entries are indexed by `Key`, and structural hashing goes
/// through it. Building one forces every nested member.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Key {
    Null,
    Bool(bool),
    Int(isize),
    /// bit pattern, with `-0.0` folded into `0.0`
    Float(u64),
    Str(String),
    List(Vec<Key>),
    Pair(Box<Key>, Box<Key>),
    Listing(Vec<Key>),
    /// sorted, so two mappings with the same entries snapshot equally
    Mapping(Vec<(Key, Key)>),
}

impl Key {
    pub fn float(x: f64) -> Self {
        let x = if x == 0.0 { 0.0 } else { x };
        Key::Float(x.to_bits())
    }

    pub fn mapping(mut entries: Vec<(Key, Key)>) -> Self {
        entries.sort();
        Key::Mapping(entries)
    }

    /// The listing index this key denotes, if it is one.
    pub fn as_index(&self) -> Option<isize> {
        match self {
            Key::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Scalar keys can be turned back into values; composite ones cannot,
    /// since the containers they were forced from are gone.
    pub fn to_value(&self) -> Option<Value> {
        match self {
            Key::Null => Some(Value::Null),
            Key::Bool(b) => Some(Value::Bool(*b)),
            Key::Int(i) => Some(Value::Int(*i)),
            Key::Float(bits) => Some(Value::Float(f64::from_bits(*bits))),
            Key::Str(s) => Some(Value::Str(s.clone())),
            _ => None,
        }
    }
}

impl Display for Key {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Key::Null => write!(f, "null"),
            Key::Bool(b) => b.fmt(f),
            Key::Int(i) => i.fmt(f),
            Key::Float(bits) => f64::from_bits(*bits).fmt(f),
            Key::Str(s) => write!(f, "{s:?}"),
            Key::List(items) => write!(f, "List({})", items.iter().join(", ")),
            Key::Pair(a, b) => write!(f, "Pair({a}, {b})"),
            Key::Listing(items) => {
                write!(f, "new Listing {{ {} }}", items.iter().join("; "))
            },
            Key::Mapping(entries) => {
                write!(
                    f,
                    "new Mapping {{ {} }}",
                    entries
                        .iter()
                        .map(|(k, v)| format!("[{k}] = {v}"))
                        .join("; ")
                )
            },
        }
    }
}

// Sugar for string literals in tests and samples.
impl From<&str> for Value {
    fn from(val: &str) -> Self {
        Value::Str(val.to_string())
    }
}
