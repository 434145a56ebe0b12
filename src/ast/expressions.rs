use std::fmt::{Display, Formatter};
use std::rc::Rc;

use itertools::Itertools;

use super::types::Type;
use super::values::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Eq,
    Ne,
}

impl BinOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Eq => "==",
            BinOp::Ne => "!=",
        }
    }
}

/// Member bodies. Exprs are immutable and shared; a thunk holds one until
/// it is forced.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Lit(Value),
    Var(String),
    Throw(String),
    Binary(BinOp, Rc<Expr>, Rc<Expr>),
    /// `target[key]`
    Index(Rc<Expr>, Rc<Expr>),
    /// `super[key]`, resolved against the declaring object's parent
    Super(Rc<Expr>),
    /// `value as Type`
    Cast(Rc<Expr>, Type),
    /// `value is Type`
    Is(Rc<Expr>, Type),
    /// `new Type { body }`
    New(Type, ObjectBody),
    /// `(parent) { body }`
    Amend(Rc<Expr>, ObjectBody),
    List(Vec<Rc<Expr>>),
    Pair(Rc<Expr>, Rc<Expr>),
}

/// The members written inside `{ ... }`: plain elements, then
/// `[key] = value` entries, both in source order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectBody {
    pub elements: Vec<Rc<Expr>>,
    pub entries: Vec<(Rc<Expr>, Rc<Expr>)>,
}

impl ObjectBody {
    pub fn elements<I>(elements: I) -> Self
    where
        I: IntoIterator<Item = Expr>,
    {
        ObjectBody {
            elements: elements.into_iter().map(Rc::new).collect(),
            entries: Vec::new(),
        }
    }

    pub fn entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (Expr, Expr)>,
    {
        ObjectBody {
            elements: Vec::new(),
            entries: entries
                .into_iter()
                .map(|(k, v)| (Rc::new(k), Rc::new(v)))
                .collect(),
        }
    }

    pub fn with_entry(mut self, key: Expr, value: Expr) -> Self {
        self.entries.push((Rc::new(key), Rc::new(value)));
        self
    }
}

/***************\
|* Constructors *|
\***************/
// Sugar so tests and samples can build member bodies without wrapping
// every node in an `Rc` by hand.
impl Expr {
    pub fn int(value: isize) -> Self {
        Expr::Lit(Value::Int(value))
    }

    pub fn string(value: &str) -> Self {
        Expr::Lit(Value::Str(value.to_string()))
    }

    pub fn var(name: &str) -> Self {
        Expr::Var(name.to_string())
    }

    pub fn throw(message: &str) -> Self {
        Expr::Throw(message.to_string())
    }

    pub fn binary(op: BinOp, lhs: Expr, rhs: Expr) -> Self {
        Expr::Binary(op, Rc::new(lhs), Rc::new(rhs))
    }

    pub fn plus(lhs: Expr, rhs: Expr) -> Self {
        Expr::binary(BinOp::Add, lhs, rhs)
    }

    pub fn equals(lhs: Expr, rhs: Expr) -> Self {
        Expr::binary(BinOp::Eq, lhs, rhs)
    }

    pub fn index(target: Expr, key: Expr) -> Self {
        Expr::Index(Rc::new(target), Rc::new(key))
    }

    pub fn super_index(key: Expr) -> Self {
        Expr::Super(Rc::new(key))
    }

    pub fn cast(value: Expr, ty: Type) -> Self {
        Expr::Cast(Rc::new(value), ty)
    }

    pub fn is(value: Expr, ty: Type) -> Self {
        Expr::Is(Rc::new(value), ty)
    }

    pub fn amend(parent: Expr, body: ObjectBody) -> Self {
        Expr::Amend(Rc::new(parent), body)
    }

    pub fn list<I>(items: I) -> Self
    where
        I: IntoIterator<Item = Expr>,
    {
        Expr::List(items.into_iter().map(Rc::new).collect())
    }

    pub fn pair(first: Expr, second: Expr) -> Self {
        Expr::Pair(Rc::new(first), Rc::new(second))
    }
}

impl Display for Expr {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Expr::Lit(value) => value.fmt(f),
            Expr::Var(name) => write!(f, "{name}"),
            Expr::Throw(message) => write!(f, "throw({message:?})"),
            Expr::Binary(op, lhs, rhs) => {
                write!(f, "{lhs} {} {rhs}", op.symbol())
            },
            Expr::Index(target, key) => write!(f, "{target}[{key}]"),
            Expr::Super(key) => write!(f, "super[{key}]"),
            Expr::Cast(value, ty) => write!(f, "{value} as {ty}"),
            Expr::Is(value, ty) => write!(f, "{value} is {ty}"),
            Expr::New(ty, body) => write!(f, "new {ty} {body}"),
            Expr::Amend(parent, body) => write!(f, "({parent}) {body}"),
            Expr::List(items) => write!(f, "List({})", items.iter().join(", ")),
            Expr::Pair(a, b) => write!(f, "Pair({a}, {b})"),
        }
    }
}

impl Display for ObjectBody {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let members = self
            .elements
            .iter()
            .map(|e| e.to_string())
            .chain(
                self.entries
                    .iter()
                    .map(|(k, v)| format!("[{k}] = {v}")),
            )
            .join("; ");
        write!(f, "{{ {members} }}")
    }
}
