#![allow(dead_code)]

use lazy_cast::ast::{AccessPath, Base, Expr, Key, ObjectBody, Type, Value};
use lazy_cast::heap::Object;
use lazy_cast::Evaluator;

pub fn listing<I>(items: I) -> Expr
where
    I: IntoIterator<Item = Expr>,
{
    Expr::New(Type::Simple(Base::Listing), ObjectBody::elements(items))
}

pub fn mapping<I>(entries: I) -> Expr
where
    I: IntoIterator<Item = (Expr, Expr)>,
{
    Expr::New(Type::Simple(Base::Mapping), ObjectBody::entries(entries))
}

pub fn listing_of(base: Base) -> Type {
    Type::listing(base.into())
}

pub fn ints() -> Type {
    listing_of(Base::Int)
}

pub fn eval(evaluator: &Evaluator, expr: Expr) -> Value {
    evaluator.eval(&expr).unwrap()
}

pub fn idx(i: isize) -> Key {
    Key::Int(i)
}

pub fn key(s: &str) -> Key {
    Key::Str(s.to_string())
}

pub fn path(s: &str) -> AccessPath {
    s.parse().unwrap()
}

/// Whether every element thunk of the source under `value` was forced.
pub fn all_forced(evaluator: &Evaluator, value: &Value) -> bool {
    let (_, mut id) = value.as_container().unwrap();
    loop {
        match &*evaluator.heap().get(id) {
            Object::Delegate(delegate) => id = delegate.source,
            Object::Source(source) => {
                return source.elements.iter().all(|thunk| thunk.is_forced())
            },
        }
    }
}

pub fn none_forced(evaluator: &Evaluator, value: &Value) -> bool {
    let (_, mut id) = value.as_container().unwrap();
    loop {
        match &*evaluator.heap().get(id) {
            Object::Delegate(delegate) => id = delegate.source,
            Object::Source(source) => {
                return source.elements.iter().all(|thunk| !thunk.is_forced())
            },
        }
    }
}

/// Evaluator with the sample graph loaded.
pub fn samples() -> Evaluator {
    let evaluator = Evaluator::new();
    lazy_cast::samples::load(&evaluator);
    evaluator
}
