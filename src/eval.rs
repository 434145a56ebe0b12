mod casts;
mod containers;
mod equality;
mod eval_exprs;
mod keys;
mod unions;

use std::rc::Rc;

pub use containers::{Member, Members};
pub use unions::{resolve_union, UnionPolicy};

use crate::ast::{AccessPath, Accessor, EResult, ErrorKind, Expr, Type, Value};
use crate::heap::Heap;
use crate::scope::Scope;
use crate::thunk::{EvalContext, Thunk};

/// One evaluation context: the object table plus the module bindings.
///
/// Evaluation is single threaded; forcing runs to completion before the
/// caller continues.
#[derive(Debug, Default)]
pub struct Evaluator {
    heap: Heap,
    scope: Scope,
}

impl Evaluator {
    pub fn new() -> Self {
        Evaluator::default()
    }

    pub fn heap(&self) -> &Heap {
        &self.heap
    }

    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    /// Bind `name` lazily. With a declared type, the first read casts the
    /// value, and the cast result is what later reads see.
    pub fn define(&self, name: &str, declared: Option<Type>, expr: Expr) {
        let body = match declared {
            Some(ty) => Expr::Cast(Rc::new(expr), ty),
            None => expr,
        };
        self.scope
            .set(name, Thunk::new(Rc::new(body), EvalContext::default()));
    }

    pub fn lookup(&self, name: &str) -> EResult<Value> {
        let thunk = self.scope.lookup_or_error(name)?;
        thunk
            .force(self)
            .map_err(|err| err.at(Accessor::Binding(name.to_string())))
    }

    /// Evaluate a top-level expression (no enclosing object).
    pub fn eval(&self, expr: &Expr) -> EResult<Value> {
        self.eval_expr(expr, EvalContext::default())
    }

    /// Walk `path` from its binding, attributing a failure to the whole
    /// path walked so far.
    pub fn resolve_path(&self, path: &AccessPath) -> EResult<Value> {
        let mut accessors = path.iter();
        let Some(Accessor::Binding(name)) = accessors.next() else {
            return Err(ErrorKind::UnboundName(path.to_string()).into());
        };

        let mut walked = AccessPath::binding(name);
        let mut value = self.lookup(name)?;
        for accessor in accessors {
            let Accessor::Member(key) = accessor else {
                return Err(ErrorKind::UnboundName(accessor.to_string()).into());
            };
            value = self
                .get_key(&value, key)
                .map_err(|err| err.within(&walked))?;
            walked.push(accessor.clone());
        }
        Ok(value)
    }
}
