use std::cell::RefCell;
use std::fmt::{Debug, Formatter};
use std::rc::Rc;

use tracing::trace;

use crate::ast::{EResult, ErrorKind, EvalError, Expr, Value};
use crate::heap::ObjId;
use crate::Evaluator;

/// What an expression may refer to while a member is being evaluated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EvalContext {
    /// The parent of the object that declared the member; target of
    /// `super[...]`.
    pub super_target: Option<ObjId>,
}

enum ThunkState {
    Pending(Rc<Expr>),
    /// being forced right now; seeing this again means a cycle
    Forcing(Rc<Expr>),
    Done(Value),
}

/// A deferred member value, computed on first `force` and cached after.
///
/// Failures are not cached: forcing again re-runs the expression, which
/// fails the same way on an unchanged object graph.
pub struct Thunk {
    state: RefCell<ThunkState>,
    context: EvalContext,
}

impl Thunk {
    pub fn new(expr: Rc<Expr>, context: EvalContext) -> Rc<Self> {
        Rc::new(Thunk {
            state: RefCell::new(ThunkState::Pending(expr)),
            context,
        })
    }

    pub fn is_forced(&self) -> bool {
        matches!(*self.state.borrow(), ThunkState::Done(_))
    }

    pub fn force(&self, evaluator: &Evaluator) -> EResult<Value> {
        // the borrow must end before evaluating, which may force other thunks
        let expr = {
            let mut state = self.state.borrow_mut();
            match &*state {
                ThunkState::Done(value) => return Ok(value.clone()),
                ThunkState::Forcing(_) => {
                    return Err(ErrorKind::CyclicEvaluation.into())
                },
                ThunkState::Pending(expr) => {
                    let expr = expr.clone();
                    *state = ThunkState::Forcing(expr.clone());
                    expr
                },
            }
        };

        trace!(%expr, "forcing member");
        let result = evaluator
            .eval_expr(&expr, self.context)
            .map_err(EvalError::rerooted);

        *self.state.borrow_mut() = match &result {
            Ok(value) => ThunkState::Done(value.clone()),
            Err(_) => ThunkState::Pending(expr),
        };
        result
    }
}

impl Debug for Thunk {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &*self.state.borrow() {
            ThunkState::Pending(expr) => write!(f, "Thunk(pending: {expr})"),
            ThunkState::Forcing(expr) => write!(f, "Thunk(forcing: {expr})"),
            ThunkState::Done(value) => write!(f, "Thunk({value})"),
        }
    }
}
