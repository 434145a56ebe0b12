use tracing::trace;

use crate::ast::{AccessPath, BinOp, EResult, ErrorKind, Expr, Value};
use crate::thunk::EvalContext;
use crate::Evaluator;

impl Evaluator {
    /// Evaluate a member expression. Container literals and amends build
    /// new objects; everything inside them stays lazy.
    pub(crate) fn eval_expr(
        &self,
        expr: &Expr,
        context: EvalContext,
    ) -> EResult<Value> {
        match expr {
            Expr::Lit(value) => Ok(value.clone()),
            Expr::Var(name) => self.lookup(name),
            Expr::Throw(message) => Err(ErrorKind::Thrown(message.clone()).into()),
            Expr::Binary(op, lhs, rhs) => {
                let lhs = self.eval_expr(lhs, context)?;
                let rhs = self.eval_expr(rhs, context)?;
                self.eval_binary(*op, lhs, rhs)
            },
            Expr::Index(target_expr, key) => {
                let target = self.eval_expr(target_expr, context)?;
                let key = self.eval_expr(key, context)?;
                self.get(&target, &key).map_err(|err| {
                    match &**target_expr {
                        Expr::Var(name) => err.within(&AccessPath::binding(name)),
                        _ => err,
                    }
                })
            },
            Expr::Super(key) => {
                let parent = context
                    .super_target
                    .ok_or(ErrorKind::NoSuperObject)?;
                let key = self.eval_expr(key, context)?;
                trace!(parent = parent.index(), %key, "super lookup");
                self.get(&self.container_value(parent), &key)
            },
            Expr::Cast(value, ty) => {
                let value = self.eval_expr(value, context)?;
                self.cast(value, ty)
            },
            Expr::Is(value, ty) => {
                let value = self.eval_expr(value, context)?;
                Ok(Value::Bool(self.test(&value, ty)?))
            },
            Expr::New(ty, body) => self.instantiate(ty, body, context),
            Expr::Amend(parent, body) => {
                let parent = self.eval_expr(parent, context)?;
                self.amend_in(&parent, body, context)
            },
            Expr::List(items) => {
                items
                    .iter()
                    .map(|item| self.eval_expr(item, context))
                    .collect::<EResult<Vec<Value>>>()
                    .map(Value::list)
            },
            Expr::Pair(first, second) => {
                let first = self.eval_expr(first, context)?;
                let second = self.eval_expr(second, context)?;
                Ok(Value::pair(first, second))
            },
        }
    }

    fn eval_binary(&self, op: BinOp, lhs: Value, rhs: Value) -> EResult<Value> {
        match op {
            BinOp::Eq => Ok(Value::Bool(self.values_equal(&lhs, &rhs)?)),
            BinOp::Ne => Ok(Value::Bool(!self.values_equal(&lhs, &rhs)?)),
            BinOp::Add => {
                let sum = match (&lhs, &rhs) {
                    (Value::Int(a), Value::Int(b)) => {
                        let sum = a
                            .checked_add(*b)
                            .ok_or(ErrorKind::Overflow(op.symbol()))?;
                        Value::Int(sum)
                    },
                    (Value::Float(a), Value::Float(b)) => Value::Float(a + b),
                    (Value::Int(a), Value::Float(b)) => {
                        Value::Float((*a as f64) + b)
                    },
                    (Value::Float(a), Value::Int(b)) => {
                        Value::Float(a + (*b as f64))
                    },
                    (Value::Str(a), Value::Str(b)) => {
                        Value::Str(a.to_string() + b)
                    },
                    _ => {
                        return Err(ErrorKind::InvalidOperands {
                            op: op.symbol(),
                            lhs: lhs.type_str().to_string(),
                            rhs: rhs.type_str().to_string(),
                        }
                        .into())
                    },
                };
                Ok(sum)
            },
        }
    }
}
