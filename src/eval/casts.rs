use tracing::{debug, trace};

use crate::ast::{
    Accessor, ContainerKind, EResult, ErrorKind, EvalError, Key, Shape, Type,
    TypeClass, Value,
};
use crate::eval::unions::{resolve_union, UnionPolicy};
use crate::heap::ObjId;
use crate::Evaluator;

/// `as`: the type cast used by cast expressions and declared-type bindings.
///
/// For listings and mappings the cast is lazy. It returns the value itself
/// when there is nothing new to check, and otherwise a delegating view that
/// checks each member as it is read. Only a union with several
/// alternatives of the value's shape is checked up front.
impl Evaluator {
    pub fn cast(&self, value: Value, target: &Type) -> EResult<Value> {
        let Some((kind, id)) = value.as_container() else {
            return self.cast_plain(value, target);
        };

        match (target.classify(), target) {
            (TypeClass::Union, Type::Union(branches)) => {
                self.cast_union(value, target, branches)
            },
            _ => self.cast_container(value, kind, id, target),
        }
    }

    fn cast_container(
        &self,
        value: Value,
        kind: ContainerKind,
        id: ObjId,
        target: &Type,
    ) -> EResult<Value> {
        if !target.admits_shape(Shape::Container(kind)) {
            return Err(self.mismatch(target, &value));
        }
        if target.is_trivial() || *target == self.effective_type_of(id) {
            trace!(%target, object = id.index(), "cast is a no-op");
            return Ok(value);
        }

        let delegate = self.heap.delegate(kind, id, target);
        debug!(
            %target,
            source = id.index(),
            delegate = delegate.index(),
            "deferring member checks to a delegating view"
        );
        Ok(Value::container(kind, delegate))
    }

    fn cast_union(
        &self,
        value: Value,
        target: &Type,
        branches: &[Type],
    ) -> EResult<Value> {
        match resolve_union(branches, value.shape()) {
            UnionPolicy::Lazy(branch) => self.cast(value, branch),
            UnionPolicy::Eager(candidates) => {
                self.cast_ambiguous(value, target, &candidates)
            },
            UnionPolicy::NoMatch => Err(self.mismatch(target, &value)),
            UnionPolicy::Unrelated => self.cast_plain(value, target),
        }
    }

    /// Deep-force the value, then take the first alternative every member
    /// satisfies. Failure is reported against the cast as a whole.
    fn cast_ambiguous(
        &self,
        value: Value,
        target: &Type,
        candidates: &[&Type],
    ) -> EResult<Value> {
        debug!(%target, "ambiguous union; checking eagerly");
        // a cast view failing its own checks fits no alternative either
        self.deep_force(&value).map_err(|err| {
            if err.is_type_mismatch() {
                self.no_alternative(target, &value)
            } else {
                err
            }
        })?;

        for branch in candidates {
            if self.test(&value, branch)? {
                trace!(%branch, "union alternative matched");
                return self.cast(value, branch);
            }
        }
        Err(self.no_alternative(target, &value))
    }

    /// Casts for everything that is not a lazy container. Eager
    /// collections are checked element by element right away.
    fn cast_plain(&self, value: Value, target: &Type) -> EResult<Value> {
        match target {
            Type::Any => Ok(value),
            Type::Simple(base) => {
                if base.admits(&value) {
                    Ok(value)
                } else {
                    Err(self.mismatch(target, &value))
                }
            },
            Type::Union(branches) => {
                for branch in branches {
                    match self.cast(value.clone(), branch) {
                        Err(err) if err.is_type_mismatch() => continue,
                        result => return result,
                    }
                }
                Err(self.mismatch(target, &value))
            },
            Type::Parameterized(base, args) => {
                if !base.admits(&value) {
                    return Err(self.mismatch(target, &value));
                }
                let first = args.first().unwrap_or(&Type::Any);
                let second = args.get(1).unwrap_or(&Type::Any);

                match &value {
                    Value::List(items) => {
                        let items = items.clone();
                        let cast = items
                            .iter()
                            .enumerate()
                            .map(|(i, item)| {
                                self.cast(item.clone(), first).map_err(|err| {
                                    err.at(Accessor::Member(Key::Int(i as isize)))
                                })
                            })
                            .collect::<EResult<Vec<Value>>>()?;
                        if cast == *items {
                            Ok(value)
                        } else {
                            Ok(Value::list(cast))
                        }
                    },
                    Value::Pair(pair) => {
                        let pair = pair.clone();
                        let a = self.cast(pair.0.clone(), first)?;
                        let b = self.cast(pair.1.clone(), second)?;
                        if a == pair.0 && b == pair.1 {
                            Ok(value)
                        } else {
                            Ok(Value::pair(a, b))
                        }
                    },
                    _ => Ok(value),
                }
            },
        }
    }

    fn no_alternative(&self, target: &Type, value: &Value) -> EvalError {
        ErrorKind::AmbiguousUnionMismatch {
            expected: target.to_string(),
            actual: self.describe(value),
        }
        .into()
    }

    fn mismatch(&self, target: &Type, value: &Value) -> EvalError {
        ErrorKind::TypeMismatch {
            expected: target.to_string(),
            actual: self.describe(value),
        }
        .into()
    }

    /// Short description of a value for error messages.
    pub(crate) fn describe(&self, value: &Value) -> String {
        match value {
            Value::Listing(id) | Value::Mapping(id) => {
                self.effective_type_of(*id).to_string()
            },
            Value::List(_) | Value::Pair(_) => value.type_str().to_string(),
            scalar => format!("{} {scalar}", scalar.type_str()),
        }
    }
}
