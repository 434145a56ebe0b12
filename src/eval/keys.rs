use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

use tracing::trace;

use crate::ast::{Accessor, ContainerKind, EResult, ErrorKind, Expr, Key, Value};
use crate::heap::ObjId;
use crate::thunk::EvalContext;
use crate::Evaluator;

/// Whether a snapshot reads through delegating views or around them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CastMode {
    Apply,
    Skip,
}

impl Evaluator {
    /// Evaluate and deep-force a mapping key at construction time.
    ///
    /// Returns the forced key alongside the value it was forced from.
    pub(crate) fn eval_key(
        &self,
        expr: &Rc<Expr>,
        context: EvalContext,
    ) -> EResult<(Key, Value)> {
        let forced = self
            .eval_expr(expr, context)
            .and_then(|value| Ok((self.deep_force(&value)?, value)));

        forced.map_err(|err| {
            if err.is_cyclic() {
                return err;
            }
            ErrorKind::KeyEvaluation {
                key: expr.to_string(),
                cause: Box::new(err),
            }
            .into()
        })
    }

    /// Force every member of `value`, recursively, as read through any
    /// casts it carries.
    pub fn deep_force(&self, value: &Value) -> EResult<Key> {
        self.snapshot(value, CastMode::Apply, &mut Vec::new())
    }

    /// Structural hash. Casts do not participate, so a container and a
    /// cast view of it hash alike.
    pub fn hash_value(&self, value: &Value) -> EResult<u64> {
        let key = self.snapshot(value, CastMode::Skip, &mut Vec::new())?;
        let mut hasher = DefaultHasher::new();
        key.hash(&mut hasher);
        Ok(hasher.finish())
    }

    /// `open` holds the uncast containers currently being snapshotted. A
    /// container that contains itself has no finite snapshot.
    fn snapshot(
        &self,
        value: &Value,
        mode: CastMode,
        open: &mut Vec<ObjId>,
    ) -> EResult<Key> {
        let key = match value {
            Value::Null => Key::Null,
            Value::Bool(b) => Key::Bool(*b),
            Value::Int(i) => Key::Int(*i),
            Value::Float(x) => Key::float(*x),
            Value::Str(s) => Key::Str(s.clone()),
            Value::List(items) => {
                let items = items
                    .iter()
                    .enumerate()
                    .map(|(i, item)| {
                        self.snapshot(item, mode, open).map_err(|err| {
                            err.at(Accessor::Member(Key::Int(i as isize)))
                        })
                    })
                    .collect::<EResult<Vec<Key>>>()?;
                Key::List(items)
            },
            Value::Pair(pair) => {
                Key::Pair(
                    Box::new(self.snapshot(&pair.0, mode, open)?),
                    Box::new(self.snapshot(&pair.1, mode, open)?),
                )
            },
            Value::Listing(id) | Value::Mapping(id) => {
                let id = match mode {
                    CastMode::Apply => *id,
                    CastMode::Skip => self.uncast(*id),
                };
                let source = self.uncast(id);
                if open.contains(&source) {
                    return Err(ErrorKind::CyclicEvaluation.into());
                }
                trace!(object = id.index(), ?mode, "snapshotting container");
                let container = self.container_value(id);

                open.push(source);
                let entries = self.snapshot_members(id, &container, mode, open);
                open.pop();
                let entries = entries?;

                match self.heap.get(id).kind() {
                    ContainerKind::Listing => {
                        Key::Listing(entries.into_iter().map(|(_, v)| v).collect())
                    },
                    ContainerKind::Mapping => Key::mapping(entries),
                }
            },
        };
        Ok(key)
    }

    fn snapshot_members(
        &self,
        id: ObjId,
        container: &Value,
        mode: CastMode,
        open: &mut Vec<ObjId>,
    ) -> EResult<Vec<(Key, Key)>> {
        let mut entries = Vec::new();
        for key in self.object_keys(id).into_keys() {
            let member = self.get_key(container, &key)?;
            let forced = self
                .snapshot(&member, mode, open)
                .map_err(|err| err.at(Accessor::Member(key.clone())))?;
            entries.push((key, forced));
        }
        Ok(entries)
    }
}
