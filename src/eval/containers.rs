use indexmap::IndexMap;
use tracing::{debug, trace};

use crate::ast::{
    Accessor, Base, ContainerKind, EResult, ErrorKind, Key, ObjectBody, Type,
    Value,
};
use crate::heap::{Entry, ObjId, Object, SourceContainer};
use crate::thunk::{EvalContext, Thunk};
use crate::Evaluator;

/// One member produced while iterating a container.
#[derive(Debug, Clone)]
pub struct Member {
    /// the key as written (an `Int` index for listings)
    pub key: Value,
    pub forced_key: Key,
    /// the member read; a failure here does not end the iteration
    pub value: EResult<Value>,
}

impl Member {
    pub fn accessor(&self) -> Accessor {
        Accessor::Member(self.forced_key.clone())
    }
}

/// Lazy, finite iteration over a container's members. Each member is read
/// only when the iterator reaches it.
pub struct Members<'a> {
    evaluator: &'a Evaluator,
    container: Value,
    keys: indexmap::map::IntoIter<Key, Value>,
}

impl Iterator for Members<'_> {
    type Item = Member;

    fn next(&mut self) -> Option<Self::Item> {
        let (forced_key, key) = self.keys.next()?;
        let value = self
            .evaluator
            .get_key(&self.container, &forced_key);
        Some(Member {
            key,
            forced_key,
            value,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.keys.size_hint()
    }
}

/*******************\
|* Structural reads *|
\*******************/
impl Evaluator {
    pub fn container_value(&self, id: ObjId) -> Value {
        Value::container(self.heap.get(id).kind(), id)
    }

    /// Member count. Never forces a member.
    pub fn length(&self, container: &Value) -> EResult<usize> {
        match container {
            Value::List(items) => Ok(items.len()),
            _ => {
                let (_, id) = container.expect_container()?;
                Ok(self.object_length(id))
            },
        }
    }

    pub(crate) fn object_length(&self, id: ObjId) -> usize {
        match &*self.heap.get(id) {
            Object::Delegate(delegate) => self.object_length(delegate.source),
            Object::Source(source) => {
                match source.kind {
                    ContainerKind::Listing => {
                        let inherited = source
                            .parent
                            .map_or(0, |parent| self.object_length(parent));
                        inherited + source.elements.len()
                    },
                    ContainerKind::Mapping => self.object_keys(id).len(),
                }
            },
        }
    }

    /// Keys as written, in iteration order. Never forces a member.
    pub fn keys(&self, container: &Value) -> EResult<Vec<Value>> {
        let (_, id) = container.expect_container()?;
        Ok(self.object_keys(id).into_values().collect())
    }

    /// Inherited keys come first, in the parent's order; a key the child
    /// overrides keeps its inherited position.
    pub(crate) fn object_keys(&self, id: ObjId) -> IndexMap<Key, Value> {
        match &*self.heap.get(id) {
            Object::Delegate(delegate) => self.object_keys(delegate.source),
            Object::Source(source) => {
                match source.kind {
                    ContainerKind::Listing => {
                        (0..self.object_length(id))
                            .map(|i| (Key::Int(i as isize), Value::Int(i as isize)))
                            .collect()
                    },
                    ContainerKind::Mapping => {
                        let mut keys = source
                            .parent
                            .map(|parent| self.object_keys(parent))
                            .unwrap_or_default();
                        for (key, entry) in &source.entries {
                            keys.entry(key.clone())
                                .or_insert_with(|| entry.key.clone());
                        }
                        keys
                    },
                }
            },
        }
    }

    pub fn members(&self, container: &Value) -> EResult<Members<'_>> {
        let (_, id) = container.expect_container()?;
        Ok(Members {
            evaluator: self,
            container: container.clone(),
            keys: self.object_keys(id).into_iter(),
        })
    }

    /// The object `super` resolves against. A delegating view reports its
    /// source's parent, never itself.
    pub fn parent_of(&self, container: &Value) -> EResult<Option<Value>> {
        let (_, id) = container.expect_container()?;
        Ok(self
            .parent_id(id)
            .map(|parent| self.container_value(parent)))
    }

    fn parent_id(&self, id: ObjId) -> Option<ObjId> {
        match &*self.heap.get(id) {
            Object::Delegate(delegate) => self.parent_id(delegate.source),
            Object::Source(source) => source.parent,
        }
    }

    /// The cast every read through this value already passes. For a plain
    /// source that is just its kind, with unknown element types.
    pub fn effective_type(&self, container: &Value) -> EResult<Type> {
        let (_, id) = container.expect_container()?;
        Ok(self.effective_type_of(id))
    }

    pub(crate) fn effective_type_of(&self, id: ObjId) -> Type {
        match &*self.heap.get(id) {
            Object::Delegate(delegate) => delegate.cast.clone(),
            Object::Source(source) => {
                match source.kind {
                    ContainerKind::Listing => Type::Simple(Base::Listing),
                    ContainerKind::Mapping => Type::Simple(Base::Mapping),
                }
            },
        }
    }

    /// Strip every delegating view and return the source underneath.
    pub(crate) fn uncast(&self, id: ObjId) -> ObjId {
        match &*self.heap.get(id) {
            Object::Delegate(delegate) => self.uncast(delegate.source),
            Object::Source(_) => id,
        }
    }
}

/*****************\
|* Member reads  *|
\*****************/
impl Evaluator {
    /// `container[key]`. The key is deep-forced first.
    pub fn get(&self, container: &Value, key: &Value) -> EResult<Value> {
        let key = self.deep_force(key)?;
        self.get_key(container, &key)
    }

    /// Read one member. Failures carry this member's accessor and affect
    /// no other member.
    pub fn get_key(&self, container: &Value, key: &Key) -> EResult<Value> {
        let result: EResult<Value> = match container {
            Value::List(items) => {
                key.as_index()
                    .and_then(|i| usize::try_from(i).ok())
                    .and_then(|i| items.get(i).cloned())
                    .ok_or_else(|| {
                        ErrorKind::IndexOutOfBounds {
                            index: key.as_index().unwrap_or(-1),
                            length: items.len(),
                        }
                        .into()
                    })
            },
            _ => {
                let (_, id) = container.expect_container()?;
                trace!(object = id.index(), %key, "reading member");
                self.get_member(id, key)
            },
        };
        result.map_err(|err| err.at(Accessor::Member(key.clone())))
    }

    pub(crate) fn get_member(&self, id: ObjId, key: &Key) -> EResult<Value> {
        match &*self.heap.get(id) {
            Object::Source(source) => self.source_member(source, key),
            Object::Delegate(delegate) => {
                if let Some(key_type) = delegate.cast.key_type() {
                    self.check_key(delegate.source, key, key_type)?;
                }
                let value = self.get_member(delegate.source, key)?;
                self.cast(value, delegate.cast.element_type())
            },
        }
    }

    fn source_member(
        &self,
        source: &SourceContainer,
        key: &Key,
    ) -> EResult<Value> {
        if let Some(entry) = source.entries.get(key) {
            return entry.thunk.force(self);
        }

        match source.kind {
            ContainerKind::Listing => {
                let index = key.as_index().ok_or_else(|| {
                    ErrorKind::TypeMismatch {
                        expected: "Int index".to_string(),
                        actual: key.to_string(),
                    }
                })?;
                let inherited = source
                    .parent
                    .map_or(0, |parent| self.object_length(parent));
                let length = inherited + source.elements.len();
                let Some(index) = usize::try_from(index)
                    .ok()
                    .filter(|i| *i < length)
                else {
                    return Err(ErrorKind::IndexOutOfBounds { index, length }.into());
                };

                match source.parent {
                    Some(parent) if index < inherited => {
                        self.get_member(parent, key)
                    },
                    _ => source.elements[index - inherited].force(self),
                }
            },
            ContainerKind::Mapping => {
                match source.parent {
                    Some(parent) => self.get_member(parent, key),
                    None => Err(ErrorKind::MissingKey(key.to_string()).into()),
                }
            },
        }
    }

    /// Keys are already forced, so checking one is cheap; it happens
    /// before the value is touched.
    fn check_key(&self, source: ObjId, key: &Key, key_type: &Type) -> EResult<()> {
        let key_value = match key.to_value() {
            Some(value) => value,
            None => {
                match self.object_keys(source).get(key) {
                    Some(value) => value.clone(),
                    None => return Ok(()),
                }
            },
        };
        self.cast(key_value, key_type).map(|_| ())
    }
}

/*****************************\
|* Building objects          *|
\*****************************/
impl Evaluator {
    /// `new Listing { ... }` / `new Mapping { ... }` with no parent.
    pub fn new_object(
        &self,
        kind: ContainerKind,
        body: &ObjectBody,
    ) -> EResult<Value> {
        self.build_source(kind, None, body, EvalContext::default())
    }

    /// `(parent) { ... }`. The result's members fall back to `parent`;
    /// its own members are stored as plain thunks, outside any cast the
    /// parent carries.
    pub fn amend(&self, parent: &Value, body: &ObjectBody) -> EResult<Value> {
        self.amend_in(parent, body, EvalContext::default())
    }

    pub(crate) fn amend_in(
        &self,
        parent: &Value,
        body: &ObjectBody,
        context: EvalContext,
    ) -> EResult<Value> {
        let (kind, id) = parent.expect_container()?;
        self.build_source(kind, Some(id), body, context)
    }

    /// `new T { ... }`: build the source, then cast it to `T` so the
    /// declared element types become its effective cast.
    pub(crate) fn instantiate(
        &self,
        ty: &Type,
        body: &ObjectBody,
        context: EvalContext,
    ) -> EResult<Value> {
        let Some(kind) = ty.base().and_then(|base| base.container_kind()) else {
            return Err(ErrorKind::InvalidBody(format!("cannot instantiate {ty}")).into());
        };
        let source = self.build_source(kind, None, body, context)?;
        self.cast(source, ty)
    }

    fn build_source(
        &self,
        kind: ContainerKind,
        parent: Option<ObjId>,
        body: &ObjectBody,
        context: EvalContext,
    ) -> EResult<Value> {
        if kind == ContainerKind::Mapping && !body.elements.is_empty() {
            return Err(ErrorKind::InvalidBody(
                "a Mapping cannot contain elements".to_string(),
            )
            .into());
        }

        let member_context = EvalContext {
            super_target: parent,
        };
        let elements = body
            .elements
            .iter()
            .map(|expr| Thunk::new(expr.clone(), member_context))
            .collect();

        let inherited = match (kind, parent) {
            (ContainerKind::Listing, Some(parent)) => self.object_length(parent),
            _ => 0,
        };

        let mut entries = IndexMap::new();
        for (key_expr, value_expr) in &body.entries {
            let (key, key_value) = self.eval_key(key_expr, context)?;

            if kind == ContainerKind::Listing {
                self.check_override(&key, inherited)
                    .map_err(|err| err.at(Accessor::Member(key.clone())))?;
            }
            if entries.contains_key(&key) {
                return Err(ErrorKind::DuplicateKey(key.to_string()).into());
            }

            let thunk = Thunk::new(value_expr.clone(), member_context);
            entries.insert(
                key,
                Entry {
                    key: key_value,
                    thunk,
                },
            );
        }

        let id = self.heap.alloc(Object::Source(SourceContainer {
            kind,
            parent,
            elements,
            entries,
        }));
        debug!(
            object = id.index(),
            %kind,
            parent = ?parent.map(|p| p.index()),
            "built container"
        );
        Ok(Value::container(kind, id))
    }

    /// A listing entry may only replace an element it inherits.
    fn check_override(&self, key: &Key, inherited: usize) -> EResult<()> {
        let Some(index) = key.as_index() else {
            return Err(ErrorKind::TypeMismatch {
                expected: "Int index".to_string(),
                actual: key.to_string(),
            }
            .into());
        };
        if usize::try_from(index).map_or(true, |i| i >= inherited) {
            return Err(ErrorKind::IndexOutOfBounds {
                index,
                length: inherited,
            }
            .into());
        }
        Ok(())
    }
}
