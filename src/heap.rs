use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use indexmap::IndexMap;

use crate::ast::{ContainerKind, Key, Type, Value};
use crate::thunk::Thunk;

/// Stable handle to a container in a [`Heap`].
///
/// Parent links and delegation sources are handles rather than owning
/// pointers, so amends chains never form reference cycles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjId(usize);

impl ObjId {
    pub fn index(&self) -> usize {
        self.0
    }
}

/// A mapping entry: the forced key as it was written, and its lazy value.
#[derive(Debug, Clone)]
pub struct Entry {
    pub key: Value,
    pub thunk: Rc<Thunk>,
}

/// A listing or mapping as built by `new` or by amending a parent.
///
/// Listings use `elements` for appended members and `entries` (keyed by
/// `Key::Int`) for overrides of inherited indices. Mappings only use
/// `entries`.
#[derive(Debug)]
pub struct SourceContainer {
    pub kind: ContainerKind,
    pub parent: Option<ObjId>,
    pub elements: Vec<Rc<Thunk>>,
    pub entries: IndexMap<Key, Entry>,
}

/// A view over `source` that casts every member read through it.
#[derive(Debug)]
pub struct DelegatingContainer {
    pub kind: ContainerKind,
    pub source: ObjId,
    pub cast: Type,
}

#[derive(Debug)]
pub enum Object {
    Source(SourceContainer),
    Delegate(DelegatingContainer),
}

impl Object {
    pub fn kind(&self) -> ContainerKind {
        match self {
            Object::Source(source) => source.kind,
            Object::Delegate(delegate) => delegate.kind,
        }
    }
}

/// Object table owned by one evaluator. Objects are immutable once
/// allocated; only the thunks inside them memoize.
///
/// Delegates are interned by source and cast, so reading the same member
/// through the same element type always yields the same view.
#[derive(Debug, Default)]
pub struct Heap {
    objects: RefCell<Vec<Rc<Object>>>,
    delegates: RefCell<HashMap<(ObjId, Type), ObjId>>,
}

impl Heap {
    pub fn alloc(&self, object: Object) -> ObjId {
        let mut objects = self.objects.borrow_mut();
        objects.push(Rc::new(object));
        ObjId(objects.len() - 1)
    }

    /// The delegating view of `source` under `cast`, allocated on first use.
    pub fn delegate(
        &self,
        kind: ContainerKind,
        source: ObjId,
        cast: &Type,
    ) -> ObjId {
        let interned = (source, cast.clone());
        if let Some(id) = self.delegates.borrow().get(&interned) {
            return *id;
        }
        let id = self.alloc(Object::Delegate(DelegatingContainer {
            kind,
            source,
            cast: cast.clone(),
        }));
        self.delegates.borrow_mut().insert(interned, id);
        id
    }

    /// Handles are only minted by `alloc`, so lookups cannot miss.
    pub fn get(&self, id: ObjId) -> Rc<Object> {
        self.objects.borrow()[id.0].clone()
    }

    pub fn len(&self) -> usize {
        self.objects.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
