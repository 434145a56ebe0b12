use std::cell::RefCell;
use std::rc::Rc;

use indexmap::IndexMap;

use crate::ast::{EResult, ErrorKind};
use crate::thunk::Thunk;

/// Module-level bindings. Each name maps to a thunk, so a binding is only
/// evaluated (and type-checked) the first time it is read.
#[derive(Debug, Clone, Default)]
pub struct Scope(Rc<InnerScope>);

/// The actual scope data
#[derive(Debug, Default)]
struct InnerScope {
    symbols: RefCell<IndexMap<String, Rc<Thunk>>>,
}

impl Scope {
    pub fn new() -> Self {
        Scope::default()
    }

    pub fn set(&self, key: &str, val: Rc<Thunk>) {
        self.0
            .symbols
            .borrow_mut()
            .insert(key.to_string(), val);
    }

    pub fn lookup(&self, symbol: &str) -> Option<Rc<Thunk>> {
        self.0
            .symbols
            .borrow()
            .get(symbol)
            .cloned()
    }

    /// Names in definition order
    pub fn names(&self) -> Vec<String> {
        self.0
            .symbols
            .borrow()
            .keys()
            .cloned()
            .collect()
    }

    /***********\
    |* Helpers *|
    \***********/
    pub fn lookup_or_error(&self, symbol: &str) -> EResult<Rc<Thunk>> {
        self.lookup(symbol)
            .ok_or_else(|| ErrorKind::UnboundName(symbol.to_string()).into())
    }
}
