use thiserror::Error;

use super::paths::{AccessPath, Accessor};

/// What went wrong. The location is tracked separately by [`EvalError`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ErrorKind {
    #[error("type mismatch: expected {expected}, got {actual}")]
    TypeMismatch { expected: String, actual: String },

    #[error(
        "value does not match any alternative of union `{expected}` \
         (checked eagerly, got {actual})"
    )]
    AmbiguousUnionMismatch { expected: String, actual: String },

    #[error("failed to evaluate mapping key `{key}`: {cause}")]
    KeyEvaluation { key: String, cause: Box<EvalError> },

    #[error("cyclic evaluation: member depends on its own value")]
    CyclicEvaluation,

    #[error("{0}")]
    Thrown(String),

    #[error("index {index} is out of bounds for length {length}")]
    IndexOutOfBounds { index: isize, length: usize },

    #[error("no entry for key {0}")]
    MissingKey(String),

    #[error("expected a Listing or Mapping, got {actual}")]
    NotAContainer { actual: String },

    #[error("`super` used outside of an amending object")]
    NoSuperObject,

    #[error("could not find binding '{0}'")]
    UnboundName(String),

    #[error("invalid operands for `{op}`: {lhs} and {rhs}")]
    InvalidOperands {
        op: &'static str,
        lhs: String,
        rhs: String,
    },

    #[error("integer overflow in `{0}`")]
    Overflow(&'static str),

    #[error("invalid object body: {0}")]
    InvalidBody(String),

    #[error("duplicate definition of key {0}")]
    DuplicateKey(String),
}

/// An evaluation failure, attributed to the member it was observed at.
///
/// `path` names the member that was read. When the failure was raised
/// while evaluating some other binding's member, `origin` names that one.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{kind}{}", location(.path, .origin))]
pub struct EvalError {
    pub kind: ErrorKind,
    pub path: AccessPath,
    pub origin: Option<AccessPath>,
}

fn location(path: &AccessPath, origin: &Option<AccessPath>) -> String {
    let at = if path.is_empty() {
        String::new()
    } else {
        format!(" (at {path})")
    };
    match origin {
        Some(origin) => format!("{at} (raised at {origin})"),
        None => at,
    }
}

impl EvalError {
    pub fn new(kind: ErrorKind) -> Self {
        EvalError {
            kind,
            path: AccessPath::default(),
            origin: None,
        }
    }

    /// Called where a member's own evaluation ends. The path walked inside
    /// it belongs to some other member, so it moves to `origin` (if it is
    /// rooted at a binding) and the caller attributes the error afresh.
    pub fn rerooted(mut self) -> Self {
        let inner = std::mem::take(&mut self.path);
        let rooted = matches!(inner.iter().next(), Some(Accessor::Binding(_)));
        if self.origin.is_none() && rooted {
            self.origin = Some(inner);
        }
        self
    }

    /// Attribute this error to `accessor`, one level further out.
    pub fn at(mut self, accessor: Accessor) -> Self {
        self.path.push_front(accessor);
        self
    }

    /// Attribute this error to a member reached through `prefix`.
    pub fn within(mut self, prefix: &AccessPath) -> Self {
        self.path.prepend(prefix);
        self
    }

    /// Local errors only concern the member or key that raised them;
    /// siblings stay readable.
    pub fn is_local(&self) -> bool {
        !matches!(
            self.kind,
            ErrorKind::AmbiguousUnionMismatch { .. } | ErrorKind::CyclicEvaluation
        )
    }

    pub fn is_cyclic(&self) -> bool {
        matches!(self.kind, ErrorKind::CyclicEvaluation)
    }

    pub fn is_type_mismatch(&self) -> bool {
        matches!(self.kind, ErrorKind::TypeMismatch { .. })
    }
}

impl From<ErrorKind> for EvalError {
    fn from(kind: ErrorKind) -> Self {
        EvalError::new(kind)
    }
}

pub type EResult<T> = Result<T, EvalError>;
