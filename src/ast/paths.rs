use std::collections::VecDeque;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use itertools::Itertools;
use lazy_static::lazy_static;
use litrs::Literal;
use regex::Regex;
use thiserror::Error;

use super::values::Key;

/// One step of an access path: the binding a walk starts from, or a
/// subscript into a container.
#[derive(Debug, Clone, PartialEq)]
pub enum Accessor {
    Binding(String),
    Member(Key),
}

impl Display for Accessor {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Accessor::Binding(name) => write!(f, "{name}"),
            Accessor::Member(key) => write!(f, "[{key}]"),
        }
    }
}

/// Where a value (or a failure) lives, e.g. `facts["bad"][0]`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AccessPath(VecDeque<Accessor>);

impl AccessPath {
    pub fn binding(name: &str) -> Self {
        AccessPath(VecDeque::from([Accessor::Binding(name.to_string())]))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Accessor> {
        self.0.iter()
    }

    pub fn push_front(&mut self, accessor: Accessor) {
        self.0.push_front(accessor);
    }

    pub fn push(&mut self, accessor: Accessor) {
        self.0.push_back(accessor);
    }

    pub fn prepend(&mut self, prefix: &AccessPath) {
        for accessor in prefix.0.iter().rev() {
            self.0.push_front(accessor.clone());
        }
    }

    /// A copy of this path extended by one member subscript.
    pub fn member(&self, key: Key) -> Self {
        let mut path = self.clone();
        path.push(Accessor::Member(key));
        path
    }
}

impl Display for AccessPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.iter().join(""))
    }
}

impl From<Vec<Accessor>> for AccessPath {
    fn from(accessors: Vec<Accessor>) -> Self {
        AccessPath(accessors.into())
    }
}

/*******************\
|* Parsing paths   *|
\*******************/
#[derive(Error, Debug)]
pub enum PathError {
    #[error("'{0}' is not an access path (expected `name[key][key]...`)")]
    Malformed(String),

    #[error("unsupported key literal '{0}'")]
    UnsupportedKey(String),

    #[error("invalid key literal: {0}")]
    Literal(#[from] litrs::ParseError),
}

lazy_static! {
    static ref PATH_RE: Regex = Regex::new(
        r"^\s*([A-Za-z_][A-Za-z0-9_]*)((?:\s*\[[^\]]*\])*)\s*$"
    )
    .unwrap();
    static ref MEMBER_RE: Regex = Regex::new(r"\[([^\]]*)\]").unwrap();
}

impl FromStr for AccessPath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let caps = PATH_RE
            .captures(s)
            .ok_or_else(|| PathError::Malformed(s.to_string()))?;

        let mut path = AccessPath::binding(&caps[1]);
        for member in MEMBER_RE.captures_iter(&caps[2]) {
            path.push(Accessor::Member(parse_key(&member[1])?));
        }
        Ok(path)
    }
}

/// Parse a subscript the way rust parses a literal, except that
/// single-quoted strings are treated like double-quoted ones.
fn parse_key(raw: &str) -> Result<Key, PathError> {
    let raw = raw.trim();
    let text = match raw.strip_prefix('\'').and_then(|s| s.strip_suffix('\'')) {
        Some(inner) => format!("\"{inner}\""),
        None => raw.to_string(),
    };

    let lit = Literal::parse(text.as_str())?;
    if !lit.suffix().is_empty() {
        return Err(PathError::UnsupportedKey(raw.to_string()));
    }

    match lit {
        Literal::Integer(int) => {
            int.value::<u64>()
                .and_then(|n| isize::try_from(n).ok())
                .map(Key::Int)
                .ok_or_else(|| PathError::UnsupportedKey(raw.to_string()))
        },
        Literal::Float(float) => {
            float
                .number_part()
                .parse::<f64>()
                .map(Key::float)
                .map_err(|_| PathError::UnsupportedKey(raw.to_string()))
        },
        Literal::Bool(b) => Ok(Key::Bool(b.value())),
        Literal::String(s) => Ok(Key::Str(s.value().to_string())),
        _ => Err(PathError::UnsupportedKey(raw.to_string())),
    }
}
