use std::fmt::{Display, Formatter};

use itertools::Itertools;

use super::values::{ContainerKind, Shape, Value};

/// The named types a descriptor can be built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Base {
    Boolean,
    Int,
    Float,
    Number,
    String,
    Null,
    Listing,
    Mapping,
    List,
    Pair,
}

impl Base {
    /// Outer-shape check only; never looks inside a container.
    pub fn admits(&self, value: &Value) -> bool {
        match self {
            Base::Boolean => matches!(value, Value::Bool(_)),
            Base::Int => matches!(value, Value::Int(_)),
            Base::Float => matches!(value, Value::Float(_)),
            Base::Number => matches!(value, Value::Int(_) | Value::Float(_)),
            Base::String => matches!(value, Value::Str(_)),
            Base::Null => matches!(value, Value::Null),
            Base::Listing => matches!(value, Value::Listing(_)),
            Base::Mapping => matches!(value, Value::Mapping(_)),
            Base::List => matches!(value, Value::List(_)),
            Base::Pair => matches!(value, Value::Pair(_)),
        }
    }

    pub fn container_kind(&self) -> Option<ContainerKind> {
        match self {
            Base::Listing => Some(ContainerKind::Listing),
            Base::Mapping => Some(ContainerKind::Mapping),
            _ => None,
        }
    }
}

impl Display for Base {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Base::Boolean => "Boolean",
            Base::Int => "Int",
            Base::Float => "Float",
            Base::Number => "Number",
            Base::String => "String",
            Base::Null => "Null",
            Base::Listing => "Listing",
            Base::Mapping => "Mapping",
            Base::List => "List",
            Base::Pair => "Pair",
        };
        write!(f, "{name}")
    }
}

/// A type descriptor, as written after `as`, `is`, or a declared binding.
///
/// Derived equality is structural and is what the cast engine uses to
/// skip re-wrapping a container that already carries the same cast.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Type {
    /// `unknown` / `Any`
    Any,
    Simple(Base),
    Parameterized(Base, Vec<Type>),
    Union(Vec<Type>),
}

/// How the cast engine treats a descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeClass {
    Trivial,
    Parameterized,
    Union,
}

impl Type {
    pub fn listing(element: Type) -> Self {
        Type::Parameterized(Base::Listing, vec![element])
    }

    pub fn mapping(key: Type, value: Type) -> Self {
        Type::Parameterized(Base::Mapping, vec![key, value])
    }

    pub fn list(element: Type) -> Self {
        Type::Parameterized(Base::List, vec![element])
    }

    pub fn pair(first: Type, second: Type) -> Self {
        Type::Parameterized(Base::Pair, vec![first, second])
    }

    /// Build a union, flattening nested unions and dropping repeats.
    /// A single remaining branch is returned as-is.
    pub fn union(branches: Vec<Type>) -> Self {
        let mut flat: Vec<Type> = Vec::new();
        for branch in branches {
            let nested = match branch {
                Type::Union(inner) => inner,
                other => vec![other],
            };
            for ty in nested {
                if !flat.contains(&ty) {
                    flat.push(ty);
                }
            }
        }

        if flat.len() == 1 {
            flat.remove(0)
        } else {
            Type::Union(flat)
        }
    }

    /// `T?`
    pub fn nullable(inner: Type) -> Self {
        Type::union(vec![inner, Type::Simple(Base::Null)])
    }

    pub fn classify(&self) -> TypeClass {
        match self {
            Type::Any | Type::Simple(_) => TypeClass::Trivial,
            Type::Parameterized(_, args) => {
                if args.iter().all(|arg| *arg == Type::Any) {
                    TypeClass::Trivial
                } else {
                    TypeClass::Parameterized
                }
            },
            Type::Union(_) => TypeClass::Union,
        }
    }

    pub fn is_trivial(&self) -> bool {
        self.classify() == TypeClass::Trivial
    }

    pub fn base(&self) -> Option<Base> {
        match self {
            Type::Simple(base) | Type::Parameterized(base, _) => Some(*base),
            _ => None,
        }
    }

    /// Could a value of this outer shape satisfy this type at all?
    pub fn admits_shape(&self, shape: Shape) -> bool {
        match self {
            Type::Any => true,
            Type::Union(branches) => {
                branches
                    .iter()
                    .any(|branch| branch.admits_shape(shape))
            },
            Type::Simple(base) | Type::Parameterized(base, _) => {
                match shape {
                    Shape::Container(kind) => {
                        base.container_kind() == Some(kind)
                    },
                    Shape::Other => base.container_kind().is_none(),
                }
            },
        }
    }

    /// Type of the member stored under any key: `T` for `Listing<T>`,
    /// `V` for `Mapping<K, V>`.
    pub fn element_type(&self) -> &Type {
        match self {
            Type::Parameterized(Base::Listing, args) => {
                args.first().unwrap_or(&Type::Any)
            },
            Type::Parameterized(Base::Mapping, args) => {
                args.get(1).unwrap_or(&Type::Any)
            },
            _ => &Type::Any,
        }
    }

    /// `K` for `Mapping<K, V>`.
    pub fn key_type(&self) -> Option<&Type> {
        match self {
            Type::Parameterized(Base::Mapping, args) => {
                args.first().filter(|k| **k != Type::Any)
            },
            _ => None,
        }
    }
}

impl Display for Type {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Type::Any => write!(f, "unknown"),
            Type::Simple(base) => base.fmt(f),
            Type::Parameterized(base, args) => {
                write!(f, "{base}<{}>", args.iter().join(", "))
            },
            Type::Union(branches) => write!(f, "{}", branches.iter().join("|")),
        }
    }
}

impl From<Base> for Type {
    fn from(base: Base) -> Self {
        Type::Simple(base)
    }
}
