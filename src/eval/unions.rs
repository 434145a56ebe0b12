use crate::ast::{Shape, Type};

/// How a cast to a union treats a container value.
#[derive(Debug, Clone, PartialEq)]
pub enum UnionPolicy<'t> {
    /// Several alternatives share the value's shape; only a full check can
    /// tell them apart, so the cast forces everything up front.
    Eager(Vec<&'t Type>),
    /// Exactly one alternative has the value's shape; cast to it lazily.
    Lazy(&'t Type),
    /// The value is not a lazy container; the plain cast path decides.
    Unrelated,
    /// No alternative has the value's shape.
    NoMatch,
}

/// Pick the cast policy for a value of `shape` against a union's
/// `branches`, given in declaration order.
pub fn resolve_union(branches: &[Type], shape: Shape) -> UnionPolicy<'_> {
    if shape == Shape::Other {
        return UnionPolicy::Unrelated;
    }

    let matching: Vec<&Type> = branches
        .iter()
        .filter(|branch| branch.admits_shape(shape))
        .collect();

    match matching.len() {
        0 => UnionPolicy::NoMatch,
        1 => UnionPolicy::Lazy(matching[0]),
        _ => UnionPolicy::Eager(matching),
    }
}
