//! A small object graph to poke at from the REPL.

use crate::ast::{Base, Expr, ObjectBody, Type};
use crate::Evaluator;

/// Defines `facts`, `L0` through `L3`, `mixed`, `either` and `typed`.
pub fn load(evaluator: &Evaluator) {
    let listing = Type::Simple(Base::Listing);
    let bools = Type::listing(Base::Boolean.into());
    let ints = Type::listing(Base::Int.into());

    // one bad member must not spoil its siblings
    evaluator.define(
        "facts",
        Some(Type::mapping(Base::String.into(), bools)),
        Expr::New(
            Type::Simple(Base::Mapping),
            ObjectBody::default()
                .with_entry(
                    Expr::string("bad"),
                    Expr::New(
                        listing.clone(),
                        ObjectBody::elements([Expr::throw("uh oh")]),
                    ),
                )
                .with_entry(
                    Expr::string("good"),
                    Expr::New(
                        listing.clone(),
                        ObjectBody::elements([Expr::equals(
                            Expr::plus(Expr::int(1), Expr::int(1)),
                            Expr::int(2),
                        )]),
                    ),
                ),
        ),
    );

    evaluator.define(
        "L0",
        None,
        Expr::New(
            listing,
            ObjectBody::elements([Expr::int(1), Expr::int(2), Expr::int(3)]),
        ),
    );
    evaluator.define(
        "L1",
        None,
        Expr::amend(
            Expr::var("L0"),
            ObjectBody::elements([Expr::super_index(Expr::int(0))]),
        ),
    );
    evaluator.define("L2", Some(ints.clone()), Expr::var("L1"));
    // own members of an amend of a cast view are not checked by that cast
    evaluator.define(
        "L3",
        None,
        Expr::amend(Expr::var("L2"), ObjectBody::elements([Expr::string("x")])),
    );

    evaluator.define(
        "mixed",
        Some(Type::union(vec![ints.clone(), Base::Int.into()])),
        Expr::New(
            Type::Simple(Base::Listing),
            ObjectBody::elements([Expr::int(1), Expr::string("x")]),
        ),
    );
    // two listing alternatives: checked in full when first read
    evaluator.define(
        "either",
        Some(Type::union(vec![
            Type::listing(Base::String.into()),
            ints.clone(),
        ])),
        Expr::New(
            Type::Simple(Base::Listing),
            ObjectBody::elements([Expr::int(1), Expr::int(2)]),
        ),
    );
    evaluator.define(
        "typed",
        None,
        Expr::New(ints, ObjectBody::elements([Expr::int(1), Expr::int(2)])),
    );
}

