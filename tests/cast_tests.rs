mod common;

use std::rc::Rc;

use common::*;
use lazy_cast::ast::{Base, ErrorKind, Expr, ObjectBody, Shape, Type, Value};
use lazy_cast::{resolve_union, Evaluator, UnionPolicy};

//*** LAZINESS ***//
#[test]
fn test_length_never_forces_members() {
    let ev = Evaluator::new();
    let c = eval(&ev, listing([Expr::throw("a"), Expr::throw("b")]));
    let d = ev.cast(c.clone(), &ints()).unwrap();

    assert_eq!(ev.length(&d).unwrap(), 2);
    assert!(none_forced(&ev, &c));

    let err = ev.get_key(&d, &idx(0)).unwrap_err();
    assert_eq!(err.kind, ErrorKind::Thrown("a".to_string()));
}

#[test]
fn test_cast_does_not_force() {
    let ev = Evaluator::new();
    let c = eval(&ev, listing([Expr::int(1), Expr::string("x")]));
    let d = ev.cast(c.clone(), &ints()).unwrap();

    assert!(none_forced(&ev, &c));
    assert_ne!(c, d);
    assert_eq!(ev.effective_type(&d).unwrap(), ints());
}

#[test]
fn test_cast_commutes_with_indexing() {
    let ev = Evaluator::new();
    let c = eval(
        &ev,
        listing([Expr::int(1), Expr::string("x"), Expr::throw("boom")]),
    );
    let d = ev.cast(c.clone(), &ints()).unwrap();

    for i in 0..3 {
        let through_view = ev.get_key(&d, &idx(i));
        let by_hand = ev
            .get_key(&c, &idx(i))
            .and_then(|v| ev.cast(v, &Base::Int.into()));
        match (through_view, by_hand) {
            (Ok(a), Ok(b)) => assert_eq!(a, b),
            (Err(a), Err(b)) => assert_eq!(a.kind, b.kind),
            (a, b) => panic!("index {i}: {a:?} vs {b:?}"),
        }
    }
}

#[test]
fn test_member_errors_carry_their_index() {
    let ev = Evaluator::new();
    let c = eval(&ev, listing([Expr::int(1), Expr::string("x")]));
    let d = ev.cast(c, &ints()).unwrap();

    let err = ev.get_key(&d, &idx(1)).unwrap_err();
    assert!(err.is_type_mismatch());
    assert!(err.is_local());
    assert_eq!(err.path.to_string(), "[1]");

    // the sibling is unaffected
    assert_eq!(ev.get_key(&d, &idx(0)).unwrap(), Value::Int(1));
}

//*** IDENTITY ***//
#[test]
fn test_trivial_cast_is_identity() {
    let ev = Evaluator::new();
    let c = eval(&ev, listing([Expr::int(1)]));
    let objects = ev.heap().len();

    assert_eq!(ev.cast(c.clone(), &Type::Any).unwrap(), c);
    assert_eq!(ev.cast(c.clone(), &Base::Listing.into()).unwrap(), c);
    assert_eq!(ev.cast(c.clone(), &Type::listing(Type::Any)).unwrap(), c);
    assert_eq!(ev.heap().len(), objects);
}

#[test]
fn test_recast_to_same_type_is_identity() {
    let ev = Evaluator::new();
    let c = eval(&ev, listing([Expr::int(1)]));
    let d = ev.cast(c, &ints()).unwrap();
    let objects = ev.heap().len();

    assert_eq!(ev.cast(d.clone(), &ints()).unwrap(), d);
    assert_eq!(ev.heap().len(), objects);
}

#[test]
fn test_new_with_declared_type_needs_no_recast() {
    let ev = Evaluator::new();
    let typed = eval(
        &ev,
        Expr::New(ints(), ObjectBody::elements([Expr::int(1), Expr::int(2)])),
    );
    assert_eq!(ev.effective_type(&typed).unwrap(), ints());
    assert_eq!(ev.cast(typed.clone(), &ints()).unwrap(), typed);
}

#[test]
fn test_new_with_declared_type_checks_lazily() {
    let ev = Evaluator::new();
    let typed = eval(
        &ev,
        Expr::New(
            ints(),
            ObjectBody::elements([Expr::int(1), Expr::string("x")]),
        ),
    );
    assert_eq!(ev.get_key(&typed, &idx(0)).unwrap(), Value::Int(1));
    assert!(ev.get_key(&typed, &idx(1)).unwrap_err().is_type_mismatch());
}

#[test]
fn test_stacked_casts_apply_both() {
    let ev = Evaluator::new();
    let c = eval(&ev, listing([Expr::int(1), Expr::string("x")]));
    let numbers = ev.cast(c, &listing_of(Base::Number)).unwrap();
    let ints_view = ev.cast(numbers.clone(), &ints()).unwrap();

    assert_ne!(numbers, ints_view);
    assert_eq!(ev.get_key(&ints_view, &idx(0)).unwrap(), Value::Int(1));
    assert!(ev.get_key(&ints_view, &idx(1)).unwrap_err().is_type_mismatch());
}

#[test]
fn test_wrong_container_kind_fails_at_cast() {
    let ev = Evaluator::new();
    let c = eval(&ev, listing([Expr::int(1)]));
    let err = ev
        .cast(c, &Type::mapping(Base::String.into(), Base::Int.into()))
        .unwrap_err();
    assert!(err.is_type_mismatch());
}

//*** UNIONS ***//
#[test]
fn test_resolve_union_policies() {
    let ints = ints();
    let strings = listing_of(Base::String);
    let listing = Shape::Container(lazy_cast::ast::ContainerKind::Listing);

    let lazy = [ints.clone(), Base::Int.into()];
    assert_eq!(resolve_union(&lazy, listing), UnionPolicy::Lazy(&ints));

    let eager = [strings.clone(), ints.clone()];
    assert_eq!(
        resolve_union(&eager, listing),
        UnionPolicy::Eager(vec![&strings, &ints])
    );

    assert_eq!(resolve_union(&eager, Shape::Other), UnionPolicy::Unrelated);

    let scalars = [Base::Int.into(), Base::String.into()];
    assert_eq!(resolve_union(&scalars, listing), UnionPolicy::NoMatch);
}

#[test]
fn test_single_shape_union_stays_lazy() {
    let ev = Evaluator::new();
    let c = eval(&ev, listing([Expr::int(1), Expr::throw("later")]));
    let target = Type::union(vec![ints(), Base::Int.into()]);
    let d = ev.cast(c.clone(), &target).unwrap();

    assert!(none_forced(&ev, &c));
    assert_eq!(ev.effective_type(&d).unwrap(), ints());
    assert_eq!(ev.get_key(&d, &idx(0)).unwrap(), Value::Int(1));
    assert_eq!(
        ev.get_key(&d, &idx(1)).unwrap_err().kind,
        ErrorKind::Thrown("later".to_string())
    );
}

#[test]
fn test_ambiguous_union_forces_everything() {
    let ev = Evaluator::new();
    let c = eval(&ev, listing([Expr::int(1), Expr::int(2)]));
    let target = Type::union(vec![listing_of(Base::String), ints()]);
    let d = ev.cast(c.clone(), &target).unwrap();

    assert!(all_forced(&ev, &c));
    assert_eq!(ev.effective_type(&d).unwrap(), ints());
}

#[test]
fn test_ambiguous_union_fails_at_cast_time() {
    let ev = Evaluator::new();
    let c = eval(&ev, listing([Expr::int(1), Expr::string("x")]));
    let target = Type::union(vec![listing_of(Base::String), ints()]);
    let err = ev.cast(c, &target).unwrap_err();

    assert!(matches!(err.kind, ErrorKind::AmbiguousUnionMismatch { .. }));
    assert!(!err.is_local());
}

#[test]
fn test_ambiguous_union_propagates_member_failure() {
    let ev = Evaluator::new();
    let c = eval(&ev, listing([Expr::int(1), Expr::throw("boom")]));
    let target = Type::union(vec![listing_of(Base::String), ints()]);
    let err = ev.cast(c, &target).unwrap_err();

    assert_eq!(err.kind, ErrorKind::Thrown("boom".to_string()));
    assert_eq!(err.path.to_string(), "[1]");
}

#[test]
fn test_ambiguous_union_over_failing_view_is_scoped_to_the_cast() {
    let ev = Evaluator::new();
    let c = eval(&ev, listing([Expr::int(1), Expr::string("x")]));
    let view = ev.cast(c, &ints()).unwrap();
    let target = Type::union(vec![listing_of(Base::String), ints()]);
    let err = ev.cast(view, &target).unwrap_err();

    assert!(matches!(err.kind, ErrorKind::AmbiguousUnionMismatch { .. }));
    assert!(!err.is_local());
    assert!(err.path.is_empty());
}

#[test]
fn test_union_without_container_branch_fails() {
    let ev = Evaluator::new();
    let c = eval(&ev, listing([Expr::int(1)]));
    let target = Type::union(vec![Base::Int.into(), Base::String.into()]);
    assert!(ev.cast(c, &target).unwrap_err().is_type_mismatch());
}

#[test]
fn test_sample_unions() {
    let ev = samples();
    let mixed = ev.lookup("mixed").unwrap();
    assert_eq!(ev.get_key(&mixed, &idx(0)).unwrap(), Value::Int(1));
    assert!(ev.get_key(&mixed, &idx(1)).unwrap_err().is_type_mismatch());

    let either = ev.lookup("either").unwrap();
    assert_eq!(ev.effective_type(&either).unwrap(), ints());
}

//*** EAGER AND PLAIN CASTS ***//
#[test]
fn test_list_cast_is_eager() {
    let ev = Evaluator::new();
    let good = Value::list(vec![Value::Int(1), Value::Int(2)]);
    let cast = ev.cast(good.clone(), &Type::list(Base::Int.into())).unwrap();
    match (&good, &cast) {
        (Value::List(a), Value::List(b)) => assert!(Rc::ptr_eq(a, b)),
        _ => panic!("expected lists"),
    }

    let bad = Value::list(vec![Value::Int(1), Value::from("x")]);
    let err = ev.cast(bad, &Type::list(Base::Int.into())).unwrap_err();
    assert!(err.is_type_mismatch());
    assert_eq!(err.path.to_string(), "[1]");
}

#[test]
fn test_pair_cast_checks_both_sides() {
    let ev = Evaluator::new();
    let pair = Value::pair(Value::Int(1), Value::from("a"));
    let ok = Type::pair(Base::Int.into(), Base::String.into());
    let bad = Type::pair(Base::String.into(), Base::String.into());

    assert_eq!(ev.cast(pair.clone(), &ok).unwrap(), pair);
    assert!(ev.cast(pair, &bad).unwrap_err().is_type_mismatch());
}

#[test]
fn test_plain_casts() {
    let ev = Evaluator::new();
    assert_eq!(
        ev.cast(Value::Int(1), &Base::Number.into()).unwrap(),
        Value::Int(1)
    );
    assert!(ev
        .cast(Value::Int(1), &Base::String.into())
        .unwrap_err()
        .is_type_mismatch());
    assert_eq!(
        ev.cast(Value::Null, &Type::nullable(Base::String.into()))
            .unwrap(),
        Value::Null
    );
    let target = Type::union(vec![ints(), Base::Int.into()]);
    assert_eq!(ev.cast(Value::Int(3), &target).unwrap(), Value::Int(3));
}

#[test]
fn test_declared_type_is_applied_once() {
    let ev = Evaluator::new();
    ev.define("xs", Some(ints()), listing([Expr::int(1)]));
    let first = ev.lookup("xs").unwrap();
    let objects = ev.heap().len();
    let second = ev.lookup("xs").unwrap();

    assert_eq!(first, second);
    assert_eq!(ev.heap().len(), objects);
}

#[test]
fn test_nested_reads_reuse_their_view() {
    let ev = Evaluator::new();
    let m = eval(
        &ev,
        mapping([(Expr::string("a"), listing([Expr::int(1), Expr::int(2)]))]),
    );
    let target = Type::mapping(Base::String.into(), ints());
    let d = ev.cast(m, &target).unwrap();

    let first = ev.get_key(&d, &key("a")).unwrap();
    let objects = ev.heap().len();
    let second = ev.get_key(&d, &key("a")).unwrap();

    assert_eq!(first, second);
    assert_eq!(ev.heap().len(), objects);
    assert_eq!(ev.effective_type(&second).unwrap(), ints());
}

#[test]
fn test_same_cast_twice_is_one_view() {
    let ev = Evaluator::new();
    let c = eval(&ev, listing([Expr::int(1)]));
    let first = ev.cast(c.clone(), &ints()).unwrap();
    let second = ev.cast(c, &ints()).unwrap();
    assert_eq!(first, second);
}
