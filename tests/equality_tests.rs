mod common;

use common::*;
use lazy_cast::ast::{Base, Expr, Value};
use lazy_cast::Evaluator;

fn one_two_three() -> Expr {
    listing([Expr::int(1), Expr::int(2), Expr::int(3)])
}

#[test]
fn test_cast_view_equals_its_source() {
    let ev = Evaluator::new();
    let c = eval(&ev, one_two_three());
    let d = ev.cast(c.clone(), &ints()).unwrap();

    assert!(ev.values_equal(&c, &d).unwrap());
    assert!(ev.values_equal(&d, &c).unwrap());
    assert_eq!(ev.hash_value(&c).unwrap(), ev.hash_value(&d).unwrap());
}

#[test]
fn test_structural_equality() {
    let ev = Evaluator::new();
    let a = eval(&ev, one_two_three());
    let b = eval(&ev, one_two_three());
    let shorter = eval(&ev, listing([Expr::int(1), Expr::int(2)]));
    let different = eval(
        &ev,
        listing([Expr::int(1), Expr::int(2), Expr::int(4)]),
    );

    assert!(ev.values_equal(&a, &b).unwrap());
    assert_eq!(ev.hash_value(&a).unwrap(), ev.hash_value(&b).unwrap());
    assert!(!ev.values_equal(&a, &shorter).unwrap());
    assert!(!ev.values_equal(&a, &different).unwrap());
}

#[test]
fn test_amended_listing_equals_equivalent_literal() {
    let ev = samples();
    let l1 = ev.lookup("L1").unwrap();
    let l2 = ev.lookup("L2").unwrap();
    let literal = eval(
        &ev,
        listing([Expr::int(1), Expr::int(2), Expr::int(3), Expr::int(1)]),
    );

    assert!(ev.values_equal(&l1, &literal).unwrap());
    assert!(ev.values_equal(&l2, &literal).unwrap());
    assert_eq!(ev.hash_value(&l2).unwrap(), ev.hash_value(&literal).unwrap());
}

#[test]
fn test_one_sided_failure_is_inequality() {
    let ev = Evaluator::new();
    let broken = eval(&ev, listing([Expr::int(1), Expr::throw("boom")]));
    let fine = eval(&ev, listing([Expr::int(1), Expr::int(2)]));
    assert!(!ev.values_equal(&broken, &fine).unwrap());
}

#[test]
fn test_first_difference_short_circuits() {
    let ev = Evaluator::new();
    let a = eval(&ev, listing([Expr::int(1), Expr::throw("a")]));
    let b = eval(&ev, listing([Expr::int(2), Expr::throw("b")]));
    assert!(!ev.values_equal(&a, &b).unwrap());
}

#[test]
fn test_failure_on_both_sides_propagates() {
    let ev = Evaluator::new();
    let a = eval(&ev, listing([Expr::throw("a")]));
    let b = eval(&ev, listing([Expr::throw("b")]));
    let err = ev.values_equal(&a, &b).unwrap_err();
    assert_eq!(err.path.to_string(), "[0]");
}

#[test]
fn test_cycles_propagate_through_equality() {
    let ev = Evaluator::new();
    ev.define(
        "c",
        None,
        listing([Expr::index(Expr::var("c"), Expr::int(0))]),
    );
    let c = ev.lookup("c").unwrap();
    let other = eval(&ev, listing([Expr::int(1)]));
    assert!(ev.values_equal(&c, &other).unwrap_err().is_cyclic());
}

#[test]
fn test_mapping_equality_ignores_order() {
    let ev = Evaluator::new();
    let a = eval(
        &ev,
        mapping([
            (Expr::string("x"), Expr::int(1)),
            (Expr::string("y"), Expr::int(2)),
        ]),
    );
    let b = eval(
        &ev,
        mapping([
            (Expr::string("y"), Expr::int(2)),
            (Expr::string("x"), Expr::int(1)),
        ]),
    );
    let c = eval(&ev, mapping([(Expr::string("x"), Expr::int(1))]));

    assert!(ev.values_equal(&a, &b).unwrap());
    assert_eq!(ev.hash_value(&a).unwrap(), ev.hash_value(&b).unwrap());
    assert!(!ev.values_equal(&a, &c).unwrap());
}

#[test]
fn test_hash_ignores_casts_but_deep_force_does_not() {
    let ev = samples();
    let mixed = ev.lookup("mixed").unwrap();

    assert!(ev.hash_value(&mixed).is_ok());
    let err = ev.deep_force(&mixed).unwrap_err();
    assert!(err.is_type_mismatch());
    assert_eq!(err.path.to_string(), "[1]");
}

#[test]
fn test_equality_operator() {
    let ev = Evaluator::new();
    let sum = Expr::plus(Expr::int(1), Expr::int(1));
    assert_eq!(
        eval(&ev, Expr::equals(sum, Expr::int(2))),
        Value::Bool(true)
    );

    ev.define("xs", None, one_two_three());
    ev.define("ys", Some(listing_of(Base::Number)), one_two_three());
    assert_eq!(
        eval(&ev, Expr::equals(Expr::var("xs"), Expr::var("ys"))),
        Value::Bool(true)
    );
    assert_eq!(
        eval(&ev, Expr::equals(Expr::int(1), Expr::string("1"))),
        Value::Bool(false)
    );
}
