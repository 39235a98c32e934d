//! Cardinality encoding tests
//!
//! Mirrors the assignment-probing style of the constraint tests: a bound is
//! conjoined with a partial assignment forcing k variables true and m false,
//! and the combination is checked for satisfiability.

use fmsat::bool::{BoolValue, BooleanFactory, Options};
use fmsat::checker::SatChecker;
use fmsat::encode::CardinalityEncoder;

fn variables() -> Vec<String> {
    ["a", "b", "c", "d", "e"].map(String::from).to_vec()
}

/// Forces the first `selected` variables true and the next `deselected` false
fn assignment(
    factory: &BooleanFactory,
    vars: &[String],
    selected: usize,
    deselected: usize,
) -> BoolValue {
    assert!(selected + deselected <= vars.len());
    let mut parts = Vec::new();
    for var in &vars[..selected] {
        parts.push(factory.variable(var));
    }
    for var in &vars[selected..selected + deselected] {
        parts.push(factory.not(factory.variable(var)));
    }
    factory.and_multi(parts)
}

fn cardinality(
    factory: &BooleanFactory,
    vars: &[String],
    lower: usize,
    upper: usize,
) -> BoolValue {
    CardinalityEncoder::new(factory, vars.to_vec(), lower, upper, "t")
        .convert()
        .unwrap()
}

fn sat(factory: &BooleanFactory, formula: BoolValue) -> bool {
    SatChecker::check_once(factory, formula).unwrap()
}

#[test]
fn bounds_two_to_three_of_five() {
    let factory = BooleanFactory::new(Options::default());
    let vars = variables();
    let card = cardinality(&factory, &vars, 2, 3);

    // 2 selected, 3 deselected: within bounds
    let two = assignment(&factory, &vars, 2, 3);
    assert!(sat(&factory, factory.and(card, two)));

    // 3 selected: within bounds
    let three = assignment(&factory, &vars, 3, 1);
    assert!(sat(&factory, factory.and(card, three)));

    // 4 selected: above the upper bound
    let four = assignment(&factory, &vars, 4, 1);
    assert!(!sat(&factory, factory.and(card, four)));

    // 1 selected, 4 deselected: below the lower bound
    let one = assignment(&factory, &vars, 1, 4);
    assert!(!sat(&factory, factory.and(card, one)));
}

#[test]
fn bounds_one_to_four_of_five() {
    let factory = BooleanFactory::new(Options::default());
    let vars = variables();
    let card = cardinality(&factory, &vars, 1, 4);

    let one = assignment(&factory, &vars, 1, 4);
    assert!(sat(&factory, factory.and(card, one)));

    let three = assignment(&factory, &vars, 3, 0);
    assert!(sat(&factory, factory.and(card, three)));

    let five = assignment(&factory, &vars, 5, 0);
    assert!(!sat(&factory, factory.and(card, five)));

    let none = assignment(&factory, &vars, 0, 5);
    assert!(!sat(&factory, factory.and(card, none)));
}

#[test]
fn upper_zero_forces_all_false() {
    let factory = BooleanFactory::new(Options::default());
    let vars = variables();
    let card = cardinality(&factory, &vars, 0, 0);

    let none = assignment(&factory, &vars, 0, 5);
    assert!(sat(&factory, factory.and(card, none)));

    let one = assignment(&factory, &vars, 1, 0);
    assert!(!sat(&factory, factory.and(card, one)));
}

#[test]
fn full_range_allows_everything() {
    let factory = BooleanFactory::new(Options::default());
    let vars = variables();
    let card = cardinality(&factory, &vars, 0, 5);

    for selected in 0..=5 {
        let probe = assignment(&factory, &vars, selected, 5 - selected);
        assert!(
            sat(&factory, factory.and(card, probe)),
            "{selected} selected under [0,5]"
        );
    }
}

#[test]
fn lower_equals_count_forces_all_true() {
    let factory = BooleanFactory::new(Options::default());
    let vars = variables();
    let card = cardinality(&factory, &vars, 5, 5);

    let all = assignment(&factory, &vars, 5, 0);
    assert!(sat(&factory, factory.and(card, all)));

    let almost = assignment(&factory, &vars, 4, 1);
    assert!(!sat(&factory, factory.and(card, almost)));
}

#[test]
fn two_bounds_over_the_same_variables() {
    let factory = BooleanFactory::new(Options::default());
    let vars = variables();

    // [1,2] and [2,3] agree on exactly 2 selected.
    let loose = CardinalityEncoder::new(&factory, vars.clone(), 1, 2, "g0")
        .convert()
        .unwrap();
    let tight = CardinalityEncoder::new(&factory, vars.clone(), 2, 3, "g1")
        .convert()
        .unwrap();
    let both = factory.and(loose, tight);

    let two = assignment(&factory, &vars, 2, 3);
    assert!(sat(&factory, factory.and(both, two)));
    let one = assignment(&factory, &vars, 1, 4);
    assert!(!sat(&factory, factory.and(both, one)));

    // [0,1] and [2,3] share no count at all.
    let low = CardinalityEncoder::new(&factory, vars.clone(), 0, 1, "g2")
        .convert()
        .unwrap();
    let high = CardinalityEncoder::new(&factory, vars.clone(), 2, 3, "g3")
        .convert()
        .unwrap();
    assert!(!sat(&factory, factory.and(low, high)));
}
