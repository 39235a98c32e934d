//! Session behavior: probing, popping, and scope narrowing

use fmsat::ast::Constraint;
use fmsat::bool::{BooleanFactory, Options};
use fmsat::checker::SatChecker;
use fmsat::encode::ModelEncoder;
use fmsat::model::{FeatureModel, GroupKind};

/// Root with an or-group over A and B
fn or_model() -> FeatureModel {
    let mut model = FeatureModel::new();
    let root = model.add_feature("Root").unwrap();
    let group = model.add_group(root, GroupKind::Or);
    for name in ["A", "B"] {
        let feature = model.add_feature(name).unwrap();
        model.add_group_child(group, feature).unwrap();
    }
    model
}

#[test]
fn base_formula_is_satisfiable() {
    let model = or_model();
    let factory = BooleanFactory::new(Options::default());
    let base = ModelEncoder::new(&factory, &model).convert().unwrap();
    let mut checker = SatChecker::new(&factory, base).unwrap();

    assert!(checker.is_sat().unwrap());
}

#[test]
fn is_sat_with_leaves_the_session_untouched() {
    let model = or_model();
    let factory = BooleanFactory::new(Options::default());
    let mut encoder = ModelEncoder::new(&factory, &model);
    let base = encoder.convert().unwrap();
    let mut checker = SatChecker::new(&factory, base).unwrap();

    let neither = encoder
        .convert_constraint(
            &Constraint::literal("A").not().and(Constraint::literal("B").not()),
        )
        .unwrap();

    assert!(!checker.is_sat_with(neither).unwrap());
    // The failed probe is gone; the same query repeats identically.
    assert!(checker.is_sat().unwrap());
    assert!(!checker.is_sat_with(neither).unwrap());
}

#[test]
fn kept_probes_narrow_subsequent_queries() {
    let model = or_model();
    let factory = BooleanFactory::new(Options::default());
    let mut encoder = ModelEncoder::new(&factory, &model);
    let base = encoder.convert().unwrap();
    let mut checker = SatChecker::new(&factory, base).unwrap();

    // Keep ¬A: satisfiable, and from now on B carries the or-group.
    let not_a = encoder
        .convert_constraint(&Constraint::literal("A").not())
        .unwrap();
    assert!(checker.check_and_keep_if_satisfiable(not_a).unwrap());

    let not_b = encoder
        .convert_constraint(&Constraint::literal("B").not())
        .unwrap();
    assert!(!checker.is_sat_with(not_b).unwrap());

    // An unsatisfiable probe is popped, leaving the kept scope intact.
    let a = encoder.convert_constraint(&Constraint::literal("A")).unwrap();
    assert!(!checker.check_and_keep_if_satisfiable(a).unwrap());
    assert!(checker.is_sat().unwrap());
    assert!(!checker.is_sat_with(not_b).unwrap());
}

#[test]
fn one_shot_checks_are_independent() {
    let model = or_model();
    let factory = BooleanFactory::new(Options::default());
    let mut encoder = ModelEncoder::new(&factory, &model);
    let base = encoder.convert().unwrap();

    assert!(SatChecker::check_once(&factory, base).unwrap());

    let dead = encoder
        .convert_constraint(
            &Constraint::literal("A").not().and(Constraint::literal("B").not()),
        )
        .unwrap();
    assert!(!SatChecker::check_once(&factory, factory.and(base, dead)).unwrap());

    // The one-shot sessions left no trace; a fresh session still works.
    let mut checker = SatChecker::new(&factory, base).unwrap();
    assert!(checker.is_sat().unwrap());
}

#[test]
fn unsatisfiable_base_stays_unsatisfiable() {
    let mut model = or_model();
    model.add_constraint(Constraint::literal("A").and(Constraint::literal("A").not()));

    let factory = BooleanFactory::new(Options::default());
    let base = ModelEncoder::new(&factory, &model).convert().unwrap();
    let mut checker = SatChecker::new(&factory, base).unwrap();

    assert!(!checker.is_sat().unwrap());
    let probe = factory.variable("B");
    assert!(!checker.is_sat_with(probe).unwrap());
}
