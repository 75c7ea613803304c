//! Comparison reports

use crate::common::*;
use immutable_records::{create_from_text, create_with, Error, Instance, Mismatch};

#[test]
fn identical_values_compare_equal_despite_tokens() {
    let a = person("John", "Petersen");
    let b = person("John", "Petersen");
    assert_ne!(a.token(), b.token());
    assert!(a.is_equal(&b));
    assert_eq!(a.compare(&b).to_string(), "equal");
}

#[test]
fn different_values_report_value_mismatch() {
    let cmp = person("John", "Petersen").compare(&person("Jane", "Petersen"));
    assert!(!cmp.is_equal());
    assert_eq!(cmp.mismatches().collect::<Vec<_>>(), vec![Mismatch::Value]);
}

#[test]
fn lock_state_is_compared_independently_of_values() {
    let mut open = Instance::<Person>::new().unwrap();
    open.try_set("firstName", "John").unwrap();
    let locked = create_from_text::<Person>(r#"{"firstName":"John"}"#).unwrap();

    let cmp = open.compare(&locked);
    assert!(cmp.has(Mismatch::LockState));
    assert!(!cmp.has(Mismatch::Value));
}

#[test]
fn type_mismatch_short_circuits() {
    let employee = create_from_text::<Employee>(r#"{"firstName":"John","lastName":"Petersen"}"#)
        .unwrap();
    let cmp = person("John", "Petersen").compare(&employee);
    assert_eq!(cmp.mismatches().collect::<Vec<_>>(), vec![Mismatch::Type]);
    assert_eq!(cmp.to_string(), "differ in type");
}

#[test]
fn lock_state_and_value_mismatches_are_aggregated() {
    let mut open = Instance::<Person>::new().unwrap();
    open.try_set("firstName", "John").unwrap();
    let locked = create_from_text::<Person>(r#"{"firstName":"Jane"}"#).unwrap();

    let cmp = open.compare(&locked);
    assert_eq!(
        cmp.mismatches().collect::<Vec<_>>(),
        vec![Mismatch::LockState, Mismatch::Value]
    );
    assert_eq!(cmp.to_string(), "differ in lock state, value");
}

#[test]
fn type_mismatch_suppresses_lock_state_and_value() {
    let mut open = Instance::<Person>::new().unwrap();
    open.try_set("firstName", "John").unwrap();
    let employee = create_from_text::<Employee>(r#"{"firstName":"Jane"}"#).unwrap();

    let cmp = open.compare(&employee);
    assert_eq!(cmp.mismatches().collect::<Vec<_>>(), vec![Mismatch::Type]);
}

#[test]
fn non_finite_floats_cannot_hide_value_differences() {
    for value in [f64::INFINITY, f64::NEG_INFINITY, f64::NAN] {
        let result = create_with::<Measurement, _>(|m| m.try_set("ratio", value));
        assert!(matches!(
            result,
            Err(Error::ValueTypeMismatch { field: "ratio", .. })
        ));
    }

    let finite = create_with::<Measurement, _>(|m| m.try_set("ratio", 0.5)).unwrap();
    let unset = create_with::<Measurement, _>(|_| Ok(())).unwrap();
    assert!(finite.compare(&unset).has(Mismatch::Value));

    let copy = create_from_text::<Measurement>(&finite.to_json(false).unwrap()).unwrap();
    assert!(copy.is_equal(&finite));
}
