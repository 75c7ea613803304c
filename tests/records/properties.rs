//! Round-trip and equality laws

use crate::common::*;
use immutable_records::{create_from_text, create_with, Error, Instance, Mismatch};
use proptest::prelude::*;

// ---------------------------------------------------------------------------
// Strategies
// ---------------------------------------------------------------------------

/// Optional name: `None` leaves the field unset until the lock
fn arb_name() -> impl Strategy<Value = Option<String>> {
    prop::option::of("[A-Za-z \"\\\\é]{0,12}")
}

fn arb_person() -> impl Strategy<Value = Instance<Person>> {
    (arb_name(), arb_name()).prop_map(|(first, last)| {
        create_with::<Person, _>(|p| {
            if let Some(first) = first {
                p.try_set("firstName", first)?;
            }
            if let Some(last) = last {
                p.try_set("lastName", last)?;
            }
            Ok(())
        })
        .unwrap()
    })
}

fn arb_student() -> impl Strategy<Value = Instance<Student>> {
    (
        "[a-z]{1,8}",
        any::<u8>(),
        prop::collection::btree_map("[A-Z]{2,4}", ("[a-z]{1,8}", 1900i32..2100), 0..4),
    )
        .prop_map(|(first, age, schools)| {
            let schools = schools
                .into_iter()
                .map(|(degree, (name, year))| (degree, school(&name, year)));
            student(&first, age, schools).unwrap()
        })
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn prop_person_round_trip(person in arb_person()) {
        let copy = create_from_text::<Person>(&person.to_json(false).unwrap()).unwrap();
        prop_assert!(copy.is_equal(&person));
    }

    #[test]
    fn prop_wrapped_round_trip(person in arb_person()) {
        let copy = create_from_text::<Person>(&person.to_json(true).unwrap()).unwrap();
        prop_assert!(copy.is_equal(&person));
    }

    #[test]
    fn prop_student_round_trip(student in arb_student()) {
        let copy = create_from_text::<Student>(&student.to_json(false).unwrap()).unwrap();
        prop_assert!(copy.is_equal(&student));
    }

    #[test]
    fn prop_compare_is_reflexive(person in arb_person()) {
        prop_assert!(person.compare(&person).is_equal());
    }

    #[test]
    fn prop_locked_instance_rejects_every_write(person in arb_person(), value in "[a-z]{0,8}") {
        let mut person = person;
        for field in ["firstName", "lastName"] {
            let rejected = matches!(
                person.try_set(field, value.as_str()),
                Err(Error::Locked { .. })
            );
            prop_assert!(rejected);
        }
    }

    #[test]
    fn prop_second_write_keeps_first_value(first in "[a-z]{1,8}", second in "[a-z]{1,8}") {
        let mut person = Instance::<Person>::new().unwrap();
        person.try_set("firstName", first.as_str()).unwrap();
        let rejected = matches!(
            person.try_set("firstName", second.as_str()),
            Err(Error::AlreadySet { .. })
        );
        prop_assert!(rejected);
        prop_assert_eq!(person.get_str("firstName"), Some(first.as_str()));
    }

    #[test]
    fn prop_lock_state_mismatch_regardless_of_value(first in "[a-z]{1,8}") {
        let mut open = Instance::<Person>::new().unwrap();
        open.try_set("firstName", first.as_str()).unwrap();
        let locked = create_from_text::<Person>(&open.to_json(false).unwrap()).unwrap();

        let cmp = open.compare(&locked);
        prop_assert!(cmp.has(Mismatch::LockState));
        prop_assert!(!cmp.has(Mismatch::Value));
    }

    #[test]
    fn prop_type_mismatch_regardless_of_value(first in "[a-z]{1,8}", last in "[a-z]{1,8}") {
        let text = format!(r#"{{"firstName":"{first}","lastName":"{last}"}}"#);
        let person = create_from_text::<Person>(&text).unwrap();
        let employee = create_from_text::<Employee>(&text).unwrap();
        prop_assert!(person.compare(&employee).has(Mismatch::Type));
    }
}
