//! Shared record types for all integration test suites.
//!
//! Import via `#[path = "../common/mod.rs"] mod common;` from a suite's main.rs.

#![allow(dead_code)]

use immutable_records::{
    create_with, FieldType, Instance, RecordType, Result, Schema, Value,
};
use once_cell::sync::Lazy;
use std::collections::BTreeMap;

// ============================================================================
// Record types
// ============================================================================

/// Two string fields, open creation
pub struct Person;

impl RecordType for Person {
    fn schema() -> &'static Schema {
        static SCHEMA: Lazy<Schema> = Lazy::new(|| {
            Schema::builder("Person")
                .field("firstName", FieldType::String)
                .field("lastName", FieldType::String)
                .build()
        });
        &SCHEMA
    }
}

/// Same shape as `Person`, strict creation
pub struct StrictPerson;

impl RecordType for StrictPerson {
    fn schema() -> &'static Schema {
        static SCHEMA: Lazy<Schema> = Lazy::new(|| {
            Schema::builder("StrictPerson")
                .field("firstName", FieldType::String)
                .field("lastName", FieldType::String)
                .strict()
                .build()
        });
        &SCHEMA
    }
}

/// Same shape as `Person` under another type
pub struct Employee;

impl RecordType for Employee {
    fn schema() -> &'static Schema {
        static SCHEMA: Lazy<Schema> = Lazy::new(|| {
            Schema::builder("Employee")
                .field("firstName", FieldType::String)
                .field("lastName", FieldType::String)
                .build()
        });
        &SCHEMA
    }
}

/// Nested in `Student`
pub struct School;

impl RecordType for School {
    fn schema() -> &'static Schema {
        static SCHEMA: Lazy<Schema> = Lazy::new(|| {
            Schema::builder("School")
                .field("name", FieldType::String)
                .field("year", FieldType::I32)
                .build()
        });
        &SCHEMA
    }
}

/// A record with a map of nested records
pub struct Student;

impl RecordType for Student {
    fn schema() -> &'static Schema {
        static SCHEMA: Lazy<Schema> = Lazy::new(|| {
            Schema::builder("Student")
                .field("firstName", FieldType::String)
                .field("age", FieldType::U8)
                .field("schools", FieldType::map(FieldType::record::<School>()))
                .build()
        });
        &SCHEMA
    }
}

/// One field of every scalar kind plus containers
pub struct Measurement;

impl RecordType for Measurement {
    fn schema() -> &'static Schema {
        static SCHEMA: Lazy<Schema> = Lazy::new(|| {
            Schema::builder("Measurement")
                .field("valid", FieldType::Bool)
                .field("offset", FieldType::I8)
                .field("count", FieldType::U32)
                .field("ratio", FieldType::F64)
                .field("price", FieldType::Decimal)
                .field("grade", FieldType::Char)
                .field("takenAt", FieldType::DateTime)
                .field("labels", FieldType::list(FieldType::String))
                .field(
                    "totals",
                    FieldType::ImmutableSortedMap(Box::new(FieldType::I64)),
                )
                .build()
        });
        &SCHEMA
    }
}

/// Declares a non-whitelisted list type
pub struct InvalidDefinition;

impl RecordType for InvalidDefinition {
    fn schema() -> &'static Schema {
        static SCHEMA: Lazy<Schema> = Lazy::new(|| {
            Schema::builder("InvalidDefinition")
                .field("name", FieldType::String)
                .field("aliases", FieldType::named("Vec<String>"))
                .build()
        });
        &SCHEMA
    }
}

/// Hides a non-whitelisted type inside a whitelisted container name
pub struct NestedInvalidDefinition;

impl RecordType for NestedInvalidDefinition {
    fn schema() -> &'static Schema {
        static SCHEMA: Lazy<Schema> = Lazy::new(|| {
            Schema::builder("NestedInvalidDefinition")
                .field("aliases", FieldType::named("ImmutableList<Vec<String>>"))
                .build()
        });
        &SCHEMA
    }
}

// ============================================================================
// Builders
// ============================================================================

/// Locked `Person` built through the process-wide gateway
pub fn person(first: &str, last: &str) -> Instance<Person> {
    create_with::<Person, _>(|p| {
        p.try_set("firstName", first)?;
        p.try_set("lastName", last)
    })
    .expect("person")
}

/// Locked `School`
pub fn school(name: &str, year: i32) -> Instance<School> {
    create_with::<School, _>(|s| {
        s.try_set("name", name)?;
        s.try_set("year", year)
    })
    .expect("school")
}

/// Locked `Student` attending `schools`, keyed by degree
pub fn student<I, D>(first: &str, age: u8, schools: I) -> Result<Instance<Student>>
where
    I: IntoIterator<Item = (D, Instance<School>)>,
    D: Into<String>,
{
    let schools: BTreeMap<String, Value> = schools
        .into_iter()
        .map(|(degree, school)| (degree.into(), Value::from(school)))
        .collect();
    create_with::<Student, _>(|s| {
        s.try_set("firstName", first)?;
        s.try_set("age", age)?;
        s.try_set("schools", schools)
    })
}
