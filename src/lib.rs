//! Immutable records - write-once record instances
//!
//! A record type declares its fields statically. Each field of an instance
//! may be assigned exactly once; locking an instance finalises every field.
//! Instances render to JSON (optionally wrapped with their token) and are
//! rebuilt from JSON as locked instances.
//!
//! # Quick Start
//!
//! ```ignore
//! use immutable_records::{create_from_text, FieldType, Instance, RecordType, Schema};
//! use once_cell::sync::Lazy;
//!
//! struct Person;
//!
//! impl RecordType for Person {
//!     fn schema() -> &'static Schema {
//!         static SCHEMA: Lazy<Schema> = Lazy::new(|| {
//!             Schema::builder("Person")
//!                 .field("firstName", FieldType::String)
//!                 .field("lastName", FieldType::String)
//!                 .build()
//!         });
//!         &SCHEMA
//!     }
//! }
//!
//! let mut person = Instance::<Person>::new()?;
//! person.try_set("firstName", "John")?;
//! let text = person.lock().to_json(true)?;
//!
//! let copy = create_from_text::<Person>(&text)?;
//! assert!(copy.is_locked());
//! ```
//!
//! # Architecture
//!
//! Every construction path goes through the [`Gateway`], which validates a
//! record type against the field type whitelist once and caches the result.

pub use immutable_core::*;
