//! Type-erased record state
//!
//! [`RecordData`] is the runtime unit behind every instance: the field
//! values, the per-field state bitset, the lock flag and the token. All
//! writes go through [`RecordData::try_set`], which enforces two layers:
//!
//! 1. a locked instance rejects every write (`Locked`)
//! 2. a set field rejects a second write (`AlreadySet`)
//!
//! ## Lock
//!
//! `lock()` finalises every unset field and raises the lock flag. Assigning
//! the last unset field raises the flag as well, so "every field is set"
//! and "the lock flag is raised" always agree.

use crate::error::{Error, Result};
use crate::schema::Schema;
use crate::state::{FieldState, FieldStates};
use crate::token::Token;
use crate::value::Value;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::any::TypeId;
use std::collections::BTreeMap;
use tracing::debug;

/// Field values and immutability state of one instance
#[derive(Debug)]
pub struct RecordData {
    schema: &'static Schema,
    type_id: TypeId,
    values: Vec<Value>,
    states: FieldStates,
    locked: bool,
    token: Token,
}

impl RecordData {
    /// Allocate with every field unset and a fresh token
    pub(crate) fn new(schema: &'static Schema, type_id: TypeId) -> Self {
        let states = FieldStates::new(schema.field_count());
        RecordData {
            schema,
            type_id,
            values: vec![Value::Null; schema.field_count()],
            // A type without fields has nothing left to assign
            locked: states.all_set(),
            states,
            token: Token::new(),
        }
    }

    /// Declared schema
    pub fn schema(&self) -> &'static Schema {
        self.schema
    }

    /// Record type name
    pub fn type_name(&self) -> &'static str {
        self.schema.name()
    }

    /// Identity of the concrete record type
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Token stamped at allocation
    pub fn token(&self) -> Token {
        self.token
    }

    /// True once the instance is finalised
    pub fn is_locked(&self) -> bool {
        debug_assert_eq!(self.locked, self.states.all_set());
        self.locked
    }

    /// Current value of `field`; `None` if the field is not declared
    ///
    /// Unset fields read as `Value::Null`.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.schema.index_of(field).map(|idx| &self.values[idx])
    }

    /// Assignment state of `field`; `None` if the field is not declared
    pub fn field_state(&self, field: &str) -> Option<FieldState> {
        self.schema
            .index_of(field)
            .map(|idx| self.states.state(idx))
    }

    /// Snapshot of field name -> set
    pub fn property_status(&self) -> BTreeMap<&'static str, bool> {
        self.schema
            .fields()
            .iter()
            .zip(self.states.iter())
            .map(|(field, state)| (field.name(), state.is_set()))
            .collect()
    }

    /// Values in declaration order, paired with their field names
    pub fn entries(&self) -> impl Iterator<Item = (&'static str, &Value)> + '_ {
        self.schema
            .fields()
            .iter()
            .map(|f| f.name())
            .zip(self.values.iter())
    }

    /// Assign `field` once
    ///
    /// # Errors
    ///
    /// - `Locked` if the instance is locked (checked first)
    /// - `UnknownField` if the type does not declare `field`
    /// - `AlreadySet` if the field was assigned before; the old value stays
    /// - `ValueTypeMismatch` if the declared type does not admit `value`
    ///
    /// A failed write leaves the instance unchanged.
    pub(crate) fn try_set(&mut self, field: &str, value: Value) -> Result<()> {
        if self.locked {
            debug!(target: "immutable::record", type_name = self.type_name(), field, "write rejected: locked");
            return Err(Error::Locked {
                type_name: self.type_name(),
                field: field.to_string(),
            });
        }

        let schema = self.schema;
        let idx = schema
            .index_of(field)
            .ok_or_else(|| Error::UnknownField {
                type_name: self.type_name(),
                field: field.to_string(),
            })?;
        let def = &schema.fields()[idx];

        if self.states.state(idx).is_set() {
            debug!(target: "immutable::record", type_name = self.type_name(), field, "write rejected: already set");
            return Err(Error::AlreadySet {
                type_name: self.type_name(),
                field: def.name(),
                attempted: value,
            });
        }

        if !def.ty().admits(&value) {
            return Err(Error::ValueTypeMismatch {
                type_name: self.type_name(),
                field: def.name(),
                expected: def.ty().to_string(),
                found: value.type_name(),
            });
        }

        self.values[idx] = def.ty().normalize(value);
        self.states.mark_set(idx);

        if self.states.all_set() {
            self.locked = true;
            debug!(target: "immutable::record", type_name = self.type_name(), token = %self.token, "last field assigned; instance locked");
        }
        Ok(())
    }

    /// Finalise every unset field and raise the lock flag
    pub(crate) fn lock(&mut self) {
        self.states.mark_all();
        self.locked = true;
    }

    /// Same type and same field values
    pub(crate) fn same_values(&self, other: &RecordData) -> bool {
        self.type_id == other.type_id && self.values == other.values
    }
}

/// Plain (token-less) rendering: an object of the declared fields, in order
impl Serialize for RecordData {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (name, value) in self.entries() {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// Token-wrapped rendering: `{"<token>": <record>}`
pub struct TokenWrapped<'a>(
    /// The record to wrap
    pub &'a RecordData,
);

impl Serialize for TokenWrapped<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(&self.0.token.to_string(), self.0)?;
        map.end()
    }
}
