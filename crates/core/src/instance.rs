//! Typed record instances
//!
//! [`Instance<R>`] is the handle callers work with: a [`RecordData`] tied to
//! its record type `R` at compile time. Fields are written once with
//! [`try_set`](Instance::try_set); [`lock`](Instance::lock) finalises the
//! instance. Rendering to text, copying and decoding go through the
//! [`Gateway`].
//!
//! ```ignore
//! let mut person = Instance::<Person>::new()?;
//! person.try_set("firstName", "John")?;
//! let person = person.lock();
//!
//! assert!(person.try_set("lastName", "Petersen").is_err());
//! ```

use crate::compare::{self, Comparison};
use crate::error::{Error, Result};
use crate::gateway::Gateway;
use crate::record::{RecordData, TokenWrapped};
use crate::schema::{RecordType, Schema};
use crate::state::FieldState;
use crate::token::Token;
use crate::value::Value;
use std::any::TypeId;
use std::collections::BTreeMap;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

/// An instance of record type `R`
pub struct Instance<R: RecordType> {
    data: RecordData,
    _record: PhantomData<fn() -> R>,
}

impl<R: RecordType> Instance<R> {
    /// Fresh, unlocked instance via the process-wide gateway
    ///
    /// # Errors
    ///
    /// - `InvalidCreation` if `R` is a strict record type
    /// - `TypeDefinition` if `R` declares non-whitelisted field types
    pub fn new() -> Result<Self> {
        Gateway::global().new_instance()
    }

    /// Fresh, unlocked instance via `gateway`
    pub fn new_in(gateway: &Gateway) -> Result<Self> {
        gateway.new_instance()
    }

    pub(crate) fn draft() -> Self {
        Self::from_data(RecordData::new(R::schema(), TypeId::of::<R>()))
    }

    pub(crate) fn from_data(data: RecordData) -> Self {
        debug_assert_eq!(data.type_id(), TypeId::of::<R>());
        Instance {
            data,
            _record: PhantomData,
        }
    }

    /// Type-erased view
    pub fn data(&self) -> &RecordData {
        &self.data
    }

    /// Declared schema of `R`
    pub fn schema(&self) -> &'static Schema {
        self.data.schema()
    }

    /// Assign `field` once
    ///
    /// # Errors
    ///
    /// `Locked`, `UnknownField`, `AlreadySet` or `ValueTypeMismatch`; see
    /// [`RecordData::try_set`]. The instance is unchanged on error.
    pub fn try_set(&mut self, field: &str, value: impl Into<Value>) -> Result<()> {
        self.data.try_set(field, value.into())
    }

    /// Finalise every field and lock
    pub fn lock(mut self) -> Self {
        self.data.lock();
        self
    }

    /// True once locked
    pub fn is_locked(&self) -> bool {
        self.data.is_locked()
    }

    /// Token stamped at creation
    pub fn token(&self) -> Token {
        self.data.token()
    }

    /// The instance's token
    ///
    /// Every instance is stamped when it is allocated, so this never mints
    /// a new token; repeated calls return the same value.
    pub fn assign_token(&self) -> Token {
        self.data.token()
    }

    /// Field name -> set, for every declared field
    pub fn property_status(&self) -> BTreeMap<&'static str, bool> {
        self.data.property_status()
    }

    /// Assignment state of `field`
    pub fn field_state(&self, field: &str) -> Option<FieldState> {
        self.data.field_state(field)
    }

    /// Current value of `field` (`Value::Null` while unset)
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.data.get(field)
    }

    /// `field` as text, if set to a string
    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.get(field).and_then(Value::as_str)
    }

    /// `field` as a signed integer
    pub fn get_i64(&self, field: &str) -> Option<i64> {
        self.get(field).and_then(Value::as_i64)
    }

    /// `field` as an unsigned integer
    pub fn get_u64(&self, field: &str) -> Option<u64> {
        self.get(field).and_then(Value::as_u64)
    }

    /// `field` as a boolean
    pub fn get_bool(&self, field: &str) -> Option<bool> {
        self.get(field).and_then(Value::as_bool)
    }

    /// `field` as a nested record
    pub fn get_record(&self, field: &str) -> Option<&RecordData> {
        self.get(field).and_then(Value::as_record)
    }

    /// Render as text
    ///
    /// With `with_token` the output is `{"<token>": {...}}`, which
    /// `create_from_text` unwraps again.
    ///
    /// # Errors
    ///
    /// Returns `Error::Encode` if rendering fails.
    pub fn to_json(&self, with_token: bool) -> Result<String> {
        if with_token {
            serde_json::to_string(&TokenWrapped(&self.data)).map_err(Error::Encode)
        } else {
            serde_json::to_string(&self.data).map_err(Error::Encode)
        }
    }

    /// Render as an editable document
    ///
    /// The document is a plain copy; editing it and passing it back through
    /// `create_from_text` yields a new locked instance.
    pub fn to_document(&self) -> Result<serde_json::Map<String, serde_json::Value>> {
        match serde_json::to_value(&self.data).map_err(Error::Encode)? {
            serde_json::Value::Object(map) => Ok(map),
            // A record always renders as an object
            _ => Ok(serde_json::Map::new()),
        }
    }

    /// Compare with an instance of any record type
    pub fn compare<S: RecordType>(&self, other: &Instance<S>) -> Comparison {
        compare::compare(&self.data, &other.data)
    }

    /// True if `compare` finds no mismatch
    pub fn is_equal<S: RecordType>(&self, other: &Instance<S>) -> bool {
        self.compare(other).is_equal()
    }

    /// Share as a nested record value
    ///
    /// Only locked instances are admitted by record-typed fields.
    pub fn into_shared(self) -> Arc<RecordData> {
        Arc::new(self.data)
    }
}

impl<R: RecordType> From<Instance<R>> for Value {
    fn from(instance: Instance<R>) -> Self {
        Value::Record(instance.into_shared())
    }
}

impl<R: RecordType> fmt::Display for Instance<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = serde_json::to_string(&self.data).map_err(|_| fmt::Error)?;
        f.write_str(&text)
    }
}

impl<R: RecordType> fmt::Debug for Instance<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instance")
            .field("type", &self.data.type_name())
            .field("token", &self.data.token())
            .field("locked", &self.data.is_locked())
            .field("values", &self.data.property_status())
            .finish()
    }
}
