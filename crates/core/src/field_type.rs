//! Declared field types
//!
//! Every field of a record type carries a [`FieldType`]. The type decides
//! two things:
//!
//! - its whitelist name, compared against the [`Whitelist`](crate::Whitelist)
//!   when the record type is first validated
//! - which [`Value`]s a write to the field admits
//!
//! Types outside the built-in set are declared by name with
//! [`FieldType::named`]. Only their base name counts for the whitelist:
//! `Vec<String>` is checked as `Vec`.

use crate::schema::{RecordType, Schema};
use crate::value::Value;
use rust_decimal::Decimal;
use std::any::TypeId;
use std::borrow::Cow;
use std::collections::BTreeSet;
use std::fmt;

/// Reference to another record type used as a field type
///
/// Holds the nested type's identity and a schema accessor. The schema is
/// fetched lazily, so record types may refer to each other.
#[derive(Clone, Copy)]
pub struct RecordRef {
    type_id: TypeId,
    schema: fn() -> &'static Schema,
}

impl RecordRef {
    /// Reference the record type `R`
    pub fn of<R: RecordType>() -> Self {
        RecordRef {
            type_id: TypeId::of::<R>(),
            schema: R::schema,
        }
    }

    /// Identity of the nested record type
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Schema of the nested record type
    pub fn schema(&self) -> &'static Schema {
        (self.schema)()
    }
}

impl PartialEq for RecordRef {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for RecordRef {}

impl fmt::Debug for RecordRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RecordRef").field(&self.schema().name()).finish()
    }
}

/// Semantic type of a record field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldType {
    /// `bool`
    Bool,
    /// `u8`
    U8,
    /// `i8`
    I8,
    /// `char`
    Char,
    /// Exact decimal
    Decimal,
    /// UTC timestamp
    DateTime,
    /// `f32`
    F32,
    /// `f64`
    F64,
    /// `i16`
    I16,
    /// `u16`
    U16,
    /// `i32`
    I32,
    /// `u32`
    U32,
    /// `i64`
    I64,
    /// `u64`
    U64,
    /// UTF-8 string
    String,
    /// Immutable fixed sequence
    ImmutableArray(Box<FieldType>),
    /// Immutable list
    ImmutableList(Box<FieldType>),
    /// Immutable hash set
    ImmutableSet(Box<FieldType>),
    /// Immutable sorted set
    ImmutableSortedSet(Box<FieldType>),
    /// Immutable stack
    ImmutableStack(Box<FieldType>),
    /// Immutable queue
    ImmutableQueue(Box<FieldType>),
    /// Immutable string-keyed map
    ImmutableMap(Box<FieldType>),
    /// Immutable string-keyed map, ordered by key
    ImmutableSortedMap(Box<FieldType>),
    /// Another record type; validated by its own construction
    Record(RecordRef),
    /// Any other type, identified by name
    Named(Cow<'static, str>),
}

impl FieldType {
    /// Nested record field of type `R`
    pub fn record<R: RecordType>() -> Self {
        FieldType::Record(RecordRef::of::<R>())
    }

    /// Type declared by name, e.g. `FieldType::named("Vec<String>")`
    ///
    /// The whitelist checks the base name and every generic argument, so
    /// `ImmutableList<Vec<String>>` is rejected for `Vec` just like
    /// `FieldType::list(FieldType::named("Vec<String>"))`. Values written to
    /// a named field are not type-checked.
    pub fn named(name: impl Into<Cow<'static, str>>) -> Self {
        FieldType::Named(name.into())
    }

    /// `ImmutableArray` of `element`
    pub fn array(element: FieldType) -> Self {
        FieldType::ImmutableArray(Box::new(element))
    }

    /// `ImmutableList` of `element`
    pub fn list(element: FieldType) -> Self {
        FieldType::ImmutableList(Box::new(element))
    }

    /// `ImmutableMap` with `value` entries
    pub fn map(value: FieldType) -> Self {
        FieldType::ImmutableMap(Box::new(value))
    }

    /// Base name checked against the whitelist
    pub fn name(&self) -> &str {
        match self {
            FieldType::Bool => "bool",
            FieldType::U8 => "u8",
            FieldType::I8 => "i8",
            FieldType::Char => "char",
            FieldType::Decimal => "Decimal",
            FieldType::DateTime => "DateTime",
            FieldType::F32 => "f32",
            FieldType::F64 => "f64",
            FieldType::I16 => "i16",
            FieldType::U16 => "u16",
            FieldType::I32 => "i32",
            FieldType::U32 => "u32",
            FieldType::I64 => "i64",
            FieldType::U64 => "u64",
            FieldType::String => "String",
            FieldType::ImmutableArray(_) => "ImmutableArray",
            FieldType::ImmutableList(_) => "ImmutableList",
            FieldType::ImmutableSet(_) => "ImmutableSet",
            FieldType::ImmutableSortedSet(_) => "ImmutableSortedSet",
            FieldType::ImmutableStack(_) => "ImmutableStack",
            FieldType::ImmutableQueue(_) => "ImmutableQueue",
            FieldType::ImmutableMap(_) => "ImmutableMap",
            FieldType::ImmutableSortedMap(_) => "ImmutableSortedMap",
            FieldType::Record(r) => r.schema().name(),
            FieldType::Named(name) => base_name(name),
        }
    }

    /// Element type of a container, if this is one
    pub fn element(&self) -> Option<&FieldType> {
        match self {
            FieldType::ImmutableArray(e)
            | FieldType::ImmutableList(e)
            | FieldType::ImmutableSet(e)
            | FieldType::ImmutableSortedSet(e)
            | FieldType::ImmutableStack(e)
            | FieldType::ImmutableQueue(e)
            | FieldType::ImmutableMap(e)
            | FieldType::ImmutableSortedMap(e) => Some(e),
            _ => None,
        }
    }

    /// True for containers encoded as JSON objects
    pub fn is_map(&self) -> bool {
        matches!(
            self,
            FieldType::ImmutableMap(_) | FieldType::ImmutableSortedMap(_)
        )
    }

    /// True for nested record types
    pub fn is_record(&self) -> bool {
        matches!(self, FieldType::Record(_))
    }

    /// Collect the names this type contributes to a whitelist check
    ///
    /// Record types contribute nothing; containers contribute their own
    /// name plus their element's.
    pub(crate) fn collect_names(&self, names: &mut BTreeSet<String>) {
        if self.is_record() {
            return;
        }
        names.insert(self.name().to_string());
        if let FieldType::Named(name) = self {
            collect_generic_names(name, names);
        }
        if let Some(element) = self.element() {
            element.collect_names(names);
        }
    }

    /// Inclusive range of an integer type
    fn int_bounds(&self) -> Option<(i128, i128)> {
        let bounds = match self {
            FieldType::U8 => (0, i128::from(u8::MAX)),
            FieldType::I8 => (i128::from(i8::MIN), i128::from(i8::MAX)),
            FieldType::I16 => (i128::from(i16::MIN), i128::from(i16::MAX)),
            FieldType::U16 => (0, i128::from(u16::MAX)),
            FieldType::I32 => (i128::from(i32::MIN), i128::from(i32::MAX)),
            FieldType::U32 => (0, i128::from(u32::MAX)),
            FieldType::I64 => (i128::from(i64::MIN), i128::from(i64::MAX)),
            FieldType::U64 => (0, i128::from(u64::MAX)),
            _ => return None,
        };
        Some(bounds)
    }

    /// True for every integer width
    pub fn is_integer(&self) -> bool {
        self.int_bounds().is_some()
    }

    fn is_unsigned(&self) -> bool {
        matches!(
            self,
            FieldType::U8 | FieldType::U16 | FieldType::U32 | FieldType::U64
        )
    }

    /// Whether a write of `value` to a field of this type is accepted
    ///
    /// `Null` is admitted everywhere. Integers are range-checked against
    /// the declared width. Nested records must be of the declared type and
    /// already locked.
    pub fn admits(&self, value: &Value) -> bool {
        if value.is_null() {
            return true;
        }
        if let Some((min, max)) = self.int_bounds() {
            return value.as_i128().map_or(false, |v| (min..=max).contains(&v));
        }
        match self {
            FieldType::Bool => matches!(value, Value::Bool(_)),
            FieldType::Char => matches!(value, Value::Char(_)),
            FieldType::String => matches!(value, Value::String(_)),
            FieldType::DateTime => matches!(value, Value::DateTime(_)),
            // JSON has no form for NaN or infinities
            FieldType::F64 => matches!(value, Value::Float(f) if f.is_finite()),
            FieldType::F32 => {
                matches!(value, Value::Float(f) if f.is_finite() && f.abs() <= f64::from(f32::MAX))
            }
            FieldType::Decimal => matches!(
                value,
                Value::Decimal(_) | Value::Int(_) | Value::UInt(_)
            ),
            FieldType::Record(r) => value
                .as_record()
                .map_or(false, |data| data.type_id() == r.type_id() && data.is_locked()),
            FieldType::Named(_) => true,
            container => match (container.element(), value) {
                (Some(element), Value::Map(entries)) if container.is_map() => {
                    entries.values().all(|v| element.admits(v))
                }
                (Some(element), Value::Array(items)) if !container.is_map() => {
                    items.iter().all(|v| element.admits(v))
                }
                _ => false,
            },
        }
    }

    /// Canonical representation of an admitted value
    ///
    /// Signed widths store `Int`, unsigned widths `UInt`; integer writes to
    /// a `Decimal` field become `Decimal`. Call only after [`admits`](Self::admits).
    pub fn normalize(&self, value: Value) -> Value {
        if self.int_bounds().is_some() {
            return match value.as_i128() {
                Some(v) if self.is_unsigned() => u64::try_from(v).map(Value::UInt).unwrap_or(value),
                Some(v) => i64::try_from(v).map(Value::Int).unwrap_or(value),
                None => value,
            };
        }
        match (self, value) {
            (FieldType::Decimal, Value::Int(i)) => Value::Decimal(Decimal::from(i)),
            (FieldType::Decimal, Value::UInt(u)) => Value::Decimal(Decimal::from(u)),
            (container, Value::Array(items)) => match container.element() {
                Some(element) => {
                    Value::Array(items.into_iter().map(|v| element.normalize(v)).collect())
                }
                None => Value::Array(items),
            },
            (container, Value::Map(entries)) => match container.element() {
                Some(element) => Value::Map(
                    entries
                        .into_iter()
                        .map(|(k, v)| (k, element.normalize(v)))
                        .collect(),
                ),
                None => Value::Map(entries),
            },
            (_, other) => other,
        }
    }
}

/// Strip a generic argument list: `Vec<String>` -> `Vec`
fn base_name(name: &str) -> &str {
    let name = name.trim();
    match name.find('<') {
        Some(idx) => name[..idx].trim_end(),
        None => name,
    }
}

/// Base names of every generic argument, at any depth
fn collect_generic_names(name: &str, names: &mut BTreeSet<String>) {
    let name = name.trim();
    let (Some(open), Some(close)) = (name.find('<'), name.rfind('>')) else {
        return;
    };
    if close <= open {
        return;
    }
    let args = &name[open + 1..close];
    let mut depth = 0usize;
    let mut start = 0;
    for (idx, c) in args.char_indices() {
        match c {
            '<' => depth += 1,
            '>' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                collect_argument(&args[start..idx], names);
                start = idx + 1;
            }
            _ => {}
        }
    }
    collect_argument(&args[start..], names);
}

fn collect_argument(arg: &str, names: &mut BTreeSet<String>) {
    let base = base_name(arg);
    if !base.is_empty() {
        names.insert(base.to_string());
    }
    collect_generic_names(arg, names);
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldType::Named(name) => f.write_str(name),
            other => match other.element() {
                Some(element) => write!(f, "{}<{}>", other.name(), element),
                None => f.write_str(other.name()),
            },
        }
    }
}
