//! Field type whitelist
//!
//! A record type may only declare field types whose base name is on the
//! whitelist: scalars, text, date/time and the immutable containers. Nested
//! record types are always permitted; they are validated when their own
//! instances are constructed.
//!
//! The check runs once per record type (the gateway caches the outcome) and
//! reports every offending type name in sorted order.

use crate::error::TypeDefinitionError;
use crate::schema::Schema;
use std::collections::BTreeSet;

/// Built-in whitelisted type names
pub const BUILTIN_TYPE_NAMES: &[&str] = &[
    "bool",
    "u8",
    "i8",
    "char",
    "Decimal",
    "DateTime",
    "f64",
    "f32",
    "i32",
    "u32",
    "i64",
    "u64",
    "i16",
    "u16",
    "String",
    "ImmutableArray",
    "ImmutableMap",
    "ImmutableList",
    "ImmutableSet",
    "ImmutableSortedMap",
    "ImmutableSortedSet",
    "ImmutableStack",
    "ImmutableQueue",
];

/// Set of permitted field type names
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Whitelist {
    names: BTreeSet<String>,
}

impl Default for Whitelist {
    fn default() -> Self {
        Self::builtin()
    }
}

impl Whitelist {
    /// The built-in whitelist
    pub fn builtin() -> Self {
        Whitelist {
            names: BUILTIN_TYPE_NAMES.iter().map(|n| n.to_string()).collect(),
        }
    }

    /// Extend with additional permitted type names
    pub fn with_extra<I, S>(mut self, extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.names.extend(extra.into_iter().map(Into::into));
        self
    }

    /// Whether `name` is permitted
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    /// Permitted names, sorted
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    /// Check every declared field type of `schema`
    ///
    /// Computes the set of field type names (record types excluded),
    /// subtracts the whitelist, and fails with the sorted remainder.
    pub fn validate(&self, schema: &Schema) -> Result<(), TypeDefinitionError> {
        let mut declared = BTreeSet::new();
        for field in schema.fields() {
            field.ty().collect_names(&mut declared);
        }

        let invalid_types: Vec<String> = declared
            .into_iter()
            .filter(|name| !self.contains(name))
            .collect();

        if invalid_types.is_empty() {
            Ok(())
        } else {
            Err(TypeDefinitionError {
                type_name: schema.name(),
                invalid_types,
            })
        }
    }
}
