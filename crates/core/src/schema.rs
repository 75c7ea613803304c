//! Record type declarations
//!
//! A record type is a Rust marker type implementing [`RecordType`]. It
//! statically declares its [`Schema`]: an ordered list of named, typed
//! fields plus its creation policy. Nothing is discovered at runtime.
//!
//! ```ignore
//! use immutable_core::{FieldType, RecordType, Schema};
//! use once_cell::sync::Lazy;
//!
//! pub struct Person;
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
//! ```

use crate::field_type::FieldType;

/// A record type definition
///
/// Implementors are usually unit structs; instances of the record are
/// `Instance<Self>` values produced by the construction gateway.
pub trait RecordType: 'static {
    /// The statically declared schema of this record type
    fn schema() -> &'static Schema;
}

/// How instances of a record type may be created
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Creation {
    /// Direct construction allowed (still whitelist-checked)
    #[default]
    Open,
    /// Only the construction gateway may create instances
    Strict,
}

/// One declared field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDef {
    name: &'static str,
    ty: FieldType,
}

impl FieldDef {
    /// Field name, as it appears in the text representation
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Declared field type
    pub fn ty(&self) -> &FieldType {
        &self.ty
    }
}

/// Declared shape of a record type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    name: &'static str,
    fields: Vec<FieldDef>,
    creation: Creation,
}

impl Schema {
    /// Start declaring a record type called `name`
    pub fn builder(name: &'static str) -> SchemaBuilder {
        SchemaBuilder {
            schema: Schema {
                name,
                fields: Vec::new(),
                creation: Creation::Open,
            },
        }
    }

    /// Record type name
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Fields in declaration order
    pub fn fields(&self) -> &[FieldDef] {
        &self.fields
    }

    /// Number of declared fields
    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    /// Position of `name` in declaration order
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }

    /// Look up a field by name
    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Creation policy
    pub fn creation(&self) -> Creation {
        self.creation
    }

    /// True if only the gateway may create instances
    pub fn is_strict(&self) -> bool {
        self.creation == Creation::Strict
    }
}

/// Builder returned by [`Schema::builder`]
#[derive(Debug)]
pub struct SchemaBuilder {
    schema: Schema,
}

impl SchemaBuilder {
    /// Declare a field; redeclaring a name replaces its type in place
    pub fn field(mut self, name: &'static str, ty: FieldType) -> Self {
        match self.schema.fields.iter_mut().find(|f| f.name == name) {
            Some(existing) => existing.ty = ty,
            None => self.schema.fields.push(FieldDef { name, ty }),
        }
        self
    }

    /// Require gateway creation for this record type
    pub fn strict(mut self) -> Self {
        self.schema.creation = Creation::Strict;
        self
    }

    /// Finish the declaration
    pub fn build(self) -> Schema {
        self.schema
    }
}
