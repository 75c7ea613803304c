//! Core types for immutable records
//!
//! This crate defines the record protocol:
//! - RecordType / Schema: statically declared record types and their fields
//! - FieldType: declared field types and the values they admit
//! - Whitelist: permitted field type names
//! - Value: unified value enum for field contents
//! - Instance: typed record instance with set-once fields and a lock
//! - Token: per-instance identity stamped at creation
//! - Gateway: validation cache and construction paths (text, copy, builder)
//! - Comparison: structural equality between instances
//! - GatewayConfig: TOML configuration for the gateway
//! - Error: error type hierarchy

#![warn(missing_docs)]
#![warn(clippy::all)]

mod codec;
pub mod compare;
pub mod config;
pub mod error;
pub mod field_type;
pub mod gateway;
pub mod instance;
pub mod record;
pub mod schema;
pub mod state;
pub mod token;
pub mod value;
pub mod whitelist;

pub use compare::{Comparison, Mismatch};
pub use config::{GatewayConfig, TokenUnwrap};
pub use error::{DecodeError, Error, Result, TypeDefinitionError};
pub use field_type::{FieldType, RecordRef};
pub use gateway::{create_from_instance, create_from_text, create_with, deserialize, Gateway};
pub use instance::Instance;
pub use record::{RecordData, TokenWrapped};
pub use schema::{Creation, FieldDef, RecordType, Schema, SchemaBuilder};
pub use state::{FieldState, FieldStates};
pub use token::Token;
pub use value::Value;
pub use whitelist::{Whitelist, BUILTIN_TYPE_NAMES};
