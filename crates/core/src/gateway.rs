//! Construction gateway
//!
//! The single entry point for building record instances. It validates a
//! record type against the whitelist on first use and caches the outcome,
//! so each type is checked at most once per gateway. It is also the only
//! path that may create instances of strict record types.
//!
//! A process-wide gateway with the default configuration backs
//! [`Instance::new`] and the free functions in this module. Gateways with
//! their own [`GatewayConfig`] keep their own cache.
//!
//! # Thread Safety
//!
//! `Gateway` is `Send + Sync`. The validation cache uses DashMap's entry
//! API, so concurrent first uses of a type agree on a single outcome.

use crate::codec;
use crate::config::GatewayConfig;
use crate::error::{DecodeError, Error, Result, TypeDefinitionError};
use crate::field_type::RecordRef;
use crate::instance::Instance;
use crate::schema::{RecordType, Schema};
use crate::whitelist::Whitelist;
use dashmap::DashMap;
use once_cell::sync::Lazy;
use std::any::TypeId;
use tracing::{debug, warn};

static GLOBAL: Lazy<Gateway> = Lazy::new(Gateway::default);

/// Validates record types and constructs instances
pub struct Gateway {
    config: GatewayConfig,
    whitelist: Whitelist,
    validated: DashMap<TypeId, std::result::Result<(), TypeDefinitionError>>,
}

impl Default for Gateway {
    fn default() -> Self {
        Self::new(GatewayConfig::default())
    }
}

impl std::fmt::Debug for Gateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Gateway")
            .field("config", &self.config)
            .field("validated_types", &self.validated.len())
            .finish()
    }
}

impl Gateway {
    /// Gateway with its own configuration and an empty validation cache
    pub fn new(config: GatewayConfig) -> Self {
        let whitelist = Whitelist::builtin().with_extra(config.extra_allowed_types.iter().cloned());
        Gateway {
            config,
            whitelist,
            validated: DashMap::new(),
        }
    }

    /// The process-wide gateway (default configuration)
    pub fn global() -> &'static Gateway {
        &GLOBAL
    }

    /// Active configuration
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Effective whitelist (built-in names plus configured extras)
    pub fn whitelist(&self) -> &Whitelist {
        &self.whitelist
    }

    /// Validate record type `R`, once
    ///
    /// # Errors
    ///
    /// Returns `Error::TypeDefinition` naming every non-whitelisted field
    /// type. The same error is returned on every later call.
    pub fn validate<R: RecordType>(&self) -> Result<()> {
        self.validate_schema(TypeId::of::<R>(), R::schema())
    }

    /// True once `R` has been validated by this gateway (either outcome)
    pub fn is_validated<R: RecordType>(&self) -> bool {
        self.validated.contains_key(&TypeId::of::<R>())
    }

    pub(crate) fn validate_ref(&self, record: &RecordRef) -> Result<()> {
        self.validate_schema(record.type_id(), record.schema())
    }

    fn validate_schema(&self, type_id: TypeId, schema: &'static Schema) -> Result<()> {
        // Clone the outcome out so the shard guard is released before returning
        let outcome = self
            .validated
            .entry(type_id)
            .or_insert_with(|| {
                let outcome = self.whitelist.validate(schema);
                match &outcome {
                    Ok(()) => {
                        debug!(target: "immutable::validate", type_name = schema.name(), "record type validated")
                    }
                    Err(e) => {
                        warn!(target: "immutable::validate", type_name = schema.name(), invalid = ?e.invalid_types, "record type rejected")
                    }
                }
                outcome
            })
            .value()
            .clone();
        outcome.map_err(Error::from)
    }

    /// Fresh instance of `R` with every field unset
    ///
    /// # Errors
    ///
    /// - `InvalidCreation` if `R` is strict
    /// - `TypeDefinition` if `R` fails validation
    pub fn new_instance<R: RecordType>(&self) -> Result<Instance<R>> {
        let schema = R::schema();
        if schema.is_strict() {
            warn!(target: "immutable::gateway", type_name = schema.name(), "direct creation of strict record type refused");
            return Err(Error::InvalidCreation {
                type_name: schema.name(),
            });
        }
        self.validate::<R>()?;
        Ok(Instance::draft())
    }

    /// Finalise an instance built outside the gateway
    ///
    /// Validates `R` if needed, locks `instance` (finalising any unset
    /// fields) and returns it. The token stamped at creation is kept.
    ///
    /// # Errors
    ///
    /// Returns `TypeDefinition` if `R` fails validation.
    pub fn create_from_instance<R: RecordType>(&self, instance: Instance<R>) -> Result<Instance<R>> {
        self.validate::<R>()?;
        let instance = instance.lock();
        debug!(target: "immutable::gateway", type_name = R::schema().name(), token = %instance.assign_token(), "instance finalised");
        Ok(instance)
    }

    /// Locked instance of `R` decoded from `text`
    ///
    /// A token-wrapped document `{"<token>": {...}}` is unwrapped first,
    /// unless the configuration sets `token_unwrap = "reject"`. Fields absent
    /// from the document are finalised as null.
    ///
    /// # Errors
    ///
    /// - `TypeDefinition` if `R` (or a nested record type) fails validation
    /// - `Decode` if the text is malformed or does not fit `R`
    pub fn create_from_text<R: RecordType>(&self, text: &str) -> Result<Instance<R>> {
        self.validate::<R>()?;
        let document: serde_json::Value =
            serde_json::from_str(text).map_err(DecodeError::Syntax)?;
        let document = codec::unwrap_token(document, self.config.token_unwrap);
        let data = codec::bind_record(self, R::schema(), TypeId::of::<R>(), document, "")?;
        debug!(target: "immutable::gateway", type_name = R::schema().name(), token = %data.token(), "instance decoded");
        Ok(Instance::from_data(data))
    }

    /// Locked instance of `R` populated by `build`
    ///
    /// The closure receives an unlocked draft and assigns fields through
    /// [`Instance::try_set`]. This is the programmatic creation path for
    /// strict record types.
    ///
    /// # Errors
    ///
    /// Returns `TypeDefinition` if `R` fails validation, or whatever error
    /// `build` returns.
    pub fn create_with<R, F>(&self, build: F) -> Result<Instance<R>>
    where
        R: RecordType,
        F: FnOnce(&mut Instance<R>) -> Result<()>,
    {
        self.validate::<R>()?;
        let mut draft = Instance::draft();
        build(&mut draft)?;
        Ok(draft.lock())
    }

    /// Decode `text` as `R`; same as [`create_from_text`](Self::create_from_text)
    pub fn deserialize<R: RecordType>(&self, text: &str) -> Result<Instance<R>> {
        self.create_from_text(text)
    }
}

/// [`Gateway::create_from_instance`] on the process-wide gateway
pub fn create_from_instance<R: RecordType>(instance: Instance<R>) -> Result<Instance<R>> {
    Gateway::global().create_from_instance(instance)
}

/// [`Gateway::create_from_text`] on the process-wide gateway
pub fn create_from_text<R: RecordType>(text: &str) -> Result<Instance<R>> {
    Gateway::global().create_from_text(text)
}

/// [`Gateway::create_with`] on the process-wide gateway
pub fn create_with<R, F>(build: F) -> Result<Instance<R>>
where
    R: RecordType,
    F: FnOnce(&mut Instance<R>) -> Result<()>,
{
    Gateway::global().create_with(build)
}

/// [`Gateway::deserialize`] on the process-wide gateway
pub fn deserialize<R: RecordType>(text: &str) -> Result<Instance<R>> {
    Gateway::global().deserialize(text)
}
