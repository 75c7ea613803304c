//! Gateway configuration
//!
//! Loaded from TOML, every key optional:
//!
//! ```toml
//! # How a token-wrapped document is treated by create_from_text:
//! #   "detect" = unwrap {"<token>": {...}} before binding (default)
//! #   "reject" = bind the document as-is
//! token_unwrap = "detect"
//!
//! # Fail on keys the record type does not declare (default: ignore them)
//! deny_unknown_fields = false
//!
//! # Type names permitted in addition to the built-in whitelist
//! extra_allowed_types = ["Uuid"]
//! ```

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Policy for token-wrapped documents handed to `create_from_text`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenUnwrap {
    /// A single-key object whose key parses as a token is unwrapped
    #[default]
    Detect,
    /// Documents are bound as given; callers strip the wrapper themselves
    Reject,
}

/// Construction gateway configuration
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Token-wrapper policy
    #[serde(default)]
    pub token_unwrap: TokenUnwrap,
    /// Reject undeclared keys when decoding
    #[serde(default)]
    pub deny_unknown_fields: bool,
    /// Additional whitelisted type names
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extra_allowed_types: Vec<String>,
}

impl GatewayConfig {
    /// Parse config from TOML text.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if the text is not valid TOML for this shape.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| Error::config(format!("Failed to parse gateway config: {}", e)))
    }

    /// Read and parse config from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        Self::from_toml_str(&content)
    }

    /// Serialize config to TOML text.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string(self)
            .map_err(|e| Error::config(format!("Failed to serialize gateway config: {}", e)))
    }
}
