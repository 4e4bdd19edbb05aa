use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Fee charged for registering a new alias, in atomic units.
pub const ALIAS_CREATE_FEE: u64 = 20_000_000;
/// Fee charged for updating an alias record, in atomic units.
pub const ALIAS_UPDATE_FEE: u64 = 2_000_000;

/// Maximum length of an alias name.
pub const ALIAS_NAME_MAX_LEN: usize = 100;

/// Opaque identifier the node assigns to a registered alias.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AliasId(pub String);

impl AliasId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for AliasId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Errors raised when validating an alias name.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AliasNameError {
    #[error("alias name must not be empty")]
    Empty,
    #[error("alias name must be at most {ALIAS_NAME_MAX_LEN} characters, got {0}")]
    TooLong(usize),
    #[error("alias name may only contain ASCII letters, digits and '_': {0:?}")]
    InvalidCharacter(char),
}

/// A validated, ledger-acceptable alias name.
///
/// The node enforces the same rules server-side; validating here avoids
/// spending a fee on a transaction the node is guaranteed to reject.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AliasName(String);

impl AliasName {
    pub fn new(name: impl Into<String>) -> Result<Self, AliasNameError> {
        let name = name.into();
        if name.is_empty() {
            return Err(AliasNameError::Empty);
        }
        if name.len() > ALIAS_NAME_MAX_LEN {
            return Err(AliasNameError::TooLong(name.len()));
        }
        if let Some(bad) = name
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || *c == '_'))
        {
            return Err(AliasNameError::InvalidCharacter(bad));
        }
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for AliasName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<AliasName> for String {
    fn from(value: AliasName) -> Self {
        value.0
    }
}

impl TryFrom<String> for AliasName {
    type Error = AliasNameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        AliasName::new(value)
    }
}

/// The identity record stored inside an alias: the ledger address and the
/// social-network public key bound together under the claimed name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct AliasMetadata {
    pub account_address: String,
    pub social_public_key: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, String>,
}

impl AliasMetadata {
    pub fn new(account_address: impl Into<String>, social_public_key: impl Into<String>) -> Self {
        Self {
            account_address: account_address.into(),
            social_public_key: social_public_key.into(),
            extra: BTreeMap::new(),
        }
    }

    /// Canonical JSON form of the record as written on-chain.
    ///
    /// Field order is fixed by the struct and `extra` is a BTreeMap, so the
    /// output is deterministic for a given record.
    pub fn to_record(&self) -> String {
        serde_json::to_string(self).expect("alias metadata serializes to JSON")
    }
}

/// Structured payload describing an alias-specific transaction operation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AliasOperation {
    /// Register a new alias name under the sending account.
    Create {
        name: AliasName,
        metadata: AliasMetadata,
    },
    /// Replace the record payload of an existing alias.
    Update {
        alias_id: AliasId,
        metadata: AliasMetadata,
    },
}

impl AliasOperation {
    /// Fee the ledger charges for this operation, in atomic units.
    pub fn fee(&self) -> u64 {
        match self {
            AliasOperation::Create { .. } => ALIAS_CREATE_FEE,
            AliasOperation::Update { .. } => ALIAS_UPDATE_FEE,
        }
    }

    /// The metadata record carried by the operation.
    pub fn metadata(&self) -> &AliasMetadata {
        match self {
            AliasOperation::Create { metadata, .. } => metadata,
            AliasOperation::Update { metadata, .. } => metadata,
        }
    }
}
