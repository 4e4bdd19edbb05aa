use crate::alias::AliasOperation;
use ed25519_dalek::{Signature, VerifyingKey};
use serde::{Deserialize, Serialize};
use serde_bytes;
use thiserror::Error;

/// Node-assigned transaction identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TxId(pub String);

impl TxId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TxId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Errors raised when assembling or verifying a transaction.
#[derive(Debug, Error)]
pub enum TransactionError {
    #[error("sender public key is not a valid ed25519 key")]
    InvalidPublicKey,
    #[error("transaction signature does not verify against the sender key")]
    InvalidSignature,
}

/// An alias transaction before the wallet has authorized it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnsignedTransaction {
    /// Raw ed25519 public key of the sending account.
    pub sender_public_key: [u8; 32],
    /// The alias operation being submitted.
    pub operation: AliasOperation,
    /// Fee in atomic units.
    pub fee: u64,
    /// Milliseconds since UNIX_EPOCH at assembly time.
    pub timestamp_ms: u64,
}

impl UnsignedTransaction {
    pub fn new(sender_public_key: [u8; 32], operation: AliasOperation, timestamp_ms: u64) -> Self {
        let fee = operation.fee();
        Self {
            sender_public_key,
            operation,
            fee,
            timestamp_ms,
        }
    }

    /// Canonical byte string the wallet signs.
    pub fn signing_payload(&self) -> Vec<u8> {
        let operation = serde_json::to_vec(&self.operation).expect("operation serializes to JSON");
        let mut payload =
            Vec::with_capacity(self.sender_public_key.len() + operation.len() + 8 + 8);
        payload.extend_from_slice(&self.sender_public_key);
        payload.extend_from_slice(&operation);
        payload.extend_from_slice(&self.fee.to_be_bytes());
        payload.extend_from_slice(&self.timestamp_ms.to_be_bytes());
        payload
    }

    /// Content hash of the unsigned transaction.
    pub fn hash(&self) -> [u8; 32] {
        *blake3::hash(&self.signing_payload()).as_bytes()
    }
}

/// A wallet-authorized transaction ready for submission to a node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedTransaction {
    #[serde(flatten)]
    pub tx: UnsignedTransaction,
    /// Ed25519 signature over `tx.signing_payload()`.
    #[serde(with = "serde_bytes")]
    pub signature: [u8; 64],
}

impl SignedTransaction {
    pub fn new(tx: UnsignedTransaction, signature: [u8; 64]) -> Self {
        Self { tx, signature }
    }

    /// Verify the signature against the embedded sender key.
    pub fn verify(&self) -> Result<(), TransactionError> {
        let key = VerifyingKey::from_bytes(&self.tx.sender_public_key)
            .map_err(|_| TransactionError::InvalidPublicKey)?;
        let signature = Signature::from_bytes(&self.signature);
        key.verify_strict(&self.tx.signing_payload(), &signature)
            .map_err(|_| TransactionError::InvalidSignature)
    }
}
