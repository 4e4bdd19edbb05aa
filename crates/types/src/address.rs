use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a Nomen address string.
#[derive(Debug, thiserror::Error)]
pub enum AddressError {
    #[error("address must start with 'n'")]
    InvalidPrefix,
    #[error("address must be {expected} characters, got {actual}")]
    InvalidLength { expected: usize, actual: usize },
    #[error("address payload is not valid hexadecimal")]
    InvalidHex(#[from] hex::FromHexError),
    #[error("address payload must be exactly 32 bytes")]
    InvalidPayloadLength,
}

/// Number of raw bytes contained in an account identifier.
pub const ACCOUNT_ID_BYTES: usize = 32;
/// Expected string length of an encoded address (prefix + 64 hex chars).
pub const ADDRESS_STRING_LENGTH: usize = 1 + ACCOUNT_ID_BYTES * 2;

/// Derive the 32-byte account identifier from a raw public key.
///
/// The account id is the blake3 hash of the key bytes, so any key scheme the
/// ledger accepts maps onto the same address space.
pub fn account_id_from_public_key(public_key: &[u8]) -> [u8; ACCOUNT_ID_BYTES] {
    *blake3::hash(public_key).as_bytes()
}

/// Encode a 32-byte account identifier into the human readable Nomen format.
///
/// The encoded address always begins with the character `n` followed by the
/// hexadecimal representation of the raw bytes.
pub fn encode_address(bytes: &[u8; ACCOUNT_ID_BYTES]) -> String {
    let mut encoded = String::with_capacity(ADDRESS_STRING_LENGTH);
    encoded.push('n');
    encoded.push_str(&hex::encode(bytes));
    encoded
}

/// Attempt to decode a human readable Nomen address string into the raw bytes.
pub fn decode_address(address: &str) -> Result<[u8; ACCOUNT_ID_BYTES], AddressError> {
    if !address.starts_with('n') {
        return Err(AddressError::InvalidPrefix);
    }

    if address.len() != ADDRESS_STRING_LENGTH {
        return Err(AddressError::InvalidLength {
            expected: ADDRESS_STRING_LENGTH,
            actual: address.len(),
        });
    }

    let payload = &address[1..];
    let decoded = hex::decode(payload)?;

    let bytes: [u8; ACCOUNT_ID_BYTES] = decoded
        .try_into()
        .map_err(|_| AddressError::InvalidPayloadLength)?;

    Ok(bytes)
}

/// Check whether the provided string is a valid Nomen address.
pub fn is_valid_address(address: &str) -> bool {
    decode_address(address).is_ok()
}

/// Convenience wrapper for serialising/deserialising addresses as strings in JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Address(pub [u8; ACCOUNT_ID_BYTES]);

impl Address {
    /// Address of the account controlling the given public key.
    pub fn from_public_key(public_key: &[u8]) -> Self {
        Address(account_id_from_public_key(public_key))
    }
}

impl From<[u8; ACCOUNT_ID_BYTES]> for Address {
    fn from(value: [u8; ACCOUNT_ID_BYTES]) -> Self {
        Address(value)
    }
}

impl From<Address> for String {
    fn from(value: Address) -> Self {
        encode_address(&value.0)
    }
}

impl std::fmt::Display for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&encode_address(&self.0))
    }
}

impl TryFrom<String> for Address {
    type Error = AddressError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        decode_address(&value).map(Address)
    }
}
