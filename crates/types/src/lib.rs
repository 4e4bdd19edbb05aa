//! Core data model for the Nomen ledger.
//!
//! Addresses, alias operations and the transaction envelope shared by the
//! node client, the claim flow and the CLI.

pub mod address;
pub mod alias;
pub mod transaction;

pub use address::{
    account_id_from_public_key, decode_address, encode_address, is_valid_address, Address,
    AddressError, ACCOUNT_ID_BYTES, ADDRESS_STRING_LENGTH,
};
pub use alias::{
    AliasId, AliasMetadata, AliasName, AliasNameError, AliasOperation, ALIAS_CREATE_FEE,
    ALIAS_UPDATE_FEE,
};
pub use transaction::{SignedTransaction, TransactionError, TxId, UnsignedTransaction};
