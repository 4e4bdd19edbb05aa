//! Claim orchestration for the Nomen alias flow.
//!
//! Claiming a name is two dependent, irreversible ledger submissions: first a
//! registration that creates the alias, then an update that writes the bound
//! identities into its record. The ledger settles neither atomically, so this
//! crate drives the pair as an explicit state machine, reports every phase
//! transition over a channel, and keeps the created-alias fact observable
//! when the second step fails.

pub mod create;
pub mod errors;
pub mod orchestrator;
pub mod phase;
pub mod request;
pub mod signer;
pub mod transfer;

pub use create::{AliasCreator, AliasHandle};
pub use errors::{ClaimError, StepError};
pub use orchestrator::{ClaimOrchestrator, ClaimOutcome};
pub use phase::{ClaimPhase, PhaseEvent};
pub use request::{ClaimDraft, ClaimRequest, ClaimRequestError, Readiness};
pub use signer::{resolve_endpoint, SignerError, WalletSigner};
pub use transfer::AliasTransferor;
