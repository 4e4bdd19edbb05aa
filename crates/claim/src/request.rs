use nomen_types::{
    account_id_from_public_key, encode_address, AliasMetadata, AliasName, AliasNameError,
};
use thiserror::Error;
use url::Url;

/// What the claim flow is waiting on before it may be triggered.
///
/// Exactly one case holds for any draft: no name yet, name but incomplete
/// keys, or everything present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Readiness {
    /// No name has been chosen.
    WaitingForName,
    /// A name exists but at least one public key is missing.
    WaitingForConnection,
    /// Name and both keys are present; the claim may be triggered.
    ReadyToClaim,
}

/// Caller-side claim input, filled in incrementally during onboarding.
///
/// Keys are hex-encoded; empty strings mean "not supplied yet".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClaimDraft {
    pub name: String,
    /// Hex-encoded ledger account public key (ed25519).
    pub primary_public_key: String,
    /// Hex-encoded social-network public key.
    pub secondary_public_key: String,
}

impl ClaimDraft {
    /// The readiness predicate gating the claim trigger.
    pub fn readiness(&self) -> Readiness {
        if self.name.is_empty() {
            Readiness::WaitingForName
        } else if self.primary_public_key.is_empty() || self.secondary_public_key.is_empty() {
            Readiness::WaitingForConnection
        } else {
            Readiness::ReadyToClaim
        }
    }

    /// Validate the draft into an immutable request bound to a node endpoint.
    pub fn to_request(&self, node_endpoint: Url) -> Result<ClaimRequest, ClaimRequestError> {
        let readiness = self.readiness();
        if readiness != Readiness::ReadyToClaim {
            return Err(ClaimRequestError::NotReady(readiness));
        }
        let name = AliasName::new(self.name.clone())?;
        let primary = decode_key(&self.primary_public_key, "primary")?;
        let secondary = decode_key(&self.secondary_public_key, "secondary")?;
        Ok(ClaimRequest {
            name,
            primary_public_key: primary,
            secondary_public_key: secondary,
            node_endpoint,
        })
    }
}

fn decode_key(hex_key: &str, which: &'static str) -> Result<[u8; 32], ClaimRequestError> {
    let bytes = hex::decode(hex_key).map_err(|_| ClaimRequestError::InvalidKey { which })?;
    bytes
        .try_into()
        .map_err(|_| ClaimRequestError::InvalidKey { which })
}

/// Errors raised while validating a draft into a [`ClaimRequest`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ClaimRequestError {
    #[error("claim is not ready to be triggered: {0:?}")]
    NotReady(Readiness),
    #[error(transparent)]
    Name(#[from] AliasNameError),
    #[error("{which} public key is not a 32-byte hex string")]
    InvalidKey { which: &'static str },
}

/// A validated claim request. Immutable once handed to the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimRequest {
    pub name: AliasName,
    pub primary_public_key: [u8; 32],
    pub secondary_public_key: [u8; 32],
    pub node_endpoint: Url,
}

impl ClaimRequest {
    /// The identity record both submissions carry: the ledger address derived
    /// from the primary key, bound to the hex-encoded secondary key.
    pub fn binding_metadata(&self) -> AliasMetadata {
        let address = encode_address(&account_id_from_public_key(&self.primary_public_key));
        AliasMetadata::new(address, hex::encode(self.secondary_public_key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ready_draft() -> ClaimDraft {
        ClaimDraft {
            name: "alice".into(),
            primary_public_key: "aa".repeat(32),
            secondary_public_key: "bb".repeat(32),
        }
    }

    fn endpoint() -> Url {
        Url::parse("http://localhost:8081/api/").unwrap()
    }

    #[test]
    fn readiness_waits_for_name_first() {
        let draft = ClaimDraft::default();
        assert_eq!(draft.readiness(), Readiness::WaitingForName);

        let draft = ClaimDraft {
            primary_public_key: "aa".repeat(32),
            secondary_public_key: "bb".repeat(32),
            ..Default::default()
        };
        assert_eq!(draft.readiness(), Readiness::WaitingForName);
    }

    #[test]
    fn readiness_waits_for_either_missing_key() {
        let mut draft = ready_draft();
        draft.primary_public_key.clear();
        assert_eq!(draft.readiness(), Readiness::WaitingForConnection);

        let mut draft = ready_draft();
        draft.secondary_public_key.clear();
        assert_eq!(draft.readiness(), Readiness::WaitingForConnection);
    }

    #[test]
    fn readiness_ready_when_all_present() {
        assert_eq!(ready_draft().readiness(), Readiness::ReadyToClaim);
    }

    #[test]
    fn to_request_rejects_unready_draft() {
        let err = ClaimDraft::default().to_request(endpoint()).unwrap_err();
        assert_eq!(
            err,
            ClaimRequestError::NotReady(Readiness::WaitingForName)
        );
    }

    #[test]
    fn to_request_rejects_bad_keys() {
        let mut draft = ready_draft();
        draft.primary_public_key = "zz".into();
        assert_eq!(
            draft.to_request(endpoint()).unwrap_err(),
            ClaimRequestError::InvalidKey { which: "primary" }
        );

        let mut draft = ready_draft();
        draft.secondary_public_key = "cc".repeat(16);
        assert_eq!(
            draft.to_request(endpoint()).unwrap_err(),
            ClaimRequestError::InvalidKey { which: "secondary" }
        );
    }

    #[test]
    fn to_request_rejects_invalid_name() {
        let mut draft = ready_draft();
        draft.name = "al ice".into();
        assert!(matches!(
            draft.to_request(endpoint()).unwrap_err(),
            ClaimRequestError::Name(_)
        ));
    }

    #[test]
    fn binding_metadata_derives_address() {
        let request = ready_draft().to_request(endpoint()).unwrap();
        let metadata = request.binding_metadata();
        assert!(metadata.account_address.starts_with('n'));
        assert_eq!(metadata.social_public_key, "bb".repeat(32));
    }
}
