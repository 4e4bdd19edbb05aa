use crate::create::AliasHandle;
use crate::request::ClaimRequestError;
use crate::signer::SignerError;
use nomen_client::ClientError;
use thiserror::Error;

/// Failure of a single submission step. Steps report upward without local
/// retry; both ledger submissions are irreversible once accepted, so nothing
/// here may be answered with a blind re-submit.
#[derive(Debug, Error)]
pub enum StepError {
    #[error(transparent)]
    Signer(#[from] SignerError),
    /// The node processed the submission and refused it (name taken,
    /// insufficient fee, unknown alias, ...).
    #[error("node rejected transaction ({code}): {message}")]
    RejectedByNode { code: String, message: String },
    /// The node could not be reached or answered unintelligibly.
    #[error("node unavailable: {0}")]
    Node(ClientError),
}

impl From<ClientError> for StepError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::ServerError { code, message, .. } => {
                StepError::RejectedByNode { code, message }
            }
            other => StepError::Node(other),
        }
    }
}

/// Terminal failure of a claim run.
#[derive(Debug, Error)]
pub enum ClaimError {
    /// The draft passed the readiness gate but did not validate.
    #[error("invalid claim request: {0}")]
    InvalidRequest(#[from] ClaimRequestError),
    /// Alias creation failed; nothing was registered.
    #[error("alias creation failed: {0}")]
    CreateFailed(#[source] StepError),
    /// The alias was created but the binding transfer failed. The handle is
    /// carried here so a later run can resume from the transfer instead of
    /// re-registering the name.
    #[error("alias '{}' was created but the identity transfer failed: {source}", .alias.name)]
    TransferFailed {
        alias: AliasHandle,
        #[source]
        source: StepError,
    },
}

impl ClaimError {
    /// The alias that was successfully created before the run failed, if any.
    pub fn created_alias(&self) -> Option<&AliasHandle> {
        match self {
            ClaimError::TransferFailed { alias, .. } => Some(alias),
            _ => None,
        }
    }

    /// Single generic message shown to end users for any failure.
    pub fn user_message(&self) -> &'static str {
        "Something went wrong! Please try again and eventually inform the developer(s)"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nomen_types::{AliasId, AliasName};

    fn handle() -> AliasHandle {
        AliasHandle {
            alias_id: AliasId::new("42"),
            name: AliasName::new("alice").unwrap(),
        }
    }

    #[test]
    fn rejection_maps_from_client_error() {
        let err = ClientError::ServerError {
            status: 422,
            code: "alias_taken".into(),
            message: "name already registered".into(),
        };
        assert!(matches!(
            StepError::from(err),
            StepError::RejectedByNode { .. }
        ));
    }

    #[test]
    fn transport_maps_to_node_error() {
        let err = ClientError::Parse("connection reset".into());
        assert!(matches!(StepError::from(err), StepError::Node(_)));
    }

    #[test]
    fn transfer_failure_preserves_alias() {
        let err = ClaimError::TransferFailed {
            alias: handle(),
            source: StepError::Node(ClientError::Parse("timeout".into())),
        };
        assert_eq!(err.created_alias().unwrap().alias_id.as_str(), "42");

        let err = ClaimError::CreateFailed(StepError::Signer(SignerError::Rejected));
        assert!(err.created_alias().is_none());
    }
}
