use async_trait::async_trait;
use nomen_client::default_endpoint;
use nomen_types::{SignedTransaction, UnsignedTransaction};
use thiserror::Error;
use url::Url;

/// Errors the wallet capability can report.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SignerError {
    /// The user declined to authorize the transaction.
    #[error("wallet declined to sign the transaction")]
    Rejected,
    /// The signing key could not be used.
    #[error("signing key unavailable: {0}")]
    KeyUnavailable(String),
}

/// External wallet capability that authorizes transactions.
///
/// The claim flow never touches private key material; it hands an assembled
/// [`UnsignedTransaction`] to the signer and gets back a submittable one.
#[async_trait]
pub trait WalletSigner {
    /// Sign the transaction, or reject it.
    async fn sign(&self, tx: UnsignedTransaction) -> Result<SignedTransaction, SignerError>;

    /// The node endpoint the wallet is currently configured for, if any.
    fn node_endpoint(&self) -> Option<Url> {
        None
    }
}

/// The node endpoint a claim run should talk to: the wallet's configured
/// endpoint, falling back to the well-known default node.
pub fn resolve_endpoint(signer: &dyn WalletSigner) -> Url {
    signer.node_endpoint().unwrap_or_else(default_endpoint)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NoEndpointSigner;

    #[async_trait]
    impl WalletSigner for NoEndpointSigner {
        async fn sign(&self, _tx: UnsignedTransaction) -> Result<SignedTransaction, SignerError> {
            Err(SignerError::Rejected)
        }
    }

    struct ConfiguredSigner;

    #[async_trait]
    impl WalletSigner for ConfiguredSigner {
        async fn sign(&self, _tx: UnsignedTransaction) -> Result<SignedTransaction, SignerError> {
            Err(SignerError::Rejected)
        }

        fn node_endpoint(&self) -> Option<Url> {
            Some(Url::parse("http://localhost:9000/api/").unwrap())
        }
    }

    #[test]
    fn falls_back_to_default_endpoint() {
        assert_eq!(
            resolve_endpoint(&NoEndpointSigner).as_str(),
            nomen_client::DEFAULT_NODE_URL
        );
    }

    #[test]
    fn prefers_wallet_endpoint() {
        assert_eq!(
            resolve_endpoint(&ConfiguredSigner).as_str(),
            "http://localhost:9000/api/"
        );
    }
}
