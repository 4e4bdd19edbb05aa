use crate::create::{now_ms, sign_and_submit, AliasHandle};
use crate::errors::StepError;
use crate::request::ClaimRequest;
use crate::signer::WalletSigner;
use nomen_client::NodeApi;
use nomen_types::{AliasOperation, TxId, UnsignedTransaction};
use std::sync::Arc;
use tracing::info;

/// Submits the alias-update transaction that writes the bound identities
/// into the created alias record.
pub struct AliasTransferor {
    node: Arc<dyn NodeApi + Send + Sync>,
    signer: Arc<dyn WalletSigner + Send + Sync>,
}

impl AliasTransferor {
    pub fn new(
        node: Arc<dyn NodeApi + Send + Sync>,
        signer: Arc<dyn WalletSigner + Send + Sync>,
    ) -> Self {
        Self { node, signer }
    }

    /// Attach the identity binding to an alias created earlier in the run.
    ///
    /// The node may not have propagated the registration yet; in that case it
    /// rejects the update and the rejection surfaces unchanged. Error
    /// conditions otherwise mirror [`crate::AliasCreator::create`].
    pub async fn transfer(
        &self,
        handle: &AliasHandle,
        request: &ClaimRequest,
    ) -> Result<TxId, StepError> {
        let operation = AliasOperation::Update {
            alias_id: handle.alias_id.clone(),
            metadata: request.binding_metadata(),
        };
        let tx = UnsignedTransaction::new(request.primary_public_key, operation, now_ms());
        let receipt = sign_and_submit(&*self.node, &*self.signer, tx).await?;

        info!(alias_id = %handle.alias_id, tx_id = %receipt.tx_id, "alias binding submitted");
        Ok(receipt.tx_id)
    }
}
