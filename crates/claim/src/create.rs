use crate::errors::StepError;
use crate::request::ClaimRequest;
use crate::signer::WalletSigner;
use nomen_client::{NodeApi, SubmitReceipt};
use nomen_types::{AliasId, AliasName, AliasOperation, TxId, UnsignedTransaction};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::info;

/// Reference to an alias registered during a claim run.
///
/// Produced by [`AliasCreator`]; never mutated afterwards. The transfer step
/// is only ever invoked with a handle from a successful creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasHandle {
    pub alias_id: AliasId,
    pub name: AliasName,
}

/// Submits the name-registration transaction.
pub struct AliasCreator {
    node: Arc<dyn NodeApi + Send + Sync>,
    signer: Arc<dyn WalletSigner + Send + Sync>,
}

impl AliasCreator {
    pub fn new(
        node: Arc<dyn NodeApi + Send + Sync>,
        signer: Arc<dyn WalletSigner + Send + Sync>,
    ) -> Self {
        Self { node, signer }
    }

    /// Register the requested name under the claiming account.
    ///
    /// Returns the handle of the new alias and the registration transaction
    /// id. Any failure surfaces as a single [`StepError`]; no local retry.
    pub async fn create(&self, request: &ClaimRequest) -> Result<(AliasHandle, TxId), StepError> {
        let operation = AliasOperation::Create {
            name: request.name.clone(),
            metadata: request.binding_metadata(),
        };
        let tx = UnsignedTransaction::new(request.primary_public_key, operation, now_ms());
        let receipt = sign_and_submit(&*self.node, &*self.signer, tx).await?;

        let alias_id = receipt.alias_id.ok_or_else(|| StepError::RejectedByNode {
            code: "missing_alias_id".into(),
            message: "node accepted the registration but returned no alias id".into(),
        })?;

        info!(alias_id = %alias_id, name = %request.name, tx_id = %receipt.tx_id, "alias created");
        Ok((
            AliasHandle {
                alias_id,
                name: request.name.clone(),
            },
            receipt.tx_id,
        ))
    }
}

/// Sign a transaction with the wallet capability and submit it to the node.
pub(crate) async fn sign_and_submit(
    node: &(dyn NodeApi + Send + Sync),
    signer: &(dyn WalletSigner + Send + Sync),
    tx: UnsignedTransaction,
) -> Result<SubmitReceipt, StepError> {
    let signed = signer.sign(tx).await?;
    let receipt = node.submit_transaction(&signed).await?;
    Ok(receipt)
}

pub(crate) fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}
