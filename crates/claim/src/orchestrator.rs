use crate::create::{AliasCreator, AliasHandle};
use crate::errors::ClaimError;
use crate::phase::{ClaimPhase, PhaseEvent};
use crate::request::{ClaimDraft, Readiness};
use crate::signer::{resolve_endpoint, WalletSigner};
use crate::transfer::AliasTransferor;
use nomen_client::NodeApi;
use nomen_types::TxId;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{info, warn};

/// How a claim run ended without error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClaimOutcome {
    /// The trigger had no effect: the draft was not ready, the state never
    /// left `Idle` and no transaction was submitted.
    NotReady(Readiness),
    /// Both submissions were accepted by the node.
    Claimed { alias: AliasHandle, tx_id: TxId },
}

/// State machine driving one claim run: alias creation, then the identity
/// transfer, strictly in that order.
///
/// The phase is owned here and transitioned only by the run itself; every
/// transition is published on the event channel handed out at construction.
/// `run` and `resume_transfer` consume the orchestrator, so a terminal state
/// can never be re-entered — a new claim needs a fresh orchestrator.
///
/// "Completed" means both transactions were accepted by the node, not that
/// they are settled; settlement tracking is the caller's business via
/// [`nomen_client::NodeClient::wait_for_confirmation`].
pub struct ClaimOrchestrator {
    node: Arc<dyn NodeApi + Send + Sync>,
    signer: Arc<dyn WalletSigner + Send + Sync>,
    phase: ClaimPhase,
    events: mpsc::UnboundedSender<PhaseEvent>,
}

impl ClaimOrchestrator {
    /// Build an orchestrator for a single run, along with the receiving end
    /// of its phase-event stream. The UI is just one possible subscriber.
    pub fn new(
        node: Arc<dyn NodeApi + Send + Sync>,
        signer: Arc<dyn WalletSigner + Send + Sync>,
    ) -> (Self, mpsc::UnboundedReceiver<PhaseEvent>) {
        let (events, receiver) = mpsc::unbounded_channel();
        (
            Self {
                node,
                signer,
                phase: ClaimPhase::Idle,
                events,
            },
            receiver,
        )
    }

    /// Current phase of the run.
    pub fn phase(&self) -> ClaimPhase {
        self.phase
    }

    /// Execute the full claim sequence for the draft.
    ///
    /// A draft that is not [`Readiness::ReadyToClaim`] leaves the state at
    /// `Idle` and returns [`ClaimOutcome::NotReady`] — the trigger is gated,
    /// not failed. Once `CreatingAlias` is entered the run proceeds to either
    /// `Completed` or `Failed`; there is no mid-flight abort and no retry.
    pub async fn run(mut self, draft: &ClaimDraft) -> Result<ClaimOutcome, ClaimError> {
        let readiness = draft.readiness();
        if readiness != Readiness::ReadyToClaim {
            return Ok(ClaimOutcome::NotReady(readiness));
        }
        let request = draft.to_request(resolve_endpoint(&*self.signer))?;

        self.advance(ClaimPhase::CreatingAlias, None);
        let creator = AliasCreator::new(self.node.clone(), self.signer.clone());
        let (alias, create_tx_id) = match creator.create(&request).await {
            Ok(created) => created,
            Err(err) => {
                warn!(name = %request.name, error = %err, "alias creation failed");
                self.advance(ClaimPhase::Failed, None);
                return Err(ClaimError::CreateFailed(err));
            }
        };

        self.advance(ClaimPhase::TransferringAlias, Some(create_tx_id));
        self.finish_transfer(alias, &request).await
    }

    /// Finish a partially completed claim: the alias already exists, only the
    /// identity transfer is outstanding. The handle usually comes from
    /// [`ClaimError::created_alias`] on a previous run.
    pub async fn resume_transfer(
        mut self,
        alias: AliasHandle,
        draft: &ClaimDraft,
    ) -> Result<ClaimOutcome, ClaimError> {
        let readiness = draft.readiness();
        if readiness != Readiness::ReadyToClaim {
            return Ok(ClaimOutcome::NotReady(readiness));
        }
        let request = draft.to_request(resolve_endpoint(&*self.signer))?;

        self.advance(ClaimPhase::TransferringAlias, None);
        self.finish_transfer(alias, &request).await
    }

    async fn finish_transfer(
        mut self,
        alias: AliasHandle,
        request: &crate::request::ClaimRequest,
    ) -> Result<ClaimOutcome, ClaimError> {
        let transferor = AliasTransferor::new(self.node.clone(), self.signer.clone());
        match transferor.transfer(&alias, request).await {
            Ok(tx_id) => {
                self.advance(ClaimPhase::Completed, Some(tx_id.clone()));
                info!(name = %alias.name, tx_id = %tx_id, "claim completed");
                Ok(ClaimOutcome::Claimed { alias, tx_id })
            }
            Err(err) => {
                warn!(
                    alias_id = %alias.alias_id,
                    error = %err,
                    "transfer failed after successful creation"
                );
                self.advance(ClaimPhase::Failed, None);
                Err(ClaimError::TransferFailed { alias, source: err })
            }
        }
    }

    fn advance(&mut self, phase: ClaimPhase, tx_id: Option<TxId>) {
        self.phase = phase;
        // Subscribers may have gone away; the run does not depend on them.
        let _ = self.events.send(PhaseEvent { phase, tx_id });
    }
}
