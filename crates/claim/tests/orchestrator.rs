use async_trait::async_trait;
use nomen_claim::{
    AliasHandle, ClaimDraft, ClaimError, ClaimOrchestrator, ClaimOutcome, ClaimPhase, PhaseEvent,
    Readiness, SignerError, StepError, WalletSigner,
};
use nomen_client::{ClientError, NodeApi, SubmitReceipt, TxConfirmation, TxStatus};
use nomen_types::{
    AliasId, AliasName, AliasOperation, SignedTransaction, TxId, UnsignedTransaction,
};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc::UnboundedReceiver;

#[derive(Default)]
struct MockNode {
    submissions: Mutex<Vec<SignedTransaction>>,
    reject_create: bool,
    fail_transfer: bool,
}

#[async_trait]
impl NodeApi for MockNode {
    async fn submit_transaction(
        &self,
        tx: &SignedTransaction,
    ) -> Result<SubmitReceipt, ClientError> {
        let is_create = matches!(tx.tx.operation, AliasOperation::Create { .. });
        if is_create && self.reject_create {
            return Err(ClientError::ServerError {
                status: 422,
                code: "alias_taken".into(),
                message: "name already registered".into(),
            });
        }
        if !is_create && self.fail_transfer {
            return Err(ClientError::Parse("connection reset by peer".into()));
        }

        self.submissions.lock().unwrap().push(tx.clone());
        Ok(SubmitReceipt {
            tx_id: TxId::new(if is_create { "create-tx-1" } else { "transfer-tx-1" }),
            alias_id: is_create.then(|| AliasId::new("8839207574979271251")),
            status: TxStatus::Pending,
        })
    }

    async fn get_transaction(&self, tx_id: &TxId) -> Result<TxConfirmation, ClientError> {
        Ok(TxConfirmation {
            tx_id: tx_id.clone(),
            status: TxStatus::Confirmed,
            confirmations: 2,
        })
    }
}

struct MockSigner {
    reject: bool,
}

#[async_trait]
impl WalletSigner for MockSigner {
    async fn sign(&self, tx: UnsignedTransaction) -> Result<SignedTransaction, SignerError> {
        if self.reject {
            return Err(SignerError::Rejected);
        }
        Ok(SignedTransaction::new(tx, [0u8; 64]))
    }
}

fn ready_draft() -> ClaimDraft {
    ClaimDraft {
        name: "alice".into(),
        primary_public_key: "aa".repeat(32),
        secondary_public_key: "bb".repeat(32),
    }
}

fn drain(mut events: UnboundedReceiver<PhaseEvent>) -> Vec<PhaseEvent> {
    let mut collected = Vec::new();
    while let Ok(event) = events.try_recv() {
        collected.push(event);
    }
    collected
}

fn orchestrator(
    node: Arc<MockNode>,
    signer: MockSigner,
) -> (ClaimOrchestrator, UnboundedReceiver<PhaseEvent>) {
    ClaimOrchestrator::new(node, Arc::new(signer))
}

#[tokio::test]
async fn successful_run_visits_phases_in_order() {
    let node = Arc::new(MockNode::default());
    let (orchestrator, events) = orchestrator(node.clone(), MockSigner { reject: false });

    let outcome = orchestrator.run(&ready_draft()).await.unwrap();

    let (alias, tx_id) = match outcome {
        ClaimOutcome::Claimed { alias, tx_id } => (alias, tx_id),
        other => panic!("expected Claimed, got {other:?}"),
    };
    assert!(!tx_id.as_str().is_empty());
    assert_eq!(alias.name.as_str(), "alice");

    let phases: Vec<ClaimPhase> = drain(events).iter().map(|e| e.phase).collect();
    assert_eq!(
        phases,
        vec![
            ClaimPhase::CreatingAlias,
            ClaimPhase::TransferringAlias,
            ClaimPhase::Completed,
        ]
    );

    let submissions = node.submissions.lock().unwrap();
    assert_eq!(submissions.len(), 2);
    match &submissions[0].tx.operation {
        AliasOperation::Create { name, .. } => assert_eq!(name.as_str(), "alice"),
        other => panic!("first submission should register the alias, got {other:?}"),
    }
    match &submissions[1].tx.operation {
        AliasOperation::Update { alias_id, .. } => {
            assert_eq!(alias_id, &alias.alias_id);
        }
        other => panic!("second submission should update the alias, got {other:?}"),
    }
}

#[tokio::test]
async fn phase_events_carry_transaction_ids() {
    let node = Arc::new(MockNode::default());
    let (orchestrator, events) = orchestrator(node, MockSigner { reject: false });

    orchestrator.run(&ready_draft()).await.unwrap();

    let events = drain(events);
    assert_eq!(events[0].tx_id, None);
    assert_eq!(events[1].tx_id, Some(TxId::new("create-tx-1")));
    assert_eq!(events[2].tx_id, Some(TxId::new("transfer-tx-1")));
}

#[tokio::test]
async fn rejected_creation_never_submits_transfer() {
    let node = Arc::new(MockNode {
        reject_create: true,
        ..Default::default()
    });
    let (orchestrator, events) = orchestrator(node.clone(), MockSigner { reject: false });

    let err = orchestrator.run(&ready_draft()).await.unwrap_err();

    match err {
        ClaimError::CreateFailed(StepError::RejectedByNode { code, .. }) => {
            assert_eq!(code, "alias_taken");
        }
        other => panic!("expected CreateFailed rejection, got {other:?}"),
    }
    assert!(node.submissions.lock().unwrap().is_empty());

    let phases: Vec<ClaimPhase> = drain(events).iter().map(|e| e.phase).collect();
    assert_eq!(phases, vec![ClaimPhase::CreatingAlias, ClaimPhase::Failed]);
}

#[tokio::test]
async fn transfer_failure_preserves_created_alias() {
    let node = Arc::new(MockNode {
        fail_transfer: true,
        ..Default::default()
    });
    let (orchestrator, events) = orchestrator(node.clone(), MockSigner { reject: false });

    let err = orchestrator.run(&ready_draft()).await.unwrap_err();

    let alias = err.created_alias().expect("handle must survive the failure");
    assert_eq!(alias.name.as_str(), "alice");
    assert_eq!(alias.alias_id.as_str(), "8839207574979271251");
    assert!(matches!(
        err,
        ClaimError::TransferFailed {
            source: StepError::Node(_),
            ..
        }
    ));

    // The registration went through; only the update is outstanding.
    assert_eq!(node.submissions.lock().unwrap().len(), 1);

    let phases: Vec<ClaimPhase> = drain(events).iter().map(|e| e.phase).collect();
    assert_eq!(
        phases,
        vec![
            ClaimPhase::CreatingAlias,
            ClaimPhase::TransferringAlias,
            ClaimPhase::Failed,
        ]
    );
}

#[tokio::test]
async fn empty_name_trigger_has_no_effect() {
    let node = Arc::new(MockNode::default());
    let (orchestrator, events) = orchestrator(node.clone(), MockSigner { reject: false });

    let draft = ClaimDraft {
        name: String::new(),
        ..ready_draft()
    };
    let outcome = orchestrator.run(&draft).await.unwrap();

    assert_eq!(outcome, ClaimOutcome::NotReady(Readiness::WaitingForName));
    assert!(drain(events).is_empty());
    assert!(node.submissions.lock().unwrap().is_empty());
}

#[tokio::test]
async fn signer_rejection_fails_the_run() {
    let node = Arc::new(MockNode::default());
    let (orchestrator, events) = orchestrator(node.clone(), MockSigner { reject: true });

    let err = orchestrator.run(&ready_draft()).await.unwrap_err();

    assert!(matches!(
        err,
        ClaimError::CreateFailed(StepError::Signer(SignerError::Rejected))
    ));
    assert!(node.submissions.lock().unwrap().is_empty());

    let phases: Vec<ClaimPhase> = drain(events).iter().map(|e| e.phase).collect();
    assert_eq!(phases, vec![ClaimPhase::CreatingAlias, ClaimPhase::Failed]);
}

#[tokio::test]
async fn resume_transfer_skips_creation() {
    let node = Arc::new(MockNode::default());
    let (orchestrator, events) = orchestrator(node.clone(), MockSigner { reject: false });

    let handle = AliasHandle {
        alias_id: AliasId::new("8839207574979271251"),
        name: AliasName::new("alice").unwrap(),
    };
    let outcome = orchestrator
        .resume_transfer(handle.clone(), &ready_draft())
        .await
        .unwrap();

    match outcome {
        ClaimOutcome::Claimed { alias, tx_id } => {
            assert_eq!(alias, handle);
            assert_eq!(tx_id, TxId::new("transfer-tx-1"));
        }
        other => panic!("expected Claimed, got {other:?}"),
    }

    let submissions = node.submissions.lock().unwrap();
    assert_eq!(submissions.len(), 1);
    assert!(matches!(
        submissions[0].tx.operation,
        AliasOperation::Update { .. }
    ));

    let phases: Vec<ClaimPhase> = drain(events).iter().map(|e| e.phase).collect();
    assert_eq!(
        phases,
        vec![ClaimPhase::TransferringAlias, ClaimPhase::Completed]
    );
}
