use nomen_types::TxId;

/// Progress marker for a claim run.
///
/// Advances strictly forward; `Completed` and `Failed` are terminal, and a
/// new claim starts a fresh run rather than resuming.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClaimPhase {
    Idle,
    CreatingAlias,
    TransferringAlias,
    Completed,
    Failed,
}

impl ClaimPhase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, ClaimPhase::Completed | ClaimPhase::Failed)
    }
}

impl std::fmt::Display for ClaimPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ClaimPhase::Idle => "idle",
            ClaimPhase::CreatingAlias => "creating alias",
            ClaimPhase::TransferringAlias => "queueing alias transfer",
            ClaimPhase::Completed => "completed",
            ClaimPhase::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// A single phase transition, published on the orchestrator's event channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhaseEvent {
    pub phase: ClaimPhase,
    /// The transaction id attached to the transition, once one exists.
    pub tx_id: Option<TxId>,
}
