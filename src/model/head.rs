//! Chain head snapshots.

use super::identifiers::{BlockPtr, Slot};

/// Validator registry counts at a head.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValidatorCounts {
    /// Size of the registry. Drives the size of the validator set.
    pub total: u64,
    /// Active validators.
    pub active: u64,
    /// Validators waiting for activation.
    pub pending: u64,
    /// Exited validators.
    pub exited: u64,
    /// Slashed validators.
    pub slashed: u64,
}

/// Staked balances at a head, in Gwei.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StakingTotals {
    /// Sum of all effective balances.
    pub total_balance: u64,
    /// Sum of active effective balances.
    pub active_balance: u64,
}

/// An FFG checkpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Checkpoint {
    /// Checkpoint epoch.
    pub epoch: u64,
    /// Checkpoint block.
    pub root: BlockPtr,
}

/// The three FFG checkpoints a head carries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Checkpoints {
    /// Previous justified checkpoint.
    pub previous_justified: Checkpoint,
    /// Current justified checkpoint.
    pub current_justified: Checkpoint,
    /// Finalized checkpoint.
    pub finalized: Checkpoint,
}

/// Snapshot of the fork-choice head.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeadSummary {
    /// Current canonical tip.
    pub head_block: BlockPtr,
    /// Slot of the head.
    pub slot: Slot,
    /// Registry counts.
    pub validator_counts: ValidatorCounts,
    /// Staked balances.
    pub staking: StakingTotals,
    /// FFG checkpoints.
    pub checkpoints: Checkpoints,
}

impl HeadSummary {
    /// A head with only the fields layout needs; everything else zeroed.
    pub fn new(head_block: BlockPtr, slot: Slot, total_validators: u64) -> Self {
        Self {
            head_block,
            slot,
            validator_counts: ValidatorCounts {
                total: total_validators,
                ..ValidatorCounts::default()
            },
            staking: StakingTotals::default(),
            checkpoints: Checkpoints::default(),
        }
    }
}
