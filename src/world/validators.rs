//! Validator registry and per-validator latest votes.

use crate::model::{AttestationPtr, Slot, ValidatorIndex};
use tracing::warn;

/// How many votes each validator keeps.
pub const VOTES_PER_VALIDATOR: usize = 3;

/// Upper bound on the registry size. A head claiming more validators is clamped
/// here instead of allocating whatever the wire says.
pub const MAX_VALIDATORS: usize = 1 << 22;

/// A vote folded into a validator's ring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CastVote {
    /// Attestation carrying the vote.
    pub attestation: AttestationPtr,
    /// Sort key: slot of the attestation's target.
    pub target_slot: Slot,
}

/// One validator and its most recent votes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Validator {
    index: ValidatorIndex,
    votes: Vec<CastVote>,
}

impl Validator {
    fn new(index: ValidatorIndex) -> Self {
        Self {
            index,
            votes: Vec::new(),
        }
    }

    /// Registry index.
    pub fn index(&self) -> ValidatorIndex {
        self.index
    }

    /// Up to [`VOTES_PER_VALIDATOR`] votes, highest target slot first.
    pub fn votes(&self) -> &[CastVote] {
        &self.votes
    }

    /// Fold a vote in. Returns `false` when the attestation is already held or the
    /// vote ranks below a full ring.
    fn record_vote(&mut self, vote: CastVote) -> bool {
        if self.votes.iter().any(|v| v.attestation == vote.attestation) {
            return false;
        }
        // Stable on ties: among equal target slots the newest arrival goes first.
        let position = self
            .votes
            .iter()
            .position(|v| v.target_slot <= vote.target_slot)
            .unwrap_or(self.votes.len());
        if position >= VOTES_PER_VALIDATOR {
            return false;
        }
        self.votes.insert(position, vote);
        self.votes.truncate(VOTES_PER_VALIDATOR);
        true
    }
}

/// Grow-only set of validators, indexed densely from zero.
#[derive(Debug, Clone)]
pub struct ValidatorSet {
    validators: Vec<Validator>,
    limit: usize,
}

impl Default for ValidatorSet {
    fn default() -> Self {
        Self::with_limit(MAX_VALIDATORS)
    }
}

impl ValidatorSet {
    /// Empty set capped at [`MAX_VALIDATORS`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty set that never grows past `limit`.
    pub fn with_limit(limit: usize) -> Self {
        Self {
            validators: Vec::new(),
            limit,
        }
    }

    /// Grow to `total` validators, clamped to the set's limit. Never shrinks.
    ///
    /// Returns the number of validators added.
    pub fn grow_to(&mut self, total: u64) -> usize {
        let before = self.validators.len();
        let requested = usize::try_from(total).unwrap_or(usize::MAX);
        let target = requested.min(self.limit);
        if target < requested {
            warn!(
                requested = total,
                limit = self.limit,
                "Validator count exceeds limit, clamping"
            );
        }
        if target <= before {
            return 0;
        }
        self.validators
            .extend((before..target).map(|i| Validator::new(ValidatorIndex::new(i as u64))));
        target - before
    }

    /// Number of validators.
    pub fn len(&self) -> usize {
        self.validators.len()
    }

    /// Whether there are no validators.
    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }

    /// Look up a validator.
    pub fn get(&self, index: ValidatorIndex) -> Option<&Validator> {
        usize::try_from(index.get())
            .ok()
            .and_then(|i| self.validators.get(i))
    }

    /// Fold a vote into a validator's ring.
    ///
    /// Returns `false` when the validator is unknown or already holds the vote.
    pub fn record_vote(&mut self, index: ValidatorIndex, vote: CastVote) -> bool {
        let Some(validator) = usize::try_from(index.get())
            .ok()
            .and_then(|i| self.validators.get_mut(i))
        else {
            return false;
        };
        validator.record_vote(vote)
    }

    /// All validators in index order.
    pub fn iter(&self) -> impl Iterator<Item = &Validator> {
        self.validators.iter()
    }
}
