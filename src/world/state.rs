//! The world-state reducer.
//!
//! `WorldState` is the authoritative projection of every block, attestation,
//! validator and vote the stream has delivered. It only changes through
//! [`WorldState::apply`], one diff at a time, strictly in diff-index order.

use super::tree::TreeIndex;
use super::validators::{CastVote, Validator, ValidatorSet};
use crate::model::{
    Attestation, AttestationPtr, AttestationSummary, Block, BlockPtr, BlockRef, DiffMessage,
    HeadSummary, PreviousCounts, ValidatorIndex,
};
use std::collections::HashMap;
use tracing::{debug, warn};

/// Result of offering a diff to the reducer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApplyOutcome {
    /// Already applied (redelivery). Safe to ignore.
    TooOld,
    /// Applied.
    Ok,
    /// A gap precedes this diff. Nothing was applied; the stream needs a resync.
    TooNew,
}

impl ApplyOutcome {
    /// Short lowercase name for logs and the status line.
    pub fn as_str(self) -> &'static str {
        match self {
            ApplyOutcome::TooOld => "too-old",
            ApplyOutcome::Ok => "ok",
            ApplyOutcome::TooNew => "too-new",
        }
    }
}

/// Running totals of everything the reducer has accepted.
///
/// Compared against a diff's [`PreviousCounts`] to spot a sender that disagrees
/// about what has been sent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeliveredCounts {
    /// Head summaries accepted.
    pub head: u64,
    /// Finalized pointers accepted.
    pub finalized: u64,
    /// Block summaries accepted.
    pub blocks: u64,
    /// Attestation summaries accepted.
    pub attestations: u64,
    /// Votes offered (including dropped ones).
    pub latest_votes: u64,
}

impl DeliveredCounts {
    fn matches(&self, previous: &PreviousCounts) -> bool {
        self.head == previous.head
            && self.finalized == previous.finalized
            && self.blocks == previous.blocks
            && self.attestations == previous.attestations
            && self.latest_votes == previous.latest_votes
    }
}

/// What happened to the entities of one applied diff.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeReport {
    /// Blocks merged into the tree.
    pub blocks: usize,
    /// Blocks skipped because they claimed the root pointer.
    pub blocks_rejected: usize,
    /// Attestations instantiated.
    pub attestations: usize,
    /// Attestation references that did not resolve.
    pub unresolved_refs: usize,
    /// Votes folded into a ring.
    pub votes_recorded: usize,
    /// Votes dropped: unknown validator or attestation, already held, or outranked by
    /// a full ring.
    pub votes_dropped: usize,
    /// Validators added by head growth.
    pub validators_added: usize,
}

/// In-memory projection of the chain as seen through the diff stream.
#[derive(Debug, Clone, Default)]
pub struct WorldState {
    next_diff_index: u64,
    heads: Vec<HeadSummary>,
    finalized: Vec<BlockPtr>,
    blocks: HashMap<BlockPtr, Block>,
    tree: TreeIndex,
    attestations: HashMap<AttestationPtr, Attestation>,
    /// Arrival order, for deterministic layout.
    attestation_order: Vec<AttestationPtr>,
    validators: ValidatorSet,
    delivered: DeliveredCounts,
    last_report: MergeReport,
}

impl WorldState {
    /// Empty world expecting diff 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Offer a diff to the reducer.
    ///
    /// Only a diff whose index equals the expected next index is applied. Anything
    /// else leaves the world untouched. Never fails.
    pub fn apply(&mut self, diff: &DiffMessage) -> ApplyOutcome {
        if self.next_diff_index < diff.diff_index {
            warn!(
                diff_index = diff.diff_index,
                expected = self.next_diff_index,
                "Diff gap detected, not applying"
            );
            return ApplyOutcome::TooNew;
        }
        if self.next_diff_index > diff.diff_index {
            debug!(
                diff_index = diff.diff_index,
                expected = self.next_diff_index,
                "Ignoring already applied diff"
            );
            return ApplyOutcome::TooOld;
        }

        if !self.delivered.matches(&diff.previous) {
            warn!(
                diff_index = diff.diff_index,
                sender = ?diff.previous,
                local = ?self.delivered,
                "Sender totals disagree with local totals"
            );
        }

        let mut report = MergeReport::default();
        self.merge_heads(diff, &mut report);
        self.merge_blocks(diff, &mut report);
        self.merge_attestations(diff, &mut report);
        self.merge_votes(diff, &mut report);

        self.next_diff_index = diff.diff_index + 1;
        self.last_report = report;
        debug!(
            diff_index = diff.diff_index,
            blocks = report.blocks,
            attestations = report.attestations,
            votes = report.votes_recorded,
            dropped_votes = report.votes_dropped,
            "Diff applied"
        );
        ApplyOutcome::Ok
    }

    fn merge_heads(&mut self, diff: &DiffMessage, report: &mut MergeReport) {
        self.heads.extend(diff.head.iter().copied());
        self.finalized.extend(diff.finalized.iter().copied());
        self.delivered.head += diff.head.len() as u64;
        self.delivered.finalized += diff.finalized.len() as u64;

        if let Some(max_total) = diff.head.iter().map(|h| h.validator_counts.total).max() {
            report.validators_added = self.validators.grow_to(max_total);
        }
    }

    fn merge_blocks(&mut self, diff: &DiffMessage, report: &mut MergeReport) {
        for summary in &diff.blocks {
            if summary.self_ptr.is_root() {
                warn!(
                    diff_index = diff.diff_index,
                    slot = %summary.slot,
                    "Skipping block that claims the root pointer"
                );
                report.blocks_rejected += 1;
                continue;
            }
            self.tree
                .insert_block(summary.self_ptr, summary.parent, summary.slot);
            self.blocks
                .insert(summary.self_ptr, Block::from_summary(summary));
            report.blocks += 1;
        }
        self.delivered.blocks += diff.blocks.len() as u64;
    }

    fn merge_attestations(&mut self, diff: &DiffMessage, report: &mut MergeReport) {
        for summary in &diff.attestations {
            let attestation = self.instantiate_attestation(summary);
            report.unresolved_refs += [attestation.head(), attestation.target(), attestation.source()]
                .iter()
                .filter(|r| r.resolved().is_none())
                .count();
            if self
                .attestations
                .insert(summary.self_ptr, attestation)
                .is_none()
            {
                self.attestation_order.push(summary.self_ptr);
            }
            report.attestations += 1;
        }
        self.delivered.attestations += diff.attestations.len() as u64;
    }

    fn instantiate_attestation(&self, summary: &AttestationSummary) -> Attestation {
        Attestation::new(
            summary.self_ptr,
            summary.slot,
            summary.committee_index,
            self.resolve(summary.head),
            self.resolve(summary.target),
            self.resolve(summary.source),
        )
    }

    fn resolve(&self, ptr: BlockPtr) -> BlockRef {
        if self.blocks.contains_key(&ptr) {
            BlockRef::Resolved(ptr)
        } else {
            BlockRef::Unresolved(ptr)
        }
    }

    fn merge_votes(&mut self, diff: &DiffMessage, report: &mut MergeReport) {
        for vote in &diff.latest_votes {
            let Some(attestation) = self.attestations.get(&vote.attestation_ptr) else {
                debug!(
                    validator = %vote.validator_index,
                    attestation = %vote.attestation_ptr,
                    "Dropping vote for unknown attestation"
                );
                report.votes_dropped += 1;
                continue;
            };
            let target_slot = attestation
                .target()
                .resolved()
                .and_then(|ptr| self.blocks.get(&ptr))
                .map(Block::slot)
                .unwrap_or_else(|| attestation.slot());
            let cast = CastVote {
                attestation: vote.attestation_ptr,
                target_slot,
            };
            if self.validators.record_vote(vote.validator_index, cast) {
                report.votes_recorded += 1;
            } else {
                debug!(
                    validator = %vote.validator_index,
                    attestation = %vote.attestation_ptr,
                    "Dropping vote for unknown validator, repeated attestation or full ring"
                );
                report.votes_dropped += 1;
            }
        }
        self.delivered.latest_votes += diff.latest_votes.len() as u64;
    }

    // ===== Queries =====

    /// Index the next applied diff must carry.
    pub fn next_diff_index(&self) -> u64 {
        self.next_diff_index
    }

    /// Current head, the last summary received.
    pub fn head(&self) -> Option<&HeadSummary> {
        self.heads.last()
    }

    /// Every head summary received, oldest first.
    pub fn heads(&self) -> &[HeadSummary] {
        &self.heads
    }

    /// Every finalized pointer received, oldest first.
    pub fn finalized(&self) -> &[BlockPtr] {
        &self.finalized
    }

    /// Look up a delivered block.
    pub fn block(&self, ptr: BlockPtr) -> Option<&Block> {
        self.blocks.get(&ptr)
    }

    /// Look up an attestation.
    pub fn attestation(&self, ptr: AttestationPtr) -> Option<&Attestation> {
        self.attestations.get(&ptr)
    }

    /// Look up a validator.
    pub fn validator(&self, index: ValidatorIndex) -> Option<&Validator> {
        self.validators.get(index)
    }

    /// The derived block tree.
    pub fn tree(&self) -> &TreeIndex {
        &self.tree
    }

    /// The validator registry.
    pub fn validators(&self) -> &ValidatorSet {
        &self.validators
    }

    /// Attestations in arrival order.
    pub fn attestations(&self) -> impl Iterator<Item = &Attestation> {
        self.attestation_order
            .iter()
            .filter_map(|ptr| self.attestations.get(ptr))
    }

    /// Delivered blocks, in no particular order.
    pub fn blocks(&self) -> impl Iterator<Item = &Block> {
        self.blocks.values()
    }

    /// Number of delivered blocks.
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// Number of attestations.
    pub fn attestation_count(&self) -> usize {
        self.attestations.len()
    }

    /// Total votes held across all validators.
    pub fn vote_count(&self) -> usize {
        self.validators.iter().map(|v| v.votes().len()).sum()
    }

    /// Running totals of accepted entities.
    pub fn delivered(&self) -> DeliveredCounts {
        self.delivered
    }

    /// Report of the most recent successful apply.
    pub fn last_report(&self) -> MergeReport {
        self.last_report
    }
}
