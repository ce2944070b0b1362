//! The visualizer session: world, layout and scene kept in step.
//!
//! A [`Session`] is the single writer of its world state. Every accepted diff is
//! followed by a full layout recompute and redraw; rejected diffs change nothing.
//! Embedders that share a session across threads must wrap it in one exclusive lock.

use crate::layout::{Layout, LayoutParams, Point, Viewport};
use crate::model::{
    Attestation, AttestationPtr, Block, BlockPtr, DiffMessage, ParseError, ValidatorIndex,
};
use crate::render::{draw_relations, NodeKey, RelationOptions, RenderSurface, Scene};
use crate::world::{ApplyOutcome, Validator, WorldState};
use tracing::{debug, info, warn};

/// Connection state of the diff stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StreamStatus {
    /// Waiting for the stream to open.
    #[default]
    Connecting,
    /// Stream open, messages flowing.
    Live,
    /// Stream ended.
    Closed,
}

impl StreamStatus {
    /// Short label for the status line.
    pub fn as_str(self) -> &'static str {
        match self {
            StreamStatus::Connecting => "connecting",
            StreamStatus::Live => "live",
            StreamStatus::Closed => "closed",
        }
    }
}

type ClickObserver = Box<dyn FnMut(NodeKey)>;

/// World state plus everything derived from it for display.
pub struct Session {
    world: WorldState,
    layout: Layout,
    scene: Scene,
    options: RelationOptions,
    stream: StreamStatus,
    desynced: bool,
    decode_errors: usize,
    last_outcome: Option<ApplyOutcome>,
    click_observer: Option<ClickObserver>,
}

impl Session {
    /// Empty session.
    pub fn new(params: LayoutParams, viewport: Viewport) -> Self {
        Self {
            world: WorldState::new(),
            layout: Layout::new(params, viewport),
            scene: Scene::new(),
            options: RelationOptions::default(),
            stream: StreamStatus::default(),
            desynced: false,
            decode_errors: 0,
            last_outcome: None,
            click_observer: None,
        }
    }

    /// Apply a decoded diff. On success the layout and scene are rebuilt.
    ///
    /// A gap marks the session as desynchronised; it stays that way.
    pub fn update_world(&mut self, diff: &DiffMessage) -> ApplyOutcome {
        let outcome = self.world.apply(diff);
        self.last_outcome = Some(outcome);
        match outcome {
            ApplyOutcome::Ok => self.refresh(),
            ApplyOutcome::TooOld => {}
            ApplyOutcome::TooNew => {
                if !self.desynced {
                    warn!(
                        diff_index = diff.diff_index,
                        expected = self.world.next_diff_index(),
                        "Stream desynchronised; later diffs cannot be applied"
                    );
                }
                self.desynced = true;
            }
        }
        debug!(diff_index = diff.diff_index, outcome = outcome.as_str(), "Diff offered");
        outcome
    }

    /// Record a message that could not be decoded. The message is discarded.
    pub fn record_decode_error(&mut self, error: &ParseError) {
        self.decode_errors += 1;
        warn!(line = error.line(), error = %error, "Discarding undecodable message");
    }

    /// Recompute layout and redraw.
    pub fn refresh(&mut self) {
        self.layout.recompute(&self.world);
        let report = draw_relations(&self.world, &self.layout, &mut self.scene, self.options);
        debug!(
            nodes_created = report.nodes_created,
            lines = report.lines,
            "Scene redrawn"
        );
    }

    /// Resize the target surface and redraw.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        if self.layout.viewport() != viewport {
            self.layout.set_viewport(viewport);
            self.refresh();
        }
    }

    /// Show or hide validators and their votes.
    pub fn set_show_validators(&mut self, show: bool) {
        if self.options.show_validators != show {
            self.options.show_validators = show;
            self.refresh();
        }
    }

    /// Whether validators are drawn.
    pub fn show_validators(&self) -> bool {
        self.options.show_validators
    }

    /// Update the stream state.
    pub fn set_stream_status(&mut self, status: StreamStatus) {
        if self.stream != status {
            info!(from = self.stream.as_str(), to = status.as_str(), "Stream state changed");
            self.stream = status;
        }
    }

    /// Resolve a click on the surface to a node, notify the observer, and log it.
    pub fn node_clicked(&mut self, point: Point) -> Option<NodeKey> {
        let key = self.scene.hit_test(point)?;
        info!(node = %key, "Node clicked");
        if let Some(observer) = self.click_observer.as_mut() {
            observer(key);
        }
        Some(key)
    }

    /// Register the click observer, replacing any previous one.
    pub fn on_node_clicked(&mut self, observer: impl FnMut(NodeKey) + 'static) {
        self.click_observer = Some(Box::new(observer));
    }

    /// Look up a block.
    pub fn block(&self, ptr: BlockPtr) -> Option<&Block> {
        self.world.block(ptr)
    }

    /// Look up an attestation.
    pub fn attestation(&self, ptr: AttestationPtr) -> Option<&Attestation> {
        self.world.attestation(ptr)
    }

    /// Look up a validator.
    pub fn validator(&self, index: ValidatorIndex) -> Option<&Validator> {
        self.world.validator(index)
    }

    /// The world state.
    pub fn world(&self) -> &WorldState {
        &self.world
    }

    /// The current layout.
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// The current scene.
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Stream state.
    pub fn stream_status(&self) -> StreamStatus {
        self.stream
    }

    /// Whether a gap has been seen.
    pub fn desynced(&self) -> bool {
        self.desynced
    }

    /// Messages discarded because they did not decode.
    pub fn decode_errors(&self) -> usize {
        self.decode_errors
    }

    /// Outcome of the most recent diff.
    pub fn last_outcome(&self) -> Option<ApplyOutcome> {
        self.last_outcome
    }
}
