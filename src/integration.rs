//! Pure core integration functions.
//!
//! Glue between the stream sources, the decoder and the [`Session`]. The event loop
//! and headless replay both go through here, so everything is testable without I/O.

use crate::config::ResolvedConfig;
use crate::layout::Viewport;
use crate::model::{InputError, ParseError};
use crate::parser;
use crate::session::{Session, StreamStatus};
use crate::source::{InputSource, StreamEvent};
use crate::world::ApplyOutcome;
use std::time::Duration;

/// Tally of one batch of stream events.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchReport {
    /// Diffs applied.
    pub applied: usize,
    /// Diffs ignored as redeliveries.
    pub too_old: usize,
    /// Diffs rejected because of a gap.
    pub too_new: usize,
    /// Lines that failed to decode.
    pub decode_errors: usize,
}

impl BatchReport {
    /// Whether the batch changed what is on screen.
    pub fn changed_world(&self) -> bool {
        self.applied > 0
    }
}

/// Feed stream events into `session`, in order.
///
/// Messages are decoded and applied one at a time. Undecodable messages, including
/// lines that are not UTF-8, are counted on the session and discarded.
pub fn process_events(session: &mut Session, events: Vec<StreamEvent>) -> BatchReport {
    let mut report = BatchReport::default();
    for event in events {
        match event {
            StreamEvent::Opened => session.set_stream_status(StreamStatus::Live),
            StreamEvent::Closed => session.set_stream_status(StreamStatus::Closed),
            StreamEvent::Message { line_number, raw } => {
                match parser::parse_diff(&raw, line_number) {
                    Ok(diff) => match session.update_world(&diff) {
                        ApplyOutcome::Ok => report.applied += 1,
                        ApplyOutcome::TooOld => report.too_old += 1,
                        ApplyOutcome::TooNew => report.too_new += 1,
                    },
                    Err(err) => {
                        session.record_decode_error(&err);
                        report.decode_errors += 1;
                    }
                }
            }
            StreamEvent::Garbled { line_number } => {
                session.record_decode_error(&ParseError::InvalidUtf8 { line: line_number });
                report.decode_errors += 1;
            }
        }
    }
    report
}

/// Drain a source into a fresh session, without a terminal.
///
/// Returns once the source has closed.
///
/// # Errors
///
/// Returns `InputError::Io` if the source fails mid-stream.
pub fn replay(mut source: InputSource, config: &ResolvedConfig) -> Result<Session, InputError> {
    const IDLE_WAIT: Duration = Duration::from_millis(10);

    let mut session = Session::new(config.layout, Viewport::default());
    session.set_show_validators(config.show_validators);
    loop {
        let events = source.poll()?;
        if !events.is_empty() {
            process_events(&mut session, events);
        } else if source.is_live() {
            std::thread::sleep(IDLE_WAIT);
        } else {
            break;
        }
    }
    Ok(session)
}

/// One-line summary of a session, for headless replay.
pub fn summarize(session: &Session) -> String {
    let world = session.world();
    let head = world
        .head()
        .map(|h| format!("slot {} ({})", h.slot, h.head_block))
        .unwrap_or_else(|| "none".to_string());
    format!(
        "diffs={} head={} blocks={} attestations={} validators={} votes={} finalized={} decode_errors={}{}",
        world.next_diff_index(),
        head,
        world.block_count(),
        world.attestation_count(),
        world.validators().len(),
        world.vote_count(),
        world.finalized().len(),
        session.decode_errors(),
        if session.desynced() { " DESYNC" } else { "" },
    )
}
