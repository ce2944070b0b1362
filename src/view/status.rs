//! Status line under the chain canvas.

use crate::render::NodeKey;
use crate::session::Session;

/// Text for the status line. The selected node, if any, is shown last.
pub fn status_text(session: &Session, following: bool, selected: Option<NodeKey>) -> String {
    let world = session.world();
    let diff = match world.next_diff_index() {
        0 => "-".to_string(),
        next => (next - 1).to_string(),
    };
    let head = world
        .head()
        .map(|h| h.slot.to_string())
        .unwrap_or_else(|| "-".to_string());

    let mut text = format!(
        "diff {diff} | head {head} | blocks {} | atts {} | validators {} | votes {} | finalized {} | {} | errors {} | {}",
        world.block_count(),
        world.attestation_count(),
        world.validators().len(),
        world.vote_count(),
        world.finalized().len(),
        session.stream_status().as_str(),
        session.decode_errors(),
        if following { "follow" } else { "panned" },
    );
    if session.desynced() {
        text.push_str(" | DESYNC");
    }
    if let Some(key) = selected {
        text.push_str(&format!(" | {key}"));
    }
    text
}
