//! Read-once file source for recorded diff streams.

use super::{line_event, StreamEvent};
use crate::model::error::InputError;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// A recorded stream loaded into memory at construction.
///
/// The first poll yields `Opened`, every non-blank line, then `Closed`. Later polls
/// yield nothing. A line that is not UTF-8 becomes [`StreamEvent::Garbled`] without
/// affecting its neighbours.
#[derive(Debug)]
pub struct FileSource {
    path: PathBuf,
    pending: Option<Vec<StreamEvent>>,
}

impl FileSource {
    /// Load `path`.
    ///
    /// # Errors
    ///
    /// Returns `InputError::FileNotFound` if the file does not exist.
    /// Returns `InputError::Io` for other I/O errors.
    pub fn new(path: impl AsRef<Path>) -> Result<Self, InputError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(InputError::FileNotFound {
                path: path.to_path_buf(),
            });
        }

        let content = fs::read(path)?;
        let mut events = vec![StreamEvent::Opened];
        events.extend(
            content
                .split(|byte| *byte == b'\n')
                .enumerate()
                .filter_map(|(i, line)| line_event(i + 1, line.to_vec())),
        );
        events.push(StreamEvent::Closed);
        info!(path = %path.display(), messages = events.len() - 2, "Loaded diff file");

        Ok(Self {
            path: path.to_path_buf(),
            pending: Some(events),
        })
    }

    /// Take every event. Empty after the first call.
    pub fn drain_events(&mut self) -> Vec<StreamEvent> {
        self.pending.take().unwrap_or_default()
    }

    /// Whether the events have been taken.
    pub fn is_drained(&self) -> bool {
        self.pending.is_none()
    }

    /// Path the stream was loaded from.
    pub fn path(&self) -> &Path {
        &self.path
    }
}
