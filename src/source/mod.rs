//! Diff stream sources.
//!
//! This module provides the transport side of the visualizer:
//! - File loading for read-once replay of a recorded stream
//! - Stdin for a live piped stream, read on a background thread
//! - Unified InputSource enum for both
//!
//! Sources hand out raw lines tagged with their 1-based line number. Decoding happens
//! in [`crate::parser`], so a malformed line never stops the stream.

use crate::model::error::InputError;
use std::path::PathBuf;

pub mod file;
pub mod stdin;

pub use file::FileSource;
pub use stdin::StdinSource;

/// Something that happened on the stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    /// The stream is open. Emitted once, before any message.
    Opened,
    /// One non-blank line.
    Message {
        /// 1-based line number in the stream.
        line_number: usize,
        /// Line content without the trailing newline.
        raw: String,
    },
    /// A line that is not valid UTF-8. Reported and discarded; the stream goes on.
    Garbled {
        /// 1-based line number in the stream.
        line_number: usize,
    },
    /// The stream ended. Emitted once; nothing follows it.
    Closed,
}

/// Turn one raw line into an event. Blank lines yield nothing.
fn line_event(line_number: usize, mut bytes: Vec<u8>) -> Option<StreamEvent> {
    while matches!(bytes.last(), Some(b'\n' | b'\r')) {
        bytes.pop();
    }
    match String::from_utf8(bytes) {
        Ok(raw) if raw.trim().is_empty() => None,
        Ok(raw) => Some(StreamEvent::Message { line_number, raw }),
        Err(_) => Some(StreamEvent::Garbled { line_number }),
    }
}

/// Unified diff stream source.
///
/// Sum type enforces exactly one variant.
#[derive(Debug)]
pub enum InputSource {
    /// Recorded stream, read once.
    File(FileSource),
    /// Piped stdin, read incrementally.
    Stdin(StdinSource),
}

impl InputSource {
    /// Poll for new events. Never blocks.
    ///
    /// # Behavior:
    /// - File: every event on first call, empty vec after
    /// - Stdin: incremental as data arrives
    ///
    /// # Errors
    ///
    /// Returns `InputError::Io` when the underlying reader fails.
    pub fn poll(&mut self) -> Result<Vec<StreamEvent>, InputError> {
        match self {
            InputSource::File(f) => Ok(f.drain_events()),
            InputSource::Stdin(s) => s.poll(),
        }
    }

    /// Whether more events may still arrive.
    pub fn is_live(&self) -> bool {
        match self {
            InputSource::File(f) => !f.is_drained(),
            InputSource::Stdin(s) => !s.is_complete(),
        }
    }
}

/// Detect and create the appropriate input source.
///
/// # Logic:
/// 1. If a file path is provided: create FileSource (loads on construction)
/// 2. Else, if stdin is piped: use StdinSource
/// 3. Else: return InputError::NoInput
///
/// # Errors
///
/// Returns `InputError::NoInput` if no file is provided and stdin is a terminal.
/// Returns `InputError::FileNotFound` if the file does not exist.
/// Returns `InputError::Io` for I/O errors during file reading.
pub fn detect_input_source(file: Option<PathBuf>) -> Result<InputSource, InputError> {
    match file {
        Some(path) => Ok(InputSource::File(FileSource::new(path)?)),
        None => Ok(InputSource::Stdin(StdinSource::new()?)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::IsTerminal;
    use std::time::{Duration, Instant};

    fn poll_until_closed(source: &mut InputSource) -> Vec<StreamEvent> {
        let deadline = Instant::now() + Duration::from_secs(5);
        let mut events = Vec::new();
        while source.is_live() && Instant::now() < deadline {
            events.extend(source.poll().unwrap());
            std::thread::sleep(Duration::from_millis(5));
        }
        events
    }

    #[test]
    fn file_source_drains_once() {
        let test_file = std::env::temp_dir().join("chainviz_source_mod_drain.jsonl");
        std::fs::write(&test_file, "{\"diffIndex\":0}\n").unwrap();

        let mut source = detect_input_source(Some(test_file.clone())).unwrap();
        let _ = std::fs::remove_file(&test_file);

        assert!(source.is_live());
        let first = source.poll().unwrap();
        assert_eq!(first.len(), 3);
        assert!(!source.is_live());
        assert!(source.poll().unwrap().is_empty());
    }

    #[test]
    fn stdin_variant_streams_from_reader() {
        let reader = std::io::Cursor::new(b"{\"diffIndex\":0}\n".to_vec());
        let mut source = InputSource::Stdin(StdinSource::from_reader(reader));

        let events = poll_until_closed(&mut source);
        assert_eq!(
            events,
            vec![
                StreamEvent::Opened,
                StreamEvent::Message {
                    line_number: 1,
                    raw: "{\"diffIndex\":0}".into()
                },
                StreamEvent::Closed,
            ]
        );
    }

    #[test]
    fn line_event_strips_line_endings() {
        assert_eq!(
            line_event(4, b"{}\r\n".to_vec()),
            Some(StreamEvent::Message {
                line_number: 4,
                raw: "{}".into()
            })
        );
        assert_eq!(line_event(5, b"  \n".to_vec()), None);
        assert_eq!(
            line_event(6, b"\xff\xfe\n".to_vec()),
            Some(StreamEvent::Garbled { line_number: 6 })
        );
    }

    #[test]
    fn detect_returns_file_not_found_for_missing_file() {
        let missing = std::env::temp_dir().join("chainviz_nonexistent_12345.jsonl");
        let result = detect_input_source(Some(missing.clone()));
        match result {
            Err(InputError::FileNotFound { path }) => assert_eq!(path, missing),
            other => panic!("expected FileNotFound, got {other:?}"),
        }
    }

    #[test]
    fn detect_returns_no_input_when_stdin_is_tty() {
        if std::io::stdin().is_terminal() {
            assert!(matches!(
                detect_input_source(None),
                Err(InputError::NoInput)
            ));
        }
    }
}
