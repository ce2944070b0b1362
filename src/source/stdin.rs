//! Stdin-based source for a live piped stream.
//!
//! Lines are read on a background thread and handed to the consumer over an mpsc
//! channel, so [`StdinSource::poll`] never blocks the event loop. Lines travel as
//! bytes; a line that is not UTF-8 is reported on its own and reading continues.

use super::{line_event, StreamEvent};
use crate::model::error::InputError;
use std::io::{self, BufRead, BufReader, IsTerminal, Read};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;
use tracing::{debug, warn};

#[derive(Debug)]
enum ReaderMessage {
    Line(Vec<u8>),
    Eof,
    Failed(io::Error),
}

/// Piped stdin (or any reader) consumed on a background thread.
#[derive(Debug)]
pub struct StdinSource {
    rx: Receiver<ReaderMessage>,
    opened: bool,
    complete: bool,
    line_number: usize,
    /// Read failure held back until the events before it have been handed out.
    failure: Option<io::Error>,
}

impl StdinSource {
    /// Start reading stdin.
    ///
    /// # Errors
    ///
    /// Returns `InputError::NoInput` if stdin is an interactive terminal, so the
    /// front end never sits waiting on keyboard input that is not a stream.
    pub fn new() -> Result<Self, InputError> {
        let stdin = io::stdin();
        if stdin.is_terminal() {
            return Err(InputError::NoInput);
        }
        Ok(Self::from_reader(stdin))
    }

    /// Start reading an arbitrary reader.
    pub fn from_reader<R: Read + Send + 'static>(reader: R) -> Self {
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let mut reader = BufReader::new(reader);
            loop {
                let mut buffer = Vec::new();
                let message = match reader.read_until(b'\n', &mut buffer) {
                    Ok(0) => ReaderMessage::Eof,
                    Ok(_) => ReaderMessage::Line(buffer),
                    Err(e) => ReaderMessage::Failed(e),
                };
                let last = !matches!(message, ReaderMessage::Line(_));
                if tx.send(message).is_err() || last {
                    break;
                }
            }
        });

        Self {
            rx,
            opened: false,
            complete: false,
            line_number: 0,
            failure: None,
        }
    }

    /// Collect whatever the reader thread has produced so far.
    ///
    /// # Errors
    ///
    /// Returns `InputError::Io` if the reader failed. Events read before the failure
    /// are returned first; the error comes on the following poll. The source is
    /// complete afterwards.
    pub fn poll(&mut self) -> Result<Vec<StreamEvent>, InputError> {
        if let Some(e) = self.failure.take() {
            return Err(InputError::Io(e));
        }
        let mut events = Vec::new();
        if self.complete {
            return Ok(events);
        }
        if !self.opened {
            self.opened = true;
            events.push(StreamEvent::Opened);
        }

        loop {
            match self.rx.try_recv() {
                Ok(ReaderMessage::Line(bytes)) => {
                    self.line_number += 1;
                    events.extend(line_event(self.line_number, bytes));
                }
                Ok(ReaderMessage::Eof) => {
                    debug!(lines = self.line_number, "Stdin reached EOF");
                    self.complete = true;
                    events.push(StreamEvent::Closed);
                    break;
                }
                Ok(ReaderMessage::Failed(e)) => {
                    warn!(error = %e, "Stdin read failed");
                    self.complete = true;
                    if events.is_empty() {
                        return Err(InputError::Io(e));
                    }
                    self.failure = Some(e);
                    break;
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    self.complete = true;
                    events.push(StreamEvent::Closed);
                    break;
                }
            }
        }
        Ok(events)
    }

    /// Whether EOF has been reached (no more data will arrive).
    pub fn is_complete(&self) -> bool {
        self.complete
    }
}
