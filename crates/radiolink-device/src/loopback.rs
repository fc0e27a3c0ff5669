use std::io;
use std::sync::{Arc, Mutex, PoisonError};

use crate::traits::RadioDevice;

/// Shared record of the frames a [`LoopbackRadio`] accepted.
///
/// Clones share the same storage, so a log grabbed before the device
/// is boxed into a registry still observes every later send.
#[derive(Clone, Debug, Default)]
pub struct FrameLog {
    frames: Arc<Mutex<Vec<Vec<u8>>>>,
}

impl FrameLog {
    /// Copy of every frame accepted so far, in send order.
    pub fn snapshot(&self) -> Vec<Vec<u8>> {
        self.frames
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn len(&self) -> usize {
        self.frames
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn record(&self, frame: &[u8]) {
        self.frames
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(frame.to_vec());
    }
}

/// In-memory radio for tests and the diagnostics CLI.
///
/// Accepts every frame and records it, with optional fault injection:
/// failing outright after a number of frames, or accepting only a
/// prefix of each frame.
pub struct LoopbackRadio {
    max_frame_len: usize,
    log: FrameLog,
    sent: usize,
    fail_after: Option<usize>,
    short_accept: Option<usize>,
}

impl LoopbackRadio {
    pub const DEFAULT_FRAME_LEN: usize = 32;

    pub fn new() -> Self {
        Self::with_frame_len(Self::DEFAULT_FRAME_LEN)
    }

    pub fn with_frame_len(max_frame_len: usize) -> Self {
        Self {
            max_frame_len,
            log: FrameLog::default(),
            sent: 0,
            fail_after: None,
            short_accept: None,
        }
    }

    /// Fail every send after `frames` have been accepted.
    pub fn fail_after(mut self, frames: usize) -> Self {
        self.fail_after = Some(frames);
        self
    }

    /// Accept at most `bytes` of every frame instead of the whole frame.
    pub fn short_accept(mut self, bytes: usize) -> Self {
        self.short_accept = Some(bytes);
        self
    }

    /// Handle onto the record of accepted frames.
    pub fn log(&self) -> FrameLog {
        self.log.clone()
    }
}

impl Default for LoopbackRadio {
    fn default() -> Self {
        Self::new()
    }
}

impl RadioDevice for LoopbackRadio {
    fn max_frame_len(&self) -> usize {
        self.max_frame_len
    }

    fn send_frame(&mut self, frame: &[u8]) -> io::Result<usize> {
        if let Some(limit) = self.fail_after {
            if self.sent >= limit {
                return Err(io::Error::other("injected radio fault"));
            }
        }
        if let Some(accept) = self.short_accept {
            return Ok(accept.min(frame.len()));
        }
        self.log.record(frame);
        self.sent += 1;
        Ok(frame.len())
    }
}
