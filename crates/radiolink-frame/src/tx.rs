use bytes::BytesMut;
use radiolink_device::RadioDevice;
use tracing::{debug, trace};

use crate::codec::{encode_frame, RadioAddr, HEADER_SIZE, MAX_FRAME_PAYLOAD};
use crate::error::{FrameError, Result};

/// Sends one message's payload as a train of radio frames.
///
/// Payload segments are concatenated logically before chunking, so a
/// frame fills across segment boundaries. Any frame the device rejects
/// fails the whole send; there is no partial-success result.
pub struct FrameSender<'d> {
    device: &'d mut dyn RadioDevice,
    buf: BytesMut,
    capacity: usize,
}

impl core::fmt::Debug for FrameSender<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FrameSender")
            .field("capacity", &self.capacity)
            .field("buf_len", &self.buf.len())
            .finish()
    }
}

impl<'d> FrameSender<'d> {
    /// Wrap a device, deriving the per-frame payload capacity from its
    /// frame budget.
    pub fn new(device: &'d mut dyn RadioDevice) -> Result<Self> {
        let max_frame_len = device.max_frame_len();
        if max_frame_len <= HEADER_SIZE {
            return Err(FrameError::MtuTooSmall {
                max_frame_len,
                min: HEADER_SIZE + 1,
            });
        }
        let capacity = (max_frame_len - HEADER_SIZE).min(MAX_FRAME_PAYLOAD);
        Ok(Self {
            device,
            buf: BytesMut::with_capacity(max_frame_len),
            capacity,
        })
    }

    /// Per-frame payload capacity of the underlying device.
    pub fn frame_capacity(&self) -> usize {
        self.capacity
    }

    /// Send `segments` to `dest` and return the total payload byte
    /// count accepted.
    ///
    /// An empty payload still emits one empty frame so the message
    /// boundary is signaled on the air. Every frame except the last
    /// carries the MORE flag; sequence numbers count from 0 per
    /// message, wrapping.
    pub fn send_segments<'s, I>(&mut self, dest: RadioAddr, segments: I) -> Result<usize>
    where
        I: IntoIterator<Item = &'s [u8]>,
    {
        let segments: Vec<&[u8]> = segments.into_iter().collect();
        let total: usize = segments.iter().map(|s| s.len()).sum();
        let frames = if total == 0 {
            1
        } else {
            total.div_ceil(self.capacity)
        };

        let mut pending: Vec<u8> = Vec::with_capacity(self.capacity);
        let mut emitted = 0usize;

        for segment in &segments {
            let mut rest: &[u8] = segment;
            while !rest.is_empty() {
                let take = (self.capacity - pending.len()).min(rest.len());
                pending.extend_from_slice(&rest[..take]);
                rest = &rest[take..];
                if pending.len() == self.capacity {
                    self.emit(dest, emitted as u8, emitted + 1 < frames, &pending)?;
                    emitted += 1;
                    pending.clear();
                }
            }
        }
        if !pending.is_empty() || emitted == 0 {
            self.emit(dest, emitted as u8, false, &pending)?;
            emitted += 1;
        }

        debug!(%dest, frames = emitted, bytes = total, "payload transmitted");
        Ok(total)
    }

    fn emit(&mut self, dest: RadioAddr, seq: u8, more: bool, payload: &[u8]) -> Result<()> {
        self.buf.clear();
        encode_frame(dest, seq, more, payload, &mut self.buf)?;
        let accepted = self.device.send_frame(&self.buf)?;
        if accepted != self.buf.len() {
            return Err(FrameError::Rejected {
                accepted,
                expected: self.buf.len(),
            });
        }
        trace!(seq, more, len = payload.len(), "frame sent");
        Ok(())
    }
}
