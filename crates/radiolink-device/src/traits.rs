use std::io;

/// A packet-radio device driver.
///
/// Implementations expose the hardware's frame budget and a single
/// frame-send primitive. The registry wraps every device in an
/// exclusive lock, so drivers do not need to be re-entrant.
pub trait RadioDevice: Send {
    /// Maximum on-air frame length in bytes, header included.
    fn max_frame_len(&self) -> usize;

    /// Queue one frame for transmission.
    ///
    /// Returns the number of bytes the radio accepted. Callers treat
    /// anything short of `frame.len()` as a rejection.
    fn send_frame(&mut self, frame: &[u8]) -> io::Result<usize>;
}
