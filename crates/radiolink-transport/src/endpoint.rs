use bytes::{BufMut, BytesMut};
use radiolink_frame::RadioAddr;

use crate::registry::TransportTag;

/// Wire size of an encoded endpoint: tag (1) + flags (1) + host (2) + port (2).
pub const ENDPOINT_SIZE: usize = 6;

/// Identity of a remote peer plus the transport that owns it.
///
/// The messaging stack treats this as an opaque value of
/// [`ENDPOINT_SIZE`] bytes, stamped onto outgoing message metadata and
/// read back on transmit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Endpoint {
    /// Tag of the transport this endpoint belongs to.
    pub tag: TransportTag,
    /// Reserved; always zero.
    pub flags: u8,
    /// Peer address on the radio network.
    pub addr: RadioAddr,
}

impl Endpoint {
    pub fn new(tag: TransportTag, addr: RadioAddr) -> Self {
        Self {
            tag,
            flags: 0,
            addr,
        }
    }

    /// Encode into the fixed wire form.
    pub fn encode(&self, dst: &mut BytesMut) {
        dst.reserve(ENDPOINT_SIZE);
        dst.put_u8(self.tag);
        dst.put_u8(self.flags);
        dst.put_u16_le(self.addr.host);
        dst.put_u16_le(self.addr.port);
    }

    /// Decode from the fixed wire form; `None` if `src` is too short.
    pub fn decode(src: &[u8]) -> Option<Self> {
        if src.len() < ENDPOINT_SIZE {
            return None;
        }
        Some(Self {
            tag: src[0],
            flags: src[1],
            addr: RadioAddr::new(
                u16::from_le_bytes([src[2], src[3]]),
                u16::from_le_bytes([src[4], src[5]]),
            ),
        })
    }

    /// Render a human-readable form of the peer address into `out`,
    /// truncating to fit and always terminating with NUL inside the
    /// buffer. Returns the byte count written, excluding the
    /// terminator. Nothing is written into an empty buffer.
    pub fn render(&self, out: &mut [u8]) -> usize {
        if out.is_empty() {
            return 0;
        }
        let text = self.addr.to_string();
        let n = text.len().min(out.len() - 1);
        out[..n].copy_from_slice(&text.as_bytes()[..n]);
        out[n] = 0;
        n
    }
}
