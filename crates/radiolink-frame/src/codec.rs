use std::fmt;

use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::error::{FrameError, Result};

/// Frame header: magic (2) + host (2) + port (2) + seq (1) + flags (1) + len (1).
pub const HEADER_SIZE: usize = 9;

/// Magic bytes: "RF" (0x52 0x46).
pub const MAGIC: [u8; 2] = [0x52, 0x46];

/// Largest payload a single frame can carry; the length field is one byte.
pub const MAX_FRAME_PAYLOAD: usize = 255;

/// Flag bit: another frame of this message follows.
pub const FLAG_MORE: u8 = 0x01;

/// Address of a peer on the radio network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RadioAddr {
    pub host: u16,
    pub port: u16,
}

impl RadioAddr {
    pub const fn new(host: u16, port: u16) -> Self {
        Self { host, port }
    }
}

impl fmt::Display for RadioAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#06x}:{}", self.host, self.port)
    }
}

/// One on-air frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Destination peer.
    pub dest: RadioAddr,
    /// Per-message frame counter, starting at 0.
    pub seq: u8,
    /// Whether another frame of this message follows.
    pub more: bool,
    /// Frame payload.
    pub payload: Bytes,
}

impl Frame {
    pub fn new(dest: RadioAddr, seq: u8, more: bool, payload: impl Into<Bytes>) -> Self {
        Self {
            dest,
            seq,
            more,
            payload: payload.into(),
        }
    }

    /// The total wire size of this frame (header + payload).
    pub fn wire_size(&self) -> usize {
        HEADER_SIZE + self.payload.len()
    }
}

/// Encode a frame into the wire format.
///
/// Wire format:
/// ```text
/// ┌───────────┬──────────┬──────────┬──────┬───────┬──────┬─────────────┐
/// │ Magic     │ Host     │ Port     │ Seq  │ Flags │ Len  │ Payload     │
/// │ 0x52 0x46 │ (2B LE)  │ (2B LE)  │ (1B) │ (1B)  │ (1B) │ (Len bytes) │
/// └───────────┴──────────┴──────────┴──────┴───────┴──────┴─────────────┘
/// ```
///
/// Flag bit 0 is MORE; the remaining bits are reserved and written as
/// zero.
pub fn encode_frame(
    dest: RadioAddr,
    seq: u8,
    more: bool,
    payload: &[u8],
    dst: &mut BytesMut,
) -> Result<()> {
    if payload.len() > MAX_FRAME_PAYLOAD {
        return Err(FrameError::PayloadTooLarge {
            size: payload.len(),
            max: MAX_FRAME_PAYLOAD,
        });
    }
    dst.reserve(HEADER_SIZE + payload.len());
    dst.put_slice(&MAGIC);
    dst.put_u16_le(dest.host);
    dst.put_u16_le(dest.port);
    dst.put_u8(seq);
    dst.put_u8(if more { FLAG_MORE } else { 0 });
    dst.put_u8(payload.len() as u8);
    dst.put_slice(payload);
    Ok(())
}

/// Decode a frame from a buffer.
///
/// Returns `Ok(None)` if the buffer doesn't contain a complete frame
/// yet. On success, consumes the frame bytes from the buffer. Reserved
/// flag bits are ignored.
pub fn decode_frame(src: &mut BytesMut) -> Result<Option<Frame>> {
    if src.len() < HEADER_SIZE {
        return Ok(None); // Need more data
    }

    if src[0..2] != MAGIC {
        return Err(FrameError::InvalidMagic);
    }

    let host = u16::from_le_bytes([src[2], src[3]]);
    let port = u16::from_le_bytes([src[4], src[5]]);
    let seq = src[6];
    let flags = src[7];
    let payload_len = src[8] as usize;

    let total = HEADER_SIZE + payload_len;
    if src.len() < total {
        return Ok(None); // Need more data
    }

    src.advance(HEADER_SIZE);
    let payload = src.split_to(payload_len).freeze();

    Ok(Some(Frame {
        dest: RadioAddr::new(host, port),
        seq,
        more: flags & FLAG_MORE != 0,
        payload,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEST: RadioAddr = RadioAddr::new(0xAB01, 5683);

    #[test]
    fn encode_decode_roundtrip() {
        let mut buf = BytesMut::new();
        encode_frame(DEST, 3, true, b"hello, radio!", &mut buf).unwrap();

        assert_eq!(buf.len(), HEADER_SIZE + 13);

        let frame = decode_frame(&mut buf).unwrap().unwrap();
        assert_eq!(frame.dest, DEST);
        assert_eq!(frame.seq, 3);
        assert!(frame.more);
        assert_eq!(frame.payload.as_ref(), b"hello, radio!");
        assert!(buf.is_empty());
    }

    #[test]
    fn decode_incomplete_header() {
        let mut buf = BytesMut::from(&[0x52, 0x46, 0x01][..]);
        assert!(decode_frame(&mut buf).unwrap().is_none());
    }

    #[test]
    fn decode_incomplete_payload() {
        let mut buf = BytesMut::new();
        encode_frame(DEST, 0, false, b"hello", &mut buf).unwrap();
        buf.truncate(HEADER_SIZE + 2);

        assert!(decode_frame(&mut buf).unwrap().is_none());
    }

    #[test]
    fn decode_invalid_magic() {
        let mut buf = BytesMut::from(&[0xFF; HEADER_SIZE][..]);
        let result = decode_frame(&mut buf);
        assert!(matches!(result, Err(FrameError::InvalidMagic)));
    }

    #[test]
    fn encode_payload_too_large() {
        let mut buf = BytesMut::new();
        let payload = vec![0u8; MAX_FRAME_PAYLOAD + 1];
        let err = encode_frame(DEST, 0, false, &payload, &mut buf).unwrap_err();
        assert!(matches!(err, FrameError::PayloadTooLarge { size: 256, .. }));
    }

    #[test]
    fn decode_multiple_frames() {
        let mut buf = BytesMut::new();
        encode_frame(DEST, 0, true, b"first", &mut buf).unwrap();
        encode_frame(DEST, 1, false, b"second", &mut buf).unwrap();

        let f1 = decode_frame(&mut buf).unwrap().unwrap();
        assert_eq!((f1.seq, f1.more, f1.payload.as_ref()), (0, true, b"first".as_ref()));

        let f2 = decode_frame(&mut buf).unwrap().unwrap();
        assert_eq!((f2.seq, f2.more, f2.payload.as_ref()), (1, false, b"second".as_ref()));

        assert!(buf.is_empty());
    }

    #[test]
    fn empty_payload_roundtrip() {
        let mut buf = BytesMut::new();
        encode_frame(DEST, 0, false, b"", &mut buf).unwrap();

        let frame = decode_frame(&mut buf).unwrap().unwrap();
        assert!(frame.payload.is_empty());
        assert!(!frame.more);
    }

    #[test]
    fn reserved_flag_bits_ignored() {
        let mut buf = BytesMut::new();
        encode_frame(DEST, 0, false, b"x", &mut buf).unwrap();
        buf[7] = 0x80; // reserved bit set by a newer sender

        let frame = decode_frame(&mut buf).unwrap().unwrap();
        assert!(!frame.more);
    }

    #[test]
    fn frame_wire_size() {
        let frame = Frame::new(DEST, 0, false, Bytes::from_static(b"test"));
        assert_eq!(frame.wire_size(), HEADER_SIZE + 4);
    }

    #[test]
    fn addr_display() {
        assert_eq!(DEST.to_string(), "0xab01:5683");
        assert_eq!(RadioAddr::new(0x2, 1).to_string(), "0x0002:1");
    }
}
