use bytes::Bytes;

use crate::endpoint::Endpoint;

/// One outbound message: an ordered run of buffer segments.
///
/// The first segment is the upper protocol's header and is never
/// transmitted over the air; the remaining segments are payload. The
/// destination endpoint travels with the chain as metadata, stamped
/// when the message is addressed.
///
/// Transmission takes the chain by value: it is consumed on every
/// path, success or failure, so callers cannot touch it afterward.
#[derive(Debug, Default)]
pub struct MsgChain {
    endpoint: Option<Endpoint>,
    segments: Vec<Bytes>,
}

impl MsgChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a chain from its header segment.
    pub fn with_header(header: impl Into<Bytes>) -> Self {
        Self {
            endpoint: None,
            segments: vec![header.into()],
        }
    }

    /// Append a segment to the chain.
    pub fn push_segment(&mut self, segment: impl Into<Bytes>) {
        self.segments.push(segment.into());
    }

    /// Stamp the destination endpoint onto the chain.
    pub fn set_endpoint(&mut self, endpoint: Endpoint) {
        self.endpoint = Some(endpoint);
    }

    pub fn endpoint(&self) -> Option<Endpoint> {
        self.endpoint
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// The header segment, if the chain has any segments.
    pub fn header(&self) -> Option<&Bytes> {
        self.segments.first()
    }

    /// Payload segments, header excluded.
    pub fn payload_segments(&self) -> impl Iterator<Item = &[u8]> + '_ {
        self.segments.iter().skip(1).map(|segment| segment.as_ref())
    }

    /// Total payload byte count, header excluded.
    pub fn payload_len(&self) -> usize {
        self.payload_segments().map(<[u8]>::len).sum()
    }
}
