//! On-air framing for radiolink.
//!
//! Every message payload travels as a train of small radio frames:
//! - A 2-byte magic number ("RF") for frame synchronization
//! - The 4-byte destination address (host + port, little-endian)
//! - A per-message sequence number and a MORE continuation flag
//! - A 1-byte payload length
//!
//! [`FrameSender`] turns an ordered run of payload segments into as
//! many frames as the device's frame budget requires.

pub mod codec;
pub mod error;
pub mod tx;

pub use codec::{
    decode_frame, encode_frame, Frame, RadioAddr, FLAG_MORE, HEADER_SIZE, MAGIC, MAX_FRAME_PAYLOAD,
};
pub use error::{FrameError, Result};
pub use tx::FrameSender;
