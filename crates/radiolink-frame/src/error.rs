/// Errors that can occur during frame encoding or transmission.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// The device's frame budget cannot hold a header plus payload.
    #[error("device frame length too small ({max_frame_len} bytes, need {min})")]
    MtuTooSmall { max_frame_len: usize, min: usize },

    /// The payload exceeds what a single frame can carry.
    #[error("frame payload too large ({size} bytes, max {max})")]
    PayloadTooLarge { size: usize, max: usize },

    /// The frame header contains an invalid magic number.
    #[error("invalid frame magic (expected 0x5246 \"RF\")")]
    InvalidMagic,

    /// The radio accepted fewer bytes than the frame holds.
    #[error("radio rejected frame ({accepted} of {expected} bytes accepted)")]
    Rejected { accepted: usize, expected: usize },

    /// An I/O error occurred while handing a frame to the radio.
    #[error("radio I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, FrameError>;
