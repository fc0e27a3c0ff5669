use radiolink_device::DeviceError;
use radiolink_frame::{FrameError, RadioAddr};

/// Errors that can occur in transport registration and transmission.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The named radio device is not present in the device registry.
    #[error("radio device {0:?} not found")]
    DeviceNotFound(String),

    /// A radio transport is already registered with this registry.
    #[error("radio transport already registered")]
    AlreadyRegistered,

    /// The transport registry has no free slots.
    #[error("transport registry full ({capacity} slots)")]
    RegistrationFailed { capacity: usize },

    /// No registration matches the presented tag.
    #[error("transport not registered")]
    NotRegistered,

    /// The destination is not the registered server.
    #[error("destination {actual} does not match registered server {expected}")]
    PeerMismatch {
        expected: RadioAddr,
        actual: RadioAddr,
    },

    /// The message chain violates a transmit precondition.
    #[error("invalid message chain: {0}")]
    InvalidChain(&'static str),

    /// The device could not be opened at transmit time.
    #[error("device unavailable: {0}")]
    DeviceUnavailable(#[from] DeviceError),

    /// The radio rejected part of the frame train.
    #[error("transmit failed: {0}")]
    TransmitFailed(#[from] FrameError),
}

pub type Result<T> = std::result::Result<T, TransportError>;
