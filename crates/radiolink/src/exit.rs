use std::fmt;

use radiolink_device::DeviceError;
use radiolink_frame::FrameError;
use radiolink_transport::TransportError;

pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1;
pub const TRANSPORT_ERROR: i32 = 3;
pub const DATA_INVALID: i32 = 60;
pub const USAGE: i32 = 64;
pub const INTERNAL: i32 = 125;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

pub fn device_error(context: &str, err: DeviceError) -> CliError {
    CliError::new(FAILURE, format!("{context}: {err}"))
}

pub fn frame_error(context: &str, err: FrameError) -> CliError {
    match err {
        FrameError::Io(_) | FrameError::Rejected { .. } => {
            CliError::new(TRANSPORT_ERROR, format!("{context}: {err}"))
        }
        FrameError::PayloadTooLarge { .. } | FrameError::MtuTooSmall { .. } => {
            CliError::new(DATA_INVALID, format!("{context}: {err}"))
        }
        other => CliError::new(INTERNAL, format!("{context}: {other}")),
    }
}

pub fn transport_error(context: &str, err: TransportError) -> CliError {
    match err {
        TransportError::InvalidChain(_) | TransportError::PeerMismatch { .. } => {
            CliError::new(DATA_INVALID, format!("{context}: {err}"))
        }
        TransportError::DeviceNotFound(_) | TransportError::DeviceUnavailable(_) => {
            CliError::new(FAILURE, format!("{context}: {err}"))
        }
        TransportError::TransmitFailed(inner) => frame_error(context, inner),
        other => CliError::new(INTERNAL, format!("{context}: {other}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transmit_io_failure_maps_to_transport_code() {
        let err = TransportError::TransmitFailed(FrameError::Io(std::io::Error::other("rf")));
        assert_eq!(transport_error("send", err).code, TRANSPORT_ERROR);
    }

    #[test]
    fn peer_mismatch_maps_to_data_invalid() {
        let err = TransportError::InvalidChain("empty");
        assert_eq!(transport_error("send", err).code, DATA_INVALID);
    }

    #[test]
    fn missing_device_maps_to_failure() {
        let err = TransportError::DeviceNotFound("radio9".to_string());
        assert_eq!(transport_error("send", err).code, FAILURE);
    }
}
