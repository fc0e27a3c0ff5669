/// Errors that can occur in device registry operations.
#[derive(Debug, thiserror::Error)]
pub enum DeviceError {
    /// No device is registered under the requested name.
    #[error("no radio device named {name:?}")]
    NotFound { name: String },

    /// A device with this name is already registered.
    #[error("radio device {name:?} already registered")]
    AlreadyExists { name: String },
}

pub type Result<T> = std::result::Result<T, DeviceError>;
