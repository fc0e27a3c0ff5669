//! Radio device subsystem.
//!
//! Holds the driver-facing [`RadioDevice`] trait, a process-wide
//! registry of named devices, and the exclusive [`DeviceSession`]
//! used to serialize access to a radio that supports only one open
//! session at a time.
//!
//! This is the lowest layer of radiolink. Everything else builds on
//! top of the device handles provided here.

pub mod error;
pub mod loopback;
pub mod registry;
pub mod traits;

pub use error::{DeviceError, Result};
pub use loopback::{FrameLog, LoopbackRadio};
pub use registry::{DeviceHandle, DeviceRegistry, DeviceSession};
pub use traits::RadioDevice;
