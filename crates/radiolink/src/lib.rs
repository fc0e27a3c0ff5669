//! Packet-radio transport primitives for constrained-device messaging.
//!
//! radiolink adapts the transport abstraction of a CoAP-style
//! messaging stack to a point-to-point packet radio: one named device,
//! one registered server, and a framing layer that turns message
//! buffers into trains of small radio frames.
//!
//! # Crate Structure
//!
//! - [`device`] — Named radio devices and exclusive device sessions
//! - [`frame`] — On-air frame codec and the frame transmit path
//! - [`transport`] — Endpoints, message chains, and the transport adapter

/// Re-export device types.
pub mod device {
    pub use radiolink_device::*;
}

/// Re-export frame types.
pub mod frame {
    pub use radiolink_frame::*;
}

/// Re-export transport types.
pub mod transport {
    pub use radiolink_transport::*;
}
