//! Radio transport adapter for constrained-device messaging.
//!
//! This is the layer a CoAP-style messaging stack talks to. It binds a
//! named radio device to a single remote server, registers itself with
//! the stack's transport registry, and moves opaque message buffers
//! onto the air through the framing layer below.
//!
//! Registration happens once at startup via
//! [`TransportContext::register`]; every outbound message then flows
//! through [`Transport::transmit_unicast`], which acquires the device
//! for the scope of one send and consumes the message chain on every
//! path.

pub mod chain;
pub mod context;
pub mod endpoint;
pub mod error;
pub mod registry;

pub use chain::MsgChain;
pub use context::{ServerDescriptor, TransportContext, RADIO_KIND};
pub use endpoint::{Endpoint, ENDPOINT_SIZE};
pub use error::{Result, TransportError};
pub use registry::{Transport, TransportRegistry, TransportTag, MAX_TRANSPORTS};
