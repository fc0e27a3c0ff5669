use std::sync::{Arc, OnceLock};

use radiolink_device::DeviceRegistry;
use radiolink_frame::{FrameSender, RadioAddr};
use tracing::{debug, info, warn};

use crate::chain::MsgChain;
use crate::endpoint::{Endpoint, ENDPOINT_SIZE};
use crate::error::{Result, TransportError};
use crate::registry::{Transport, TransportRegistry, TransportTag};

/// Registry kind under which the radio adapter registers.
pub const RADIO_KIND: &str = "radio";

/// The single remote peer this adapter will ever talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServerDescriptor {
    pub host: u16,
    pub port: u16,
}

impl ServerDescriptor {
    pub const fn new(host: u16, port: u16) -> Self {
        Self { host, port }
    }

    pub const fn addr(&self) -> RadioAddr {
        RadioAddr::new(self.host, self.port)
    }
}

/// The registered device/server binding shared between the context and
/// the adapter the registry holds. Written once at registration, read
/// by every transmit.
struct Binding {
    devices: Arc<DeviceRegistry>,
    device_name: String,
    server: RadioAddr,
    tag: OnceLock<TransportTag>,
}

impl Binding {
    fn tag(&self) -> Result<TransportTag> {
        self.tag.get().copied().ok_or(TransportError::NotRegistered)
    }

    fn transmit(&self, chain: MsgChain) -> Result<usize> {
        let outcome = self.transmit_chain(&chain);
        match &outcome {
            Ok(sent) => {
                debug!(device = %self.device_name, bytes = sent, "unicast transmit complete");
            }
            Err(err) => {
                warn!(device = %self.device_name, error = %err, "unicast transmit failed");
            }
        }
        // `chain` drops here: segments are released on every path.
        outcome
    }

    fn transmit_chain(&self, chain: &MsgChain) -> Result<usize> {
        if chain.is_empty() {
            return Err(TransportError::InvalidChain("chain has no segments"));
        }
        let Some(endpoint) = chain.endpoint() else {
            return Err(TransportError::InvalidChain("chain carries no endpoint"));
        };
        if endpoint.tag != self.tag()? {
            return Err(TransportError::InvalidChain(
                "endpoint belongs to another transport",
            ));
        }
        if endpoint.addr != self.server {
            return Err(TransportError::PeerMismatch {
                expected: self.server,
                actual: endpoint.addr,
            });
        }

        let handle = self.devices.open(&self.device_name)?;
        let mut session = handle.acquire();
        let mut sender = FrameSender::new(&mut *session)?;
        // The session drops at scope exit, releasing the device on
        // success and on every failure path alike.
        let sent = sender.send_segments(endpoint.addr, chain.payload_segments())?;
        Ok(sent)
    }
}

/// The transport object the messaging framework holds.
struct RadioTransport {
    binding: Arc<Binding>,
}

impl Transport for RadioTransport {
    fn endpoint_size(&self) -> usize {
        ENDPOINT_SIZE
    }

    fn has_connection(&self, _endpoint: &Endpoint) -> bool {
        // The radio link is connectionless; every send is a fresh
        // frame train.
        false
    }

    fn transmit_unicast(&self, chain: MsgChain) -> Result<usize> {
        self.binding.transmit(chain)
    }

    fn stringify(&self, endpoint: &Endpoint, out: &mut [u8]) -> usize {
        endpoint.render(out)
    }

    fn init(&self) -> Result<()> {
        Ok(())
    }

    fn shutdown(&self) {
        debug!(device = %self.binding.device_name, "radio transport shut down");
    }
}

/// Handle to a registered radio transport binding.
///
/// Created by [`TransportContext::register`], at most once per
/// transport registry. There is no unregister: the registry keeps the
/// adapter for its lifetime, and dropping the context does not detach
/// it.
pub struct TransportContext {
    binding: Arc<Binding>,
    tag: TransportTag,
}

impl core::fmt::Debug for TransportContext {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TransportContext")
            .field("device", &self.binding.device_name)
            .field("tag", &self.tag)
            .finish()
    }
}

impl TransportContext {
    /// Bind `device_name` to `server` and register the adapter with
    /// the transport registry.
    ///
    /// The device is briefly acquired and released solely to validate
    /// that it exists; nothing on the device changes.
    pub fn register(
        devices: Arc<DeviceRegistry>,
        transports: &TransportRegistry,
        device_name: impl Into<String>,
        server: ServerDescriptor,
    ) -> Result<Self> {
        let device_name = device_name.into();
        {
            let handle = devices
                .open(&device_name)
                .map_err(|_| TransportError::DeviceNotFound(device_name.clone()))?;
            let _session = handle.acquire();
        }

        let binding = Arc::new(Binding {
            devices,
            device_name,
            server: server.addr(),
            tag: OnceLock::new(),
        });
        let adapter = Arc::new(RadioTransport {
            binding: Arc::clone(&binding),
        });
        let tag = transports.register(RADIO_KIND, adapter)?;
        let _ = binding.tag.set(tag);

        info!(
            device = %binding.device_name,
            server = %binding.server,
            tag,
            "radio transport registered"
        );
        Ok(Self { binding, tag })
    }

    /// Tag assigned by the transport registry.
    pub fn tag(&self) -> TransportTag {
        self.tag
    }

    pub fn device_name(&self) -> &str {
        &self.binding.device_name
    }

    pub fn server(&self) -> RadioAddr {
        self.binding.server
    }

    /// Endpoint identity of the registered server: the assigned tag,
    /// no flags set.
    pub fn server_endpoint(&self) -> Endpoint {
        Endpoint::new(self.tag, self.binding.server)
    }

    /// Like [`server_endpoint`](Self::server_endpoint), but checked
    /// against a caller-supplied tag.
    pub fn endpoint_with_tag(&self, tag: TransportTag) -> Result<Endpoint> {
        if tag != self.tag {
            return Err(TransportError::NotRegistered);
        }
        Ok(self.server_endpoint())
    }
}
