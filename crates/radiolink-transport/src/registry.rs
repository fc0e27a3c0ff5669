use std::sync::{Arc, Mutex, PoisonError};

use tracing::info;

use crate::chain::MsgChain;
use crate::endpoint::Endpoint;
use crate::error::{Result, TransportError};

/// Tag the registry assigns to a transport at registration.
pub type TransportTag = u8;

/// Registry capacity, mirroring the small fixed transport table of
/// constrained messaging stacks.
pub const MAX_TRANSPORTS: usize = 8;

/// The operations a messaging framework requires from an underlying
/// transport.
///
/// The framework holds the registered trait object for its entire
/// lifetime and invokes these at arbitrary future times.
pub trait Transport: Send + Sync {
    /// Fixed byte size of one endpoint identity; callers reserve this
    /// much storage in message metadata.
    fn endpoint_size(&self) -> usize;

    /// Whether a persistent connection to `endpoint` exists.
    fn has_connection(&self, endpoint: &Endpoint) -> bool;

    /// Transmit one message to a single peer.
    ///
    /// The chain is consumed on every path; failure is observable only
    /// through the returned error.
    fn transmit_unicast(&self, chain: MsgChain) -> Result<usize>;

    /// Write a human-readable rendering of `endpoint` into `out`,
    /// truncated and NUL-terminated within bounds. Returns the byte
    /// count written, excluding the terminator.
    fn stringify(&self, endpoint: &Endpoint, out: &mut [u8]) -> usize;

    /// Idempotent transport-level setup.
    fn init(&self) -> Result<()>;

    /// Idempotent transport-level teardown.
    fn shutdown(&self);
}

struct Slot {
    kind: &'static str,
    transport: Arc<dyn Transport>,
}

/// Registry of transports, standing in for the upper messaging stack.
///
/// Tags are slot indexes. At most one transport of a given kind may
/// register; that is how the exactly-once radio registration invariant
/// is enforced.
#[derive(Default)]
pub struct TransportRegistry {
    slots: Mutex<Vec<Slot>>,
}

impl TransportRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a transport and return its tag.
    pub fn register(
        &self,
        kind: &'static str,
        transport: Arc<dyn Transport>,
    ) -> Result<TransportTag> {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        if slots.iter().any(|slot| slot.kind == kind) {
            return Err(TransportError::AlreadyRegistered);
        }
        if slots.len() >= MAX_TRANSPORTS {
            return Err(TransportError::RegistrationFailed {
                capacity: MAX_TRANSPORTS,
            });
        }
        let tag = slots.len() as TransportTag;
        slots.push(Slot { kind, transport });
        info!(kind, tag, "transport registered");
        Ok(tag)
    }

    /// Look up a transport by its tag.
    pub fn transport_for(&self, tag: TransportTag) -> Option<Arc<dyn Transport>> {
        let slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        slots.get(tag as usize).map(|slot| Arc::clone(&slot.transport))
    }

    /// Dispatch a transmit on the chain's endpoint tag.
    pub fn transmit(&self, chain: MsgChain) -> Result<usize> {
        let Some(endpoint) = chain.endpoint() else {
            return Err(TransportError::InvalidChain("chain carries no endpoint"));
        };
        let transport = self
            .transport_for(endpoint.tag)
            .ok_or(TransportError::NotRegistered)?;
        transport.transmit_unicast(chain)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use radiolink_frame::RadioAddr;

    use super::*;

    #[derive(Default)]
    struct CountingTransport {
        transmits: AtomicUsize,
    }

    impl Transport for CountingTransport {
        fn endpoint_size(&self) -> usize {
            crate::endpoint::ENDPOINT_SIZE
        }

        fn has_connection(&self, _endpoint: &Endpoint) -> bool {
            false
        }

        fn transmit_unicast(&self, chain: MsgChain) -> Result<usize> {
            self.transmits.fetch_add(1, Ordering::SeqCst);
            Ok(chain.payload_len())
        }

        fn stringify(&self, endpoint: &Endpoint, out: &mut [u8]) -> usize {
            endpoint.render(out)
        }

        fn init(&self) -> Result<()> {
            Ok(())
        }

        fn shutdown(&self) {}
    }

    #[test]
    fn tags_are_assigned_in_order() {
        let registry = TransportRegistry::new();
        let a = registry
            .register("alpha", Arc::new(CountingTransport::default()))
            .unwrap();
        let b = registry
            .register("beta", Arc::new(CountingTransport::default()))
            .unwrap();
        assert_eq!((a, b), (0, 1));
        assert!(registry.transport_for(a).is_some());
        assert!(registry.transport_for(9).is_none());
    }

    #[test]
    fn duplicate_kind_rejected() {
        let registry = TransportRegistry::new();
        registry
            .register("radio", Arc::new(CountingTransport::default()))
            .unwrap();

        let err = registry
            .register("radio", Arc::new(CountingTransport::default()))
            .unwrap_err();
        assert!(matches!(err, TransportError::AlreadyRegistered));
    }

    #[test]
    fn capacity_is_enforced() {
        const KINDS: [&str; 9] = [
            "k0", "k1", "k2", "k3", "k4", "k5", "k6", "k7", "k8",
        ];
        let registry = TransportRegistry::new();
        for kind in KINDS.iter().take(MAX_TRANSPORTS).copied() {
            registry
                .register(kind, Arc::new(CountingTransport::default()))
                .unwrap();
        }

        let err = registry
            .register(KINDS[MAX_TRANSPORTS], Arc::new(CountingTransport::default()))
            .unwrap_err();
        assert!(matches!(
            err,
            TransportError::RegistrationFailed { capacity: MAX_TRANSPORTS }
        ));
    }

    #[test]
    fn transmit_dispatches_by_tag() {
        let registry = TransportRegistry::new();
        let transport = Arc::new(CountingTransport::default());
        let handle: Arc<dyn Transport> = transport.clone();
        let tag = registry.register("radio", handle).unwrap();

        let mut chain = MsgChain::with_header(b"HDR".as_ref());
        chain.push_segment(b"payload".as_ref());
        chain.set_endpoint(Endpoint::new(tag, RadioAddr::new(0xAB01, 5683)));

        assert_eq!(registry.transmit(chain).unwrap(), 7);
        assert_eq!(transport.transmits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn transmit_without_endpoint_is_invalid() {
        let registry = TransportRegistry::new();
        let err = registry.transmit(MsgChain::new()).unwrap_err();
        assert!(matches!(err, TransportError::InvalidChain(_)));
    }

    #[test]
    fn transmit_with_unknown_tag_is_not_registered() {
        let registry = TransportRegistry::new();
        let mut chain = MsgChain::with_header(b"HDR".as_ref());
        chain.set_endpoint(Endpoint::new(5, RadioAddr::new(0xAB01, 5683)));

        let err = registry.transmit(chain).unwrap_err();
        assert!(matches!(err, TransportError::NotRegistered));
    }
}
