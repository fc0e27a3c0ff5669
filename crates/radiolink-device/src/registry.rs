use std::collections::HashMap;
use std::ops::{Deref, DerefMut};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::debug;

use crate::error::{DeviceError, Result};
use crate::traits::RadioDevice;

/// Process-wide registry of named radio devices.
///
/// Devices are registered once at startup and looked up by name for
/// the rest of the process lifetime. Entries may be removed when a
/// device goes away (hot-unplug); handles already cloned out keep the
/// device alive until they are dropped.
#[derive(Default)]
pub struct DeviceRegistry {
    devices: Mutex<HashMap<String, DeviceHandle>>,
}

impl DeviceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a device under `name`.
    pub fn insert(&self, name: impl Into<String>, device: Box<dyn RadioDevice>) -> Result<()> {
        let name = name.into();
        let mut devices = self.devices.lock().unwrap_or_else(PoisonError::into_inner);
        if devices.contains_key(&name) {
            return Err(DeviceError::AlreadyExists { name });
        }
        debug!(device = %name, "radio device registered");
        let handle = DeviceHandle {
            name: Arc::from(name.as_str()),
            device: Arc::new(Mutex::new(device)),
        };
        devices.insert(name, handle);
        Ok(())
    }

    /// Look up a device by name. The returned handle is cheap to clone.
    pub fn open(&self, name: &str) -> Result<DeviceHandle> {
        let devices = self.devices.lock().unwrap_or_else(PoisonError::into_inner);
        devices.get(name).cloned().ok_or_else(|| DeviceError::NotFound {
            name: name.to_string(),
        })
    }

    /// Remove a device from the registry.
    pub fn remove(&self, name: &str) -> Result<()> {
        let mut devices = self.devices.lock().unwrap_or_else(PoisonError::into_inner);
        devices
            .remove(name)
            .map(|_| debug!(device = %name, "radio device removed"))
            .ok_or_else(|| DeviceError::NotFound {
                name: name.to_string(),
            })
    }
}

/// Cloneable reference to a registered device.
#[derive(Clone)]
pub struct DeviceHandle {
    name: Arc<str>,
    device: Arc<Mutex<Box<dyn RadioDevice>>>,
}

impl DeviceHandle {
    /// The name this device was registered under.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Acquire the device for exclusive use.
    ///
    /// Blocks without timeout until the device is free; the lock
    /// serializes all acquirers. A poisoned lock is recovered, since a
    /// panicking session holder must not brick the radio.
    pub fn acquire(&self) -> DeviceSession<'_> {
        let guard = self.device.lock().unwrap_or_else(PoisonError::into_inner);
        debug!(device = %self.name, "device session acquired");
        DeviceSession {
            name: &self.name,
            guard,
        }
    }
}

impl std::fmt::Debug for DeviceHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeviceHandle")
            .field("name", &self.name)
            .finish()
    }
}

/// Exclusive access to a radio device for the scope of one operation.
///
/// Dropping the session releases the device, on every exit path.
pub struct DeviceSession<'a> {
    name: &'a str,
    guard: MutexGuard<'a, Box<dyn RadioDevice>>,
}

impl Deref for DeviceSession<'_> {
    type Target = dyn RadioDevice;

    fn deref(&self) -> &Self::Target {
        self.guard.as_ref()
    }
}

impl DerefMut for DeviceSession<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.guard.as_mut()
    }
}

impl Drop for DeviceSession<'_> {
    fn drop(&mut self) {
        debug!(device = %self.name, "device session released");
    }
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc;
    use std::thread;
    use std::time::Duration;

    use super::*;
    use crate::loopback::LoopbackRadio;

    #[test]
    fn insert_and_open() {
        let registry = DeviceRegistry::new();
        registry
            .insert("radio0", Box::new(LoopbackRadio::new()))
            .unwrap();

        let handle = registry.open("radio0").unwrap();
        assert_eq!(handle.name(), "radio0");
    }

    #[test]
    fn open_unknown_device_fails() {
        let registry = DeviceRegistry::new();
        let err = registry.open("radio9").unwrap_err();
        assert!(matches!(err, DeviceError::NotFound { name } if name == "radio9"));
    }

    #[test]
    fn duplicate_name_rejected() {
        let registry = DeviceRegistry::new();
        registry
            .insert("radio0", Box::new(LoopbackRadio::new()))
            .unwrap();

        let err = registry
            .insert("radio0", Box::new(LoopbackRadio::new()))
            .unwrap_err();
        assert!(matches!(err, DeviceError::AlreadyExists { .. }));
    }

    #[test]
    fn remove_makes_open_fail() {
        let registry = DeviceRegistry::new();
        registry
            .insert("radio0", Box::new(LoopbackRadio::new()))
            .unwrap();

        registry.remove("radio0").unwrap();
        assert!(matches!(
            registry.open("radio0"),
            Err(DeviceError::NotFound { .. })
        ));
        assert!(matches!(
            registry.remove("radio0"),
            Err(DeviceError::NotFound { .. })
        ));
    }

    #[test]
    fn session_exposes_device() {
        let registry = DeviceRegistry::new();
        let radio = LoopbackRadio::with_frame_len(48);
        let log = radio.log();
        registry.insert("radio0", Box::new(radio)).unwrap();

        let handle = registry.open("radio0").unwrap();
        let mut session = handle.acquire();
        assert_eq!(session.max_frame_len(), 48);
        session.send_frame(b"abc").unwrap();
        drop(session);

        assert_eq!(log.snapshot(), vec![b"abc".to_vec()]);
    }

    #[test]
    fn acquire_serializes_access() {
        let registry = DeviceRegistry::new();
        let radio = LoopbackRadio::new();
        let log = radio.log();
        registry.insert("radio0", Box::new(radio)).unwrap();

        let handle = registry.open("radio0").unwrap();
        let contender = handle.clone();
        let (started_tx, started_rx) = mpsc::channel();

        let holder = thread::spawn(move || {
            let mut session = contender.acquire();
            started_tx.send(()).unwrap();
            thread::sleep(Duration::from_millis(50));
            session.send_frame(b"first").unwrap();
        });

        started_rx.recv().unwrap();
        // Blocks until the holder thread drops its session.
        let mut session = handle.acquire();
        session.send_frame(b"second").unwrap();
        drop(session);
        holder.join().unwrap();

        assert_eq!(log.snapshot(), vec![b"first".to_vec(), b"second".to_vec()]);
    }
}
