//! Platform abstraction layer
//!
//! The engine depends only on these seams:
//! - Device class and reduced-motion probes
//! - Storage, audio, vibration and celebration capabilities
//!
//! Browser implementations live in `web` (WASM only).

#[cfg(target_arch = "wasm32")]
pub mod web;

use crate::feedback::{Celebration, HapticSink, ToneSink};
use crate::persistence::{KeyValueStore, MemoryStore};

/// Answers media-style questions about the device
pub trait DeviceProbe {
    /// Coarse pointer, no hover, or a narrow viewport
    fn is_mobile_like(&self) -> bool;
    /// The platform asks for reduced motion
    fn prefers_reduced_motion(&self) -> bool;
}

/// Probe with fixed answers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FixedDevice {
    pub mobile_like: bool,
    pub reduce_motion: bool,
}

impl FixedDevice {
    pub fn desktop() -> Self {
        Self::default()
    }

    pub fn mobile() -> Self {
        Self {
            mobile_like: true,
            reduce_motion: false,
        }
    }
}

impl DeviceProbe for FixedDevice {
    fn is_mobile_like(&self) -> bool {
        self.mobile_like
    }

    fn prefers_reduced_motion(&self) -> bool {
        self.reduce_motion
    }
}

/// Everything the engine needs from its host. `None` marks an unavailable
/// capability.
pub struct Capabilities {
    pub storage: Box<dyn KeyValueStore>,
    pub device: Box<dyn DeviceProbe>,
    pub audio: Option<Box<dyn ToneSink>>,
    pub haptics: Option<Box<dyn HapticSink>>,
    pub celebration: Option<Box<dyn Celebration>>,
}

impl Capabilities {
    /// In-memory storage, desktop device, no audio/haptics/effects
    pub fn headless() -> Self {
        Self {
            storage: Box::new(MemoryStore::new()),
            device: Box::new(FixedDevice::desktop()),
            audio: None,
            haptics: None,
            celebration: None,
        }
    }

    pub fn with_storage(mut self, storage: impl KeyValueStore + 'static) -> Self {
        self.storage = Box::new(storage);
        self
    }

    pub fn with_device(mut self, device: impl DeviceProbe + 'static) -> Self {
        self.device = Box::new(device);
        self
    }

    pub fn with_audio(mut self, audio: impl ToneSink + 'static) -> Self {
        self.audio = Some(Box::new(audio));
        self
    }

    pub fn with_haptics(mut self, haptics: impl HapticSink + 'static) -> Self {
        self.haptics = Some(Box::new(haptics));
        self
    }

    pub fn with_celebration(mut self, celebration: impl Celebration + 'static) -> Self {
        self.celebration = Some(Box::new(celebration));
        self
    }
}

impl Default for Capabilities {
    fn default() -> Self {
        Self::headless()
    }
}
