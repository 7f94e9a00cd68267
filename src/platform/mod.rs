use std::collections::HashSet;

use tracing::warn;

use crate::{
    audio::{Flow, InterfaceCandidate, RawDevice, Role},
    errors::{AppError, AppResult},
};

#[cfg(target_os = "windows")]
mod windows;
#[cfg(target_os = "windows")]
pub use windows::AudioNightmare;

#[cfg(test)]
pub(crate) mod fake;

/// Boundary to the OS audio subsystem.
///
/// Every call opens and releases its own native handles.
pub trait EndpointBackend {
    /// Short name shown in diagnostics
    fn name(&self) -> &'static str;
    /// All active endpoints, regardless of flow.
    ///
    /// The outer error means the device list itself couldn't be obtained,
    /// inner errors are scoped to a single device.
    fn active_devices(&self) -> AppResult<Vec<AppResult<RawDevice>>>;
    /// Ids of the active endpoints the OS lists for `flow`
    fn active_ids(&self, flow: Flow) -> AppResult<HashSet<String>>;
    fn default_endpoint(&self, flow: Flow, role: Role) -> AppResult<String>;
    /// Create the COM object described by `candidate`
    fn instantiate(&self, candidate: &InterfaceCandidate)
        -> AppResult<Box<dyn DefaultEndpointPolicy>>;
    /// Volume interface of whatever the OS currently considers the default render endpoint
    fn render_volume(&self) -> AppResult<Box<dyn MasterVolume>>;
    fn beep(&self, frequency_hz: u32, duration_ms: u32) -> AppResult<()>;
}

/// An instantiated "set default endpoint" object.
pub trait DefaultEndpointPolicy {
    /// Returns the raw status code (HRESULT semantics, negative is failure)
    fn set_default_endpoint(&self, device_id: &str, role: Role) -> i32;
}

pub trait MasterVolume {
    /// 0.0 to 1.0
    fn master_scalar(&self) -> AppResult<f32>;
    fn set_master_scalar(&self, level: f32) -> AppResult<()>;
    fn mute(&self) -> AppResult<bool>;
    fn set_mute(&self, muted: bool) -> AppResult<()>;
}

/// Stand-in used when the native layer can't be loaded.
pub struct UnavailableBackend {
    reason: String,
}

impl UnavailableBackend {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
    fn err<T>(&self) -> AppResult<T> {
        Err(AppError::NativeUnavailable(self.reason.clone()))
    }
}

impl EndpointBackend for UnavailableBackend {
    fn name(&self) -> &'static str {
        "unavailable"
    }
    fn active_devices(&self) -> AppResult<Vec<AppResult<RawDevice>>> {
        self.err()
    }
    fn active_ids(&self, _flow: Flow) -> AppResult<HashSet<String>> {
        self.err()
    }
    fn default_endpoint(&self, _flow: Flow, _role: Role) -> AppResult<String> {
        self.err()
    }
    fn instantiate(
        &self,
        _candidate: &InterfaceCandidate,
    ) -> AppResult<Box<dyn DefaultEndpointPolicy>> {
        self.err()
    }
    fn render_volume(&self) -> AppResult<Box<dyn MasterVolume>> {
        self.err()
    }
    fn beep(&self, _frequency_hz: u32, _duration_ms: u32) -> AppResult<()> {
        self.err()
    }
}

/// Best backend for this machine, degrading to [`UnavailableBackend`].
pub fn native_backend() -> Box<dyn EndpointBackend> {
    #[cfg(target_os = "windows")]
    {
        match AudioNightmare::build() {
            Ok(backend) => Box::new(backend),
            Err(e) => {
                warn!("Couldn't initialize Windows audio layer: {e}");
                Box::new(UnavailableBackend::new(e.to_string()))
            }
        }
    }
    #[cfg(not(target_os = "windows"))]
    {
        warn!("No native audio layer for {}", std::env::consts::OS);
        Box::new(UnavailableBackend::new(format!(
            "unsupported platform: {}",
            std::env::consts::OS
        )))
    }
}
