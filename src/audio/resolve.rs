use tracing::debug;

use super::{AudioControl, RawDevice};

/// Finds the id of the device `identifier` refers to.
///
/// Matching order, first hit wins:
/// 1. exact device id
/// 2. device name, ignoring case
/// 3. first device (in enumeration order) whose name contains `identifier`, ignoring case
pub fn resolve_among(devices: &[RawDevice], identifier: &str) -> Option<String> {
    if identifier.trim().is_empty() {
        return None;
    }
    if let Some(device) = devices.iter().find(|d| d.id == identifier) {
        return Some(device.id.clone());
    }

    let needle = identifier.to_lowercase();
    let lowercase_names: Vec<Option<String>> = devices
        .iter()
        .map(|d| d.name.as_deref().map(str::to_lowercase))
        .collect();

    let by_name = lowercase_names
        .iter()
        .position(|name| name.as_deref() == Some(needle.as_str()))
        .or_else(|| {
            lowercase_names
                .iter()
                .position(|name| name.as_deref().is_some_and(|n| n.contains(&needle)))
        });

    by_name.map(|i| devices[i].id.clone())
}

impl AudioControl {
    /// Canonical endpoint id for an id or (partial) device name.
    pub fn resolve(&self, identifier: &str) -> Option<String> {
        let devices = match self.backend.active_devices() {
            Ok(devices) => devices,
            Err(e) => {
                debug!("Can't resolve {identifier:?}, no device list: {e}");
                return None;
            }
        };
        let devices: Vec<RawDevice> = devices.into_iter().filter_map(Result::ok).collect();
        let resolved = resolve_among(&devices, identifier);
        debug!("Resolved {identifier:?} -> {resolved:?}");
        resolved
    }
}
