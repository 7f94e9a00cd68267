use std::collections::HashSet;

use tracing::{debug, warn};

use crate::errors::AppResult;

use super::{AudioControl, Endpoint, Flow, RawDevice, Role};

/// Name fragments that mark a device as a recording endpoint
/// when its id isn't listed under either flow.
const RECORDING_NAME_HINTS: [&str; 9] = [
    "microphone",
    "mikro",
    "aufnah",
    "record",
    "line-in",
    "line in",
    "eingang",
    "stereo mix",
    "output",
];

const UNNAMED_DEVICE: &str = "(Unnamed)";

/// Last-resort guess at a device's flow based only on its name.
pub fn classify_by_name(name: &str) -> Flow {
    let name = name.to_lowercase();
    if RECORDING_NAME_HINTS.iter().any(|hint| name.contains(hint)) {
        Flow::Recording
    } else {
        Flow::Playback
    }
}

fn classify(
    device: RawDevice,
    render_ids: &HashSet<String>,
    capture_ids: &HashSet<String>,
) -> Endpoint {
    let name = device.name.unwrap_or_else(|| UNNAMED_DEVICE.to_string());
    let flow = if render_ids.contains(&device.id) {
        Flow::Playback
    } else if capture_ids.contains(&device.id) {
        Flow::Recording
    } else {
        let guess = classify_by_name(&name);
        debug!("{} wasn't in either flow's collection, guessing {guess}", device.id);
        guess
    };
    Endpoint {
        id: device.id,
        name,
        flow,
    }
}

impl AudioControl {
    /// Active endpoints of the given flow, sorted by name (case-insensitive).
    pub fn list_endpoints(&self, flow: Flow) -> Vec<Endpoint> {
        match self.classified_endpoints() {
            Ok(endpoints) => endpoints.into_iter().filter(|e| e.flow == flow).collect(),
            Err(e) => {
                warn!("Couldn't enumerate {flow} endpoints: {e}");
                Vec::new()
            }
        }
    }
    /// Playback and recording endpoints from a single enumeration.
    pub fn list_all(&self) -> (Vec<Endpoint>, Vec<Endpoint>) {
        match self.classified_endpoints() {
            Ok(endpoints) => endpoints
                .into_iter()
                .partition(|e| e.flow == Flow::Playback),
            Err(e) => {
                warn!("Couldn't enumerate endpoints: {e}");
                (Vec::new(), Vec::new())
            }
        }
    }
    /// Id of the current default endpoint for `flow`.
    ///
    /// Checks the Multimedia role first, then Console, then Communications.
    pub fn default_endpoint(&self, flow: Flow) -> Option<String> {
        [Role::Multimedia, Role::Console, Role::Communications]
            .into_iter()
            .find_map(|role| match self.backend.default_endpoint(flow, role) {
                Ok(id) => Some(id),
                Err(e) => {
                    debug!("No default {flow} endpoint for {role}: {e}");
                    None
                }
            })
    }
    /// Names of every readable active device, in enumeration order.
    ///
    /// Unlike the listing calls, a failure to reach the native layer is returned.
    pub(crate) fn device_names(&self) -> AppResult<Vec<String>> {
        Ok(self
            .backend
            .active_devices()?
            .into_iter()
            .filter_map(Result::ok)
            .filter_map(|device| device.name)
            .collect())
    }
    fn flow_ids(&self, flow: Flow) -> HashSet<String> {
        self.backend.active_ids(flow).unwrap_or_else(|e| {
            debug!("Couldn't get active {flow} ids: {e}");
            HashSet::new()
        })
    }
    fn classified_endpoints(&self) -> AppResult<Vec<Endpoint>> {
        let devices = self.backend.active_devices()?;
        let render_ids = self.flow_ids(Flow::Playback);
        let capture_ids = self.flow_ids(Flow::Recording);

        let mut endpoints: Vec<Endpoint> = devices
            .into_iter()
            .filter_map(|device| match device {
                Ok(device) => Some(device),
                Err(e) => {
                    debug!("Skipping unreadable endpoint: {e}");
                    None
                }
            })
            .map(|device| classify(device, &render_ids, &capture_ids))
            .collect();

        endpoints.sort_by_cached_key(|e| e.name.to_lowercase());
        Ok(endpoints)
    }
}
