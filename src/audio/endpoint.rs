use std::fmt::Display;

use serde_derive::{Deserialize, Serialize};

/// Direction of audio for an endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Flow {
    /// Render
    Playback,
    /// Capture
    Recording,
}

serde_plain::derive_display_from_serialize!(Flow);
serde_plain::derive_fromstr_from_deserialize!(Flow);

impl Flow {
    /// Name used by the external helper tool's command line.
    pub fn helper_arg(&self) -> &'static str {
        match self {
            Flow::Playback => "Render",
            Flow::Recording => "Capture",
        }
    }
}

/// One of the three "default device" slots Windows keeps per flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Role {
    Console,
    Multimedia,
    Communications,
}

impl Role {
    /// Order in which roles are assigned when setting a default endpoint.
    pub const ALL: [Role; 3] = [Role::Console, Role::Multimedia, Role::Communications];

    /// Numeric value of the matching `ERole`.
    pub fn index(&self) -> u32 {
        match self {
            Role::Console => 0,
            Role::Multimedia => 1,
            Role::Communications => 2,
        }
    }
}

impl Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let role_str = match self {
            Self::Console => "Console",
            Self::Multimedia => "Multimedia",
            Self::Communications => "Communications",
        };
        write!(f, "{role_str}")
    }
}

/// Snapshot of an active audio endpoint, taken during a single enumeration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoint {
    pub id: String,
    pub name: String,
    pub flow: Flow,
}

impl Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} :: {}", self.id, self.name)
    }
}

/// Endpoint as reported by the native layer, before classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawDevice {
    pub id: String,
    /// Friendly name, if the property store could be read
    pub name: Option<String>,
}

impl RawDevice {
    pub fn new(id: impl Into<String>, name: Option<&str>) -> Self {
        Self {
            id: id.into(),
            name: name.map(String::from),
        }
    }
}
