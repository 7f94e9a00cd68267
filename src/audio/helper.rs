use std::{
    path::{Path, PathBuf},
    process::{Command, Stdio},
};

use tracing::{debug, info, warn};

use crate::settings::HelperSettings;

use super::{Flow, Role};

/// Role passed to the helper tool on its command line.
pub const HELPER_ROLE: Role = Role::Multimedia;

/// External command line tool (NirSoft's SoundVolumeView by default) used when
/// none of the native candidates could change the default endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HelperTool {
    tools_dir: PathBuf,
    executable: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HelperLocation {
    /// Found inside the tools directory
    Local(PathBuf),
    /// Not found locally, left to the OS to find on `PATH`
    SearchPath(String),
}

impl HelperLocation {
    pub fn program(&self) -> &std::ffi::OsStr {
        match self {
            HelperLocation::Local(path) => path.as_os_str(),
            HelperLocation::SearchPath(name) => name.as_ref(),
        }
    }
}

impl HelperTool {
    pub fn new(tools_dir: impl Into<PathBuf>, executable: impl Into<String>) -> Self {
        Self {
            tools_dir: tools_dir.into(),
            executable: executable.into(),
        }
    }
    pub fn from_settings(settings: &HelperSettings) -> Self {
        Self::new(&settings.tools_dir, &settings.executable)
    }
    pub fn tools_dir(&self) -> &Path {
        &self.tools_dir
    }
    pub fn executable(&self) -> &str {
        &self.executable
    }
    pub fn local_path(&self) -> PathBuf {
        self.tools_dir.join(&self.executable)
    }
    pub fn is_present_locally(&self) -> bool {
        self.local_path().is_file()
    }
    pub fn locate(&self) -> HelperLocation {
        let local = self.local_path();
        if local.is_file() {
            HelperLocation::Local(local)
        } else {
            HelperLocation::SearchPath(self.executable.clone())
        }
    }
    /// `/SetDefault <name or id> <role> <Render|Capture>`
    pub fn set_default_args(identifier: &str, flow: Flow) -> [String; 4] {
        [
            String::from("/SetDefault"),
            identifier.to_string(),
            HELPER_ROLE.index().to_string(),
            flow.helper_arg().to_string(),
        ]
    }
    /// Runs the helper to completion. `true` only on a zero exit code.
    pub fn set_default(&self, identifier: &str, flow: Flow) -> bool {
        let location = self.locate();
        let args = Self::set_default_args(identifier, flow);
        debug!("Running helper {location:?} {args:?}");

        let output = Command::new(location.program())
            .args(&args)
            .stdin(Stdio::null())
            .output();

        match output {
            Ok(output) if output.status.success() => {
                info!("Helper set {identifier} as default {flow} device");
                true
            }
            Ok(output) => {
                warn!(
                    "Helper exited with {}: {}",
                    output.status,
                    String::from_utf8_lossy(&output.stderr).trim()
                );
                false
            }
            Err(e) => {
                warn!("Couldn't run helper {location:?}: {e}");
                false
            }
        }
    }
    /// Suggestion shown when nothing managed to change the default device
    pub fn hint(&self) -> String {
        format!(
            "Place {} in {} to enable fallback",
            self.executable,
            self.tools_dir.display()
        )
    }
}
