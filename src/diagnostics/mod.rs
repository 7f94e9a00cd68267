//! Environment checks for `audioctl doctor`. Read-only.

use std::path::PathBuf;

use serde_derive::Serialize;

use crate::{
    audio::{AudioControl, HelperTool},
    errors::AppResult,
};

/// Companion tools looked for in the tools directory
const NIRCMD: &str = "nircmd.exe";
const DEVICE_SAMPLE_SIZE: usize = 8;

#[derive(Debug, Clone, Serialize)]
pub struct RuntimeInfo {
    pub executable: Option<PathBuf>,
    pub version: &'static str,
    pub debug_build: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct OsInfo {
    pub family: &'static str,
    pub os: &'static str,
    pub arch: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct NativeLayerInfo {
    pub backend: &'static str,
    pub available: bool,
    pub device_count: usize,
    pub sample: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ToolsInfo {
    pub tools_dir: PathBuf,
    pub helper: String,
    pub helper_present: bool,
    pub nircmd: bool,
}

/// Mixer matrix integration isn't implemented, this only reports that.
#[derive(Debug, Clone, Serialize)]
pub struct MixerInfo {
    pub available: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct DoctorReport {
    pub runtime: RuntimeInfo,
    pub os: OsInfo,
    pub native: NativeLayerInfo,
    pub tools: ToolsInfo,
    pub mixer: MixerInfo,
}

pub fn run_basic_checks(control: &AudioControl) -> DoctorReport {
    DoctorReport {
        runtime: RuntimeInfo {
            executable: std::env::current_exe().ok(),
            version: env!("CARGO_PKG_VERSION"),
            debug_build: cfg!(debug_assertions),
        },
        os: OsInfo {
            family: std::env::consts::FAMILY,
            os: std::env::consts::OS,
            arch: std::env::consts::ARCH,
        },
        native: check_native(control),
        tools: check_tools(control.helper()),
        mixer: MixerInfo { available: false },
    }
}

fn check_native(control: &AudioControl) -> NativeLayerInfo {
    let backend = control.backend_name();
    match control.device_names() {
        Ok(names) => NativeLayerInfo {
            backend,
            available: true,
            device_count: names.len(),
            sample: names.into_iter().take(DEVICE_SAMPLE_SIZE).collect(),
            error: None,
        },
        Err(e) => NativeLayerInfo {
            backend,
            available: false,
            device_count: 0,
            sample: Vec::new(),
            error: Some(e.to_string()),
        },
    }
}

fn check_tools(helper: &HelperTool) -> ToolsInfo {
    ToolsInfo {
        tools_dir: helper.tools_dir().to_path_buf(),
        helper: helper.executable().to_string(),
        helper_present: helper.is_present_locally(),
        nircmd: helper.tools_dir().join(NIRCMD).is_file(),
    }
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}

impl DoctorReport {
    pub fn to_json(&self) -> AppResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
    /// Human-readable summary followed by the raw JSON
    pub fn format_for_cli(&self) -> AppResult<String> {
        let mut lines = Vec::new();
        let executable = self
            .runtime
            .executable
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| String::from("?"));
        lines.push(format!(
            "audioctl: {} @ {executable}{}",
            self.runtime.version,
            if self.runtime.debug_build { " (debug)" } else { "" }
        ));
        lines.push(format!(
            "OS: {} {} ({})",
            self.os.family, self.os.os, self.os.arch
        ));
        if self.native.available {
            lines.push(format!(
                "Native audio ({}): available, devices={}, sample={:?}",
                self.native.backend, self.native.device_count, self.native.sample
            ));
        } else {
            lines.push(format!(
                "Native audio ({}): missing or error={}",
                self.native.backend,
                self.native.error.as_deref().unwrap_or("unknown")
            ));
        }
        lines.push(format!(
            "Mixer integration: {}",
            if self.mixer.available { "available" } else { "not supported" }
        ));
        lines.push(format!(
            "tools: dir={}, {}={}, NirCmd={}",
            self.tools.tools_dir.display(),
            self.tools.helper,
            yes_no(self.tools.helper_present),
            yes_no(self.tools.nircmd)
        ));
        lines.push(String::from("Raw JSON below (for debugging):"));
        lines.push(self.to_json()?);
        Ok(lines.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::Flow;
    use crate::platform::{fake::FakeBackend, UnavailableBackend};

    #[test]
    fn reports_devices_and_tools() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("SoundVolumeView.exe"), b"").unwrap();

        let mut backend = FakeBackend::default();
        for i in 0..10 {
            backend = backend.with_device(
                &format!("{{dev.{i}}}"),
                &format!("Device {i}"),
                Some(Flow::Playback),
            );
        }
        let control = AudioControl::new(
            Box::new(backend),
            HelperTool::new(dir.path(), "SoundVolumeView.exe"),
        );
        let report = run_basic_checks(&control);

        assert!(report.native.available);
        assert_eq!(report.native.device_count, 10);
        assert_eq!(report.native.sample.len(), 8);
        assert!(report.tools.helper_present);
        assert!(!report.tools.nircmd);
        assert!(!report.mixer.available);

        let text = report.format_for_cli().unwrap();
        assert!(text.contains("SoundVolumeView.exe=yes, NirCmd=no"));
        assert!(text.contains("\"device_count\": 10"));
    }

    #[test]
    fn reports_missing_native_layer() {
        let control = AudioControl::new(
            Box::new(UnavailableBackend::new("unsupported platform: linux")),
            HelperTool::new("tools", "SoundVolumeView.exe"),
        );
        let report = run_basic_checks(&control);
        assert!(!report.native.available);
        assert_eq!(report.native.backend, "unavailable");
        assert!(report
            .native
            .error
            .as_deref()
            .is_some_and(|e| e.contains("unsupported platform")));
        assert!(report
            .format_for_cli()
            .unwrap()
            .contains("missing or error="));
    }
}
