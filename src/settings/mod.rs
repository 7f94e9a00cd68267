use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use derivative::Derivative;
use fs_err::{self as fs};
use serde_derive::{Deserialize, Serialize};
use serde_inline_default::serde_inline_default;
use tracing::level_filters::LevelFilter;
use tracing::*;

use crate::errors::{AppError, AppResult};

#[serde_inline_default]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Derivative)]
#[derivative(Default)]
pub struct HelperSettings {
    /// Directory checked for the helper before falling back to `PATH`
    #[serde_inline_default(PathBuf::from("tools"))]
    #[derivative(Default(value = "PathBuf::from(\"tools\")"))]
    pub tools_dir: PathBuf,
    /// Helper used when the native calls can't change the default device
    #[serde_inline_default(String::from("SoundVolumeView.exe"))]
    #[derivative(Default(value = "String::from(\"SoundVolumeView.exe\")"))]
    pub executable: String,
}

/// Devices and volume restored by `restore`, and used to seed new profiles.
#[serde_inline_default]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Derivative)]
#[derivative(Default)]
pub struct DefaultDevices {
    /// Name or id, empty to leave alone
    #[serde(default)]
    pub playback: String,
    #[serde(default)]
    pub recording: String,
    #[serde_inline_default(35)]
    #[derivative(Default(value = "35"))]
    pub master_volume: u8,
}

#[serde_inline_default]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Derivative)]
#[derivative(Default)]
pub struct MiscSettings {
    #[serde_inline_default(String::from("debug"))]
    #[derivative(Default(value = "String::from(\"debug\")"))]
    pub log_level: String,
    /// Windows takes a moment to propagate a default change,
    /// this is how long to wait before reading it back.
    #[serde_inline_default(500)]
    #[derivative(Default(value = "500"))]
    pub settle_delay_ms: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub helper: HelperSettings,
    #[serde(default)]
    pub defaults: DefaultDevices,
    #[serde(default)]
    pub misc: MiscSettings,
}

impl Settings {
    pub fn load(path: &Path, required: bool) -> AppResult<Self> {
        if !path.exists() && !required {
            let default = Settings::default();
            default.save(path)?;
            return Ok(default);
        } else if !path.exists() && required {
            return Err(AppError::RequiredSettingsMissing);
        }
        let mut file = fs::File::open(path)?;
        let mut buffer = String::new();
        file.read_to_string(&mut buffer)?;
        drop(file);
        let config: Settings = toml::from_str(&buffer)?;
        // Writes back any fields that were missing
        config.save(path)?;
        Ok(config)
    }
    pub fn save(&self, config_path: &Path) -> AppResult<()> {
        let toml_config = toml::to_string(self)?;
        debug!("Serialized config length: {}", toml_config.len());
        let mut file = fs::File::create(config_path)?;
        file.write_all(toml_config.as_bytes())?;
        file.flush()?;
        file.sync_all()?;
        Ok(())
    }
    pub fn get_log_level(&self) -> LevelFilter {
        LevelFilter::from_str(&self.misc.log_level).unwrap_or(LevelFilter::DEBUG)
    }
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.misc.settle_delay_ms)
    }
}

/// `<exe name>.toml` in the working directory
pub fn default_settings_path() -> AppResult<PathBuf> {
    let exe_path = std::env::current_exe()?;
    let config_name = exe_path.with_extension("toml");
    let config_name = config_name.file_name().ok_or(AppError::WorkDir)?;
    Ok(PathBuf::from(config_name))
}
