use fs_err as fs;
use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use serde_derive::{Deserialize, Serialize};
use tracing::*;

use crate::{
    audio::{AudioControl, Flow},
    errors::{AppError, AppResult},
};

/// A named set of devices and volume to switch to in one go.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default)]
    pub name: String,
    /// Playback device name or id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub playback: Option<String>,
    /// Recording device name or id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recording: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mute: Option<bool>,
}

/// Outcome of each step of [`Profile::apply`], `None` when the profile doesn't set it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileOutcome {
    pub playback: Option<bool>,
    pub recording: Option<bool>,
    pub volume: Option<bool>,
    pub mute: Option<bool>,
}

impl ProfileOutcome {
    pub fn all_ok(&self) -> bool {
        [self.playback, self.recording, self.volume, self.mute]
            .into_iter()
            .flatten()
            .all(|ok| ok)
    }
}

impl Profile {
    pub fn apply(&self, control: &AudioControl) -> ProfileOutcome {
        info!("Applying profile {:?}", self.name);
        let set_default = |device: &Option<String>, flow: Flow| {
            device
                .as_deref()
                .filter(|d| !d.is_empty())
                .map(|d| control.set_default(d, flow))
        };
        ProfileOutcome {
            playback: set_default(&self.playback, Flow::Playback),
            recording: set_default(&self.recording, Flow::Recording),
            volume: self
                .volume
                .map(|percent| control.set_master_volume(percent.into())),
            mute: self.mute.map(|mute| control.set_mute(mute)),
        }
    }
}

#[derive(Debug)]
pub struct Profiles {
    dir: PathBuf,
    /// Keyed by file stem
    pub inner: BTreeMap<String, Profile>,
}

pub const PROFILES_PATH: &str = "profiles";

impl Profiles {
    pub fn build() -> AppResult<Self> {
        Self::build_in(Path::new(PROFILES_PATH))
    }
    pub fn build_in(dir: &Path) -> AppResult<Self> {
        let mut profiles = Profiles {
            dir: dir.to_path_buf(),
            inner: BTreeMap::new(),
        };

        if dir.exists() {
            profiles.load_from_dir()?;
        }

        Ok(profiles)
    }
    /// Will replace all existing profiles if successful.
    pub fn load_from_dir(&mut self) -> AppResult<()> {
        let mut dir = fs::read_dir(&self.dir)?;
        let mut new_map = BTreeMap::new();
        while let Some(Ok(file)) = dir.next() {
            // Ignore any non .toml's
            if file.path().extension() != Some("toml".as_ref()) {
                continue;
            }
            if file.file_type()?.is_dir() {
                continue;
            }
            let (key, value) = try_load_profile(&file.path())?;
            new_map.insert(key, value);
        }

        self.inner = new_map;
        Ok(())
    }
    pub fn get(&self, name: &str) -> AppResult<&Profile> {
        self.inner
            .get(name)
            .or_else(|| self.inner.values().find(|p| p.name.eq_ignore_ascii_case(name)))
            .ok_or_else(|| AppError::ProfileNotFound(name.to_string()))
    }
    /// Writes `profile` to `<dir>/<key>.toml`
    pub fn save(&mut self, key: &str, profile: Profile, overwrite: bool) -> AppResult<PathBuf> {
        let path = self.dir.join(format!("{key}.toml"));
        if path.exists() && !overwrite {
            return Err(AppError::ProfileExists(key.to_string()));
        }
        fs::create_dir_all(&self.dir)?;
        fs::write(&path, toml::to_string(&profile)?)?;
        info!("Saved profile to {}", path.display());
        self.inner.insert(key.to_string(), profile);
        Ok(path)
    }
    pub fn len(&self) -> usize {
        self.inner.len()
    }
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

fn try_load_profile(path: &Path) -> AppResult<(String, Profile)> {
    let key = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let mut profile: Profile = toml::from_str(&fs::read_to_string(path)?)?;
    if profile.name.is_empty() {
        profile.name.clone_from(&key);
    }
    Ok((key, profile))
}
