//! First-run setup for `audioctl init`.

use std::fmt;
use std::path::{Path, PathBuf};

use fs_err as fs;
use tracing::*;

use crate::{
    errors::AppResult,
    profiles::{Profile, PROFILES_PATH},
    settings::Settings,
};

pub const EXAMPLE_PROFILE: &str = "dictation";
const TOOLS_README: &str = "README.txt";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InitOptions {
    /// Overwrite files that already exist
    pub force: bool,
    /// Only report what would happen
    pub dry_run: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InitStep {
    Created(PathBuf),
    Overwritten(PathBuf),
    Skipped(PathBuf),
    Planned(PathBuf),
}

impl fmt::Display for InitStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InitStep::Created(path) => write!(f, "[ok] created {}", path.display()),
            InitStep::Overwritten(path) => write!(f, "[ok] overwrote {}", path.display()),
            InitStep::Skipped(path) => write!(f, "[skip] {} already exists", path.display()),
            InitStep::Planned(path) => write!(f, "[dry-run] would write {}", path.display()),
        }
    }
}

fn tools_readme(settings: &Settings) -> String {
    format!(
        "Place {exe} here to enable the fallback used when Windows refuses\n\
         to change the default device through its own interfaces.\n\
         \n\
         {exe} is freeware by NirSoft: https://www.nirsoft.net/utils/sound_volume_view.html\n\
         \n\
         The file name can be changed under [helper] in the settings file.\n",
        exe = settings.helper.executable
    )
}

struct Workspace<'a> {
    options: InitOptions,
    steps: Vec<InitStep>,
    root: &'a Path,
}

impl Workspace<'_> {
    fn dir(&mut self, relative: &Path) -> AppResult<()> {
        let path = self.root.join(relative);
        if path.is_dir() {
            self.steps.push(InitStep::Skipped(path));
        } else if self.options.dry_run {
            self.steps.push(InitStep::Planned(path));
        } else {
            fs::create_dir_all(&path)?;
            self.steps.push(InitStep::Created(path));
        }
        Ok(())
    }
    fn file(
        &mut self,
        relative: &Path,
        contents: impl FnOnce() -> AppResult<String>,
    ) -> AppResult<()> {
        let path = self.root.join(relative);
        let exists = path.exists();
        if exists && !self.options.force {
            self.steps.push(InitStep::Skipped(path));
            return Ok(());
        }
        if self.options.dry_run {
            self.steps.push(InitStep::Planned(path));
            return Ok(());
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, contents()?)?;
        debug!("Wrote {}", path.display());
        self.steps.push(if exists {
            InitStep::Overwritten(path)
        } else {
            InitStep::Created(path)
        });
        Ok(())
    }
}

/// Creates the profiles and tools folders, the settings file, an example profile
/// and a readme for the helper tool, all relative to `root`.
///
/// Existing files are left alone unless `force` is set.
pub fn initialize_workspace(
    root: &Path,
    settings: &Settings,
    settings_path: &Path,
    example: &Profile,
    options: InitOptions,
) -> AppResult<Vec<InitStep>> {
    let mut workspace = Workspace {
        options,
        steps: Vec::new(),
        root,
    };
    let profiles_dir = Path::new(PROFILES_PATH);

    workspace.dir(profiles_dir)?;
    workspace.dir(&settings.helper.tools_dir)?;
    workspace.file(settings_path, || Ok(toml::to_string(settings)?))?;
    workspace.file(&profiles_dir.join(format!("{EXAMPLE_PROFILE}.toml")), || {
        Ok(toml::to_string(example)?)
    })?;
    workspace.file(&settings.helper.tools_dir.join(TOOLS_README), || {
        Ok(tools_readme(settings))
    })?;

    Ok(workspace.steps)
}
