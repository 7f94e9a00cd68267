use std::path::PathBuf;

use argh::FromArgs;
use serde_derive::Deserialize;

#[derive(FromArgs, PartialEq, Debug)]
/// Switch default audio devices, volume and mute
pub struct TopLevelCmd {
    #[argh(option, short = 'c')]
    /// settings file to use instead of the one named after the executable
    pub config: Option<PathBuf>,
    #[argh(subcommand)]
    pub subcommand: SubCommands,
}

#[derive(FromArgs, PartialEq, Debug)]
#[argh(subcommand)]
pub enum SubCommands {
    List(ListSubcommand),
    SetDefaultPlayback(SetDefaultPlayback),
    SetDefaultRecording(SetDefaultRecording),
    Volume(VolumeSubcommand),
    Mute(MuteSubcommand),
    TestTone(TestToneSubcommand),
    Doctor(DoctorSubcommand),
    Init(InitSubcommand),
    Profile(ProfileSubcommand),
    Restore(RestoreSubcommand),
}

#[derive(FromArgs, PartialEq, Debug)]
/// List playback/recording devices and their ids
#[argh(subcommand, name = "list")]
pub struct ListSubcommand {
    #[argh(switch, short = 'p')]
    /// show playback devices
    pub playback: bool,
    #[argh(switch, short = 'r')]
    /// show recording devices
    pub recording: bool,
    #[argh(switch)]
    /// print as JSON
    pub json: bool,
}

#[derive(FromArgs, PartialEq, Debug)]
/// Set the default playback device by name or id
#[argh(subcommand, name = "set-default-playback")]
pub struct SetDefaultPlayback {
    #[argh(positional)]
    /// device name (or part of it) or id
    pub identifier: String,
    #[argh(switch)]
    /// try every native variant and print the status codes
    pub debug: bool,
}

#[derive(FromArgs, PartialEq, Debug)]
/// Set the default recording device by name or id
#[argh(subcommand, name = "set-default-recording")]
pub struct SetDefaultRecording {
    #[argh(positional)]
    /// device name (or part of it) or id
    pub identifier: String,
    #[argh(switch)]
    /// try every native variant and print the status codes
    pub debug: bool,
}

#[derive(FromArgs, PartialEq, Debug)]
/// Set master volume (0-100) of the default playback device
#[argh(subcommand, name = "volume")]
pub struct VolumeSubcommand {
    #[argh(positional)]
    /// volume in percent, clamped to 0-100 (negative values go after `--`)
    pub percent: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Toggle {
    On,
    Off,
}

serde_plain::derive_fromstr_from_deserialize!(Toggle);

impl From<Toggle> for bool {
    fn from(value: Toggle) -> Self {
        value == Toggle::On
    }
}

#[derive(FromArgs, PartialEq, Debug)]
/// Mute or unmute the default playback device
#[argh(subcommand, name = "mute")]
pub struct MuteSubcommand {
    #[argh(positional)]
    /// on or off
    pub state: Toggle,
}

#[derive(FromArgs, PartialEq, Debug)]
/// Play a test tone
#[argh(subcommand, name = "test-tone")]
pub struct TestToneSubcommand {
    #[argh(option, default = "880")]
    /// frequency in Hz
    pub freq: u32,
    #[argh(option, default = "300")]
    /// duration in milliseconds
    pub ms: u32,
}

#[derive(FromArgs, PartialEq, Debug)]
/// Run environment checks
#[argh(subcommand, name = "doctor")]
pub struct DoctorSubcommand {
    #[argh(switch)]
    /// print only the JSON report
    pub json: bool,
}

#[derive(FromArgs, PartialEq, Debug)]
/// Create the settings file, profiles and tools folders
#[argh(subcommand, name = "init")]
pub struct InitSubcommand {
    #[argh(switch)]
    /// overwrite existing files
    pub force: bool,
    #[argh(switch)]
    /// show actions without changing files
    pub dry_run: bool,
}

#[derive(FromArgs, PartialEq, Debug)]
/// Manage device profiles
#[argh(subcommand, name = "profile")]
pub struct ProfileSubcommand {
    #[argh(subcommand)]
    pub action: ProfileAction,
}

#[derive(FromArgs, PartialEq, Debug)]
#[argh(subcommand)]
pub enum ProfileAction {
    List(ProfileList),
    Apply(ProfileApply),
    Save(ProfileSave),
}

#[derive(FromArgs, PartialEq, Debug)]
/// List saved profiles
#[argh(subcommand, name = "list")]
pub struct ProfileList {}

#[derive(FromArgs, PartialEq, Debug)]
/// Switch to the devices and volume of a profile
#[argh(subcommand, name = "apply")]
pub struct ProfileApply {
    #[argh(positional)]
    /// profile file name (without .toml) or display name
    pub name: String,
}

#[derive(FromArgs, PartialEq, Debug)]
/// Save the current default devices and volume as a profile
#[argh(subcommand, name = "save")]
pub struct ProfileSave {
    #[argh(positional)]
    /// profile file name (without .toml)
    pub name: String,
    #[argh(switch)]
    /// overwrite an existing profile
    pub force: bool,
}

#[derive(FromArgs, PartialEq, Debug)]
/// Apply the default devices and volume from the settings file
#[argh(subcommand, name = "restore")]
pub struct RestoreSubcommand {}
