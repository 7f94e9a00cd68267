pub mod args;
pub mod audio;
pub mod diagnostics;
pub mod errors;
pub mod init;
pub mod logging;
pub mod panic_handler;
pub mod platform;
pub mod profiles;
pub mod settings;

use std::path::Path;

use serde_derive::Serialize;
use tracing::*;

use args::{InitSubcommand, ListSubcommand, ProfileAction, ProfileSave, SubCommands, TopLevelCmd};
use audio::{AudioControl, Endpoint, Flow};
use errors::AppResult;
use init::{initialize_workspace, InitOptions};
use profiles::{Profile, Profiles};
use settings::Settings;

pub fn is_portable() -> bool {
    cfg!(feature = "portable")
}

/// Runs a single command. `Ok(false)` means the command ran but didn't succeed.
pub fn run(args: TopLevelCmd, settings: &Settings, settings_path: &Path) -> AppResult<bool> {
    let control = AudioControl::native(&settings.helper);
    debug!("Using {} audio backend", control.backend_name());

    match args.subcommand {
        SubCommands::List(list) => print_devices(&control, &list),
        SubCommands::SetDefaultPlayback(cmd) => {
            set_default(&control, settings, &cmd.identifier, Flow::Playback, cmd.debug)
        }
        SubCommands::SetDefaultRecording(cmd) => {
            set_default(&control, settings, &cmd.identifier, Flow::Recording, cmd.debug)
        }
        SubCommands::Volume(cmd) => Ok(report_ok(control.set_master_volume(cmd.percent))),
        SubCommands::Mute(cmd) => Ok(report_ok(control.set_mute(cmd.state.into()))),
        SubCommands::TestTone(cmd) => {
            control.play_test_tone(cmd.freq, cmd.ms);
            println!("tone");
            Ok(true)
        }
        SubCommands::Doctor(cmd) => {
            let report = diagnostics::run_basic_checks(&control);
            if cmd.json {
                println!("{}", report.to_json()?);
            } else {
                println!("{}", report.format_for_cli()?);
            }
            Ok(true)
        }
        SubCommands::Init(cmd) => init(&control, settings, settings_path, &cmd),
        SubCommands::Profile(cmd) => match cmd.action {
            ProfileAction::List(_) => {
                let profiles = Profiles::build()?;
                if profiles.is_empty() {
                    println!("No profiles found in {}/", profiles::PROFILES_PATH);
                }
                for (key, profile) in &profiles.inner {
                    println!("- {key} :: {}", profile.name);
                }
                Ok(true)
            }
            ProfileAction::Apply(apply) => {
                let profiles = Profiles::build()?;
                let outcome = profiles.get(&apply.name)?.apply(&control);
                Ok(report_ok(outcome.all_ok()))
            }
            ProfileAction::Save(save) => save_profile(&control, &save),
        },
        SubCommands::Restore(_) => {
            let outcome = defaults_profile(settings).apply(&control);
            Ok(report_ok(outcome.all_ok()))
        }
    }
}

fn report_ok(ok: bool) -> bool {
    println!("{}", if ok { "ok" } else { "failed" });
    ok
}

#[derive(Serialize)]
struct DeviceListing {
    #[serde(skip_serializing_if = "Option::is_none")]
    playback: Option<Vec<Endpoint>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    recording: Option<Vec<Endpoint>>,
    default_playback: Option<String>,
    default_recording: Option<String>,
}

fn print_devices(control: &AudioControl, list: &ListSubcommand) -> AppResult<bool> {
    // Neither flag means both
    let both = !list.playback && !list.recording;
    let (playback, recording) = control.list_all();
    let listing = DeviceListing {
        playback: (both || list.playback).then_some(playback),
        recording: (both || list.recording).then_some(recording),
        default_playback: control.default_endpoint(Flow::Playback),
        default_recording: control.default_endpoint(Flow::Recording),
    };

    if list.json {
        println!("{}", serde_json::to_string_pretty(&listing)?);
        return Ok(true);
    }

    let sections = [
        ("Playback", &listing.playback, &listing.default_playback),
        ("Recording", &listing.recording, &listing.default_recording),
    ];
    for (title, endpoints, default_id) in sections {
        let Some(endpoints) = endpoints else {
            continue;
        };
        println!("{title} devices:");
        if endpoints.is_empty() {
            println!("  (none)");
        }
        for endpoint in endpoints {
            let marker = if default_id.as_deref() == Some(endpoint.id.as_str()) {
                "*"
            } else {
                "-"
            };
            println!("{marker} {endpoint}");
        }
    }
    Ok(true)
}

fn set_default(
    control: &AudioControl,
    settings: &Settings,
    identifier: &str,
    flow: Flow,
    debug: bool,
) -> AppResult<bool> {
    if debug {
        let report = control.set_default_debug(identifier, flow);
        println!("{report}");
        println!("{}", report.to_json()?);
        return Ok(report.overall_success);
    }

    if !control.set_default(identifier, flow) {
        println!("failed ({})", control.helper().hint());
        return Ok(false);
    }
    println!("ok");

    std::thread::sleep(settings.settle_delay());
    match control.default_endpoint(flow) {
        Some(id) => println!("Default {flow} device is now {id}"),
        None => println!("Couldn't read back the default {flow} device"),
    }
    Ok(true)
}

/// The devices and volume from `[defaults]`, blank entries are left alone.
fn defaults_profile(settings: &Settings) -> Profile {
    let non_empty = |s: &str| (!s.trim().is_empty()).then(|| s.to_string());
    Profile {
        name: String::from("Defaults"),
        playback: non_empty(&settings.defaults.playback),
        recording: non_empty(&settings.defaults.recording),
        volume: Some(settings.defaults.master_volume),
        mute: None,
    }
}

fn current_state(control: &AudioControl, name: &str) -> Profile {
    Profile {
        name: name.to_string(),
        playback: control.default_endpoint(Flow::Playback),
        recording: control.default_endpoint(Flow::Recording),
        volume: control.master_volume(),
        mute: control.is_muted(),
    }
}

fn save_profile(control: &AudioControl, save: &ProfileSave) -> AppResult<bool> {
    let mut profiles = Profiles::build()?;
    let profile = current_state(control, &save.name);
    let path = profiles.save(&save.name, profile, save.force)?;
    println!("Saved profile to {}", path.display());
    Ok(true)
}

fn init(
    control: &AudioControl,
    settings: &Settings,
    settings_path: &Path,
    cmd: &InitSubcommand,
) -> AppResult<bool> {
    let root = std::env::current_dir()?;
    let mut example = current_state(control, "Dictation");
    // Settings defaults win over whatever happens to be active right now
    let defaults = defaults_profile(settings);
    example.playback = defaults.playback.or(example.playback);
    example.recording = defaults.recording.or(example.recording);
    example.volume = example.volume.or(defaults.volume);
    example.mute = Some(false);

    let steps = initialize_workspace(
        &root,
        settings,
        settings_path,
        &example,
        InitOptions {
            force: cmd.force,
            dry_run: cmd.dry_run,
        },
    )?;
    for step in steps {
        println!("{step}");
    }
    Ok(true)
}
