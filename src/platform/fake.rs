//! Scriptable backend for exercising the core without a sound card.

use std::{
    cell::RefCell,
    collections::{HashMap, HashSet},
    rc::Rc,
};

use crate::{
    audio::{Flow, InterfaceCandidate, RawDevice, Role},
    errors::{AppError, AppResult},
};

use super::{DefaultEndpointPolicy, EndpointBackend, MasterVolume};

/// Status returned by `CoCreateInstance` for an unknown class
pub const REGDB_E_CLASSNOTREG: i32 = 0x8004_0154_u32 as i32;
/// Generic `E_FAIL`
pub const E_FAIL: i32 = 0x8000_4005_u32 as i32;

#[derive(Default)]
pub struct FakeBackend {
    /// `None` in an entry simulates an unreadable device
    pub devices: Vec<Option<RawDevice>>,
    pub render_ids: HashSet<String>,
    pub capture_ids: HashSet<String>,
    pub fail_enumeration: bool,
    pub defaults: HashMap<(Flow, Role), String>,
    /// Per-candidate-label role status codes. Missing labels fail instantiation.
    pub policies: HashMap<&'static str, HashMap<Role, i32>>,
    pub volume: Option<Rc<FakeVolume>>,
    /// Every `SetDefaultEndpoint` call, in order
    pub calls: Rc<RefCell<Vec<(&'static str, String, Role)>>>,
    pub beeps: Rc<RefCell<Vec<(u32, u32)>>>,
}

impl FakeBackend {
    pub fn with_device(mut self, id: &str, name: &str, flow: Option<Flow>) -> Self {
        self.devices.push(Some(RawDevice::new(id, Some(name))));
        match flow {
            Some(Flow::Playback) => {
                self.render_ids.insert(id.to_string());
            }
            Some(Flow::Recording) => {
                self.capture_ids.insert(id.to_string());
            }
            None => (),
        }
        self
    }
    pub fn with_broken_device(mut self) -> Self {
        self.devices.push(None);
        self
    }
    pub fn with_policy(mut self, label: &'static str, codes: &[(Role, i32)]) -> Self {
        self.policies
            .insert(label, codes.iter().copied().collect::<HashMap<_, _>>());
        self
    }
    pub fn with_volume(mut self) -> (Self, Rc<FakeVolume>) {
        let volume = Rc::new(FakeVolume::default());
        self.volume = Some(Rc::clone(&volume));
        (self, volume)
    }
}

impl EndpointBackend for FakeBackend {
    fn name(&self) -> &'static str {
        "fake"
    }
    fn active_devices(&self) -> AppResult<Vec<AppResult<RawDevice>>> {
        if self.fail_enumeration {
            return Err(AppError::NativeUnavailable("fake".into()));
        }
        Ok(self
            .devices
            .iter()
            .map(|d| d.clone().ok_or(AppError::InvalidDeviceId))
            .collect())
    }
    fn active_ids(&self, flow: Flow) -> AppResult<HashSet<String>> {
        if self.fail_enumeration {
            return Err(AppError::NativeUnavailable("fake".into()));
        }
        Ok(match flow {
            Flow::Playback => self.render_ids.clone(),
            Flow::Recording => self.capture_ids.clone(),
        })
    }
    fn default_endpoint(&self, flow: Flow, role: Role) -> AppResult<String> {
        self.defaults
            .get(&(flow, role))
            .cloned()
            .ok_or(AppError::NativeUnavailable("no default".into()))
    }
    fn instantiate(
        &self,
        candidate: &InterfaceCandidate,
    ) -> AppResult<Box<dyn DefaultEndpointPolicy>> {
        match self.policies.get(candidate.label) {
            Some(codes) => Ok(Box::new(FakePolicy {
                label: candidate.label,
                codes: codes.clone(),
                calls: Rc::clone(&self.calls),
            })),
            None => Err(AppError::NativeUnavailable(format!(
                "class not registered ({REGDB_E_CLASSNOTREG:#010X})"
            ))),
        }
    }
    fn render_volume(&self) -> AppResult<Box<dyn MasterVolume>> {
        match self.volume.as_ref() {
            Some(volume) => Ok(Box::new(SharedVolume(Rc::clone(volume)))),
            None => Err(AppError::NativeUnavailable("no render endpoint".into())),
        }
    }
    fn beep(&self, frequency_hz: u32, duration_ms: u32) -> AppResult<()> {
        self.beeps.borrow_mut().push((frequency_hz, duration_ms));
        Ok(())
    }
}

struct FakePolicy {
    label: &'static str,
    codes: HashMap<Role, i32>,
    calls: Rc<RefCell<Vec<(&'static str, String, Role)>>>,
}

impl DefaultEndpointPolicy for FakePolicy {
    fn set_default_endpoint(&self, device_id: &str, role: Role) -> i32 {
        self.calls
            .borrow_mut()
            .push((self.label, device_id.to_string(), role));
        self.codes.get(&role).copied().unwrap_or(E_FAIL)
    }
}

#[derive(Debug, Default)]
pub struct FakeVolume {
    pub level: RefCell<f32>,
    pub muted: RefCell<bool>,
    pub fail: RefCell<bool>,
}

struct SharedVolume(Rc<FakeVolume>);

impl SharedVolume {
    fn check(&self) -> AppResult<()> {
        if *self.0.fail.borrow() {
            Err(AppError::NativeUnavailable("volume call failed".into()))
        } else {
            Ok(())
        }
    }
}

impl MasterVolume for SharedVolume {
    fn master_scalar(&self) -> AppResult<f32> {
        self.check()?;
        Ok(*self.0.level.borrow())
    }
    fn set_master_scalar(&self, level: f32) -> AppResult<()> {
        self.check()?;
        *self.0.level.borrow_mut() = level;
        Ok(())
    }
    fn mute(&self) -> AppResult<bool> {
        self.check()?;
        Ok(*self.0.muted.borrow())
    }
    fn set_mute(&self, muted: bool) -> AppResult<()> {
        self.check()?;
        *self.0.muted.borrow_mut() = muted;
        Ok(())
    }
}
