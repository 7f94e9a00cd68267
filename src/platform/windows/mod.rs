use std::collections::HashSet;

use tracing::{debug, trace};
use wasapi::{get_default_device_for_role, DeviceCollection, Direction};
use windows::{
    core::{PCWSTR, PWSTR},
    Win32::{
        Devices::FunctionDiscovery::PKEY_Device_FriendlyName,
        Media::Audio::{
            eAll, eMultimedia, eRender, Endpoints::IAudioEndpointVolume, IMMDevice,
            IMMDeviceEnumerator, MMDeviceEnumerator, DEVICE_STATE_ACTIVE,
        },
        System::{
            Com::{
                CoCreateInstance, CoInitializeEx, CoTaskMemFree, CLSCTX_ALL,
                COINIT_APARTMENTTHREADED, STGM_READ,
            },
            Diagnostics::Debug::Beep,
        },
    },
};

use crate::{
    audio::{Flow, InterfaceCandidate, RawDevice, Role},
    errors::{AppError, AppResult},
};

use policy_config::PolicyConfigObject;

use super::{DefaultEndpointPolicy, EndpointBackend, MasterVolume};

mod policy_config;

/// Windows Core Audio, plus the undocumented bits needed to change defaults.
pub struct AudioNightmare {}

impl AudioNightmare {
    pub fn build() -> AppResult<Self> {
        unsafe {
            CoInitializeEx(None, COINIT_APARTMENTTHREADED).ok()?;
        }
        // Make sure the enumerator is reachable at all before claiming we're usable
        let _ = device_enumerator()?;
        // https://github.com/microsoft/windows-rs/issues/1169#issuecomment-926877227
        // CoUninitialize is never called, COM stays up for the life of the process.
        Ok(Self {})
    }
}

fn device_enumerator() -> AppResult<IMMDeviceEnumerator> {
    let enumerator = unsafe { CoCreateInstance(&MMDeviceEnumerator, None, CLSCTX_ALL) }?;
    Ok(enumerator)
}

fn device_id(device: &IMMDevice) -> AppResult<String> {
    unsafe {
        let raw: PWSTR = device.GetId()?;
        let id = raw.to_string().map_err(|_| AppError::InvalidDeviceId);
        CoTaskMemFree(Some(raw.0 as *const _));
        id
    }
}

fn friendly_name(device: &IMMDevice) -> Option<String> {
    let store = unsafe { device.OpenPropertyStore(STGM_READ) }.ok()?;
    let value = unsafe { store.GetValue(&PKEY_Device_FriendlyName) }.ok()?;
    let name = value.to_string();
    if name.is_empty() {
        None
    } else {
        Some(name)
    }
}

impl EndpointBackend for AudioNightmare {
    fn name(&self) -> &'static str {
        "windows-core-audio"
    }
    fn active_devices(&self) -> AppResult<Vec<AppResult<RawDevice>>> {
        let enumerator = device_enumerator()?;
        let collection = unsafe { enumerator.EnumAudioEndpoints(eAll, DEVICE_STATE_ACTIVE) }?;
        let count = unsafe { collection.GetCount() }?;
        trace!("{count} active endpoints");

        let devices = (0..count)
            .map(|i| -> AppResult<RawDevice> {
                let device = unsafe { collection.Item(i) }?;
                Ok(RawDevice {
                    id: device_id(&device)?,
                    name: friendly_name(&device),
                })
            })
            .collect();
        Ok(devices)
    }
    fn active_ids(&self, flow: Flow) -> AppResult<HashSet<String>> {
        let collection = DeviceCollection::new(&flow.into()).map_err(AppError::wasapi)?;
        let mut ids = HashSet::new();
        for device in &collection {
            match device.and_then(|d| d.get_id()) {
                Ok(id) => {
                    ids.insert(id);
                }
                Err(e) => debug!("Skipping unreadable {flow} endpoint: {e}"),
            }
        }
        Ok(ids)
    }
    fn default_endpoint(&self, flow: Flow, role: Role) -> AppResult<String> {
        let device =
            get_default_device_for_role(&flow.into(), &role.into()).map_err(AppError::wasapi)?;
        device.get_id().map_err(AppError::wasapi)
    }
    fn instantiate(
        &self,
        candidate: &InterfaceCandidate,
    ) -> AppResult<Box<dyn DefaultEndpointPolicy>> {
        Ok(Box::new(PolicyConfigObject::create(candidate)?))
    }
    fn render_volume(&self) -> AppResult<Box<dyn MasterVolume>> {
        let enumerator = device_enumerator()?;
        let device = unsafe { enumerator.GetDefaultAudioEndpoint(eRender, eMultimedia) }?;
        let endpoint_volume: IAudioEndpointVolume = unsafe { device.Activate(CLSCTX_ALL, None) }?;
        Ok(Box::new(EndpointVolume(endpoint_volume)))
    }
    fn beep(&self, frequency_hz: u32, duration_ms: u32) -> AppResult<()> {
        unsafe { Beep(frequency_hz, duration_ms) }?;
        Ok(())
    }
}

struct EndpointVolume(IAudioEndpointVolume);

impl MasterVolume for EndpointVolume {
    fn master_scalar(&self) -> AppResult<f32> {
        Ok(unsafe { self.0.GetMasterVolumeLevelScalar() }?)
    }
    fn set_master_scalar(&self, level: f32) -> AppResult<()> {
        unsafe { self.0.SetMasterVolumeLevelScalar(level, std::ptr::null()) }?;
        Ok(())
    }
    fn mute(&self) -> AppResult<bool> {
        Ok(unsafe { self.0.GetMute() }?.as_bool())
    }
    fn set_mute(&self, muted: bool) -> AppResult<()> {
        unsafe { self.0.SetMute(muted, std::ptr::null()) }?;
        Ok(())
    }
}

impl From<Flow> for Direction {
    fn from(value: Flow) -> Self {
        match value {
            Flow::Playback => Self::Render,
            Flow::Recording => Self::Capture,
        }
    }
}

impl From<Role> for wasapi::Role {
    fn from(value: Role) -> Self {
        match value {
            Role::Console => Self::Console,
            Role::Multimedia => Self::Multimedia,
            Role::Communications => Self::Communications,
        }
    }
}

// Yoinked from https://gist.github.com/dgellow/fb85229ee8aeabf3844a5f3d38eb445d

#[derive(Default)]
pub struct WideString(pub Vec<u16>);

pub trait ToWide {
    fn to_wide(&self) -> WideString;
}

impl ToWide for &str {
    fn to_wide(&self) -> WideString {
        let mut result: Vec<u16> = self.encode_utf16().collect();
        result.push(0);
        WideString(result)
    }
}

impl WideString {
    pub fn as_pcwstr(&self) -> PCWSTR {
        PCWSTR(self.0.as_ptr())
    }
}
