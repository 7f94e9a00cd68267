#![allow(non_snake_case)]

use std::ffi::c_void;

use windows::{
    core::*,
    Win32::{
        Media::Audio::ERole,
        System::Com::{CoCreateInstance, CLSCTX_ALL},
    },
};

use crate::{
    audio::{InterfaceCandidate, InterfaceShape, Role},
    errors::AppResult,
    platform::DefaultEndpointPolicy,
};

use super::ToWide;

// Reverse engineered COM interfaces for changing the default audio endpoint.
// Only `SetDefaultEndpoint` is ever called, the rest just keep the vtable in order.

/// Windows 7 and later
#[interface("F8679F50-850A-41CF-9C72-430F290290C8")]
pub unsafe trait IPolicyConfig: IUnknown {
    fn GetMixFormat(&self, pwstrid: PCWSTR, waveformatex: *mut *mut c_void) -> HRESULT;
    fn GetDeviceFormat(
        &self,
        pwstrid: PCWSTR,
        default: i32,
        waveformatex: *mut *mut c_void,
    ) -> HRESULT;
    fn ResetDeviceFormat(&self, pwstrid: PCWSTR) -> HRESULT;
    fn SetDeviceFormat(
        &self,
        pwstrid: PCWSTR,
        endpoint_format: *mut c_void,
        mix_format: *mut c_void,
    ) -> HRESULT;
    fn GetProcessingPeriod(
        &self,
        pwstrid: PCWSTR,
        default: i32,
        default_period: *mut i64,
        minimum_period: *mut i64,
    ) -> HRESULT;
    fn SetProcessingPeriod(&self, pwstrid: PCWSTR, period: *mut i64) -> HRESULT;
    fn GetShareMode(&self, pwstrid: PCWSTR, mode: *mut c_void) -> HRESULT;
    fn SetShareMode(&self, pwstrid: PCWSTR, mode: *mut c_void) -> HRESULT;
    fn GetPropertyValue(&self, pwstrid: PCWSTR, key: *const c_void, value: *mut c_void)
        -> HRESULT;
    fn SetPropertyValue(&self, pwstrid: PCWSTR, key: *const c_void, value: *mut c_void)
        -> HRESULT;
    fn SetDefaultEndpoint(&self, pwstrid: PCWSTR, role: ERole) -> HRESULT;
    fn SetEndpointVisibility(&self, pwstrid: PCWSTR, visible: i32) -> HRESULT;
}

/// Vista layout, same as above minus `ResetDeviceFormat`
#[interface("568B9108-44BF-40B4-9006-86AFE5B5A620")]
pub unsafe trait IPolicyConfigVista: IUnknown {
    fn GetMixFormat(&self, pwstrid: PCWSTR, waveformatex: *mut *mut c_void) -> HRESULT;
    fn GetDeviceFormat(
        &self,
        pwstrid: PCWSTR,
        default: i32,
        waveformatex: *mut *mut c_void,
    ) -> HRESULT;
    fn SetDeviceFormat(
        &self,
        pwstrid: PCWSTR,
        endpoint_format: *mut c_void,
        mix_format: *mut c_void,
    ) -> HRESULT;
    fn GetProcessingPeriod(
        &self,
        pwstrid: PCWSTR,
        default: i32,
        default_period: *mut i64,
        minimum_period: *mut i64,
    ) -> HRESULT;
    fn SetProcessingPeriod(&self, pwstrid: PCWSTR, period: *mut i64) -> HRESULT;
    fn GetShareMode(&self, pwstrid: PCWSTR, mode: *mut c_void) -> HRESULT;
    fn SetShareMode(&self, pwstrid: PCWSTR, mode: *mut c_void) -> HRESULT;
    fn GetPropertyValue(&self, pwstrid: PCWSTR, key: *const c_void, value: *mut c_void)
        -> HRESULT;
    fn SetPropertyValue(&self, pwstrid: PCWSTR, key: *const c_void, value: *mut c_void)
        -> HRESULT;
    fn SetDefaultEndpoint(&self, pwstrid: PCWSTR, role: ERole) -> HRESULT;
    fn SetEndpointVisibility(&self, pwstrid: PCWSTR, visible: i32) -> HRESULT;
}

pub enum PolicyConfigObject {
    Win7(IPolicyConfig),
    Vista(IPolicyConfigVista),
}

impl PolicyConfigObject {
    pub fn create(candidate: &InterfaceCandidate) -> AppResult<Self> {
        let clsid = GUID::from_u128(candidate.class_id);
        let object = match candidate.shape {
            InterfaceShape::PolicyConfig => {
                Self::Win7(unsafe { CoCreateInstance(&clsid, None, CLSCTX_ALL) }?)
            }
            InterfaceShape::PolicyConfigVista => {
                Self::Vista(unsafe { CoCreateInstance(&clsid, None, CLSCTX_ALL) }?)
            }
        };
        Ok(object)
    }
}

impl DefaultEndpointPolicy for PolicyConfigObject {
    fn set_default_endpoint(&self, device_id: &str, role: Role) -> i32 {
        let wide_id = device_id.to_wide();
        let role = ERole(role.index() as i32);
        let hr = unsafe {
            match self {
                Self::Win7(policy) => policy.SetDefaultEndpoint(wide_id.as_pcwstr(), role),
                Self::Vista(policy) => policy.SetDefaultEndpoint(wide_id.as_pcwstr(), role),
            }
        };
        hr.0
    }
}
