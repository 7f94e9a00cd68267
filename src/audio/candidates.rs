//! Known variants of the undocumented "set default endpoint" COM object.
//!
//! Different Windows builds ship different (class, interface) combinations, and the
//! Vista class id is reused across interface layouts. Adding a newly discovered
//! variant only needs a new entry in [`INTERFACE_CANDIDATES`].

use std::fmt::Display;

use serde_derive::{Deserialize, Serialize};

/// Vtable layout of the policy config interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InterfaceShape {
    /// `IPolicyConfig`, Windows 7 and later
    PolicyConfig,
    /// `IPolicyConfigVista`, lacks `ResetDeviceFormat`
    PolicyConfigVista,
}

impl InterfaceShape {
    pub fn name(&self) -> &'static str {
        match self {
            InterfaceShape::PolicyConfig => "IPolicyConfig",
            InterfaceShape::PolicyConfigVista => "IPolicyConfigVista",
        }
    }
}

impl Display for InterfaceShape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

pub const CLSID_POLICY_CONFIG_CLIENT: u128 = 0x870af99c_171d_4f9e_af0d_e63df40c2bc9;
pub const CLSID_POLICY_CONFIG_VISTA_CLIENT: u128 = 0x294935ce_f637_4e7c_a41b_ab255460b862;

/// A (class id, interface shape) pair believed to expose `SetDefaultEndpoint`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceCandidate {
    pub class_id: u128,
    pub shape: InterfaceShape,
    pub label: &'static str,
}

impl InterfaceCandidate {
    pub const fn new(class_id: u128, shape: InterfaceShape, label: &'static str) -> Self {
        Self {
            class_id,
            shape,
            label,
        }
    }
    /// Class id in registry format, e.g. `{870AF99C-171D-4F9E-AF0D-E63DF40C2BC9}`
    pub fn class_id_string(&self) -> String {
        guid_string(self.class_id)
    }
}

/// Tried in this order.
pub const INTERFACE_CANDIDATES: [InterfaceCandidate; 3] = [
    InterfaceCandidate::new(
        CLSID_POLICY_CONFIG_CLIENT,
        InterfaceShape::PolicyConfig,
        "PolicyConfigClient/IPolicyConfig",
    ),
    InterfaceCandidate::new(
        CLSID_POLICY_CONFIG_VISTA_CLIENT,
        InterfaceShape::PolicyConfigVista,
        "CPolicyConfigVistaClient/IPolicyConfigVista",
    ),
    InterfaceCandidate::new(
        CLSID_POLICY_CONFIG_VISTA_CLIENT,
        InterfaceShape::PolicyConfig,
        "CPolicyConfigVistaClient/IPolicyConfig (fallback)",
    ),
];

pub fn guid_string(value: u128) -> String {
    format!(
        "{{{:08X}-{:04X}-{:04X}-{:04X}-{:012X}}}",
        (value >> 96) as u32,
        (value >> 80) as u16,
        (value >> 64) as u16,
        (value >> 48) as u16,
        value & 0xFFFF_FFFF_FFFF
    )
}
