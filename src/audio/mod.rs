//! Endpoint control: listing, resolving, default switching and master volume.
//!
//! Every public operation on [`AudioControl`] is infallible from the caller's point of view.
//! Native faults are logged and turned into empty lists, `None` or `false`;
//! the only way to see what went wrong in detail is [`AudioControl::set_default_debug`].

mod candidates;
mod default_setter;
mod directory;
mod endpoint;
mod helper;
mod report;
mod resolve;
mod volume;

pub use candidates::*;
pub use directory::classify_by_name;
pub use endpoint::*;
pub use helper::{HelperLocation, HelperTool, HELPER_ROLE};
pub use report::*;
pub use resolve::resolve_among;
pub use volume::percent_to_scalar;

use crate::{
    platform::{self, EndpointBackend},
    settings::HelperSettings,
};

pub struct AudioControl {
    /// Native layer every call goes through
    backend: Box<dyn EndpointBackend>,
    /// Tried in order when setting a default endpoint
    candidates: Vec<InterfaceCandidate>,
    /// Used once every native candidate has failed
    helper: HelperTool,
}

impl AudioControl {
    pub fn new(backend: Box<dyn EndpointBackend>, helper: HelperTool) -> Self {
        Self {
            backend,
            candidates: INTERFACE_CANDIDATES.to_vec(),
            helper,
        }
    }
    /// Uses the OS audio layer if it can be loaded
    pub fn native(helper: &HelperSettings) -> Self {
        Self::new(platform::native_backend(), HelperTool::from_settings(helper))
    }
    pub fn with_candidates(mut self, candidates: Vec<InterfaceCandidate>) -> Self {
        self.candidates = candidates;
        self
    }
    pub fn candidates(&self) -> &[InterfaceCandidate] {
        &self.candidates
    }
    pub fn helper(&self) -> &HelperTool {
        &self.helper
    }
    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }
}
