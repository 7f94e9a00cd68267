use std::{collections::BTreeMap, fmt::Display};

use serde_derive::Serialize;

use crate::errors::{AppError, AppResult};

use super::{Flow, InterfaceCandidate, InterfaceShape, Role};

/// Result of a single `SetDefaultEndpoint` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RoleOutcome {
    pub code: i32,
}

impl RoleOutcome {
    pub fn succeeded(&self) -> bool {
        self.code >= 0
    }
}

impl Display for RoleOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.succeeded() {
            write!(f, "ok")
        } else {
            write!(f, "{:#010X}", self.code)
        }
    }
}

/// How far a single candidate got.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AttemptStrength {
    Failed,
    /// At least one role took, but not Multimedia
    Weak,
    /// Multimedia role took
    Full,
}

/// Everything that happened while trying one [`InterfaceCandidate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CandidateAttempt {
    pub label: String,
    pub class_id: String,
    pub interface: InterfaceShape,
    /// Set when the COM object couldn't be created
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub roles: BTreeMap<Role, RoleOutcome>,
    pub ok_all: bool,
    pub ok_any: bool,
    pub ok_multimedia: bool,
}

impl CandidateAttempt {
    pub fn instantiation_failed(candidate: &InterfaceCandidate, error: &AppError) -> Self {
        Self {
            label: candidate.label.to_string(),
            class_id: candidate.class_id_string(),
            interface: candidate.shape,
            error: Some(format!("create_failed: {error}")),
            roles: BTreeMap::new(),
            ok_all: false,
            ok_any: false,
            ok_multimedia: false,
        }
    }
    pub fn invoked(candidate: &InterfaceCandidate, roles: BTreeMap<Role, RoleOutcome>) -> Self {
        let ok_all = !roles.is_empty() && roles.values().all(RoleOutcome::succeeded);
        let ok_any = roles.values().any(RoleOutcome::succeeded);
        let ok_multimedia = roles
            .get(&Role::Multimedia)
            .is_some_and(RoleOutcome::succeeded);
        Self {
            label: candidate.label.to_string(),
            class_id: candidate.class_id_string(),
            interface: candidate.shape,
            error: None,
            roles,
            ok_all,
            ok_any,
            ok_multimedia,
        }
    }
    pub fn strength(&self) -> AttemptStrength {
        if self.ok_multimedia {
            AttemptStrength::Full
        } else if self.ok_any {
            AttemptStrength::Weak
        } else {
            AttemptStrength::Failed
        }
    }
}

/// Structured record of a default-endpoint change, for troubleshooting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttemptReport {
    /// Id handed to the native calls (resolved, or the raw input if resolving failed)
    pub device_id: String,
    pub flow: Flow,
    /// One entry per configured candidate, in the order they were tried
    pub attempts: Vec<CandidateAttempt>,
    pub overall_success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback_hint: Option<String>,
}

impl AttemptReport {
    pub fn new(device_id: String, flow: Flow, attempts: Vec<CandidateAttempt>) -> Self {
        let overall_success = attempts.iter().any(|a| a.ok_any);
        Self {
            device_id,
            flow,
            attempts,
            overall_success,
            fallback_hint: None,
        }
    }
    pub fn with_fallback_hint(mut self, hint: String) -> Self {
        if !self.overall_success {
            self.fallback_hint = Some(hint);
        }
        self
    }
    /// Strongest result among all candidates
    pub fn best(&self) -> AttemptStrength {
        self.attempts
            .iter()
            .map(CandidateAttempt::strength)
            .max()
            .unwrap_or(AttemptStrength::Failed)
    }
    pub fn to_json(&self) -> AppResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl Display for AttemptReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Device: {} ({})", self.device_id, self.flow)?;
        for attempt in &self.attempts {
            write!(f, "- {}: ", attempt.label)?;
            match attempt.error.as_ref() {
                Some(error) => writeln!(f, "{error}")?,
                None => {
                    let roles: Vec<String> = attempt
                        .roles
                        .iter()
                        .map(|(role, outcome)| format!("{role}={outcome}"))
                        .collect();
                    writeln!(f, "{}", roles.join(", "))?;
                }
            }
        }
        write!(
            f,
            "Result: {}",
            if self.overall_success { "ok" } else { "failed" }
        )?;
        if let Some(hint) = self.fallback_hint.as_ref() {
            write!(f, " ({hint})")?;
        }
        Ok(())
    }
}
