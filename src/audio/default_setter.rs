use std::collections::BTreeMap;

use tracing::{debug, info, warn};

use super::{
    AttemptReport, AttemptStrength, AudioControl, CandidateAttempt, Flow, InterfaceCandidate,
    Role, RoleOutcome,
};

impl AudioControl {
    /// Makes `identifier` the default `flow` device for every role.
    ///
    /// Stops at the first native candidate that gets any role to stick.
    /// If none do, hands the raw identifier to the helper tool.
    pub fn set_default(&self, identifier: &str, flow: Flow) -> bool {
        let device_id = self.target_id(identifier);

        for candidate in &self.candidates {
            let attempt = self.attempt_candidate(candidate, &device_id);
            match attempt.strength() {
                AttemptStrength::Full => {
                    info!("Set {device_id} as default {flow} device via {}", attempt.label);
                    return true;
                }
                AttemptStrength::Weak => {
                    warn!(
                        "{} set {device_id} for some roles, but not Multimedia",
                        attempt.label
                    );
                    return true;
                }
                AttemptStrength::Failed => (),
            }
        }

        info!("No native candidate worked, trying {}", self.helper.executable());
        self.helper.set_default(identifier, flow)
    }
    /// Tries every candidate, even after one succeeds, and reports what each did.
    ///
    /// Never runs the helper tool.
    pub fn set_default_debug(&self, identifier: &str, flow: Flow) -> AttemptReport {
        let device_id = self.target_id(identifier);
        let attempts = self
            .candidates
            .iter()
            .map(|candidate| self.attempt_candidate(candidate, &device_id))
            .collect();
        AttemptReport::new(device_id, flow, attempts).with_fallback_hint(self.helper.hint())
    }
    /// Resolved id, or the input as-is so the native calls can fail on their own
    fn target_id(&self, identifier: &str) -> String {
        self.resolve(identifier).unwrap_or_else(|| {
            debug!("Couldn't resolve {identifier:?}, using it verbatim");
            identifier.to_string()
        })
    }
    fn attempt_candidate(
        &self,
        candidate: &InterfaceCandidate,
        device_id: &str,
    ) -> CandidateAttempt {
        let policy = match self.backend.instantiate(candidate) {
            Ok(policy) => policy,
            Err(e) => {
                debug!("{} unavailable: {e}", candidate.label);
                return CandidateAttempt::instantiation_failed(candidate, &e);
            }
        };

        let roles: BTreeMap<Role, RoleOutcome> = Role::ALL
            .into_iter()
            .map(|role| {
                let outcome = RoleOutcome {
                    code: policy.set_default_endpoint(device_id, role),
                };
                debug!("{} {role}: {outcome}", candidate.label);
                (role, outcome)
            })
            .collect();

        CandidateAttempt::invoked(candidate, roles)
    }
}

#[cfg(test)]
mod tests {
    use crate::audio::{
        AttemptStrength, AudioControl, Flow, HelperTool, Role, INTERFACE_CANDIDATES,
    };
    use crate::platform::fake::{FakeBackend, E_FAIL};

    const E_ACCESSDENIED: i32 = 0x8007_0005_u32 as i32;

    fn labels() -> [&'static str; 3] {
        [
            INTERFACE_CANDIDATES[0].label,
            INTERFACE_CANDIDATES[1].label,
            INTERFACE_CANDIDATES[2].label,
        ]
    }

    fn devices() -> FakeBackend {
        FakeBackend::default()
            .with_device("{render.a}", "Speakers (USB Audio)", Some(Flow::Playback))
            .with_device("{capture.a}", "Headset Microphone", Some(Flow::Recording))
    }

    fn control(backend: FakeBackend) -> AudioControl {
        let dir = std::env::temp_dir().join("audioctl-tests-no-tools");
        AudioControl::new(
            Box::new(backend),
            HelperTool::new(dir, "audioctl-no-such-helper-9f3c.exe"),
        )
    }

    #[test]
    fn third_candidate_multimedia_only() {
        let [_, _, third] = labels();
        let backend = devices().with_policy(
            third,
            &[
                (Role::Console, E_ACCESSDENIED),
                (Role::Multimedia, 0),
                (Role::Communications, E_FAIL),
            ],
        );
        let calls = std::rc::Rc::clone(&backend.calls);
        let control = control(backend);

        assert!(control.set_default("speakers", Flow::Playback));
        // Resolved id is what the native layer sees
        assert!(calls
            .borrow()
            .iter()
            .all(|(label, id, _)| *label == third && id == "{render.a}"));

        let report = control.set_default_debug("speakers", Flow::Playback);
        assert!(report.overall_success);
        assert_eq!(report.device_id, "{render.a}");
        assert_eq!(report.attempts.len(), 3);
        assert!(report.attempts[0].error.is_some());
        assert!(report.attempts[1].error.is_some());
        assert!(report.attempts[2].error.is_none());
        assert!(report.attempts[2].ok_multimedia);
        assert!(!report.attempts[2].ok_all);
        assert_eq!(report.best(), AttemptStrength::Full);
        assert_eq!(report.fallback_hint, None);
    }

    #[test]
    fn boolean_path_short_circuits_debug_path_does_not() {
        let [first, second, third] = labels();
        let all_ok = [
            (Role::Console, 0),
            (Role::Multimedia, 0),
            (Role::Communications, 0),
        ];
        let backend = devices()
            .with_policy(first, &all_ok)
            .with_policy(second, &all_ok)
            .with_policy(third, &all_ok);
        let calls = std::rc::Rc::clone(&backend.calls);
        let control = control(backend);

        assert!(control.set_default("{capture.a}", Flow::Recording));
        assert_eq!(calls.borrow().len(), 3);
        assert!(calls.borrow().iter().all(|(label, _, _)| *label == first));

        calls.borrow_mut().clear();
        let report = control.set_default_debug("{capture.a}", Flow::Recording);
        assert_eq!(report.attempts.len(), 3);
        assert!(report.attempts.iter().all(|a| a.ok_all));
        assert_eq!(calls.borrow().len(), 9);
    }

    #[test]
    fn every_role_is_tried_in_order() {
        let [first, _, _] = labels();
        let backend = devices().with_policy(first, &[(Role::Multimedia, 0)]);
        let calls = std::rc::Rc::clone(&backend.calls);
        let control = control(backend);

        assert!(control.set_default("{render.a}", Flow::Playback));
        let roles: Vec<Role> = calls.borrow().iter().map(|(_, _, role)| *role).collect();
        assert_eq!(roles, Role::ALL.to_vec());
    }

    #[test]
    fn weak_success_still_counts() {
        let [_, second, _] = labels();
        let backend = devices().with_policy(
            second,
            &[
                (Role::Console, 0),
                (Role::Multimedia, E_ACCESSDENIED),
                (Role::Communications, E_ACCESSDENIED),
            ],
        );
        let control = control(backend);
        assert!(control.set_default("Headset", Flow::Recording));

        let report = control.set_default_debug("Headset", Flow::Recording);
        assert!(report.overall_success);
        assert_eq!(report.best(), AttemptStrength::Weak);
        assert!(report.attempts[1].ok_any);
        assert!(!report.attempts[1].ok_multimedia);
    }

    #[test]
    fn nothing_available_and_no_helper_is_false() {
        let control = control(devices());
        assert!(!control.set_default("Speakers", Flow::Playback));

        let report = control.set_default_debug("Speakers", Flow::Playback);
        assert!(!report.overall_success);
        assert_eq!(report.attempts.len(), 3);
        assert!(report.attempts.iter().all(|a| a.error.is_some()));
        assert!(report
            .fallback_hint
            .as_deref()
            .is_some_and(|hint| hint.contains("audioctl-no-such-helper-9f3c.exe")));
    }

    #[test]
    fn every_role_failing_is_not_success() {
        let [first, second, third] = labels();
        let backend = devices()
            .with_policy(first, &[])
            .with_policy(second, &[])
            .with_policy(third, &[]);
        let calls = std::rc::Rc::clone(&backend.calls);
        let control = control(backend);

        assert!(!control.set_default("Speakers", Flow::Playback));
        // All three candidates, all three roles, then the helper
        assert_eq!(calls.borrow().len(), 9);
    }

    #[cfg(unix)]
    #[test]
    fn helper_gets_the_raw_identifier_when_native_fails() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let log = dir.path().join("args.txt");
        let script = dir.path().join("ok-helper");
        std::fs::write(
            &script,
            format!("#!/bin/sh\necho \"$@\" > '{}'\nexit 0\n", log.display()),
        )
        .unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

        // No policies: every candidate fails to instantiate
        let backend = devices();
        let calls = std::rc::Rc::clone(&backend.calls);
        let control = AudioControl::new(
            Box::new(backend),
            HelperTool::new(dir.path(), "ok-helper"),
        );

        assert!(control.set_default("speakers", Flow::Playback));
        assert!(calls.borrow().is_empty());
        let recorded = std::fs::read_to_string(&log).unwrap();
        assert_eq!(recorded.trim(), "/SetDefault speakers 1 Render");
        assert!(!recorded.contains("{render.a}"));
    }

    #[test]
    fn unresolvable_identifier_is_passed_through() {
        let [first, _, _] = labels();
        let backend = devices().with_policy(first, &[(Role::Multimedia, 0)]);
        let calls = std::rc::Rc::clone(&backend.calls);
        let control = control(backend);

        let report = control.set_default_debug("{not.enumerated}", Flow::Playback);
        assert_eq!(report.device_id, "{not.enumerated}");
        assert!(calls
            .borrow()
            .iter()
            .all(|(_, id, _)| id == "{not.enumerated}"));
    }

    #[test]
    fn native_layer_missing_entirely() {
        let control = AudioControl::new(
            Box::new(crate::platform::UnavailableBackend::new("not loaded")),
            HelperTool::new(
                std::env::temp_dir().join("audioctl-tests-no-tools"),
                "audioctl-no-such-helper-9f3c.exe",
            ),
        );
        assert!(!control.set_default("Speakers", Flow::Playback));
        let report = control.set_default_debug("Speakers", Flow::Playback);
        assert_eq!(report.device_id, "Speakers");
        assert!(!report.overall_success);
    }

    #[test]
    fn custom_candidate_list_is_respected() {
        let [first, _, _] = labels();
        let control = control(devices()).with_candidates(vec![INTERFACE_CANDIDATES[0].clone()]);
        assert_eq!(control.candidates().len(), 1);
        let report = control.set_default_debug("Speakers", Flow::Playback);
        assert_eq!(report.attempts.len(), 1);
        assert_eq!(report.attempts[0].label, first);
    }
}
