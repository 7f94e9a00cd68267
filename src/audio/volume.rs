use tracing::{debug, info, warn};

use super::AudioControl;

/// Clamps to 0..=100 and scales to 0.0..=1.0
pub fn percent_to_scalar(percent: i32) -> f32 {
    percent.clamp(0, 100) as f32 / 100.0
}

// All of these act on whatever Windows currently considers the default render device,
// just like the system volume flyout.
impl AudioControl {
    pub fn set_master_volume(&self, percent: i32) -> bool {
        let level = percent_to_scalar(percent);
        match self
            .backend
            .render_volume()
            .and_then(|volume| volume.set_master_scalar(level))
        {
            Ok(()) => {
                info!("Master volume set to {level:.2}");
                true
            }
            Err(e) => {
                warn!("Couldn't set master volume: {e}");
                false
            }
        }
    }
    pub fn set_mute(&self, enabled: bool) -> bool {
        match self
            .backend
            .render_volume()
            .and_then(|volume| volume.set_mute(enabled))
        {
            Ok(()) => {
                info!("Mute {}", if enabled { "on" } else { "off" });
                true
            }
            Err(e) => {
                warn!("Couldn't change mute: {e}");
                false
            }
        }
    }
    /// Current master volume in percent
    pub fn master_volume(&self) -> Option<u8> {
        self.backend
            .render_volume()
            .and_then(|volume| volume.master_scalar())
            .map(|level| (level.clamp(0.0, 1.0) * 100.0).round() as u8)
            .map_err(|e| debug!("Couldn't read master volume: {e}"))
            .ok()
    }
    pub fn is_muted(&self) -> Option<bool> {
        self.backend
            .render_volume()
            .and_then(|volume| volume.mute())
            .map_err(|e| debug!("Couldn't read mute state: {e}"))
            .ok()
    }
    /// Beeps through the OS tone generator. Failures are only logged.
    pub fn play_test_tone(&self, frequency_hz: u32, duration_ms: u32) {
        if let Err(e) = self.backend.beep(frequency_hz, duration_ms) {
            debug!("Test tone failed: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::HelperTool;
    use crate::platform::{fake::FakeBackend, UnavailableBackend};

    fn helper() -> HelperTool {
        HelperTool::new("tools", "missing-helper-for-tests.exe")
    }

    #[test]
    fn percent_is_clamped() {
        assert_eq!(percent_to_scalar(-5), percent_to_scalar(0));
        assert_eq!(percent_to_scalar(150), percent_to_scalar(100));
        assert_eq!(percent_to_scalar(100), 1.0);
        assert_eq!(percent_to_scalar(35), 0.35);
    }

    #[test]
    fn out_of_range_volume_matches_the_bounds() {
        let (backend, volume) = FakeBackend::default().with_volume();
        let control = AudioControl::new(Box::new(backend), helper());

        assert!(control.set_master_volume(-5));
        assert_eq!(*volume.level.borrow(), 0.0);
        assert!(control.set_master_volume(150));
        assert_eq!(*volume.level.borrow(), 1.0);
        assert!(control.set_master_volume(42));
        assert_eq!(control.master_volume(), Some(42));
    }

    #[test]
    fn mute_round_trips_through_the_endpoint() {
        let (backend, volume) = FakeBackend::default().with_volume();
        let control = AudioControl::new(Box::new(backend), helper());
        assert!(control.set_mute(true));
        assert!(*volume.muted.borrow());
        assert_eq!(control.is_muted(), Some(true));
        assert!(control.set_mute(false));
        assert_eq!(control.is_muted(), Some(false));
    }

    #[test]
    fn test_tone_reaches_the_backend() {
        let backend = FakeBackend::default();
        let beeps = std::rc::Rc::clone(&backend.beeps);
        let control = AudioControl::new(Box::new(backend), helper());
        control.play_test_tone(440, 100);
        assert_eq!(*beeps.borrow(), vec![(440, 100)]);
    }

    #[test]
    fn failures_become_false() {
        let (backend, volume) = FakeBackend::default().with_volume();
        *volume.fail.borrow_mut() = true;
        let control = AudioControl::new(Box::new(backend), helper());
        assert!(!control.set_master_volume(50));
        assert!(!control.set_mute(true));
        assert_eq!(control.master_volume(), None);

        let control = AudioControl::new(Box::new(UnavailableBackend::new("gone")), helper());
        assert!(!control.set_master_volume(50));
        assert!(!control.set_mute(false));
        assert_eq!(control.is_muted(), None);
        // Must not panic
        control.play_test_tone(880, 300);
    }
}
