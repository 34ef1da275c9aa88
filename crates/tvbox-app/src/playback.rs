//! Playback clock for hosts without an audio device.
//!
//! `NullAudio` never reports progress, so the host advances the previewer
//! by wall time between frames and ends the track when its duration runs
//! out. Tracks with an unknown (zero) duration play until paused.

use std::time::Duration;

use tvbox_core::launcher::Launcher;
use tvbox_core::platform::AudioSink;

/// Advance the playing track by `elapsed`. Returns `true` if it ended.
pub fn advance(launcher: &mut Launcher, audio: &mut dyn AudioSink, elapsed: Duration) -> bool {
    let previewer = launcher.previewer();
    if previewer.playing().is_none() {
        return false;
    }
    let duration = previewer.duration_secs();
    let position = previewer.position_secs() + elapsed.as_secs_f64();
    launcher.preview_progress(position);
    if duration > 0.0 && position >= duration {
        log::debug!("preview reached its end at {position:.1}s");
        audio.pause();
        launcher.preview_ended();
        return true;
    }
    false
}

#[cfg(test)]
mod tests {
    use tvbox_core::platform::{MemoryStore, NullAudio};
    use tvbox_core::section::GridColumns;

    use super::*;

    fn playing(duration: f64) -> (Launcher, NullAudio) {
        let mut l = Launcher::new(Box::new(MemoryStore::new()), GridColumns::default());
        let mut audio = NullAudio::default();
        l.login("admin123").unwrap();
        l.admin(|panel, handles| panel.import_track("t", "Tune.ogg", duration, handles))
            .unwrap();
        assert!(l.preview("t", &mut audio).unwrap());
        (l, audio)
    }

    #[test]
    fn idle_previewer_is_untouched() {
        let mut l = Launcher::new(Box::new(MemoryStore::new()), GridColumns::default());
        let mut audio = NullAudio::default();
        assert!(!advance(&mut l, &mut audio, Duration::from_secs(5)));
        assert_eq!(l.previewer().position_secs(), 0.0);
    }

    #[test]
    fn position_accumulates_then_track_ends() {
        let (mut l, mut audio) = playing(3.0);
        assert!(!advance(&mut l, &mut audio, Duration::from_secs(1)));
        assert!(!advance(&mut l, &mut audio, Duration::from_millis(1500)));
        assert_eq!(l.previewer().position_secs(), 2.5);
        assert!(audio.playing.is_some());

        assert!(advance(&mut l, &mut audio, Duration::from_secs(1)));
        assert_eq!(l.previewer().playing(), None);
        assert_eq!(l.previewer().position_secs(), 0.0);
        assert!(audio.playing.is_none());
    }

    #[test]
    fn unknown_duration_keeps_playing() {
        let (mut l, mut audio) = playing(0.0);
        assert!(!advance(&mut l, &mut audio, Duration::from_secs(600)));
        assert!(l.previewer().is_playing("t"));
        assert_eq!(l.previewer().position_secs(), 600.0);
    }
}
