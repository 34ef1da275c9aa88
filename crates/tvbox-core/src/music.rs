//! Local music library and previewer.
//!
//! Uploaded audio files become [`LocalTrack`]s in the settings document.
//! The media behind a track is reached through a handle from
//! [`MediaHandles`]; removing the track revokes it. The previewer plays one
//! track at a time through an [`AudioSink`].

use crate::error::{Result, TvboxError};
use crate::platform::{AudioSink, MediaHandles};
use crate::settings::LocalTrack;

pub const UNKNOWN_ARTIST: &str = "Unknown Artist";
pub const UNKNOWN_ALBUM: &str = "Unknown Album";

const AUDIO_EXTENSIONS: &[&str] = &["mp3", "wav", "ogg", "oga", "flac", "m4a", "aac", "opus", "weba"];

/// Whether `file_name` looks like an audio file.
pub fn is_audio_file(file_name: &str) -> bool {
    file_name
        .rsplit_once('.')
        .is_some_and(|(_, ext)| AUDIO_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
}

/// File name with its last extension removed (`"song.mp3"` -> `"song"`).
pub fn track_title(file_name: &str) -> &str {
    match file_name.rsplit_once('.') {
        Some((stem, ext)) if !ext.is_empty() && !ext.contains('/') => stem,
        _ => file_name,
    }
}

/// `m:ss`. Unknown (non-finite or negative) durations read `0:00`.
pub fn format_duration(secs: f64) -> String {
    let secs = if secs.is_finite() && secs > 0.0 {
        secs.floor() as u64
    } else {
        0
    };
    format!("{}:{:02}", secs / 60, secs % 60)
}

/// Add an uploaded file to `tracks`. The track goes last, enabled, with
/// placeholder artist and album.
pub fn import_track<'t>(
    tracks: &'t mut Vec<LocalTrack>,
    id: impl Into<String>,
    file_name: &str,
    duration_secs: f64,
    handles: &mut dyn MediaHandles,
) -> Result<&'t LocalTrack> {
    if !is_audio_file(file_name) {
        return Err(TvboxError::UnsupportedMedia(file_name.to_string()));
    }
    let id = id.into();
    if tracks.iter().any(|t| t.id == id) {
        return Err(TvboxError::DuplicateTile(id));
    }
    let duration_secs = if duration_secs.is_finite() && duration_secs >= 0.0 {
        duration_secs
    } else {
        0.0
    };
    let order = tracks.len() as i64;
    let url = handles.create(file_name);
    log::info!("Imported {file_name} as {id} ({url})");
    tracks.push(LocalTrack {
        id,
        title: track_title(file_name).to_string(),
        artist: UNKNOWN_ARTIST.to_string(),
        album: UNKNOWN_ALBUM.to_string(),
        duration_secs,
        url,
        enabled: true,
        order,
    });
    let last = tracks.len() - 1;
    Ok(&tracks[last])
}

/// Remove a track and release its media handle.
pub fn remove_track(
    tracks: &mut Vec<LocalTrack>,
    id: &str,
    handles: &mut dyn MediaHandles,
) -> Result<LocalTrack> {
    let index = tracks
        .iter()
        .position(|t| t.id == id)
        .ok_or_else(|| TvboxError::UnknownTrack(id.to_string()))?;
    let track = tracks.remove(index);
    if !handles.revoke(&track.url) {
        log::debug!("handle {} for {id} was already released", track.url);
    }
    Ok(track)
}

/// Field-wise edit of a track. `None` leaves the field alone.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrackPatch {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub enabled: Option<bool>,
    pub order: Option<i64>,
}

impl TrackPatch {
    pub fn apply(&self, track: &mut LocalTrack) {
        if let Some(title) = &self.title {
            track.title.clone_from(title);
        }
        if let Some(artist) = &self.artist {
            track.artist.clone_from(artist);
        }
        if let Some(album) = &self.album {
            track.album.clone_from(album);
        }
        if let Some(enabled) = self.enabled {
            track.enabled = enabled;
        }
        if let Some(order) = self.order {
            track.order = order;
        }
    }
}

pub fn update_track(tracks: &mut [LocalTrack], id: &str, patch: &TrackPatch) -> Result<()> {
    let track = tracks
        .iter_mut()
        .find(|t| t.id == id)
        .ok_or_else(|| TvboxError::UnknownTrack(id.to_string()))?;
    patch.apply(track);
    Ok(())
}

pub fn enabled_count(tracks: &[LocalTrack]) -> usize {
    tracks.iter().filter(|t| t.enabled).count()
}

/// Tracks in display order.
pub fn sorted(tracks: &[LocalTrack]) -> Vec<&LocalTrack> {
    let mut out: Vec<&LocalTrack> = tracks.iter().collect();
    out.sort_by_key(|t| t.order);
    out
}

// ---------------------------------------------------------------------------
// Previewer
// ---------------------------------------------------------------------------

/// One-track-at-a-time playback state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Previewer {
    playing: Option<String>,
    position_secs: f64,
    duration_secs: f64,
}

impl Previewer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Id of the track that is playing.
    pub fn playing(&self) -> Option<&str> {
        self.playing.as_deref()
    }

    pub fn is_playing(&self, id: &str) -> bool {
        self.playing.as_deref() == Some(id)
    }

    pub fn position_secs(&self) -> f64 {
        self.position_secs
    }

    pub fn duration_secs(&self) -> f64 {
        self.duration_secs
    }

    /// Pause `track` if it is playing, otherwise switch playback to it from
    /// the start. Returns whether `track` is now playing.
    pub fn toggle(&mut self, track: &LocalTrack, sink: &mut dyn AudioSink) -> bool {
        if self.is_playing(&track.id) {
            sink.pause();
            self.playing = None;
            return false;
        }
        sink.play(&track.url);
        self.playing = Some(track.id.clone());
        self.position_secs = 0.0;
        self.duration_secs = track.duration_secs;
        true
    }

    /// Playback progress report from the sink.
    pub fn set_position(&mut self, secs: f64) {
        if self.playing.is_some() && secs.is_finite() {
            self.position_secs = secs.max(0.0);
        }
    }

    /// The playing track reached its end.
    pub fn ended(&mut self) {
        self.playing = None;
        self.position_secs = 0.0;
    }

    /// Stop playback if `id` is the playing track (it is being removed).
    pub fn forget(&mut self, id: &str, sink: &mut dyn AudioSink) {
        if self.is_playing(id) {
            sink.pause();
            self.ended();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::{HandleRegistry, NullAudio};

    fn library(handles: &mut HandleRegistry) -> Vec<LocalTrack> {
        let mut tracks = Vec::new();
        import_track(&mut tracks, "music-1", "Intro.mp3", 125.4, handles).unwrap();
        import_track(&mut tracks, "music-2", "Outro.flac", 61.0, handles).unwrap();
        tracks
    }

    #[test]
    fn import_fills_placeholders() {
        let mut handles = HandleRegistry::new();
        let mut tracks = Vec::new();
        let track = import_track(&mut tracks, "m", "My.Song.ogg", 30.0, &mut handles).unwrap();
        assert_eq!(track.title, "My.Song");
        assert_eq!(track.artist, UNKNOWN_ARTIST);
        assert_eq!(track.album, UNKNOWN_ALBUM);
        assert_eq!(track.order, 0);
        assert!(track.enabled);
        assert!(handles.is_live(&track.url));
    }

    #[test]
    fn import_appends_in_order() {
        let mut handles = HandleRegistry::new();
        let tracks = library(&mut handles);
        assert_eq!(tracks[1].order, 1);
        assert_eq!(tracks[1].title, "Outro");
        assert_eq!(handles.live_count(), 2);
    }

    #[test]
    fn import_rejects_non_audio_and_duplicates() {
        let mut handles = HandleRegistry::new();
        let mut tracks = library(&mut handles);
        assert!(matches!(
            import_track(&mut tracks, "x", "notes.txt", 1.0, &mut handles),
            Err(TvboxError::UnsupportedMedia(_))
        ));
        assert!(matches!(
            import_track(&mut tracks, "music-1", "again.mp3", 1.0, &mut handles),
            Err(TvboxError::DuplicateTile(_))
        ));
        assert_eq!(handles.live_count(), 2);
    }

    #[test]
    fn unknown_duration_is_zero() {
        let mut handles = HandleRegistry::new();
        let mut tracks = Vec::new();
        let t = import_track(&mut tracks, "m", "a.mp3", f64::NAN, &mut handles).unwrap();
        assert_eq!(t.duration_secs, 0.0);
    }

    #[test]
    fn remove_revokes_handle() {
        let mut handles = HandleRegistry::new();
        let mut tracks = library(&mut handles);
        let removed = remove_track(&mut tracks, "music-1", &mut handles).unwrap();
        assert!(!handles.is_live(&removed.url));
        assert_eq!(tracks.len(), 1);
        assert!(matches!(
            remove_track(&mut tracks, "music-1", &mut handles),
            Err(TvboxError::UnknownTrack(_))
        ));
    }

    #[test]
    fn update_and_count() {
        let mut handles = HandleRegistry::new();
        let mut tracks = library(&mut handles);
        let patch = TrackPatch {
            artist: Some("Band".into()),
            enabled: Some(false),
            ..TrackPatch::default()
        };
        update_track(&mut tracks, "music-2", &patch).unwrap();
        assert_eq!(tracks[1].artist, "Band");
        assert_eq!(enabled_count(&tracks), 1);
        assert!(update_track(&mut tracks, "nope", &patch).is_err());
    }

    #[test]
    fn sorted_by_order() {
        let mut handles = HandleRegistry::new();
        let mut tracks = library(&mut handles);
        tracks[0].order = 5;
        let ids: Vec<&str> = sorted(&tracks).iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, ["music-2", "music-1"]);
    }

    #[test]
    fn duration_format() {
        assert_eq!(format_duration(0.0), "0:00");
        assert_eq!(format_duration(65.9), "1:05");
        assert_eq!(format_duration(600.0), "10:00");
        assert_eq!(format_duration(f64::INFINITY), "0:00");
        assert_eq!(format_duration(-3.0), "0:00");
    }

    #[test]
    fn title_strips_one_extension() {
        assert_eq!(track_title("a.b.mp3"), "a.b");
        assert_eq!(track_title("noext"), "noext");
        assert!(is_audio_file("LOUD.MP3"));
        assert!(!is_audio_file("mp3"));
    }

    #[test]
    fn toggle_switches_and_pauses() {
        let mut handles = HandleRegistry::new();
        let tracks = library(&mut handles);
        let mut sink = NullAudio::default();
        let mut p = Previewer::new();

        assert!(p.toggle(&tracks[0], &mut sink));
        assert_eq!(sink.playing.as_deref(), Some(tracks[0].url.as_str()));
        assert_eq!(p.duration_secs(), 125.4);

        // Another track takes over.
        assert!(p.toggle(&tracks[1], &mut sink));
        assert!(p.is_playing("music-2"));
        assert_eq!(sink.playing.as_deref(), Some(tracks[1].url.as_str()));

        assert!(!p.toggle(&tracks[1], &mut sink));
        assert_eq!(p.playing(), None);
        assert_eq!(sink.playing, None);
    }

    #[test]
    fn position_and_end() {
        let mut handles = HandleRegistry::new();
        let tracks = library(&mut handles);
        let mut sink = NullAudio::default();
        let mut p = Previewer::new();
        p.set_position(10.0);
        assert_eq!(p.position_secs(), 0.0);

        p.toggle(&tracks[1], &mut sink);
        p.set_position(30.5);
        assert_eq!(p.position_secs(), 30.5);
        p.ended();
        assert_eq!(p.playing(), None);
        assert_eq!(p.position_secs(), 0.0);
    }

    #[test]
    fn forget_stops_only_that_track() {
        let mut handles = HandleRegistry::new();
        let tracks = library(&mut handles);
        let mut sink = NullAudio::default();
        let mut p = Previewer::new();
        p.toggle(&tracks[0], &mut sink);
        p.forget("music-2", &mut sink);
        assert!(p.is_playing("music-1"));
        p.forget("music-1", &mut sink);
        assert_eq!(p.playing(), None);
        assert_eq!(sink.playing, None);
    }
}
