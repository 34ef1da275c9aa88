//! Media handles and audio output for the local-music previewer.
//!
//! Uploaded audio is referenced through opaque handle URLs, the way a
//! browser hands out object URLs for blobs. A handle stays live until it is
//! revoked; the music library revokes it when its track is removed.

use std::collections::HashMap;

/// Prefix of every handle URL issued by [`HandleRegistry`].
pub const HANDLE_PREFIX: &str = "blob:tvbox/";

/// Issues and revokes handle URLs for local media.
pub trait MediaHandles {
    /// Register `source` (a file path or name) and return its handle URL.
    fn create(&mut self, source: &str) -> String;

    /// Release a handle. Returns `false` if it was not live.
    fn revoke(&mut self, handle: &str) -> bool;

    /// Whether `handle` is currently live.
    fn is_live(&self, handle: &str) -> bool;
}

/// In-process handle registry.
#[derive(Debug, Default)]
pub struct HandleRegistry {
    next_id: u64,
    live: HashMap<String, String>,
}

impl HandleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live handles.
    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    /// Skip past every id in `handles` so new handles never reuse a URL
    /// that an earlier run saved. Foreign URLs are ignored.
    pub fn resume_after<'h>(&mut self, handles: impl IntoIterator<Item = &'h str>) {
        let highest = handles
            .into_iter()
            .filter_map(|h| h.strip_prefix(HANDLE_PREFIX)?.parse::<u64>().ok())
            .max();
        if let Some(highest) = highest {
            self.next_id = self.next_id.max(highest);
        }
    }
}

impl MediaHandles for HandleRegistry {
    fn create(&mut self, source: &str) -> String {
        self.next_id += 1;
        let handle = format!("{HANDLE_PREFIX}{}", self.next_id);
        self.live.insert(handle.clone(), source.to_string());
        handle
    }

    fn revoke(&mut self, handle: &str) -> bool {
        self.live.remove(handle).is_some()
    }

    fn is_live(&self, handle: &str) -> bool {
        self.live.contains_key(handle)
    }
}

/// Audio output used by the previewer.
pub trait AudioSink {
    /// Start playing the media behind `handle` from the beginning.
    fn play(&mut self, handle: &str);

    /// Pause whatever is playing.
    fn pause(&mut self);
}

/// Audio sink for hosts without an audio device: logs and stays silent.
#[derive(Debug, Default)]
pub struct NullAudio {
    pub playing: Option<String>,
}

impl AudioSink for NullAudio {
    fn play(&mut self, handle: &str) {
        log::debug!("play {handle} (no audio device)");
        self.playing = Some(handle.to_string());
    }

    fn pause(&mut self) {
        self.playing = None;
    }
}
