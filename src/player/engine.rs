//! Stem playback controller. Owns the transport, the per-stem and master
//! gain stages, and the live source set; every operation funnels through
//! the single phase-locked restart path in [`StemPlayer::start_at`].

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::backend::{AudioBackend, AudioData, GainControl, SourceHandle};
use super::loader::StemLoader;
use super::transport::Transport;
use crate::error::LoadError;

/// One stem of a song: a display name and the asset path its bytes are
/// fetched from. Ordering is significant, indices address per-stem volume.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StemDescriptor {
    pub name: String,
    pub path: String,
}

/// Parse an ordered stem list from its JSON manifest form:
/// `[{"name": "...", "path": "..."}, ...]`. Song pages store their stem
/// sets this way; order is preserved because indices address volume.
pub fn stems_from_json(json: &str) -> Result<Vec<StemDescriptor>, serde_json::Error> {
    serde_json::from_str(json)
}

/// Observable snapshot for a player-control UI.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerState {
    pub loaded: bool,
    pub loading_progress: f64,
    pub playing: bool,
    pub ended: bool,
    pub position: f64,
    pub duration: f64,
    pub master_volume: f64,
}

/// Controller for N synchronized stems against one logical playhead.
/// One instance per mounted player.
pub struct StemPlayer<B: AudioBackend> {
    backend: B,
    stems: Vec<StemDescriptor>,
    loader: StemLoader<B::Buffer>,
    gains: Vec<B::Gain>,
    master_gain: B::Gain,
    sources: Vec<B::Source>,
    transport: Transport,
}

impl<B: AudioBackend> StemPlayer<B> {
    pub fn new(backend: B, stems: Vec<StemDescriptor>) -> Self {
        let gains = stems.iter().map(|_| backend.create_gain(1.0)).collect();
        let master_gain = backend.create_gain(1.0);
        let mut loader = StemLoader::new(stems.len());
        loader.begin_session();
        StemPlayer {
            backend,
            stems,
            loader,
            gains,
            master_gain,
            sources: Vec::new(),
            transport: Transport::new(),
        }
    }

    pub fn stems(&self) -> &[StemDescriptor] {
        &self.stems
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Session id that in-flight fetches must tag their deliveries with.
    pub fn load_session(&self) -> u64 {
        self.loader.session()
    }

    /// A fetch for stem `index` completed. Fetch and decode failures are
    /// logged and swallowed; the stem is simply absent from the buffer set.
    /// Returns whether a buffer was stored.
    pub fn deliver_stem(
        &mut self,
        session: u64,
        index: usize,
        bytes: Result<Vec<u8>, LoadError>,
    ) -> bool {
        let name = self
            .stems
            .get(index)
            .map(|s| s.name.as_str())
            .unwrap_or("?");
        let bytes = match bytes {
            Ok(bytes) => bytes,
            Err(err) => {
                warn!(stem = name, %err, "stem fetch failed");
                return false;
            }
        };
        match self.backend.decode(bytes) {
            Ok(buffer) => self.loader.deliver(session, index, buffer),
            Err(err) => {
                warn!(stem = name, %err, "stem decode failed");
                false
            }
        }
    }

    pub fn loaded(&self) -> bool {
        self.loader.loaded()
    }

    pub fn loading_progress(&self) -> f64 {
        self.loader.progress()
    }

    pub fn playing(&self) -> bool {
        self.transport.playing()
    }

    pub fn ended(&self) -> bool {
        self.transport.ended()
    }

    /// Song duration in seconds; the first loaded buffer is authoritative.
    /// Zero until at least one stem has decoded.
    pub fn duration(&self) -> f64 {
        self.loader.first().map(|b| b.duration()).unwrap_or(0.0)
    }

    /// Current playhead position, clamped to `[0, duration]`.
    pub fn position(&self) -> f64 {
        let raw = self.transport.position(self.backend.now());
        let duration = self.duration();
        if duration > 0.0 {
            raw.clamp(0.0, duration)
        } else {
            raw.max(0.0)
        }
    }

    pub fn master_volume(&self) -> f64 {
        self.master_gain.level()
    }

    /// Start playback. No-op when already playing or when no buffers have
    /// arrived. Playing from the end restarts at zero.
    pub fn play(&mut self) {
        if self.transport.playing() || self.loader.loaded_count() == 0 {
            return;
        }
        let offset = if self.transport.ended() {
            0.0
        } else {
            self.transport.offset()
        };
        debug!(offset, "play");
        self.start_at(offset);
    }

    /// Stop playback, freezing the playhead at the current position.
    pub fn stop(&mut self) {
        self.halt_sources();
        self.transport.halt(self.backend.now());
    }

    /// Jump to `seconds`, clamped to `[0, duration]`. While playing, the
    /// sources are restarted at the new offset; a seek to the end stops
    /// playback and marks the transport ended.
    pub fn seek(&mut self, seconds: f64) {
        let duration = self.duration();
        let clamped = self.transport.seek_to(seconds, duration);
        if self.transport.playing() {
            if self.transport.ended() {
                self.halt_sources();
                self.transport.mark_ended(duration);
            } else {
                self.start_at(clamped);
            }
        }
    }

    /// Seek relative to the current position.
    pub fn skip(&mut self, delta_seconds: f64) {
        self.seek(self.position() + delta_seconds);
    }

    /// Set one stem's gain. Out-of-range indices are a silent no-op; level
    /// range is the caller's concern.
    pub fn set_volume(&mut self, index: usize, level: f64) {
        let now = self.backend.now();
        if let Some(gain) = self.gains.get_mut(index) {
            gain.set_level(level, now);
        }
    }

    pub fn set_master_volume(&mut self, level: f64) {
        let now = self.backend.now();
        self.master_gain.set_level(level, now);
    }

    /// Per-frame poll. Detects the playhead running off the end of the
    /// track and returns the current position for display.
    pub fn tick(&mut self) -> f64 {
        let duration = self.duration();
        if self.transport.playing()
            && duration > 0.0
            && self.transport.position(self.backend.now()) >= duration
        {
            self.halt_sources();
            self.transport.mark_ended(duration);
        }
        self.position()
    }

    pub fn state(&self) -> PlayerState {
        PlayerState {
            loaded: self.loaded(),
            loading_progress: self.loading_progress(),
            playing: self.playing(),
            ended: self.ended(),
            position: self.position(),
            duration: self.duration(),
            master_volume: self.master_volume(),
        }
    }

    /// Teardown: stop everything and suppress any still-in-flight stem
    /// deliveries.
    pub fn shutdown(&mut self) {
        self.halt_sources();
        self.transport.halt(self.backend.now());
        self.loader.shutdown();
    }

    /// The one restart path: every loaded buffer gets a fresh source, all
    /// sharing a single wall-clock instant and offset so stems stay
    /// phase-locked.
    fn start_at(&mut self, offset: f64) {
        self.halt_sources();
        let now = self.backend.now();
        self.transport.begin(now, offset);
        for (index, buffer) in self.loader.iter_loaded() {
            let source =
                self.backend
                    .start_source(buffer, &self.gains[index], &self.master_gain, offset);
            self.sources.push(source);
        }
    }

    /// Stop and drop every live source. A source that already finished (or
    /// was never started) fails its stop; that failure is swallowed.
    fn halt_sources(&mut self) {
        for mut source in self.sources.drain(..) {
            if source.stop().is_err() {
                debug!("source was already stopped");
            }
        }
    }
}
