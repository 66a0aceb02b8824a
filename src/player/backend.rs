//! Audio backend seam. The playback controller only does clock arithmetic
//! and gain bookkeeping; actually producing sound is the host's job, reached
//! through these traits (a web audio context, a native output, or a mock).

use crate::error::{DecodeError, SourceStopped};

/// A decoded audio asset. Duration is the only property the transport
/// depends on.
pub trait AudioData {
    fn duration(&self) -> f64;
}

/// A gain stage with a settable level. `at` is the backend clock time the
/// change should take effect.
pub trait GainControl {
    fn set_level(&mut self, level: f64, at: f64);
    fn level(&self) -> f64;
}

/// A one-shot playing source. Never reused after stop.
pub trait SourceHandle {
    /// Stop the source. Fails with [`SourceStopped`] when the source already
    /// finished or was never started; callers decide whether that matters.
    fn stop(&mut self) -> Result<(), SourceStopped>;
}

/// The full backend contract: a monotonic clock, a decoder, and factories
/// for gain stages and sources.
pub trait AudioBackend {
    type Buffer: AudioData;
    type Gain: GainControl;
    type Source: SourceHandle;

    /// Current backend clock time in seconds.
    fn now(&self) -> f64;

    fn decode(&self, bytes: Vec<u8>) -> Result<Self::Buffer, DecodeError>;

    fn create_gain(&self, initial: f64) -> Self::Gain;

    /// Start playing `buffer` routed through the stem gain and the master
    /// gain, beginning `offset` seconds into the buffer.
    fn start_source(
        &self,
        buffer: &Self::Buffer,
        stem_gain: &Self::Gain,
        master_gain: &Self::Gain,
        offset: f64,
    ) -> Self::Source;
}
