//! Transport state — the single logical playhead shared by every stem.
//! Position is derived from wall-clock arithmetic: while playing, the
//! playhead is `now - started_at`; while stopped, it is the frozen offset.

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transport {
    playing: bool,
    ended: bool,
    /// Frozen playhead while stopped, in seconds.
    offset: f64,
    /// Wall-clock instant play began, already shifted by the offset so that
    /// `now - started_at` is the position.
    started_at: f64,
}

impl Default for Transport {
    fn default() -> Self {
        Transport {
            playing: false,
            ended: false,
            offset: 0.0,
            started_at: 0.0,
        }
    }
}

impl Transport {
    pub fn new() -> Self {
        Transport::default()
    }

    pub fn playing(&self) -> bool {
        self.playing
    }

    pub fn ended(&self) -> bool {
        self.ended
    }

    pub fn offset(&self) -> f64 {
        self.offset
    }

    /// Begin playing from `offset` at wall-clock `now`. All sources started
    /// for this session share this instant, which keeps stems phase-locked.
    pub fn begin(&mut self, now: f64, offset: f64) {
        self.offset = offset.max(0.0);
        self.started_at = now - self.offset;
        self.playing = true;
        self.ended = false;
    }

    /// Stop at wall-clock `now`, freezing the playhead.
    pub fn halt(&mut self, now: f64) {
        if self.playing {
            self.offset = (now - self.started_at).max(0.0);
        }
        self.playing = false;
    }

    /// Current playhead position in seconds.
    pub fn position(&self, now: f64) -> f64 {
        if self.playing {
            (now - self.started_at).max(0.0)
        } else {
            self.offset
        }
    }

    /// Move the frozen playhead to `target`, clamped to `[0, duration]`.
    /// Reaching the duration of a real track marks the transport ended.
    /// Does not start or stop anything; callers restart sources themselves.
    pub fn seek_to(&mut self, target: f64, duration: f64) -> f64 {
        let clamped = target.clamp(0.0, duration.max(0.0));
        self.offset = clamped;
        self.ended = duration > 0.0 && clamped >= duration;
        clamped
    }

    /// The playhead ran off the end of the track.
    pub fn mark_ended(&mut self, duration: f64) {
        self.playing = false;
        self.offset = duration.max(0.0);
        self.ended = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_idle_at_zero() {
        let t = Transport::new();
        assert!(!t.playing());
        assert!(!t.ended());
        assert_eq!(t.position(5.0), 0.0);
    }

    #[test]
    fn position_advances_with_clock_while_playing() {
        let mut t = Transport::new();
        t.begin(10.0, 0.0);
        assert_eq!(t.position(10.0), 0.0);
        assert_eq!(t.position(13.5), 3.5);
    }

    #[test]
    fn begin_with_offset_shifts_start_instant() {
        let mut t = Transport::new();
        t.begin(100.0, 60.0);
        assert_eq!(t.position(100.0), 60.0);
        assert_eq!(t.position(110.0), 70.0);
    }

    #[test]
    fn halt_freezes_offset() {
        let mut t = Transport::new();
        t.begin(0.0, 0.0);
        t.halt(42.0);
        assert!(!t.playing());
        assert_eq!(t.position(99.0), 42.0);
    }

    #[test]
    fn halt_while_stopped_keeps_offset() {
        let mut t = Transport::new();
        t.seek_to(30.0, 120.0);
        t.halt(500.0);
        assert_eq!(t.position(500.0), 30.0);
    }

    #[test]
    fn seek_clamps_low_and_high() {
        let mut t = Transport::new();
        assert_eq!(t.seek_to(-10.0, 120.0), 0.0);
        assert!(!t.ended());
        assert_eq!(t.seek_to(200.0, 120.0), 120.0);
        assert!(t.ended());
    }

    #[test]
    fn seek_below_duration_clears_ended() {
        let mut t = Transport::new();
        t.seek_to(120.0, 120.0);
        assert!(t.ended());
        t.seek_to(50.0, 120.0);
        assert!(!t.ended());
    }

    #[test]
    fn zero_duration_never_ends() {
        let mut t = Transport::new();
        assert_eq!(t.seek_to(10.0, 0.0), 0.0);
        assert!(!t.ended());
    }

    #[test]
    fn mark_ended_stops_at_duration() {
        let mut t = Transport::new();
        t.begin(0.0, 0.0);
        t.mark_ended(120.0);
        assert!(!t.playing());
        assert!(t.ended());
        assert_eq!(t.position(999.0), 120.0);
    }
}
