//! Stem load tracking. Fetch/decode fan-out happens outside (host promises
//! or a native fetcher); deliveries land here, each tagged with the session
//! they belong to so stale completions after teardown or reset are dropped.

/// Per-stem slots for decoded buffers, plus the liveness bookkeeping for
/// asynchronous deliveries.
#[derive(Debug)]
pub struct StemLoader<T> {
    slots: Vec<Option<T>>,
    session: u64,
    alive: bool,
}

impl<T> StemLoader<T> {
    pub fn new(stem_count: usize) -> Self {
        let mut slots = Vec::with_capacity(stem_count);
        slots.resize_with(stem_count, || None);
        StemLoader {
            slots,
            session: 0,
            alive: true,
        }
    }

    /// Invalidate any in-flight deliveries and clear the slots. Returns the
    /// new session id to tag subsequent deliveries with.
    pub fn begin_session(&mut self) -> u64 {
        self.session += 1;
        for slot in &mut self.slots {
            *slot = None;
        }
        self.session
    }

    pub fn session(&self) -> u64 {
        self.session
    }

    /// Store a decoded buffer. Ignored (returns false) when the loader was
    /// shut down, the session is stale, or the index is out of range.
    pub fn deliver(&mut self, session: u64, index: usize, buffer: T) -> bool {
        if !self.alive || session != self.session {
            return false;
        }
        match self.slots.get_mut(index) {
            Some(slot) => {
                *slot = Some(buffer);
                true
            }
            None => false,
        }
    }

    /// Teardown: every later delivery becomes a no-op.
    pub fn shutdown(&mut self) {
        self.alive = false;
    }

    pub fn alive(&self) -> bool {
        self.alive
    }

    pub fn stem_count(&self) -> usize {
        self.slots.len()
    }

    pub fn loaded_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    /// True only when every slot is filled. A single failed stem keeps this
    /// false forever; partial buffer sets are never considered playable.
    pub fn loaded(&self) -> bool {
        self.slots.iter().all(|s| s.is_some())
    }

    /// Load progress as a percentage, advancing by `100 / stem_count` per
    /// delivered buffer.
    pub fn progress(&self) -> f64 {
        if self.slots.is_empty() {
            return 100.0;
        }
        self.loaded_count() as f64 * 100.0 / self.slots.len() as f64
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.slots.get(index).and_then(|s| s.as_ref())
    }

    /// The first loaded buffer; its duration is authoritative for the song.
    pub fn first(&self) -> Option<&T> {
        self.slots.iter().find_map(|s| s.as_ref())
    }

    pub fn iter_loaded(&self) -> impl Iterator<Item = (usize, &T)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.as_ref().map(|b| (i, b)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fills_toward_loaded() {
        let mut loader: StemLoader<u32> = StemLoader::new(2);
        let session = loader.begin_session();
        assert!(!loader.loaded());
        assert_eq!(loader.progress(), 0.0);

        assert!(loader.deliver(session, 0, 10));
        assert_eq!(loader.progress(), 50.0);
        assert!(!loader.loaded());

        assert!(loader.deliver(session, 1, 20));
        assert_eq!(loader.progress(), 100.0);
        assert!(loader.loaded());
        assert_eq!(loader.first(), Some(&10));
    }

    #[test]
    fn missing_stem_keeps_loaded_false() {
        let mut loader: StemLoader<u32> = StemLoader::new(3);
        let session = loader.begin_session();
        loader.deliver(session, 0, 1);
        loader.deliver(session, 2, 3);
        assert!(!loader.loaded());
        assert!((loader.progress() - 200.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn stale_session_is_dropped() {
        let mut loader: StemLoader<u32> = StemLoader::new(1);
        let old = loader.begin_session();
        let new = loader.begin_session();
        assert!(!loader.deliver(old, 0, 1));
        assert!(!loader.loaded());
        assert!(loader.deliver(new, 0, 2));
        assert_eq!(loader.get(0), Some(&2));
    }

    #[test]
    fn shutdown_suppresses_deliveries() {
        let mut loader: StemLoader<u32> = StemLoader::new(1);
        let session = loader.begin_session();
        loader.shutdown();
        assert!(!loader.deliver(session, 0, 1));
        assert!(!loader.loaded());
    }

    #[test]
    fn out_of_range_index_is_ignored() {
        let mut loader: StemLoader<u32> = StemLoader::new(1);
        let session = loader.begin_session();
        assert!(!loader.deliver(session, 5, 1));
    }

    #[test]
    fn zero_stems_is_trivially_loaded() {
        let loader: StemLoader<u32> = StemLoader::new(0);
        assert!(loader.loaded());
        assert_eq!(loader.progress(), 100.0);
    }
}
