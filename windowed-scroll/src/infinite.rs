use windowed::{Engine, WindowRange};

/// Decides when to ask the data-loading collaborator for more rows.
///
/// Checked after each window recomputation: when the last materialized index
/// comes within `threshold` of the end of the loaded data, the trigger arms
/// exactly once. De-duplication is an explicit in-flight flag, not an
/// artifact of comparing window identities, so recomputations while a fetch
/// is outstanding never double-fire.
#[derive(Clone, Copy, Debug)]
pub struct LoadTrigger {
    threshold: usize,
    has_more: bool,
    in_flight: bool,
}

impl Default for LoadTrigger {
    fn default() -> Self {
        Self::new(0)
    }
}

impl LoadTrigger {
    /// `threshold` is how many trailing items may remain before loading more;
    /// 0 fires only when the very last item is materialized.
    pub fn new(threshold: usize) -> Self {
        Self {
            threshold,
            has_more: true,
            in_flight: false,
        }
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    /// Set from the data collaborator's "more pages exist" signal.
    pub fn set_has_more(&mut self, has_more: bool) {
        self.has_more = has_more;
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight
    }

    /// Arms on a threshold crossing. Returns `true` exactly once per
    /// crossing; the caller must then start the fetch and report back via
    /// [`Self::loaded`] or [`Self::failed`].
    pub fn should_load(&mut self, window: WindowRange, count: usize) -> bool {
        if window.is_empty() || !self.has_more || self.in_flight {
            return false;
        }
        let last = window.end_index - 1;
        if last.saturating_add(self.threshold) + 1 >= count {
            self.in_flight = true;
            return true;
        }
        false
    }

    /// Convenience wrapper over [`Self::should_load`] for a live engine.
    pub fn check(&mut self, engine: &Engine) -> bool {
        self.should_load(engine.window_range(), engine.count())
    }

    /// The outstanding fetch resolved; the caller has already grown the
    /// engine's count.
    pub fn loaded(&mut self) {
        self.in_flight = false;
    }

    /// The outstanding fetch was rejected. Not fatal: the next threshold
    /// crossing may retry.
    pub fn failed(&mut self) {
        self.in_flight = false;
    }
}
