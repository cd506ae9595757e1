use alloc::sync::Arc;

use crate::engine::Engine;

/// A callback fired when the engine's state changes.
///
/// The second argument is `is_scrolling`.
pub type OnChangeCallback = Arc<dyn Fn(&Engine, bool) + Send + Sync>;

/// Configuration for [`Engine`].
///
/// Cheap to clone: the estimator and callbacks are stored in `Arc`s, so
/// adapters can clone, tweak a few fields and call `Engine::set_options`
/// without reallocating closures.
pub struct EngineOptions {
    /// Number of virtualizable items. May change over time (e.g. infinite
    /// loading appends); see [`Engine::set_count`].
    pub count: usize,
    /// Estimated size of the item at a given index, used until the item is
    /// measured. Non-positive results clamp to [`crate::MIN_ITEM_SIZE`].
    pub estimate_size: Arc<dyn Fn(usize) -> u32 + Send + Sync>,
    /// Enables/disables the engine. When disabled, queries return empty
    /// windows and a zero extent, but sizes and scroll state are kept so
    /// re-enabling is instantaneous.
    pub enabled: bool,
    /// Extra items materialized before the viewport, in rows.
    pub overscan_before: usize,
    /// Extra items materialized after the viewport, in rows.
    pub overscan_after: usize,
    /// Number of lanes (columns for a vertical axis) sharing each row of the
    /// size model. Must be `>= 1`; plain lists use 1.
    pub lanes: usize,
    /// Where the list starts inside the scroll source. Non-zero when the
    /// scroll source is the whole page/window and the list sits below other
    /// content; item starts include this margin.
    pub scroll_margin: u32,
    /// Scroll offset applied at construction.
    pub initial_offset: u64,
    /// Optional subscription fired on state changes (coalesced inside
    /// [`Engine::batch_update`]).
    pub on_change: Option<OnChangeCallback>,
    /// Debounce window for resetting `is_scrolling` after the last scroll
    /// event, in milliseconds.
    pub is_scrolling_reset_delay_ms: u64,
}

impl EngineOptions {
    pub fn new(count: usize, estimate_size: impl Fn(usize) -> u32 + Send + Sync + 'static) -> Self {
        Self {
            count,
            estimate_size: Arc::new(estimate_size),
            enabled: true,
            overscan_before: 1,
            overscan_after: 1,
            lanes: 1,
            scroll_margin: 0,
            initial_offset: 0,
            on_change: None,
            is_scrolling_reset_delay_ms: 150,
        }
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Sets both overscan margins at once.
    pub fn with_overscan(mut self, before: usize, after: usize) -> Self {
        self.overscan_before = before;
        self.overscan_after = after;
        self
    }

    pub fn with_lanes(mut self, lanes: usize) -> Self {
        self.lanes = lanes;
        self
    }

    pub fn with_scroll_margin(mut self, scroll_margin: u32) -> Self {
        self.scroll_margin = scroll_margin;
        self
    }

    pub fn with_initial_offset(mut self, initial_offset: u64) -> Self {
        self.initial_offset = initial_offset;
        self
    }

    pub fn with_on_change(
        mut self,
        on_change: Option<impl Fn(&Engine, bool) + Send + Sync + 'static>,
    ) -> Self {
        self.on_change = on_change.map(|f| Arc::new(f) as _);
        self
    }

    pub fn with_is_scrolling_reset_delay_ms(mut self, delay_ms: u64) -> Self {
        self.is_scrolling_reset_delay_ms = delay_ms;
        self
    }
}

impl Clone for EngineOptions {
    fn clone(&self) -> Self {
        Self {
            count: self.count,
            estimate_size: Arc::clone(&self.estimate_size),
            enabled: self.enabled,
            overscan_before: self.overscan_before,
            overscan_after: self.overscan_after,
            lanes: self.lanes,
            scroll_margin: self.scroll_margin,
            initial_offset: self.initial_offset,
            on_change: self.on_change.clone(),
            is_scrolling_reset_delay_ms: self.is_scrolling_reset_delay_ms,
        }
    }
}

impl core::fmt::Debug for EngineOptions {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("EngineOptions")
            .field("count", &self.count)
            .field("enabled", &self.enabled)
            .field("overscan_before", &self.overscan_before)
            .field("overscan_after", &self.overscan_after)
            .field("lanes", &self.lanes)
            .field("scroll_margin", &self.scroll_margin)
            .field("initial_offset", &self.initial_offset)
            .field(
                "is_scrolling_reset_delay_ms",
                &self.is_scrolling_reset_delay_ms,
            )
            .finish_non_exhaustive()
    }
}
