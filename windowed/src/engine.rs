use alloc::sync::Arc;
use alloc::vec::Vec;
use core::cell::Cell;
use core::cmp;

use crate::size_model::SizeModel;
use crate::{Align, ConfigError, EngineOptions, ScrollDirection, Viewport, VisibleItem, WindowRange};

/// A headless windowing engine.
///
/// The engine is driven by an adapter that feeds it viewport geometry and
/// scroll offsets; it answers with the overscanned set of items to
/// materialize and the total scrollable extent. It holds no UI objects.
///
/// With `lanes > 1`, consecutive items share rows (`row = index / lanes`) and
/// the size model tracks rows; every lane of a row gets the row's start and
/// size. Plain lists are the `lanes == 1` case of the same code path.
#[derive(Clone, Debug)]
pub struct Engine {
    options: EngineOptions,
    viewport_extent: u32,
    scroll_offset: u64,
    is_scrolling: bool,
    scroll_direction: Option<ScrollDirection>,
    last_scroll_event_ms: Option<u64>,

    model: SizeModel,

    notify_depth: Cell<usize>,
    notify_pending: Cell<bool>,
}

impl Engine {
    pub fn new(options: EngineOptions) -> Result<Self, ConfigError> {
        if options.lanes == 0 {
            return Err(ConfigError::InvalidLanes { lanes: 0 });
        }
        wdebug!(
            count = options.count,
            lanes = options.lanes,
            enabled = options.enabled,
            "Engine::new"
        );
        let mut engine = Self {
            viewport_extent: 0,
            scroll_offset: options.initial_offset,
            is_scrolling: false,
            scroll_direction: None,
            last_scroll_event_ms: None,
            model: SizeModel::default(),
            options,
            notify_depth: Cell::new(0),
            notify_pending: Cell::new(false),
        };
        engine.rebuild_model();
        Ok(engine)
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    /// Replaces the whole configuration, rebuilding only what the changed
    /// fields require (estimator change resets measurements; a count change
    /// alone preserves them).
    pub fn set_options(&mut self, options: EngineOptions) -> Result<(), ConfigError> {
        if options.lanes == 0 {
            return Err(ConfigError::InvalidLanes { lanes: 0 });
        }
        let prev_count = self.options.count;
        let prev_lanes = self.options.lanes;
        let estimator_unchanged =
            Arc::ptr_eq(&self.options.estimate_size, &options.estimate_size);
        self.options = options;
        wtrace!(
            count = self.options.count,
            lanes = self.options.lanes,
            enabled = self.options.enabled,
            "Engine::set_options"
        );

        if !estimator_unchanged || self.options.lanes != prev_lanes {
            self.rebuild_model();
        } else if self.options.count != prev_count {
            self.resize_model();
        }
        self.notify();
        Ok(())
    }

    /// Clones the current options, applies `f`, then delegates to
    /// [`Self::set_options`].
    pub fn update_options(
        &mut self,
        f: impl FnOnce(&mut EngineOptions),
    ) -> Result<(), ConfigError> {
        let mut next = self.options.clone();
        f(&mut next);
        self.set_options(next)
    }

    pub fn set_on_change(
        &mut self,
        on_change: Option<impl Fn(&Engine, bool) + Send + Sync + 'static>,
    ) {
        self.options.on_change = on_change.map(|f| Arc::new(f) as _);
        self.notify();
    }

    fn notify_now(&self) {
        if let Some(cb) = &self.options.on_change {
            cb(self, self.is_scrolling);
        }
    }

    fn notify(&self) {
        if self.notify_depth.get() > 0 {
            self.notify_pending.set(true);
            return;
        }
        self.notify_now();
    }

    /// Batches multiple updates into a single `on_change` notification.
    ///
    /// Adapters typically update the viewport extent, scroll offset and
    /// scrolling flag together once per frame; batching keeps an expensive
    /// `on_change` (e.g. one that schedules a render) from firing per setter.
    pub fn batch_update(&mut self, f: impl FnOnce(&mut Self)) {
        let depth = self.notify_depth.get();
        self.notify_depth.set(depth.saturating_add(1));

        f(self);

        let depth = self.notify_depth.get();
        debug_assert!(depth > 0, "notify_depth underflow");
        let next = depth.saturating_sub(1);
        self.notify_depth.set(next);

        if next == 0 && self.notify_pending.replace(false) {
            self.notify_now();
        }
    }

    pub fn count(&self) -> usize {
        self.options.count
    }

    pub fn lanes(&self) -> usize {
        self.options.lanes
    }

    fn row_of(&self, index: usize) -> usize {
        index / self.options.lanes
    }

    fn row_count(&self) -> usize {
        self.options.count.div_ceil(self.options.lanes)
    }

    pub fn enabled(&self) -> bool {
        self.options.enabled
    }

    /// Flips query gating only: sizes, measurements and scroll state are all
    /// kept, so re-enabling picks up exactly where the engine left off.
    pub fn set_enabled(&mut self, enabled: bool) {
        if self.options.enabled == enabled {
            return;
        }
        self.options.enabled = enabled;
        self.notify();
    }

    pub fn toggle_enabled(&mut self) {
        self.set_enabled(!self.options.enabled);
    }

    pub fn is_scrolling(&self) -> bool {
        self.is_scrolling
    }

    pub fn scroll_direction(&self) -> Option<ScrollDirection> {
        self.scroll_direction
    }

    pub fn set_is_scrolling(&mut self, is_scrolling: bool) {
        if self.is_scrolling == is_scrolling {
            return;
        }
        self.is_scrolling = is_scrolling;
        if !is_scrolling {
            self.scroll_direction = None;
            self.last_scroll_event_ms = None;
        }
        self.notify();
    }

    pub fn notify_scroll_event(&mut self, now_ms: u64) {
        if !self.options.enabled {
            return;
        }
        self.last_scroll_event_ms = Some(now_ms);
        self.set_is_scrolling(true);
    }

    /// Debounced `is_scrolling` reset: clears the flag once no scroll event
    /// has arrived for `is_scrolling_reset_delay_ms`.
    pub fn update_scrolling(&mut self, now_ms: u64) {
        if !self.is_scrolling {
            return;
        }
        let Some(last) = self.last_scroll_event_ms else {
            return;
        };
        if now_ms.saturating_sub(last) >= self.options.is_scrolling_reset_delay_ms {
            self.set_is_scrolling(false);
        }
    }

    pub fn viewport_extent(&self) -> u32 {
        self.viewport_extent
    }

    pub fn viewport(&self) -> Viewport {
        Viewport {
            scroll_offset: self.scroll_offset,
            extent: self.viewport_extent,
        }
    }

    pub fn set_viewport_extent(&mut self, extent: u32) {
        if self.viewport_extent == extent {
            return;
        }
        self.viewport_extent = extent;
        self.notify();
    }

    pub fn scroll_offset(&self) -> u64 {
        self.scroll_offset
    }

    /// The scroll offset translated into list coordinates (scroll margin
    /// subtracted, saturating at 0).
    pub fn scroll_offset_in_list(&self) -> u64 {
        self.scroll_offset
            .saturating_sub(self.options.scroll_margin as u64)
    }

    pub fn set_scroll_offset(&mut self, offset: u64) {
        if self.scroll_offset == offset {
            return;
        }
        let prev = self.scroll_offset;
        self.scroll_offset = offset;
        self.scroll_direction = match offset.cmp(&prev) {
            cmp::Ordering::Greater => Some(ScrollDirection::Forward),
            cmp::Ordering::Less => Some(ScrollDirection::Backward),
            cmp::Ordering::Equal => self.scroll_direction,
        };
        self.notify();
    }

    pub fn set_scroll_offset_clamped(&mut self, offset: u64) {
        let clamped = self.clamp_scroll_offset(offset);
        self.set_scroll_offset(clamped);
    }

    /// Applies a scroll event from the adapter and marks the engine as
    /// scrolling, in one coalesced notification.
    pub fn apply_scroll_offset_event(&mut self, offset: u64, now_ms: u64) {
        wtrace!(offset, now_ms, "apply_scroll_offset_event");
        self.batch_update(|e| {
            e.set_scroll_offset(offset);
            e.notify_scroll_event(now_ms);
        });
    }

    /// Same as [`Self::apply_scroll_offset_event`], but clamps the offset.
    /// Fast scrolling may transiently report out-of-range offsets; they are
    /// clamped here, never an error.
    pub fn apply_scroll_offset_event_clamped(&mut self, offset: u64, now_ms: u64) {
        wtrace!(offset, now_ms, "apply_scroll_offset_event_clamped");
        self.batch_update(|e| {
            e.set_scroll_offset_clamped(offset);
            e.notify_scroll_event(now_ms);
        });
    }

    /// Applies a full viewport update (extent + offset) in a single coalesced
    /// notification. The recommended per-frame entry point for adapters.
    pub fn apply_scroll_frame(&mut self, viewport: Viewport, now_ms: u64) {
        wtrace!(
            extent = viewport.extent,
            offset = viewport.scroll_offset,
            now_ms,
            "apply_scroll_frame"
        );
        self.batch_update(|e| {
            e.set_viewport_extent(viewport.extent);
            e.set_scroll_offset(viewport.scroll_offset);
            e.notify_scroll_event(now_ms);
        });
    }

    /// Same as [`Self::apply_scroll_frame`], but clamps the offset.
    pub fn apply_scroll_frame_clamped(&mut self, viewport: Viewport, now_ms: u64) {
        self.batch_update(|e| {
            e.set_viewport_extent(viewport.extent);
            e.set_scroll_offset_clamped(viewport.scroll_offset);
            e.notify_scroll_event(now_ms);
        });
    }

    pub fn set_viewport_and_scroll(&mut self, extent: u32, scroll_offset: u64) {
        self.batch_update(|e| {
            e.set_viewport_extent(extent);
            e.set_scroll_offset(scroll_offset);
        });
    }

    pub fn set_viewport_and_scroll_clamped(&mut self, extent: u32, scroll_offset: u64) {
        self.batch_update(|e| {
            e.set_viewport_extent(extent);
            e.set_scroll_offset_clamped(scroll_offset);
        });
    }

    /// Updates the item count, preserving measured sizes for indices below
    /// the previous count (infinite loading appends, it never re-measures).
    pub fn set_count(&mut self, count: usize) {
        if self.options.count == count {
            return;
        }
        self.options.count = count;
        self.resize_model();
        self.notify();
    }

    pub fn set_overscan(&mut self, before: usize, after: usize) {
        self.options.overscan_before = before;
        self.options.overscan_after = after;
        self.notify();
    }

    pub fn set_scroll_margin(&mut self, scroll_margin: u32) {
        if self.options.scroll_margin == scroll_margin {
            return;
        }
        self.options.scroll_margin = scroll_margin;
        self.notify();
    }

    /// Replaces the estimator. All measurements are discarded: the offset
    /// table is a function of one estimator at a time.
    pub fn set_estimate_size(&mut self, f: impl Fn(usize) -> u32 + Send + Sync + 'static) {
        self.options.estimate_size = Arc::new(f);
        self.rebuild_model();
        self.notify();
    }

    pub fn reset_measurements(&mut self) {
        self.rebuild_model();
        self.notify();
    }

    /// Records the real size of a rendered item. Out-of-range indexes are
    /// ignored; non-positive sizes clamp to [`crate::MIN_ITEM_SIZE`].
    ///
    /// Measurements may arrive in any index order; the offset table depends
    /// only on the latest size per item.
    pub fn measure_element(&mut self, index: usize, size: u32) {
        if index >= self.options.count {
            return;
        }
        wtrace!(index, size, "measure_element");
        let row = self.row_of(index);
        self.model.record(row, size);
        self.notify();
    }

    /// Like [`Self::measure_element`], but shifts the scroll offset by the
    /// size delta when the measured item starts before the current offset, so
    /// content already on screen does not visually jump.
    ///
    /// Returns the scroll adjustment that was applied (0 when none).
    pub fn measure_element_compensating(&mut self, index: usize, size: u32) -> i64 {
        if index >= self.options.count {
            return 0;
        }
        let row = self.row_of(index);
        let start = self.list_origin().saturating_add(self.model.offset_of(row));
        let delta = self.model.record(row, size);
        if delta != 0 && start < self.scroll_offset {
            if delta > 0 {
                self.scroll_offset = self.scroll_offset.saturating_add(delta as u64);
            } else {
                self.scroll_offset = self.scroll_offset.saturating_sub(delta.unsigned_abs());
            }
            self.notify();
            return delta;
        }
        self.notify();
        0
    }

    pub fn is_measured(&self, index: usize) -> bool {
        index < self.options.count && self.model.is_measured(self.row_of(index))
    }

    /// Total scrollable extent (`offset(count)`), 0 while disabled.
    pub fn total_extent(&self) -> u64 {
        if !self.options.enabled {
            return 0;
        }
        self.model.total()
    }

    fn list_origin(&self) -> u64 {
        self.options.scroll_margin as u64
    }

    pub fn item_start(&self, index: usize) -> Option<u64> {
        if !self.options.enabled || index >= self.options.count {
            return None;
        }
        let row = self.row_of(index);
        Some(self.list_origin().saturating_add(self.model.offset_of(row)))
    }

    pub fn item_size(&self, index: usize) -> Option<u32> {
        if !self.options.enabled || index >= self.options.count {
            return None;
        }
        self.model.size_of(self.row_of(index))
    }

    pub fn item_end(&self, index: usize) -> Option<u64> {
        let start = self.item_start(index)?;
        let size = self.item_size(index)? as u64;
        Some(start.saturating_add(size))
    }

    /// The item containing `offset` (scroll-source coordinates). Offsets
    /// inside the scroll margin map to item 0; offsets past the content map
    /// to `None`.
    pub fn index_at_offset(&self, offset: u64) -> Option<usize> {
        if !self.options.enabled || self.options.count == 0 {
            return None;
        }
        let in_list = offset.saturating_sub(self.list_origin());
        let row = self.model.locate(in_list);
        if row >= self.model.len() {
            return None;
        }
        Some(row * self.options.lanes)
    }

    pub fn max_scroll_offset(&self) -> u64 {
        if !self.options.enabled {
            return self.scroll_offset;
        }
        let total = self.model.total();
        let view = self.viewport_extent as u64;
        self.list_origin()
            .saturating_add(total.saturating_sub(view))
    }

    pub fn clamp_scroll_offset(&self, offset: u64) -> u64 {
        offset.min(self.max_scroll_offset())
    }

    /// The visible window without overscan, as item indexes.
    pub fn visible_range(&self) -> WindowRange {
        self.visible_range_for(self.scroll_offset, self.viewport_extent)
    }

    pub fn visible_range_for(&self, scroll_offset: u64, extent: u32) -> WindowRange {
        if !self.options.enabled {
            return WindowRange::EMPTY;
        }
        let (start_row, end_row) = self.visible_rows(scroll_offset, extent);
        self.rows_to_items(start_row, end_row)
    }

    /// The visible window plus overscan, as item indexes. This is the set of
    /// items an adapter should materialize.
    pub fn window_range(&self) -> WindowRange {
        self.window_range_for(self.scroll_offset, self.viewport_extent)
    }

    pub fn window_range_for(&self, scroll_offset: u64, extent: u32) -> WindowRange {
        if !self.options.enabled {
            return WindowRange::EMPTY;
        }
        let (start_row, end_row) = self.overscanned_rows(scroll_offset, extent);
        self.rows_to_items(start_row, end_row)
    }

    /// Streams the overscanned visible items without allocating.
    ///
    /// Items arrive in ascending, contiguous index order. Re-invoking with
    /// unchanged state yields a value-identical sequence.
    pub fn for_each_visible_item(&self, f: impl FnMut(VisibleItem)) {
        self.for_each_visible_item_for(self.scroll_offset, self.viewport_extent, f);
    }

    pub fn for_each_visible_item_for(
        &self,
        scroll_offset: u64,
        extent: u32,
        mut f: impl FnMut(VisibleItem),
    ) {
        if !self.options.enabled {
            return;
        }
        let (start_row, end_row) = self.overscanned_rows(scroll_offset, extent);
        if start_row >= end_row {
            return;
        }

        let count = self.options.count;
        let lanes = self.options.lanes;
        let mut start = self
            .list_origin()
            .saturating_add(self.model.offset_of(start_row));

        for row in start_row..end_row {
            let size = match self.model.size_of(row) {
                Some(size) => size,
                None => break,
            };
            let first = row * lanes;
            let last = cmp::min(count, first + lanes);
            for index in first..last {
                f(VisibleItem { index, start, size });
            }
            start = start.saturating_add(size as u64);
        }
    }

    /// Collects the overscanned visible items into `out` (clears it first).
    ///
    /// Prefer [`Self::for_each_visible_item`] with a reused scratch buffer in
    /// hot adapter paths.
    pub fn collect_visible_items(&self, out: &mut Vec<VisibleItem>) {
        out.clear();
        self.for_each_visible_item(|item| out.push(item));
    }

    pub fn visible_items(&self) -> Vec<VisibleItem> {
        let mut out = Vec::new();
        self.collect_visible_items(&mut out);
        out
    }

    /// The scroll offset that brings `index` into view under `align`, or
    /// `None` when the index is out of range or the engine is disabled.
    pub fn scroll_to_index_offset(&self, index: usize, align: Align) -> Option<u64> {
        if !self.options.enabled || index >= self.options.count {
            return None;
        }
        let start = self.item_start(index)?;
        let size = self.item_size(index)? as u64;
        let end = start.saturating_add(size);
        let view = self.viewport_extent as u64;

        let target = match align {
            Align::Start => start,
            Align::End => end.saturating_sub(view),
            Align::Center => start
                .saturating_add(size / 2)
                .saturating_sub(view / 2),
            Align::Nearest => {
                let cur = self.scroll_offset;
                let cur_end = cur.saturating_add(view);
                if start >= cur && end <= cur_end {
                    cur
                } else if start < cur {
                    start
                } else {
                    end.saturating_sub(view)
                }
            }
        };
        Some(self.clamp_scroll_offset(target))
    }

    /// Moves the scroll offset so that `index` becomes visible. A silent
    /// no-op for out-of-range indexes. Does not mark the engine as scrolling.
    ///
    /// Returns the applied (clamped) offset.
    pub fn scroll_to_index(&mut self, index: usize, align: Align) -> u64 {
        let Some(offset) = self.scroll_to_index_offset(index, align) else {
            return self.scroll_offset;
        };
        self.set_scroll_offset(offset);
        offset
    }

    fn rebuild_model(&mut self) {
        wdebug!(count = self.options.count, lanes = self.options.lanes, "rebuild_model");
        let rows = self.row_count();
        let lanes = self.options.lanes;
        let estimate = Arc::clone(&self.options.estimate_size);
        self.model.rebuild_with(rows, &|row| estimate(row * lanes));
    }

    fn resize_model(&mut self) {
        let rows = self.row_count();
        let lanes = self.options.lanes;
        let estimate = Arc::clone(&self.options.estimate_size);
        self.model.resize_with(rows, &|row| estimate(row * lanes));
    }

    fn rows_to_items(&self, start_row: usize, end_row: usize) -> WindowRange {
        if start_row >= end_row {
            return WindowRange::EMPTY;
        }
        let lanes = self.options.lanes;
        WindowRange {
            start_index: start_row * lanes,
            end_index: cmp::min(self.options.count, end_row * lanes),
        }
    }

    fn overscanned_rows(&self, scroll_offset: u64, extent: u32) -> (usize, usize) {
        let (start, end) = self.visible_rows(scroll_offset, extent);
        if start >= end {
            return (start, end);
        }
        (
            start.saturating_sub(self.options.overscan_before),
            cmp::min(
                self.model.len(),
                end.saturating_add(self.options.overscan_after),
            ),
        )
    }

    /// The half-open row range intersecting the (clamped) viewport.
    fn visible_rows(&self, scroll_offset: u64, extent: u32) -> (usize, usize) {
        let rows = self.model.len();
        if rows == 0 || extent == 0 {
            return (0, 0);
        }

        let margin = self.list_origin();
        let view = extent as u64;
        let total = self.model.total();

        let max_scroll = margin.saturating_add(total.saturating_sub(view));
        let scroll_offset = scroll_offset.min(max_scroll);
        let scroll_end = scroll_offset.saturating_add(view);
        if scroll_end <= margin {
            // Viewport ends before the list begins (window-scroll mode).
            return (0, 0);
        }

        let list_start = scroll_offset.saturating_sub(margin);
        if list_start >= total {
            return (rows, rows);
        }
        let list_last = scroll_end.saturating_sub(margin).saturating_sub(1);

        let start = self.model.locate(list_start);
        let end = if list_last >= total {
            rows
        } else {
            self.model.locate(cmp::max(list_last, list_start)) + 1
        };
        (start.min(rows), end.min(rows))
    }
}
