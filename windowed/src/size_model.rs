use alloc::vec::Vec;

use crate::fenwick::Fenwick;

/// The floor applied to estimates and measurements.
///
/// A zero-sized entry would make the offset table non-monotonic and break the
/// offset → index descent, so non-positive sizes clamp here instead of
/// erroring on the render path.
pub const MIN_ITEM_SIZE: u32 = 1;

/// Per-entry size bookkeeping: a caller-supplied estimate that a measured
/// size can overwrite, plus Fenwick prefix sums over the effective sizes.
///
/// Entries are created lazily from the estimator when the tracked count
/// grows, kept when it grows again and truncated when it shrinks; they are
/// never removed individually. The entire table resets only when the
/// estimator changes.
#[derive(Clone, Debug, Default)]
pub(crate) struct SizeModel {
    sizes: Vec<u32>,
    measured: Vec<bool>,
    sums: Fenwick,
}

impl SizeModel {
    pub(crate) fn len(&self) -> usize {
        self.sizes.len()
    }

    /// Grows with fresh estimates or shrinks by truncation, preserving every
    /// entry (measured or not) below the new count.
    pub(crate) fn resize_with(&mut self, count: usize, estimate: &dyn Fn(usize) -> u32) {
        if count < self.sizes.len() {
            self.sizes.truncate(count);
            self.measured.truncate(count);
            self.sums.truncate(count);
            return;
        }
        self.sizes.reserve(count - self.sizes.len());
        self.measured.reserve(count - self.measured.len());
        for i in self.sizes.len()..count {
            let size = estimate(i).max(MIN_ITEM_SIZE);
            self.sizes.push(size);
            self.measured.push(false);
            self.sums.push(size as u64);
        }
    }

    /// Discards all entries and re-estimates from scratch.
    pub(crate) fn rebuild_with(&mut self, count: usize, estimate: &dyn Fn(usize) -> u32) {
        self.sizes.clear();
        self.measured.clear();
        self.sizes.reserve_exact(count);
        self.measured.reserve_exact(count);
        for i in 0..count {
            self.sizes.push(estimate(i).max(MIN_ITEM_SIZE));
            self.measured.push(false);
        }
        self.sums = Fenwick::from_values(self.sizes.iter().map(|&s| s as u64));
    }

    /// Overwrites the measurement for one entry. Returns the applied delta
    /// against the previous effective size (0 when unchanged).
    ///
    /// Calls for distinct entries commute: the offset table is a pure
    /// function of the latest size per entry, not of update order.
    pub(crate) fn record(&mut self, index: usize, size: u32) -> i64 {
        debug_assert!(index < self.sizes.len());
        let size = size.max(MIN_ITEM_SIZE);
        let prev = self.sizes[index];
        self.measured[index] = true;
        if prev == size {
            return 0;
        }
        self.sizes[index] = size;
        let delta = size as i64 - prev as i64;
        self.sums.add(index, delta);
        delta
    }

    pub(crate) fn is_measured(&self, index: usize) -> bool {
        self.measured.get(index).copied().unwrap_or(false)
    }

    pub(crate) fn size_of(&self, index: usize) -> Option<u32> {
        self.sizes.get(index).copied()
    }

    /// `offset(index)`: cumulative size of all entries before `index`.
    pub(crate) fn offset_of(&self, index: usize) -> u64 {
        self.sums.prefix_sum(index)
    }

    pub(crate) fn total(&self) -> u64 {
        self.sums.total()
    }

    /// The entry whose `[offset_of(i), offset_of(i + 1))` range contains
    /// `position`. Returns the `len()` sentinel for positions at or past the
    /// total extent (including the empty model).
    pub(crate) fn locate(&self, position: u64) -> usize {
        if position >= self.sums.total() {
            return self.sizes.len();
        }
        self.sums.lower_bound(position)
    }
}
