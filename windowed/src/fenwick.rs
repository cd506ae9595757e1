use alloc::vec::Vec;
use core::cmp;

/// A Fenwick (binary indexed) tree over per-item sizes.
///
/// Supports point update, prefix-sum query and an offset → index descent, all
/// in `O(log n)`. This is what keeps repeated measurement updates from
/// degrading the offset table to `O(n)` per update.
#[derive(Clone, Debug)]
pub(crate) struct Fenwick {
    tree: Vec<u64>, // 1-indexed
    total: u64,
    top_bit: usize,
}

impl Default for Fenwick {
    fn default() -> Self {
        Self::new()
    }
}

impl Fenwick {
    pub(crate) fn new() -> Self {
        Self {
            tree: alloc::vec![0],
            total: 0,
            top_bit: 0,
        }
    }

    pub(crate) fn from_values(values: impl IntoIterator<Item = u64>) -> Self {
        let mut tree = alloc::vec![0u64];
        let mut total = 0u64;
        for (i, v) in values.into_iter().enumerate() {
            let i = i + 1;
            total = total.saturating_add(v);
            tree.push(v);
            // Fold already-complete lower ranges into this node.
            let mut j = 1;
            while j < lsb(i) {
                tree[i] = tree[i].saturating_add(tree[i - j]);
                j <<= 1;
            }
        }
        let n = tree.len() - 1;
        Self {
            tree,
            total,
            top_bit: top_bit_for(n),
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.tree.len() - 1
    }

    /// Appends one value, deriving the new internal node from existing prefix
    /// sums. `O(log n)`.
    pub(crate) fn push(&mut self, value: u64) {
        let i = self.len() + 1;
        self.total = self.total.saturating_add(value);
        let covered = self
            .prefix_sum(i - 1)
            .saturating_sub(self.prefix_sum(i - lsb(i)));
        self.tree.push(covered.saturating_add(value));
        self.top_bit = top_bit_for(i);
    }

    pub(crate) fn truncate(&mut self, new_len: usize) {
        if new_len >= self.len() {
            return;
        }
        self.total = self.prefix_sum(new_len);
        self.tree.truncate(new_len + 1);
        self.top_bit = top_bit_for(new_len);
    }

    pub(crate) fn add(&mut self, index: usize, delta: i64) {
        let n = self.len();
        if index >= n {
            return;
        }
        self.total = apply_delta(self.total, delta);
        let mut i = index + 1;
        while i <= n {
            self.tree[i] = apply_delta(self.tree[i], delta);
            i += lsb(i);
        }
    }

    /// Sum of the first `count` values.
    pub(crate) fn prefix_sum(&self, count: usize) -> u64 {
        let mut i = cmp::min(count, self.len());
        let mut sum = 0u64;
        while i > 0 {
            sum = sum.saturating_add(self.tree[i]);
            i &= i - 1;
        }
        sum
    }

    pub(crate) fn total(&self) -> u64 {
        self.total
    }

    /// Returns the number of leading values whose running sum is `<= target`.
    ///
    /// With strictly positive values this is exactly the index of the value
    /// whose `[prefix_sum(i), prefix_sum(i + 1))` range contains `target`.
    pub(crate) fn lower_bound(&self, mut target: u64) -> usize {
        let n = self.len();
        let mut idx = 0usize;
        let mut bit = self.top_bit;
        while bit != 0 {
            let next = idx + bit;
            if next <= n && self.tree[next] <= target {
                target -= self.tree[next];
                idx = next;
            }
            bit >>= 1;
        }
        idx
    }
}

fn lsb(i: usize) -> usize {
    i & i.wrapping_neg()
}

fn top_bit_for(n: usize) -> usize {
    if n == 0 {
        0
    } else {
        1usize << (usize::BITS - 1 - n.leading_zeros())
    }
}

fn apply_delta(value: u64, delta: i64) -> u64 {
    if delta >= 0 {
        value.saturating_add(delta as u64)
    } else {
        value.saturating_sub(delta.unsigned_abs())
    }
}
