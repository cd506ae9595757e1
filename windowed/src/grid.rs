use crate::{Align, ConfigError, Engine, EngineOptions, Viewport, VisibleItem};

/// Two independent 1-D engines composed into a 2-D virtualized grid.
///
/// The row axis and the column axis each run the full windowing algorithm on
/// their own size model; the visible rectangle is simply the cartesian
/// product of the two 1-D windows. Nothing in either axis knows it is part of
/// a grid.
#[derive(Clone, Debug)]
pub struct Grid {
    rows: Engine,
    cols: Engine,
}

impl Grid {
    pub fn new(rows: EngineOptions, cols: EngineOptions) -> Result<Self, ConfigError> {
        Ok(Self {
            rows: Engine::new(rows)?,
            cols: Engine::new(cols)?,
        })
    }

    pub fn row_axis(&self) -> &Engine {
        &self.rows
    }

    pub fn row_axis_mut(&mut self) -> &mut Engine {
        &mut self.rows
    }

    pub fn col_axis(&self) -> &Engine {
        &self.cols
    }

    pub fn col_axis_mut(&mut self) -> &mut Engine {
        &mut self.cols
    }

    /// `(vertical, horizontal)` total extents.
    pub fn total_extent(&self) -> (u64, u64) {
        (self.rows.total_extent(), self.cols.total_extent())
    }

    /// Applies one frame of 2-D scroll state, clamped per axis.
    pub fn apply_scroll_frame_clamped(
        &mut self,
        vertical: Viewport,
        horizontal: Viewport,
        now_ms: u64,
    ) {
        self.rows.apply_scroll_frame_clamped(vertical, now_ms);
        self.cols.apply_scroll_frame_clamped(horizontal, now_ms);
    }

    pub fn measure_row(&mut self, index: usize, size: u32) {
        self.rows.measure_element(index, size);
    }

    pub fn measure_col(&mut self, index: usize, size: u32) {
        self.cols.measure_element(index, size);
    }

    /// Streams every visible cell as a `(row, col)` pair of 1-D items.
    /// Cells arrive row-major, ascending on both axes.
    pub fn for_each_visible_cell(&self, mut f: impl FnMut(VisibleItem, VisibleItem)) {
        self.rows.for_each_visible_item(|row| {
            self.cols.for_each_visible_item(|col| {
                f(row, col);
            });
        });
    }

    /// Scrolls both axes so the cell `(row, col)` becomes visible.
    /// Out-of-range indexes are per-axis no-ops.
    pub fn scroll_to_cell(&mut self, row: usize, col: usize, align: Align) -> (u64, u64) {
        (
            self.rows.scroll_to_index(row, align),
            self.cols.scroll_to_index(col, align),
        )
    }
}
