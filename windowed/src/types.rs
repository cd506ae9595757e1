/// Alignment policy for [`crate::Engine::scroll_to_index`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Align {
    /// Place the item's start edge at the viewport's start edge.
    #[default]
    Start,
    /// Center the item in the viewport.
    Center,
    /// Place the item's end edge at the viewport's end edge.
    End,
    /// Scroll the minimal distance that makes the item fully visible; keeps
    /// the current offset when it already is.
    Nearest,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ScrollDirection {
    Forward,
    Backward,
}

/// The scroll state an adapter feeds into the engine each frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Viewport {
    /// Scroll position along the virtualized axis, in the scroll source's
    /// coordinate space (includes the scroll margin in window-scroll mode).
    pub scroll_offset: u64,
    /// Visible size along the virtualized axis.
    pub extent: u32,
}

/// A half-open `[start_index, end_index)` range of item indexes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WindowRange {
    pub start_index: usize,
    pub end_index: usize, // exclusive
}

impl WindowRange {
    pub const EMPTY: Self = Self {
        start_index: 0,
        end_index: 0,
    };

    pub fn is_empty(&self) -> bool {
        self.start_index >= self.end_index
    }

    pub fn len(&self) -> usize {
        self.end_index.saturating_sub(self.start_index)
    }
}

/// One materialized item of the visible window.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VisibleItem {
    pub index: usize,
    /// Start offset along the scroll axis (includes the scroll margin).
    pub start: u64,
    /// Effective size: the measured size when known, the estimate otherwise.
    pub size: u32,
}

impl VisibleItem {
    pub fn end(&self) -> u64 {
        self.start.saturating_add(self.size as u64)
    }
}
