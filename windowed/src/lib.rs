//! A headless windowing (virtualization) engine for large ordered collections.
//!
//! Given `count` items, a per-item size estimator and a viewport
//! `(scroll_offset, extent)`, the engine computes the contiguous window of
//! items that must be materialized, their cumulative start offsets and the
//! total scrollable extent. Measured sizes reported back by the renderer
//! override estimates incrementally (Fenwick-tree prefix sums, `O(log n)`
//! per update/query).
//!
//! The engine is UI-agnostic: it never touches rendering, styling or the
//! DOM-equivalent of whatever toolkit drives it. An adapter layer is expected
//! to provide:
//! - viewport extent along the virtualized axis
//! - scroll offset (from an inner scrollable element or a global/window
//!   scroll position offset by a scroll margin)
//! - measured item sizes once items have actually been laid out
//!
//! For scroll-source adapters, the frame controller and the infinite-load
//! trigger, see the `windowed-scroll` crate.
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod engine;
mod error;
mod fenwick;
mod grid;
mod options;
mod size_model;
mod types;

#[cfg(test)]
mod tests;

pub use engine::Engine;
pub use error::ConfigError;
pub use grid::Grid;
pub use options::{EngineOptions, OnChangeCallback};
pub use size_model::MIN_ITEM_SIZE;
pub use types::{Align, ScrollDirection, Viewport, VisibleItem, WindowRange};
