//! Scroll-source adapters for the `windowed` crate.
//!
//! The `windowed` engine is UI-agnostic: it consumes a uniform
//! `(scroll_offset, extent)` pair and does not care where it came from. This
//! crate provides the plumbing between real scroll producers and the engine:
//!
//! - [`ElementSource`]: an inner scrollable container drives the window
//! - [`WindowSource`]: the global/page scroll position drives the window,
//!   offset by a scroll margin (the list's distance from the page origin)
//! - [`Controller`]: owns the engine plus one bound source and coalesces
//!   scroll events to one recomputation per frame tick
//! - [`LoadTrigger`]: fires a caller-supplied loader when the window nears
//!   the end of the loaded data, exactly once per crossing
//!
//! This crate is intentionally framework-agnostic (no DOM/TUI bindings).
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

mod controller;
mod infinite;
mod source;


pub use controller::Controller;
pub use infinite::LoadTrigger;
pub use source::{ElementSource, MarginProvider, ScrollBinding, ScrollSource, WindowSource};
