use windowed::{Align, Engine, EngineOptions, Viewport};

use crate::{ElementSource, MarginProvider, ScrollBinding, ScrollSource, WindowSource};

/// A framework-neutral controller that couples one [`Engine`] with one bound
/// scroll source.
///
/// The UI pushes scroll/resize events into the bound source as they happen
/// and calls [`Controller::tick`] once per rendering frame. Each tick applies
/// the source's latest state to the engine at most once, so a burst of scroll
/// events between frames costs a single recomputation at the newest position
/// (last-write-wins; no backlog of stale recomputations).
///
/// An engine has exactly one active source: re-binding replaces the previous
/// one.
#[derive(Clone, Debug)]
pub struct Controller {
    engine: Engine,
    binding: Option<ScrollBinding>,
}

impl Controller {
    pub fn new(options: EngineOptions) -> Result<Self, windowed::ConfigError> {
        Ok(Self {
            engine: Engine::new(options)?,
            binding: None,
        })
    }

    pub fn from_engine(engine: Engine) -> Self {
        Self {
            engine,
            binding: None,
        }
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut Engine {
        &mut self.engine
    }

    pub fn into_engine(self) -> Engine {
        self.engine
    }

    /// Binds an inner scrollable container as the scroll source.
    pub fn bind_element_source(&mut self, source: ElementSource) {
        self.binding = Some(ScrollBinding::Element(source));
    }

    /// Binds the global/page scroll position as the scroll source. The
    /// margin provider reports the list's distance from the page origin
    /// (`None` while unknown; treated as 0 until it resolves).
    pub fn bind_window_source(&mut self, viewport_extent: u32, margin_provider: MarginProvider) {
        self.binding = Some(ScrollBinding::Window(WindowSource::new(
            viewport_extent,
            margin_provider,
        )));
    }

    pub fn binding(&self) -> Option<&ScrollBinding> {
        self.binding.as_ref()
    }

    /// The bound source, for pushing UI events into it.
    pub fn binding_mut(&mut self) -> Option<&mut ScrollBinding> {
        self.binding.as_mut()
    }

    /// Push a scroll event into the bound source (no recomputation yet; that
    /// happens on the next [`Self::tick`]).
    pub fn on_scroll(&mut self, offset: u64) {
        if let Some(binding) = &mut self.binding {
            binding.on_scroll(offset);
        }
    }

    /// Push a viewport resize event into the bound source.
    pub fn on_resize(&mut self, extent: u32) {
        if let Some(binding) = &mut self.binding {
            binding.on_resize(extent);
        }
    }

    /// Advances the controller by one frame.
    ///
    /// Re-polls the scroll margin, applies the source's latest scroll state
    /// to the engine when it changed since the previous tick, and runs the
    /// `is_scrolling` debounce. Returns `true` when the engine recomputed.
    pub fn tick(&mut self, now_ms: u64) -> bool {
        let mut recomputed = false;
        if let Some(binding) = &mut self.binding {
            if let Some(margin) = binding.scroll_margin() {
                self.engine.set_scroll_margin(margin);
            }
            if binding.take_dirty() {
                let viewport = Viewport {
                    scroll_offset: binding.scroll_offset(),
                    extent: binding.viewport_extent(),
                };
                self.engine.apply_scroll_frame_clamped(viewport, now_ms);
                recomputed = true;
            }
        }
        self.engine.update_scrolling(now_ms);
        recomputed
    }

    /// Scrolls the engine to `index` and returns the offset the UI should
    /// apply to the real scroll producer. Out-of-range indexes are no-ops
    /// and return the current offset.
    pub fn scroll_to_index(&mut self, index: usize, align: Align, now_ms: u64) -> u64 {
        let Some(offset) = self.engine.scroll_to_index_offset(index, align) else {
            return self.engine.scroll_offset();
        };
        self.engine.apply_scroll_offset_event_clamped(offset, now_ms);
        if let Some(binding) = &mut self.binding {
            // Keep the source in sync so the next tick is not treated as a
            // user scroll back to the stale position.
            binding.on_scroll(self.engine.scroll_offset());
            binding.take_dirty();
        }
        self.engine.scroll_offset()
    }
}
