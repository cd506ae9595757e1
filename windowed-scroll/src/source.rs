use alloc::sync::Arc;

/// Provides the bound element's offset from the page origin, or `None` while
/// the element is not mounted yet.
pub type MarginProvider = Arc<dyn Fn() -> Option<u32> + Send + Sync>;

/// The capability the controller needs from a scroll producer.
///
/// Sources are passive latest-value holders: the UI pushes scroll/resize
/// events into them as they happen, and the controller pulls the latest state
/// once per frame. Pushing twice between pulls is last-write-wins; stale
/// intermediate positions are superseded, never queued.
pub trait ScrollSource {
    /// Latest scroll offset along the virtualized axis, in the source's own
    /// coordinate space.
    fn scroll_offset(&self) -> u64;

    /// Latest visible extent along the virtualized axis.
    fn viewport_extent(&self) -> u32;

    /// Offset of the list origin from the source's scroll origin. `None`
    /// means "unknown right now" (treated as 0 until it resolves), never an
    /// error.
    fn scroll_margin(&self) -> Option<u32>;

    /// Returns whether state changed since the last call, clearing the flag.
    fn take_dirty(&mut self) -> bool;
}

/// Scroll source backed by an inner scrollable container: the container's
/// own scroll position and client size drive the window directly.
#[derive(Clone, Debug, Default)]
pub struct ElementSource {
    scroll_offset: u64,
    viewport_extent: u32,
    dirty: bool,
}

impl ElementSource {
    pub fn new(viewport_extent: u32) -> Self {
        Self {
            scroll_offset: 0,
            viewport_extent,
            dirty: true,
        }
    }

    /// Push a scroll event (e.g. the container's `scrollTop` changed).
    pub fn on_scroll(&mut self, offset: u64) {
        self.scroll_offset = offset;
        self.dirty = true;
    }

    /// Push a resize event (the container's visible size changed).
    pub fn on_resize(&mut self, extent: u32) {
        self.viewport_extent = extent;
        self.dirty = true;
    }
}

impl ScrollSource for ElementSource {
    fn scroll_offset(&self) -> u64 {
        self.scroll_offset
    }

    fn viewport_extent(&self) -> u32 {
        self.viewport_extent
    }

    fn scroll_margin(&self) -> Option<u32> {
        // The list origin is the container's own origin.
        Some(0)
    }

    fn take_dirty(&mut self) -> bool {
        core::mem::take(&mut self.dirty)
    }
}

/// Scroll source backed by the global/page scroll position.
///
/// The virtualized list usually starts somewhere below the page origin; the
/// margin provider reports that distance (e.g. the element's `offsetTop`).
/// Until the element is mounted the provider returns `None` and the margin
/// defaults to 0; the controller re-polls it every frame, so the margin
/// corrects itself as soon as layout settles.
#[derive(Clone)]
pub struct WindowSource {
    scroll_offset: u64,
    viewport_extent: u32,
    margin_provider: MarginProvider,
    dirty: bool,
}

impl WindowSource {
    pub fn new(viewport_extent: u32, margin_provider: MarginProvider) -> Self {
        Self {
            scroll_offset: 0,
            viewport_extent,
            margin_provider,
            dirty: true,
        }
    }

    /// Push a global scroll event.
    pub fn on_scroll(&mut self, global_offset: u64) {
        self.scroll_offset = global_offset;
        self.dirty = true;
    }

    /// Push a global viewport resize event.
    pub fn on_resize(&mut self, extent: u32) {
        self.viewport_extent = extent;
        self.dirty = true;
    }
}

impl ScrollSource for WindowSource {
    fn scroll_offset(&self) -> u64 {
        self.scroll_offset
    }

    fn viewport_extent(&self) -> u32 {
        self.viewport_extent
    }

    fn scroll_margin(&self) -> Option<u32> {
        (self.margin_provider)()
    }

    fn take_dirty(&mut self) -> bool {
        core::mem::take(&mut self.dirty)
    }
}

impl core::fmt::Debug for WindowSource {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("WindowSource")
            .field("scroll_offset", &self.scroll_offset)
            .field("viewport_extent", &self.viewport_extent)
            .field("dirty", &self.dirty)
            .finish_non_exhaustive()
    }
}

/// The two scroll strategies behind one dispatchable type, so a controller
/// can be re-bound at runtime.
#[derive(Clone, Debug)]
pub enum ScrollBinding {
    Element(ElementSource),
    Window(WindowSource),
}

impl ScrollBinding {
    pub fn as_element_mut(&mut self) -> Option<&mut ElementSource> {
        match self {
            Self::Element(source) => Some(source),
            Self::Window(_) => None,
        }
    }

    pub fn as_window_mut(&mut self) -> Option<&mut WindowSource> {
        match self {
            Self::Window(source) => Some(source),
            Self::Element(_) => None,
        }
    }

    /// Push a scroll event regardless of strategy.
    pub fn on_scroll(&mut self, offset: u64) {
        match self {
            Self::Element(source) => source.on_scroll(offset),
            Self::Window(source) => source.on_scroll(offset),
        }
    }

    /// Push a resize event regardless of strategy.
    pub fn on_resize(&mut self, extent: u32) {
        match self {
            Self::Element(source) => source.on_resize(extent),
            Self::Window(source) => source.on_resize(extent),
        }
    }
}

impl ScrollSource for ScrollBinding {
    fn scroll_offset(&self) -> u64 {
        match self {
            Self::Element(source) => source.scroll_offset(),
            Self::Window(source) => source.scroll_offset(),
        }
    }

    fn viewport_extent(&self) -> u32 {
        match self {
            Self::Element(source) => source.viewport_extent(),
            Self::Window(source) => source.viewport_extent(),
        }
    }

    fn scroll_margin(&self) -> Option<u32> {
        match self {
            Self::Element(source) => source.scroll_margin(),
            Self::Window(source) => source.scroll_margin(),
        }
    }

    fn take_dirty(&mut self) -> bool {
        match self {
            Self::Element(source) => source.take_dirty(),
            Self::Window(source) => source.take_dirty(),
        }
    }
}
