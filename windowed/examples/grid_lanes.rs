// Example: a 4-lane masonry-style row grid and a full 2-D grid.
use windowed::{Engine, EngineOptions, Grid, Viewport};

fn main() {
    // 10k items, 4 per row, window-scrolled past a 120px header.
    let mut lanes = Engine::new(
        EngineOptions::new(10_000, |_| 100)
            .with_lanes(4)
            .with_scroll_margin(120),
    )
    .unwrap();
    lanes.set_viewport_and_scroll_clamped(600, 1_500);
    println!("lanes total_extent={}", lanes.total_extent());
    println!("lanes window={:?}", lanes.window_range());

    // Independent row and column axes composed into a spreadsheet view.
    let mut grid = Grid::new(
        EngineOptions::new(1_000, |_| 50),
        EngineOptions::new(20, |_| 150),
    )
    .unwrap();
    grid.apply_scroll_frame_clamped(
        Viewport {
            scroll_offset: 10_000,
            extent: 500,
        },
        Viewport {
            scroll_offset: 300,
            extent: 900,
        },
        0,
    );

    let mut cells = 0usize;
    grid.for_each_visible_cell(|_, _| cells += 1);
    println!("visible cells={cells}");
}
