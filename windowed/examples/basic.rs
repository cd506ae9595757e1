// Example: minimal usage and scroll-to helper.
use windowed::{Align, Engine, EngineOptions};

fn main() {
    let mut e = Engine::new(EngineOptions::new(1_000_000, |_| 35)).unwrap();
    e.set_viewport_and_scroll(400, 123_456);

    println!("total_extent={}", e.total_extent());
    println!("window={:?}", e.window_range());
    println!("first_visible={:?}", e.visible_items().first());

    e.scroll_to_index(999_999, Align::End);
    println!("after scroll_to_index: offset={}", e.scroll_offset());
}
