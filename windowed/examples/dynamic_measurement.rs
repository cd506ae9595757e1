// Example: estimates first, measurements as items get rendered.
//
// The renderer reports the real size of each materialized item; items above
// the viewport use the compensating variant so content does not jump.
use windowed::{Engine, EngineOptions};

fn main() {
    let mut e = Engine::new(EngineOptions::new(10_000, |_| 45)).unwrap();
    e.set_viewport_and_scroll_clamped(400, 2_000);

    let mut rendered = Vec::new();
    e.collect_visible_items(&mut rendered);
    for item in &rendered {
        // Pretend layout produced a size that differs from the estimate.
        let real = 30 + (item.index as u32 * 7) % 40;
        e.measure_element_compensating(item.index, real);
    }

    println!("total_extent={}", e.total_extent());
    println!("offset after compensation={}", e.scroll_offset());

    e.collect_visible_items(&mut rendered);
    println!("first_visible={:?}", rendered.first());
}
