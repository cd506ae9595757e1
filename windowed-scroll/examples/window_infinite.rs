// Example: window-scrolled infinite list.
//
// The "page" scrolls; the list starts 50px down. When the user reaches the
// last loaded row, the trigger fires once and a simulated fetch appends more.
use std::sync::Arc;

use windowed::EngineOptions;
use windowed_scroll::{Controller, LoadTrigger};

fn main() {
    let mut c = Controller::new(EngineOptions::new(20, |_| 35).with_overscan(0, 5)).unwrap();
    c.bind_window_source(400, Arc::new(|| Some(50)));
    let mut trigger = LoadTrigger::new(0);

    let mut now_ms = 0u64;
    loop {
        // Simulated user scroll toward the end of the loaded rows.
        let target = c.engine().max_scroll_offset();
        c.on_scroll(target);
        now_ms += 16;
        c.tick(now_ms);

        if trigger.check(c.engine()) {
            let count = c.engine().count();
            println!("t={now_ms}ms loading 10 more rows (have {count})");
            // A real adapter would resolve this asynchronously.
            c.engine_mut().set_count(count + 10);
            trigger.loaded();
        }

        if c.engine().count() >= 60 {
            trigger.set_has_more(false);
            break;
        }
    }

    println!("final count={}", c.engine().count());
    println!("final extent={}", c.engine().total_extent());
}
