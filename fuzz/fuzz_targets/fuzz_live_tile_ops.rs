#![no_main]

//! Drives a LiveTile with arbitrary host operations and checks that the
//! rotation invariants hold after every settled step.

use std::rc::Rc;
use std::time::Duration;

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use tilekit_core::{Direction, Size};
use tilekit_runtime::{ScriptedIntervals, VirtualHost};
use tilekit_widgets::{ItemsSource, LiveTile, SharedList};

#[derive(Debug, Arbitrary)]
enum Op {
    Mount,
    Unmount,
    Start,
    Stop,
    Advance(u16),
    Rotate,
    Resize(u16, u16),
    Direction(bool),
    Replace(u8),
    Detach,
    Reattach,
    Push(u8),
    Remove(u8),
    Clear,
}

#[derive(Debug, Arbitrary)]
struct Input {
    delays: Vec<u8>,
    ops: Vec<Op>,
}

fuzz_target!(|input: Input| {
    let mut delays: Vec<Duration> = input
        .delays
        .iter()
        .take(16)
        .map(|d| Duration::from_millis(600 + u64::from(*d) * 40))
        .collect();
    if delays.is_empty() {
        delays.push(Duration::from_secs(5));
    }

    let host = Rc::new(VirtualHost::new());
    let list = SharedList::new(vec![0u8, 1, 2]);
    let tile = LiveTile::builder(host.clone(), host.clone())
        .intervals(ScriptedIntervals::new(delays))
        .items_source(&list)
        .build();

    for op in input.ops.into_iter().take(256) {
        match op {
            Op::Mount => tile.mount(),
            Op::Unmount => tile.unmount(),
            Op::Start => {
                tile.start();
            }
            Op::Stop => {
                tile.stop();
            }
            Op::Advance(ms) => {
                host.advance(Duration::from_millis(u64::from(ms)));
            }
            Op::Rotate => {
                let before = tile.current_index();
                let stepped = tile.advance().is_animating();
                assert_eq!(tile.current_index(), before + u64::from(stepped));
            }
            Op::Resize(w, h) => tile.resize(Size::new(f64::from(w), f64::from(h))),
            Op::Direction(left) => tile.set_direction(if left {
                Direction::Left
            } else {
                Direction::Up
            }),
            Op::Replace(len) => {
                let items: Vec<u8> = (0..len % 8).collect();
                tile.set_items_source(Some(ItemsSource::from(items)));
            }
            Op::Detach => tile.set_items_source(None),
            Op::Reattach => tile.set_items_source(Some(ItemsSource::from(&list))),
            Op::Push(v) => list.push(v),
            Op::Remove(i) => {
                list.remove(usize::from(i));
            }
            Op::Clear => list.clear(),
        }

        assert!(host.pending_timers() <= 1);
        assert_eq!(tile.is_running(), host.pending_timers() == 1);
        assert!(host.running_animations() <= 1);
    }

    host.finish_animations();
    assert!(!tile.is_transitioning());
});
