#![forbid(unsafe_code)]

//! `proptest` strategies for tile inputs.

use std::time::Duration;

use proptest::prelude::*;
use tilekit_core::{Direction, Size};

/// Item lists of length `len` labelled `i0, i1, ...`.
pub fn items(len: impl Into<prop::collection::SizeRange>) -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(any::<u8>(), len).prop_map(|raw| {
        raw.iter()
            .enumerate()
            .map(|(i, tag)| format!("i{i}:{tag}"))
            .collect()
    })
}

/// Either slide direction.
pub fn direction() -> impl Strategy<Value = Direction> {
    prop_oneof![Just(Direction::Up), Just(Direction::Left)]
}

/// Host sizes, including the unsized `0x0`.
pub fn size() -> impl Strategy<Value = Size> {
    prop_oneof![
        1 => Just(Size::ZERO),
        8 => (0u16..2048, 0u16..2048)
            .prop_map(|(w, h)| Size::new(f64::from(w), f64::from(h))),
    ]
}

/// Tick delay scripts in whole seconds, each longer than the default slide.
pub fn interval_script() -> impl Strategy<Value = Vec<Duration>> {
    prop::collection::vec(1u64..12, 1..6)
        .prop_map(|secs| secs.into_iter().map(Duration::from_secs).collect())
}
