#![allow(non_snake_case)]
//! Mount, unmount and effect timing, shown with two components.
//!
//! `App` holds a visibility flag and mounts or drops a `Counter`. The
//! Counter corrects `3` to `4` from an effect; which effect class carries
//! that correction decides whether `3` is ever painted.

pub mod app;
pub mod counter;

pub use app::{App, mount_app};
pub use counter::{CORRECT_FROM, CORRECT_TO, Correction, Counter, CounterOptions, Runaway};

use rehook_core::Frame;

/// `Count: N` values across painted frames, skipping frames without a Counter.
pub fn painted_counts(frames: &[Frame]) -> Vec<i64> {
    frames
        .iter()
        .filter_map(|f| f.text_after("Count: "))
        .filter_map(|n| n.parse().ok())
        .collect()
}
