//! The Counter component.
//!
//! The `mounted` / `unmount` logging effect lives here rather than in `App`,
//! so it follows each Counter instance through hide and show.

use rehook_core::prelude::*;
use rehook_ui::{Button, Column, Text};
use web_time::{Duration, Instant};

pub const CORRECT_FROM: i64 = 3;
pub const CORRECT_TO: i64 = 4;

/// Which effect class carries the `3 → 4` correction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Correction {
    /// Layout effect: the corrected value is the first one painted.
    #[default]
    BeforePaint,
    /// Passive effect: `3` stays on screen for one frame.
    AfterPaint,
    Disabled,
}

/// Effect that increments `count` every time `count` changes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Runaway {
    /// Stops once `count` is above the bound.
    Guarded { stop_above: i64 },
    /// Never stops; the scheduler's update-depth cap has to end it.
    Unguarded,
}

#[derive(Clone, Debug)]
pub struct CounterOptions {
    pub correction: Correction,
    /// Logs `mounted` once and `unmount` on teardown.
    pub log_mount: bool,
    /// Logs `pressed re-render button` whenever the flag flips.
    pub log_flag: bool,
    pub runaway: Option<Runaway>,
    /// Busy-waits inside render, to make slow renders visible.
    pub stall: Option<Duration>,
}

impl Default for CounterOptions {
    fn default() -> Self {
        Self {
            correction: Correction::default(),
            log_mount: true,
            log_flag: false,
            runaway: None,
            stall: None,
        }
    }
}

pub fn Counter(cx: &mut Cx, console: &Console, options: &CounterOptions) -> View {
    let count = cx.remember_state(|| 0i64);
    let flag = cx.remember_state(|| false);
    let current = count.get();

    if options.log_mount {
        let console = console.clone();
        cx.disposable_effect((), move || {
            console.log("mounted");
            on_unmount(move || console.log("unmount"))
        });
    }

    if let Some(runaway) = options.runaway {
        let count = count.clone();
        cx.disposable_effect(current, move || {
            if let Runaway::Guarded { stop_above } = runaway
                && current > stop_above
            {
                return Dispose::noop();
            }
            count.set(current + 1);
            Dispose::noop()
        });
    }

    let correct = {
        let count = count.clone();
        move || {
            if current == CORRECT_FROM {
                count.set(CORRECT_TO);
            }
            Dispose::noop()
        }
    };
    match options.correction {
        Correction::BeforePaint => cx.layout_effect(current, correct),
        Correction::AfterPaint => cx.disposable_effect(current, correct),
        Correction::Disabled => {}
    }

    {
        let console = console.clone();
        cx.disposable_effect(current, move || {
            console.log_with("count changed", current);
            on_unmount(move || console.log_with("cleanup count changed", current))
        });
    }

    {
        let console = console.clone();
        cx.side_effect(move || {
            console.log("render");
            Dispose::noop()
        });
    }

    if options.log_flag {
        let console = console.clone();
        cx.disposable_effect(flag.get(), move || {
            console.log("pressed re-render button");
            Dispose::noop()
        });
    }

    if let Some(stall) = options.stall {
        let started = Instant::now();
        while started.elapsed() < stall {
            std::hint::spin_loop();
        }
    }

    Column(vec![
        Button("Re-Render", move || flag.update(|f| *f = !*f)),
        Button("Increment", move || count.update(|c| *c += 1)),
        Text(format!("Count: {current}")),
    ])
}
