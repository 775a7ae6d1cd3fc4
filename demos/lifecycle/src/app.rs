use rehook_core::prelude::*;
use rehook_ui::{Button, Column, Component, Show, ViewExt};

use crate::counter::{Counter, CounterOptions};

/// Shell: one visibility flag, a toggle button and the Counter while shown.
pub fn App(cx: &mut Cx, console: &Console, options: &CounterOptions) -> View {
    let shown = cx.remember_state(|| true);
    let visible = shown.get();
    let label = if visible { "Hide Counter" } else { "Show Counter" };

    let counter = Show(visible, || {
        let console = console.clone();
        let options = options.clone();
        Component("Counter", move |cx| Counter(cx, &console, &options))
    });

    Column(vec![Button(label, move || shown.update(|s| *s = !*s))]).child(counter)
}

pub fn mount_app<B: RenderBackend>(
    sched: &mut Scheduler<B>,
    console: &Console,
    options: CounterOptions,
) -> Result<InstanceId> {
    let console = console.clone();
    sched.mount("App", move |cx| App(cx, &console, &options))
}
