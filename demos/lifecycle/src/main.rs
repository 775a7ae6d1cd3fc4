use anyhow::{Context, Result};
use lifecycle::{Correction, CounterOptions, Runaway, mount_app, painted_counts};
use rehook_core::prelude::*;

/// Keeps every frame and reports it through `log`.
#[derive(Default)]
struct LogBackend {
    recorder: FrameRecorder,
}

impl RenderBackend for LogBackend {
    fn frame(&mut self, frame: &Frame) {
        let texts: Vec<_> = frame.scene.texts().collect();
        let buttons: Vec<_> = frame.scene.buttons().collect();
        log::info!(
            target: "paint",
            "frame {}: buttons {buttons:?} texts {texts:?}",
            frame.number
        );
        self.recorder.frame(frame);
    }
}

fn session(correction: Correction) -> Result<()> {
    let console = Console::new();
    let mut sched = Scheduler::new(LogBackend::default());
    let options = CounterOptions {
        correction,
        log_flag: true,
        ..CounterOptions::default()
    };
    mount_app(&mut sched, &console, options)?;

    let script = [
        "Increment",
        "Increment",
        "Increment",
        "Re-Render",
        "Increment",
        "Hide Counter",
        "Show Counter",
    ];
    for label in script {
        sched
            .click(label)
            .with_context(|| format!("clicking '{label}'"))?;
    }

    println!("== correction {correction:?}");
    println!(
        "painted counts: {:?}",
        painted_counts(sched.backend().recorder.frames())
    );
    for line in console.lines() {
        println!("  {line}");
    }
    sched.unmount()?;
    Ok(())
}

fn runaway(runaway: Runaway) -> Result<()> {
    let console = Console::new();
    let mut sched = Scheduler::headless();
    let options = CounterOptions {
        correction: Correction::Disabled,
        log_mount: false,
        runaway: Some(runaway),
        ..CounterOptions::default()
    };
    match mount_app(&mut sched, &console, options) {
        Ok(_) => println!(
            "== runaway {runaway:?} settled at {:?} after {} passes",
            sched.last_frame().and_then(|f| f.text_after("Count: ")),
            sched.metrics().render_passes
        ),
        Err(e) => println!("== runaway {runaway:?} aborted: {e}"),
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();

    session(Correction::BeforePaint)?;
    session(Correction::AfterPaint)?;
    runaway(Runaway::Guarded { stop_above: 5 })?;
    runaway(Runaway::Unguarded)?;
    Ok(())
}
