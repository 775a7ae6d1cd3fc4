use lifecycle::{Correction, CounterOptions, Runaway, mount_app, painted_counts};
use rehook_core::prelude::*;
use web_time::{Duration, Instant};

fn mounted(options: CounterOptions) -> (Scheduler, Console) {
    let console = Console::new();
    let mut sched = Scheduler::headless();
    mount_app(&mut sched, &console, options).unwrap();
    (sched, console)
}

fn with_correction(correction: Correction) -> CounterOptions {
    CounterOptions {
        correction,
        ..CounterOptions::default()
    }
}

fn shown_count(sched: &Scheduler) -> Option<i64> {
    sched
        .last_frame()
        .and_then(|f| f.text_after("Count: "))
        .and_then(|n| n.parse().ok())
}

fn click_n(sched: &mut Scheduler, label: &str, n: usize) {
    for _ in 0..n {
        sched.click(label).unwrap();
    }
}

#[test]
fn first_frame_shows_fresh_counter() {
    let (sched, console) = mounted(CounterOptions::default());

    let frame = sched.last_frame().unwrap();
    let buttons: Vec<_> = frame.scene.buttons().collect();
    assert_eq!(buttons, vec!["Hide Counter", "Re-Render", "Increment"]);
    assert_eq!(frame.text_after("Count: "), Some("0"));
    assert_eq!(console.lines(), vec!["mounted", "count changed: 0", "render"]);
    assert_eq!(sched.instance_count(), 2);
}

#[test]
fn increments_skip_three() {
    let (mut sched, _) = mounted(CounterOptions::default());
    let mut seen = Vec::new();
    for _ in 0..6 {
        sched.click("Increment").unwrap();
        seen.push(shown_count(&sched).unwrap());
    }
    assert_eq!(seen, vec![1, 2, 4, 5, 6, 7]);
}

#[test]
fn layout_correction_never_paints_three() {
    let (mut sched, _) = mounted(with_correction(Correction::BeforePaint));
    click_n(&mut sched, "Increment", 2);

    sched.click("Increment").unwrap();
    let m = sched.metrics();
    assert_eq!((m.render_passes, m.commits, m.paints), (2, 2, 1));

    assert_eq!(painted_counts(sched.backend().frames()), vec![0, 1, 2, 4]);
}

#[test]
fn passive_correction_flickers_three() {
    let (mut sched, _) = mounted(with_correction(Correction::AfterPaint));
    click_n(&mut sched, "Increment", 3);

    assert_eq!(sched.metrics().paints, 2);
    assert_eq!(painted_counts(sched.backend().frames()), vec![0, 1, 2, 3, 4]);
}

#[test]
fn without_correction_three_sticks() {
    let (mut sched, _) = mounted(with_correction(Correction::Disabled));
    click_n(&mut sched, "Increment", 3);
    assert_eq!(painted_counts(sched.backend().frames()), vec![0, 1, 2, 3]);
}

#[test]
fn both_corrections_log_the_same_markers() {
    let run = |correction| {
        let (mut sched, console) = mounted(with_correction(correction));
        click_n(&mut sched, "Increment", 3);
        console.lines()
    };
    assert_eq!(run(Correction::BeforePaint), run(Correction::AfterPaint));
}

#[test]
fn rerender_runs_only_the_unkeyed_effect() {
    let (mut sched, console) = mounted(CounterOptions::default());
    sched.click("Increment").unwrap();
    console.drain();
    let frames = sched.backend().frames().len();

    sched.click("Re-Render").unwrap();
    assert_eq!(console.drain(), vec!["render"]);
    assert_eq!(sched.backend().frames().len(), frames + 1);
    assert_eq!(shown_count(&sched), Some(1));
}

#[test]
fn flag_effect_follows_rerender_button() {
    let options = CounterOptions {
        log_flag: true,
        ..CounterOptions::default()
    };
    let (mut sched, console) = mounted(options);
    assert_eq!(
        console.drain(),
        vec!["mounted", "count changed: 0", "render", "pressed re-render button"]
    );

    sched.click("Increment").unwrap();
    assert!(
        !console
            .drain()
            .contains(&"pressed re-render button".to_string())
    );

    sched.click("Re-Render").unwrap();
    assert_eq!(console.drain(), vec!["render", "pressed re-render button"]);
}

#[test]
fn hiding_runs_cleanups_for_last_count() {
    let (mut sched, console) = mounted(CounterOptions::default());
    click_n(&mut sched, "Increment", 2);
    console.drain();

    sched.click("Hide Counter").unwrap();
    assert_eq!(console.drain(), vec!["unmount", "cleanup count changed: 2"]);
    assert!(sched.find("Counter").is_none());
    assert_eq!(sched.instance_count(), 1);

    let frame = sched.last_frame().unwrap();
    assert_eq!(frame.scene.buttons().collect::<Vec<_>>(), vec!["Show Counter"]);
    assert_eq!(frame.text_after("Count: "), None);

    assert_eq!(
        sched.click("Increment"),
        Err(RuntimeError::NoSuchButton("Increment".into()))
    );
    assert!(console.is_empty());
}

#[test]
fn showing_again_starts_from_zero() {
    let (mut sched, console) = mounted(CounterOptions::default());
    let first = sched.find("Counter").unwrap();
    click_n(&mut sched, "Increment", 4);
    assert_eq!(shown_count(&sched), Some(5));

    sched.click("Hide Counter").unwrap();
    assert_eq!(sched.lifecycle(first), None);
    console.drain();

    sched.click("Show Counter").unwrap();
    let second = sched.find("Counter").unwrap();
    assert_ne!(first, second);
    assert_eq!(sched.lifecycle(second), Some(Lifecycle::Mounted));
    assert_eq!(shown_count(&sched), Some(0));
    assert_eq!(console.drain(), vec!["mounted", "count changed: 0", "render"]);

    sched.click("Increment").unwrap();
    assert_eq!(shown_count(&sched), Some(1));
}

#[test]
fn one_render_marker_per_commit() {
    let (mut sched, console) = mounted(CounterOptions::default());
    let mut commits = sched.metrics().commits;
    for label in ["Increment", "Increment", "Increment", "Re-Render", "Increment"] {
        sched.click(label).unwrap();
        commits += sched.metrics().commits;
    }
    let renders = console.lines().iter().filter(|l| *l == "render").count();
    assert_eq!(renders, commits);
    assert_eq!(renders, 7);
}

#[test]
fn whole_session_transcript() {
    let (mut sched, console) = mounted(CounterOptions::default());
    for label in [
        "Increment",
        "Increment",
        "Increment",
        "Re-Render",
        "Hide Counter",
        "Show Counter",
    ] {
        sched.click(label).unwrap();
    }

    insta::assert_snapshot!(console.lines().join("\n"), @r"
    mounted
    count changed: 0
    render
    cleanup count changed: 0
    count changed: 1
    render
    cleanup count changed: 1
    count changed: 2
    render
    cleanup count changed: 2
    count changed: 3
    render
    cleanup count changed: 3
    count changed: 4
    render
    render
    unmount
    cleanup count changed: 4
    mounted
    count changed: 0
    render
    ");
}

#[test]
fn guarded_runaway_settles() {
    let options = CounterOptions {
        correction: Correction::Disabled,
        log_mount: false,
        runaway: Some(Runaway::Guarded { stop_above: 5 }),
        ..CounterOptions::default()
    };
    let (sched, _) = mounted(options);

    assert_eq!(shown_count(&sched), Some(6));
    assert_eq!(sched.metrics().render_passes, 7);
    assert_eq!(
        painted_counts(sched.backend().frames()),
        vec![0, 1, 2, 3, 4, 5, 6]
    );
}

#[test]
fn unguarded_runaway_is_aborted() {
    let options = CounterOptions {
        correction: Correction::Disabled,
        log_mount: false,
        runaway: Some(Runaway::Unguarded),
        ..CounterOptions::default()
    };
    let console = Console::new();
    let mut sched = Scheduler::headless();
    let result = mount_app(&mut sched, &console, options);

    assert_eq!(result, Err(RuntimeError::UpdateDepthExceeded { limit: 50 }));
    assert_eq!(sched.metrics().render_passes, 50);
}

#[test]
fn stalled_render_still_commits() {
    let options = CounterOptions {
        stall: Some(Duration::from_millis(5)),
        ..CounterOptions::default()
    };
    let (mut sched, _) = mounted(options);

    let started = Instant::now();
    sched.click("Increment").unwrap();
    assert!(started.elapsed() >= Duration::from_millis(5));
    assert_eq!(shown_count(&sched), Some(1));
}
