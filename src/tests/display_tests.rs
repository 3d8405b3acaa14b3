//! Layout + renderer against a recording surface.

use super::{RecordingSleep, RecordingSurface, SurfaceCall};
use crate::display::{DisplayPlan, Renderer, ScreenContent, SurfaceAddress};
use crate::layout;
use crate::terminal::TerminalSurface;
use crate::timing::ThreadSleep;
use std::time::{Duration, Instant};

fn args(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

fn render(plan: &DisplayPlan, surface: RecordingSurface) -> (bool, RecordingSurface, Vec<Duration>) {
    let sleep = RecordingSleep::default();
    let mut renderer = Renderer::new(surface, sleep.clone(), SurfaceAddress::default());
    let ok = renderer.render(plan);
    (ok, renderer.into_surface(), sleep.naps())
}

/// The group temperature screen pair, 2.5 s each.
#[test]
fn full_temp_alternates_min_max_then_average() {
    let plan = layout::plan("full_temp", &args(&["18.0", "3", "24.0", "7", "21.0"]));

    let (ok, surface, naps) = render(&plan, RecordingSurface::default());

    assert!(ok);
    assert_eq!(
        surface.frames(),
        vec![
            vec![
                (0, "[2] T-:18.0C (3)".to_string()),
                (1, "T+:24.0C (7)".to_string())
            ],
            vec![(0, "[2] Tmoy:21.0C".to_string())],
        ]
    );
    assert_eq!(naps, vec![Duration::from_millis(2500); 2]);
}

/// Static plans draw once and return without waiting.
#[test]
fn static_plan_draws_one_frame_without_waiting() {
    let plan = layout::plan("local", &args(&["22.3", "55.0"]));

    let (ok, surface, naps) = render(&plan, RecordingSurface::default());

    assert!(ok);
    assert_eq!(
        surface.calls,
        vec![
            SurfaceCall::Init {
                address: 0x27,
                bus: 1
            },
            SurfaceCall::Clear,
            SurfaceCall::Write {
                col: 0,
                row: 0,
                text: "[1] Local Data".into()
            },
            SurfaceCall::Write {
                col: 0,
                row: 1,
                text: "22.3C  55.0%".into()
            },
            SurfaceCall::Flush,
        ]
    );
    assert!(naps.is_empty());
}

/// Whatever goes in, no more than 16 characters reach a row.
#[test]
fn long_lines_reach_the_surface_clipped_to_sixteen() {
    let plan = layout::plan("weather", &args(&["-12.5", "100.0", "120"]));

    let (_, surface, _) = render(&plan, RecordingSurface::default());

    let frames = surface.frames();
    assert_eq!(frames[0][0].1, "[3] -12.5C  100.");
    for (_, text) in &frames[0] {
        assert!(text.chars().count() <= 16);
    }
}

/// A dead display is reported as `false`, never as a panic.
#[test]
fn init_failure_returns_false() {
    let plan = DisplayPlan::Static(ScreenContent::new("hello", "lab"));

    let (ok, surface, _) = render(&plan, RecordingSurface::failing());

    assert!(!ok);
    assert!(surface.frames().is_empty());
}

/// Alternating plans keep their timing even when the display is down.
#[test]
fn failing_alternation_still_waits_both_halves() {
    let plan = layout::plan("full_humid", &args(&["41.0", "2", "63.5", "5", "52.2"]));

    let (ok, _, naps) = render(&plan, RecordingSurface::failing());

    assert!(!ok);
    assert_eq!(naps, vec![Duration::from_millis(2500); 2]);
}

/// Unknown mode, 40 characters, no space: cut at character 20, which is
/// dropped like a space would be.
#[test]
fn free_text_without_whitespace_is_cut_at_the_midpoint() {
    let text = "ABCDEFGHIJKLMNOPQRSTabcdefghijklmnopqrst";

    let (first, second) = layout::split_two_lines(text);
    assert_eq!(first, "ABCDEFGHIJKLMNOPQRST");
    assert_eq!(second, "bcdefghijklmnopqrst");

    let (_, surface, _) = render(&layout::plan(text, &[]), RecordingSurface::default());
    assert_eq!(
        surface.frames(),
        vec![vec![
            (0, "ABCDEFGHIJKLMNOP".to_string()),
            (1, "bcdefghijklmnopq".to_string())
        ]]
    );
}

/// Unknown modes show the joined arguments, split at the nearest space.
#[test]
fn unknown_mode_shows_joined_arguments() {
    let plan = layout::plan("Bonjour", &args(&["la", "classe"]));

    let (_, surface, _) = render(&plan, RecordingSurface::default());

    assert_eq!(
        surface.frames(),
        vec![vec![
            (0, "Bonjour".to_string()),
            (1, "la classe".to_string())
        ]]
    );
}

/// The terminal surface shows exactly what the LCD would.
#[test]
fn terminal_surface_renders_a_group_screen() {
    let plan = layout::plan("temp_group", &args(&["18.0", "24.0", "21.0"]));
    let mut renderer = Renderer::new(
        TerminalSurface::new(Vec::new()),
        RecordingSleep::default(),
        SurfaceAddress::default(),
    );

    assert!(renderer.render(&plan));

    let printed = String::from_utf8(renderer.into_surface().into_inner()).unwrap();
    assert!(printed.contains("│[2] T:18.0-24.0C│"));
    assert!(printed.contains("│Average: 21.0C  │"));
}

/// With real sleeps the window is split evenly in wall-clock time.
#[test]
fn alternation_takes_the_whole_window() {
    let plan = DisplayPlan::Alternating {
        first: ScreenContent::new("one", ""),
        second: ScreenContent::new("two", ""),
        duration: Duration::from_millis(200),
    };
    let mut renderer = Renderer::new(
        RecordingSurface::default(),
        ThreadSleep,
        SurfaceAddress::default(),
    );

    let start = Instant::now();
    assert!(renderer.render(&plan));
    let elapsed = start.elapsed();

    assert!(elapsed >= Duration::from_millis(200), "took {elapsed:?}");
    assert!(elapsed < Duration::from_secs(2), "took {elapsed:?}");
}
