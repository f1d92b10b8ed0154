use std::sync::mpsc;
use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use hauntype::controller::SessionController;
use hauntype::runtime::{FixedTicker, Runner, Scheduler, SessionEvent, TestEventSource};
use hauntype::session::{Phase, Target};

// Headless integration using the runtime + controller without a TTY.
// Mirrors the binary's event loop: key events become full-value input
// updates via a buffer, timer events go to the controller by epoch.

fn key(c: char) -> SessionEvent {
    SessionEvent::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE))
}

#[test]
fn headless_passage_flow_completes() {
    let (tx, rx) = mpsc::channel();
    let scheduler = Scheduler::new(tx.clone());
    let mut controller =
        SessionController::new(Target::Passage("hi".into()), 30, scheduler).unwrap();

    let es = TestEventSource::new(rx);
    let runner = Runner::new(es, FixedTicker::new(Duration::from_millis(5)));

    tx.send(key('h')).unwrap();
    tx.send(key('i')).unwrap();

    let mut buffer = String::new();
    for _ in 0..100u32 {
        match runner.step() {
            SessionEvent::Key(ev) => {
                if let KeyCode::Char(c) = ev.code {
                    buffer.push(c);
                    controller.handle_input(&buffer);
                    buffer = controller.snapshot().current_input;
                }
            }
            SessionEvent::ClockTick(epoch) => controller.handle_clock_tick(epoch),
            SessionEvent::SamplerTick(epoch) => controller.handle_sampler_tick(epoch),
            _ => {}
        }
        if controller.session().has_finished() {
            break;
        }
    }

    assert!(controller.session().has_finished());
    let snap = controller.snapshot();
    assert_eq!(snap.accuracy, 100);
    assert_eq!(snap.current_input, "hi");
}

#[test]
fn headless_word_commit_flow() {
    let (tx, rx) = mpsc::channel();
    let scheduler = Scheduler::new(tx.clone());
    let target = Target::Words(vec!["hi".into(), "ho".into()]);
    let mut controller = SessionController::new(target, 30, scheduler).unwrap();

    let es = TestEventSource::new(rx);
    let runner = Runner::new(es, FixedTicker::new(Duration::from_millis(5)));

    for c in "hi ".chars() {
        tx.send(key(c)).unwrap();
    }

    let mut buffer = String::new();
    for _ in 0..100u32 {
        match runner.step() {
            SessionEvent::Key(ev) => {
                if let KeyCode::Char(c) = ev.code {
                    buffer.push(c);
                    controller.handle_input(&buffer);
                    buffer = controller.snapshot().current_input;
                }
            }
            SessionEvent::ClockTick(epoch) => controller.handle_clock_tick(epoch),
            SessionEvent::SamplerTick(epoch) => controller.handle_sampler_tick(epoch),
            _ => {}
        }
        if controller.snapshot().cursor_word_index == 1 {
            break;
        }
    }

    let snap = controller.snapshot();
    assert_eq!(snap.cursor_word_index, 1);
    assert_eq!(snap.current_input, "");
    assert_eq!(snap.accuracy, 100);
    assert_eq!(snap.phase, Phase::Active);
}

#[test]
fn headless_timed_session_finishes_by_countdown() {
    // Real one-second schedules drive the countdown to zero.
    let (tx, rx) = mpsc::channel();
    let scheduler = Scheduler::new(tx.clone());
    let target = Target::Words(vec!["ghost".into()]);
    let mut controller = SessionController::new(target, 2, scheduler).unwrap();

    let es = TestEventSource::new(rx);
    let runner = Runner::new(es, FixedTicker::new(Duration::from_millis(10)));

    tx.send(key('g')).unwrap();

    let deadline = Instant::now() + Duration::from_secs(5);
    let mut buffer = String::new();
    while Instant::now() < deadline {
        match runner.step() {
            SessionEvent::Key(ev) => {
                if let KeyCode::Char(c) = ev.code {
                    buffer.push(c);
                    controller.handle_input(&buffer);
                    buffer = controller.snapshot().current_input;
                }
            }
            SessionEvent::ClockTick(epoch) => controller.handle_clock_tick(epoch),
            SessionEvent::SamplerTick(epoch) => controller.handle_sampler_tick(epoch),
            _ => {}
        }
        if controller.session().has_finished() {
            break;
        }
    }

    assert!(
        controller.session().has_finished(),
        "timed session should finish by countdown"
    );
    let snap = controller.snapshot();
    assert_eq!(snap.time_remaining, 0);
    // the sampler ran while the session was active
    assert!(!snap.wpm_history.is_empty());
}
