//! Signal scheduler validation tests
//!
//! These tests drive the scheduler tick by tick, without any vehicles.

use traffic_signal_env::simulation::{
    Direction, Phase, PhaseEvent, SignalScheduler, SignalTiming,
};

/// Tick until every direction has finished `cycles` rotations, collecting
/// every event along the way
fn run_until_complete(
    scheduler: &mut SignalScheduler,
    cycles: u32,
) -> (u32, Vec<PhaseEvent>) {
    let mut events = scheduler.start();
    let mut ticks = 0;
    while !scheduler.all_cycles_complete(cycles) {
        events.extend(scheduler.tick());
        ticks += 1;
        assert!(ticks < 10_000, "rotation never completed");
    }
    (ticks, events)
}

#[test]
fn test_initial_state() {
    let scheduler = SignalScheduler::new(SignalTiming::default(), [0; 4]);

    assert_eq!(scheduler.active(), Direction::East);
    assert!(!scheduler.is_yellow());
    assert_eq!(scheduler.phase(Direction::East), Phase::Green);
    assert_eq!(scheduler.remaining(Direction::East), 10);

    // South's red runs out exactly when East finishes green plus yellow
    assert_eq!(scheduler.signal(Direction::South).red, 15);
    assert_eq!(scheduler.signal(Direction::West).red, 150);
    assert_eq!(scheduler.signal(Direction::North).red, 150);
}

#[test]
fn test_exactly_one_direction_not_red() {
    let mut scheduler = SignalScheduler::new(SignalTiming::default(), [0; 4]);
    scheduler.start();

    for tick in 0..60 {
        let not_red = Direction::ALL
            .iter()
            .filter(|d| scheduler.phase(**d) != Phase::Red)
            .count();
        assert_eq!(not_red, 1, "tick {}: {} directions not red", tick, not_red);
        scheduler.tick();
    }
}

#[test]
fn test_round_robin_order() {
    let mut scheduler = SignalScheduler::new(SignalTiming::default(), [0; 4]);
    let (_, events) = run_until_complete(&mut scheduler, 2);

    let greens: Vec<Direction> = events
        .iter()
        .filter_map(|event| match event {
            PhaseEvent::GreenStarted(d) => Some(*d),
            _ => None,
        })
        .collect();

    let expected: Vec<Direction> = Direction::ALL
        .iter()
        .cycle()
        .take(greens.len())
        .copied()
        .collect();
    assert_eq!(greens, expected, "greens must follow East, South, West, North");
    assert!(greens.len() >= 8, "two rotations should start at least 8 greens");
}

#[test]
fn test_handoff_red_expires_on_green() {
    let mut scheduler = SignalScheduler::new(SignalTiming::default(), [0; 4]);
    scheduler.start();

    for _ in 0..60 {
        for event in scheduler.tick() {
            if let PhaseEvent::GreenStarted(direction) = event {
                assert_eq!(
                    scheduler.signal(direction).red,
                    0,
                    "{} turned green with red time left",
                    direction
                );
            }
        }
    }
}

#[test]
fn test_default_rotation_length() {
    let mut scheduler = SignalScheduler::new(SignalTiming::default(), [0; 4]);
    let (ticks, events) = run_until_complete(&mut scheduler, 1);

    // 10s green + 5s yellow for each of the four directions
    assert_eq!(ticks, 60);

    let completed: Vec<Direction> = events
        .iter()
        .filter_map(|event| match event {
            PhaseEvent::CycleCompleted(d) => Some(*d),
            _ => None,
        })
        .collect();
    assert_eq!(completed, Direction::ALL.to_vec());
}

#[test]
fn test_zero_green_skips_to_yellow() {
    let mut scheduler = SignalScheduler::new(SignalTiming::default(), [10, 10, 10, 10]);

    let start_events = scheduler.start();
    assert_eq!(
        start_events,
        vec![
            PhaseEvent::GreenStarted(Direction::East),
            PhaseEvent::YellowStarted(Direction::East)
        ]
    );
    assert!(scheduler.is_yellow());

    let mut ticks = 0;
    while !scheduler.all_cycles_complete(1) {
        for event in scheduler.tick() {
            if let PhaseEvent::GreenStarted(direction) = event {
                assert!(
                    scheduler.is_yellow(),
                    "{} should go straight to yellow",
                    direction
                );
            }
        }
        ticks += 1;
        assert!(ticks <= 4 * (5 + 150), "rotation took too long");
    }

    assert_eq!(ticks, 20, "four yellows of five seconds each");
}

#[test]
fn test_effective_green_is_clamped() {
    let scheduler = SignalScheduler::new(SignalTiming::default(), [20, -5, 0, 3]);

    assert_eq!(scheduler.effective_green(Direction::East), 0);
    assert_eq!(scheduler.effective_green(Direction::South), 15);
    assert_eq!(scheduler.effective_green(Direction::West), 10);
    assert_eq!(scheduler.effective_green(Direction::North), 7);
}

#[test]
fn test_adjusted_rotation_length() {
    let mut scheduler = SignalScheduler::new(SignalTiming::default(), [5, 0, -5, 10]);
    let (ticks, _) = run_until_complete(&mut scheduler, 1);

    // (5 + 10 + 15 + 0) green + 4 * 5 yellow
    assert_eq!(ticks, 50);
}

#[test]
fn test_red_counters_saturate() {
    let timing = SignalTiming {
        default_red: 3,
        ..SignalTiming::default()
    };
    let mut scheduler = SignalScheduler::new(timing, [0; 4]);
    scheduler.start();

    for _ in 0..20 {
        scheduler.tick();
    }
    assert_eq!(scheduler.signal(Direction::North).red, 0);
    assert_eq!(scheduler.phase(Direction::North), Phase::Red);
}

#[test]
fn test_multiple_cycles() {
    let mut scheduler = SignalScheduler::new(SignalTiming::default(), [0; 4]);
    let (ticks, _) = run_until_complete(&mut scheduler, 2);

    assert_eq!(ticks, 120);
    for direction in Direction::ALL {
        assert_eq!(scheduler.cycles_completed(direction), 2);
    }
}
