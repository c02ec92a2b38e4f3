//! Lane queue and vehicle motion tests
//!
//! Lanes are driven directly with a scheduler that is never ticked, so East
//! stays green and every other direction stays red for the whole test.

use traffic_signal_env::simulation::{
    AdmissionRules, ClassProfile, Direction, IntersectionConfig, LaneQueue, MotionRules,
    SignalScheduler, SignalTiming, VehicleClass, VehicleId,
};

fn lane_for(config: &IntersectionConfig, direction: Direction, lane: usize) -> LaneQueue {
    LaneQueue::new(direction, lane, config.approach(direction))
}

fn admission(config: &IntersectionConfig) -> AdmissionRules {
    AdmissionRules {
        stopping_gap: config.stopping_gap,
        moving_gap: config.moving_gap,
    }
}

fn motion(config: &IntersectionConfig, direction: Direction) -> MotionRules {
    MotionRules {
        stop_line: config.approach(direction).stop_line,
        moving_gap: config.moving_gap,
    }
}

fn profile(config: &IntersectionConfig, class: VehicleClass) -> ClassProfile {
    config.class(class).clone()
}

/// Assert every follower keeps the moving gap behind the vehicle ahead
fn assert_gaps(lane: &LaneQueue, moving_gap: f32, frame: usize) {
    let vehicles: Vec<_> = lane.iter().collect();
    for pair in vehicles.windows(2) {
        let (ahead, behind) = (pair[0], pair[1]);
        let gap = behind
            .direction
            .distance_ahead(behind.leading_edge(), ahead.trailing_edge());
        assert!(
            gap >= moving_gap - 1e-3,
            "frame {}: {:?} is {} behind {:?}",
            frame,
            behind.id,
            gap,
            ahead.id
        );
    }
}

#[test]
fn test_stop_bounds_chain_off_previous_arrival() {
    let config = IntersectionConfig::default();
    let rules = admission(&config);
    let mut lane = lane_for(&config, Direction::East, 0);

    let car = lane
        .admit(VehicleId(0), VehicleClass::Car, &profile(&config, VehicleClass::Car), &rules)
        .stop_bound;
    let bus = lane
        .admit(VehicleId(1), VehicleClass::Bus, &profile(&config, VehicleClass::Bus), &rules)
        .stop_bound;
    let truck = lane
        .admit(
            VehicleId(2),
            VehicleClass::Truck,
            &profile(&config, VehicleClass::Truck),
            &rules,
        )
        .stop_bound;

    assert_eq!(car, 580.0, "first vehicle stops at the default stop");
    assert_eq!(bus, 580.0 - (40.0 + 15.0));
    assert_eq!(truck, 580.0 - (40.0 + 15.0) - (70.0 + 15.0));
}

#[test]
fn test_stop_bounds_chain_against_travel_direction() {
    let config = IntersectionConfig::default();
    let rules = admission(&config);
    let mut lane = lane_for(&config, Direction::West, 1);

    lane.admit(VehicleId(0), VehicleClass::Car, &profile(&config, VehicleClass::Car), &rules);
    let second = lane
        .admit(VehicleId(1), VehicleClass::Car, &profile(&config, VehicleClass::Car), &rules)
        .stop_bound;

    // West travels towards -x, so the queue grows towards +x
    assert_eq!(second, 810.0 + 40.0 + 15.0);
}

#[test]
fn test_spawn_placement_keeps_moving_gap() {
    let config = IntersectionConfig::default();
    let rules = admission(&config);
    let mut lane = lane_for(&config, Direction::East, 2);

    let first = lane
        .admit(VehicleId(0), VehicleClass::Car, &profile(&config, VehicleClass::Car), &rules)
        .position;
    let second = lane
        .admit(VehicleId(1), VehicleClass::Bike, &profile(&config, VehicleClass::Bike), &rules)
        .position;

    assert_eq!(first, -15.0, "leading edge starts one stopping gap behind spawn");
    assert_eq!(second, -15.0 - 40.0 - 15.0, "pushed back behind the first car");
    assert_gaps(&lane, config.moving_gap, 0);
}

#[test]
fn test_queue_forms_on_red() {
    let config = IntersectionConfig::default();
    let rules = admission(&config);
    let scheduler = SignalScheduler::new(SignalTiming::default(), [0; 4]);
    let motion_rules = motion(&config, Direction::South);
    let mut lane = lane_for(&config, Direction::South, 0);

    for (id, class) in VehicleClass::ALL.iter().chain(&[VehicleClass::Car]).enumerate() {
        lane.admit(VehicleId(id as u64), *class, &profile(&config, *class), &rules);
    }

    for frame in 0..1200 {
        let crossed = lane.advance(&scheduler, &motion_rules);
        assert_eq!(crossed, 0, "frame {}: nothing may cross on red", frame);
        assert_gaps(&lane, config.moving_gap, frame);
    }

    assert_eq!(lane.queued(), 5);
    assert_eq!(lane.crossed(), 0);

    let front = lane.iter().next().expect("lane should not be empty");
    assert!(
        front.position > 320.0 && front.position < 330.0,
        "front vehicle should wait between the default stop and the stop line, at {}",
        front.position
    );

    // Every vehicle ends up at most one frame's travel past its stop bound
    for vehicle in lane.iter() {
        let overshoot = vehicle
            .direction
            .distance_ahead(vehicle.stop_bound, vehicle.leading_edge());
        assert!(
            overshoot <= vehicle.speed + 1e-3,
            "{:?} overshot its stop bound by {}",
            vehicle.id,
            overshoot
        );
    }
}

#[test]
fn test_release_stop_bounds() {
    let config = IntersectionConfig::default();
    let rules = admission(&config);
    let mut lane = lane_for(&config, Direction::North, 0);

    for id in 0..3 {
        lane.admit(VehicleId(id), VehicleClass::Car, &profile(&config, VehicleClass::Car), &rules);
    }
    lane.release_stop_bounds();

    for vehicle in lane.iter() {
        assert_eq!(vehicle.stop_bound, 545.0);
    }
}

#[test]
fn test_vehicle_crosses_on_green_and_departs() {
    let config = IntersectionConfig::default();
    let rules = admission(&config);
    let scheduler = SignalScheduler::new(SignalTiming::default(), [0; 4]);
    let motion_rules = motion(&config, Direction::East);
    let exit = config.approach(Direction::East).exit;
    let mut lane = lane_for(&config, Direction::East, 0);

    lane.admit(VehicleId(0), VehicleClass::Car, &profile(&config, VehicleClass::Car), &rules);

    let mut crossed_at = None;
    let mut evicted_at = None;
    let mut last_crossed = 0;
    for frame in 0..2000 {
        lane.advance(&scheduler, &motion_rules);
        assert!(lane.crossed() >= last_crossed, "crossed count went backwards");
        last_crossed = lane.crossed();

        if crossed_at.is_none() && lane.crossed() == 1 {
            crossed_at = Some(frame);
            assert_eq!(lane.queued(), 0);
        }
        if lane.evict_departed(exit) > 0 {
            evicted_at = Some(frame);
            break;
        }
    }

    let crossed_at = crossed_at.expect("car never crossed");
    let evicted_at = evicted_at.expect("car never left the canvas");
    assert!(crossed_at < evicted_at);
    assert!(lane.is_empty());
    assert_eq!(lane.crossed(), 1, "eviction keeps the crossed tally");
}

#[test]
fn test_arrival_lookup_after_eviction() {
    let config = IntersectionConfig::default();
    let rules = admission(&config);
    let scheduler = SignalScheduler::new(SignalTiming::default(), [0; 4]);
    let motion_rules = motion(&config, Direction::East);
    let exit = config.approach(Direction::East).exit;
    let mut lane = lane_for(&config, Direction::East, 1);

    lane.admit(VehicleId(0), VehicleClass::Bike, &profile(&config, VehicleClass::Bike), &rules);
    for _ in 0..2000 {
        lane.advance(&scheduler, &motion_rules);
        lane.evict_departed(exit);
        if lane.is_empty() {
            break;
        }
    }
    assert!(lane.is_empty(), "bike should have left the canvas");

    lane.admit(VehicleId(1), VehicleClass::Car, &profile(&config, VehicleClass::Car), &rules);
    lane.admit(VehicleId(2), VehicleClass::Bus, &profile(&config, VehicleClass::Bus), &rules);

    assert_eq!(lane.arrivals(), 3);
    assert_eq!(lane.len(), 2);
    assert!(lane.get(0).is_none(), "evicted arrival is gone");
    assert_eq!(lane.get(1).map(|v| v.id), Some(VehicleId(1)));
    assert_eq!(lane.ahead_of(2).map(|v| v.id), Some(VehicleId(1)));
    assert!(lane.ahead_of(1).is_none(), "predecessor was evicted");
    assert!(lane.ahead_of(0).is_none());
    assert!(lane.get(3).is_none());
}

#[test]
fn test_arrival_after_crossing_uses_default_stop() {
    let config = IntersectionConfig::default();
    let rules = admission(&config);
    let scheduler = SignalScheduler::new(SignalTiming::default(), [0; 4]);
    let motion_rules = motion(&config, Direction::East);
    let mut lane = lane_for(&config, Direction::East, 0);

    lane.admit(VehicleId(0), VehicleClass::Car, &profile(&config, VehicleClass::Car), &rules);
    while lane.crossed() == 0 {
        lane.advance(&scheduler, &motion_rules);
    }

    let stop_bound = lane
        .admit(VehicleId(1), VehicleClass::Car, &profile(&config, VehicleClass::Car), &rules)
        .stop_bound;
    assert_eq!(stop_bound, 580.0, "a crossed predecessor does not hold the queue");
}
