use std::time::Duration;

use maze_mapper_core::{
    hardware::{
        AmbientLightSensor, Clock, Indicators, LineSensors, Locomotion, ProximitySensors, Telemetry,
    },
    CellCoord, Compass, LineChannel, ProximitySensor, WallState, START_CELL,
};
use maze_mapper_simulation::{Arena, SimulatedRobot, SimulationOptions, TelemetryFrame};

fn robot(arena: Arena) -> SimulatedRobot {
    SimulatedRobot::new(arena, SimulationOptions::default())
}

fn cruise(robot: &mut SimulatedRobot) -> u16 {
    robot.set_drive_speeds(30, 25);
    robot.read_line(LineChannel::Left)
}

#[test]
fn driving_across_a_boundary_passes_two_stripes() {
    let mut robot = robot(Arena::open());

    let trace: Vec<u16> = (0..30).map(|_| cruise(&mut robot)).collect();
    let rising_edges = trace
        .windows(2)
        .filter(|pair| pair[0] < 150 && pair[1] > 150)
        .count();

    assert_eq!(rising_edges, 2);
    assert_eq!(robot.cell(), CellCoord::new(3, 0));
    assert_eq!(robot.heading(), Compass::North);
}

#[test]
fn motion_stops_short_of_walls() {
    let mut robot = robot(Arena::open());
    robot.turn_right(93);
    assert_eq!(robot.heading(), Compass::East);

    for _ in 0..40 {
        robot.set_drive_speeds(30, 25);
    }

    assert_eq!(robot.cell(), START_CELL);
    assert_eq!(robot.offset_mm(), 80);
    assert!(robot.read_proximity(ProximitySensor::Front) > 300);

    robot.move_backward(10);
    assert_eq!(robot.offset_mm(), 70);
    assert_eq!(robot.read_proximity(ProximitySensor::Front), 250);
}

#[test]
fn forward_moves_cross_open_boundaries() {
    let mut robot = robot(Arena::open());

    robot.move_forward(150);

    assert_eq!(robot.cell(), CellCoord::new(3, 0));
    assert_eq!(robot.offset_mm(), -50);
}

#[test]
fn turns_snap_to_quarters_and_nudges_are_ignored() {
    let mut robot = robot(Arena::open());
    robot.move_forward(30);

    robot.turn_left(5);
    assert_eq!(robot.heading(), Compass::North);
    assert_eq!(robot.offset_mm(), 30);

    robot.turn_left(93);
    assert_eq!(robot.heading(), Compass::West);
    assert_eq!(robot.offset_mm(), 0);

    robot.turn_right(192);
    assert_eq!(robot.heading(), Compass::East);
}

#[test]
fn proximity_follows_heading() {
    let mut robot = robot(Arena::open());
    let threshold = 100;
    let state = |robot: &mut SimulatedRobot, sensor| {
        WallState::classify(robot.read_proximity(sensor), threshold)
    };

    // Start cell (2, 0) only has the east perimeter wall.
    assert_eq!(state(&mut robot, ProximitySensor::Right), WallState::Blocked);
    assert_eq!(state(&mut robot, ProximitySensor::Left), WallState::Open);
    assert_eq!(state(&mut robot, ProximitySensor::Front), WallState::Open);

    robot.turn_right(192);
    assert_eq!(state(&mut robot, ProximitySensor::Left), WallState::Blocked);
    assert_eq!(state(&mut robot, ProximitySensor::Right), WallState::Open);
    assert_eq!(robot.read_proximity(ProximitySensor::FrontLeft), 20);
}

#[test]
fn interior_walls_read_as_blocked() {
    let arena = Arena::from_toml_str(
        r#"
            [[walls]]
            cell = { x = 2, y = 0 }
            side = "west"
        "#,
    )
    .expect("valid arena");
    let mut robot = robot(arena);

    assert_eq!(robot.read_proximity(ProximitySensor::Left), 250);
}

#[test]
fn ambient_light_reflects_dark_cells() {
    let arena = Arena::from_toml_str("dark_cells = [{ x = 3, y = 0 }]").expect("valid arena");
    let mut robot = robot(arena);

    assert!(robot.read_ambient_light() > 450);
    robot.move_forward(200);
    assert!(robot.read_ambient_light() < 450);
}

#[test]
fn link_connects_after_configured_polls() {
    let options = SimulationOptions {
        link_delay_polls: 2,
        ..SimulationOptions::default()
    };
    let mut robot = SimulatedRobot::new(Arena::open(), options);

    assert!(!robot.is_link_connected());
    assert!(!robot.is_link_connected());
    assert!(robot.is_link_connected());
    assert!(robot.is_link_connected());
}

#[test]
fn indicators_and_telemetry_are_recorded() {
    let mut robot = robot(Arena::open());

    for index in 0..robot.indicator_count() {
        robot.set_indicator(index, true);
    }
    robot.set_indicator(0, true);
    robot.set_indicator(42, true);
    assert_eq!(robot.lit_indicators(), 8);
    assert_eq!(robot.indicator_activations(), 8);

    robot.send_text("lines ");
    robot.send_number(3);
    assert_eq!(
        robot.telemetry(),
        &[
            TelemetryFrame::Text("lines ".to_owned()),
            TelemetryFrame::Number(3)
        ]
    );
    assert_eq!(robot.transcript(), "lines 3");
}

#[test]
fn elapsed_time_counts_periods_and_pauses() {
    let mut robot = robot(Arena::open());

    robot.set_drive_speeds(0, 0);
    robot.pause(Duration::from_millis(350));

    assert_eq!(robot.control_periods(), 1);
    assert_eq!(robot.elapsed(), Duration::from_millis(360));
    assert_eq!(robot.offset_mm(), 0);
}

#[test]
fn noisy_readings_stay_on_the_same_side_of_default_thresholds() {
    let arena = Arena::from_toml_str("dark_cells = [{ x = 2, y = 0 }]").expect("valid arena");
    let options = SimulationOptions {
        seed: 7,
        noise: true,
        ..SimulationOptions::default()
    };
    let mut robot = SimulatedRobot::new(arena, options);

    for _ in 0..500 {
        assert!(robot.read_proximity(ProximitySensor::Right) >= 100);
        assert!(robot.read_proximity(ProximitySensor::Left) < 100);
        assert!(robot.read_proximity(ProximitySensor::FrontRight) <= 200);
        assert!(robot.read_line(LineChannel::Right) < 10);
        assert!(robot.read_ambient_light() < 450);
    }
}

#[test]
fn identical_seeds_replay_identically() {
    let options = SimulationOptions {
        seed: 11,
        noise: true,
        ..SimulationOptions::default()
    };
    let mut first = SimulatedRobot::new(Arena::open(), options);
    let mut second = SimulatedRobot::new(Arena::open(), options);

    let sample = |robot: &mut SimulatedRobot| -> Vec<u16> {
        (0..50)
            .map(|_| robot.read_proximity(ProximitySensor::Rear))
            .collect()
    };

    assert_eq!(sample(&mut first), sample(&mut second));
}
