use maze_mapper_core::{CellWalls, Command, Compass, ProximitySensor, Turn, WallState};
use maze_mapper_system_wall_scan::{ScanSlot, WallScanner};
use maze_mapper_world::{self as world, query, World};

const CLEAR: u16 = 20;
const WALL: u16 = 250;

/// Front open, right blocked, rear open, left blocked.
fn alternating(sensor: ProximitySensor) -> u16 {
    match sensor {
        ProximitySensor::Front | ProximitySensor::Rear => CLEAR,
        _ => WALL,
    }
}

fn scan(heading: Compass, read: fn(ProximitySensor) -> u16) -> CellWalls {
    let mut scanner = WallScanner::default();
    let mut commands = Vec::new();
    scanner.scan(heading, read, &mut commands);
    match commands.as_slice() {
        [Command::RecordWalls { walls }] => *walls,
        other => panic!("expected a single wall record, got {other:?}"),
    }
}

#[test]
fn heading_east_maps_sensors_to_absolute_sides() {
    let walls = scan(Compass::East, alternating);

    assert_eq!(walls.get(Compass::East), WallState::Open);
    assert_eq!(walls.get(Compass::South), WallState::Blocked);
    assert_eq!(walls.get(Compass::West), WallState::Open);
    assert_eq!(walls.get(Compass::North), WallState::Blocked);
}

#[test]
fn only_the_front_sensor_blocked_at_every_heading() {
    fn front_only(sensor: ProximitySensor) -> u16 {
        if sensor == ProximitySensor::Front {
            WALL
        } else {
            CLEAR
        }
    }

    for heading in Compass::ALL {
        let walls = scan(heading, front_only);
        for side in Compass::ALL {
            let expected = if side == heading {
                WallState::Blocked
            } else {
                WallState::Open
            };
            assert_eq!(
                walls.get(side),
                expected,
                "heading {heading:?}, side {side:?}",
            );
        }
    }
}

#[test]
fn left_sensor_lands_counter_clockwise_of_heading_at_every_heading() {
    fn left_only(sensor: ProximitySensor) -> u16 {
        if sensor == ProximitySensor::Left {
            WALL
        } else {
            CLEAR
        }
    }

    let expectations = [
        (Compass::North, Compass::West),
        (Compass::East, Compass::North),
        (Compass::South, Compass::East),
        (Compass::West, Compass::South),
    ];
    for (heading, blocked_side) in expectations {
        let walls = scan(heading, left_only);
        let blocked: Vec<_> = Compass::ALL
            .into_iter()
            .filter(|side| walls.get(*side) == WallState::Blocked)
            .collect();
        assert_eq!(blocked, vec![blocked_side], "heading {heading:?}");
    }
}

#[test]
fn scan_samples_in_round_robin_order() {
    let mut scanner = WallScanner::default();
    let mut commands = Vec::new();
    let mut order = Vec::new();

    scanner.scan(
        Compass::North,
        |sensor| {
            order.push(sensor);
            CLEAR
        },
        &mut commands,
    );

    assert_eq!(
        order,
        vec![
            ProximitySensor::Front,
            ProximitySensor::Right,
            ProximitySensor::Rear,
            ProximitySensor::Left,
        ]
    );
    assert_eq!(scanner.cursor(), ScanSlot::Front);
}

#[test]
fn partial_rounds_resume_where_they_stopped() {
    let mut scanner = WallScanner::default();

    assert!(scanner.step(Compass::West, alternating).is_none());
    assert!(scanner.step(Compass::West, alternating).is_none());
    assert_eq!(scanner.cursor(), ScanSlot::Rear);

    let mut commands = Vec::new();
    let mut sampled = Vec::new();
    scanner.scan(
        Compass::West,
        |sensor| {
            sampled.push(sensor);
            alternating(sensor)
        },
        &mut commands,
    );

    assert_eq!(sampled, vec![ProximitySensor::Rear, ProximitySensor::Left]);
    let expected = CellWalls::new(
        WallState::Blocked,
        WallState::Open,
        WallState::Blocked,
        WallState::Open,
    );
    assert_eq!(commands, vec![Command::RecordWalls { walls: expected }]);
}

#[test]
fn heading_change_mid_round_restarts_the_round() {
    let mut scanner = WallScanner::default();
    assert!(scanner.step(Compass::North, alternating).is_none());
    assert!(scanner.step(Compass::North, alternating).is_none());

    let mut commands = Vec::new();
    let mut sampled = Vec::new();
    scanner.scan(
        Compass::East,
        |sensor| {
            sampled.push(sensor);
            alternating(sensor)
        },
        &mut commands,
    );

    assert_eq!(
        sampled,
        vec![
            ProximitySensor::Front,
            ProximitySensor::Right,
            ProximitySensor::Rear,
            ProximitySensor::Left,
        ]
    );
    assert_eq!(
        commands,
        vec![Command::RecordWalls {
            walls: scan(Compass::East, alternating),
        }]
    );
}

#[test]
fn recorded_scan_lands_in_the_current_cell() {
    let mut world = World::new();
    let mut events = Vec::new();
    world::apply(&mut world, Command::Turn { turn: Turn::Right }, &mut events);

    let mut scanner = WallScanner::default();
    let mut commands = Vec::new();
    scanner.scan(query::pose(&world).heading, alternating, &mut commands);
    for command in commands {
        world::apply(&mut world, command, &mut events);
    }

    let cell = query::current_cell(&world).expect("start cell inside arena");
    assert!(cell.is_visited());
    assert_eq!(cell.walls().get(Compass::East), WallState::Open);
    assert_eq!(cell.walls().get(Compass::North), WallState::Blocked);
}
