use maze_mapper_core::{CellWalls, Command, Event};
use maze_mapper_system_nesting::NestingAreaDetector;
use maze_mapper_world::{self as world, query, World};

const DARK: u16 = 300;
const BRIGHT: u16 = 700;

fn mapped_world() -> World {
    let mut world = World::new();
    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::RecordWalls {
            walls: CellWalls::open(),
        },
        &mut events,
    );
    world
}

fn check(detector: &NestingAreaDetector, world: &mut World, light: u16) -> Vec<Event> {
    let mut commands = Vec::new();
    let cell = query::current_cell(world).expect("robot inside arena");
    let _ = detector.handle(light, cell, &mut commands);

    let mut events = Vec::new();
    for command in commands {
        world::apply(world, command, &mut events);
    }
    events
}

#[test]
fn dark_cell_is_counted_once_across_repeated_checks() {
    let detector = NestingAreaDetector::default();
    let mut world = mapped_world();

    let first = check(&detector, &mut world, DARK);
    let second = check(&detector, &mut world, DARK);

    assert_eq!(first.len(), 1);
    assert!(second.is_empty());
    assert_eq!(query::nesting_area_count(&world), 1);
    assert!(query::current_cell(&world).is_some_and(|cell| cell.is_nesting_area()));
}

#[test]
fn bright_cell_is_left_alone() {
    let detector = NestingAreaDetector::default();
    let mut world = mapped_world();

    assert!(check(&detector, &mut world, BRIGHT).is_empty());
    assert_eq!(query::nesting_area_count(&world), 0);
}

#[test]
fn threshold_is_exclusive() {
    let detector = NestingAreaDetector::new(450);

    assert!(detector.is_dark(449));
    assert!(!detector.is_dark(450));
}
