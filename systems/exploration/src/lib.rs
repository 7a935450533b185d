#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Control loop that explores the arena until every cell is mapped.
//!
//! The [`Explorer`] owns the world and every system. Each tick it drives the
//! motors, feeds the line sensors to the crossing detector and, on a crossing,
//! runs the scan, nesting, telemetry and steering steps before applying drift
//! correction and checking coverage. Systems stay pure: they emit commands the
//! explorer applies to the world, and the explorer performs the physical
//! manoeuvre matching each decision.

use maze_mapper_core::{
    hardware::{MapDisplay, Robot},
    Command, Compass, ControllerConfig, Event, LineChannel, ProximitySensor, Turn, WallState,
    GRID_SIDE,
};
use maze_mapper_system_coverage::Coverage;
use maze_mapper_system_line_crossing::{LineCrossingDetector, LineSample};
use maze_mapper_system_navigation::{
    DriftAction, DriftCorrection, DriftReadings, FrontalProximity, Guidance, Navigator,
};
use maze_mapper_system_nesting::NestingAreaDetector;
use maze_mapper_system_wall_scan::WallScanner;
use maze_mapper_world::{self as world, query, World};
use tracing::{debug, info, warn};

/// Lifecycle of the control loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Driving and mapping.
    Exploring,
    /// Every cell is mapped; terminal.
    Done,
}

/// Summary of a run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExplorationReport {
    /// Control ticks executed.
    pub ticks: u64,
    /// Grid lines crossed.
    pub lines_crossed: u32,
    /// Distinct nesting areas found.
    pub nesting_area_count: u32,
    /// Cells visited at least once.
    pub visited: usize,
    /// Steering decisions taken from the frontier field.
    pub frontier_decisions: u32,
}

/// Autonomous mapping controller.
#[derive(Debug)]
pub struct Explorer {
    config: ControllerConfig,
    world: World,
    detector: LineCrossingDetector,
    scanner: WallScanner,
    nesting: NestingAreaDetector,
    navigator: Navigator,
    drift: DriftCorrection,
    phase: Phase,
    ticks: u64,
    frontier_decisions: u32,
    commands: Vec<Command>,
    events: Vec<Event>,
}

impl Explorer {
    /// Creates an explorer at the start pose with an empty map.
    #[must_use]
    pub fn new(config: ControllerConfig) -> Self {
        Self {
            world: World::new(),
            detector: LineCrossingDetector::from_config(&config),
            scanner: WallScanner::from_config(&config),
            nesting: NestingAreaDetector::from_config(&config),
            navigator: Navigator::from_config(&config),
            drift: DriftCorrection::from_config(&config),
            phase: Phase::Exploring,
            ticks: 0,
            frontier_decisions: 0,
            commands: Vec::new(),
            events: Vec::new(),
            config,
        }
    }

    /// Authoritative world state.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Current lifecycle phase.
    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// Control ticks executed so far.
    #[must_use]
    pub const fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Summary of the run so far.
    #[must_use]
    pub fn report(&self) -> ExplorationReport {
        ExplorationReport {
            ticks: self.ticks,
            lines_crossed: query::lines_crossed(&self.world),
            nesting_area_count: query::nesting_area_count(&self.world),
            visited: Coverage::measure(&query::grid_view(&self.world)).visited(),
            frontier_decisions: self.frontier_decisions,
        }
    }

    /// Blocks until the telemetry link is up, then announces the connection.
    ///
    /// There is no timeout; a link that never connects stalls the caller.
    pub fn connect<R: Robot>(&mut self, robot: &mut R) {
        let mut polls: u64 = 0;
        while !robot.is_link_connected() {
            polls = polls.saturating_add(1);
        }
        info!(polls, "telemetry link connected");
        robot.send_text("connected!\n");
        robot.pause(self.config.link_settle());
    }

    /// Draws the empty grid before exploration starts.
    pub fn begin<D: MapDisplay>(&mut self, display: &mut D) {
        display.draw_grid_outline(GRID_SIDE);
    }

    /// Connects, draws the outline and ticks until every cell is mapped.
    pub fn run<R: Robot, D: MapDisplay>(
        &mut self,
        robot: &mut R,
        display: &mut D,
    ) -> ExplorationReport {
        self.connect(robot);
        self.begin(display);
        while self.tick(robot, display) == Phase::Exploring {}
        self.report()
    }

    /// Executes one control period.
    pub fn tick<R: Robot, D: MapDisplay>(&mut self, robot: &mut R, display: &mut D) -> Phase {
        if self.phase == Phase::Done {
            return self.phase;
        }
        self.ticks = self.ticks.saturating_add(1);

        robot.set_drive_speeds(self.config.left_speed, self.config.right_speed);
        let sample = LineSample::new(
            robot.read_line(LineChannel::Left),
            robot.read_line(LineChannel::Right),
        );

        if self.detector.handle(sample, &mut self.commands) {
            self.handle_crossing(robot);
        }

        self.correct_drift(robot);

        if Coverage::measure(&query::grid_view(&self.world)).is_complete() {
            self.finish(robot, display);
        }

        self.phase
    }

    fn handle_crossing<R: Robot>(&mut self, robot: &mut R) {
        self.events.clear();
        self.flush();
        robot.move_forward(self.config.cell_distance_mm);

        let pose = query::pose(&self.world);
        let lines = query::lines_crossed(&self.world);
        let advanced = self
            .events
            .iter()
            .any(|event| matches!(event, Event::PositionAdvanced { .. }));

        if advanced {
            debug!(
                lines,
                x = pose.cell.x(),
                y = pose.cell.y(),
                heading = ?pose.heading,
                "crossed into cell"
            );
            self.survey(robot);
            self.report_cell(robot);
        } else {
            warn!(
                lines,
                x = pose.cell.x(),
                y = pose.cell.y(),
                heading = ?pose.heading,
                "crossing would leave the arena; position unchanged"
            );
        }

        self.navigator.handle_events(&self.events);
        self.steer(robot);
    }

    fn survey<R: Robot>(&mut self, robot: &mut R) {
        robot.pause(self.config.settle_delay());

        let heading = query::pose(&self.world).heading;
        self.scanner
            .scan(heading, |sensor| robot.read_proximity(sensor), &mut self.commands);
        self.flush();

        let Some(cell) = query::current_cell(&self.world) else {
            return;
        };
        let light = robot.read_ambient_light();
        if self.nesting.handle(light, cell, &mut self.commands) {
            self.flush();
            let pose = query::pose(&self.world);
            info!(
                x = pose.cell.x(),
                y = pose.cell.y(),
                light,
                total = query::nesting_area_count(&self.world),
                "nesting area found"
            );
            self.flash_indicators(robot);
        }
    }

    fn flash_indicators<R: Robot>(&self, robot: &mut R) {
        let count = robot.indicator_count();
        for index in 0..count {
            robot.set_indicator(index, true);
        }
        robot.pause(self.config.indicator_hold());
        for index in 0..count {
            robot.set_indicator(index, false);
        }
    }

    fn report_cell<R: Robot>(&self, robot: &mut R) {
        let pose = query::pose(&self.world);
        let Some(cell) = query::current_cell(&self.world) else {
            return;
        };
        let walls: String = Compass::ALL
            .into_iter()
            .map(|side| match cell.walls().get(side) {
                WallState::Open => '-',
                WallState::Blocked => compass_initial(side),
            })
            .collect();

        robot.send_text("lines ");
        robot.send_number(i64::from(query::lines_crossed(&self.world)));
        robot.send_text(" heading ");
        robot.send_text(compass_label(pose.heading));
        robot.send_text(" x ");
        robot.send_number(i64::from(pose.cell.x()));
        robot.send_text(" y ");
        robot.send_number(i64::from(pose.cell.y()));
        robot.send_text(" walls ");
        robot.send_text(&walls);
        robot.send_text(" nesting ");
        robot.send_number(i64::from(cell.is_nesting_area()));
        robot.send_text("\n");
    }

    fn steer<R: Robot>(&mut self, robot: &mut R) {
        let readings = FrontalProximity {
            left: robot.read_proximity(ProximitySensor::Left),
            front: robot.read_proximity(ProximitySensor::Front),
            right: robot.read_proximity(ProximitySensor::Right),
        };
        let pose = query::pose(&self.world);
        let decision = self.navigator.handle(
            readings,
            pose,
            &query::grid_view(&self.world),
            &mut self.commands,
        );
        self.flush();

        if decision.guidance == Guidance::Frontier {
            if self.frontier_decisions == 0 || self.navigator.stalled_for() == self.config.stall_limit
            {
                info!(
                    stalled_for = self.navigator.stalled_for(),
                    "no new cells found; steering towards the frontier"
                );
            }
            self.frontier_decisions = self.frontier_decisions.saturating_add(1);
        }
        debug!(turn = ?decision.turn, guidance = ?decision.guidance, "steering");

        match decision.turn {
            Turn::Left => robot.turn_left(self.config.turn_degrees),
            Turn::Straight => {}
            Turn::Right => robot.turn_right(self.config.turn_degrees),
            Turn::Reverse => robot.turn_right(self.config.reversal_degrees),
        }
        robot.pause(self.config.post_turn_delay());
    }

    fn correct_drift<R: Robot>(&self, robot: &mut R) {
        let readings = DriftReadings {
            front_left: robot.read_proximity(ProximitySensor::FrontLeft),
            front_right: robot.read_proximity(ProximitySensor::FrontRight),
            front: robot.read_proximity(ProximitySensor::Front),
        };
        match self.drift.correct(readings) {
            Some(DriftAction::NudgeRight { degrees }) => robot.turn_right(degrees),
            Some(DriftAction::NudgeLeft { degrees }) => robot.turn_left(degrees),
            Some(DriftAction::BackOff { millimetres }) => robot.move_backward(millimetres),
            None => {}
        }
    }

    fn finish<R: Robot, D: MapDisplay>(&mut self, robot: &mut R, display: &mut D) {
        robot.set_drive_speeds(0, 0);
        for (coord, cell) in query::grid_view(&self.world).iter() {
            display.draw_cell_walls(coord, cell);
        }
        robot.pause(self.config.final_pause());
        self.phase = Phase::Done;

        let report = self.report();
        info!(
            ticks = report.ticks,
            lines = report.lines_crossed,
            nesting_areas = report.nesting_area_count,
            frontier_decisions = report.frontier_decisions,
            "every cell mapped"
        );
    }

    fn flush(&mut self) {
        for command in self.commands.drain(..) {
            world::apply(&mut self.world, command, &mut self.events);
        }
    }
}

impl Default for Explorer {
    fn default() -> Self {
        Self::new(ControllerConfig::default())
    }
}

fn compass_label(heading: Compass) -> &'static str {
    match heading {
        Compass::North => "north",
        Compass::East => "east",
        Compass::South => "south",
        Compass::West => "west",
    }
}

fn compass_initial(side: Compass) -> char {
    match side {
        Compass::North => 'N',
        Compass::East => 'E',
        Compass::South => 'S',
        Compass::West => 'W',
    }
}
