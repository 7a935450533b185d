//! Capability traits implemented by robot drivers.
//!
//! Every call blocks until the hardware finished the request and is assumed to
//! succeed; failures belong to the driver layer.

use std::time::Duration;

use crate::{Cell, CellCoord, LineChannel, ProximitySensor};

/// Infrared distance sensing. Readings grow as obstacles get closer.
pub trait ProximitySensors {
    /// Samples the provided sensor.
    fn read_proximity(&mut self, sensor: ProximitySensor) -> u16;
}

/// Floor line sensing. Readings grow with reflectivity.
pub trait LineSensors {
    /// Samples the provided line sensor channel.
    fn read_line(&mut self, channel: LineChannel) -> u16;
}

/// Ambient light sensing. Lower readings are darker.
pub trait AmbientLightSensor {
    /// Samples the ambient light level.
    fn read_ambient_light(&mut self) -> u16;
}

/// Differential drive primitives.
pub trait Locomotion {
    /// Sets continuous wheel speeds as signed percentages.
    fn set_drive_speeds(&mut self, left: i8, right: i8);
    /// Rotates counter-clockwise on the spot.
    fn turn_left(&mut self, degrees: u16);
    /// Rotates clockwise on the spot.
    fn turn_right(&mut self, degrees: u16);
    /// Drives forward by a fixed distance in millimetres.
    fn move_forward(&mut self, millimetres: u16);
    /// Drives backward by a fixed distance in millimetres.
    fn move_backward(&mut self, millimetres: u16);
}

/// Bank of discrete indicator lights.
pub trait Indicators {
    /// Number of addressable indicators.
    fn indicator_count(&self) -> u8;
    /// Switches a single indicator.
    fn set_indicator(&mut self, index: u8, on: bool);
}

/// Blocking delays.
pub trait Clock {
    /// Suspends the caller for the provided duration.
    fn pause(&mut self, duration: Duration);
}

/// One-way diagnostic channel without acknowledgement.
pub trait Telemetry {
    /// Sends a text fragment.
    fn send_text(&mut self, text: &str);
    /// Sends a number.
    fn send_number(&mut self, value: i64);
    /// Reports whether a receiver is connected.
    fn is_link_connected(&mut self) -> bool;
}

/// Surface that renders the discovered map.
pub trait MapDisplay {
    /// Draws the empty outline of a `side` x `side` grid.
    fn draw_grid_outline(&mut self, side: u32);
    /// Draws the walls and flags recorded for a single cell.
    fn draw_cell_walls(&mut self, coord: CellCoord, cell: Cell);
}

/// Complete set of robot capabilities consumed by the control loop.
pub trait Robot:
    ProximitySensors + LineSensors + AmbientLightSensor + Locomotion + Indicators + Clock + Telemetry
{
}

impl<T> Robot for T where
    T: ProximitySensors
        + LineSensors
        + AmbientLightSensor
        + Locomotion
        + Indicators
        + Clock
        + Telemetry
{
}
