//! Outbound drivetrain telemetry.
//!
//! [`DriveBase::telemetry`](super::drivebase::DriveBase::telemetry) builds a
//! snapshot; a [`TelemetrySink`](super::ports::TelemetrySink) adapter
//! decides where it goes.

use serde::Serialize;

use crate::drivers::power::PowerMode;
use crate::drivers::shifter::Gear;

/// A point-in-time drivetrain snapshot suitable for logging or dashboards.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DriveTelemetry {
    pub left_speed: f32,
    pub right_speed: f32,
    pub gear: Gear,
    pub power_mode: PowerMode,
    /// Peak voltage ceiling currently applied to the motors.
    pub peak_voltage: f32,
    pub distance: f32,
    pub velocity: f32,
    /// Degrees since the last heading reset.
    pub angle: f32,
    pub angular_velocity: f32,
    pub angle_ready: bool,
}
