//! Port traits: the boundary between drivetrain logic and the devices.
//!
//! ```text
//!   Device driver ──▶ Port trait ──▶ DriveBase (domain)
//! ```
//!
//! Motor controllers, encoders and the inertial sensor are opaque endpoints
//! with known physical semantics.  The [`DriveBase`](super::drivebase::DriveBase)
//! consumes them via generics, so test doubles substitute for hardware.
//! Solenoid pins use `embedded_hal::digital::OutputPin` directly.

use embedded_hal::digital::OutputPin;

use crate::error::Result;

use super::telemetry::DriveTelemetry;

// ───────────────────────────────────────────────────────────────
// Motor output (domain → hardware)
// ───────────────────────────────────────────────────────────────

/// A smart motor controller on the CAN bus.
pub trait MotorOutput {
    /// Channel this controller answers on.
    fn channel(&self) -> u8;

    /// Command a normalised output in [-1, 1].
    fn set_output(&mut self, value: f32);

    /// Slave this controller to `leader`; it mirrors the leader's output
    /// from then on without further commands.
    fn follow(&mut self, leader: u8);

    /// Bound the achievable output to ±`volts`.
    fn set_peak_voltage(&mut self, volts: f32);
}

// ───────────────────────────────────────────────────────────────
// Encoder (hardware → domain)
// ───────────────────────────────────────────────────────────────

/// A quadrature encoder counter.
pub trait QuadratureEncoder {
    /// Accumulated ticks since the last reset.
    fn raw_position(&self) -> i32;

    /// Instantaneous rate in ticks per second.
    fn raw_velocity(&self) -> f32;

    /// Zero the position counter.
    fn reset(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Heading sensor (hardware → domain)
// ───────────────────────────────────────────────────────────────

/// An inertial yaw sensor.
pub trait HeadingSensor {
    /// Raw yaw in degrees.
    fn yaw(&self) -> f32;

    /// Turn rate in degrees per second.
    fn rate(&self) -> f32;

    fn is_connected(&self) -> bool;

    /// True while the sensor is running its own startup calibration.
    fn is_calibrating(&self) -> bool;
}

// ───────────────────────────────────────────────────────────────
// Device binder (construction-time hardware description)
// ───────────────────────────────────────────────────────────────

/// Binds channel IDs from [`DriveConfig`](crate::config::DriveConfig) to
/// device endpoints.
///
/// Each call either returns a live endpoint or
/// [`Error::DeviceUnavailable`](crate::error::Error::DeviceUnavailable).
/// Binding happens once; the drive base owns what it receives.
pub trait DeviceBinder {
    type Motor: MotorOutput;
    type Encoder: QuadratureEncoder;
    type Heading: HeadingSensor;
    type Pin: OutputPin;

    fn motor(&mut self, channel: u8) -> Result<Self::Motor>;

    fn encoder(&mut self, channel_a: u8, channel_b: u8) -> Result<Self::Encoder>;

    fn heading_sensor(&mut self, port: u8) -> Result<Self::Heading>;

    fn solenoid_pin(&mut self, module: u8, channel: u8) -> Result<Self::Pin>;
}

// ───────────────────────────────────────────────────────────────
// Telemetry sink (domain → logging / dashboards)
// ───────────────────────────────────────────────────────────────

/// Adapters decide where telemetry snapshots go (log, dashboard, file).
pub trait TelemetrySink {
    fn publish(&mut self, telemetry: &DriveTelemetry);
}
