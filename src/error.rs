//! Unified error types for the drivetrain core.
//!
//! A single `Error` enum that every subsystem converts into, keeping the
//! caller's handling uniform.  All variants are `Copy` so they can be passed
//! around the control cycle without allocation.
//!
//! Two conditions are deliberately *not* errors:
//! - an out-of-range speed command is clamped where it is applied;
//! - an unready heading sensor is reported through
//!   [`HeadingTracker::is_ready`](crate::sensors::heading::HeadingTracker::is_ready).

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

/// Every fallible operation in the crate funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A device channel could not be bound at construction.  Fatal.
    DeviceUnavailable(DeviceKind, u8),
    /// An actuator command failed.
    Actuator(ActuatorError),
    /// Configuration is invalid.
    Config(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DeviceUnavailable(kind, channel) => {
                write!(f, "device unavailable: {kind} on channel {channel}")
            }
            Self::Actuator(e) => write!(f, "actuator: {e}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
        }
    }
}

impl core::error::Error for Error {}

// ---------------------------------------------------------------------------
// Device kinds
// ---------------------------------------------------------------------------

/// Which kind of endpoint failed to bind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceKind {
    Motor,
    Encoder,
    HeadingSensor,
    Solenoid,
}

impl fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Motor => write!(f, "motor controller"),
            Self::Encoder => write!(f, "encoder"),
            Self::HeadingSensor => write!(f, "heading sensor"),
            Self::Solenoid => write!(f, "solenoid"),
        }
    }
}

// ---------------------------------------------------------------------------
// Actuator errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActuatorError {
    /// A shifter solenoid pin could not be driven.
    SolenoidWriteFailed,
}

impl fmt::Display for ActuatorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SolenoidWriteFailed => write!(f, "solenoid write failed"),
        }
    }
}

impl From<ActuatorError> for Error {
    fn from(e: ActuatorError) -> Self {
        Self::Actuator(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Crate-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
