//! Default device channel assignments for the competition drive base.
//!
//! Single source of truth for [`DriveConfig::default`](crate::config::DriveConfig).
//! A robot with different wiring overrides these through its config file
//! rather than editing this module.

// ---------------------------------------------------------------------------
// Motor controllers (CAN IDs)
// ---------------------------------------------------------------------------

/// Left primary controller; receives speed commands.
pub const DRIVE_LEFT: u8 = 1;
/// Left followers, slaved to [`DRIVE_LEFT`] at construction.
pub const DRIVE_LEFT_FOLLOWERS: [u8; 2] = [2, 3];

/// Right primary controller; receives speed commands.
pub const DRIVE_RIGHT: u8 = 4;
/// Right followers, slaved to [`DRIVE_RIGHT`] at construction.
pub const DRIVE_RIGHT_FOLLOWERS: [u8; 2] = [5, 6];

// ---------------------------------------------------------------------------
// Pneumatics
// ---------------------------------------------------------------------------

/// Pneumatics control module CAN ID.
pub const PCM_ID: u8 = 0;
/// Left shifter solenoid: forward (high gear) / reverse (low gear) channels.
pub const LEFT_SHIFTER: (u8, u8) = (0, 1);
/// Right shifter solenoid: forward (high gear) / reverse (low gear) channels.
pub const RIGHT_SHIFTER: (u8, u8) = (2, 3);

// ---------------------------------------------------------------------------
// Sensors
// ---------------------------------------------------------------------------

/// Left quadrature encoder A/B digital inputs.
pub const ENCODER_LEFT: (u8, u8) = (0, 1);
/// Right quadrature encoder A/B digital inputs.
pub const ENCODER_RIGHT: (u8, u8) = (2, 3);

/// Inertial measurement unit port (MXP SPI).
pub const IMU_PORT: u8 = 0;
