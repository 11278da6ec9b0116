//! Drivetrain control core for a two-speed tank drive.
//!
//! Turns motor controllers, shifter solenoids, drive encoders and an inertial
//! heading sensor into one motion interface: tank commands in, fused
//! distance/heading feedback out.  All device access goes through the port
//! traits in [`app::ports`], so everything here runs on a host for testing.

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod channels;
pub mod config;
pub mod control;
pub mod drivers;
pub mod error;
pub mod sensors;

pub use app::drivebase::DriveBase;
pub use error::{Error, Result};
