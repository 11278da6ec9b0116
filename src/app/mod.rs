//! Drivetrain core: the facade, its device ports, and telemetry.
//!
//! All interaction with hardware happens through the **port traits** in
//! [`ports`], keeping [`drivebase::DriveBase`] fully testable without real
//! devices.

pub mod drivebase;
pub mod ports;
pub mod telemetry;
