//! Actuator drivers: motor groups, the gear shifter, and power selection.

pub mod motor_group;
pub mod power;
pub mod shifter;
