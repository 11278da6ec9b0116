//! Peak-power selection for the drive motors.
//!
//! Reduced power protects traction and the motors when the operator asks
//! for it.  The two ceilings are configuration; this module only selects
//! one and pushes it to every motor group.

use log::info;
use serde::{Deserialize, Serialize};

use crate::app::ports::MotorOutput;
use crate::drivers::motor_group::MotorGroup;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerMode {
    /// Nominal peak voltage.
    High,
    /// Reduced peak voltage.
    Reduced,
}

pub struct PowerLimiter {
    nominal_volts: f32,
    reduced_volts: f32,
    mode: PowerMode,
}

impl PowerLimiter {
    /// Starts in [`PowerMode::High`].
    pub fn new(nominal_volts: f32, reduced_volts: f32) -> Self {
        Self {
            nominal_volts,
            reduced_volts,
            mode: PowerMode::High,
        }
    }

    /// Select the ceiling and apply it to every group.  Returns the
    /// ceiling now in force.
    pub fn set_high_power<M: MotorOutput>(
        &mut self,
        enabled: bool,
        groups: &mut [&mut MotorGroup<M>],
    ) -> f32 {
        let mode = if enabled {
            PowerMode::High
        } else {
            PowerMode::Reduced
        };
        if mode != self.mode {
            info!("Power mode {:?} -> {:?}", self.mode, mode);
            self.mode = mode;
        }

        let ceiling = self.ceiling();
        for group in groups.iter_mut() {
            group.set_peak_voltage(ceiling);
        }
        ceiling
    }

    pub fn ceiling(&self) -> f32 {
        match self.mode {
            PowerMode::High => self.nominal_volts,
            PowerMode::Reduced => self.reduced_volts,
        }
    }

    pub fn mode(&self) -> PowerMode {
        self.mode
    }
}
