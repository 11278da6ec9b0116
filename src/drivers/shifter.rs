//! Two-speed gearbox shifter (one double solenoid per side).
//!
//! Forward channel energised = high gear, reverse = low gear.  Both sides
//! always shift together.  The shifter is modelled as instantaneous: the
//! reported gear only changes once every pin write for the new gear has
//! succeeded, and the physical settle time is not tracked.

use embedded_hal::digital::{Error as _, OutputPin};
use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::error::{ActuatorError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gear {
    High,
    Low,
}

/// A double-acting solenoid valve driven by two output pins.
pub struct DoubleSolenoid<P> {
    forward: P,
    reverse: P,
}

impl<P: OutputPin> DoubleSolenoid<P> {
    pub fn new(forward: P, reverse: P) -> Self {
        Self { forward, reverse }
    }

    /// Release the opposing coil, then energise the one for `gear`.
    pub fn set(&mut self, gear: Gear) -> Result<()> {
        let (release, energise) = match gear {
            Gear::High => (&mut self.reverse, &mut self.forward),
            Gear::Low => (&mut self.forward, &mut self.reverse),
        };
        release.set_low().map_err(|e| {
            warn!("Solenoid release failed: {:?}", e.kind());
            ActuatorError::SolenoidWriteFailed
        })?;
        energise.set_high().map_err(|e| {
            warn!("Solenoid energise failed: {:?}", e.kind());
            ActuatorError::SolenoidWriteFailed
        })?;
        Ok(())
    }
}

pub struct GearShifter<P> {
    left: DoubleSolenoid<P>,
    right: DoubleSolenoid<P>,
    gear: Gear,
    /// Set when a write failed part-way; forces the next request to
    /// re-drive the pins even if it names the current gear.
    needs_drive: bool,
}

impl<P: OutputPin> GearShifter<P> {
    /// Build the shifter and drive `initial` onto both solenoids.
    pub fn new(left: DoubleSolenoid<P>, right: DoubleSolenoid<P>, initial: Gear) -> Result<Self> {
        let mut shifter = Self {
            left,
            right,
            gear: initial,
            needs_drive: true,
        };
        shifter.shift_to(initial)?;
        Ok(shifter)
    }

    pub fn shift_high(&mut self) -> Result<()> {
        self.shift_to(Gear::High)
    }

    pub fn shift_low(&mut self) -> Result<()> {
        self.shift_to(Gear::Low)
    }

    /// Idempotent: a request for the current gear writes nothing.
    pub fn shift_to(&mut self, gear: Gear) -> Result<()> {
        if gear == self.gear && !self.needs_drive {
            return Ok(());
        }

        self.needs_drive = true;
        self.left.set(gear)?;
        self.right.set(gear)?;
        self.needs_drive = false;

        if gear != self.gear {
            info!("Shifted {:?} -> {:?}", self.gear, gear);
        }
        self.gear = gear;
        Ok(())
    }

    /// Last gear fully applied to both sides.
    pub fn gear(&self) -> Gear {
        self.gear
    }
}
