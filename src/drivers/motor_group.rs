//! Motor group: one primary controller plus mechanically-ganged followers.
//!
//! Followers are slaved to the primary once at construction, so each cycle
//! only the primary is commanded.  The peak-voltage ceiling is pushed to
//! every controller in the group because followers clip independently.

use log::{trace, warn};

use crate::app::ports::MotorOutput;
use crate::error::{Error, Result};

/// Maximum followers per group (three-CIM gearbox plus one spare).
pub const MAX_FOLLOWERS: usize = 4;

pub struct MotorGroup<M> {
    primary: M,
    followers: heapless::Vec<M, MAX_FOLLOWERS>,
    inverted: bool,
    peak_voltage: f32,
    speed: f32,
}

impl<M: MotorOutput> MotorGroup<M> {
    /// Build the group and issue each follower its single follow directive.
    pub fn new(
        primary: M,
        followers: impl IntoIterator<Item = M>,
        inverted: bool,
        peak_voltage: f32,
    ) -> Result<Self> {
        let mut bound: heapless::Vec<M, MAX_FOLLOWERS> = heapless::Vec::new();
        for follower in followers {
            bound
                .push(follower)
                .map_err(|_| Error::Config("too many followers in motor group"))?;
        }
        let leader = primary.channel();
        for follower in &mut bound {
            follower.follow(leader);
        }

        let mut group = Self {
            primary,
            followers: bound,
            inverted,
            peak_voltage,
            speed: 0.0,
        };
        group.apply_peak_voltage();
        group.primary.set_output(0.0);
        Ok(group)
    }

    /// Command the group.  Out-of-range values are clamped; NaN stops it.
    pub fn set_speed(&mut self, value: f32) {
        let speed = if value.is_nan() {
            warn!("NaN speed on group {}, stopping", self.primary.channel());
            0.0
        } else {
            value.clamp(-1.0, 1.0)
        };
        if speed != value && !value.is_nan() {
            trace!("Clamped speed {} -> {}", value, speed);
        }

        self.speed = speed;
        let output = if self.inverted { -speed } else { speed };
        self.primary.set_output(output);
    }

    pub fn stop(&mut self) {
        self.set_speed(0.0);
    }

    /// Rescale the output envelope to ±`volts` without touching the
    /// commanded speed.
    pub fn set_peak_voltage(&mut self, volts: f32) {
        if !volts.is_finite() || volts <= 0.0 {
            warn!(
                "Ignoring peak voltage {} on group {} (keeping {})",
                volts,
                self.primary.channel(),
                self.peak_voltage
            );
            return;
        }
        self.peak_voltage = volts;
        self.apply_peak_voltage();
    }

    fn apply_peak_voltage(&mut self) {
        let volts = self.peak_voltage;
        self.primary.set_peak_voltage(volts);
        for follower in &mut self.followers {
            follower.set_peak_voltage(volts);
        }
    }

    /// Last commanded speed, after clamping and before inversion.
    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn peak_voltage(&self) -> f32 {
        self.peak_voltage
    }

    pub fn is_inverted(&self) -> bool {
        self.inverted
    }

    pub fn primary(&self) -> &M {
        &self.primary
    }

    pub fn followers(&self) -> &[M] {
        &self.followers
    }
}
