//! Drive base configuration.
//!
//! Every wiring and geometry parameter the core needs, passed explicitly at
//! construction.  Defaults come from [`crate::channels`]; a robot with
//! different wiring loads a JSON override (see [`DriveConfig::from_json`]).

use core::f32::consts::PI;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::channels;
use crate::drivers::motor_group::MAX_FOLLOWERS;
use crate::drivers::shifter::Gear;
use crate::error::{Error, Result};
use crate::sensors::Polarity;

/// Core drive base configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriveConfig {
    // --- Motors ---
    /// Left primary controller channel.
    pub left_motor: u8,
    /// Left follower channels.
    pub left_followers: heapless::Vec<u8, MAX_FOLLOWERS>,
    /// Invert the left group's output.
    pub left_inverted: bool,
    /// Right primary controller channel.
    pub right_motor: u8,
    /// Right follower channels.
    pub right_followers: heapless::Vec<u8, MAX_FOLLOWERS>,
    /// Invert the right group's output.
    pub right_inverted: bool,

    // --- Shifting ---
    /// Pneumatics module hosting both shifter solenoids.
    pub pcm_id: u8,
    pub left_shifter: SolenoidChannels,
    pub right_shifter: SolenoidChannels,
    /// Gear driven onto the solenoids at construction.
    pub initial_gear: Gear,

    // --- Encoders ---
    /// Primary encoder; also the velocity source.
    pub left_encoder: EncoderConfig,
    /// Redundant encoder.  `None` degrades distance to single-channel.
    pub right_encoder: Option<EncoderConfig>,
    /// Polarity applied after averaging so that forward reads positive
    /// in the group's convention.
    pub forward_polarity: Polarity,
    /// Wheel revolutions per encoder revolution.
    pub gear_ratio: f32,
    /// Wheel diameter in inches.
    pub wheel_diameter: f32,

    // --- Heading ---
    pub imu_port: u8,

    // --- Power ---
    /// Peak output ceiling (volts) in high-power mode.
    pub nominal_peak_voltage: f32,
    /// Peak output ceiling (volts) in reduced-power mode.
    pub reduced_peak_voltage: f32,

    // --- Timing ---
    /// Period of the external control cycle (milliseconds).
    pub control_period_ms: u32,
}

/// A quadrature encoder's wiring and calibration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EncoderConfig {
    pub channel_a: u8,
    pub channel_b: u8,
    pub polarity: Polarity,
    /// Ticks counted per encoder shaft revolution.
    pub ticks_per_revolution: f32,
}

/// Forward/reverse channels of a double solenoid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolenoidChannels {
    /// Energised for high gear.
    pub forward: u8,
    /// Energised for low gear.
    pub reverse: u8,
}

impl Default for DriveConfig {
    fn default() -> Self {
        Self {
            left_motor: channels::DRIVE_LEFT,
            left_followers: channels::DRIVE_LEFT_FOLLOWERS.iter().copied().collect(),
            left_inverted: false,
            right_motor: channels::DRIVE_RIGHT,
            right_followers: channels::DRIVE_RIGHT_FOLLOWERS.iter().copied().collect(),
            right_inverted: false,

            pcm_id: channels::PCM_ID,
            left_shifter: SolenoidChannels {
                forward: channels::LEFT_SHIFTER.0,
                reverse: channels::LEFT_SHIFTER.1,
            },
            right_shifter: SolenoidChannels {
                forward: channels::RIGHT_SHIFTER.0,
                reverse: channels::RIGHT_SHIFTER.1,
            },
            initial_gear: Gear::Low,

            left_encoder: EncoderConfig {
                channel_a: channels::ENCODER_LEFT.0,
                channel_b: channels::ENCODER_LEFT.1,
                polarity: Polarity::Normal,
                ticks_per_revolution: 360.0,
            },
            right_encoder: Some(EncoderConfig {
                channel_a: channels::ENCODER_RIGHT.0,
                channel_b: channels::ENCODER_RIGHT.1,
                polarity: Polarity::Normal,
                ticks_per_revolution: 360.0,
            }),
            forward_polarity: Polarity::Inverted,
            gear_ratio: 1.0,
            wheel_diameter: 4.0,

            imu_port: channels::IMU_PORT,

            nominal_peak_voltage: 12.0,
            reduced_peak_voltage: 6.0,

            control_period_ms: 20, // 50 Hz
        }
    }
}

impl DriveConfig {
    /// Parse a JSON override.  Missing fields fall back to the defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json).map_err(|e| {
            warn!("Rejected drive config JSON: {}", e);
            Error::Config("malformed JSON")
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Distance travelled per encoder revolution, in wheel-diameter units.
    pub fn distance_per_revolution(&self) -> f32 {
        self.gear_ratio * PI * self.wheel_diameter
    }

    /// Check every field's range and cross-field invariants.
    pub fn validate(&self) -> Result<()> {
        if !positive(self.left_encoder.ticks_per_revolution) {
            return Err(Error::Config("left encoder ticks_per_revolution must be > 0"));
        }
        if let Some(right) = &self.right_encoder {
            if !positive(right.ticks_per_revolution) {
                return Err(Error::Config("right encoder ticks_per_revolution must be > 0"));
            }
        }
        if !positive(self.gear_ratio) {
            return Err(Error::Config("gear_ratio must be > 0"));
        }
        if !positive(self.wheel_diameter) {
            return Err(Error::Config("wheel_diameter must be > 0"));
        }
        if !positive(self.nominal_peak_voltage) || !positive(self.reduced_peak_voltage) {
            return Err(Error::Config("peak voltages must be > 0"));
        }
        if self.reduced_peak_voltage > self.nominal_peak_voltage {
            return Err(Error::Config("reduced_peak_voltage exceeds nominal_peak_voltage"));
        }
        if self.control_period_ms == 0 {
            return Err(Error::Config("control_period_ms must be > 0"));
        }
        for shifter in [&self.left_shifter, &self.right_shifter] {
            if shifter.forward == shifter.reverse {
                return Err(Error::Config("solenoid forward and reverse channels must differ"));
            }
        }

        let mut motors: heapless::Vec<u8, { 2 * (MAX_FOLLOWERS + 1) }> = heapless::Vec::new();
        let all = [self.left_motor, self.right_motor]
            .into_iter()
            .chain(self.left_followers.iter().copied())
            .chain(self.right_followers.iter().copied());
        for channel in all {
            if motors.contains(&channel) {
                return Err(Error::Config("motor channel assigned twice"));
            }
            motors
                .push(channel)
                .map_err(|_| Error::Config("too many motor channels"))?;
        }
        Ok(())
    }
}

fn positive(value: f32) -> bool {
    value.is_finite() && value > 0.0
}
