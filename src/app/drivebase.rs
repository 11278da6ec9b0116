//! Drive base facade: the object the rest of the robot manipulates.
//!
//! [`DriveBase`] owns both motor groups, the fused encoders, the heading
//! tracker, the shifter and the power limiter.  It is driven once per
//! control cycle by an external scheduler; nothing here blocks.
//!
//! ```text
//!  move_tank ──▶ ┌──────────────────────────────┐ ──▶ MotorOutput ×2 groups
//!  shift_*   ──▶ │           DriveBase          │ ──▶ OutputPin (solenoids)
//!  power     ──▶ │ groups · fusion · heading    │ ◀── QuadratureEncoder ×2
//!                └──────────────────────────────┘ ◀── HeadingSensor
//!                        │ distance_source / angle_source
//!                        ▼
//!                external closed-loop controller
//! ```
//!
//! Gear is the only state machine ({High, Low}, caller-driven).  Distance
//! and heading are derived from the sensors on every read.

use log::{debug, info};

use crate::config::{DriveConfig, EncoderConfig, SolenoidChannels};
use crate::control::source::MeasurementSource;
use crate::drivers::motor_group::{MAX_FOLLOWERS, MotorGroup};
use crate::drivers::power::{PowerLimiter, PowerMode};
use crate::drivers::shifter::{DoubleSolenoid, Gear, GearShifter};
use crate::error::{Error, Result};
use crate::sensors::encoders::{EncoderChannel, SensorFusion};
use crate::sensors::heading::HeadingTracker;

use super::ports::DeviceBinder;
use super::telemetry::DriveTelemetry;

pub struct DriveBase<D: DeviceBinder> {
    left: MotorGroup<D::Motor>,
    right: MotorGroup<D::Motor>,
    encoders: SensorFusion<D::Encoder>,
    heading: HeadingTracker<D::Heading>,
    shifter: GearShifter<D::Pin>,
    power: PowerLimiter,
}

impl<D: DeviceBinder> DriveBase<D> {
    /// Validate `config` and bind every device it names.
    ///
    /// Any binding failure is fatal and returned as
    /// [`Error::DeviceUnavailable`](crate::error::Error::DeviceUnavailable).
    pub fn new(config: &DriveConfig, devices: &mut D) -> Result<Self> {
        config.validate()?;

        let left = bind_group(
            devices,
            config.left_motor,
            &config.left_followers,
            config.left_inverted,
            config.nominal_peak_voltage,
        )?;
        let right = bind_group(
            devices,
            config.right_motor,
            &config.right_followers,
            config.right_inverted,
            config.nominal_peak_voltage,
        )?;

        let primary = bind_encoder(devices, &config.left_encoder)?;
        let secondary = config
            .right_encoder
            .as_ref()
            .map(|enc| bind_encoder(devices, enc))
            .transpose()?;
        let encoders = SensorFusion::new(
            primary,
            secondary,
            config.forward_polarity,
            config.distance_per_revolution(),
        );

        let heading = HeadingTracker::new(devices.heading_sensor(config.imu_port)?);

        let shifter = GearShifter::new(
            bind_solenoid(devices, config.pcm_id, config.left_shifter)?,
            bind_solenoid(devices, config.pcm_id, config.right_shifter)?,
            config.initial_gear,
        )?;

        let power = PowerLimiter::new(config.nominal_peak_voltage, config.reduced_peak_voltage);

        info!(
            "Drive base ready: {}+{} / {}+{} motors, {} encoder(s), gear {:?}",
            config.left_motor,
            config.left_followers.len(),
            config.right_motor,
            config.right_followers.len(),
            encoders.channel_count(),
            shifter.gear(),
        );

        Ok(Self {
            left,
            right,
            encoders,
            heading,
            shifter,
            power,
        })
    }

    // ── Actuation ─────────────────────────────────────────────

    /// Tank drive.  Speeds are clamped to [-1, 1].
    pub fn move_tank(&mut self, left: f32, right: f32) {
        self.left.set_speed(left);
        self.right.set_speed(right);
    }

    pub fn stop(&mut self) {
        self.left.stop();
        self.right.stop();
    }

    /// High gear.
    pub fn shift_up(&mut self) -> Result<()> {
        self.shifter.shift_high()
    }

    /// Low gear.
    pub fn shift_down(&mut self) -> Result<()> {
        self.shifter.shift_low()
    }

    /// Select nominal (`true`) or reduced (`false`) peak power.
    pub fn set_high_power(&mut self, enabled: bool) {
        self.power
            .set_high_power(enabled, &mut [&mut self.left, &mut self.right]);
    }

    // ── Distance ──────────────────────────────────────────────

    pub fn reset_distance(&mut self) {
        self.encoders.reset();
        debug!("Drive distance reset");
    }

    pub fn distance(&self) -> f32 {
        self.encoders.distance()
    }

    pub fn velocity(&self) -> f32 {
        self.encoders.velocity()
    }

    // ── Heading ───────────────────────────────────────────────

    pub fn reset_angle(&mut self) {
        self.heading.calibrate_zero();
    }

    /// Degrees since the last [`reset_angle`](Self::reset_angle).  Only
    /// trustworthy while [`is_angle_ready`](Self::is_angle_ready).
    pub fn angle(&self) -> f32 {
        self.heading.heading()
    }

    pub fn is_angle_ready(&self) -> bool {
        self.heading.is_ready()
    }

    pub fn angular_velocity(&self) -> f32 {
        self.heading.rate()
    }

    // ── Feedback sources ──────────────────────────────────────

    /// `(distance, velocity)` for a closed-loop controller.
    pub fn distance_source(&self) -> MeasurementSource<'_, Self> {
        MeasurementSource::new(self, Self::distance, Self::velocity)
    }

    /// `(angle, angular velocity)` for a closed-loop controller.
    pub fn angle_source(&self) -> MeasurementSource<'_, Self> {
        MeasurementSource::new(self, Self::angle, Self::angular_velocity)
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn gear(&self) -> Gear {
        self.shifter.gear()
    }

    pub fn power_mode(&self) -> PowerMode {
        self.power.mode()
    }

    /// Ceiling selected by the power limiter.
    pub fn peak_voltage(&self) -> f32 {
        self.power.ceiling()
    }

    pub fn left_speed(&self) -> f32 {
        self.left.speed()
    }

    pub fn right_speed(&self) -> f32 {
        self.right.speed()
    }

    pub fn left_group(&self) -> &MotorGroup<D::Motor> {
        &self.left
    }

    pub fn right_group(&self) -> &MotorGroup<D::Motor> {
        &self.right
    }

    pub fn encoders(&self) -> &SensorFusion<D::Encoder> {
        &self.encoders
    }

    pub fn heading_tracker(&self) -> &HeadingTracker<D::Heading> {
        &self.heading
    }

    /// Build a telemetry snapshot from the current state.
    pub fn telemetry(&self) -> DriveTelemetry {
        DriveTelemetry {
            left_speed: self.left.speed(),
            right_speed: self.right.speed(),
            gear: self.gear(),
            power_mode: self.power_mode(),
            peak_voltage: self.peak_voltage(),
            distance: self.distance(),
            velocity: self.velocity(),
            angle: self.angle(),
            angular_velocity: self.angular_velocity(),
            angle_ready: self.is_angle_ready(),
        }
    }
}

// ── Binding helpers ───────────────────────────────────────────

fn bind_group<D: DeviceBinder>(
    devices: &mut D,
    primary: u8,
    followers: &[u8],
    inverted: bool,
    peak_voltage: f32,
) -> Result<MotorGroup<D::Motor>> {
    let primary = devices.motor(primary)?;
    let mut bound = heapless::Vec::<D::Motor, MAX_FOLLOWERS>::new();
    for &channel in followers {
        bound
            .push(devices.motor(channel)?)
            .map_err(|_| Error::Config("too many followers in motor group"))?;
    }
    MotorGroup::new(primary, bound, inverted, peak_voltage)
}

fn bind_encoder<D: DeviceBinder>(
    devices: &mut D,
    config: &EncoderConfig,
) -> Result<EncoderChannel<D::Encoder>> {
    let encoder = devices.encoder(config.channel_a, config.channel_b)?;
    Ok(EncoderChannel::new(
        encoder,
        config.polarity,
        config.ticks_per_revolution,
    ))
}

fn bind_solenoid<D: DeviceBinder>(
    devices: &mut D,
    module: u8,
    channels: SolenoidChannels,
) -> Result<DoubleSolenoid<D::Pin>> {
    let forward = devices.solenoid_pin(module, channels.forward)?;
    let reverse = devices.solenoid_pin(module, channels.reverse)?;
    Ok(DoubleSolenoid::new(forward, reverse))
}
