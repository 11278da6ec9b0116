//! Simulated device bus for running the drive base on a host.
//!
//! [`SimBus`] implements [`DeviceBinder`] over an in-memory world: motor
//! controllers record outputs, followers and ceilings; solenoid pins record
//! levels; encoders are [`EdgeCounter`]s fed with edges by [`SimBus::step`];
//! the IMU integrates the wheel speed difference and reports itself as
//! calibrating for the first few steps.
//!
//! The physics is first-order: wheel speed is proportional to
//! output, scaled by the peak-voltage ceiling and the selected gear.

use core::convert::Infallible;
use core::f32::consts::PI;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use embedded_hal::digital::{ErrorType, OutputPin};

use crate::app::ports::{DeviceBinder, HeadingSensor, MotorOutput, QuadratureEncoder};
use crate::config::{DriveConfig, EncoderConfig};
use crate::error::{DeviceKind, Error, Result};
use crate::sensors::Polarity;
use crate::sensors::edge_counter::{Direction, EdgeCounter};

/// Highest addressable CAN ID.
pub const MAX_CAN_ID: u8 = 62;
/// Highest digital I/O channel on the controller.
pub const MAX_DIO_CHANNEL: u8 = 25;
/// Highest solenoid channel on a pneumatics module.
pub const MAX_PCM_CHANNEL: u8 = 7;

const NOMINAL_BATTERY_VOLTS: f32 = 12.0;
const FREE_SPEED_HIGH_IN_PER_S: f32 = 180.0;
const FREE_SPEED_LOW_IN_PER_S: f32 = 72.0;
const TRACK_WIDTH_IN: f32 = 24.0;
const IMU_CALIBRATION_STEPS: u32 = 5;

#[derive(Default)]
struct World {
    outputs: HashMap<u8, f32>,
    leaders: HashMap<u8, u8>,
    peaks: HashMap<u8, f32>,
    pins: HashMap<(u8, u8), bool>,
    yaw: f32,
    yaw_rate: f32,
    steps: u32,
}

impl World {
    /// Output a controller is actually producing, following its leader.
    fn output_of(&self, channel: u8) -> f32 {
        let source = self.leaders.get(&channel).copied().unwrap_or(channel);
        let raw = self.outputs.get(&source).copied().unwrap_or(0.0);
        let peak = self
            .peaks
            .get(&channel)
            .copied()
            .unwrap_or(NOMINAL_BATTERY_VOLTS)
            .min(NOMINAL_BATTERY_VOLTS);
        raw * peak / NOMINAL_BATTERY_VOLTS
    }
}

// ── Devices ───────────────────────────────────────────────────

pub struct SimMotor {
    channel: u8,
    world: Rc<RefCell<World>>,
}

impl MotorOutput for SimMotor {
    fn channel(&self) -> u8 {
        self.channel
    }

    fn set_output(&mut self, value: f32) {
        self.world.borrow_mut().outputs.insert(self.channel, value);
    }

    fn follow(&mut self, leader: u8) {
        self.world.borrow_mut().leaders.insert(self.channel, leader);
    }

    fn set_peak_voltage(&mut self, volts: f32) {
        self.world.borrow_mut().peaks.insert(self.channel, volts);
    }
}

pub struct SimEncoder {
    counter: Rc<EdgeCounter>,
}

impl QuadratureEncoder for SimEncoder {
    fn raw_position(&self) -> i32 {
        self.counter.snapshot().0
    }

    fn raw_velocity(&self) -> f32 {
        self.counter.snapshot().1
    }

    fn reset(&mut self) {
        self.counter.clear();
    }
}

pub struct SimImu {
    world: Rc<RefCell<World>>,
}

impl HeadingSensor for SimImu {
    fn yaw(&self) -> f32 {
        self.world.borrow().yaw
    }

    fn rate(&self) -> f32 {
        self.world.borrow().yaw_rate
    }

    fn is_connected(&self) -> bool {
        true
    }

    fn is_calibrating(&self) -> bool {
        self.world.borrow().steps < IMU_CALIBRATION_STEPS
    }
}

pub struct SimPin {
    key: (u8, u8),
    world: Rc<RefCell<World>>,
}

impl ErrorType for SimPin {
    type Error = Infallible;
}

impl OutputPin for SimPin {
    fn set_low(&mut self) -> core::result::Result<(), Self::Error> {
        self.world.borrow_mut().pins.insert(self.key, false);
        Ok(())
    }

    fn set_high(&mut self) -> core::result::Result<(), Self::Error> {
        self.world.borrow_mut().pins.insert(self.key, true);
        Ok(())
    }
}

// ── Encoder side model ────────────────────────────────────────

struct Side {
    motor: u8,
    mount: Polarity,
    channels: Option<(u8, u8)>,
    encoder_polarity: Polarity,
    ticks_per_revolution: f32,
    counter: Rc<EdgeCounter>,
    residual_ticks: f32,
}

impl Side {
    /// Feed `ticks` worth of edges spread evenly over the step.
    fn feed(&mut self, ticks: f32, start_us: u64, step_us: u64) {
        self.residual_ticks += ticks;
        let whole = self.residual_ticks.trunc();
        self.residual_ticks -= whole;

        let count = whole.abs() as u64;
        let direction = if whole >= 0.0 {
            Direction::Forward
        } else {
            Direction::Reverse
        };
        for i in 0..count {
            self.counter
                .on_edge(direction, start_us + (i + 1) * step_us / count.max(1));
        }
        self.counter.on_idle(start_us + step_us);
    }
}

// ── Bus ───────────────────────────────────────────────────────

/// In-memory device bus implementing [`DeviceBinder`].
pub struct SimBus {
    world: Rc<RefCell<World>>,
    left: Side,
    right: Side,
    shifter_key: (u8, u8),
    distance_per_revolution: f32,
    now_us: u64,
}

impl SimBus {
    /// Wire the simulated robot the way `config` describes it.
    pub fn new(config: &DriveConfig) -> Self {
        let side = |motor: u8, inverted: bool, encoder: Option<&EncoderConfig>| Side {
            motor,
            mount: if inverted {
                Polarity::Inverted
            } else {
                Polarity::Normal
            },
            channels: encoder.map(|e| (e.channel_a, e.channel_b)),
            encoder_polarity: encoder.map_or(Polarity::Normal, |e| e.polarity),
            ticks_per_revolution: encoder.map_or(1.0, |e| e.ticks_per_revolution),
            counter: Rc::new(EdgeCounter::new()),
            residual_ticks: 0.0,
        };

        Self {
            world: Rc::new(RefCell::new(World::default())),
            left: side(config.left_motor, config.left_inverted, Some(&config.left_encoder)),
            right: side(
                config.right_motor,
                config.right_inverted,
                config.right_encoder.as_ref(),
            ),
            shifter_key: (config.pcm_id, config.left_shifter.forward),
            distance_per_revolution: config.distance_per_revolution(),
            now_us: 0,
        }
    }

    /// Advance the world by `dt_secs`.
    pub fn step(&mut self, dt_secs: f32) {
        let step_us = (dt_secs * 1_000_000.0) as u64;
        let (left_speed, right_speed) = {
            let mut world = self.world.borrow_mut();
            let free_speed = if world.pins.get(&self.shifter_key).copied().unwrap_or(false) {
                FREE_SPEED_HIGH_IN_PER_S
            } else {
                FREE_SPEED_LOW_IN_PER_S
            };
            let left = self.left.mount.apply(world.output_of(self.left.motor)) * free_speed;
            let right = self.right.mount.apply(world.output_of(self.right.motor)) * free_speed;

            let yaw_rate = (left - right) / TRACK_WIDTH_IN * 180.0 / PI;
            world.yaw_rate = yaw_rate;
            world.yaw += yaw_rate * dt_secs;
            world.steps += 1;
            (left, right)
        };

        let revs_per_in = 1.0 / self.distance_per_revolution;
        for (side, speed) in [(&mut self.left, left_speed), (&mut self.right, right_speed)] {
            let ticks = side
                .encoder_polarity
                .apply(speed * dt_secs * revs_per_in * side.ticks_per_revolution);
            side.feed(ticks, self.now_us, step_us);
        }
        self.now_us += step_us;
    }

    /// Level last written to a solenoid pin.
    pub fn pin_level(&self, module: u8, channel: u8) -> Option<bool> {
        self.world.borrow().pins.get(&(module, channel)).copied()
    }

    /// Output a motor controller is producing, after following and ceiling.
    pub fn motor_output(&self, channel: u8) -> f32 {
        self.world.borrow().output_of(channel)
    }
}

impl DeviceBinder for SimBus {
    type Motor = SimMotor;
    type Encoder = SimEncoder;
    type Heading = SimImu;
    type Pin = SimPin;

    fn motor(&mut self, channel: u8) -> Result<SimMotor> {
        if channel > MAX_CAN_ID {
            return Err(Error::DeviceUnavailable(DeviceKind::Motor, channel));
        }
        Ok(SimMotor {
            channel,
            world: Rc::clone(&self.world),
        })
    }

    fn encoder(&mut self, channel_a: u8, channel_b: u8) -> Result<SimEncoder> {
        if channel_a > MAX_DIO_CHANNEL || channel_b > MAX_DIO_CHANNEL {
            return Err(Error::DeviceUnavailable(
                DeviceKind::Encoder,
                channel_a.max(channel_b),
            ));
        }
        let pair = Some((channel_a, channel_b));
        let counter = if self.left.channels == pair {
            Rc::clone(&self.left.counter)
        } else if self.right.channels == pair {
            Rc::clone(&self.right.counter)
        } else {
            // Not mounted on a drive wheel; never turns.
            Rc::new(EdgeCounter::new())
        };
        Ok(SimEncoder { counter })
    }

    fn heading_sensor(&mut self, port: u8) -> Result<SimImu> {
        if port != 0 {
            return Err(Error::DeviceUnavailable(DeviceKind::HeadingSensor, port));
        }
        Ok(SimImu {
            world: Rc::clone(&self.world),
        })
    }

    fn solenoid_pin(&mut self, module: u8, channel: u8) -> Result<SimPin> {
        if channel > MAX_PCM_CHANNEL {
            return Err(Error::DeviceUnavailable(DeviceKind::Solenoid, channel));
        }
        Ok(SimPin {
            key: (module, channel),
            world: Rc::clone(&self.world),
        })
    }
}
