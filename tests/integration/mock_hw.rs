//! Mock hardware adapter for integration tests.
//!
//! Records every motor and solenoid call so tests can assert on the full
//! command history, and exposes settable encoder and IMU registers.  All
//! devices handed out by [`MockBus`] share one state cell with the bus, so
//! the test keeps a clone of the bus as its inspection handle.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use drivebase::app::ports::{
    DeviceBinder, HeadingSensor, MotorOutput, QuadratureEncoder, TelemetrySink,
};
use drivebase::app::telemetry::DriveTelemetry;
use drivebase::error::{DeviceKind, Error, Result};
use embedded_hal::digital::{ErrorKind, ErrorType, OutputPin};

// ── Call records ──────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MotorCall {
    SetOutput { channel: u8, value: f32 },
    Follow { channel: u8, leader: u8 },
    PeakVoltage { channel: u8, volts: f32 },
}

#[derive(Debug, Clone, Copy, Default)]
pub struct EncoderRegs {
    pub position: i32,
    pub velocity: f32,
    pub resets: u32,
}

#[derive(Debug, Clone, Copy)]
pub struct ImuRegs {
    pub yaw: f32,
    pub rate: f32,
    pub connected: bool,
    pub calibrating: bool,
}

impl Default for ImuRegs {
    fn default() -> Self {
        Self {
            yaw: 0.0,
            rate: 0.0,
            connected: true,
            calibrating: false,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PinRegs {
    pub high: bool,
    pub writes: u32,
}

#[derive(Default)]
struct BusState {
    motor_calls: Vec<MotorCall>,
    encoders: HashMap<u8, EncoderRegs>,
    imu: ImuRegs,
    pins: HashMap<(u8, u8), PinRegs>,
    failing_pins: HashSet<(u8, u8)>,
    unavailable: HashSet<(DeviceKind, u8)>,
}

// ── MockBus ───────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct MockBus {
    state: Rc<RefCell<BusState>>,
}

#[allow(dead_code)]
impl MockBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next bind of `kind` on `channel` fail.
    pub fn mark_unavailable(&self, kind: DeviceKind, channel: u8) {
        self.state.borrow_mut().unavailable.insert((kind, channel));
    }

    pub fn motor_calls(&self) -> Vec<MotorCall> {
        self.state.borrow().motor_calls.clone()
    }

    pub fn clear_motor_calls(&self) {
        self.state.borrow_mut().motor_calls.clear();
    }

    /// Last value commanded with `set_output` on `channel`.
    pub fn last_output(&self, channel: u8) -> Option<f32> {
        self.state
            .borrow()
            .motor_calls
            .iter()
            .rev()
            .find_map(|c| match *c {
                MotorCall::SetOutput { channel: ch, value } if ch == channel => Some(value),
                _ => None,
            })
    }

    pub fn last_peak_voltage(&self, channel: u8) -> Option<f32> {
        self.state
            .borrow()
            .motor_calls
            .iter()
            .rev()
            .find_map(|c| match *c {
                MotorCall::PeakVoltage { channel: ch, volts } if ch == channel => Some(volts),
                _ => None,
            })
    }

    pub fn leader_of(&self, channel: u8) -> Option<u8> {
        self.state
            .borrow()
            .motor_calls
            .iter()
            .find_map(|c| match *c {
                MotorCall::Follow { channel: ch, leader } if ch == channel => Some(leader),
                _ => None,
            })
    }

    /// Encoders are keyed by their A channel.
    pub fn set_encoder(&self, channel_a: u8, position: i32, velocity: f32) {
        let mut state = self.state.borrow_mut();
        let regs = state.encoders.entry(channel_a).or_default();
        regs.position = position;
        regs.velocity = velocity;
    }

    pub fn encoder(&self, channel_a: u8) -> EncoderRegs {
        self.state
            .borrow()
            .encoders
            .get(&channel_a)
            .copied()
            .unwrap_or_default()
    }

    pub fn set_imu(&self, update: impl FnOnce(&mut ImuRegs)) {
        update(&mut self.state.borrow_mut().imu);
    }

    pub fn pin(&self, module: u8, channel: u8) -> PinRegs {
        self.state
            .borrow()
            .pins
            .get(&(module, channel))
            .copied()
            .unwrap_or_default()
    }

    pub fn pin_writes(&self) -> u32 {
        self.state.borrow().pins.values().map(|p| p.writes).sum()
    }

    pub fn fail_pin(&self, module: u8, channel: u8, failing: bool) {
        let mut state = self.state.borrow_mut();
        if failing {
            state.failing_pins.insert((module, channel));
        } else {
            state.failing_pins.remove(&(module, channel));
        }
    }

    fn check(&self, kind: DeviceKind, channel: u8) -> Result<()> {
        if self.state.borrow().unavailable.contains(&(kind, channel)) {
            return Err(Error::DeviceUnavailable(kind, channel));
        }
        Ok(())
    }
}

// ── Devices ───────────────────────────────────────────────────

pub struct MockMotor {
    channel: u8,
    state: Rc<RefCell<BusState>>,
}

impl MotorOutput for MockMotor {
    fn channel(&self) -> u8 {
        self.channel
    }

    fn set_output(&mut self, value: f32) {
        self.state.borrow_mut().motor_calls.push(MotorCall::SetOutput {
            channel: self.channel,
            value,
        });
    }

    fn follow(&mut self, leader: u8) {
        self.state.borrow_mut().motor_calls.push(MotorCall::Follow {
            channel: self.channel,
            leader,
        });
    }

    fn set_peak_voltage(&mut self, volts: f32) {
        self.state.borrow_mut().motor_calls.push(MotorCall::PeakVoltage {
            channel: self.channel,
            volts,
        });
    }
}

pub struct MockEncoder {
    channel_a: u8,
    state: Rc<RefCell<BusState>>,
}

impl QuadratureEncoder for MockEncoder {
    fn raw_position(&self) -> i32 {
        self.state
            .borrow()
            .encoders
            .get(&self.channel_a)
            .map_or(0, |e| e.position)
    }

    fn raw_velocity(&self) -> f32 {
        self.state
            .borrow()
            .encoders
            .get(&self.channel_a)
            .map_or(0.0, |e| e.velocity)
    }

    fn reset(&mut self) {
        let mut state = self.state.borrow_mut();
        let regs = state.encoders.entry(self.channel_a).or_default();
        regs.position = 0;
        regs.resets += 1;
    }
}

pub struct MockImu {
    state: Rc<RefCell<BusState>>,
}

impl HeadingSensor for MockImu {
    fn yaw(&self) -> f32 {
        self.state.borrow().imu.yaw
    }

    fn rate(&self) -> f32 {
        self.state.borrow().imu.rate
    }

    fn is_connected(&self) -> bool {
        self.state.borrow().imu.connected
    }

    fn is_calibrating(&self) -> bool {
        self.state.borrow().imu.calibrating
    }
}

pub struct MockPin {
    key: (u8, u8),
    state: Rc<RefCell<BusState>>,
}

impl MockPin {
    fn write(&mut self, high: bool) -> core::result::Result<(), ErrorKind> {
        let mut state = self.state.borrow_mut();
        if state.failing_pins.contains(&self.key) {
            return Err(ErrorKind::Other);
        }
        let regs = state.pins.entry(self.key).or_default();
        regs.high = high;
        regs.writes += 1;
        Ok(())
    }
}

impl ErrorType for MockPin {
    type Error = ErrorKind;
}

impl OutputPin for MockPin {
    fn set_low(&mut self) -> core::result::Result<(), Self::Error> {
        self.write(false)
    }

    fn set_high(&mut self) -> core::result::Result<(), Self::Error> {
        self.write(true)
    }
}

impl DeviceBinder for MockBus {
    type Motor = MockMotor;
    type Encoder = MockEncoder;
    type Heading = MockImu;
    type Pin = MockPin;

    fn motor(&mut self, channel: u8) -> Result<MockMotor> {
        self.check(DeviceKind::Motor, channel)?;
        Ok(MockMotor {
            channel,
            state: Rc::clone(&self.state),
        })
    }

    fn encoder(&mut self, channel_a: u8, _channel_b: u8) -> Result<MockEncoder> {
        self.check(DeviceKind::Encoder, channel_a)?;
        self.state
            .borrow_mut()
            .encoders
            .entry(channel_a)
            .or_default();
        Ok(MockEncoder {
            channel_a,
            state: Rc::clone(&self.state),
        })
    }

    fn heading_sensor(&mut self, port: u8) -> Result<MockImu> {
        self.check(DeviceKind::HeadingSensor, port)?;
        Ok(MockImu {
            state: Rc::clone(&self.state),
        })
    }

    fn solenoid_pin(&mut self, module: u8, channel: u8) -> Result<MockPin> {
        self.check(DeviceKind::Solenoid, channel)?;
        Ok(MockPin {
            key: (module, channel),
            state: Rc::clone(&self.state),
        })
    }
}

// ── RecordingSink ─────────────────────────────────────────────

pub struct RecordingSink {
    pub snapshots: Vec<DriveTelemetry>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self {
            snapshots: Vec::new(),
        }
    }
}

impl Default for RecordingSink {
    fn default() -> Self {
        Self::new()
    }
}

impl TelemetrySink for RecordingSink {
    fn publish(&mut self, telemetry: &DriveTelemetry) {
        self.snapshots.push(*telemetry);
    }
}
