//! Heading tracker over an inertial yaw sensor.
//!
//! Reports yaw relative to the last [`calibrate_zero`](HeadingTracker::calibrate_zero).
//! The heading is always returned, ready or not; callers check
//! [`is_ready`](HeadingTracker::is_ready) and choose their own degraded
//! behaviour (hold last heading, drop heading-dependent control, ...).

use log::{debug, warn};

use crate::app::ports::HeadingSensor;

pub struct HeadingTracker<H> {
    sensor: H,
    zero_offset: f32,
}

impl<H: HeadingSensor> HeadingTracker<H> {
    pub fn new(sensor: H) -> Self {
        Self {
            sensor,
            zero_offset: 0.0,
        }
    }

    /// Capture the current raw yaw as the new zero.
    pub fn calibrate_zero(&mut self) {
        if !self.is_ready() {
            warn!(
                "Zeroing heading while sensor not ready (connected={}, calibrating={})",
                self.sensor.is_connected(),
                self.sensor.is_calibrating()
            );
        }
        self.zero_offset = self.sensor.yaw();
        debug!("Heading zero offset {:.2}°", self.zero_offset);
    }

    /// Degrees rotated since the last zeroing.
    pub fn heading(&self) -> f32 {
        self.sensor.yaw() - self.zero_offset
    }

    /// Raw turn rate (deg/s); the zero offset does not apply.
    pub fn rate(&self) -> f32 {
        self.sensor.rate()
    }

    /// Connected and not running its own calibration.
    pub fn is_ready(&self) -> bool {
        self.sensor.is_connected() && !self.sensor.is_calibrating()
    }

    pub fn zero_offset(&self) -> f32 {
        self.zero_offset
    }

    pub fn sensor(&self) -> &H {
        &self.sensor
    }
}
