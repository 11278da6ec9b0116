//! Log-based telemetry sink adapter.
//!
//! Implements [`TelemetrySink`] by writing each snapshot to the `log`
//! facade.  A dashboard adapter would implement the same trait.

use log::{info, warn};

use crate::app::ports::TelemetrySink;
use crate::app::telemetry::DriveTelemetry;

/// Adapter that logs every [`DriveTelemetry`] snapshot.
pub struct LogTelemetrySink {
    published: u64,
}

impl LogTelemetrySink {
    pub fn new() -> Self {
        Self { published: 0 }
    }

    /// Snapshots published so far.
    pub fn published(&self) -> u64 {
        self.published
    }
}

impl Default for LogTelemetrySink {
    fn default() -> Self {
        Self::new()
    }
}

impl TelemetrySink for LogTelemetrySink {
    fn publish(&mut self, t: &DriveTelemetry) {
        self.published += 1;
        info!(
            "DRIVE | L={:+.2} R={:+.2} | gear={:?} power={:?} ({:.1}V) | \
             dist={:+.1}in vel={:+.1}in/s | angle={:+.1}\u{00b0} rate={:+.1}\u{00b0}/s",
            t.left_speed,
            t.right_speed,
            t.gear,
            t.power_mode,
            t.peak_voltage,
            t.distance,
            t.velocity,
            t.angle,
            t.angular_velocity,
        );
        if !t.angle_ready {
            warn!("DRIVE | heading sensor not ready, angle untrusted");
        }
    }
}
