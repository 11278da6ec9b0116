//! Drive encoder fusion.
//!
//! Two quadrature encoders (left primary, right redundant) reduce to one
//! authoritative distance and velocity:
//!
//! ```text
//! revs_i   = polarity_i(raw_i) / ticks_per_rev_i
//! distance = forward(mean(revs_i)) × gear_ratio × π × wheel_diameter
//! velocity = forward(rate_primary / ticks_per_rev) × same factor
//! ```
//!
//! Velocity comes from the primary channel only.  Distance averages both.
//!
//! The encoders may be refreshed from interrupt context, so the paired
//! reset and the paired position read each run inside one critical
//! section; a reader never sees one channel zeroed and the other not.

use crate::app::ports::QuadratureEncoder;
use crate::sensors::Polarity;

/// One encoder with its sign and resolution.
pub struct EncoderChannel<E> {
    encoder: E,
    polarity: Polarity,
    ticks_per_revolution: f32,
}

impl<E: QuadratureEncoder> EncoderChannel<E> {
    /// `ticks_per_revolution` must be positive (checked by
    /// [`DriveConfig::validate`](crate::config::DriveConfig::validate)).
    pub fn new(encoder: E, polarity: Polarity, ticks_per_revolution: f32) -> Self {
        debug_assert!(ticks_per_revolution > 0.0);
        Self {
            encoder,
            polarity,
            ticks_per_revolution,
        }
    }

    fn revolutions_from(&self, raw_ticks: i32) -> f32 {
        self.polarity.apply(raw_ticks as f32) / self.ticks_per_revolution
    }

    /// Sign-corrected revolutions since the last reset.
    pub fn revolutions(&self) -> f32 {
        self.revolutions_from(self.encoder.raw_position())
    }

    pub fn revolutions_per_second(&self) -> f32 {
        self.polarity.apply(self.encoder.raw_velocity()) / self.ticks_per_revolution
    }

    pub fn polarity(&self) -> Polarity {
        self.polarity
    }

    pub fn encoder(&self) -> &E {
        &self.encoder
    }
}

/// Fuses the drive encoders into one distance/velocity pair.
pub struct SensorFusion<E> {
    primary: EncoderChannel<E>,
    secondary: Option<EncoderChannel<E>>,
    forward: Polarity,
    distance_per_revolution: f32,
}

impl<E: QuadratureEncoder> SensorFusion<E> {
    pub fn new(
        primary: EncoderChannel<E>,
        secondary: Option<EncoderChannel<E>>,
        forward: Polarity,
        distance_per_revolution: f32,
    ) -> Self {
        Self {
            primary,
            secondary,
            forward,
            distance_per_revolution,
        }
    }

    /// Zero every channel as one indivisible step.
    pub fn reset(&mut self) {
        critical_section::with(|_cs| {
            self.primary.encoder.reset();
            if let Some(secondary) = self.secondary.as_mut() {
                secondary.encoder.reset();
            }
        });
    }

    /// Fused distance.  With a single channel, no averaging takes place.
    pub fn distance(&self) -> f32 {
        let (primary_raw, secondary_raw) = critical_section::with(|_cs| {
            (
                self.primary.encoder.raw_position(),
                self.secondary.as_ref().map(|s| s.encoder.raw_position()),
            )
        });

        let primary_revs = self.primary.revolutions_from(primary_raw);
        let revs = match (&self.secondary, secondary_raw) {
            (Some(secondary), Some(raw)) => (primary_revs + secondary.revolutions_from(raw)) / 2.0,
            _ => primary_revs,
        };
        self.forward.apply(revs) * self.distance_per_revolution
    }

    /// Velocity from the primary channel, same correction and scale as
    /// [`distance`](Self::distance).
    pub fn velocity(&self) -> f32 {
        self.forward.apply(self.primary.revolutions_per_second()) * self.distance_per_revolution
    }

    pub fn channel_count(&self) -> usize {
        1 + usize::from(self.secondary.is_some())
    }

    pub fn primary(&self) -> &EncoderChannel<E> {
        &self.primary
    }

    pub fn secondary(&self) -> Option<&EncoderChannel<E>> {
        self.secondary.as_ref()
    }
}
