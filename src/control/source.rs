//! Measurement sources for an external closed-loop controller.
//!
//! A controller holding a [`PidSource`] treats distance/velocity and
//! heading/rate the same way, without knowing which sensor backs the read.
//!
//! [`MeasurementSource`] is a borrowed view: a reference to its owner plus
//! two plain getter functions.  It is valid only while the owner lives (the
//! lifetime enforces it) and it never caches; every sample re-queries the
//! owner, so freshness equals that of the owner's read.

/// One `(value, derivative)` reading.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub value: f32,
    pub derivative: f32,
}

/// Which half of a [`Sample`] a controller regulates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SourceMode {
    #[default]
    Displacement,
    Rate,
}

pub trait PidSource {
    fn sample(&self) -> Sample;

    fn mode(&self) -> SourceMode;

    /// The scalar selected by [`mode`](Self::mode).
    fn pid_get(&self) -> f32 {
        let sample = self.sample();
        match self.mode() {
            SourceMode::Displacement => sample.value,
            SourceMode::Rate => sample.derivative,
        }
    }
}

pub struct MeasurementSource<'a, T> {
    target: &'a T,
    value: fn(&T) -> f32,
    derivative: fn(&T) -> f32,
    mode: SourceMode,
}

impl<'a, T> MeasurementSource<'a, T> {
    pub fn new(target: &'a T, value: fn(&T) -> f32, derivative: fn(&T) -> f32) -> Self {
        Self {
            target,
            value,
            derivative,
            mode: SourceMode::Displacement,
        }
    }

    pub fn with_mode(mut self, mode: SourceMode) -> Self {
        self.mode = mode;
        self
    }
}

impl<T> Clone for MeasurementSource<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for MeasurementSource<'_, T> {}

impl<T> PidSource for MeasurementSource<'_, T> {
    fn sample(&self) -> Sample {
        Sample {
            value: (self.value)(self.target),
            derivative: (self.derivative)(self.target),
        }
    }

    fn mode(&self) -> SourceMode {
        self.mode
    }
}
