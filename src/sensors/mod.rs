//! Sensor subsystem: encoder fusion, the ISR edge counter, and heading.
//!
//! Every reader here is a plain synchronous register read; nothing caches
//! or blocks waiting for a fresh sample.

pub mod edge_counter;
pub mod encoders;
pub mod heading;

use serde::{Deserialize, Serialize};

/// Sign convention of a raw signal relative to the drive's forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Polarity {
    Normal,
    Inverted,
}

impl Polarity {
    pub fn apply(self, value: f32) -> f32 {
        match self {
            Self::Normal => value,
            Self::Inverted => -value,
        }
    }

    pub fn flipped(self) -> Self {
        match self {
            Self::Normal => Self::Inverted,
            Self::Inverted => Self::Normal,
        }
    }
}
