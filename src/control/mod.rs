//! Feedback interface consumed by closed-loop controllers outside this crate.

pub mod source;
