//! Interrupt-fed quadrature tick counter.
//!
//! The decoder ISR calls [`EdgeCounter::on_edge`] for every decoded edge;
//! the control cycle reads through the [`QuadratureEncoder`] impl on
//! `&EdgeCounter`.  Position and rate live together in one
//! `critical_section::Mutex<Cell<_>>`, so a reader always sees a pair
//! produced by the same edge.
//!
//! `new` is `const` so counters can sit in a `static` that ISR callbacks
//! reach without captures.

use core::cell::Cell;

use critical_section::Mutex;

use crate::app::ports::QuadratureEncoder;

/// No edge for this long means the shaft has stopped.
pub const STALL_PERIOD_US: u64 = 100_000;

/// Direction of one decoded quadrature edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Reverse,
}

#[derive(Debug, Clone, Copy)]
struct Counts {
    position: i32,
    /// Ticks per second, signed.
    rate: f32,
    last_edge_us: Option<u64>,
}

pub struct EdgeCounter {
    counts: Mutex<Cell<Counts>>,
}

impl EdgeCounter {
    pub const fn new() -> Self {
        Self {
            counts: Mutex::new(Cell::new(Counts {
                position: 0,
                rate: 0.0,
                last_edge_us: None,
            })),
        }
    }

    /// ISR entry point.  `timestamp_us` is a free-running microsecond clock.
    pub fn on_edge(&self, direction: Direction, timestamp_us: u64) {
        critical_section::with(|cs| {
            let cell = self.counts.borrow(cs);
            let mut c = cell.get();
            let step = match direction {
                Direction::Forward => 1,
                Direction::Reverse => -1,
            };
            c.position = c.position.wrapping_add(step);

            if let Some(prev) = c.last_edge_us {
                let period = timestamp_us.saturating_sub(prev);
                c.rate = if period == 0 || period > STALL_PERIOD_US {
                    0.0
                } else {
                    step as f32 * 1_000_000.0 / period as f32
                };
            }
            c.last_edge_us = Some(timestamp_us);
            cell.set(c);
        });
    }

    /// Timer tick: zero the rate once edges have stopped arriving.
    pub fn on_idle(&self, now_us: u64) {
        critical_section::with(|cs| {
            let cell = self.counts.borrow(cs);
            let mut c = cell.get();
            let stalled = c
                .last_edge_us
                .is_none_or(|last| now_us.saturating_sub(last) > STALL_PERIOD_US);
            if stalled {
                c.rate = 0.0;
                cell.set(c);
            }
        });
    }

    /// Consistent `(position, rate)` pair.
    pub fn snapshot(&self) -> (i32, f32) {
        critical_section::with(|cs| {
            let c = self.counts.borrow(cs).get();
            (c.position, c.rate)
        })
    }

    /// Zero the position, keeping the rate estimate.
    pub fn clear(&self) {
        critical_section::with(|cs| {
            let cell = self.counts.borrow(cs);
            let mut c = cell.get();
            c.position = 0;
            cell.set(c);
        });
    }
}

impl Default for EdgeCounter {
    fn default() -> Self {
        Self::new()
    }
}

impl QuadratureEncoder for &EdgeCounter {
    fn raw_position(&self) -> i32 {
        self.snapshot().0
    }

    fn raw_velocity(&self) -> f32 {
        self.snapshot().1
    }

    fn reset(&mut self) {
        self.clear();
    }
}
