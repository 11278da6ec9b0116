//! Adapters: concrete implementations of the port traits.
//!
//! | Adapter    | Implements     | Connects to                  |
//! |------------|----------------|------------------------------|
//! | `log_sink` | TelemetrySink  | `log` facade                 |
//! | `sim`      | DeviceBinder   | in-memory simulated robot    |

pub mod log_sink;
pub mod sim;
