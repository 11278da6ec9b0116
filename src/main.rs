//! Drive base simulator: host entry point
//!
//! Runs the drivetrain core against the in-memory [`SimBus`] with a
//! scripted match: wait for the heading sensor, drive forward in low gear,
//! shift up, drop to reduced power for a turn, then stop.
//!
//! ```text
//! ┌───────────────┐  move_tank / shift / power  ┌──────────────┐
//! │ scripted plan │ ───────────────────────────▶│  DriveBase   │
//! └───────────────┘                             └──────┬───────┘
//!                                                      │ ports
//!                     telemetry ◀── LogTelemetrySink   ▼
//!                                                 ┌──────────┐
//!                                                 │  SimBus  │
//!                                                 └──────────┘
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn};
use tracing_subscriber::EnvFilter;

use drivebase::DriveBase;
use drivebase::adapters::log_sink::LogTelemetrySink;
use drivebase::adapters::sim::SimBus;
use drivebase::app::ports::TelemetrySink;
use drivebase::config::DriveConfig;
use drivebase::control::source::PidSource;

#[derive(Parser, Debug)]
#[command(name = "drivebase-sim", about = "Run the drive base against a simulated robot")]
struct Args {
    /// JSON config override; defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of control cycles to run.
    #[arg(short = 'n', long, default_value_t = 200)]
    cycles: u32,

    /// Publish telemetry every N cycles.
    #[arg(long, default_value_t = 10)]
    telemetry_every: u32,

    /// Print telemetry as JSON lines on stdout as well.
    #[arg(long)]
    json: bool,
}

/// Operator intent for one cycle.
struct Plan {
    left: f32,
    right: f32,
    high_gear: bool,
    high_power: bool,
}

fn plan_for(cycle: u32) -> Plan {
    match cycle {
        0..50 => Plan {
            left: 0.6,
            right: 0.6,
            high_gear: false,
            high_power: true,
        },
        50..100 => Plan {
            left: 0.8,
            right: 0.8,
            high_gear: true,
            high_power: true,
        },
        100..140 => Plan {
            left: 0.5,
            right: -0.5,
            high_gear: false,
            high_power: false,
        },
        _ => Plan {
            left: 0.0,
            right: 0.0,
            high_gear: false,
            high_power: true,
        },
    }
}

fn load_config(path: Option<&PathBuf>) -> Result<DriveConfig> {
    let Some(path) = path else {
        return Ok(DriveConfig::default());
    };
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    let config = DriveConfig::from_json(&json)
        .with_context(|| format!("parsing config {}", path.display()))?;
    Ok(config)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let args = Args::parse();
    let config = load_config(args.config.as_ref())?;
    let dt = config.control_period_ms as f32 / 1000.0;

    info!("drivebase-sim v{}", env!("CARGO_PKG_VERSION"));

    let mut bus = SimBus::new(&config);
    let mut drive = DriveBase::new(&config, &mut bus).context("binding drive devices")?;
    let mut sink = LogTelemetrySink::new();

    // ── Wait for the heading sensor ───────────────────────────
    let mut waited = 0;
    while !drive.is_angle_ready() {
        bus.step(dt);
        waited += 1;
        if waited > 500 {
            anyhow::bail!("heading sensor never became ready");
        }
    }
    info!("Heading sensor ready after {} cycles", waited);
    drive.reset_distance();
    drive.reset_angle();

    // ── Scripted cycles ───────────────────────────────────────
    for cycle in 0..args.cycles {
        let plan = plan_for(cycle);

        let shifted = if plan.high_gear {
            drive.shift_up()
        } else {
            drive.shift_down()
        };
        if let Err(e) = shifted {
            warn!("Shift failed on cycle {}: {}", cycle, e);
        }
        drive.set_high_power(plan.high_power);
        drive.move_tank(plan.left, plan.right);

        bus.step(dt);

        if args.telemetry_every > 0 && cycle % args.telemetry_every == 0 {
            let telemetry = drive.telemetry();
            sink.publish(&telemetry);
            if args.json {
                println!("{}", serde_json::to_string(&telemetry)?);
            }
        }
    }

    drive.stop();
    let distance = drive.distance_source().sample();
    let angle = drive.angle_source().sample();
    info!(
        "Finished {} cycles: distance {:+.1}in ({:+.1}in/s), angle {:+.1}\u{00b0}, {} snapshots",
        args.cycles,
        distance.value,
        distance.derivative,
        angle.value,
        sink.published()
    );
    Ok(())
}
