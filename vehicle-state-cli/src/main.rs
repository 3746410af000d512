//! Vehicle State Decoder CLI Application
//!
//! Bench tool around the vehicle-state-decoder library:
//! - Resolves a variant identifier and prints the per-bus subscription and
//!   liveness tables the frame engine would be configured with
//! - Decodes a JSON-serialized snapshot capture into a state record, using
//!   local pass-through stand-ins for the externally owned estimators

use anyhow::{Context, Result};
use clap::Parser;
use serde::Deserialize;
use std::path::PathBuf;
use vehicle_state_decoder::{
    BlinkerHelper, BusSnapshot, ParserConfigBuilder, SpeedEstimate, SpeedFilter, StateDecoder,
    VehicleVariant,
};

mod config;
mod output;

/// Vehicle State Decoder - inspect variant routing and decode captures
#[derive(Parser, Debug)]
#[command(name = "vehicle-state-cli")]
#[command(about = "Inspect per-variant parser configurations and decode snapshot captures", long_about = None)]
#[command(version)]
struct Args {
    /// Vehicle variant identifier (e.g. impreza-2019)
    #[arg(long, value_name = "NAME")]
    variant: Option<String>,

    /// Enable the blind-spot monitor subscription
    #[arg(long)]
    bsm: bool,

    /// Path to a configuration file (config.toml)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Path to a JSON snapshot capture to decode
    #[arg(short, long, value_name = "FILE")]
    snapshot: Option<PathBuf>,

    /// Emit machine-readable JSON instead of tables
    #[arg(long)]
    json: bool,

    /// List all supported variants and exit
    #[arg(long)]
    list_variants: bool,

    /// Verbosity level (can be repeated: -v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long)]
    quiet: bool,
}

/// One captured receive cycle, as serialized by the bench recorder
#[derive(Debug, Deserialize)]
struct SnapshotCapture {
    primary: BusSnapshot,
    #[serde(default)]
    body: Option<BusSnapshot>,
    #[serde(default)]
    camera: BusSnapshot,
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(args.verbose, args.quiet);

    log::info!(
        "Vehicle State CLI v{} (decoder library v{})",
        env!("CARGO_PKG_VERSION"),
        vehicle_state_decoder::VERSION
    );

    if args.list_variants {
        list_variants();
        return Ok(());
    }

    // Variant and toggles come from --variant/--bsm or from the config file
    let (variant, enable_bsm, manual_parking_brake) = match (&args.variant, &args.config) {
        (Some(name), _) => {
            let variant: VehicleVariant = name
                .parse()
                .with_context(|| format!("Invalid variant: {:?}", name))?;
            (variant, args.bsm, true)
        }
        (None, Some(path)) => {
            let cfg = config::load_config(path)?;
            log::debug!("Configuration loaded from {:?}", path);
            (
                cfg.resolve_variant()?,
                cfg.enable_blind_spot_monitor,
                cfg.manual_parking_brake,
            )
        }
        (None, None) => {
            println!("Vehicle State Decoder - no variant specified");
            println!("\nQuick start:");
            println!("  vehicle-state-cli --variant impreza-2019");
            println!("  vehicle-state-cli --variant outback-2020 --bsm --json");
            println!("  vehicle-state-cli --config config.toml --snapshot cycle.json");
            println!("  vehicle-state-cli --list-variants");
            println!("\nUse --help for more options");
            return Ok(());
        }
    };

    match &args.snapshot {
        Some(path) => decode_snapshot(variant, enable_bsm, manual_parking_brake, path, args.json),
        None => show_parser_config(variant, enable_bsm, args.json),
    }
}

/// Print the per-bus subscription tables for a variant
fn show_parser_config(variant: VehicleVariant, enable_bsm: bool, json: bool) -> Result<()> {
    let parser_config = ParserConfigBuilder::new(variant)
        .with_blind_spot_monitor(enable_bsm)
        .build();

    if json {
        println!("{}", serde_json::to_string_pretty(&parser_config)?);
        return Ok(());
    }

    println!(
        "Parser configuration for {} ({})",
        variant,
        variant.display_name()
    );
    println!(
        "Signal set: {}",
        variant.config().signal_set.as_str()
    );
    output::print_parser_config(&parser_config);
    Ok(())
}

/// Decode one captured cycle and print the resulting state
fn decode_snapshot(
    variant: VehicleVariant,
    enable_bsm: bool,
    manual_parking_brake: bool,
    path: &PathBuf,
    json: bool,
) -> Result<()> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read snapshot file: {:?}", path))?;
    let capture: SnapshotCapture = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse snapshot file: {:?}", path))?;

    let decoder = StateDecoder::new(variant, enable_bsm, manual_parking_brake);

    // Bench stand-ins; the production estimators live with the control stack
    let mut filter = PassthroughFilter;
    let mut blinker = PassthroughBlinker;
    let (state, echo) = decoder.decode(
        &capture.primary,
        capture.body.as_ref(),
        &capture.camera,
        &mut filter,
        &mut blinker,
    );

    if json {
        let bundle = serde_json::json!({ "state": state, "echo": echo });
        println!("{}", serde_json::to_string_pretty(&bundle)?);
    } else {
        println!("Variant: {} ({})\n", variant, variant.display_name());
        output::print_state(&state);
    }
    Ok(())
}

fn list_variants() {
    println!("Supported variants:");
    for variant in VehicleVariant::ALL {
        println!(
            "  {:<24} {:<24} signal set {}",
            variant.ident(),
            variant.display_name(),
            variant.config().signal_set.as_str()
        );
    }
}

/// Reports the raw mean wheel speed unfiltered
struct PassthroughFilter;

impl SpeedFilter for PassthroughFilter {
    fn update(&mut self, speed_raw: f64) -> SpeedEstimate {
        SpeedEstimate {
            speed: speed_raw,
            accel: 0.0,
        }
    }
}

/// Reports the lamp state without the persistence window
struct PassthroughBlinker;

impl BlinkerHelper for PassthroughBlinker {
    fn update(&mut self, _frames: u32, left: bool, right: bool) -> (bool, bool) {
        (left, right)
    }
}

/// Initialize logging based on verbosity level
fn init_logging(verbose: u8, quiet: bool) {
    use env_logger::Builder;
    use log::LevelFilter;
    use std::io::Write;

    let level = if quiet {
        LevelFilter::Error
    } else {
        match verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };

    Builder::new()
        .filter_level(level)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {}] {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();
}
