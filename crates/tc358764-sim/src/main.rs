//! Debug CLI: runs the bridge driver against a simulated TC358764 board and
//! prints the register traffic it produced.

use std::fs;
use std::path::PathBuf;
use std::process;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};

use tc358764_core::init::PROGRAM_LEN;
use tc358764_core::{BridgeConfig, DsiDeviceConfig, PowerPolicy, ResetTiming, SUPPLY_NAMES};
use tc358764_hal::ConnectorId;
use tc358764_sim::trace::{format_mux_table, format_trace};
use tc358764_sim::SimOptions;

#[derive(Parser)]
#[command(name = "tc358764-sim")]
#[command(about = "Run the TC358764 bridge driver against a simulated board", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Suppress progress output (only show errors)
    #[arg(short, long, global = true)]
    quiet: bool,

    /// DSI virtual channel of the bridge
    #[arg(long, global = true, default_value = "0", value_parser = clap::value_parser!(u8).range(0..=3))]
    channel: u8,

    /// Abort bring-up when a supply fails to enable
    #[arg(long, global = true)]
    strict_power: bool,

    /// Register address (hex) whose writes the chip will not acknowledge
    #[arg(long, global = true, value_parser = parse_register)]
    fail_register: Option<u16>,

    /// Supply that refuses to switch
    #[arg(long, global = true)]
    fail_rail: Option<String>,

    /// Run with no DSI transfer capability wired up
    #[arg(long, global = true)]
    unwired: bool,

    /// Also write the register trace to this file
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Power up and program the bridge
    Enable,
    /// Enable, then disable again
    Cycle,
    /// Print the RGB to LVDS wiring table
    Mux,
    /// Print the DSI link parameters and power sequencing constants
    Info,
}

fn parse_register(s: &str) -> Result<u16, String> {
    let digits = s.trim_start_matches("0x").trim_start_matches("0X");
    u16::from_str_radix(digits, 16).map_err(|e| format!("invalid register address {s:?}: {e}"))
}

fn main() {
    let cli = Cli::parse();

    // Initialize logging (suppressed if --quiet)
    if !cli.quiet {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Info)
            .init();
    }

    if let Err(e) = run(&cli) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    match cli.command {
        Commands::Enable => run_bridge(cli, false),
        Commands::Cycle => run_bridge(cli, true),
        Commands::Mux => {
            print!("{}", format_mux_table());
            Ok(())
        }
        Commands::Info => {
            print_info();
            Ok(())
        }
    }
}

fn run_bridge(cli: &Cli, disable_after: bool) -> Result<()> {
    if let Some(rail) = &cli.fail_rail {
        if !SUPPLY_NAMES.contains(&rail.as_str()) {
            bail!("unknown supply {rail:?}, expected one of {SUPPLY_NAMES:?}");
        }
    }

    let options = SimOptions {
        fail_register: cli.fail_register,
        fail_rail: cli.fail_rail.clone(),
        unwired: cli.unwired,
        panel_not_ready: false,
    };
    let config = BridgeConfig {
        channel: cli.channel,
        power_policy: if cli.strict_power {
            PowerPolicy::Strict
        } else {
            PowerPolicy::Lenient
        },
        timing: ResetTiming::default(),
    };

    let (mut bridge, board) = tc358764_sim::build(&options, config);
    bridge.attach(ConnectorId(0));

    let result = bridge.enable();
    if result.is_ok() {
        let modes = bridge.get_modes().context("querying panel modes")?;
        for mode in &modes {
            log::info!(
                "mode {}x{} @ {} kHz (htotal {}, vtotal {})",
                mode.hactive,
                mode.vactive,
                mode.clock_khz,
                mode.htotal(),
                mode.vtotal()
            );
        }
    }
    let enable_state = bridge.state();

    if disable_after {
        bridge.disable();
    }

    let trace = format_trace(&board.trace());
    if !cli.quiet {
        print!("{trace}");
        eprintln!(
            "state after enable: {enable_state:?}, final state: {:?}, reset pulses: {}",
            bridge.state(),
            board.reset_pulses()
        );
    }
    if let Some(path) = &cli.output {
        fs::write(path, &trace).with_context(|| format!("writing trace to {}", path.display()))?;
    }

    result.context("bridge enable failed")
}

fn print_info() {
    let dsi = DsiDeviceConfig::TC358764;
    let timing = ResetTiming::MINIMUM;
    println!("DSI lanes:        {}", dsi.lanes);
    println!("pixel format:     {:?}", dsi.format);
    println!(
        "mode flags:       video={} burst={} auto-vertical={}",
        dsi.video_mode, dsi.burst, dsi.auto_vertical
    );
    println!("supplies:         {}", SUPPLY_NAMES.join(", "));
    println!(
        "reset pulse:      {} ms pre-delay, {} ms low, {} ms high",
        timing.pre_delay_ms(),
        timing.low_ms(),
        timing.high_ms()
    );
    println!("panel settle:     {} ms", timing.settle_ms());
    println!("init writes:      {PROGRAM_LEN}");
}
