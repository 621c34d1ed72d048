//! Skyprint CLI - headless driver for the firework engine

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{init, simulate, validate};

#[derive(Parser)]
#[command(name = "skyprint")]
#[command(about = "Paint a pattern, launch it, watch it reform in the sky", long_about = None)]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a sample firework config and pattern into a new directory
    Init {
        /// Directory to create
        dir: String,
    },

    /// Load a firework config, report clamped values, and print its phases
    Validate {
        /// Path to firework config (TOML)
        config: String,
    },

    /// Launch one firework headlessly and report its frames
    Simulate {
        /// Path to pattern file (TOML)
        pattern: String,

        /// Path to firework config (TOML); built-in defaults when omitted
        #[arg(long)]
        config: Option<String>,

        /// Spawn position (comma-separated x,y,z)
        #[arg(long, value_parser = parse_vec3, default_value = "0,10,0")]
        spawn: [f32; 3],

        /// Simulation steps per second
        #[arg(long, default_value = "60")]
        fps: f64,

        /// Random seed for burst directions and debris colors
        #[arg(long, default_value = "1")]
        seed: u64,

        /// Sample a frame every N steps
        #[arg(long, default_value = "30")]
        every: u64,

        /// Output format (text or json)
        #[arg(long, default_value = "text", value_parser = parse_format)]
        format: String,

        /// Pace steps against the wall clock instead of running flat out
        #[arg(long)]
        realtime: bool,
    },
}

fn parse_format(s: &str) -> Result<String, String> {
    match s {
        "text" | "json" => Ok(s.to_string()),
        _ => Err(format!("unknown format '{}'; valid values: text, json", s)),
    }
}

fn parse_vec3(s: &str) -> Result<[f32; 3], String> {
    let parts: Vec<&str> = s.split(',').collect();
    if parts.len() != 3 {
        return Err(format!("expected 3 comma-separated values, got {}", parts.len()));
    }
    let x: f32 = parts[0].trim().parse().map_err(|e| format!("invalid x: {}", e))?;
    let y: f32 = parts[1].trim().parse().map_err(|e| format!("invalid y: {}", e))?;
    let z: f32 = parts[2].trim().parse().map_err(|e| format!("invalid z: {}", e))?;
    Ok([x, y, z])
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    match cli.command {
        Commands::Init { dir } => init::run(&dir),
        Commands::Validate { config } => validate::run(&config),
        Commands::Simulate {
            pattern,
            config,
            spawn,
            fps,
            seed,
            every,
            format,
            realtime,
        } => simulate::run(simulate::SimulateArgs {
            pattern,
            config,
            spawn,
            fps,
            seed,
            every,
            format,
            realtime,
        }),
    }
}
