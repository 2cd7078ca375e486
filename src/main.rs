use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use colored::Colorize;
use log::*;

use shared_types::FlightPhase;
use telemetry::{link, DOWNLINK_SCHEMA};

use carm::ground::*;
use carm::replay::*;
use carm::settings::AppSettings;

#[derive(Debug, Parser)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    /// Use this config file instead of the one in the user config directory
    #[clap(long, global = true)]
    settings: Option<PathBuf>,
    #[clap(subcommand)]
    command: CliCommand,
}

#[derive(Debug, Clone, Subcommand)]
enum CliCommand {
    /// Run a recorded sensor log through the flight computer
    Replay {
        input: PathBuf,
        #[clap(long, help = "Write the decoded downlink as JSON lines")]
        json: Option<PathBuf>,
        #[clap(long, help = "Write the estimator output as CSV")]
        csv: Option<PathBuf>,
    },
    /// Decode a telemetry message given as hex words
    Decode {
        #[clap(short = 'p', long, help = "Phase to decode as, instead of the one in the first word")]
        phase: Option<u8>,
        #[clap(required = true)]
        words: Vec<String>,
    },
    /// Check and decode a received radio frame given as hex bytes
    Unframe { bytes: Vec<String> },
    /// List the downlink message layouts
    Schema {
        #[clap(short = 'v', help = "Show every field")]
        verbose: bool,
    },
    /// Write the default config file
    InitSettings {
        #[clap(short = 'f', help = "Always overwrite existing file")]
        force: bool,
    },
}

fn phase_color(phase: FlightPhase) -> &'static str {
    match phase {
        FlightPhase::PowerOn | FlightPhase::LaunchReady => "bright blue",
        FlightPhase::PoweredFlight | FlightPhase::Burnout | FlightPhase::Coast => "bright red",
        FlightPhase::Apogee => "bright purple",
        FlightPhase::DrogueDeployed | FlightPhase::MainDeployAttempt | FlightPhase::MainDeployed => "bright yellow",
        FlightPhase::Recovery => "bright green",
    }
}

fn replay_log(
    settings: &AppSettings,
    input: PathBuf,
    json: Option<PathBuf>,
    csv: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut sensors = ReplaySensors::open(&input)?;
    info!("Loaded {} samples from {:?}", sensors.remaining(), input);

    let mut json = json.map(File::create).transpose()?.map(BufWriter::new);
    let mut csv = csv.map(File::create).transpose()?.map(EstimateWriter::new);

    let summary = replay(&settings.flight, &mut sensors, |record| {
        if let Some(out) = json.as_mut() {
            let words = telemetry::encode(record.phase, record)?;
            let decoded = telemetry::decode(record.phase, &words)?;
            serde_json::to_writer(&mut *out, &decoded)?;
            out.write_all(b"\n")?;
        }

        if let Some(out) = csv.as_mut() {
            out.write(record)?;
        }

        Ok(())
    })?;

    for transition in &summary.transitions {
        println!(
            "[{:>8.3}] {} -> {} at {:.1}m",
            (transition.time as f32) / 1_000.0,
            transition.from.label(),
            transition.to.label().color(phase_color(transition.to)).bold(),
            transition.altitude
        );
    }

    for channel in &summary.fired {
        println!("{} {:?}", "Fired".bright_red().bold(), channel);
    }

    println!(
        "{} cycles, final phase {}",
        summary.cycles,
        summary.final_phase.label().color(phase_color(summary.final_phase)).bold()
    );

    if let Some(out) = json.as_mut() {
        out.flush()?;
    }
    if let Some(out) = csv {
        out.into_inner()?.flush()?;
    }

    Ok(())
}

fn decode_hex_words(phase: Option<u8>, words: Vec<String>) -> Result<(), Box<dyn std::error::Error>> {
    let words = parse_words(&words)?;
    let decoded = decode_words(phase, &words)?;
    println!("{}", serde_json::to_string_pretty(&decoded)?);
    Ok(())
}

fn unframe(bytes: Vec<String>) -> Result<(), Box<dyn std::error::Error>> {
    let bytes = parse_bytes(&bytes.join(""))?;
    let words = link::unframe(&bytes)?;
    let hex: Vec<String> = words.iter().map(|w| format!("{:016x}", w)).collect();
    println!("{} {}", "FCS ok".bright_green().bold(), hex.join(" "));

    let decoded = telemetry::decode_any(&words)?;
    println!("{}", serde_json::to_string_pretty(&decoded)?);
    Ok(())
}

fn schema(verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    println!("Downlink revision {}", DOWNLINK_SCHEMA.revision);

    for phase in FlightPhase::ALL {
        let message = DOWNLINK_SCHEMA.message(phase);
        println!(
            "{:>2} {:<20} {:>2} fields {:>3} bits {} words",
            phase as u8,
            phase.label().color(phase_color(phase)).bold(),
            message.len(),
            message.bits(),
            message.word_count()
        );

        if verbose {
            for (field, repr) in message.0 {
                println!("     {:<28} {:>2} bits", field.to_string(), repr.bits());
            }
        }
    }

    Ok(())
}

fn init_settings(path: Option<PathBuf>, force: bool) -> Result<(), Box<dyn std::error::Error>> {
    let path = match path {
        Some(path) => path,
        None => AppSettings::default_path()?,
    };

    if path.exists() && !force {
        return Err(format!("{:?} already exists. Use -f to overwrite.", path).into());
    }

    AppSettings::default().save_to(&path)?;
    println!("Wrote {:?}", path);
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::new()
        .filter_level(LevelFilter::Info)
        .parse_default_env()
        .init();

    let args = Cli::parse();
    match args.command {
        CliCommand::Replay { input, json, csv } => {
            let settings = AppSettings::load(args.settings.as_deref())?;
            replay_log(&settings, input, json, csv)
        }
        CliCommand::Decode { phase, words } => decode_hex_words(phase, words),
        CliCommand::Unframe { bytes } => unframe(bytes),
        CliCommand::Schema { verbose } => schema(verbose),
        CliCommand::InitSettings { force } => init_settings(args.settings, force),
    }
}
