use clap::{Parser, Subcommand};
use glam::Vec2;
use noneuclid_common::Pose;
use noneuclid_kernel::{Flight, FlightConfig};
use noneuclid_render::{DebugTextRenderer, RenderView, Renderer};
use noneuclid_tools::{PoseInspector, PoseSummary};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

mod drift;

#[derive(Parser)]
#[command(name = "noneuclid-cli", about = "Headless driver for the sphere/cylinder flight")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version, defaults and the starting pose
    Info,
    /// Hold one movement direction for a number of ticks
    Fly {
        /// Intent along the right column
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        vx: f32,
        /// Intent along the forward column (negative moves toward the view)
        #[arg(long, default_value = "-1", allow_hyphen_values = true)]
        vz: f32,
        /// Number of 20 ms ticks
        #[arg(short, long, default_value = "50")]
        ticks: u64,
        /// Movement speed in units per second
        #[arg(long)]
        speed: Option<f32>,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Random look/move soak reporting frame drift
    Drift {
        #[arg(short, long, default_value = "10000")]
        steps: u64,
        #[arg(long, default_value = "42")]
        seed: u64,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Serialize)]
struct FlyReport {
    ticks: u64,
    crossings: u64,
    travelled: f32,
    pose: Pose,
    summary: PoseSummary,
}

fn fly(vx: f32, vz: f32, ticks: u64, speed: Option<f32>) -> anyhow::Result<FlyReport> {
    let mut config = FlightConfig::default();
    if let Some(speed) = speed {
        config.move_speed = speed;
    }
    let mut flight = Flight::new(config)?;
    let intent = Vec2::new(vx, vz);
    let mut crossings = 0;
    let mut travelled = 0.0;
    for _ in 0..ticks {
        if let Some(report) = flight.tick(intent) {
            crossings += u64::from(report.crossings);
            travelled += report.travelled;
        }
    }
    Ok(FlyReport {
        ticks: flight.ticks(),
        crossings,
        travelled,
        pose: *flight.pose(),
        summary: PoseInspector::summary(flight.pose()),
    })
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    let renderer = DebugTextRenderer::new();
    let view = RenderView::default();

    match cli.command {
        Commands::Info => {
            let config = FlightConfig::default();
            println!("noneuclid-cli v{}", env!("CARGO_PKG_VERSION"));
            println!(
                "defaults: speed={} units/s tick={:?} arc/tick={} sensitivity={} max_crossings={}",
                config.move_speed,
                config.tick_interval,
                config.arc_per_tick(),
                config.mouse_sensitivity,
                config.max_crossings
            );
            print!("{}", renderer.render(&Pose::INITIAL, &view));
        }
        Commands::Fly {
            vx,
            vz,
            ticks,
            speed,
            json,
        } => {
            let report = fly(vx, vz, ticks, speed)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!(
                    "Flew {} ticks: travelled={:.4} crossings={}",
                    report.ticks, report.travelled, report.crossings
                );
                print!("{}", renderer.render(&report.pose, &view));
                println!("{}", report.summary);
            }
        }
        Commands::Drift { steps, seed, json } => {
            let report = drift::run(steps, seed, FlightConfig::default())?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!(
                    "Drift soak: steps={} seed={} crossings={} capped={}",
                    report.steps, report.seed, report.crossings, report.capped_steps
                );
                println!("Worst residual: {:.3e}", report.worst_residual);
                println!("{}", report.last);
            }
        }
    }

    Ok(())
}
