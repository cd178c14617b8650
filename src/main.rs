//! Flappy Core headless runner
//!
//! Drives a run with simulated frame timing and optional autopilot input.
//! Useful for checking a tuning file before handing it to a front end.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use flappy_core::Tuning;
use flappy_core::sim::{GameEvent, Phase, Run, autopilot};

#[derive(Debug, Parser)]
#[command(name = "flappy-core", version, about = "Headless flappy simulation runner")]
struct Args {
    /// Seed for gap placement
    #[arg(long, default_value_t = 1)]
    seed: u64,
    /// Frames to simulate before stopping
    #[arg(long, default_value_t = 3600)]
    frames: u32,
    /// Simulated frame duration in milliseconds
    #[arg(long, default_value_t = 16)]
    frame_ms: u64,
    /// JSON tuning override
    #[arg(long)]
    tuning: Option<PathBuf>,
    /// Use the score-scaled gravity table
    #[arg(long)]
    arcade: bool,
    /// Print one JSON snapshot per frame
    #[arg(long)]
    json: bool,
    /// Never activate after the start (the entity just falls)
    #[arg(long)]
    no_autopilot: bool,
    /// Print the effective tuning as JSON and exit
    #[arg(long)]
    dump_tuning: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let tuning = match &args.tuning {
        Some(path) => Tuning::load(path)?,
        None if args.arcade => Tuning::arcade(),
        None => Tuning::default(),
    };
    if args.dump_tuning {
        println!("{}", tuning.to_json()?);
        return Ok(());
    }

    let mut run = Run::new(tuning, args.seed)?;
    log::info!("Flappy Core (headless) starting with seed {}", args.seed);

    let frame = Duration::from_millis(args.frame_ms);
    let mut crash = None;
    run.activate();

    for _ in 0..args.frames {
        if !args.no_autopilot && autopilot::should_flap(run.state(), run.tuning()) {
            run.activate();
        }
        run.update(frame);

        for event in run.drain_events() {
            if let GameEvent::Crashed { segment, .. } = event {
                crash = Some(segment);
            }
        }
        if args.json {
            println!("{}", serde_json::to_string(&run.snapshot())?);
        }
        if run.phase() == Phase::Ended {
            break;
        }
    }

    let snap = run.snapshot();
    match crash {
        Some(segment) => println!(
            "Crashed into {:?} segment: score {}, tier {}, {} ticks",
            segment,
            snap.score,
            snap.tier.as_str(),
            snap.time_ticks
        ),
        None => println!(
            "Still flying: score {}, tier {}, {} ticks",
            snap.score,
            snap.tier.as_str(),
            snap.time_ticks
        ),
    }
    Ok(())
}
