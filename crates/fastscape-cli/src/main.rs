//! CLI front end: argument parsing, the stdout banner, the seeded initial
//! grid, the step driver loop, progress/timing output, and the ASCII
//! raster writer. Everything here is a collaborator the core pipeline
//! (`fastscape_core`) is deliberately ignorant of.

mod args;
mod raster;
mod rng;
mod timing;

use std::time::Instant;

use anyhow::Result;
use fastscape_core::grid::{ModelParams, SimState};
use timing::Timers;

fn main() {
    let argv: Vec<String> = std::env::args().collect();
    let args = match args::parse(&argv) {
        Ok(args) => args,
        Err(message) => {
            eprintln!("{message}");
            std::process::exit(1);
        }
    };

    if let Err(err) = run(args) {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

fn run(args: args::Args) -> Result<()> {
    let total_start = Instant::now();
    let mut timers = Timers::new();

    println!("A FastScape RB+GPU");
    println!("C Richard Barnes TODO");
    println!("h git_hash    = {}", env!("GIT_HASH"));
    println!("m Random seed = {}", args.seed);

    let mut state = SimState::new(args.dimension, args.dimension);
    timers.time("init", || {
        rng::fill_initial_grid(&mut state, args.seed);
    });

    let params = ModelParams::default();
    timers.time("steps", || {
        fastscape_core::step::run(&mut state, &params, args.steps, |n| {
            println!("p Step = {n}");
        });
    });

    timers.time("write", || raster::write_ascii_raster(&args.output_path, &state))?;

    timers.record("total", total_start.elapsed());
    timers.report();

    Ok(())
}
