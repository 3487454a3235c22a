//! Dino Evolve CLI - Run headless evolution from JSON configuration.

use std::fs;
use std::path::Path;
use std::time::Instant;

use dino_evolve::{EvolutionConfig, GenerationLoop, compute::evolution::ScoreReport};

const DEFAULT_GENERATIONS: usize = 100;

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.get(1).is_some_and(|a| a == "--help" || a == "-h") {
        print_usage(&args[0]);
        return;
    }

    if args.get(1).is_some_and(|a| a == "--example") {
        print_example_config();
        return;
    }

    let config: EvolutionConfig = match args.get(1) {
        Some(path) => load_config(Path::new(path)),
        None => EvolutionConfig::default(),
    };

    let generations = match args.get(2) {
        Some(s) => s.parse().unwrap_or_else(|e| {
            eprintln!("Invalid generation count '{}': {}", s, e);
            print_usage(&args[0]);
            std::process::exit(1);
        }),
        None => config
            .population
            .max_generations
            .unwrap_or(DEFAULT_GENERATIONS),
    };

    let mut report = ScoreReport::from_config(&config);

    let mut generation_loop = GenerationLoop::from_config(config).unwrap_or_else(|e| {
        eprintln!("Error setting up run: {}", e);
        std::process::exit(1);
    });

    let config = generation_loop.config();
    let terrain = generation_loop.terrain();
    println!("Dino Evolve");
    println!("===========");
    println!(
        "Course: {}x{} tiles ({} obstacles)",
        terrain.width(),
        terrain.height(),
        terrain.obstacles().len()
    );
    println!("Population: {}", config.population.size);
    println!("Prediction threshold: {}", config.prediction_threshold);
    println!(
        "Mutation: {} (p={})",
        config.mutation.enabled, config.mutation.probability
    );
    println!("Generations: {}", generations);
    println!("Report: {}", report.path().display());
    println!();

    let start = Instant::now();

    for _ in 0..generations {
        let summary = generation_loop.run_generation().unwrap_or_else(|e| {
            eprintln!("Error evolving population: {}", e);
            std::process::exit(1);
        });

        println!(
            "  Generation {}: best={:.3} mean={:.3} ticks={} fittest={:?}",
            summary.generation,
            summary.best_score,
            summary.mean_score,
            summary.ticks,
            summary.fittest.genes()
        );

        if let Err(e) = report.record(summary.best_score, summary.generation, start.elapsed()) {
            eprintln!("Error writing report {}: {}", report.path().display(), e);
            std::process::exit(1);
        }
    }

    let history = generation_loop.history();
    let elapsed = start.elapsed();
    println!();
    if let Some(best) = history.overall_best() {
        println!("Best score: {:.3}", best);
    }
    if !report.is_started() {
        println!(
            "Report not written: run ended before the {:.0}s sampling period",
            generation_loop.config().report.sampling_secs
        );
    }
    println!(
        "Time: {:.2}s ({:.1} generations/s)",
        elapsed.as_secs_f32(),
        generations as f32 / elapsed.as_secs_f32()
    );
}

fn load_config(path: &Path) -> EvolutionConfig {
    let config_str = fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Error reading config file: {}", e);
        std::process::exit(1);
    });

    serde_json::from_str(&config_str).unwrap_or_else(|e| {
        eprintln!("Error parsing config: {}", e);
        std::process::exit(1);
    })
}

fn print_usage(program: &str) {
    eprintln!("Usage: {} [config.json] [generations]", program);
    eprintln!();
    eprintln!("Evolve jumping agents on an obstacle course.");
    eprintln!();
    eprintln!("Arguments:");
    eprintln!("  config.json  Path to evolution configuration file (default: built-in)");
    eprintln!(
        "  generations  Number of generations (default: population.max_generations or {})",
        DEFAULT_GENERATIONS
    );
    eprintln!();
    eprintln!("Example configuration is generated with --example flag.");
}

fn print_example_config() {
    let config = EvolutionConfig::default();

    println!("Example configuration (config.json):");
    match serde_json::to_string_pretty(&config) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Error serializing config: {}", e);
            std::process::exit(1);
        }
    }
}
