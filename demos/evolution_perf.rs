//! Quick evolution performance test

use dino_evolve::{
    GenerationLoop,
    schema::{Course, EvolutionConfig, MutationConfig, PopulationConfig},
};
use std::time::Instant;

fn main() {
    println!("=== Evolution Performance Test ===\n");

    // Compare prediction thresholds with and without mutation
    for threshold in [0.45, 0.55, 0.7] {
        for mutate in [true, false] {
            println!("Threshold: {}, mutation: {}", threshold, mutate);

            let config = EvolutionConfig {
                prediction_threshold: threshold,
                mutation: MutationConfig {
                    enabled: mutate,
                    ..Default::default()
                },
                random_seed: Some(42),
                ..Default::default()
            };

            let start = Instant::now();
            let mut generation_loop = match GenerationLoop::new(config, Course::default()) {
                Ok(generation_loop) => generation_loop,
                Err(e) => {
                    eprintln!("Invalid configuration: {}", e);
                    return;
                }
            };

            let mut total_ticks = 0;
            let history = match generation_loop.run_with_callback(20, |s| total_ticks += s.ticks) {
                Ok(history) => history,
                Err(e) => {
                    eprintln!("Evolution failed: {}", e);
                    return;
                }
            };
            let elapsed = start.elapsed();

            let first = history.best_scores.first().copied().unwrap_or(0.0);
            let last = history.best_scores.last().copied().unwrap_or(0.0);

            println!("  Generations:    {}", history.len());
            println!("  Ticks:          {}", total_ticks);
            println!("  Elapsed:        {:.2}s", elapsed.as_secs_f64());
            println!(
                "  Ticks/sec:      {:.1}",
                total_ticks as f64 / elapsed.as_secs_f64()
            );
            println!("  Best (first):   {:.3}", first);
            println!("  Best (last):    {:.3}", last);
            println!("  Best overall:   {:.3}", history.overall_best().unwrap_or(0.0));
            println!();
        }
    }

    println!("=== Scalability Test (default course) ===\n");

    // Test different population sizes
    for pop_size in [10, 100, 1000] {
        let config = EvolutionConfig {
            population: PopulationConfig {
                size: pop_size,
                ..Default::default()
            },
            random_seed: Some(42),
            ..Default::default()
        };

        let Ok(mut generation_loop) = GenerationLoop::new(config, Course::default()) else {
            eprintln!("Invalid configuration for population {}", pop_size);
            continue;
        };

        let start = Instant::now();
        let mut ticks = 0u64;
        while !generation_loop.is_generation_over() {
            generation_loop.tick();
            ticks += 1;
        }
        let elapsed = start.elapsed();

        println!(
            "Population {}: {} ticks in {:.3}s ({:.1} agent-ticks/sec)",
            pop_size,
            ticks,
            elapsed.as_secs_f64(),
            (ticks * pop_size as u64) as f64 / elapsed.as_secs_f64()
        );
    }
}
