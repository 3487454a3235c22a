//! Generation loop - Main simulation driver.
//!
//! Steps every live agent once per tick, prunes obstacles behind the pack and
//! hands finished generations to the evolution engine.

use rayon::prelude::*;

use super::evolution::{EvolutionEngine, EvolutionError, rank};
use super::{DeathCause, Population, TerrainMap};
use crate::schema::{
    Chromosome, Course, CourseError, EvolutionConfig, EvolutionConfigError, EvolutionHistory,
    GENE_COUNT, GenerationSummary,
};

/// Per-tick statistics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickStats {
    /// Tick index within the generation.
    pub tick: u64,
    /// Horizontal speed used on this tick.
    pub speed: u32,
    /// Agents still alive after the tick.
    pub alive: usize,
    /// Obstacles pruned after the tick.
    pub pruned: usize,
}

/// Errors raised while setting up a run.
#[derive(Debug, thiserror::Error)]
pub enum SetupError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] EvolutionConfigError),
    #[error("Invalid course: {0}")]
    Course(#[from] CourseError),
}

/// Drives generations of agents over a course.
pub struct GenerationLoop {
    config: EvolutionConfig,
    course: Course,
    terrain: TerrainMap,
    population: Population,
    engine: EvolutionEngine,
    history: EvolutionHistory,
    /// Ticks elapsed in the current generation.
    tick: u64,
    speed: u32,
}

impl GenerationLoop {
    /// Create a loop over `course` and spawn generation 0.
    pub fn new(config: EvolutionConfig, course: Course) -> Result<Self, EvolutionConfigError> {
        config.validate()?;

        let mut engine = EvolutionEngine::from_config(&config);
        let chromosomes = engine.initial_chromosomes(config.population.size);
        let terrain = TerrainMap::from_course(&course, &config.base_config);
        let population = Population::new(0, &chromosomes, config.base_config.spawn);
        let speed = config.base_config.speed.base;

        let generation_loop = Self {
            config,
            course,
            terrain,
            population,
            engine,
            history: EvolutionHistory::default(),
            tick: 0,
            speed,
        };
        generation_loop.log_population();
        Ok(generation_loop)
    }

    /// Create a loop, loading the configured course file or the bundled course.
    pub fn from_config(config: EvolutionConfig) -> Result<Self, SetupError> {
        let course = match &config.course {
            Some(path) => Course::from_file(path)?,
            None => Course::default(),
        };
        Ok(Self::new(config, course)?)
    }

    pub fn config(&self) -> &EvolutionConfig {
        &self.config
    }

    pub fn population(&self) -> &Population {
        &self.population
    }

    pub fn terrain(&self) -> &TerrainMap {
        &self.terrain
    }

    /// Scores of all finished generations.
    pub fn history(&self) -> &EvolutionHistory {
        &self.history
    }

    /// Current generation number.
    pub fn generation(&self) -> usize {
        self.population.generation()
    }

    /// Ticks elapsed in the current generation.
    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    /// Speed used on the most recent tick.
    pub fn speed(&self) -> u32 {
        self.speed
    }

    /// Whether every agent of the current generation has died.
    pub fn is_generation_over(&self) -> bool {
        self.population.all_dead()
    }

    /// Advance every live agent by one tick.
    ///
    /// Does nothing once the generation is over.
    pub fn tick(&mut self) -> TickStats {
        if self.population.all_dead() {
            return TickStats {
                tick: self.tick,
                speed: self.speed,
                alive: 0,
                pruned: 0,
            };
        }

        self.speed = self.config.base_config.speed.at_tick(self.tick);

        let terrain = &self.terrain;
        let physics = &self.config.base_config.physics;
        let threshold = self.config.prediction_threshold;
        let speed = self.speed;
        let stall_ticks = self.config.base_config.stall_ticks;

        // The map is read-only while agents step, so they are independent
        self.population
            .agents_mut()
            .par_iter_mut()
            .filter(|agent| agent.is_alive())
            .for_each(|agent| {
                agent.step(terrain, speed, physics, threshold);
                if let Some(limit) = stall_ticks
                    && agent.stalled_ticks() >= limit
                {
                    agent.kill(DeathCause::Stalled);
                }
            });

        if let Some(cap) = self.config.base_config.max_generation_ticks
            && self.tick + 1 >= cap
        {
            for agent in self.population.agents_mut() {
                agent.kill(DeathCause::TimedOut);
            }
        }

        self.population.refresh();

        let pruned = self
            .population
            .rearmost_alive_x()
            .map(|x| self.terrain.prune_behind(x))
            .unwrap_or(0);

        let stats = TickStats {
            tick: self.tick,
            speed,
            alive: self.population.alive_count(),
            pruned,
        };
        self.tick += 1;
        stats
    }

    /// Breed and spawn the next generation once every agent has died.
    ///
    /// Returns the finished generation's summary, or `None` while agents are
    /// still alive.
    pub fn evolve(&mut self) -> Result<Option<GenerationSummary>, EvolutionError> {
        if !self.population.all_dead() {
            return Ok(None);
        }

        let offspring = self.engine.next_generation(&self.population)?;
        let summary = self.summarize();

        log::info!(
            "generation {} finished after {} ticks: best={:.3} mean={:.3}",
            summary.generation,
            summary.ticks,
            summary.best_score,
            summary.mean_score
        );

        self.history.push(&summary);
        self.start_generation(summary.generation + 1, &offspring.chromosomes);
        Ok(Some(summary))
    }

    /// Tick until every agent has died, then evolve.
    pub fn run_generation(&mut self) -> Result<GenerationSummary, EvolutionError> {
        loop {
            if let Some(summary) = self.evolve()? {
                return Ok(summary);
            }
            self.tick();
        }
    }

    /// Run `generations` generations, reporting each one.
    pub fn run_with_callback<F>(
        &mut self,
        generations: usize,
        mut callback: F,
    ) -> Result<&EvolutionHistory, EvolutionError>
    where
        F: FnMut(&GenerationSummary),
    {
        for _ in 0..generations {
            let summary = self.run_generation()?;
            callback(&summary);
        }
        Ok(&self.history)
    }

    fn summarize(&self) -> GenerationSummary {
        let scores = self.population.scores();
        let fittest = rank(scores)
            .last()
            .map(|&i| *self.population.agents()[i].chromosome())
            .unwrap_or_else(|| Chromosome::new([0.0; GENE_COUNT]));

        GenerationSummary {
            generation: self.population.generation(),
            best_score: self.population.best_score(),
            mean_score: self.population.mean_score(),
            ticks: self.tick,
            fittest,
        }
    }

    fn start_generation(&mut self, generation: usize, chromosomes: &[Chromosome]) {
        self.terrain = TerrainMap::from_course(&self.course, &self.config.base_config);
        self.population = Population::new(generation, chromosomes, self.config.base_config.spawn);
        self.tick = 0;
        self.speed = self.config.base_config.speed.base;
        self.log_population();
    }

    fn log_population(&self) {
        for agent in self.population.agents() {
            log::debug!(
                "generation {} agent {}: {:?}",
                self.population.generation(),
                agent.label,
                agent.chromosome().genes()
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{PopulationConfig, SimulationConfig};

    fn config(seed: u64) -> EvolutionConfig {
        EvolutionConfig {
            random_seed: Some(seed),
            ..Default::default()
        }
    }

    fn run_to_end(generation_loop: &mut GenerationLoop) -> u64 {
        let mut ticks = 0;
        while !generation_loop.is_generation_over() {
            generation_loop.tick();
            ticks += 1;
            assert!(ticks < 5_000, "generation did not terminate");
        }
        ticks
    }

    #[test]
    fn test_rejects_invalid_config() {
        let config = EvolutionConfig {
            population: PopulationConfig {
                size: 2,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(GenerationLoop::new(config, Course::default()).is_err());
    }

    #[test]
    fn test_initial_generation() {
        let generation_loop = GenerationLoop::new(config(1), Course::default()).unwrap();
        assert_eq!(generation_loop.generation(), 0);
        assert_eq!(generation_loop.population().len(), 10);
        assert_eq!(generation_loop.tick_count(), 0);
        assert_eq!(generation_loop.speed(), 5);
        assert!(!generation_loop.is_generation_over());
    }

    #[test]
    fn test_evolve_waits_for_all_dead() {
        let mut generation_loop = GenerationLoop::new(config(2), Course::default()).unwrap();
        generation_loop.tick();
        assert!(generation_loop.evolve().unwrap().is_none());
        assert_eq!(generation_loop.generation(), 0);
    }

    #[test]
    fn test_generation_terminates_and_evolves() {
        let mut generation_loop = GenerationLoop::new(config(3), Course::default()).unwrap();
        let obstacles = generation_loop.terrain().obstacles().len();
        let ticks = run_to_end(&mut generation_loop);

        // Ticking a finished generation is a no-op
        let stats = generation_loop.tick();
        assert_eq!(stats.alive, 0);
        assert_eq!(generation_loop.tick_count(), ticks);

        let scores = generation_loop.population().scores().to_vec();
        let summary = generation_loop.evolve().unwrap().unwrap();
        assert_eq!(summary.generation, 0);
        assert_eq!(summary.ticks, ticks);
        assert_eq!(summary.best_score, scores.iter().copied().fold(0.0, f32::max));

        assert_eq!(generation_loop.generation(), 1);
        assert_eq!(generation_loop.population().len(), 10);
        assert_eq!(generation_loop.population().alive_count(), 10);
        assert_eq!(generation_loop.tick_count(), 0);
        assert_eq!(generation_loop.terrain().obstacles().len(), obstacles);
        assert_eq!(generation_loop.history().len(), 1);
        for agent in generation_loop.population().agents() {
            assert_eq!((agent.x, agent.y), (10.0, 300.0));
            assert_eq!(agent.score(), 0.0);
            assert_eq!(agent.velocity, 0);
        }
    }

    #[test]
    fn test_population_size_constant() {
        let mut generation_loop = GenerationLoop::new(config(4), Course::default()).unwrap();
        for expected in 1..=3 {
            generation_loop.run_generation().unwrap();
            assert_eq!(generation_loop.generation(), expected);
            assert_eq!(generation_loop.population().len(), 10);
        }
    }

    #[test]
    fn test_tick_cap_kills_everyone() {
        let config = EvolutionConfig {
            base_config: SimulationConfig {
                max_generation_ticks: Some(5),
                ..Default::default()
            },
            random_seed: Some(5),
            ..Default::default()
        };
        let mut generation_loop = GenerationLoop::new(config, Course::default()).unwrap();
        assert_eq!(run_to_end(&mut generation_loop), 5);
        assert!(
            generation_loop
                .population()
                .agents()
                .iter()
                .all(|a| a.death() == Some(DeathCause::TimedOut))
        );
    }

    fn walled_course() -> Course {
        let mut rows = vec!["....#...".to_string(); 8];
        rows.push("########".to_string());
        rows.push("########".to_string());
        Course::parse(&rows.join("\n")).unwrap()
    }

    #[test]
    fn test_walled_course_terminates() {
        let mut generation_loop = GenerationLoop::new(config(9), walled_course()).unwrap();
        let ticks = run_to_end(&mut generation_loop);
        assert!(ticks > 100);

        for agent in generation_loop.population().agents() {
            assert_eq!(agent.x, 199.0);
            assert_eq!(agent.death(), Some(DeathCause::Stalled));
        }
        let summary = generation_loop.run_generation().unwrap();
        assert_eq!(summary.generation, 0);
        assert_eq!(generation_loop.generation(), 1);
    }

    #[test]
    fn test_walled_course_without_stall_limit_keeps_running() {
        let mut config = config(10);
        config.base_config.stall_ticks = None;
        let mut generation_loop = GenerationLoop::new(config, walled_course()).unwrap();
        for _ in 0..500 {
            generation_loop.tick();
        }
        assert_eq!(generation_loop.population().alive_count(), 10);
    }

    #[test]
    fn test_parallel_tick_matches_serial_steps() {
        let config = config(11);
        let physics = config.base_config.physics.clone();
        let threshold = config.prediction_threshold;
        let speeds = config.base_config.speed.clone();
        let mut generation_loop = GenerationLoop::new(config, Course::default()).unwrap();

        for t in 0..60 {
            let terrain = generation_loop.terrain().clone();
            let mut expected = generation_loop.population().agents().to_vec();
            for agent in expected.iter_mut() {
                agent.step(&terrain, speeds.at_tick(t), &physics, threshold);
            }

            generation_loop.tick();
            assert_eq!(generation_loop.population().agents(), expected.as_slice());
        }
    }

    #[test]
    fn test_speed_increases_on_schedule() {
        let mut config = config(6);
        config.base_config.speed.interval = 3;
        let mut generation_loop = GenerationLoop::new(config, Course::default()).unwrap();
        let speeds: Vec<u32> = (0..7).map(|_| generation_loop.tick().speed).collect();
        assert_eq!(speeds, vec![5, 5, 5, 6, 6, 6, 7]);
    }

    #[test]
    fn test_obstacles_pruned_behind_pack() {
        let mut generation_loop = GenerationLoop::new(config(7), Course::default()).unwrap();
        let initial = generation_loop.terrain().obstacles().len();
        let mut pruned = 0;
        while !generation_loop.is_generation_over() {
            pruned += generation_loop.tick().pruned;
            let rearmost = generation_loop.population().rearmost_alive_x();
            if let Some(x) = rearmost {
                for o in generation_loop.terrain().obstacles() {
                    assert!(x <= o.x + o.width() + 100.0);
                }
            }
        }
        assert_eq!(initial - generation_loop.terrain().obstacles().len(), pruned);
    }

    #[test]
    fn test_seeded_runs_are_reproducible() {
        let mut a = GenerationLoop::new(config(8), Course::default()).unwrap();
        let mut b = GenerationLoop::new(config(8), Course::default()).unwrap();
        let ha = a.run_with_callback(3, |_| {}).unwrap().clone();
        let hb = b.run_with_callback(3, |_| {}).unwrap().clone();
        assert_eq!(ha.best_scores, hb.best_scores);
        assert_eq!(a.population().chromosomes(), b.population().chromosomes());
    }

    #[test]
    fn test_from_config_missing_course_file() {
        let config = EvolutionConfig {
            course: Some("/nonexistent/course.txt".into()),
            ..Default::default()
        };
        assert!(matches!(
            GenerationLoop::from_config(config),
            Err(SetupError::Course(CourseError::Io(_)))
        ));
    }
}
