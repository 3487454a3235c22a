//! Population: one generation of agents and their running scores.

use super::Agent;
use crate::schema::Chromosome;

/// Agents of one generation.
#[derive(Debug, Clone)]
pub struct Population {
    generation: usize,
    agents: Vec<Agent>,
    /// Number of dead agents as of the last [`Population::refresh`].
    death_count: usize,
    /// Last known score of each agent.
    scores: Vec<f32>,
}

impl Population {
    /// Spawn one live agent per chromosome, labelled by position.
    pub fn new(generation: usize, chromosomes: &[Chromosome], spawn: (f32, f32)) -> Self {
        let agents: Vec<Agent> = chromosomes
            .iter()
            .enumerate()
            .map(|(label, chromosome)| Agent::new(label, spawn, *chromosome))
            .collect();
        let scores = vec![0.0; agents.len()];

        Self {
            generation,
            agents,
            death_count: 0,
            scores,
        }
    }

    #[inline]
    pub fn generation(&self) -> usize {
        self.generation
    }

    /// Number of agents.
    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub(crate) fn agents_mut(&mut self) -> &mut [Agent] {
        &mut self.agents
    }

    /// Number of dead agents as of the last refresh.
    pub fn death_count(&self) -> usize {
        self.death_count
    }

    /// Number of live agents as of the last refresh.
    pub fn alive_count(&self) -> usize {
        self.agents.len() - self.death_count
    }

    /// Whether every agent has died.
    pub fn all_dead(&self) -> bool {
        self.death_count == self.agents.len()
    }

    /// Per-agent scores as of the last refresh.
    pub fn scores(&self) -> &[f32] {
        &self.scores
    }

    /// Highest score in the generation.
    pub fn best_score(&self) -> f32 {
        self.scores.iter().copied().fold(0.0, f32::max)
    }

    /// Mean score across the generation.
    pub fn mean_score(&self) -> f32 {
        if self.scores.is_empty() {
            return 0.0;
        }
        self.scores.iter().sum::<f32>() / self.scores.len() as f32
    }

    /// Chromosomes in label order.
    pub fn chromosomes(&self) -> Vec<Chromosome> {
        self.agents.iter().map(|a| *a.chromosome()).collect()
    }

    /// Smallest x among live agents.
    pub fn rearmost_alive_x(&self) -> Option<f32> {
        self.agents
            .iter()
            .filter(|a| a.is_alive())
            .map(|a| a.x)
            .reduce(f32::min)
    }

    /// Recount deaths and copy agents' scores.
    pub fn refresh(&mut self) {
        for (agent, score) in self.agents.iter().zip(self.scores.iter_mut()) {
            *score = agent.score();
        }
        self.death_count = self.agents.iter().filter(|a| !a.is_alive()).count();
    }
}
