//! Agent physics and per-tick stepping.

use serde::{Deserialize, Serialize};

use super::{TerrainMap, predict};
use crate::schema::{Chromosome, PhysicsConfig};

/// Why an agent died.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeathCause {
    /// Ran into an obstacle.
    Collision,
    /// Fell below the bottom of the map.
    Fell,
    /// Generation hit its tick cap.
    TimedOut,
    /// Blocked by terrain for too long.
    Stalled,
}

/// Coarse animation state for renderers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pose {
    Standing,
    /// Walking animation frame (0 or 1).
    Walking(u8),
    Jumping,
}

/// Ticks each walking frame is shown for.
const WALK_FRAME_TICKS: u64 = 10;

/// Result of a single [`Agent::step`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// Agent was already dead; nothing happened.
    Inactive,
    /// Agent moved and is still alive.
    Moved { jumped: bool },
    /// Agent died this tick.
    Died(DeathCause),
}

/// One simulated creature.
#[derive(Debug, Clone, PartialEq)]
pub struct Agent {
    /// Index within the population, stable for one generation.
    pub label: usize,
    /// Horizontal position in pixels.
    pub x: f32,
    /// Vertical position of the agent's feet in pixels (down is positive).
    pub y: f32,
    /// Vertical velocity in pixels per tick.
    pub velocity: i32,
    alive: bool,
    death: Option<DeathCause>,
    score: f32,
    colliding: bool,
    /// Consecutive ticks without horizontal progress.
    stalled: u64,
    chromosome: Chromosome,
}

impl Agent {
    /// Create a live agent at `spawn`.
    pub fn new(label: usize, spawn: (f32, f32), chromosome: Chromosome) -> Self {
        Self {
            label,
            x: spawn.0,
            y: spawn.1,
            velocity: 0,
            alive: true,
            death: None,
            score: 0.0,
            colliding: false,
            stalled: 0,
            chromosome,
        }
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.alive
    }

    /// Cause of death, `None` while alive.
    pub fn death(&self) -> Option<DeathCause> {
        self.death
    }

    /// Accumulated fitness.
    #[inline]
    pub fn score(&self) -> f32 {
        self.score
    }

    /// Whether the agent touched an obstacle on its last tick.
    pub fn colliding(&self) -> bool {
        self.colliding
    }

    /// Consecutive ticks the agent has been unable to move forward.
    pub fn stalled_ticks(&self) -> u64 {
        self.stalled
    }

    pub fn chromosome(&self) -> &Chromosome {
        &self.chromosome
    }

    /// Kill the agent. Has no effect on an agent that is already dead.
    pub fn kill(&mut self, cause: DeathCause) {
        if self.alive {
            self.alive = false;
            self.death = Some(cause);
            log::trace!(
                "agent {} died ({:?}) at x={} score={:.3}",
                self.label,
                cause,
                self.x,
                self.score
            );
        }
    }

    /// Animation state for the given tick and scroll speed.
    pub fn pose(&self, tick: u64, speed: u32) -> Pose {
        if self.velocity < 0 {
            Pose::Jumping
        } else if speed == 0 {
            Pose::Standing
        } else {
            Pose::Walking(((tick / WALK_FRAME_TICKS) % 2) as u8)
        }
    }

    /// Could the agent move by (dx, dy) without its centre or top entering a solid tile?
    fn would_fit(&self, terrain: &TerrainMap, dx: f32, dy: f32, height: f32) -> bool {
        let x = self.x + dx;
        let y = self.y + dy;
        !terrain.solid(x, y) && !terrain.solid(x, y - height)
    }

    /// Advance the agent by one tick.
    ///
    /// Sensing happens before any movement. A colliding agent dies on the
    /// spot; otherwise it scrolls forward, falls or rises under gravity, may
    /// decide to jump when standing on the ground, and accrues fitness.
    pub fn step(
        &mut self,
        terrain: &TerrainMap,
        speed: u32,
        physics: &PhysicsConfig,
        threshold: f32,
    ) -> StepOutcome {
        if !self.alive {
            return StepOutcome::Inactive;
        }

        let sensing = terrain.sense(self.x, self.y);
        self.colliding = sensing.colliding;
        if sensing.colliding {
            self.kill(DeathCause::Collision);
            return StepOutcome::Died(DeathCause::Collision);
        }

        let height = physics.agent_height;

        let start_x = self.x;
        for _ in 0..speed {
            if !self.would_fit(terrain, 1.0, 0.0, height) {
                break;
            }
            self.x += 1.0;
        }
        if self.x > start_x {
            self.stalled = 0;
        } else {
            self.stalled += 1;
        }

        self.velocity += physics.gravity;

        // Falling stops on the ground, rising stops at a ceiling
        let dy = self.velocity.signum() as f32;
        for _ in 0..self.velocity.unsigned_abs() {
            if !self.would_fit(terrain, 0.0, dy, height) {
                self.velocity = 0;
                break;
            }
            self.y += dy;
        }

        if self.y >= terrain.pixel_height() {
            self.kill(DeathCause::Fell);
            return StepOutcome::Died(DeathCause::Fell);
        }

        let mut jumped = false;
        if self.y == physics.ground_y {
            let nearest = sensing.nearest;
            if predict(
                nearest.distance,
                speed as f32,
                nearest.width,
                &self.chromosome,
                threshold,
            ) && terrain.solid(self.x, self.y + 1.0)
            {
                self.velocity = physics.jump_impulse;
                jumped = true;
            }
        }

        self.score += self.x / 1000.0;

        StepOutcome::Moved { jumped }
    }
}
