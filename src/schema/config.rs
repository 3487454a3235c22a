//! Configuration types for the obstacle course simulation.

use serde::{Deserialize, Serialize};

/// Top-level simulation configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Tile edge length in pixels.
    #[serde(default = "default_tile_size")]
    pub tile_size: f32,
    /// Position every agent starts a generation at.
    #[serde(default = "default_spawn")]
    pub spawn: (f32, f32),
    /// Gravity, jumping and body geometry.
    #[serde(default)]
    pub physics: PhysicsConfig,
    /// Horizontal scroll speed schedule.
    #[serde(default)]
    pub speed: SpeedConfig,
    /// Obstacle collision geometry.
    #[serde(default)]
    pub obstacles: ObstacleConfig,
    /// Hard cap on ticks per generation. Remaining agents are killed when hit.
    #[serde(default)]
    pub max_generation_ticks: Option<u64>,
    /// Agents that make no horizontal progress for this many consecutive
    /// ticks are killed. `None` disables the check.
    #[serde(default = "default_stall_ticks")]
    pub stall_ticks: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            tile_size: default_tile_size(),
            spawn: default_spawn(),
            physics: PhysicsConfig::default(),
            speed: SpeedConfig::default(),
            obstacles: ObstacleConfig::default(),
            max_generation_ticks: None,
            stall_ticks: default_stall_ticks(),
        }
    }
}

fn default_tile_size() -> f32 {
    50.0
}
fn default_spawn() -> (f32, f32) {
    (10.0, 300.0)
}
fn default_stall_ticks() -> Option<u64> {
    Some(100)
}

/// Agent physics parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Added to vertical velocity every tick.
    pub gravity: i32,
    /// Vertical velocity set when jumping (negative is up).
    pub jump_impulse: i32,
    /// Resting y of an agent standing on the course floor.
    pub ground_y: f32,
    /// Distance from an agent's feet to the top of its body.
    pub agent_height: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: 1,
            jump_impulse: -20,
            ground_y: 399.0,
            agent_height: 45.0,
        }
    }
}

/// Horizontal speed schedule.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeedConfig {
    /// Pixels per tick at the start of a generation.
    pub base: u32,
    /// Added to the speed every `interval` ticks.
    pub increment: u32,
    /// Ticks between speed increments.
    pub interval: u64,
}

impl Default for SpeedConfig {
    fn default() -> Self {
        Self {
            base: 5,
            increment: 1,
            interval: 500,
        }
    }
}

impl SpeedConfig {
    /// Speed in effect on the given tick of a generation.
    pub fn at_tick(&self, tick: u64) -> u32 {
        let steps = tick / self.interval;
        self.base
            .saturating_add(self.increment.saturating_mul(steps.min(u32::MAX as u64) as u32))
    }
}

/// Obstacle geometry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ObstacleConfig {
    /// Width of a narrow obstacle.
    pub narrow_width: f32,
    /// Width of a wide obstacle.
    pub wide_width: f32,
    /// Distance past a narrow obstacle's far side before it is pruned.
    pub narrow_prune_margin: f32,
    /// Distance past a wide obstacle's far side before it is pruned.
    pub wide_prune_margin: f32,
    /// Collision band extends this far in front of the obstacle.
    pub collision_lead: f32,
    /// Collision band half-height around the obstacle's y.
    pub collision_half_height: f32,
}

impl Default for ObstacleConfig {
    fn default() -> Self {
        Self {
            narrow_width: 35.0,
            wide_width: 60.0,
            narrow_prune_margin: 50.0,
            wide_prune_margin: 100.0,
            collision_lead: 15.0,
            collision_half_height: 24.0,
        }
    }
}

impl SimulationConfig {
    /// Validate configuration parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tile_size.is_nan() || self.tile_size <= 0.0 {
            return Err(ConfigError::InvalidTileSize(self.tile_size));
        }
        if self.physics.gravity <= 0 {
            return Err(ConfigError::InvalidGravity(self.physics.gravity));
        }
        if self.physics.jump_impulse >= 0 {
            return Err(ConfigError::InvalidJumpImpulse(self.physics.jump_impulse));
        }
        if self.speed.interval == 0 {
            return Err(ConfigError::InvalidSpeedInterval);
        }
        if [self.obstacles.narrow_width, self.obstacles.wide_width]
            .iter()
            .any(|w| w.is_nan() || *w <= 0.0)
        {
            return Err(ConfigError::InvalidObstacleWidth);
        }
        if self.stall_ticks == Some(0) {
            return Err(ConfigError::InvalidStallTicks);
        }
        Ok(())
    }
}

/// Configuration validation errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Tile size must be positive, got {0}")]
    InvalidTileSize(f32),
    #[error("Gravity must be positive, got {0}")]
    InvalidGravity(i32),
    #[error("Jump impulse must be negative (upwards), got {0}")]
    InvalidJumpImpulse(i32),
    #[error("Speed increment interval must be non-zero")]
    InvalidSpeedInterval,
    #[error("Obstacle widths must be positive")]
    InvalidObstacleWidth,
    #[error("Stall limit must be at least one tick")]
    InvalidStallTicks,
}
