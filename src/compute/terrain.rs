//! Terrain map: static tile grid plus the active obstacle list.
//!
//! Queries never mutate the map. Obstacles left behind by every agent are
//! removed by a separate [`TerrainMap::prune_behind`] call once per tick.

use crate::schema::{Course, CourseCell, ObstacleConfig, ObstacleKind, SimulationConfig};

/// An obstacle on the course.
#[derive(Debug, Clone, PartialEq)]
pub struct Obstacle {
    /// Horizontal position in pixels.
    pub x: f32,
    /// Vertical position in pixels.
    pub y: f32,
    kind: ObstacleKind,
    width: f32,
}

impl Obstacle {
    /// Create an obstacle whose width follows its kind.
    pub fn new(kind: ObstacleKind, x: f32, y: f32, geometry: &ObstacleConfig) -> Self {
        let width = match kind {
            ObstacleKind::Narrow => geometry.narrow_width,
            ObstacleKind::Wide => geometry.wide_width,
        };
        Self { x, y, kind, width }
    }

    #[inline]
    pub fn kind(&self) -> ObstacleKind {
        self.kind
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.width
    }
}

/// Signed distance to the nearest obstacle and that obstacle's width.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObstacleDistance {
    pub distance: f32,
    pub width: f32,
}

impl ObstacleDistance {
    /// No obstacle left on the course.
    pub const NONE: Self = Self {
        distance: f32::INFINITY,
        width: 0.0,
    };

    #[inline]
    pub fn is_none(&self) -> bool {
        self.distance.is_infinite()
    }
}

/// What an agent perceives at its position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sensing {
    /// Agent is inside an obstacle's collision band.
    pub colliding: bool,
    /// Nearest obstacle reading.
    pub nearest: ObstacleDistance,
}

/// Tile grid and obstacles for one generation.
#[derive(Debug, Clone)]
pub struct TerrainMap {
    width: usize,
    height: usize,
    tile_size: f32,
    /// Row-major solidity.
    tiles: Vec<bool>,
    obstacles: Vec<Obstacle>,
    geometry: ObstacleConfig,
}

impl TerrainMap {
    /// Build the map from a course. Obstacles sit at the centre of their cell.
    pub fn from_course(course: &Course, config: &SimulationConfig) -> Self {
        let width = course.width();
        let height = course.height();
        let tile_size = config.tile_size;

        let mut tiles = vec![false; width * height];
        for row in 0..height {
            for column in 0..width {
                tiles[row * width + column] = course.cell(column, row) == Some(CourseCell::Solid);
            }
        }

        let half = tile_size / 2.0;
        let obstacles = course
            .obstacle_spawns()
            .map(|(column, row, kind)| {
                Obstacle::new(
                    kind,
                    column as f32 * tile_size + half,
                    row as f32 * tile_size + half,
                    &config.obstacles,
                )
            })
            .collect();

        Self {
            width,
            height,
            tile_size,
            tiles,
            obstacles,
            geometry: config.obstacles.clone(),
        }
    }

    /// Width in tiles.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height in tiles.
    pub fn height(&self) -> usize {
        self.height
    }

    pub fn tile_size(&self) -> f32 {
        self.tile_size
    }

    /// Height of the map in pixels.
    pub fn pixel_height(&self) -> f32 {
        self.height as f32 * self.tile_size
    }

    /// Width of the map in pixels.
    pub fn pixel_width(&self) -> f32 {
        self.width as f32 * self.tile_size
    }

    /// Whether the tile at (column, row) is solid. Outside the grid is open.
    pub fn tile(&self, column: usize, row: usize) -> bool {
        column < self.width && row < self.height && self.tiles[row * self.width + column]
    }

    /// Active obstacles.
    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    /// Place an additional obstacle.
    pub fn add_obstacle(&mut self, kind: ObstacleKind, x: f32, y: f32) {
        self.obstacles
            .push(Obstacle::new(kind, x, y, &self.geometry));
    }

    /// Whether the pixel at (x, y) lies on a solid tile.
    ///
    /// Pixels above the map (`y < 0`) and outside its horizontal bounds are open.
    pub fn solid(&self, x: f32, y: f32) -> bool {
        if y < 0.0 || x < 0.0 || !x.is_finite() || !y.is_finite() {
            return false;
        }
        let column = (x / self.tile_size) as usize;
        let row = (y / self.tile_size) as usize;
        self.tile(column, row)
    }

    /// Minimum signed distance from `x` to an obstacle, with that obstacle's width.
    pub fn nearest_obstacle(&self, x: f32) -> ObstacleDistance {
        self.obstacles
            .iter()
            .map(|o| ObstacleDistance {
                distance: o.x - x - o.width,
                width: o.width,
            })
            .min_by(|a, b| a.distance.total_cmp(&b.distance))
            .unwrap_or(ObstacleDistance::NONE)
    }

    /// Whether the point lies in any obstacle's collision band.
    pub fn is_colliding(&self, x: f32, y: f32) -> bool {
        let lead = self.geometry.collision_lead;
        let half_height = self.geometry.collision_half_height;
        self.obstacles.iter().any(|o| {
            (o.x - lead..=o.x + 2.0 * o.width).contains(&x)
                && (o.y - half_height..=o.y + half_height).contains(&y)
        })
    }

    /// Collision and distance readings at a point.
    pub fn sense(&self, x: f32, y: f32) -> Sensing {
        Sensing {
            colliding: self.is_colliding(x, y),
            nearest: self.nearest_obstacle(x),
        }
    }

    /// Remove obstacles that `x` has passed by more than their prune margin.
    ///
    /// Returns how many were removed. Callers pass the rearmost live agent's x
    /// so only obstacles behind every agent go.
    pub fn prune_behind(&mut self, x: f32) -> usize {
        let before = self.obstacles.len();
        let geometry = &self.geometry;
        self.obstacles
            .retain(|o| x <= o.x + o.width + prune_margin(o.kind, geometry));
        before - self.obstacles.len()
    }
}

fn prune_margin(kind: ObstacleKind, geometry: &ObstacleConfig) -> f32 {
    match kind {
        ObstacleKind::Narrow => geometry.narrow_prune_margin,
        ObstacleKind::Wide => geometry.wide_prune_margin,
    }
}
