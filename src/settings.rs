use crate::maze::CELL_SIZE;
use serde::{Deserialize, Serialize};

/// World-space canvas the default grid is laid out on
pub const CANVAS_WIDTH: f32 = 1000.0;
pub const CANVAS_HEIGHT: f32 = 800.0;

pub const MIN_PARTICLES: usize = 300;
pub const MAX_PARTICLES: usize = 10_000;
pub const PARTICLE_STEP: usize = 50;

pub const MIN_SPEED: u32 = 1;
pub const MAX_SPEED: u32 = 10;

pub const MAX_GRID_DIM: usize = 100;

/// Grid shape and randomness for maze generation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MazeSettings {
    /// Number of columns (1-100)
    pub cols: usize,
    /// Number of rows (1-100)
    pub rows: usize,
    /// Fixed RNG seed; `None` draws from entropy
    pub seed: Option<u64>,
    /// Carve one step per tick instead of all at once
    pub animate: bool,
}

impl Default for MazeSettings {
    fn default() -> Self {
        Self {
            cols: (CANVAS_WIDTH / CELL_SIZE) as usize,
            rows: (CANVAS_HEIGHT / CELL_SIZE) as usize,
            seed: None,
            animate: false,
        }
    }
}

impl MazeSettings {
    /// Returns whether the value changed
    pub fn set_cols(&mut self, cols: usize) -> bool {
        let before = self.cols;
        self.cols = cols.clamp(1, MAX_GRID_DIM);
        self.cols != before
    }

    /// Returns whether the value changed
    pub fn set_rows(&mut self, rows: usize) -> bool {
        let before = self.rows;
        self.rows = rows.clamp(1, MAX_GRID_DIM);
        self.rows != before
    }

    /// Pull every field back into range
    pub fn sanitize(&mut self) {
        self.set_cols(self.cols);
        self.set_rows(self.rows);
    }
}

/// Parameters used when the swarm is spawned
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SwarmSettings {
    /// Particles released on start (300-10000, steps of 50)
    pub particle_count: usize,
    /// Speed multiplier applied to each unit heading (1-10)
    pub speed: u32,
}

impl Default for SwarmSettings {
    fn default() -> Self {
        Self {
            particle_count: 1000,
            speed: 1,
        }
    }
}

impl SwarmSettings {
    /// Set particle count, clamped and snapped down to the slider step
    pub fn set_particle_count(&mut self, count: usize) {
        let clamped = count.clamp(MIN_PARTICLES, MAX_PARTICLES);
        self.particle_count = clamped - (clamped - MIN_PARTICLES) % PARTICLE_STEP;
    }

    /// Adjust particle count by a number of slider steps
    pub fn adjust_particle_count(&mut self, steps: i32) {
        let delta = steps as i64 * PARTICLE_STEP as i64;
        let new_val = (self.particle_count as i64 + delta).max(0) as usize;
        self.set_particle_count(new_val);
    }

    pub fn set_speed(&mut self, speed: u32) {
        self.speed = speed.clamp(MIN_SPEED, MAX_SPEED);
    }

    pub fn adjust_speed(&mut self, delta: i32) {
        let new_val = (self.speed as i64 + delta as i64).clamp(MIN_SPEED as i64, MAX_SPEED as i64);
        self.speed = new_val as u32;
    }

    /// Pull every field back into range
    pub fn sanitize(&mut self) {
        self.set_particle_count(self.particle_count);
        self.set_speed(self.speed);
    }
}
