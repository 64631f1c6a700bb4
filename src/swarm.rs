use crate::maze::{Maze, Wall, CELL_SIZE};
use glam::Vec2;
use rand::Rng;

/// Collision radius of every particle, in world units
pub const PARTICLE_RADIUS: f32 = 10.0;

/// A point particle bouncing around the maze
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub position: Vec2,
    pub velocity: Vec2,
    pub radius: f32,
}

impl Particle {
    pub fn new(position: Vec2, velocity: Vec2) -> Self {
        Self {
            position,
            velocity,
            radius: PARTICLE_RADIUS,
        }
    }

    /// Euler step with a unit timestep
    pub fn advance(&mut self) {
        self.position += self.velocity;
    }

    /// Push the particle out of any standing wall of the cell it is in.
    ///
    /// The four sides are tested independently, so a particle driven into a
    /// corner can reflect off two walls in the same call. Each hit negates
    /// the matching velocity component and clamps the position so the
    /// particle's rim sits on the wall.
    pub fn resolve_collision(&mut self, maze: &Maze) {
        let (i, j) = maze.containing_cell(self.position);
        let Some(cell) = maze.cell(i as i64, j as i64) else {
            return;
        };

        let left = i as f32 * CELL_SIZE;
        let right = (i + 1) as f32 * CELL_SIZE;
        let top = j as f32 * CELL_SIZE;
        let bottom = (j + 1) as f32 * CELL_SIZE;
        let r = self.radius;

        if cell.has_wall(Wall::Top) && self.position.y - r < top {
            self.velocity.y = -self.velocity.y;
            self.position.y = top + r;
        }
        if cell.has_wall(Wall::Right) && self.position.x + r > right {
            self.velocity.x = -self.velocity.x;
            self.position.x = right - r;
        }
        if cell.has_wall(Wall::Bottom) && self.position.y + r > bottom {
            self.velocity.y = -self.velocity.y;
            self.position.y = bottom - r;
        }
        if cell.has_wall(Wall::Left) && self.position.x - r < left {
            self.velocity.x = -self.velocity.x;
            self.position.x = left + r;
        }
    }
}

/// All live particles. Empty while the simulation is idle.
#[derive(Debug, Clone, Default)]
pub struct Swarm {
    particles: Vec<Particle>,
}

impl Swarm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the swarm with `count` particles placed at random inside the
    /// maze's start cell, each heading in a random direction at `speed`
    pub fn spawn<R: Rng + ?Sized>(&mut self, count: usize, speed: f32, maze: &Maze, rng: &mut R) {
        let (si, sj) = maze.start();
        let origin = crate::maze::cell_origin(si, sj);
        let span = CELL_SIZE - 2.0 * PARTICLE_RADIUS;

        self.particles.clear();
        self.particles.reserve(count);
        for _ in 0..count {
            let offset = Vec2::new(
                PARTICLE_RADIUS + rng.gen::<f32>() * span,
                PARTICLE_RADIUS + rng.gen::<f32>() * span,
            );
            let heading = Vec2::from_angle(rng.gen_range(0.0..std::f32::consts::TAU));
            self.particles.push(Particle::new(origin + offset, heading * speed));
        }
    }

    /// Move every particle once and resolve its wall collisions
    pub fn tick(&mut self, maze: &Maze) {
        for particle in &mut self.particles {
            particle.advance();
            particle.resolve_collision(maze);
        }
    }

    /// Whether any particle currently sits in `cell`
    pub fn any_in_cell(&self, maze: &Maze, cell: (usize, usize)) -> bool {
        self.particles
            .iter()
            .any(|p| maze.containing_cell(p.position) == cell)
    }

    pub fn clear(&mut self) {
        self.particles.clear();
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_top_wall_reflects_and_clamps() {
        let maze = Maze::new(20, 16);
        let mut particle = Particle::new(Vec2::new(25.0, 5.0), Vec2::new(0.0, -5.0));

        particle.resolve_collision(&maze);

        assert_eq!(particle.velocity, Vec2::new(0.0, 5.0));
        assert_eq!(particle.position.y, 10.0);
        assert_eq!(particle.position.x, 25.0);
    }

    #[test]
    fn test_corner_reflects_both_axes() {
        let maze = Maze::new(2, 2);
        let mut particle = Particle::new(Vec2::new(45.0, 46.0), Vec2::new(3.0, 4.0));

        particle.resolve_collision(&maze);

        assert_eq!(particle.velocity, Vec2::new(-3.0, -4.0));
        assert_eq!(particle.position, Vec2::new(40.0, 40.0));
    }

    #[test]
    fn test_open_wall_lets_particle_through() {
        let mut maze = Maze::new(2, 1);
        maze.remove_wall(0, Wall::Right);
        let mut particle = Particle::new(Vec2::new(44.0, 25.0), Vec2::new(3.0, 0.0));

        particle.advance();
        particle.resolve_collision(&maze);

        assert_eq!(particle.position, Vec2::new(47.0, 25.0));
        assert_eq!(particle.velocity, Vec2::new(3.0, 0.0));

        particle.advance();
        particle.resolve_collision(&maze);
        assert_eq!(maze.containing_cell(particle.position), (1, 0));
    }

    #[test]
    fn test_particle_away_from_walls_is_untouched() {
        let maze = Maze::new(3, 3);
        let mut particle = Particle::new(Vec2::new(75.0, 75.0), Vec2::new(1.0, 1.0));
        particle.resolve_collision(&maze);
        assert_eq!(particle.position, Vec2::new(75.0, 75.0));
        assert_eq!(particle.velocity, Vec2::new(1.0, 1.0));
    }

    #[test]
    fn test_escaped_particle_is_pushed_back() {
        let maze = Maze::new(2, 2);
        let mut particle = Particle::new(Vec2::new(-4.0, 20.0), Vec2::new(-2.0, 0.0));
        particle.resolve_collision(&maze);
        assert_eq!(particle.position.x, PARTICLE_RADIUS);
        assert_eq!(particle.velocity.x, 2.0);
    }

    #[test]
    fn test_spawn_places_particles_in_start_cell() {
        let mut rng = StdRng::seed_from_u64(5);
        let maze = Maze::generate(20, 16, &mut rng);
        let mut swarm = Swarm::new();

        swarm.spawn(500, 3.0, &maze, &mut rng);

        assert_eq!(swarm.len(), 500);
        for p in swarm.particles() {
            assert_eq!(maze.containing_cell(p.position), (0, 0));
            assert!(p.position.x >= PARTICLE_RADIUS && p.position.x <= CELL_SIZE - PARTICLE_RADIUS);
            assert!(p.position.y >= PARTICLE_RADIUS && p.position.y <= CELL_SIZE - PARTICLE_RADIUS);
            assert!((p.velocity.length() - 3.0).abs() < 1e-4);
            assert_eq!(p.radius, PARTICLE_RADIUS);
        }
    }

    #[test]
    fn test_respawn_replaces_particles() {
        let mut rng = StdRng::seed_from_u64(8);
        let maze = Maze::generate(4, 4, &mut rng);
        let mut swarm = Swarm::new();
        swarm.spawn(100, 1.0, &maze, &mut rng);
        swarm.spawn(40, 1.0, &maze, &mut rng);
        assert_eq!(swarm.len(), 40);
        swarm.clear();
        assert!(swarm.is_empty());
    }

    #[test]
    fn test_particles_stay_inside_grid() {
        let mut rng = StdRng::seed_from_u64(11);
        let maze = Maze::generate(8, 6, &mut rng);
        let bounds = maze.world_size();
        let mut swarm = Swarm::new();
        swarm.spawn(300, 10.0, &maze, &mut rng);

        for _ in 0..2000 {
            swarm.tick(&maze);
            for p in swarm.particles() {
                assert!(p.position.x >= 0.0 && p.position.x <= bounds.x);
                assert!(p.position.y >= 0.0 && p.position.y <= bounds.y);
            }
        }
    }

    #[test]
    fn test_any_in_cell() {
        let maze = Maze::new(3, 3);
        let mut swarm = Swarm::new();
        assert!(!swarm.any_in_cell(&maze, (0, 0)));

        swarm.particles.push(Particle::new(Vec2::new(125.0, 125.0), Vec2::ZERO));
        assert!(swarm.any_in_cell(&maze, (2, 2)));
        assert!(!swarm.any_in_cell(&maze, (0, 0)));
    }
}
