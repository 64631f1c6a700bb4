use glam::Vec2;
use rand::Rng;

/// Side length of a cell in world units
pub const CELL_SIZE: f32 = 50.0;

/// One side of a cell. Discriminants index into `Cell::walls`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wall {
    Top = 0,
    Right = 1,
    Bottom = 2,
    Left = 3,
}

impl Wall {
    pub const ALL: [Wall; 4] = [Wall::Top, Wall::Right, Wall::Bottom, Wall::Left];

    /// The wall of the adjacent cell that faces this one
    pub fn opposite(&self) -> Wall {
        match self {
            Wall::Top => Wall::Bottom,
            Wall::Right => Wall::Left,
            Wall::Bottom => Wall::Top,
            Wall::Left => Wall::Right,
        }
    }

    /// Grid offset (column, row) of the neighbour behind this wall
    pub fn offset(&self) -> (i64, i64) {
        match self {
            Wall::Top => (0, -1),
            Wall::Right => (1, 0),
            Wall::Bottom => (0, 1),
            Wall::Left => (-1, 0),
        }
    }
}

/// A single maze cell
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cell {
    /// Column
    pub i: usize,
    /// Row
    pub j: usize,
    /// Wall flags in the order top, right, bottom, left
    pub walls: [bool; 4],
    pub visited: bool,
}

impl Cell {
    fn new(i: usize, j: usize) -> Self {
        Self {
            i,
            j,
            walls: [true; 4],
            visited: false,
        }
    }

    pub fn has_wall(&self, wall: Wall) -> bool {
        self.walls[wall as usize]
    }

    /// Top-left corner of the cell in world space
    pub fn origin(&self) -> Vec2 {
        cell_origin(self.i, self.j)
    }
}

/// Top-left corner of cell `(i, j)` in world space
pub fn cell_origin(i: usize, j: usize) -> Vec2 {
    Vec2::new(i as f32 * CELL_SIZE, j as f32 * CELL_SIZE)
}

/// Resumable randomized depth-first search over a [`Maze`].
///
/// Starts at cell (0, 0). Each step either picks one of the unvisited
/// neighbours of the current cell uniformly, knocks down the wall between
/// them and pushes the current cell, or, at a dead end, pops the stack.
/// An empty stack at a dead end ends the search. Once finished every cell is
/// visited and the open passages form a spanning tree.
#[derive(Debug, Clone)]
pub struct Carver {
    current: usize,
    stack: Vec<usize>,
    done: bool,
}

impl Carver {
    /// Marks the start cell visited. An empty maze is finished immediately.
    pub fn new(maze: &mut Maze) -> Self {
        let done = maze.is_empty();
        if !done {
            maze.cells[0].visited = true;
        }
        Self {
            current: 0,
            stack: Vec::new(),
            done,
        }
    }

    /// Take one step. Returns `false` once there is nothing left to carve.
    pub fn step<R: Rng + ?Sized>(&mut self, maze: &mut Maze, rng: &mut R) -> bool {
        if self.done {
            return false;
        }

        let candidates = maze.unvisited_neighbours(self.current);
        if !candidates.is_empty() {
            let (wall, next) = candidates[rng.gen_range(0..candidates.len())];
            maze.cells[next].visited = true;
            self.stack.push(self.current);
            maze.remove_wall(self.current, wall);
            self.current = next;
        } else if let Some(previous) = self.stack.pop() {
            self.current = previous;
        } else {
            self.done = true;
            return false;
        }
        true
    }

    /// Cell the search head sits on, `None` once finished
    pub fn current(&self, maze: &Maze) -> Option<(usize, usize)> {
        if self.is_done() {
            return None;
        }
        let cell = maze.cell_at(self.current);
        Some((cell.i, cell.j))
    }

    pub fn is_done(&self) -> bool {
        self.done
    }
}

/// Rectangular grid of cells carved into a perfect maze
#[derive(Debug, Clone)]
pub struct Maze {
    cols: usize,
    rows: usize,
    /// Row-major: index = i + j * cols
    cells: Vec<Cell>,
}

impl Maze {
    /// Grid with every wall standing and nothing visited
    pub fn new(cols: usize, rows: usize) -> Self {
        let mut cells = Vec::with_capacity(cols * rows);
        for j in 0..rows {
            for i in 0..cols {
                cells.push(Cell::new(i, j));
            }
        }
        Self { cols, rows, cells }
    }

    /// Build and carve a maze in one go
    pub fn generate<R: Rng + ?Sized>(cols: usize, rows: usize, rng: &mut R) -> Self {
        let mut maze = Self::new(cols, rows);
        maze.carve(rng);
        maze
    }

    /// Randomized depth-first carving, run to completion. See [`Carver`].
    pub fn carve<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let mut carver = Carver::new(self);
        while carver.step(self, rng) {}
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Row-major index of `(column, row)`, `None` when out of range
    pub fn index(&self, column: i64, row: i64) -> Option<usize> {
        if column < 0 || row < 0 || column >= self.cols as i64 || row >= self.rows as i64 {
            return None;
        }
        Some(column as usize + row as usize * self.cols)
    }

    pub fn cell(&self, column: i64, row: i64) -> Option<&Cell> {
        self.index(column, row).map(|idx| &self.cells[idx])
    }

    pub fn cell_at(&self, idx: usize) -> &Cell {
        &self.cells[idx]
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Cell where particles are spawned
    pub fn start(&self) -> (usize, usize) {
        (0, 0)
    }

    /// Bottom-right cell the swarm is racing to
    pub fn goal(&self) -> (usize, usize) {
        (self.cols.saturating_sub(1), self.rows.saturating_sub(1))
    }

    /// World-space size of the whole grid
    pub fn world_size(&self) -> Vec2 {
        Vec2::new(self.cols as f32 * CELL_SIZE, self.rows as f32 * CELL_SIZE)
    }

    /// Cell containing a world position, using floor semantics.
    /// Positions outside the grid are clamped onto the nearest border cell.
    pub fn containing_cell(&self, position: Vec2) -> (usize, usize) {
        let i = (position.x / CELL_SIZE).floor();
        let j = (position.y / CELL_SIZE).floor();
        let max_i = self.cols.saturating_sub(1) as f32;
        let max_j = self.rows.saturating_sub(1) as f32;
        (i.clamp(0.0, max_i) as usize, j.clamp(0.0, max_j) as usize)
    }

    /// Neighbour behind `wall` of the cell at `idx`, if inside the grid
    pub fn neighbour(&self, idx: usize, wall: Wall) -> Option<usize> {
        let cell = self.cell_at(idx);
        let (di, dj) = wall.offset();
        self.index(cell.i as i64 + di, cell.j as i64 + dj)
    }

    /// In-bounds unvisited neighbours, checked north, east, south, west
    fn unvisited_neighbours(&self, idx: usize) -> Vec<(Wall, usize)> {
        Wall::ALL
            .iter()
            .filter_map(|&wall| self.neighbour(idx, wall).map(|n| (wall, n)))
            .filter(|&(_, n)| !self.cells[n].visited)
            .collect()
    }

    /// Open the wall on `wall` side of `idx` and the matching wall of its neighbour
    pub fn remove_wall(&mut self, idx: usize, wall: Wall) {
        if let Some(other) = self.neighbour(idx, wall) {
            self.cells[idx].walls[wall as usize] = false;
            self.cells[other].walls[wall.opposite() as usize] = false;
        }
    }

    /// Whether the passage between two orthogonally adjacent cells is open
    pub fn is_open(&self, idx: usize, wall: Wall) -> bool {
        self.neighbour(idx, wall).is_some() && !self.cells[idx].has_wall(wall)
    }

    /// Number of carved passages, each shared wall counted once
    pub fn open_passages(&self) -> usize {
        (0..self.cells.len())
            .map(|idx| {
                [Wall::Right, Wall::Bottom]
                    .iter()
                    .filter(|&&wall| self.is_open(idx, wall))
                    .count()
            })
            .sum()
    }

    /// Number of cells reachable from `from` through open walls
    pub fn reachable_from(&self, from: usize) -> usize {
        if from >= self.cells.len() {
            return 0;
        }
        let mut seen = vec![false; self.cells.len()];
        let mut pending = vec![from];
        seen[from] = true;
        let mut count = 0;

        while let Some(idx) = pending.pop() {
            count += 1;
            for wall in Wall::ALL {
                if !self.is_open(idx, wall) {
                    continue;
                }
                if let Some(next) = self.neighbour(idx, wall) {
                    if !seen[next] {
                        seen[next] = true;
                        pending.push(next);
                    }
                }
            }
        }

        count
    }

    /// Every cell reachable and exactly `cells - 1` passages
    pub fn is_perfect(&self) -> bool {
        !self.cells.is_empty()
            && self.reachable_from(0) == self.cells.len()
            && self.open_passages() == self.cells.len() - 1
    }
}
