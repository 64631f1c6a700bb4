use crate::color::Palette;
use crate::maze::{Maze, Wall, CELL_SIZE};
use crate::swarm::Particle;
use glam::Vec2;
use ratatui::style::Color;

/// Braille character rendering for high-resolution terminal graphics.
/// Each Braille character represents a 2x4 grid of dots (8 dots total).
///
/// Dot positions and their bit values:
/// ```text
/// (0,0)=0x01  (1,0)=0x08
/// (0,1)=0x02  (1,1)=0x10
/// (0,2)=0x04  (1,2)=0x20
/// (0,3)=0x40  (1,3)=0x80
/// ```
///
/// Unicode Braille patterns: U+2800 to U+28FF (256 patterns)
const BRAILLE_BASE: u32 = 0x2800;

/// Dot position to bit mapping for Braille characters
const BRAILLE_DOTS: [[u8; 4]; 2] = [
    [0x01, 0x02, 0x04, 0x40], // Left column (x=0): rows 0,1,2,3
    [0x08, 0x10, 0x20, 0x80], // Right column (x=1): rows 0,1,2,3
];

/// What occupies a single dot. Later variants win.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Layer {
    Empty,
    Wall,
    Particle,
}

/// A single rendered Braille cell with position and colors
#[derive(Debug, Clone, Copy)]
pub struct BrailleCell {
    pub x: u16,
    pub y: u16,
    pub char: char,
    pub fg: Color,
    pub bg: Option<Color>,
}

/// Dot-space raster of the world
struct DotCanvas {
    width: usize,
    height: usize,
    scale: Vec2,
    dots: Vec<Layer>,
}

impl DotCanvas {
    fn new(width: usize, height: usize, world: Vec2) -> Self {
        Self {
            width,
            height,
            scale: Vec2::new(width as f32 / world.x.max(1.0), height as f32 / world.y.max(1.0)),
            dots: vec![Layer::Empty; width * height],
        }
    }

    fn dot_x(&self, x: f32) -> usize {
        ((x * self.scale.x) as usize).min(self.width.saturating_sub(1))
    }

    fn dot_y(&self, y: f32) -> usize {
        ((y * self.scale.y) as usize).min(self.height.saturating_sub(1))
    }

    fn mark(&mut self, x: usize, y: usize, layer: Layer) {
        if x < self.width && y < self.height {
            let idx = y * self.width + x;
            self.dots[idx] = self.dots[idx].max(layer);
        }
    }

    fn hline(&mut self, x0: f32, x1: f32, y: f32) {
        let row = self.dot_y(y);
        for col in self.dot_x(x0)..=self.dot_x(x1) {
            self.mark(col, row, Layer::Wall);
        }
    }

    fn vline(&mut self, x: f32, y0: f32, y1: f32) {
        let col = self.dot_x(x);
        for row in self.dot_y(y0)..=self.dot_y(y1) {
            self.mark(col, row, Layer::Wall);
        }
    }

    fn get(&self, x: usize, y: usize) -> Layer {
        if x < self.width && y < self.height {
            self.dots[y * self.width + x]
        } else {
            Layer::Empty
        }
    }
}

/// Rasterise the walls of every cell
fn draw_maze(canvas: &mut DotCanvas, maze: &Maze) {
    for cell in maze.cells() {
        let origin = cell.origin();
        let far = origin + Vec2::splat(CELL_SIZE);

        if cell.has_wall(Wall::Top) {
            canvas.hline(origin.x, far.x, origin.y);
        }
        if cell.has_wall(Wall::Right) {
            canvas.vline(far.x, origin.y, far.y);
        }
        if cell.has_wall(Wall::Bottom) {
            canvas.hline(origin.x, far.x, far.y);
        }
        if cell.has_wall(Wall::Left) {
            canvas.vline(origin.x, origin.y, far.y);
        }
    }
}

/// Render the maze and swarm to Braille characters.
/// `carving` is the cell under the carving search head, if one is running.
pub fn render_to_braille(
    maze: &Maze,
    particles: &[Particle],
    carving: Option<(usize, usize)>,
    canvas_width: u16,
    canvas_height: u16,
    palette: &Palette,
) -> Vec<BrailleCell> {
    let world = maze.world_size();

    // Braille effective resolution
    let braille_width = canvas_width as usize * 2;
    let braille_height = canvas_height as usize * 4;

    let mut canvas = DotCanvas::new(braille_width, braille_height, world);
    draw_maze(&mut canvas, maze);
    for particle in particles {
        let x = canvas.dot_x(particle.position.x.max(0.0));
        let y = canvas.dot_y(particle.position.y.max(0.0));
        canvas.mark(x, y, Layer::Particle);
    }

    // World units covered by one character
    let char_w = world.x / canvas_width.max(1) as f32;
    let char_h = world.y / canvas_height.max(1) as f32;
    let start = maze.start();
    let goal = maze.goal();

    let mut cells = Vec::with_capacity(canvas_width as usize * canvas_height as usize);

    for cy in 0..canvas_height {
        for cx in 0..canvas_width {
            let mut pattern: u8 = 0;
            let mut top = Layer::Empty;

            let base_bx = cx as usize * 2;
            let base_by = cy as usize * 4;

            for dx in 0..2 {
                for dy in 0..4 {
                    let layer = canvas.get(base_bx + dx, base_by + dy);
                    if layer != Layer::Empty {
                        pattern |= BRAILLE_DOTS[dx][dy];
                        top = top.max(layer);
                    }
                }
            }

            // Tint by the maze cell under the character's centre
            let centre = Vec2::new((cx as f32 + 0.5) * char_w, (cy as f32 + 0.5) * char_h);
            let (i, j) = maze.containing_cell(centre);
            let visited = maze.cell(i as i64, j as i64).is_some_and(|c| c.visited);
            let bg = if carving == Some((i, j)) {
                Some(palette.carving)
            } else if (i, j) == goal {
                Some(palette.goal)
            } else if visited && (i, j) != start {
                Some(palette.visited)
            } else {
                None
            };

            if pattern == 0 && bg.is_none() {
                continue;
            }

            let fg = match top {
                Layer::Particle => palette.particle,
                _ => palette.wall,
            };

            cells.push(BrailleCell {
                x: cx,
                y: cy,
                char: char::from_u32(BRAILLE_BASE + pattern as u32).unwrap_or(' '),
                fg,
                bg,
            });
        }
    }

    cells
}
