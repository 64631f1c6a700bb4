use crate::color::ColorScheme;
use crate::config::{AppConfig, CONFIG_VERSION, MAX_TICKS_PER_FRAME, MIN_TICKS_PER_FRAME};
use crate::simulation::{Command, Simulation, SwarmState, TickOutcome, Transition};
use anyhow::Result;
use log::info;
use std::path::Path;
use std::time::Instant;

/// Focus state for parameter editing in the sidebar
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Focus {
    #[default]
    None,
    Particles,
    Speed,
    Columns,
    Rows,
    ColorScheme,
    Ticks,
}

impl Focus {
    /// Tab cycles through parameters in sidebar order
    pub fn next(&self) -> Focus {
        match self {
            Focus::None => Focus::Particles,
            Focus::Particles => Focus::Speed,
            Focus::Speed => Focus::Columns,
            Focus::Columns => Focus::Rows,
            Focus::Rows => Focus::ColorScheme,
            Focus::ColorScheme => Focus::Ticks,
            Focus::Ticks => Focus::Particles,
        }
    }

    /// Shift+Tab cycles backwards
    pub fn prev(&self) -> Focus {
        match self {
            Focus::None => Focus::Ticks,
            Focus::Particles => Focus::Ticks,
            Focus::Speed => Focus::Particles,
            Focus::Columns => Focus::Speed,
            Focus::Rows => Focus::Columns,
            Focus::ColorScheme => Focus::Rows,
            Focus::Ticks => Focus::ColorScheme,
        }
    }

    /// Parameters that only make sense to change while idle
    pub fn needs_idle(&self) -> bool {
        matches!(self, Focus::Particles | Focus::Speed | Focus::Columns | Focus::Rows)
    }

    pub fn is_param(&self) -> bool {
        !matches!(self, Focus::None)
    }
}

/// Main application state
pub struct App {
    pub simulation: Simulation,
    pub color_scheme: ColorScheme,
    pub focus: Focus,
    pub fullscreen_mode: bool,
    pub ticks_per_frame: usize,
    pub show_help: bool,
    pub help_scroll: u16,
    /// One-line feedback shown under the controls
    pub message: Option<String>,
}

impl App {
    pub fn new(config: AppConfig) -> Self {
        Self {
            simulation: Simulation::new(config.maze, config.swarm),
            color_scheme: config.color_scheme,
            focus: Focus::None,
            fullscreen_mode: false,
            ticks_per_frame: config.ticks_per_frame,
            show_help: false,
            help_scroll: 0,
            message: None,
        }
    }

    /// Snapshot of the current settings for export
    pub fn to_config(&self) -> AppConfig {
        AppConfig {
            version: CONFIG_VERSION,
            maze: self.simulation.maze_settings.clone(),
            swarm: self.simulation.swarm_settings.clone(),
            color_scheme: self.color_scheme,
            ticks_per_frame: self.ticks_per_frame,
        }
    }

    /// Write the current settings to `path`
    pub fn save_config(&mut self, path: &Path) -> Result<()> {
        let result = self.to_config().save_to_file(path);
        self.message = Some(match &result {
            Ok(()) => {
                info!("saved settings to {}", path.display());
                "Settings saved".to_string()
            }
            Err(_) => "Save failed".to_string(),
        });
        result
    }

    /// Run simulation ticks for the current frame
    pub fn tick(&mut self, now: Instant) {
        self.simulation.poll_timer(now);
        for _ in 0..self.ticks_per_frame {
            match self.simulation.tick(now) {
                TickOutcome::Advanced | TickOutcome::Carved => {}
                TickOutcome::Skipped | TickOutcome::MazeReady | TickOutcome::Completed(_) => break,
            }
        }
    }

    /// Space: start from idle, pause while running, resume while paused
    pub fn toggle_run(&mut self, now: Instant) -> Transition {
        let command = match self.simulation.state() {
            SwarmState::Running => Command::Pause,
            _ => Command::Start,
        };
        self.simulation.handle(command, now)
    }

    pub fn reset(&mut self, now: Instant) -> Transition {
        self.simulation.handle(Command::Reset, now)
    }

    pub fn regenerate(&mut self, now: Instant) -> Transition {
        self.simulation.handle(Command::Regenerate, now)
    }

    /// Whether the focused parameter can be changed right now
    pub fn focus_editable(&self) -> bool {
        !self.focus.needs_idle() || self.simulation.settings_editable()
    }

    /// Handle adjusting the currently focused parameter
    pub fn adjust_focused_up(&mut self, now: Instant) {
        self.adjust_focused(1, now);
    }

    /// Handle adjusting the currently focused parameter
    pub fn adjust_focused_down(&mut self, now: Instant) {
        self.adjust_focused(-1, now);
    }

    fn adjust_focused(&mut self, delta: i32, now: Instant) {
        if !self.focus_editable() {
            return;
        }
        match self.focus {
            Focus::None => {}
            Focus::Particles => self.simulation.swarm_settings.adjust_particle_count(delta),
            Focus::Speed => self.simulation.swarm_settings.adjust_speed(delta),
            Focus::Columns => {
                let settings = &mut self.simulation.maze_settings;
                let cols = (settings.cols as i64 + delta as i64).max(1) as usize;
                if settings.set_cols(cols) {
                    self.simulation.handle(Command::Regenerate, now);
                }
            }
            Focus::Rows => {
                let settings = &mut self.simulation.maze_settings;
                let rows = (settings.rows as i64 + delta as i64).max(1) as usize;
                if settings.set_rows(rows) {
                    self.simulation.handle(Command::Regenerate, now);
                }
            }
            Focus::ColorScheme => {
                self.color_scheme = if delta > 0 {
                    self.color_scheme.next()
                } else {
                    self.color_scheme.prev()
                };
            }
            Focus::Ticks => {
                if delta > 0 {
                    self.increase_speed();
                } else {
                    self.decrease_speed();
                }
            }
        }
    }

    /// Switch between animated and instant carving for the next maze
    pub fn toggle_animate(&mut self) {
        let settings = &mut self.simulation.maze_settings;
        settings.animate = !settings.animate;
    }

    /// Cycle to next focus
    pub fn next_focus(&mut self) {
        self.focus = self.focus.next();
    }

    /// Navigate to previous parameter (Shift+Tab)
    pub fn prev_focus(&mut self) {
        self.focus = self.focus.prev();
    }

    /// Cycle color scheme
    pub fn cycle_color_scheme(&mut self) {
        self.color_scheme = self.color_scheme.next();
    }

    /// Toggle fullscreen mode
    pub fn toggle_fullscreen(&mut self) {
        self.fullscreen_mode = !self.fullscreen_mode;
    }

    /// Toggle help overlay
    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
        if self.show_help {
            self.help_scroll = 0;
        }
    }

    pub fn scroll_help_up(&mut self) {
        self.help_scroll = self.help_scroll.saturating_sub(1);
    }

    pub fn scroll_help_down(&mut self, max_scroll: u16) {
        self.help_scroll = (self.help_scroll + 1).min(max_scroll);
    }

    /// More simulation ticks per frame
    pub fn increase_speed(&mut self) {
        self.ticks_per_frame = (self.ticks_per_frame + 1).min(MAX_TICKS_PER_FRAME);
    }

    /// Fewer simulation ticks per frame
    pub fn decrease_speed(&mut self) {
        self.ticks_per_frame = self.ticks_per_frame.saturating_sub(1).max(MIN_TICKS_PER_FRAME);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::MazeSettings;

    fn app() -> App {
        App::new(AppConfig {
            maze: MazeSettings {
                cols: 5,
                rows: 4,
                seed: Some(2),
                animate: false,
            },
            ..AppConfig::default()
        })
    }

    #[test]
    fn test_space_cycles_start_pause_resume() {
        let mut app = app();
        let now = Instant::now();

        app.toggle_run(now);
        assert_eq!(app.simulation.state(), SwarmState::Running);
        app.toggle_run(now);
        assert_eq!(app.simulation.state(), SwarmState::Paused);
        app.toggle_run(now);
        assert_eq!(app.simulation.state(), SwarmState::Running);
    }

    #[test]
    fn test_swarm_settings_locked_while_running() {
        let mut app = app();
        let now = Instant::now();
        app.focus = Focus::Speed;

        app.adjust_focused_up(now);
        assert_eq!(app.simulation.swarm_settings.speed, 2);

        app.toggle_run(now);
        app.adjust_focused_up(now);
        assert_eq!(app.simulation.swarm_settings.speed, 2);

        app.reset(now);
        app.adjust_focused_up(now);
        assert_eq!(app.simulation.swarm_settings.speed, 3);
    }

    #[test]
    fn test_color_scheme_editable_while_running() {
        let mut app = app();
        let now = Instant::now();
        app.toggle_run(now);
        app.focus = Focus::ColorScheme;
        app.adjust_focused_up(now);
        assert_eq!(app.color_scheme, ColorScheme::Mono);
    }

    #[test]
    fn test_resizing_grid_regenerates_maze() {
        let mut app = app();
        let now = Instant::now();
        app.focus = Focus::Columns;

        app.adjust_focused_up(now);

        assert_eq!(app.simulation.maze.cols(), 6);
        assert_eq!(app.simulation.maze.rows(), 4);
        assert!(app.simulation.maze.is_perfect());
    }

    #[test]
    fn test_ticks_per_frame_bounds() {
        let mut app = app();
        for _ in 0..50 {
            app.increase_speed();
        }
        assert_eq!(app.ticks_per_frame, MAX_TICKS_PER_FRAME);
        for _ in 0..50 {
            app.decrease_speed();
        }
        assert_eq!(app.ticks_per_frame, MIN_TICKS_PER_FRAME);
    }

    #[test]
    fn test_tick_only_moves_running_swarm() {
        let mut app = app();
        let now = Instant::now();
        app.tick(now);
        assert_eq!(app.simulation.ticks(), 0);

        app.toggle_run(now);
        app.tick(now);
        assert!(app.simulation.ticks() > 0);
    }

    #[test]
    fn test_focus_cycle() {
        let mut focus = Focus::None;
        for _ in 0..6 {
            focus = focus.next();
        }
        assert_eq!(focus, Focus::Ticks);
        assert_eq!(focus.next(), Focus::Particles);
        assert_eq!(Focus::Particles.prev(), Focus::Ticks);
    }

    #[test]
    fn test_to_config_reflects_edits() {
        let mut app = app();
        let now = Instant::now();
        app.focus = Focus::Particles;
        app.adjust_focused_up(now);
        app.cycle_color_scheme();

        let config = app.to_config();
        assert_eq!(config.swarm.particle_count, 1050);
        assert_eq!(config.color_scheme, ColorScheme::Mono);
        assert_eq!(config.maze.cols, 5);
    }

    #[test]
    fn test_save_config_round_trips_settings() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let mut app = app();
        app.increase_speed();

        app.save_config(&path).unwrap();

        let loaded = AppConfig::load_from_file(&path).unwrap();
        assert_eq!(loaded, app.to_config());
        assert_eq!(app.message.as_deref(), Some("Settings saved"));
    }

    #[test]
    fn test_clamped_grid_size_keeps_maze() {
        let mut app = app();
        let now = Instant::now();
        app.simulation.maze_settings.set_cols(crate::settings::MAX_GRID_DIM);
        app.regenerate(now);
        let before = app.simulation.maze.cells().to_vec();
        app.focus = Focus::Columns;

        app.adjust_focused_up(now);

        assert_eq!(app.simulation.maze.cols(), crate::settings::MAX_GRID_DIM);
        assert_eq!(app.simulation.maze.cells(), before.as_slice());

        app.focus = Focus::Rows;
        app.simulation.maze_settings.set_rows(1);
        app.regenerate(now);
        let before = app.simulation.maze.cells().to_vec();
        app.adjust_focused_down(now);
        assert_eq!(app.simulation.maze.cells(), before.as_slice());
    }

    #[test]
    fn test_animated_generation_runs_over_frames() {
        let mut app = app();
        let now = Instant::now();
        app.toggle_animate();
        app.regenerate(now);
        assert_eq!(app.simulation.state(), SwarmState::Generating);

        app.toggle_run(now);
        assert!(app.simulation.swarm.is_empty());

        app.focus = Focus::Speed;
        app.adjust_focused_up(now);
        assert_eq!(app.simulation.swarm_settings.speed, 1);

        // 5x4 grid: 38 carving steps at 2 ticks per frame
        for _ in 0..19 {
            app.tick(now);
            assert_eq!(app.simulation.state(), SwarmState::Generating);
        }
        app.tick(now);
        assert_eq!(app.simulation.state(), SwarmState::Idle);
        assert!(app.simulation.maze.is_perfect());
        assert_eq!(app.simulation.ticks(), 0);
    }
}
