mod app;
mod braille;
mod color;
mod config;
mod maze;
mod settings;
mod simulation;
mod swarm;
mod timer;
mod ui;

use anyhow::{Context, Result};
use app::{App, Focus};
use clap::Parser;
use color::ColorScheme;
use config::AppConfig;
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::{error, info, LevelFilter};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

#[derive(Parser, Debug)]
#[command(name = "maze-swarm")]
#[command(about = "Maze generation and particle swarm simulation in the terminal")]
struct Args {
    /// Number of particles released on start (300-10000, steps of 50)
    #[arg(short = 'p', long)]
    particles: Option<usize>,

    /// Particle speed multiplier (1-10)
    #[arg(short = 's', long)]
    speed: Option<u32>,

    /// Maze columns (1-100)
    #[arg(long)]
    cols: Option<usize>,

    /// Maze rows (1-100)
    #[arg(long)]
    rows: Option<usize>,

    /// Seed for reproducible mazes and spawns
    #[arg(long)]
    seed: Option<u64>,

    /// Carve the maze one step per tick instead of instantly
    #[arg(long)]
    animate: bool,

    /// Simulation ticks per frame (1-20)
    #[arg(long)]
    ticks: Option<usize>,

    /// Color scheme (classic, mono, neon)
    #[arg(long)]
    color: Option<String>,

    /// Load settings from this JSON file instead of the default location
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write the effective settings to this JSON file and exit
    #[arg(long = "write-config")]
    write_config: Option<PathBuf>,

    /// Append log output to this file (level from RUST_LOG, default info)
    #[arg(long = "log-file")]
    log_file: Option<PathBuf>,
}

impl Args {
    /// Layer command-line values over the loaded config
    fn apply(&self, config: &mut AppConfig) {
        if let Some(particles) = self.particles {
            config.swarm.set_particle_count(particles);
        }
        if let Some(speed) = self.speed {
            config.swarm.set_speed(speed);
        }
        if let Some(cols) = self.cols {
            config.maze.set_cols(cols);
        }
        if let Some(rows) = self.rows {
            config.maze.set_rows(rows);
        }
        if self.seed.is_some() {
            config.maze.seed = self.seed;
        }
        if self.animate {
            config.maze.animate = true;
        }
        if let Some(ticks) = self.ticks {
            config.ticks_per_frame = ticks;
        }
        if let Some(color) = &self.color {
            config.color_scheme = ColorScheme::parse(color);
        }
        config.sanitize();
    }
}

/// The terminal owns stdout and stderr while running, so logs only go to a file
fn init_logging(log_file: Option<&Path>) -> Result<()> {
    let mut builder = env_logger::Builder::from_default_env();
    match log_file {
        Some(path) => {
            let file = File::options()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("failed to open log file {}", path.display()))?;
            if std::env::var_os("RUST_LOG").is_none() {
                builder.filter_level(LevelFilter::Info);
            }
            builder.target(env_logger::Target::Pipe(Box::new(file)));
        }
        None => {
            builder.filter_level(LevelFilter::Off);
        }
    }
    builder.init();
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.log_file.as_deref())?;

    let mut config = AppConfig::resolve(args.config.as_deref())?;
    args.apply(&mut config);

    if let Some(path) = &args.write_config {
        config.save_to_file(path)?;
        println!("Wrote config to {}", path.display());
        return Ok(());
    }

    info!(
        "starting: {}x{} grid, {} particles, speed {}, seed {:?}",
        config.maze.cols, config.maze.rows, config.swarm.particle_count, config.swarm.speed, config.maze.seed
    );
    let mut app = App::new(config);
    let save_path = args.config.clone().or_else(AppConfig::default_path);

    enable_raw_mode()?;
    with_restore(
        || {
            let mut stdout = io::stdout();
            execute!(stdout, EnterAlternateScreen)?;
            let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;
            run_app(&mut terminal, &mut app, save_path.as_deref())
        },
        restore_terminal,
    )
}

/// Run `body`, then `restore` whatever happened. An error from `body` wins.
fn with_restore<T>(
    body: impl FnOnce() -> io::Result<T>,
    restore: impl FnOnce() -> io::Result<()>,
) -> Result<T> {
    let res = body();
    let restored = restore();
    let value = res.context("terminal loop failed")?;
    restored.context("failed to restore terminal")?;
    Ok(value)
}

fn restore_terminal() -> io::Result<()> {
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen, cursor::Show)
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    save_path: Option<&Path>,
) -> io::Result<()> {
    // Target ~60fps for smooth animation
    const FRAME_DURATION: Duration = Duration::from_millis(16);

    loop {
        terminal.draw(|frame| ui::render(frame, app))?;

        if event::poll(FRAME_DURATION)? {
            if let Event::Key(key) = event::read()? {
                // Only process Press events
                if key.kind != KeyEventKind::Press {
                    continue;
                }

                if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
                    return Ok(());
                }

                let now = Instant::now();
                match key.code {
                    KeyCode::Char('q') | KeyCode::Char('Q') => return Ok(()),
                    KeyCode::Char(' ') => {
                        app.toggle_run(now);
                    }
                    KeyCode::Char('r') | KeyCode::Char('R') => {
                        app.reset(now);
                    }
                    KeyCode::Char('n') | KeyCode::Char('N') => {
                        app.regenerate(now);
                    }
                    KeyCode::Char('a') | KeyCode::Char('A') => app.toggle_animate(),
                    KeyCode::Char('w') | KeyCode::Char('W') => match save_path {
                        Some(path) => {
                            if let Err(err) = app.save_config(path) {
                                error!("{:#}", err);
                            }
                        }
                        None => app.message = Some("No config directory".to_string()),
                    },
                    KeyCode::Char('v') | KeyCode::Char('V') => app.toggle_fullscreen(),
                    KeyCode::Char('h') | KeyCode::Char('H') | KeyCode::Char('?') => app.toggle_help(),
                    KeyCode::Char('c') | KeyCode::Char('C') => {
                        app.cycle_color_scheme();
                        app.focus = Focus::ColorScheme;
                    }
                    KeyCode::Char('+') | KeyCode::Char('=') => {
                        app.increase_speed();
                        app.focus = Focus::Ticks;
                    }
                    KeyCode::Char('-') | KeyCode::Char('_') => {
                        app.decrease_speed();
                        app.focus = Focus::Ticks;
                    }
                    KeyCode::Tab => app.next_focus(),
                    KeyCode::BackTab => app.prev_focus(),
                    KeyCode::Up if !app.show_help => app.adjust_focused_up(now),
                    KeyCode::Down if !app.show_help => app.adjust_focused_down(now),
                    KeyCode::Char('j') | KeyCode::Char('J') if app.show_help => {
                        app.scroll_help_down(ui::HELP_CONTENT_LINES);
                    }
                    KeyCode::Char('k') | KeyCode::Char('K') if app.show_help => app.scroll_help_up(),
                    KeyCode::Esc => {
                        if app.show_help {
                            app.toggle_help();
                        } else if app.focus.is_param() {
                            app.focus = Focus::None;
                        }
                    }
                    _ => {}
                }
            }
        }

        app.tick(Instant::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_overrides_config() {
        let args = Args::parse_from([
            "maze-swarm",
            "--particles",
            "2020",
            "--speed",
            "12",
            "--cols",
            "8",
            "--seed",
            "5",
            "--color",
            "neon",
            "--animate",
        ]);
        let mut config = AppConfig::default();
        args.apply(&mut config);

        assert_eq!(config.swarm.particle_count, 2000);
        assert_eq!(config.swarm.speed, 10);
        assert_eq!(config.maze.cols, 8);
        assert_eq!(config.maze.rows, 16);
        assert_eq!(config.maze.seed, Some(5));
        assert_eq!(config.color_scheme, ColorScheme::Neon);
        assert!(config.maze.animate);
    }

    #[test]
    fn test_no_flags_keep_config() {
        let args = Args::parse_from(["maze-swarm"]);
        let mut config = AppConfig::default();
        config.swarm.set_speed(3);
        args.apply(&mut config);
        assert_eq!(config.swarm.speed, 3);
        assert_eq!(config, {
            let mut expected = AppConfig::default();
            expected.swarm.set_speed(3);
            expected
        });
    }

    #[test]
    fn test_terminal_restored_when_setup_fails() {
        let mut restored = false;
        let result: Result<()> = with_restore(
            || Err(io::Error::new(io::ErrorKind::Other, "no tty")),
            || {
                restored = true;
                Ok(())
            },
        );

        assert!(restored);
        let err = result.unwrap_err();
        assert!(format!("{:#}", err).contains("no tty"));
    }

    #[test]
    fn test_restore_error_reported_after_clean_run() {
        let result = with_restore(
            || Ok(7),
            || Err(io::Error::new(io::ErrorKind::Other, "stuck in raw mode")),
        );
        assert!(format!("{:#}", result.unwrap_err()).contains("stuck in raw mode"));
    }
}
