use crate::maze::{Carver, Maze};
use crate::settings::{MazeSettings, SwarmSettings};
use crate::swarm::Swarm;
use crate::timer::{format_hms, ElapsedTimer};
use log::{debug, info};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::time::Instant;

/// Lifecycle of the particle swarm
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SwarmState {
    /// No particles; settings can be edited
    #[default]
    Idle,
    /// Maze is being carved step by step; no swarm commands accepted
    Generating,
    /// Particles advance every tick
    Running,
    /// Ticking suspended, particles kept
    Paused,
    /// A particle reached the goal cell
    Completed,
}

impl SwarmState {
    pub fn name(&self) -> &str {
        match self {
            SwarmState::Idle => "IDLE",
            SwarmState::Generating => "GENERATING",
            SwarmState::Running => "RUNNING",
            SwarmState::Paused => "PAUSED",
            SwarmState::Completed => "COMPLETE",
        }
    }
}

/// External commands understood by the simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Spawn and run from Idle, resume from Paused
    Start,
    Pause,
    /// Drop the particles and go back to Idle
    Reset,
    /// Carve a fresh maze, then go back to Idle
    Regenerate,
}

/// Result of handling a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Moved { from: SwarmState, to: SwarmState },
    Ignored,
}

/// Summary shown once a particle finds the exit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionReport {
    pub elapsed_secs: u64,
    pub particles: usize,
    pub speed: u32,
    pub ticks: u64,
}

impl CompletionReport {
    pub fn elapsed(&self) -> String {
        format_hms(self.elapsed_secs)
    }
}

/// What a call to [`Simulation::tick`] did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// Not running; nothing moved
    Skipped,
    Advanced,
    /// One carving step taken
    Carved,
    /// Carving finished; the simulation is Idle again
    MazeReady,
    Completed(CompletionReport),
}

/// Maze, swarm and the state machine driving them
pub struct Simulation {
    pub maze: Maze,
    pub swarm: Swarm,
    pub maze_settings: MazeSettings,
    pub swarm_settings: SwarmSettings,
    pub timer: ElapsedTimer,
    pub report: Option<CompletionReport>,
    state: SwarmState,
    ticks: u64,
    rng: StdRng,
    carver: Option<Carver>,
}

impl Simulation {
    pub fn new(maze_settings: MazeSettings, swarm_settings: SwarmSettings) -> Self {
        let mut rng = match maze_settings.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let (maze, carver) = build_maze(&maze_settings, &mut rng);
        let state = if carver.is_some() {
            SwarmState::Generating
        } else {
            SwarmState::Idle
        };

        Self {
            maze,
            swarm: Swarm::new(),
            maze_settings,
            swarm_settings,
            timer: ElapsedTimer::new(),
            report: None,
            state,
            ticks: 0,
            rng,
            carver,
        }
    }

    pub fn state(&self) -> SwarmState {
        self.state
    }

    /// Ticks run since the swarm was last spawned
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Cell the carving search is on while generating
    pub fn carving_at(&self) -> Option<(usize, usize)> {
        self.carver.as_ref().and_then(|c| c.current(&self.maze))
    }

    /// Settings may only change while no swarm exists
    pub fn settings_editable(&self) -> bool {
        self.state == SwarmState::Idle
    }

    /// Single transition function for every external command
    pub fn handle(&mut self, command: Command, now: Instant) -> Transition {
        let from = self.state;
        let to = match (command, from) {
            (Command::Start, SwarmState::Idle) => {
                self.spawn();
                self.timer.reset();
                self.timer.start(now);
                SwarmState::Running
            }
            (Command::Start, SwarmState::Paused) => {
                self.timer.start(now);
                SwarmState::Running
            }
            (Command::Pause, SwarmState::Running) => {
                self.timer.poll(now);
                self.timer.stop();
                SwarmState::Paused
            }
            (Command::Reset, SwarmState::Running | SwarmState::Paused | SwarmState::Completed) => {
                self.clear();
                SwarmState::Idle
            }
            (Command::Regenerate, _) => self.regenerate(),
            _ => {
                debug!("ignored {:?} while {:?}", command, from);
                return Transition::Ignored;
            }
        };

        self.state = to;
        info!("{:?}: {:?} -> {:?}", command, from, to);
        Transition::Moved { from, to }
    }

    /// Advance one carving step while generating, or one simulation step
    /// while running and then check for the goal
    pub fn tick(&mut self, now: Instant) -> TickOutcome {
        match self.state {
            SwarmState::Generating => return self.carve_step(),
            SwarmState::Running => {}
            _ => return TickOutcome::Skipped,
        }

        self.timer.poll(now);
        self.swarm.tick(&self.maze);
        self.ticks += 1;

        if self.swarm.any_in_cell(&self.maze, self.maze.goal()) {
            self.timer.stop();
            let report = CompletionReport {
                elapsed_secs: self.timer.seconds(),
                particles: self.swarm.len(),
                speed: self.swarm_settings.speed,
                ticks: self.ticks,
            };
            info!(
                "goal reached after {} ({} ticks) with {} particles at speed {}",
                report.elapsed(),
                report.ticks,
                report.particles,
                report.speed
            );
            self.state = SwarmState::Completed;
            self.report = Some(report.clone());
            return TickOutcome::Completed(report);
        }

        TickOutcome::Advanced
    }

    /// Keep the elapsed clock current between ticks
    pub fn poll_timer(&mut self, now: Instant) {
        self.timer.poll(now);
    }

    fn carve_step(&mut self) -> TickOutcome {
        let Some(carver) = self.carver.as_mut() else {
            self.state = SwarmState::Idle;
            return TickOutcome::MazeReady;
        };
        if carver.step(&mut self.maze, &mut self.rng) {
            return TickOutcome::Carved;
        }

        self.carver = None;
        self.state = SwarmState::Idle;
        debug_assert!(self.maze.is_perfect());
        info!(
            "carved {}x{} maze ({} passages)",
            self.maze.cols(),
            self.maze.rows(),
            self.maze.open_passages()
        );
        TickOutcome::MazeReady
    }

    fn spawn(&mut self) {
        let count = self.swarm_settings.particle_count;
        let speed = self.swarm_settings.speed as f32;
        self.swarm.spawn(count, speed, &self.maze, &mut self.rng);
        self.ticks = 0;
        self.report = None;
    }

    fn clear(&mut self) {
        self.swarm.clear();
        self.timer.reset();
        self.ticks = 0;
        self.report = None;
    }

    /// New maze; returns the state to land in
    fn regenerate(&mut self) -> SwarmState {
        self.clear();
        self.maze_settings.sanitize();
        let (maze, carver) = build_maze(&self.maze_settings, &mut self.rng);
        self.maze = maze;
        self.carver = carver;
        if self.carver.is_some() {
            SwarmState::Generating
        } else {
            SwarmState::Idle
        }
    }
}

/// Fully carved maze, or a blank grid plus the carver that will fill it in
fn build_maze(settings: &MazeSettings, rng: &mut StdRng) -> (Maze, Option<Carver>) {
    if settings.animate {
        let mut maze = Maze::new(settings.cols, settings.rows);
        let carver = Carver::new(&mut maze);
        debug!("carving {}x{} maze step by step", settings.cols, settings.rows);
        return (maze, Some(carver));
    }

    let maze = Maze::generate(settings.cols, settings.rows, rng);
    debug_assert!(maze.is_perfect());
    info!(
        "generated {}x{} maze ({} cells, {} passages)",
        maze.cols(),
        maze.rows(),
        maze.len(),
        maze.open_passages()
    );
    (maze, None)
}
