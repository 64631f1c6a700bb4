use crate::app::{App, Focus};
use crate::braille;
use crate::simulation::SwarmState;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
    Frame,
};

const SIDEBAR_WIDTH: u16 = 24;

/// Max scroll for help content (generous to account for text wrapping on small screens)
pub const HELP_CONTENT_LINES: u16 = 40;

// UI color scheme
const BORDER_COLOR: Color = Color::Cyan;
const HIGHLIGHT_COLOR: Color = Color::Yellow;
const TEXT_COLOR: Color = Color::White;
const DIM_TEXT_COLOR: Color = Color::Gray;

/// Creates a standard styled block with rounded borders
fn styled_block(title: &str) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(BORDER_COLOR))
        .title(title)
}

/// Main render function
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    if app.fullscreen_mode {
        render_canvas(frame, area, app);
    } else {
        let layout = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(0)])
            .split(area);

        render_sidebar(frame, layout[0], app);
        render_canvas(frame, layout[1], app);
    }

    if app.simulation.state() == SwarmState::Completed {
        render_completion_popup(frame, area, app);
    }

    if app.show_help {
        render_help_overlay(frame, area, app);
    }
}

fn render_sidebar(frame: &mut Frame, area: Rect, app: &App) {
    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(7), // Status
            Constraint::Length(9), // Parameters
            Constraint::Min(6),    // Controls
        ])
        .split(area);

    render_status_box(frame, sections[0], app);
    render_params_box(frame, sections[1], app);
    render_controls_box(frame, sections[2], app);
}

fn state_color(state: SwarmState) -> Color {
    match state {
        SwarmState::Idle => DIM_TEXT_COLOR,
        SwarmState::Generating => Color::Magenta,
        SwarmState::Running => BORDER_COLOR,
        SwarmState::Paused => HIGHLIGHT_COLOR,
        SwarmState::Completed => Color::Green,
    }
}

fn render_status_box(frame: &mut Frame, area: Rect, app: &App) {
    let block = styled_block(" Maze Swarm ");
    let sim = &app.simulation;
    let state = sim.state();

    let content = vec![
        Line::from(Span::styled(state.name(), Style::default().fg(state_color(state)))),
        Line::from(Span::styled(
            format!("Time: {}", sim.timer.formatted()),
            Style::default().fg(if sim.timer.is_running() { TEXT_COLOR } else { DIM_TEXT_COLOR }),
        )),
        Line::from(Span::styled(
            if sim.swarm.is_empty() {
                "Live: none".to_string()
            } else {
                format!("Live: {}", sim.swarm.len())
            },
            Style::default().fg(TEXT_COLOR),
        )),
        Line::from(Span::styled(
            format!("Ticks: {}", sim.ticks()),
            Style::default().fg(DIM_TEXT_COLOR),
        )),
        Line::from(Span::styled(
            format!("Grid: {}x{}", sim.maze.cols(), sim.maze.rows()),
            Style::default().fg(DIM_TEXT_COLOR),
        )),
    ];

    let paragraph = Paragraph::new(content).block(block);
    frame.render_widget(paragraph, area);
}

fn render_params_box(frame: &mut Frame, area: Rect, app: &App) {
    let title = if app.simulation.settings_editable() {
        " Parameters "
    } else {
        " Parameters (locked) "
    };
    let block = styled_block(title);
    let editable = app.simulation.settings_editable();

    let make_line = |label: &str, value: String, focus: Focus| {
        let focused = app.focus == focus;
        let prefix = if focused { "> " } else { "  " };
        let style = if focused {
            Style::default().fg(HIGHLIGHT_COLOR)
        } else if focus.needs_idle() && !editable {
            Style::default().fg(DIM_TEXT_COLOR)
        } else {
            Style::default().fg(TEXT_COLOR)
        };
        Line::from(Span::styled(format!("{}{}: {}", prefix, label, value), style))
    };

    let swarm = &app.simulation.swarm_settings;
    let maze = &app.simulation.maze_settings;

    let content = vec![
        make_line("Particles", format!("{}", swarm.particle_count), Focus::Particles),
        make_line("Speed", format!("{}", swarm.speed), Focus::Speed),
        make_line("Columns", format!("{}", maze.cols), Focus::Columns),
        make_line("Rows", format!("{}", maze.rows), Focus::Rows),
        make_line("Color", app.color_scheme.name().to_string(), Focus::ColorScheme),
        make_line("Ticks/frame", format!("{}", app.ticks_per_frame), Focus::Ticks),
        Line::from(Span::styled(
            format!("  Carve: {}", if maze.animate { "animated" } else { "instant" }),
            Style::default().fg(DIM_TEXT_COLOR),
        )),
    ];

    let paragraph = Paragraph::new(content).block(block);
    frame.render_widget(paragraph, area);
}

fn render_controls_box(frame: &mut Frame, area: Rect, app: &App) {
    let key_style = Style::default().fg(HIGHLIGHT_COLOR);
    let desc_style = Style::default().fg(DIM_TEXT_COLOR);

    let make_control = |key: &str, desc: &str| -> Line<'_> {
        Line::from(vec![
            Span::styled(format!("{:>5}", key), key_style),
            Span::styled(format!(" {}", desc), desc_style),
        ])
    };

    let run_label = match app.simulation.state() {
        SwarmState::Running => "pause",
        SwarmState::Paused => "resume",
        _ => "start",
    };

    let mut content = vec![
        make_control("Space", run_label),
        make_control("R", "reset"),
        make_control("N", "new maze"),
        make_control("A", "animate carve"),
        make_control("Tab", "select param"),
        make_control("↑/↓", "adjust param"),
        make_control("+/-", "ticks/frame"),
        make_control("C", "color scheme"),
        make_control("V", "fullscreen"),
        make_control("H", "help"),
        make_control("W", "save settings"),
        make_control("Q", "quit"),
    ];
    if let Some(message) = &app.message {
        content.push(Line::from(Span::styled(
            message.clone(),
            Style::default().fg(Color::Green),
        )));
    }

    let paragraph = Paragraph::new(content).block(styled_block(" Controls "));
    frame.render_widget(paragraph, area);
}

fn render_canvas(frame: &mut Frame, area: Rect, app: &App) {
    let block = styled_block("");

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let palette = app.color_scheme.palette();
    let cells = braille::render_to_braille(
        &app.simulation.maze,
        app.simulation.swarm.particles(),
        app.simulation.carving_at(),
        inner.width,
        inner.height,
        &palette,
    );

    let buf = frame.buffer_mut();
    for cell in cells {
        let x = inner.x + cell.x;
        let y = inner.y + cell.y;

        if x < inner.x + inner.width && y < inner.y + inner.height {
            let mut style = Style::default().fg(cell.fg);
            if let Some(bg) = cell.bg {
                style = style.bg(bg);
            }
            buf[(x, y)].set_char(cell.char).set_style(style);
        }
    }
}

/// Centered rectangle of at most `width` x `height` inside `area`
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

fn render_completion_popup(frame: &mut Frame, area: Rect, app: &App) {
    let Some(report) = &app.simulation.report else {
        return;
    };

    let popup = centered(area, 40, 8);
    frame.render_widget(Clear, popup);

    let content = vec![
        Line::from(Span::styled("A particle reached the exit!", Style::default().fg(Color::Green))),
        Line::from(""),
        Line::from(format!("Elapsed time: {}", report.elapsed())),
        Line::from(format!("Particles: {}", report.particles)),
        Line::from(format!("Speed: {}", report.speed)),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Double)
        .border_style(Style::default().fg(Color::Green))
        .title(" Maze Complete (R reset, N new maze) ");

    frame.render_widget(Paragraph::new(content).block(block), popup);
}

fn render_help_overlay(frame: &mut Frame, area: Rect, app: &App) {
    let canvas_x = if app.fullscreen_mode { 0 } else { SIDEBAR_WIDTH };
    let canvas = Rect {
        x: area.x + canvas_x,
        y: area.y,
        width: area.width.saturating_sub(canvas_x),
        height: area.height,
    };
    let help_width = 56.min(canvas.width.saturating_sub(4));
    let help_height = area.height.saturating_sub(4).min(30);
    let help_area = centered(canvas, help_width, help_height);

    frame.render_widget(Clear, help_area);

    let content = vec![
        Line::from(""),
        Line::from(Span::styled("MAZE SWARM", Style::default().fg(BORDER_COLOR))),
        Line::from(""),
        Line::from("A perfect maze is carved by randomized depth-first search. Particles released in the top-left cell bounce off the walls until one reaches the bottom-right cell."),
        Line::from(""),
        Line::from(Span::styled("RUN CONTROL:", Style::default().fg(HIGHLIGHT_COLOR))),
        Line::from("Space = start / pause / resume"),
        Line::from("R = reset (clear particles and timer)"),
        Line::from("N = carve a new maze"),
        Line::from("A = toggle animated carving for the next maze; the swarm can start once carving ends"),
        Line::from(""),
        Line::from(Span::styled("PARAMETERS:", Style::default().fg(HIGHLIGHT_COLOR))),
        Line::from("Tab / Shift+Tab select, Up / Down adjust. Particles, speed and grid size can only change while idle."),
        Line::from(""),
        Line::from(Span::styled("DISPLAY:", Style::default().fg(HIGHLIGHT_COLOR))),
        Line::from("+/- = ticks per frame, C = color scheme, V = fullscreen"),
        Line::from("W = save settings to the config file, Q = quit"),
        Line::from(""),
    ];

    let content_height = content.len() as u16;
    let visible_height = help_height.saturating_sub(2);
    let is_scrollable = content_height > visible_height;

    let title = if is_scrollable {
        " Help (J/K scroll, H to close) "
    } else {
        " Help (H to close) "
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Double)
        .border_style(Style::default().fg(HIGHLIGHT_COLOR))
        .title(title);

    let paragraph = Paragraph::new(content)
        .block(block)
        .wrap(Wrap { trim: true })
        .scroll((app.help_scroll, 0));

    frame.render_widget(paragraph, help_area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::settings::MazeSettings;
    use ratatui::{backend::TestBackend, Terminal};
    use std::time::Instant;

    fn app() -> App {
        App::new(AppConfig {
            maze: MazeSettings {
                cols: 6,
                rows: 4,
                seed: Some(9),
                animate: false,
            },
            ..AppConfig::default()
        })
    }

    fn screen_text(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        buffer.content().iter().map(|c| c.symbol()).collect()
    }

    #[test]
    fn test_render_idle_sidebar() {
        let mut terminal = Terminal::new(TestBackend::new(80, 30)).unwrap();
        let app = app();

        terminal.draw(|frame| render(frame, &app)).unwrap();

        let text = screen_text(&terminal);
        assert!(text.contains("IDLE"));
        assert!(text.contains("Time: 00:00:00"));
        assert!(text.contains("Particles: 1000"));
    }

    #[test]
    fn test_render_completion_popup() {
        let mut terminal = Terminal::new(TestBackend::new(80, 30)).unwrap();
        let mut app = App::new(AppConfig {
            maze: MazeSettings {
                cols: 1,
                rows: 1,
                seed: Some(1),
                animate: false,
            },
            ..AppConfig::default()
        });
        let now = Instant::now();
        app.toggle_run(now);
        app.tick(now);

        terminal.draw(|frame| render(frame, &app)).unwrap();

        let text = screen_text(&terminal);
        assert!(text.contains("COMPLETE"));
        assert!(text.contains("Elapsed time: 00:00:00"));
    }

    #[test]
    fn test_render_tiny_terminal_does_not_panic() {
        let mut terminal = Terminal::new(TestBackend::new(10, 4)).unwrap();
        let mut app = app();
        app.toggle_help();
        terminal.draw(|frame| render(frame, &app)).unwrap();
    }

    #[test]
    fn test_render_while_generating() {
        let mut terminal = Terminal::new(TestBackend::new(80, 30)).unwrap();
        let mut app = app();
        app.toggle_animate();
        app.regenerate(Instant::now());

        terminal.draw(|frame| render(frame, &app)).unwrap();

        let text = screen_text(&terminal);
        assert!(text.contains("GENERATING"));
        assert!(text.contains("Carve: animated"));
    }
}
