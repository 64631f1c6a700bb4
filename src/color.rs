use ratatui::style::Color;
use serde::{Deserialize, Serialize};

/// Palette used by the canvas renderer
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum ColorScheme {
    /// White walls, green particles, magenta tint
    #[default]
    Classic,
    Mono,
    Neon,
}

/// Resolved colors for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    pub wall: Color,
    pub particle: Color,
    pub visited: Color,
    pub goal: Color,
    /// Head of the carving search
    pub carving: Color,
}

impl ColorScheme {
    pub fn name(&self) -> &str {
        match self {
            ColorScheme::Classic => "Classic",
            ColorScheme::Mono => "Mono",
            ColorScheme::Neon => "Neon",
        }
    }

    pub fn next(&self) -> ColorScheme {
        match self {
            ColorScheme::Classic => ColorScheme::Mono,
            ColorScheme::Mono => ColorScheme::Neon,
            ColorScheme::Neon => ColorScheme::Classic,
        }
    }

    pub fn prev(&self) -> ColorScheme {
        match self {
            ColorScheme::Classic => ColorScheme::Neon,
            ColorScheme::Mono => ColorScheme::Classic,
            ColorScheme::Neon => ColorScheme::Mono,
        }
    }

    /// Parse a scheme name, falling back to Classic
    pub fn parse(s: &str) -> ColorScheme {
        match s.to_lowercase().as_str() {
            "mono" | "monochrome" => ColorScheme::Mono,
            "neon" => ColorScheme::Neon,
            _ => ColorScheme::Classic,
        }
    }

    pub fn palette(&self) -> Palette {
        match self {
            ColorScheme::Classic => Palette {
                wall: Color::Rgb(255, 255, 255),
                particle: Color::Rgb(112, 183, 126),
                visited: Color::Rgb(70, 10, 48),
                goal: Color::Rgb(120, 100, 0),
                carving: Color::Rgb(0, 160, 60),
            },
            ColorScheme::Mono => Palette {
                wall: Color::White,
                particle: Color::Gray,
                visited: Color::Rgb(30, 30, 30),
                goal: Color::DarkGray,
                carving: Color::Gray,
            },
            ColorScheme::Neon => Palette {
                wall: Color::Rgb(0, 255, 255),
                particle: Color::Rgb(255, 0, 255),
                visited: Color::Rgb(40, 0, 80),
                goal: Color::Rgb(0, 90, 0),
                carving: Color::Rgb(255, 0, 128),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycle_visits_every_scheme() {
        let start = ColorScheme::default();
        assert_eq!(start.next().next().next(), start);
        assert_eq!(start.prev().next(), start);
    }

    #[test]
    fn test_parse() {
        assert_eq!(ColorScheme::parse("NEON"), ColorScheme::Neon);
        assert_eq!(ColorScheme::parse("mono"), ColorScheme::Mono);
        assert_eq!(ColorScheme::parse("whatever"), ColorScheme::Classic);
    }
}
