use crate::color::ColorScheme;
use crate::settings::{MazeSettings, SwarmSettings};
use anyhow::{Context, Result};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_VERSION: u32 = 1;

pub const MIN_TICKS_PER_FRAME: usize = 1;
pub const MAX_TICKS_PER_FRAME: usize = 20;

/// Complete application configuration for export/import
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Version field for future compatibility
    pub version: u32,
    /// Grid shape and seed
    pub maze: MazeSettings,
    /// Particle count and speed
    pub swarm: SwarmSettings,
    /// Canvas palette (app-level)
    pub color_scheme: ColorScheme,
    /// Simulation ticks per rendered frame (app-level)
    pub ticks_per_frame: usize,
}

impl AppConfig {
    /// Default config location, `<config dir>/maze-swarm/config.json`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("maze-swarm").join("config.json"))
    }

    /// Export config to a JSON file
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create config directory {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(self).context("failed to serialize config")?;
        fs::write(path, json)
            .with_context(|| format!("failed to write config file {}", path.display()))?;
        debug!("wrote config to {}", path.display());
        Ok(())
    }

    /// Import config from a JSON file. Values are clamped into range.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let mut config: AppConfig = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse config file {}", path.display()))?;
        config.sanitize();
        debug!("loaded config from {}", path.display());
        Ok(config)
    }

    /// Resolve the startup config: an explicit path must load, the default
    /// path is used only if it exists and parses
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load_from_file(path);
        }
        match Self::default_path() {
            Some(path) if path.exists() => match Self::load_from_file(&path) {
                Ok(config) => Ok(config),
                Err(err) => {
                    warn!("ignoring config at {}: {:#}", path.display(), err);
                    Ok(Self::default())
                }
            },
            _ => Ok(Self::default()),
        }
    }

    pub fn sanitize(&mut self) {
        self.maze.sanitize();
        self.swarm.sanitize();
        self.ticks_per_frame = self
            .ticks_per_frame
            .clamp(MIN_TICKS_PER_FRAME, MAX_TICKS_PER_FRAME);
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            maze: MazeSettings::default(),
            swarm: SwarmSettings::default(),
            color_scheme: ColorScheme::default(),
            ticks_per_frame: 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::{tempdir, NamedTempFile};

    #[test]
    fn test_config_file_save_and_load() {
        let config = AppConfig {
            version: 1,
            maze: MazeSettings {
                cols: 12,
                rows: 7,
                seed: Some(1234),
                animate: true,
            },
            swarm: SwarmSettings {
                particle_count: 2500,
                speed: 4,
            },
            color_scheme: ColorScheme::Neon,
            ticks_per_frame: 6,
        };

        let temp_file = NamedTempFile::new().unwrap();
        config.save_to_file(temp_file.path()).unwrap();
        let loaded = AppConfig::load_from_file(temp_file.path()).unwrap();

        assert_eq!(loaded, config);
    }

    #[test]
    fn test_save_creates_parent_directories() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");

        AppConfig::default().save_to_file(&path).unwrap();

        assert!(path.exists());
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let temp_file = NamedTempFile::new().unwrap();
        std::fs::write(temp_file.path(), r#"{ "swarm": { "speed": 3 } }"#).unwrap();

        let loaded = AppConfig::load_from_file(temp_file.path()).unwrap();

        assert_eq!(loaded.swarm.speed, 3);
        assert_eq!(loaded.swarm.particle_count, 1000);
        assert_eq!(loaded.maze, MazeSettings::default());
        assert_eq!(loaded.ticks_per_frame, 2);
    }

    #[test]
    fn test_out_of_range_values_are_clamped() {
        let temp_file = NamedTempFile::new().unwrap();
        std::fs::write(
            temp_file.path(),
            r#"{ "maze": { "cols": 0, "rows": 900 }, "swarm": { "particle_count": 5, "speed": 50 }, "ticks_per_frame": 0 }"#,
        )
        .unwrap();

        let loaded = AppConfig::load_from_file(temp_file.path()).unwrap();

        assert_eq!(loaded.maze.cols, 1);
        assert_eq!(loaded.maze.rows, 100);
        assert_eq!(loaded.swarm.particle_count, 300);
        assert_eq!(loaded.swarm.speed, 10);
        assert_eq!(loaded.ticks_per_frame, 1);
    }

    #[test]
    fn test_invalid_config_file() {
        let temp_file = NamedTempFile::new().unwrap();
        std::fs::write(temp_file.path(), "not valid json").unwrap();

        let result = AppConfig::load_from_file(temp_file.path());
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_explicit_config_is_an_error() {
        let result = AppConfig::resolve(Some(Path::new("/nonexistent/path/config.json")));
        assert!(result.is_err());
    }
}
