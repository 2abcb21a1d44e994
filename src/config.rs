use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use ratatui::style::Color;
use ratatui::symbols::border;
use serde::Deserialize;
use thiserror::Error;

use crate::grid::GridSpace;

const APP_DIR_NAME: &str = "toroid-snake";
const CONFIG_FILE_NAME: &str = "config.json";
const LOG_FILE_NAME: &str = "toroid-snake.log";

/// Errors raised while loading or validating a [`GameConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse config file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// How the round's eat/crash events are voiced.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SoundMode {
    /// Ring the terminal bell.
    #[default]
    Bell,
    Off,
}

/// Immutable gameplay configuration handed to every constructor.
///
/// Every field has a default, so a config file only needs to name the values
/// it changes.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GameConfig {
    /// Grid width in cells.
    pub grid_width: u16,
    /// Grid height in cells.
    pub grid_height: u16,
    /// Side of one cell in pixels, used by [`GridSpace::to_pixels`].
    pub cell_size: u16,
    /// Frames per second at the start of a round.
    pub initial_speed: f64,
    /// Upper bound for the frame rate.
    pub max_speed: f64,
    /// Frame-rate gain per food eaten.
    pub speed_increment: f64,
    /// Step gate at the start of a round.
    pub initial_move_delay_ms: u64,
    /// The step gate never shrinks below this.
    pub min_move_delay_ms: u64,
    /// Multiplier applied to the step gate per food eaten.
    pub move_delay_factor: f64,
    pub points_per_food: u32,
    pub sound: SoundMode,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_width: 30,
            grid_height: 30,
            cell_size: 20,
            initial_speed: 10.0,
            max_speed: 25.0,
            speed_increment: 0.5,
            initial_move_delay_ms: 100,
            min_move_delay_ms: 40,
            move_delay_factor: 0.95,
            points_per_food: 10,
            sound: SoundMode::Bell,
        }
    }
}

impl GameConfig {
    /// Reads and validates a JSON config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_json(&raw).map_err(|error| match error {
            ConfigError::Parse { source, .. } => ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        })
    }

    /// Loads the per-user config file when it exists, defaults otherwise.
    pub fn load_or_default() -> Result<Self, ConfigError> {
        match config_path() {
            Some(path) if path.is_file() => Self::load(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Parses and validates a JSON document.
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw).map_err(|source| ConfigError::Parse {
            path: PathBuf::new(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the invariants the simulation relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid_width == 0 || self.grid_height == 0 {
            return Err(ConfigError::Invalid(format!(
                "grid must be at least 1x1, got {}x{}",
                self.grid_width, self.grid_height
            )));
        }
        if self.grid().total_cells() < 2 {
            return Err(ConfigError::Invalid(
                "grid needs room for the snake and one food cell".to_owned(),
            ));
        }
        if self.cell_size == 0 {
            return Err(ConfigError::Invalid("cell_size must be positive".to_owned()));
        }
        if self.initial_speed <= 0.0 || !self.initial_speed.is_finite() {
            return Err(ConfigError::Invalid(format!(
                "initial_speed must be positive, got {}",
                self.initial_speed
            )));
        }
        if self.max_speed < self.initial_speed || !self.max_speed.is_finite() {
            return Err(ConfigError::Invalid(format!(
                "max_speed {} is below initial_speed {}",
                self.max_speed, self.initial_speed
            )));
        }
        if self.speed_increment < 0.0 || !self.speed_increment.is_finite() {
            return Err(ConfigError::Invalid(format!(
                "speed_increment must not be negative, got {}",
                self.speed_increment
            )));
        }
        if self.min_move_delay_ms == 0 {
            return Err(ConfigError::Invalid(
                "min_move_delay_ms must be positive".to_owned(),
            ));
        }
        if self.min_move_delay_ms > self.initial_move_delay_ms {
            return Err(ConfigError::Invalid(format!(
                "min_move_delay_ms {} exceeds initial_move_delay_ms {}",
                self.min_move_delay_ms, self.initial_move_delay_ms
            )));
        }
        if self.move_delay_factor.is_nan()
            || self.move_delay_factor <= 0.0
            || self.move_delay_factor > 1.0
        {
            return Err(ConfigError::Invalid(format!(
                "move_delay_factor must be in (0, 1], got {}",
                self.move_delay_factor
            )));
        }
        Ok(())
    }

    #[must_use]
    pub fn grid(&self) -> GridSpace {
        GridSpace::new(self.grid_width, self.grid_height, self.cell_size)
    }

    #[must_use]
    pub fn initial_move_delay(&self) -> Duration {
        Duration::from_millis(self.initial_move_delay_ms)
    }

    #[must_use]
    pub fn min_move_delay(&self) -> Duration {
        Duration::from_millis(self.min_move_delay_ms)
    }
}

/// Returns the per-user config file path, if the platform has a config dir.
#[must_use]
pub fn config_path() -> Option<PathBuf> {
    let mut base = dirs::config_dir()?;
    base.push(APP_DIR_NAME);
    base.push(CONFIG_FILE_NAME);
    Some(base)
}

/// Returns the default log file path.
#[must_use]
pub fn default_log_path() -> PathBuf {
    let mut base = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    base.push(APP_DIR_NAME);
    base.push(LOG_FILE_NAME);
    base
}

/// Colors applied to all visual elements.
#[derive(Debug)]
pub struct Theme {
    pub snake_head: Color,
    pub snake_body: Color,
    pub food: Color,
    pub border_fg: Color,
    pub hud_text: Color,
    pub hud_muted: Color,
    pub game_over_title: Color,
    pub pause_title: Color,
}

/// Palette of the classic desktop version: green snake, red food.
pub const THEME_CLASSIC: Theme = Theme {
    snake_head: Color::Green,
    snake_body: Color::LightGreen,
    food: Color::Red,
    border_fg: Color::DarkGray,
    hud_text: Color::White,
    hud_muted: Color::DarkGray,
    game_over_title: Color::Red,
    pause_title: Color::Blue,
};

/// Rounded border for the play field.
pub const BORDER_PLAY_FIELD: border::Set = border::ROUNDED;

/// Terminal columns drawn per grid cell so cells look square.
pub const CELL_COLUMNS: u16 = 2;

pub const GLYPH_SNAKE_HEAD_UP: &str = "▲▲";
pub const GLYPH_SNAKE_HEAD_DOWN: &str = "▼▼";
pub const GLYPH_SNAKE_HEAD_LEFT: &str = "◀◀";
pub const GLYPH_SNAKE_HEAD_RIGHT: &str = "▶▶";
pub const GLYPH_SNAKE_BODY: &str = "██";
pub const GLYPH_FOOD: &str = "●●";
