//! Startup configuration
//!
//! Window and cell dimensions are read once from the command line and never
//! change afterwards; they fix the size of the grid for the whole run.

use clap::Parser;
use std::time::Duration;

/// Paint live cells with the mouse, then press the simulate key to watch them evolve
#[derive(Parser, Debug, Clone)]
#[command(name = "life_sandbox", version, about = "Interactive Game of Life sandbox")]
pub struct Config {
    /// Window width in pixels
    #[arg(long, value_name = "PX", default_value_t = 1200)]
    pub window_width: u32,

    /// Window height in pixels
    #[arg(long, value_name = "PX", default_value_t = 800)]
    pub window_height: u32,

    /// Cell width in pixels; must divide the window width
    #[arg(long, value_name = "PX", default_value_t = 10)]
    pub cell_width: u32,

    /// Cell height in pixels; must divide the window height
    #[arg(long, value_name = "PX", default_value_t = 10)]
    pub cell_height: u32,

    /// Upper bound on generations per second while simulating
    #[arg(long, value_name = "HZ", default_value_t = 60.0)]
    pub fps: f64,

    /// Key that switches from editing to simulating
    #[arg(long, value_name = "KEY", default_value_t = 'a')]
    pub simulate_key: char,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            window_width: 1200,
            window_height: 800,
            cell_width: 10,
            cell_height: 10,
            fps: 60.0,
            simulate_key: 'a',
        }
    }
}

/// Grid size derived from a validated [`Config`].
///
/// `width` counts playable cells along x, `height` along y; the ghost border
/// is not included.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridDimensions {
    pub width: usize,
    pub height: usize,
    pub cell_width: u32,
    pub cell_height: u32,
}

impl GridDimensions {
    pub fn window_width(&self) -> u32 {
        self.width as u32 * self.cell_width
    }

    pub fn window_height(&self) -> u32 {
        self.height as u32 * self.cell_height
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    ZeroWindowDimension(&'static str),
    ZeroCellDimension(&'static str),
    NotDivisible {
        axis: &'static str,
        window: u32,
        cell: u32,
    },
    InvalidFps(f64),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::ZeroWindowDimension(axis) => {
                write!(f, "window {} must be greater than zero", axis)
            }
            ConfigError::ZeroCellDimension(axis) => {
                write!(f, "cell {} must be greater than zero", axis)
            }
            ConfigError::NotDivisible { axis, window, cell } => write!(
                f,
                "window {} ({}) is not a multiple of cell {} ({})",
                axis, window, axis, cell
            ),
            ConfigError::InvalidFps(fps) => {
                write!(f, "fps must be a positive finite number, got {}", fps)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl Config {
    /// Check the dimensions and derive the grid size from them
    pub fn validate(&self) -> Result<GridDimensions, ConfigError> {
        let width = cells_along("width", self.window_width, self.cell_width)?;
        let height = cells_along("height", self.window_height, self.cell_height)?;

        self.frame_budget()?;

        Ok(GridDimensions {
            width,
            height,
            cell_width: self.cell_width,
            cell_height: self.cell_height,
        })
    }

    /// Wall-clock budget for one simulated generation. Rates so low that the
    /// budget overflows a `Duration` are rejected along with non-positive ones.
    pub fn frame_budget(&self) -> Result<Duration, ConfigError> {
        if !self.fps.is_finite() || self.fps <= 0.0 {
            return Err(ConfigError::InvalidFps(self.fps));
        }
        Duration::try_from_secs_f64(1.0 / self.fps).map_err(|_| ConfigError::InvalidFps(self.fps))
    }
}

fn cells_along(axis: &'static str, window: u32, cell: u32) -> Result<usize, ConfigError> {
    if window == 0 {
        return Err(ConfigError::ZeroWindowDimension(axis));
    }
    if cell == 0 {
        return Err(ConfigError::ZeroCellDimension(axis));
    }
    if window % cell != 0 {
        return Err(ConfigError::NotDivisible { axis, window, cell });
    }
    Ok((window / cell) as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_command_line_defaults() {
        let parsed = Config::parse_from(["life_sandbox"]);
        let default = Config::default();
        assert_eq!(parsed.window_width, default.window_width);
        assert_eq!(parsed.window_height, default.window_height);
        assert_eq!(parsed.cell_width, default.cell_width);
        assert_eq!(parsed.cell_height, default.cell_height);
        assert_eq!(parsed.fps, default.fps);
        assert_eq!(parsed.simulate_key, default.simulate_key);
    }

    #[test]
    fn default_grid_is_120_by_80() {
        let dims = Config::default().validate().unwrap();
        assert_eq!(dims.width, 120);
        assert_eq!(dims.height, 80);
        assert_eq!(dims.window_width(), 1200);
        assert_eq!(dims.window_height(), 800);
    }

    #[test]
    fn parses_flags() {
        let config = Config::parse_from([
            "life_sandbox",
            "--window-width",
            "300",
            "--window-height",
            "200",
            "--cell-width",
            "20",
            "--cell-height",
            "25",
            "--simulate-key",
            "s",
        ]);
        let dims = config.validate().unwrap();
        assert_eq!((dims.width, dims.height), (15, 8));
        assert_eq!(config.simulate_key, 's');
    }

    #[test]
    fn rejects_zero_dimensions() {
        let config = Config { window_height: 0, ..Config::default() };
        assert_eq!(config.validate(), Err(ConfigError::ZeroWindowDimension("height")));

        let config = Config { cell_width: 0, ..Config::default() };
        assert_eq!(config.validate(), Err(ConfigError::ZeroCellDimension("width")));
    }

    #[test]
    fn rejects_non_divisible_dimensions() {
        let config = Config { cell_width: 7, ..Config::default() };
        assert_eq!(
            config.validate(),
            Err(ConfigError::NotDivisible { axis: "width", window: 1200, cell: 7 })
        );
    }

    #[test]
    fn rejects_bad_fps() {
        for fps in [0.0, -1.0, f64::NAN, f64::INFINITY, 1e-20, f64::MIN_POSITIVE] {
            let config = Config { fps, ..Config::default() };
            assert!(matches!(config.validate(), Err(ConfigError::InvalidFps(_))), "fps = {}", fps);
            assert!(matches!(config.frame_budget(), Err(ConfigError::InvalidFps(_))), "fps = {}", fps);
        }
    }

    #[test]
    fn frame_budget_is_reciprocal_of_fps() {
        let budget = Config::default().frame_budget().unwrap();
        assert!((budget.as_secs_f64() - 1.0 / 60.0).abs() < 1e-9);

        let slow = Config { fps: 0.5, ..Config::default() };
        assert_eq!(slow.frame_budget(), Ok(Duration::from_secs(2)));
    }
}
