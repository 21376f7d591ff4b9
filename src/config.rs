use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable naming a config file to load.
pub const CONFIG_ENV: &str = "POCKETCRAFT_CONFIG";
/// Config file consulted when neither the CLI nor the environment names one.
pub const DEFAULT_CONFIG_PATH: &str = "config/pocketcraft.toml";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Screen geometry and terrain shaping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    pub screen_width: i32,
    pub screen_height: i32,
    pub tile_size: i32,
    /// Shallowest allowed surface row.
    pub min_height: i32,
    /// Rows kept between the deepest surface row and the screen bottom.
    pub bottom_margin: i32,
    pub dirt_depth: i32,
    pub tree_chance: f64,
    pub trunk_min: i32,
    pub trunk_max: i32,
    /// Manhattan radius of the leaf canopy.
    pub canopy_radius: i32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            screen_width: 320,
            screen_height: 222,
            tile_size: 16,
            min_height: 5,
            bottom_margin: 8,
            dirt_depth: 4,
            tree_chance: 0.1,
            trunk_min: 3,
            trunk_max: 5,
            canopy_radius: 3,
        }
    }
}

impl WorldConfig {
    /// Whole tile rows that fit on screen.
    pub fn rows(&self) -> i32 {
        self.screen_height / self.tile_size
    }

    /// Tile columns in one screen-width strip.
    pub fn columns(&self) -> i32 {
        self.screen_width / self.tile_size
    }

    pub fn base_height(&self) -> i32 {
        self.rows() / 2
    }

    pub fn max_height(&self) -> i32 {
        self.rows() - self.bottom_margin
    }

    /// Clamp a surface row into `[min_height, max_height]`. The lower bound
    /// wins when the screen is too short for the range to be non-empty.
    pub fn clamp_height(&self, h: i32) -> i32 {
        self.min_height.max(h.min(self.max_height()))
    }

    /// Horizontal toroidal wrap of a pixel x.
    pub fn wrap_x(&self, x: i32) -> i32 {
        x.rem_euclid(self.screen_width)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Added to vertical velocity every frame.
    pub gravity: i32,
    /// Vertical velocity set by a jump (negative is up).
    pub jump_force: i32,
    /// Horizontal pixels per frame while a direction key is held.
    pub speed: i32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: 1,
            jump_force: -8,
            speed: 4,
        }
    }
}

/// Top-level game configuration, loadable from TOML.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub world: WorldConfig,
    pub physics: PhysicsConfig,
    pub frame_ms: u64,
    pub seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            world: WorldConfig::default(),
            physics: PhysicsConfig::default(),
            frame_ms: 33,
            seed: None,
        }
    }
}

impl Config {
    /// Load config from `explicit`, else `$POCKETCRAFT_CONFIG`, else the
    /// default path. A named file must exist and parse; the default path
    /// falls back to defaults when missing or broken.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let named = explicit
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from));

        let cfg = match named {
            Some(path) => Self::from_file(&path)?,
            None => match Self::from_file(Path::new(DEFAULT_CONFIG_PATH)) {
                Ok(cfg) => cfg,
                Err(ConfigError::Read { .. }) => Config::default(),
                Err(e) => {
                    tracing::warn!("{e}, using defaults");
                    Config::default()
                }
            },
        };
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let cfg = toml::from_str::<Config>(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::info!(path = %path.display(), "loaded config");
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let w = &self.world;
        if w.tile_size <= 0 {
            return Err(ConfigError::Invalid("tile_size must be positive".into()));
        }
        if w.screen_width < w.tile_size || w.screen_height < w.tile_size {
            return Err(ConfigError::Invalid(format!(
                "screen {}x{} is smaller than one tile",
                w.screen_width, w.screen_height
            )));
        }
        if w.trunk_min < 1 || w.trunk_min > w.trunk_max {
            return Err(ConfigError::Invalid(format!(
                "trunk range {}..={} is empty",
                w.trunk_min, w.trunk_max
            )));
        }
        if !(0.0..=1.0).contains(&w.tree_chance) {
            return Err(ConfigError::Invalid(format!(
                "tree_chance {} is not a probability",
                w.tree_chance
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_geometry() {
        let w = WorldConfig::default();
        assert_eq!(w.rows(), 13);
        assert_eq!(w.columns(), 20);
        assert_eq!(w.base_height(), 6);
        assert_eq!(w.max_height(), 5);
    }

    #[test]
    fn clamp_prefers_floor_on_short_screens() {
        let w = WorldConfig::default();
        // range is [5, 5] on the stock screen
        assert_eq!(w.clamp_height(0), 5);
        assert_eq!(w.clamp_height(9), 5);

        let tiny = WorldConfig {
            screen_height: 160,
            ..WorldConfig::default()
        };
        assert!(tiny.max_height() < tiny.min_height);
        assert_eq!(tiny.clamp_height(3), 5);
    }

    #[test]
    fn wrap_x_is_euclidean() {
        let w = WorldConfig::default();
        assert_eq!(w.wrap_x(320), 0);
        assert_eq!(w.wrap_x(336), 16);
        assert_eq!(w.wrap_x(-32), 288);
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let cfg: Config = toml::from_str(
            r#"
            seed = 7
            [physics]
            speed = 2
            "#,
        )
        .unwrap();
        assert_eq!(cfg.seed, Some(7));
        assert_eq!(cfg.physics.speed, 2);
        assert_eq!(cfg.physics.jump_force, -8);
        assert_eq!(cfg.world, WorldConfig::default());
        assert_eq!(cfg.frame_ms, 33);
    }

    #[test]
    fn validate_rejects_bad_values() {
        let mut cfg = Config::default();
        assert!(cfg.validate().is_ok());

        cfg.world.tile_size = 0;
        assert!(cfg.validate().is_err());

        let mut cfg = Config::default();
        cfg.world.trunk_min = 6;
        assert!(cfg.validate().is_err());

        let mut cfg = Config::default();
        cfg.world.tree_chance = 1.5;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let err = Config::load(Some(Path::new("/nonexistent/pocketcraft.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
