use serde::Deserialize;
use std::{fs, path::Path};

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct SnakeConfig
{
    /// Board side length in tiles.
    pub grid: i32,
    pub tick_ms: u32,
    pub base_step_ms: u32,
    pub min_step_ms: u32,
    pub speed_bonus_ms: u32,
    pub min_food: usize,
    pub food_points: u32,
}

impl Default for SnakeConfig
{
    fn default() -> Self
    {
        Self {
            grid: 20,
            tick_ms: 16,
            base_step_ms: 144,
            min_step_ms: 96,
            speed_bonus_ms: 2,
            min_food: 3,
            food_points: 10,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct HoopsConfig
{
    pub gravity: f32,
    pub air_resistance: f32,
    pub max_power: f32,
    pub misses_per_penalty: u32,
    pub show_trajectory: bool,
}

impl Default for HoopsConfig
{
    fn default() -> Self
    {
        Self {
            gravity: 0.4,
            air_resistance: 0.99,
            max_power: 25.0,
            misses_per_penalty: 3,
            show_trajectory: false,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct TwentyFourConfig
{
    pub target: i64,
    /// Only deal hands that have at least one solution.
    pub solvable_only: bool,
}

impl Default for TwentyFourConfig
{
    fn default() -> Self
    {
        Self {
            target: 24,
            solvable_only: true,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq, Default)]
#[serde(default)]
pub struct ArcadeConfig
{
    pub snake: SnakeConfig,
    pub hoops: HoopsConfig,
    pub twentyfour: TwentyFourConfig,
}

impl ArcadeConfig
{
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, String>
    {
        let data = fs::read_to_string(path.as_ref()).map_err(|e| format!("read config: {e}"))?;
        toml::from_str(&data).map_err(|e| format!("parse TOML: {e}"))
    }

    /// Falls back to defaults when the file is missing or broken; the second
    /// element carries the reason.
    pub fn load_or_default(path: impl AsRef<Path>) -> (Self, Option<String>)
    {
        let path = path.as_ref();
        if !path.exists() {
            return (Self::default(), Some(format!("config {} not found, using defaults", path.display())));
        }
        match Self::load_from_file(path) {
            Ok(cfg) => (cfg, None),
            Err(e) => (Self::default(), Some(format!("config {}: {e}; using defaults", path.display()))),
        }
    }

    pub fn validate(&self) -> Vec<String>
    {
        let mut warnings = Vec::new();
        let snake = &self.snake;
        if snake.grid < 4 {
            warnings.push(format!("snake.grid {} is below 4 tiles", snake.grid));
        }
        if snake.tick_ms == 0 {
            warnings.push("snake.tick_ms must be positive".to_string());
        }
        if snake.min_step_ms == 0 {
            warnings.push("snake.min_step_ms must be positive".to_string());
        }
        if snake.min_step_ms > snake.base_step_ms {
            warnings.push(format!(
                "snake.min_step_ms {} exceeds base_step_ms {}",
                snake.min_step_ms, snake.base_step_ms
            ));
        }
        if snake.min_food == 0 {
            warnings.push("snake.min_food is 0; the board will stay empty".to_string());
        }

        let hoops = &self.hoops;
        if hoops.gravity <= 0.0 {
            warnings.push(format!("hoops.gravity {} should be positive", hoops.gravity));
        }
        if !(0.0..=1.0).contains(&hoops.air_resistance) {
            warnings.push(format!(
                "hoops.air_resistance {} outside [0,1]",
                hoops.air_resistance
            ));
        }
        if hoops.max_power <= 0.0 {
            warnings.push(format!("hoops.max_power {} should be positive", hoops.max_power));
        }
        if hoops.misses_per_penalty == 0 {
            warnings.push("hoops.misses_per_penalty must be at least 1".to_string());
        }

        if self.twentyfour.target <= 0 {
            warnings.push(format!("twentyfour.target {} should be positive", self.twentyfour.target));
        }
        warnings
    }

    /// Replaces out-of-range values that would stall or break a game.
    pub fn sanitized(mut self) -> Self
    {
        let defaults = Self::default();
        if self.snake.grid < 4 {
            self.snake.grid = defaults.snake.grid;
        }
        if self.snake.tick_ms == 0 {
            self.snake.tick_ms = defaults.snake.tick_ms;
        }
        if self.snake.min_step_ms == 0 {
            self.snake.min_step_ms = defaults.snake.min_step_ms;
        }
        self.snake.base_step_ms = self.snake.base_step_ms.max(self.snake.min_step_ms);
        if self.hoops.gravity <= 0.0 {
            self.hoops.gravity = defaults.hoops.gravity;
        }
        if self.hoops.max_power <= 0.0 {
            self.hoops.max_power = defaults.hoops.max_power;
        }
        if self.hoops.misses_per_penalty == 0 {
            self.hoops.misses_per_penalty = defaults.hoops.misses_per_penalty;
        }
        self.hoops.air_resistance = self.hoops.air_resistance.clamp(0.0, 1.0);
        self
    }
}

#[cfg(test)]
mod tests
{
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_partial_file()
    {
        let sample = r#"
            [snake]
            grid = 12
            min_food = 5

            [hoops]
            show_trajectory = true
        "#;
        let mut file = tempfile::NamedTempFile::new().expect("tmp file");
        file.write_all(sample.as_bytes()).unwrap();
        let cfg = ArcadeConfig::load_from_file(file.path()).expect("parse config");
        assert_eq!(cfg.snake.grid, 12);
        assert_eq!(cfg.snake.min_food, 5);
        assert_eq!(cfg.snake.base_step_ms, 144);
        assert!(cfg.hoops.show_trajectory);
        assert_eq!(cfg.twentyfour.target, 24);
        assert!(cfg.validate().is_empty());
    }

    #[test]
    fn test_load_or_default_missing_file()
    {
        let dir = tempfile::tempdir().unwrap();
        let (cfg, warning) = ArcadeConfig::load_or_default(dir.path().join("nope.toml"));
        assert_eq!(cfg, ArcadeConfig::default());
        assert!(warning.unwrap().contains("not found"));
    }

    #[test]
    fn test_load_or_default_broken_file()
    {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"[snake\ngrid = ").unwrap();
        let (cfg, warning) = ArcadeConfig::load_or_default(file.path());
        assert_eq!(cfg, ArcadeConfig::default());
        assert!(warning.unwrap().contains("parse TOML"));
    }

    #[test]
    fn test_validate_and_sanitize()
    {
        let mut cfg = ArcadeConfig::default();
        cfg.snake.grid = 2;
        cfg.snake.min_step_ms = 200;
        cfg.hoops.air_resistance = 1.5;
        cfg.hoops.misses_per_penalty = 0;
        let warnings = cfg.validate();
        assert_eq!(warnings.len(), 4);

        let fixed = cfg.sanitized();
        assert_eq!(fixed.snake.grid, 20);
        assert_eq!(fixed.snake.base_step_ms, 200);
        assert_eq!(fixed.hoops.air_resistance, 1.0);
        assert_eq!(fixed.hoops.misses_per_penalty, 3);
    }

    #[test]
    fn test_sanitize_restores_hoops_physics()
    {
        let mut cfg = ArcadeConfig::default();
        cfg.hoops.gravity = -1.0;
        cfg.hoops.max_power = 0.0;
        assert_eq!(cfg.validate().len(), 2);

        let fixed = cfg.sanitized();
        assert_eq!(fixed.hoops.gravity, 0.4);
        assert_eq!(fixed.hoops.max_power, 25.0);

        let mut cfg = ArcadeConfig::default();
        cfg.hoops.gravity = 0.0;
        assert_eq!(cfg.sanitized().hoops.gravity, 0.4);
    }
}
