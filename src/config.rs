//! Game configuration and presets
//!
//! Every prototype variant (pong in a cube, pong on an AR plane, breakout in
//! a cube, breakout with lives) is one `GameConfig`. Volume size, paddle mode,
//! brick layout and lives are data, not separate code paths.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;

/// How the paddle is driven and which face it defends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum PaddleMode {
    /// Paddle floats near the camera-facing (+z) face, moves in x/y
    #[default]
    Pong3d,
    /// Paddle rides the defended line above the bottom face, moves in x
    Breakout2d,
}

impl PaddleMode {
    /// Axes the pointer drives
    pub fn controlled_axes(&self) -> &'static [usize] {
        match self {
            PaddleMode::Pong3d => &[0, 1],
            PaddleMode::Breakout2d => &[0],
        }
    }

    /// Axis the ball travels along to reach the paddle
    pub fn approach_axis(&self) -> usize {
        match self {
            PaddleMode::Pong3d => 2,
            PaddleMode::Breakout2d => 1,
        }
    }

    /// Sign of the velocity component that moves the ball toward the paddle
    pub fn approach_sign(&self) -> f32 {
        match self {
            PaddleMode::Pong3d => 1.0,
            PaddleMode::Breakout2d => -1.0,
        }
    }
}

/// Named variants of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Preset {
    /// Ball bouncing in a cube, paddle on the near face, floating target
    #[default]
    PongCube,
    /// Pong anchored on a detected AR plane, target at fixed depth
    PongPlane,
    /// Brick wall inside a cube, paddle at the bottom
    BreakoutCube,
    /// Breakout with two lives and a bonus target
    BreakoutLives,
}

impl Preset {
    pub const ALL: [Preset; 4] = [
        Preset::PongCube,
        Preset::PongPlane,
        Preset::BreakoutCube,
        Preset::BreakoutLives,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Preset::PongCube => "pong-cube",
            Preset::PongPlane => "pong-plane",
            Preset::BreakoutCube => "breakout-cube",
            Preset::BreakoutLives => "breakout-lives",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pong-cube" | "pong" => Some(Preset::PongCube),
            "pong-plane" | "plane" => Some(Preset::PongPlane),
            "breakout-cube" | "breakout" => Some(Preset::BreakoutCube),
            "breakout-lives" | "lives" => Some(Preset::BreakoutLives),
            _ => None,
        }
    }
}

/// Brick wall layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrickLayout {
    pub rows: u32,
    pub cols: u32,
    /// Full size of one brick
    pub brick_size: Vec3,
    /// Spacing between neighbouring bricks
    pub gap: f32,
    /// Distance between the volume's top face and the first row
    pub top_margin: f32,
}

impl Default for BrickLayout {
    fn default() -> Self {
        Self {
            rows: BRICK_ROWS,
            cols: BRICK_COLS,
            brick_size: Vec3::new(0.14, 0.05, 0.05),
            gap: BRICK_GAP,
            top_margin: BRICK_TOP_MARGIN,
        }
    }
}

impl BrickLayout {
    /// Total width and height of the laid-out field
    pub fn extent(&self) -> (f32, f32) {
        let width =
            self.cols as f32 * self.brick_size.x + self.cols.saturating_sub(1) as f32 * self.gap;
        let height =
            self.rows as f32 * self.brick_size.y + self.rows.saturating_sub(1) as f32 * self.gap;
        (width, height)
    }
}

/// Bonus target settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetConfig {
    pub hit_radius: f32,
    /// Wall-clock delay before a hit target reappears
    pub respawn_ms: u64,
    /// Fraction of the half-extents used for random placement
    pub spawn_fraction: f32,
    /// Fixed z for the target, or `None` to randomise z as well
    pub depth: Option<f32>,
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            hit_radius: TARGET_HIT_RADIUS,
            respawn_ms: TARGET_RESPAWN_MS,
            spawn_fraction: TARGET_SPAWN_FRACTION,
            depth: Some(0.0),
        }
    }
}

/// Complete setup for one game session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub mode: PaddleMode,
    /// Half-extents of the play volume, centred on the game group origin
    pub volume_half_extents: Vec3,
    pub ball_radius: f32,
    /// Per-frame serve velocity in pong mode (signs are randomised)
    pub serve_velocity: Vec3,
    /// Per-frame serve speed in breakout mode
    pub serve_speed: f32,
    /// Upper bound on per-frame ball speed
    pub max_speed: f32,
    /// Multiplier applied to ball speed on every breakout paddle hit
    pub paddle_speedup: f32,
    /// Serve speed increase per cleared brick field
    pub level_speedup: f32,
    pub paddle_half_extents: Vec3,
    /// Extra clearance between paddle and volume faces
    pub paddle_margin: f32,
    /// Distance of the paddle from the face it defends
    pub paddle_inset: f32,
    pub bricks: Option<BrickLayout>,
    pub target: Option<TargetConfig>,
    /// Starting lives (breakout only)
    pub lives: u8,
    /// Delay between clearing the field and the next one appearing
    pub field_regen_ms: u64,
    /// RNG seed for serves and target placement
    pub seed: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::from_preset(Preset::default())
    }
}

impl GameConfig {
    /// Build the configuration for a named variant
    pub fn from_preset(preset: Preset) -> Self {
        let pong = Self {
            mode: PaddleMode::Pong3d,
            volume_half_extents: Vec3::splat(VOLUME_HALF_EXTENT),
            ball_radius: BALL_RADIUS,
            serve_velocity: Vec3::from_array(PONG_SERVE_VELOCITY),
            serve_speed: BREAKOUT_SERVE_SPEED,
            max_speed: 0.1,
            paddle_speedup: 1.0,
            level_speedup: 0.0,
            paddle_half_extents: Vec3::new(PADDLE_HALF_WIDTH, PADDLE_HALF_HEIGHT, PADDLE_HALF_DEPTH),
            paddle_margin: 0.0,
            paddle_inset: PADDLE_FACE_INSET,
            bricks: None,
            target: Some(TargetConfig {
                depth: None,
                ..TargetConfig::default()
            }),
            lives: START_LIVES,
            field_regen_ms: FIELD_REGEN_MS,
            seed: 0,
        };

        let breakout = Self {
            mode: PaddleMode::Breakout2d,
            ball_radius: 0.03,
            serve_velocity: Vec3::ZERO,
            max_speed: 0.03,
            paddle_speedup: PADDLE_SPEEDUP,
            level_speedup: LEVEL_SPEEDUP,
            paddle_half_extents: Vec3::new(0.12, 0.02, 0.05),
            paddle_margin: 0.01,
            paddle_inset: PADDLE_LINE_INSET,
            bricks: Some(BrickLayout::default()),
            target: None,
            ..pong.clone()
        };

        match preset {
            Preset::PongCube => pong,
            Preset::PongPlane => Self {
                volume_half_extents: Vec3::new(0.75, 0.5, 0.5),
                target: Some(TargetConfig::default()),
                ..pong
            },
            Preset::BreakoutCube => breakout,
            Preset::BreakoutLives => Self {
                lives: 2,
                target: Some(TargetConfig::default()),
                ..breakout
            },
        }
    }

    /// Parse and validate a JSON config; missing fields fall back to defaults
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON config file
    #[cfg(not(target_arch = "wasm32"))]
    pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject geometry that would produce NaNs or degenerate collisions
    pub fn validate(&self) -> Result<(), ConfigError> {
        let half = self.volume_half_extents;
        positive("volume_half_extents.x", half.x)?;
        positive("volume_half_extents.y", half.y)?;
        positive("volume_half_extents.z", half.z)?;
        positive("ball_radius", self.ball_radius)?;
        positive("max_speed", self.max_speed)?;
        positive("paddle_half_extents.x", self.paddle_half_extents.x)?;
        positive("paddle_half_extents.y", self.paddle_half_extents.y)?;
        positive("paddle_half_extents.z", self.paddle_half_extents.z)?;
        non_negative("paddle_margin", self.paddle_margin)?;
        non_negative("paddle_inset", self.paddle_inset)?;

        if self.ball_radius >= half.min_element() {
            return Err(ConfigError::DoesNotFit { what: "ball" });
        }

        for &a in self.mode.controlled_axes() {
            let limit = crate::axis(half, a)
                - crate::axis(self.paddle_half_extents, a)
                - self.paddle_margin;
            if limit < 0.0 {
                return Err(ConfigError::DoesNotFit { what: "paddle" });
            }
        }
        let approach = self.mode.approach_axis();
        if self.paddle_inset > crate::axis(half, approach) {
            return Err(ConfigError::DoesNotFit { what: "paddle" });
        }

        if !(self.paddle_speedup >= 1.0) {
            return Err(ConfigError::OutOfRange {
                field: "paddle_speedup",
                value: self.paddle_speedup,
            });
        }
        non_negative("level_speedup", self.level_speedup)?;

        match self.mode {
            PaddleMode::Pong3d => {
                if self.serve_velocity.length_squared() == 0.0 || !self.serve_velocity.is_finite() {
                    return Err(ConfigError::NonPositive {
                        field: "serve_velocity",
                        value: self.serve_velocity.length(),
                    });
                }
            }
            PaddleMode::Breakout2d => {
                positive("serve_speed", self.serve_speed)?;
                if self.lives == 0 {
                    return Err(ConfigError::NoLives);
                }
            }
        }

        if let Some(layout) = &self.bricks {
            if layout.rows == 0 || layout.cols == 0 {
                return Err(ConfigError::EmptyBrickField {
                    rows: layout.rows,
                    cols: layout.cols,
                });
            }
            let count = u64::from(layout.rows) * u64::from(layout.cols);
            if count > u64::from(MAX_BRICKS) {
                return Err(ConfigError::OutOfRange {
                    field: "bricks.rows * bricks.cols",
                    value: count as f32,
                });
            }
            positive("brick_size.x", layout.brick_size.x)?;
            positive("brick_size.y", layout.brick_size.y)?;
            positive("brick_size.z", layout.brick_size.z)?;
            non_negative("brick gap", layout.gap)?;
            non_negative("brick top_margin", layout.top_margin)?;
            let (width, height) = layout.extent();
            if width > 2.0 * half.x
                || height + layout.top_margin > 2.0 * half.y
                || layout.brick_size.z > 2.0 * half.z
            {
                return Err(ConfigError::DoesNotFit { what: "brick field" });
            }
        }

        if let Some(target) = &self.target {
            positive("target.hit_radius", target.hit_radius)?;
            if !(target.spawn_fraction > 0.0 && target.spawn_fraction <= 1.0) {
                return Err(ConfigError::OutOfRange {
                    field: "target.spawn_fraction",
                    value: target.spawn_fraction,
                });
            }
            if let Some(depth) = target.depth {
                if !(depth.abs() <= half.z) {
                    return Err(ConfigError::DoesNotFit { what: "target" });
                }
            }
        }

        Ok(())
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    // Written so NaN fails too
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { field, value })
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value >= 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange { field, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_presets_validate() {
        for preset in Preset::ALL {
            let config = GameConfig::from_preset(preset);
            assert!(config.validate().is_ok(), "{} failed validation", preset.as_str());
        }
    }

    #[test]
    fn test_preset_names_roundtrip() {
        for preset in Preset::ALL {
            assert_eq!(Preset::from_str(preset.as_str()), Some(preset));
        }
        assert_eq!(Preset::from_str("BREAKOUT"), Some(Preset::BreakoutCube));
        assert_eq!(Preset::from_str("tetris"), None);
    }

    #[test]
    fn test_rejects_zero_radius() {
        let config = GameConfig {
            ball_radius: 0.0,
            ..GameConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NonPositive { field: "ball_radius", .. })
        ));
    }

    #[test]
    fn test_rejects_nan_extent() {
        let config = GameConfig {
            volume_half_extents: Vec3::new(f32::NAN, 0.5, 0.5),
            ..GameConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_empty_brick_field() {
        let mut config = GameConfig::from_preset(Preset::BreakoutCube);
        if let Some(layout) = config.bricks.as_mut() {
            layout.cols = 0;
        }
        assert!(matches!(
            config.validate(),
            Err(ConfigError::EmptyBrickField { rows: 4, cols: 0 })
        ));
    }

    #[test]
    fn test_rejects_oversized_field() {
        let mut config = GameConfig::from_preset(Preset::BreakoutCube);
        if let Some(layout) = config.bricks.as_mut() {
            layout.cols = 20;
        }
        assert!(matches!(
            config.validate(),
            Err(ConfigError::DoesNotFit { what: "brick field" })
        ));
    }

    #[test]
    fn test_rejects_too_many_bricks() {
        let mut config = GameConfig::from_preset(Preset::BreakoutCube);
        if let Some(layout) = config.bricks.as_mut() {
            // Would fit geometrically, but rows * cols overflows u32
            layout.rows = 70_000;
            layout.cols = 70_000;
            layout.brick_size = Vec3::splat(1e-7);
            layout.gap = 0.0;
        }
        assert!(matches!(
            config.validate(),
            Err(ConfigError::OutOfRange {
                field: "bricks.rows * bricks.cols",
                ..
            })
        ));

        if let Some(layout) = config.bricks.as_mut() {
            layout.rows = 32;
            layout.cols = 32;
        }
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_oversized_paddle() {
        let config = GameConfig {
            paddle_half_extents: Vec3::new(0.6, 0.2, 0.025),
            ..GameConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::DoesNotFit { what: "paddle" })
        ));
    }

    #[test]
    fn test_rejects_breakout_without_lives() {
        let config = GameConfig {
            lives: 0,
            ..GameConfig::from_preset(Preset::BreakoutCube)
        };
        assert!(matches!(config.validate(), Err(ConfigError::NoLives)));
    }

    #[test]
    fn test_json_partial_uses_defaults() {
        let config = GameConfig::from_json(r#"{ "seed": 42, "lives": 5 }"#).unwrap();
        assert_eq!(config.seed, 42);
        assert_eq!(config.lives, 5);
        assert_eq!(config.mode, PaddleMode::Pong3d);
        assert_eq!(config.ball_radius, BALL_RADIUS);
    }

    #[test]
    fn test_json_roundtrip_preserves_config() {
        let config = GameConfig::from_preset(Preset::BreakoutLives);
        let json = config.to_json().unwrap();
        assert_eq!(GameConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn test_json_errors_are_reported() {
        assert!(matches!(
            GameConfig::from_json("{ not json"),
            Err(ConfigError::Json(_))
        ));
        assert!(GameConfig::from_json(r#"{ "ball_radius": -1.0 }"#).is_err());
    }
}
