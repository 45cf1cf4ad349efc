//! Configuration errors
//!
//! The per-frame simulation is infallible; everything that can go wrong is
//! caught once, when a session is built from its config.

/// Errors raised while loading or validating a [`crate::GameConfig`].
#[derive(Debug)]
pub enum ConfigError {
    /// A length that must be strictly positive was zero, negative or NaN.
    NonPositive { field: &'static str, value: f32 },
    /// Brick layout with zero rows or columns.
    EmptyBrickField { rows: u32, cols: u32 },
    /// Some entity does not fit inside the play volume.
    DoesNotFit { what: &'static str },
    /// A multiplier or fraction outside its allowed range.
    OutOfRange { field: &'static str, value: f32 },
    /// Breakout mode with zero starting lives.
    NoLives,
    /// Preset name not recognised.
    UnknownPreset(String),
    /// Standard I/O error while reading a config file.
    Io(std::io::Error),
    /// JSON serialization/deserialization error.
    Json(serde_json::Error),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::NonPositive { field, value } => {
                write!(f, "{field} must be positive, got {value}")
            }
            ConfigError::EmptyBrickField { rows, cols } => {
                write!(f, "brick field needs at least one row and column, got {rows}x{cols}")
            }
            ConfigError::DoesNotFit { what } => write!(f, "{what} does not fit in the play volume"),
            ConfigError::OutOfRange { field, value } => {
                write!(f, "{field} out of range: {value}")
            }
            ConfigError::NoLives => write!(f, "breakout mode needs at least one life"),
            ConfigError::UnknownPreset(name) => write!(f, "unknown preset: {name}"),
            ConfigError::Io(e) => write!(f, "IO error: {e}"),
            ConfigError::Json(e) => write!(f, "JSON error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Json(e)
    }
}
