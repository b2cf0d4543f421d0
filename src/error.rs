use thiserror::Error;

/// Unified error type for shapeload
#[derive(Error, Debug)]
pub enum ShapeLoadError {
    #[error("Terminal error: {0}")]
    Terminal(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

pub type ShapeLoadResult<T> = Result<T, ShapeLoadError>;
