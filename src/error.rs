use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid frame dimensions {width}x{height}")]
    InvalidFrame { width: u32, height: u32 },

    #[error("Mask #{index} is empty")]
    EmptyMask { index: usize },

    #[error("Mask #{index} has dimensions {found:?}, expected {expected:?}")]
    MaskDimensions {
        index: usize,
        expected: (u32, u32),
        found: (u32, u32),
    },

    #[error("Json Error: {0}")]
    Json(#[from] serde_json::Error),
}
