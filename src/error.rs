use thiserror::Error;

/// Rejected configuration or geometry input. Raised before any projection runs.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("invalid page size {width}x{height}: both dimensions must be positive")]
    InvalidPageSize { width: u32, height: u32 },

    #[error("{name} must be a finite, non-negative number (got {value})")]
    InvalidThreshold { name: &'static str, value: f32 },

    #[error("runtime.max_concurrent_pages must be at least 1")]
    ZeroConcurrency,

    #[error("{name} must not be empty")]
    EmptyField { name: &'static str },
}

pub fn check_page_size(width: u32, height: u32) -> Result<(), ConfigError> {
    if width == 0 || height == 0 {
        return Err(ConfigError::InvalidPageSize { width, height });
    }
    Ok(())
}

pub(crate) fn check_threshold(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if !value.is_finite() || value < 0.0 {
        return Err(ConfigError::InvalidThreshold { name, value });
    }
    Ok(())
}
