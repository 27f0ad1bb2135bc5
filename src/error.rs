use thiserror::Error;

/// Failures of the picking and integer helpers in [`crate::math`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    #[error("combined projection * model-view matrix is not invertible")]
    SingularMatrix,
    #[error("unprojected point has w = 0 and lies at infinity")]
    PointAtInfinity,
    #[error("next_power_of_two requires a positive input, got {0}")]
    NonPositive(i64),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ColorParseError {
    #[error("empty color string")]
    Empty,
    #[error("invalid hex color {0:?}")]
    InvalidHex(String),
    #[error("invalid color function {0:?}")]
    InvalidFunction(String),
    #[error("unrecognized color format {0:?}")]
    Unrecognized(String),
}

/// Errors reported by a [`crate::renderer::GraphicsBackend`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BackendError {
    #[error("shader compilation failed: {0}")]
    Compile(String),
    #[error("buffer allocation failed: {0}")]
    Allocation(String),
    #[error("failed to release {0}")]
    Release(String),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RenderError {
    #[error("backend error: {0}")]
    Backend(#[from] BackendError),
    #[error("color error: {0}")]
    Color(#[from] ColorParseError),
}
