/// Convenience result type used across routereel.
pub type RouteReelResult<T> = Result<T, RouteReelError>;

/// Top-level error taxonomy returned by every fallible operation.
#[derive(thiserror::Error, Debug)]
pub enum RouteReelError {
    /// Invalid options, pace samples or request fields.
    #[error("validation error: {0}")]
    Validation(String),

    /// GeoJSON whose geometry is not a line.
    #[error("unsupported geometry: {0}")]
    UnsupportedGeometry(String),

    /// Coordinates that are missing, non-numeric or outside the projectable range.
    #[error("malformed coordinates: {0}")]
    MalformedCoordinates(String),

    /// Errors while computing or rasterizing a frame.
    #[error("evaluation error: {0}")]
    Evaluation(String),

    /// Errors from the video encoder or its sink.
    #[error("encode error: {0}")]
    Encode(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl RouteReelError {
    /// Build a [`RouteReelError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`RouteReelError::UnsupportedGeometry`] value.
    pub fn unsupported_geometry(msg: impl Into<String>) -> Self {
        Self::UnsupportedGeometry(msg.into())
    }

    /// Build a [`RouteReelError::MalformedCoordinates`] value.
    pub fn malformed_coordinates(msg: impl Into<String>) -> Self {
        Self::MalformedCoordinates(msg.into())
    }

    /// Build a [`RouteReelError::Evaluation`] value.
    pub fn evaluation(msg: impl Into<String>) -> Self {
        Self::Evaluation(msg.into())
    }

    /// Build a [`RouteReelError::Encode`] value.
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// Build a [`RouteReelError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

impl From<serde_json::Error> for RouteReelError {
    fn from(e: serde_json::Error) -> Self {
        Self::serde(e.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
