//! Error types for zone geometry configuration

use thiserror::Error;

/// Result type alias for zone operations
pub type Result<T> = std::result::Result<T, GeometryError>;

/// Errors raised when validating zone geometry parameters.
///
/// These are configuration errors, caught once when a zone spec is
/// validated. Containment and visibility tests never allocate or fail;
/// they assume a validated spec.
#[derive(Debug, Error, PartialEq)]
pub enum GeometryError {
    /// A parameter is NaN or infinite
    #[error("parameter `{0}` is not finite")]
    NonFinite(&'static str),

    /// A length or radius that must be strictly positive is not
    #[error("parameter `{0}` must be positive, got {1}")]
    NonPositive(&'static str, f32),

    /// The near plane distance does not precede the far plane distance
    #[error("degenerate depth range: near {near} must be less than far {far}")]
    DegenerateDepthRange { near: f32, far: f32 },

    /// An angle falls outside its usable range
    #[error("angle `{name}` out of range: {value} not in ({min}, {max})")]
    AngleOutOfRange {
        name: &'static str,
        value: f32,
        min: f32,
        max: f32,
    },
}
