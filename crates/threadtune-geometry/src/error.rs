//! Error types for the geometry crate.
//!
//! Geometry failures carry the indices of the offending segments so a caller
//! can point at the part of the profile that went wrong. Kernel failures are
//! wrapped verbatim.

use thiserror::Error;
use threadtune_core::SpecError;

/// Errors produced while computing thread geometry.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    /// The thread parameters failed validation.
    #[error("Invalid thread parameters: {0}")]
    InvalidSpec(#[from] SpecError),

    /// Fewer spline points than a helix can be built from.
    #[error("Too few spline points: {count} (minimum {min})")]
    TooFewSplinePoints { count: u32, min: u32 },

    /// A stage received an unusable numeric parameter.
    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParameter { name: String, reason: String },

    /// A profile segment has zero length.
    #[error("Degenerate profile segment {index}")]
    DegenerateSegment { index: usize },

    /// Two consecutive offset segments never intersect.
    #[error("Offset segments {first} and {second} are parallel")]
    ParallelSegments { first: usize, second: usize },

    /// The clearance offset overlaps the next revolution in a way that has no valid shared vertex.
    #[error("Unresolvable revolution overlap (offset land length {land_length:.6})")]
    UnresolvedOverlap { land_length: f64 },

    /// The closed profile encloses no area.
    #[error("Profile has zero area")]
    ZeroArea,

    /// Two non-adjacent profile edges cross.
    #[error("Profile edges {first} and {second} intersect")]
    SelfIntersecting { first: usize, second: usize },
}

impl GeometryError {
    pub(crate) fn invalid(name: &str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name: name.to_string(),
            reason: reason.into(),
        }
    }
}

/// Errors reported by a [`GeometryKernel`](crate::GeometryKernel) implementation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum KernelError {
    /// The kernel rejected an operation.
    #[error("Kernel operation '{operation}' failed: {message}")]
    OperationFailed { operation: String, message: String },

    /// An entity handle does not refer to anything the kernel knows.
    #[error("Unknown kernel entity: {0}")]
    UnknownEntity(String),
}

impl KernelError {
    pub fn failed(operation: &str, message: impl Into<String>) -> Self {
        Self::OperationFailed {
            operation: operation.to_string(),
            message: message.into(),
        }
    }
}

/// Errors from building solids through a kernel.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BuildError {
    #[error("Geometry error: {0}")]
    Geometry(#[from] GeometryError),

    #[error("Kernel error: {0}")]
    Kernel(#[from] KernelError),
}

/// Result type for geometry computations.
pub type GeometryResult<T> = Result<T, GeometryError>;

/// Result type for kernel calls.
pub type KernelResult<T> = Result<T, KernelError>;

/// Result type for builder operations.
pub type BuildResult<T> = Result<T, BuildError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_geometry_error_display() {
        let err = GeometryError::ParallelSegments { first: 1, second: 2 };
        assert_eq!(err.to_string(), "Offset segments 1 and 2 are parallel");

        let err = GeometryError::SelfIntersecting { first: 0, second: 3 };
        assert_eq!(err.to_string(), "Profile edges 0 and 3 intersect");

        let err = GeometryError::TooFewSplinePoints { count: 2, min: 3 };
        assert_eq!(err.to_string(), "Too few spline points: 2 (minimum 3)");
    }

    #[test]
    fn test_spec_error_conversion() {
        let spec_err = SpecError::InvalidValue {
            name: "gap".to_string(),
            reason: "must be finite".to_string(),
        };
        let err: GeometryError = spec_err.into();
        assert!(matches!(err, GeometryError::InvalidSpec(_)));
        assert!(err.to_string().starts_with("Invalid thread parameters"));
    }

    #[test]
    fn test_build_error_wraps_kernel_error() {
        let err: BuildError = KernelError::failed("extrude", "join failed").into();
        assert_eq!(
            err.to_string(),
            "Kernel error: Kernel operation 'extrude' failed: join failed"
        );
    }
}
