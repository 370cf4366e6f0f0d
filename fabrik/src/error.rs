use std::error::Error;
use std::fmt;

/// Errors raised while assembling a bone chain.
///
/// Solving itself never fails: a target that cannot be reached is reported
/// through the residual distance returned by the solve.
#[derive(Debug, Clone, PartialEq)]
pub enum FabrikError {
    /// A consecutive bone was added before any base bone.
    EmptyChain,
    /// Bone lengths must be finite and strictly positive.
    InvalidLength(f64),
    /// A direction or hinge axis had (numerically) zero length.
    ZeroVector(&'static str),
}

impl Error for FabrikError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        None
    }
}

impl fmt::Display for FabrikError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            FabrikError::EmptyChain => write!(f, "Cannot add a consecutive bone to an empty chain"),
            FabrikError::InvalidLength(length) => write!(f, "Invalid bone length: {}", length),
            FabrikError::ZeroVector(what) => write!(f, "The {} must not be a zero vector", what),
        }
    }
}
