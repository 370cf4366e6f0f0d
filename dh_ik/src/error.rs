use std::error::Error;
use std::fmt;

use fabrik::FabrikError;
use serde::{Deserialize, Serialize};

/// Why a spherical wrist could not yield Euler angles.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum ClassifierError {
    /// The wrist's consecutive axes are not at right angles.
    AxesNotOrthogonal(String),
    /// The requested orientation puts the wrist in gimbal lock.
    Singular(String),
    /// The wrist parameters themselves are unusable.
    InvalidWrist(String),
}

impl ClassifierError {
    pub fn message(&self) -> &str {
        match self {
            ClassifierError::AxesNotOrthogonal(msg)
            | ClassifierError::Singular(msg)
            | ClassifierError::InvalidWrist(msg) => msg.as_str(),
        }
    }
}

impl Error for ClassifierError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        None
    }
}

impl fmt::Display for ClassifierError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            ClassifierError::AxesNotOrthogonal(ref msg) => write!(f, "Wrist axes not orthogonal: {}", msg),
            ClassifierError::Singular(ref msg) => write!(f, "Wrist is singular: {}", msg),
            ClassifierError::InvalidWrist(ref msg) => write!(f, "Invalid wrist: {}", msg),
        }
    }
}

/// Everything that can stop an inverse kinematics call.
#[derive(Debug, Clone, PartialEq)]
pub enum IkError {
    /// The inputs do not fit together, e.g. a joint vector of the wrong length.
    InvalidArgument(String),
    /// A spherical wrist could not be solved analytically.
    Classifier(ClassifierError),
    /// The iterative solver rejected the chain it was given.
    Solver(String),
    /// A configuration or chain description could not be loaded.
    Config(String),
}

impl Error for IkError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            IkError::Classifier(err) => Some(err),
            _ => None,
        }
    }
}

impl fmt::Display for IkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            IkError::InvalidArgument(ref msg) => write!(f, "Invalid argument: {}", msg),
            IkError::Classifier(ref err) => write!(f, "Classifier error: {}", err),
            IkError::Solver(ref msg) => write!(f, "Solver error: {}", msg),
            IkError::Config(ref msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl From<ClassifierError> for IkError {
    fn from(err: ClassifierError) -> Self {
        IkError::Classifier(err)
    }
}

impl From<FabrikError> for IkError {
    fn from(err: FabrikError) -> Self {
        IkError::Solver(err.to_string())
    }
}

impl From<serde_json::Error> for IkError {
    fn from(err: serde_json::Error) -> Self {
        IkError::Config(err.to_string())
    }
}
