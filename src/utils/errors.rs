use std::fmt;
use std::error::Error;

/// Represents errors that can occur while configuring or stepping a simulation.
#[derive(Debug, Clone)]
pub enum SimulationError {
    /// Indicates an invalid time step (e.g., zero, negative, or non-finite dt).
    InvalidTimeStep,
    /// Indicates an invalid substep count (must be at least 1).
    InvalidSubstepCount,
    /// Indicates invalid arena dimensions (e.g., zero or negative width/height).
    InvalidArenaDimensions,
    /// Indicates an invalid quadtree leaf capacity (must be at least 1).
    InvalidCapacity,
    /// A general error for calculations that produce invalid results.
    CalculationError(String),
}

impl fmt::Display for SimulationError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SimulationError::InvalidTimeStep => write!(f, "Invalid time step"),
            SimulationError::InvalidSubstepCount => write!(f, "Invalid substep count"),
            SimulationError::InvalidArenaDimensions => write!(f, "Invalid arena dimensions"),
            SimulationError::InvalidCapacity => write!(f, "Invalid leaf capacity"),
            SimulationError::CalculationError(msg) => write!(f, "Calculation error: {}", msg),
        }
    }
}

impl Error for SimulationError {}
