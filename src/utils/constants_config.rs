// src/utils/constants_config.rs
use crate::utils::{
    DEFAULT_SIMULATION_CONSTANTS,
    SimulationError,
};

/// Tuning constants for a collision simulation.
///
/// The coordinate system follows screen conventions: y grows downward and
/// gravity is applied along +y. The arena spans `[0, arena_width]` by
/// `[0, arena_height]`.
#[derive(Debug, Clone, Copy)]
pub struct SimulationConstants {
    /// Gravitational acceleration, applied along +y (downward).
    pub gravity: f64,
    /// Number of solver substeps per tick.
    pub substeps: u32,
    /// Fraction of velocity magnitude retained (with sign flip) after a wall bounce.
    pub wall_restitution: f64,
    /// Maximum number of particles a quadtree leaf holds before subdividing.
    pub leaf_capacity: usize,
    /// Arena width in world units.
    pub arena_width: f64,
    /// Arena height in world units.
    pub arena_height: f64,
}

impl Default for SimulationConstants {
    fn default() -> Self {
        DEFAULT_SIMULATION_CONSTANTS
    }
}

impl SimulationConstants {
    /// Creates a new set of simulation constants.
    /// Any parameter passed as `None` falls back to its default value.
    ///
    /// # Example
    /// ```
    /// use rs_collisions::utils::SimulationConstants;
    ///
    /// let constants = SimulationConstants::new(Some(981.0), None, Some(0.5), None, None, None);
    /// assert_eq!(constants.gravity, 981.0);
    /// assert_eq!(constants.substeps, 5);
    /// ```
    pub fn new(
        gravity: Option<f64>,
        substeps: Option<u32>,
        wall_restitution: Option<f64>,
        leaf_capacity: Option<usize>,
        arena_width: Option<f64>,
        arena_height: Option<f64>,
    ) -> Self {
        let default = DEFAULT_SIMULATION_CONSTANTS;
        Self {
            gravity: gravity.unwrap_or(default.gravity),
            substeps: substeps.unwrap_or(default.substeps),
            wall_restitution: wall_restitution.unwrap_or(default.wall_restitution),
            leaf_capacity: leaf_capacity.unwrap_or(default.leaf_capacity),
            arena_width: arena_width.unwrap_or(default.arena_width),
            arena_height: arena_height.unwrap_or(default.arena_height),
        }
    }

    /// Checks that the constants describe a runnable simulation.
    ///
    /// # Errors
    ///
    /// Returns an error if the substep count is zero, the arena dimensions are
    /// not finite and positive, or the leaf capacity is zero.
    pub fn validate(&self) -> Result<(), SimulationError> {
        if self.substeps == 0 {
            return Err(SimulationError::InvalidSubstepCount);
        }
        if !self.arena_width.is_finite() || self.arena_width <= 0.0
            || !self.arena_height.is_finite() || self.arena_height <= 0.0 {
            return Err(SimulationError::InvalidArenaDimensions);
        }
        if self.leaf_capacity == 0 {
            return Err(SimulationError::InvalidCapacity);
        }
        Ok(())
    }
}
