use crate::utils;

pub const DEFAULT_SIMULATION_CONSTANTS: utils::SimulationConstants = utils::SimulationConstants {
    gravity: 2000.0,
    substeps: 5,
    wall_restitution: 0.8,
    leaf_capacity: 5,
    arena_width: 800.0,
    arena_height: 600.0,
};
