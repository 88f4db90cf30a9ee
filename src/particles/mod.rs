#[cfg(feature = "particles")]
mod particle;
#[cfg(feature = "particles")]
mod quadtree;
#[cfg(feature = "particles")]
mod collision_system;

#[cfg(feature = "particles")]
pub use particle::*;

#[cfg(feature = "particles")]
pub use quadtree::*;

#[cfg(feature = "particles")]
pub use collision_system::*;

#[cfg(test)]
#[cfg(feature = "particles")]
mod quadtree_tests;
