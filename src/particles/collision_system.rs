//! Substepped collision solver.
//!
//! The solver owns the particle arena and the broad-phase quadtree. Each tick
//! rebuilds the tree from the live particle positions and then runs a fixed
//! number of substeps, each performing gravity accumulation, quadtree-driven
//! pairwise resolution, Verlet integration, and wall resolution.
//!
//! Pairwise resolution is sequential and mutates both members of a pair in
//! place, so the outcome depends on particle iteration order and on the
//! tree's candidate order. Both are deterministic for a fixed insertion
//! order, but resolution is not symmetric: resolving (a, b) and later (b, a)
//! within one substep can apply separation twice. That ordering is part of
//! this solver's contract, not an accident to be corrected.

use rand::{Rng, rng};
use rayon::prelude::*;
use crate::particles::{Particle, QuadTree, Rect};
use crate::utils::{SimulationConstants, SimulationError};

/// Radius given to particles created through `spawn_particle`.
pub const DEFAULT_PARTICLE_RADIUS: f64 = 6.0;

/// Owns the live particles and the transient spatial index.
///
/// Particles are addressed by stable `usize` identifiers — their indices in
/// the arena. The quadtree stores those identifiers, never references, so the
/// index can be discarded and rebuilt freely.
pub struct CollisionSystem {
    particles: Vec<Particle>,
    tree: Option<QuadTree>,
    constants: SimulationConstants,
}

impl CollisionSystem {
    /// Creates a solver for the arena described by `constants`.
    ///
    /// # Errors
    ///
    /// Returns an error if the constants fail validation (zero substeps,
    /// non-positive arena dimensions, or zero leaf capacity).
    ///
    /// # Example
    /// ```
    /// use rs_collisions::particles::CollisionSystem;
    /// use rs_collisions::utils::SimulationConstants;
    ///
    /// let mut system = CollisionSystem::new(SimulationConstants::default())
    ///     .expect("Failed to create collision system");
    /// let id = system.spawn_particle((400.0, 100.0), 0.5);
    /// system.step(1.0 / 60.0).expect("Step failed");
    /// assert!(system.particle(id).is_some());
    /// ```
    pub fn new(constants: SimulationConstants) -> Result<Self, SimulationError> {
        constants.validate()?;
        Ok(CollisionSystem {
            particles: Vec::new(),
            tree: None,
            constants,
        })
    }

    /// Adds a particle to the arena and returns its identifier.
    ///
    /// If a tree from a previous rebuild exists, the particle is inserted into
    /// it as well so it participates in queries before the next tick.
    pub fn add_particle(&mut self, particle: Particle) -> usize {
        let id = self.particles.len();
        if let Some(tree) = self.tree.as_mut() {
            tree.insert(id, particle.position.0, particle.position.1);
        }
        self.particles.push(particle);
        id
    }

    /// Creates a particle at `position` with a random color and a small random
    /// initial velocity, and adds it to the arena.
    ///
    /// Each velocity component is drawn uniformly from
    /// `-velocity_jitter..=velocity_jitter` and applied in per-substep units
    /// (`set_velocity` with `dt = 1`). Color channels are drawn from
    /// `100..=255`; the color is cosmetic and never read by the physics.
    pub fn spawn_particle(&mut self, position: (f64, f64), velocity_jitter: f64) -> usize {
        let mut generator = rng();
        let mut particle = Particle::new(position, DEFAULT_PARTICLE_RADIUS);
        particle.color = (
            generator.random_range(100..=255),
            generator.random_range(100..=255),
            generator.random_range(100..=255),
        );
        if velocity_jitter > 0.0 {
            let vx = generator.random_range(-velocity_jitter..=velocity_jitter);
            let vy = generator.random_range(-velocity_jitter..=velocity_jitter);
            particle.set_velocity(vx, vy, 1.0);
        }
        self.add_particle(particle)
    }

    /// Discards the current tree and rebuilds it over the arena's full extent
    /// from the live particle positions.
    ///
    /// Called at the start of every tick; also usable standalone to make
    /// `quadtree` yield boundaries before the first tick.
    pub fn rebuild_tree(&mut self) {
        let boundary = Rect::new(0.0, 0.0, self.constants.arena_width, self.constants.arena_height);
        let mut tree = QuadTree::new(boundary, self.constants.leaf_capacity);
        for (id, particle) in self.particles.iter().enumerate() {
            tree.insert(id, particle.position.0, particle.position.1);
        }
        self.tree = Some(tree);
    }

    /// Advances the simulation by one frame of `dt` seconds.
    ///
    /// The tree is rebuilt once, then `substeps` substeps run with
    /// `sub_dt = dt / substeps`, each applying gravity, resolving collisions
    /// against the tree, integrating, and resolving walls. The tree is not
    /// rebuilt between substeps: positions drift within a tick while queries
    /// use the partitioning from its start, trading broad-phase accuracy for
    /// not paying the rebuild cost `substeps` times.
    ///
    /// # Errors
    ///
    /// Returns an error if `dt` is not finite and positive. The tick itself
    /// never fails: degenerate geometry is skipped, not reported.
    pub fn step(&mut self, dt: f64) -> Result<(), SimulationError> {
        if !dt.is_finite() || dt <= 0.0 {
            return Err(SimulationError::InvalidTimeStep);
        }

        self.rebuild_tree();

        let sub_dt = dt / f64::from(self.constants.substeps);
        for _ in 0..self.constants.substeps {
            self.apply_gravity(sub_dt);
            self.solve_collisions();
            self.update_particles(sub_dt);
            self.wall_collisions();
        }
        Ok(())
    }

    /// Accumulates gravity scaled by the substep timestep onto every particle.
    pub(crate) fn apply_gravity(&mut self, sub_dt: f64) {
        let gravity = self.constants.gravity;
        self.particles
            .par_iter_mut()
            .for_each(|p| p.accelerate(0.0, gravity * sub_dt));
    }

    /// Runs the broad phase and narrow phase over every particle.
    ///
    /// For each particle in arena order, the tree is queried with the
    /// axis-aligned box of side `2 * radius` centered on it, and every
    /// distinct candidate is resolved against it in the order returned.
    pub(crate) fn solve_collisions(&mut self) {
        let tree = match self.tree.as_ref() {
            Some(tree) => tree,
            None => return,
        };

        let mut candidates: Vec<usize> = Vec::new();
        for i in 0..self.particles.len() {
            let (px, py) = self.particles[i].position;
            let radius = self.particles[i].radius;
            let range = Rect::new(px - radius, py - radius, radius * 2.0, radius * 2.0);

            candidates.clear();
            tree.query(&range, &mut candidates);
            for &j in &candidates {
                if j != i {
                    Self::resolve_pair(&mut self.particles, i, j);
                }
            }
        }
    }

    /// Resolves the overlap between two particles by position correction.
    ///
    /// Each particle is displaced half the overlap along the center-to-center
    /// normal. `previous_position` is untouched, so the correction carries an
    /// implicit impulse into the next integration step. Coincident centers
    /// are skipped this substep; motion normally separates them by the next.
    pub(crate) fn resolve_collision(&mut self, i: usize, j: usize) {
        Self::resolve_pair(&mut self.particles, i, j);
    }

    fn resolve_pair(particles: &mut [Particle], i: usize, j: usize) {
        if i == j {
            return;
        }
        let (a, b) = if i < j {
            let (left, right) = particles.split_at_mut(j);
            (&mut left[i], &mut right[0])
        } else {
            let (left, right) = particles.split_at_mut(i);
            (&mut right[0], &mut left[j])
        };

        let dx = b.position.0 - a.position.0;
        let dy = b.position.1 - a.position.1;
        let dist_sq = dx * dx + dy * dy;
        let min_dist = a.radius + b.radius;

        if dist_sq <= 0.0 || dist_sq >= min_dist * min_dist {
            return;
        }

        let dist = dist_sq.sqrt();
        let nx = dx / dist;
        let ny = dy / dist;
        let delta = 0.5 * (min_dist - dist);

        a.position.0 -= nx * delta;
        a.position.1 -= ny * delta;
        b.position.0 += nx * delta;
        b.position.1 += ny * delta;
    }

    /// Integrates every particle by one substep.
    pub(crate) fn update_particles(&mut self, sub_dt: f64) {
        self.particles.par_iter_mut().for_each(|p| p.update(sub_dt));
    }

    /// Clamps particles to the arena and reflects their velocity off walls.
    ///
    /// Per axis: the implicit velocity is read before the clamp, then the
    /// crossing component is reflected and scaled by the restitution while
    /// the other component is kept, applied with `dt = 1` (per-substep
    /// units). The second axis re-reads the velocity so a corner hit
    /// reflects both components.
    pub(crate) fn wall_collisions(&mut self) {
        let width = self.constants.arena_width;
        let height = self.constants.arena_height;
        let restitution = self.constants.wall_restitution;

        self.particles.par_iter_mut().for_each(|p| {
            let (vx, vy) = p.get_velocity();
            if p.position.0 - p.radius < 0.0 {
                p.position.0 = p.radius;
                p.set_velocity(-vx * restitution, vy, 1.0);
            } else if p.position.0 + p.radius > width {
                p.position.0 = width - p.radius;
                p.set_velocity(-vx * restitution, vy, 1.0);
            }

            let (vx, vy) = p.get_velocity();
            if p.position.1 - p.radius < 0.0 {
                p.position.1 = p.radius;
                p.set_velocity(vx, -vy * restitution, 1.0);
            } else if p.position.1 + p.radius > height {
                p.position.1 = height - p.radius;
                p.set_velocity(vx, -vy * restitution, 1.0);
            }
        });
    }

    /// Returns the live particles, indexed by identifier.
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Returns the particle with the given identifier, if it exists.
    pub fn particle(&self, id: usize) -> Option<&Particle> {
        self.particles.get(id)
    }

    /// Returns a mutable reference to the particle with the given identifier.
    pub fn particle_mut(&mut self, id: usize) -> Option<&mut Particle> {
        self.particles.get_mut(id)
    }

    /// Returns the number of live particles.
    pub fn particle_count(&self) -> usize {
        self.particles.len()
    }

    /// Returns the current quadtree, if one has been built.
    ///
    /// Read-only; visualizers traverse it via [`QuadTree::boundaries`].
    pub fn quadtree(&self) -> Option<&QuadTree> {
        self.tree.as_ref()
    }

    /// Returns the simulation constants this solver was built with.
    pub fn constants(&self) -> &SimulationConstants {
        &self.constants
    }

    /// Removes all particles and drops the current tree.
    pub fn clear_particles(&mut self) {
        self.particles.clear();
        self.tree = None;
    }
}
