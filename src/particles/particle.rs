/// Drag coefficient applied to the previous displacement during integration.
///
/// The integrator bleeds a fraction of the last step's displacement out of the
/// next one, so unforced particles gradually come to rest.
const VELOCITY_DAMPENING: f64 = 0.5;

/// A circular particle integrated with a Verlet-style scheme.
///
/// There is no explicit velocity field: velocity is always derived as
/// `position - previous_position`, the displacement over the last integration
/// step. Forces are accumulated into `acceleration` and consumed by
/// [`update`](Particle::update).
///
/// # Examples
///
/// ```
/// use rs_collisions::particles::Particle;
///
/// let mut particle = Particle::new((100.0, 100.0), 6.0);
/// particle.set_velocity(3.0, -4.0, 1.0);
/// assert_eq!(particle.get_velocity(), (3.0, -4.0));
/// assert_eq!(particle.speed(), 5.0);
/// ```
#[derive(Debug, Clone)]
pub struct Particle {
    /// Position represented as (x, y).
    pub position: (f64, f64),
    /// Position exactly one integration step in the past.
    /// The implicit velocity is `position - previous_position`.
    pub previous_position: (f64, f64),
    /// Accumulated acceleration for the current step, reset to zero by `update`.
    pub acceleration: (f64, f64),
    /// Collision radius.
    pub radius: f64,
    /// Particle's mass. Reserved; collisions currently resolve as equal-mass pairs.
    pub mass: f64,
    /// Display color as RGB channels. Never read by the physics.
    pub color: (u8, u8, u8),
}

impl Particle {
    /// Creates a new particle at rest at `position`.
    ///
    /// The radius is taken as given; callers are responsible for passing a
    /// positive value.
    pub fn new(position: (f64, f64), radius: f64) -> Self {
        Particle {
            position,
            previous_position: position,
            acceleration: (0.0, 0.0),
            radius,
            mass: 1.0,
            color: (255, 255, 255),
        }
    }

    /// Replaces the implicit velocity by backdating `previous_position`.
    ///
    /// After this call the particle will move by `(vx, vy) * dt` on its next
    /// unforced update. Wall bounces call this with `dt = 1.0`, expressing the
    /// reflected velocity in per-substep units.
    pub fn set_velocity(&mut self, vx: f64, vy: f64, dt: f64) {
        self.previous_position = (
            self.position.0 - vx * dt,
            self.position.1 - vy * dt,
        );
    }

    /// Adds a velocity delta on top of the current implicit velocity.
    ///
    /// # Examples
    ///
    /// ```
    /// use rs_collisions::particles::Particle;
    ///
    /// let mut particle = Particle::new((0.0, 0.0), 1.0);
    /// particle.set_velocity(1.0, 0.0, 1.0);
    /// particle.add_velocity(0.5, 2.0, 1.0);
    /// assert_eq!(particle.get_velocity(), (1.5, 2.0));
    /// ```
    pub fn add_velocity(&mut self, vx: f64, vy: f64, dt: f64) {
        self.previous_position.0 -= vx * dt;
        self.previous_position.1 -= vy * dt;
    }

    /// Returns the implicit velocity: the displacement over the last step,
    /// in distance-per-substep units.
    pub fn get_velocity(&self) -> (f64, f64) {
        (
            self.position.0 - self.previous_position.0,
            self.position.1 - self.previous_position.1,
        )
    }

    /// Returns the magnitude of the implicit velocity.
    pub fn speed(&self) -> f64 {
        let (vx, vy) = self.get_velocity();
        (vx * vx + vy * vy).sqrt()
    }

    /// Accumulates an acceleration for the current step.
    ///
    /// May be called several times before `update`; contributions are summed.
    pub fn accelerate(&mut self, ax: f64, ay: f64) {
        self.acceleration.0 += ax;
        self.acceleration.1 += ay;
    }

    /// Advances the particle by one Verlet step with displacement damping.
    ///
    /// With `last_move = position - previous_position`, the new position is
    /// `position + last_move + (acceleration - last_move * 0.5) * dt²`. The
    /// damping acts on the previous displacement only, so unforced motion
    /// decays gradually. Afterwards `previous_position` holds the old
    /// position and the acceleration buffer is cleared.
    ///
    /// In the solver, `dt` is always the per-substep timestep
    /// (`frame_dt / substeps`), never the frame timestep.
    ///
    /// # Examples
    ///
    /// ```
    /// use rs_collisions::particles::Particle;
    ///
    /// let mut particle = Particle::new((100.0, 100.0), 6.0);
    /// particle.accelerate(0.0, 100.0);
    /// particle.update(0.5);
    /// // Starting at rest, the step displaces by exactly a * dt².
    /// assert_eq!(particle.position, (100.0, 125.0));
    /// assert_eq!(particle.previous_position, (100.0, 100.0));
    /// assert_eq!(particle.acceleration, (0.0, 0.0));
    /// ```
    pub fn update(&mut self, dt: f64) {
        let last_move = (
            self.position.0 - self.previous_position.0,
            self.position.1 - self.previous_position.1,
        );

        let dt_sq = dt * dt;
        let new_position = (
            self.position.0 + last_move.0 + (self.acceleration.0 - last_move.0 * VELOCITY_DAMPENING) * dt_sq,
            self.position.1 + last_move.1 + (self.acceleration.1 - last_move.1 * VELOCITY_DAMPENING) * dt_sq,
        );

        self.previous_position = self.position;
        self.position = new_position;
        self.acceleration = (0.0, 0.0);
    }

    /// Zeroes the implicit velocity in place.
    pub fn stop(&mut self) {
        self.previous_position = self.position;
    }

    /// Scales the implicit velocity by `factor`.
    pub fn slow_down(&mut self, factor: f64) {
        let (vx, vy) = self.get_velocity();
        self.previous_position = (
            self.position.0 - vx * factor,
            self.position.1 - vy * factor,
        );
    }

    /// Teleports the particle, leaving it at rest at the new position.
    pub fn set_position(&mut self, x: f64, y: f64) {
        self.position = (x, y);
        self.previous_position = (x, y);
    }
}
