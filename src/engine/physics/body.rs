use glam::Vec2;

/// Point-mass rigid body integrated by the `RigidBodySystem`
///
/// `mass`, `inv_mass` and `is_static` are kept private so the inverse-mass
/// invariant holds: `inv_mass == 0` exactly when the body is static or
/// massless, otherwise `inv_mass == 1 / mass`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RigidBody {
    mass: f32,
    inv_mass: f32,
    is_static: bool,

    /// Linear velocity (units per second)
    pub velocity: Vec2,

    /// Acceleration derived from the accumulated force on the last step
    pub acceleration: Vec2,

    /// Force accumulated since the last step, cleared after integration
    pub force: Vec2,

    /// Linear drag coefficient, applied as `-drag * velocity`
    pub drag: f32,

    /// Bounciness in [0, 1]
    pub restitution: f32,

    /// Kinematic bodies ignore gravity but still feel drag and forces
    pub is_kinematic: bool,
}

impl RigidBody {
    pub fn new(mass: f32, drag: f32, restitution: f32, is_kinematic: bool, is_static: bool) -> Self {
        Self {
            mass,
            inv_mass: inverse_mass(mass, is_static),
            is_static,
            velocity: Vec2::ZERO,
            acceleration: Vec2::ZERO,
            force: Vec2::ZERO,
            drag,
            restitution,
            is_kinematic,
        }
    }

    pub fn mass(&self) -> f32 {
        self.mass
    }

    pub fn inv_mass(&self) -> f32 {
        self.inv_mass
    }

    pub fn is_static(&self) -> bool {
        self.is_static
    }

    pub fn set_mass(&mut self, mass: f32) {
        self.mass = mass;
        self.inv_mass = inverse_mass(mass, self.is_static);
    }

    /// Make the body immovable (or movable again)
    pub fn set_static(&mut self, is_static: bool) {
        self.is_static = is_static;
        self.inv_mass = inverse_mass(self.mass, is_static);
        if is_static {
            self.velocity = Vec2::ZERO;
            self.force = Vec2::ZERO;
        }
    }

    /// Accumulate a force for the next integration step
    pub fn add_force(&mut self, force: Vec2) {
        self.force += force;
    }

    /// Instantaneous velocity change `impulse * inv_mass`
    pub fn apply_impulse(&mut self, impulse: Vec2) {
        self.velocity += impulse * self.inv_mass;
    }

    pub fn speed(&self) -> f32 {
        self.velocity.length()
    }

    /// Refresh `inv_mass` from the current mass
    ///
    /// Called by the integrator for non-static bodies each step.
    pub(crate) fn refresh_inv_mass(&mut self) {
        self.inv_mass = inverse_mass(self.mass, self.is_static);
    }
}

fn inverse_mass(mass: f32, is_static: bool) -> f32 {
    if is_static || mass == 0.0 {
        0.0
    } else {
        1.0 / mass
    }
}

/// Builder for creating rigid bodies with common configurations
pub struct BodyBuilder {
    mass: f32,
    drag: f32,
    restitution: f32,
    velocity: Vec2,
    is_kinematic: bool,
    is_static: bool,
}

impl BodyBuilder {
    /// Create a new dynamic body (affected by gravity, forces and collisions)
    pub fn new_dynamic() -> Self {
        Self {
            mass: 1.0,
            drag: 0.1,
            restitution: 0.5,
            velocity: Vec2::ZERO,
            is_kinematic: false,
            is_static: false,
        }
    }

    /// Create a new kinematic body (no gravity, still collides)
    pub fn new_kinematic() -> Self {
        Self {
            is_kinematic: true,
            ..Self::new_dynamic()
        }
    }

    /// Create a new static body (completely immovable)
    pub fn new_static() -> Self {
        Self {
            drag: 0.0,
            is_static: true,
            ..Self::new_dynamic()
        }
    }

    pub fn mass(mut self, mass: f32) -> Self {
        self.mass = mass;
        self
    }

    pub fn drag(mut self, drag: f32) -> Self {
        self.drag = drag;
        self
    }

    /// Set restitution/bounciness (0.0 = no bounce, 1.0 = perfect bounce)
    pub fn restitution(mut self, restitution: f32) -> Self {
        self.restitution = restitution.clamp(0.0, 1.0);
        self
    }

    /// Set the initial linear velocity
    pub fn velocity(mut self, x: f32, y: f32) -> Self {
        self.velocity = Vec2::new(x, y);
        self
    }

    pub fn build(self) -> RigidBody {
        let mut body = RigidBody::new(
            self.mass,
            self.drag,
            self.restitution,
            self.is_kinematic,
            self.is_static,
        );
        if !self.is_static {
            body.velocity = self.velocity;
        }
        body
    }
}
