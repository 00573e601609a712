//! Entity state and physics integration
//!
//! An entity owns its kinematic and dynamic state plus a priority-ordered
//! collection of behavior modules. Behaviors steer it through accumulated
//! forces, impulses, or direct velocity commands; the integration step then
//! advances the state with semi-implicit Euler and enforces the world
//! boundary by axis-aligned reflection.

use crate::assets::Visual;
use crate::config::EntityConfig;
use crate::foundation::math::{self, Vec2};
use crate::render::{Color, DebugPrimitive, RenderSink, SpriteParams};
use crate::world::behavior::{BehaviorModule, BehaviorSlot, CommandBuffer};

slotmap::new_key_type! {
    /// Stable handle into the world's entity table
    ///
    /// Cross-entity references (e.g. a follow target) are held as ids and
    /// revalidated on every use; a removed entity is a lookup miss, never a
    /// dangling pointer.
    pub struct EntityId;
}

/// Below this speed the entity snaps to rest, avoiding perpetual creep
const SPEED_EPSILON: f32 = 0.1;

/// Rest threshold for angular velocity
const ANGULAR_SPEED_EPSILON: f32 = 0.1;

/// Entity construction errors
#[derive(thiserror::Error, Debug)]
pub enum SpawnError {
    /// Mass must be positive or force integration would divide by zero
    #[error("entity mass must be positive, got {0}")]
    NonPositiveMass(f32),

    /// Radius must be positive or the derived inertia would be degenerate
    #[error("entity radius must be positive, got {0}")]
    NonPositiveRadius(f32),

    /// Visual resource creation failed
    #[error(transparent)]
    Asset(#[from] crate::assets::AssetError),
}

/// A simulated mobile object with physical and behavioral state
pub struct Entity {
    // Kinematic state
    position: Vec2,
    rotation: f32,
    velocity: Vec2,
    angular_velocity: f32,
    speed: f32,

    // Dynamic state, accumulated per frame
    force: Vec2,
    torque: f32,
    acceleration: Vec2,

    mass: f32,
    inertia: f32,
    radius: f32,

    // Material
    friction: f32,
    restitution: f32,

    // Limits, enforced after integration
    max_acceleration: f32,
    max_speed: f32,
    max_angular_velocity: f32,

    behaviors: Vec<BehaviorSlot>,

    team: usize,
    valid_target: bool,

    visual: Option<Visual>,
    visual_name: String,
    tint: Color,
}

impl Entity {
    /// Create an entity at the given position from configuration defaults
    ///
    /// Fails fast on a non-positive mass or radius; those would otherwise
    /// turn into silent divide-by-zero during integration.
    pub fn new(config: &EntityConfig, position: Vec2) -> Result<Self, SpawnError> {
        if config.mass <= 0.0 {
            return Err(SpawnError::NonPositiveMass(config.mass));
        }
        if config.radius <= 0.0 {
            return Err(SpawnError::NonPositiveRadius(config.radius));
        }

        Ok(Self {
            position,
            rotation: 0.0,
            velocity: Vec2::zeros(),
            angular_velocity: 0.0,
            speed: 0.0,
            force: Vec2::zeros(),
            torque: 0.0,
            acceleration: Vec2::zeros(),
            mass: config.mass,
            inertia: disc_inertia(config.mass, config.radius),
            radius: config.radius,
            friction: config.friction,
            restitution: config.restitution,
            max_acceleration: config.max_acceleration,
            max_speed: config.max_speed,
            max_angular_velocity: config.max_angular_velocity,
            behaviors: Vec::new(),
            team: 0,
            valid_target: true,
            visual: None,
            visual_name: config.visual_name.clone(),
            tint: Color::WHITE,
        })
    }

    // --- Behavior control ---

    /// Attach a behavior module at its default priority
    pub fn attach_behavior(&mut self, module: Box<dyn BehaviorModule>) {
        let priority = module.default_priority();
        self.attach_behavior_with_priority(module, priority);
    }

    /// Attach a behavior module at an explicit priority
    ///
    /// Slots are kept stable-sorted by priority; modules sharing a priority
    /// keep their attachment order. Sorting happens only here, never during
    /// dispatch.
    pub fn attach_behavior_with_priority(&mut self, module: Box<dyn BehaviorModule>, priority: i8) {
        self.behaviors.push(BehaviorSlot::new(priority, module));
        self.behaviors.sort_by_key(BehaviorSlot::priority);
    }

    /// Attached behavior slots in dispatch order
    pub fn behavior_slots(&self) -> &[BehaviorSlot] {
        &self.behaviors
    }

    /// Mutable access to behavior slots, e.g. for enabling/disabling
    pub fn behavior_slots_mut(&mut self) -> &mut [BehaviorSlot] {
        &mut self.behaviors
    }

    pub(crate) fn take_behaviors(&mut self) -> Vec<BehaviorSlot> {
        std::mem::take(&mut self.behaviors)
    }

    pub(crate) fn restore_behaviors(&mut self, behaviors: Vec<BehaviorSlot>) {
        self.behaviors = behaviors;
    }

    // --- Commands ---

    /// Add a force through the center of mass, accumulated until the next
    /// integration step
    pub fn add_force(&mut self, force: Vec2) {
        self.force += force;
    }

    /// Add a pure torque
    pub fn add_torque(&mut self, torque: f32) {
        self.torque += torque;
    }

    /// Add an acceleration, converted to a force by this entity's mass
    pub fn add_acceleration(&mut self, acceleration: Vec2) {
        self.force += acceleration * self.mass;
    }

    /// Add a force applied at a world-space point
    ///
    /// Decomposes into a linear force plus the lever-arm torque about the
    /// center of mass.
    pub fn add_force_at_point(&mut self, force: Vec2, point: Vec2) {
        self.force += force;
        self.torque += math::cross(point - self.position, force);
    }

    /// Apply an instantaneous impulse at a world-space point, changing
    /// velocity and angular velocity immediately
    pub fn add_impulse_at_point(&mut self, impulse: Vec2, point: Vec2) {
        self.velocity += impulse / self.mass;
        self.angular_velocity += math::cross(point - self.position, impulse) / self.inertia;
        self.speed = self.velocity.norm();
    }

    /// Drain a behavior's command buffer into this entity's state
    pub(crate) fn apply_commands(&mut self, commands: &mut CommandBuffer) {
        self.force += commands.force;
        self.torque += commands.torque;
        self.force += commands.acceleration * self.mass;

        for (force, point) in commands.forces_at_point.drain(..) {
            self.add_force_at_point(force, point);
        }
        for (impulse, point) in commands.impulses_at_point.drain(..) {
            self.add_impulse_at_point(impulse, point);
        }

        if let Some(velocity) = commands.velocity.take() {
            self.velocity = velocity;
            self.speed = velocity.norm();
        }
        if let Some(rotation) = commands.rotation.take() {
            self.rotation = rotation;
        }

        commands.clear();
    }

    // --- Physics ---

    /// Advance the physical state by one timestep
    ///
    /// Velocity is integrated before position (semi-implicit Euler); the
    /// ordering is load-bearing for stability. All limit clamps run after
    /// integration.
    pub(crate) fn integrate(&mut self, world_friction: f32, gravity: f32, boundary: Vec2, dt: f32) {
        // Friction opposes the direction of travel. Its direction is
        // undefined at rest, so guard the normalization.
        let speed = self.velocity.norm();
        if speed > f32::EPSILON {
            self.force -= self.velocity * (world_friction * self.mass * gravity / speed);
        }
        if self.angular_velocity.abs() > f32::EPSILON {
            self.torque -= self.angular_velocity.signum() * world_friction * self.inertia * gravity;
        }

        self.acceleration = math::clamp_magnitude(self.force / self.mass, self.max_acceleration);
        let angular_acceleration = self.torque / self.inertia;

        self.velocity += self.acceleration * dt;
        self.angular_velocity += angular_acceleration * dt;

        self.speed = self.velocity.norm();
        if self.speed < SPEED_EPSILON {
            self.velocity = Vec2::zeros();
            self.speed = 0.0;
        } else if self.speed > self.max_speed {
            self.velocity *= self.max_speed / self.speed;
            self.speed = self.max_speed;
        }

        if self.angular_velocity.abs() < ANGULAR_SPEED_EPSILON {
            self.angular_velocity = 0.0;
        } else if self.angular_velocity.abs() > self.max_angular_velocity {
            self.angular_velocity = self.max_angular_velocity.copysign(self.angular_velocity);
        }

        self.position += self.velocity * dt;
        self.rotation += self.angular_velocity * dt;

        // Visual heading follows motion heading whenever actually moving.
        if self.speed > 0.0 {
            self.rotation = self.velocity.y.atan2(self.velocity.x);
        }

        // Exclusive chain: only one axis is corrected per frame.
        if self.position.x > boundary.x {
            self.position.x = boundary.x;
            self.velocity = math::reflect(self.velocity, Vec2::new(-1.0, 0.0));
        } else if self.position.x < 0.0 {
            self.position.x = 0.0;
            self.velocity = math::reflect(self.velocity, Vec2::new(1.0, 0.0));
        } else if self.position.y > boundary.y {
            self.position.y = boundary.y;
            self.velocity = math::reflect(self.velocity, Vec2::new(0.0, -1.0));
        } else if self.position.y < 0.0 {
            self.position.y = 0.0;
            self.velocity = math::reflect(self.velocity, Vec2::new(0.0, 1.0));
        }

        self.force = Vec2::zeros();
        self.torque = 0.0;
    }

    // --- Rendering ---

    /// Emit this entity's sprite draw parameters
    pub fn render(&self, sink: &mut dyn RenderSink) {
        let origin = self
            .visual
            .map_or_else(Vec2::zeros, |v| Vec2::new(v.radius, v.radius));
        sink.draw_sprite(&SpriteParams {
            visual: self.visual.map(|v| v.id),
            position: self.position,
            rotation: self.rotation,
            tint: self.tint,
            origin,
        });
    }

    /// Emit velocity/acceleration debug vectors and module diagnostics
    pub fn render_debug_info(&self, sink: &mut dyn RenderSink) {
        sink.draw_debug(&DebugPrimitive::Line {
            from: self.position,
            to: self.position + self.velocity,
            color: Color::GREEN,
        });
        sink.draw_debug(&DebugPrimitive::Line {
            from: self.position,
            to: self.position + self.acceleration,
            color: Color::RED,
        });

        for slot in &self.behaviors {
            slot.module().render_debug_info(sink);
        }
    }

    // --- Visual resources ---

    /// Install a visual resource, re-deriving inertia from its radius
    pub fn set_visual(&mut self, visual: Visual) -> Result<(), SpawnError> {
        if visual.radius <= 0.0 {
            return Err(SpawnError::NonPositiveRadius(visual.radius));
        }
        self.radius = visual.radius;
        self.inertia = disc_inertia(self.mass, self.radius);
        self.visual = Some(visual);
        Ok(())
    }

    /// Drop the visual resource (the physical radius is retained)
    pub fn reset_visual(&mut self) {
        self.visual = None;
    }

    /// Name of the visual resource this entity wants
    pub fn visual_name(&self) -> &str {
        &self.visual_name
    }

    /// The installed visual, if any
    pub fn visual(&self) -> Option<Visual> {
        self.visual
    }

    // --- Accessors ---

    /// World position
    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Set the world position directly
    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
    }

    /// Rotation in radians
    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    /// Set the rotation directly
    pub fn set_rotation(&mut self, rotation: f32) {
        self.rotation = rotation;
    }

    /// Linear velocity
    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    /// Set the velocity directly, bypassing force integration
    pub fn set_velocity(&mut self, velocity: Vec2) {
        self.velocity = velocity;
        self.speed = velocity.norm();
    }

    /// Angular velocity in radians per second
    pub fn angular_velocity(&self) -> f32 {
        self.angular_velocity
    }

    /// Cached speed; always equals the velocity magnitude
    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// Acceleration derived during the last integration step
    pub fn acceleration(&self) -> Vec2 {
        self.acceleration
    }

    /// Mass in kilograms
    pub fn mass(&self) -> f32 {
        self.mass
    }

    /// Moment of inertia
    pub fn inertia(&self) -> f32 {
        self.inertia
    }

    /// Characteristic radius
    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Material friction coefficient
    pub fn friction(&self) -> f32 {
        self.friction
    }

    /// Material restitution coefficient
    pub fn restitution(&self) -> f32 {
        self.restitution
    }

    /// Maximum acceleration
    pub fn max_acceleration(&self) -> f32 {
        self.max_acceleration
    }

    /// Maximum speed
    pub fn max_speed(&self) -> f32 {
        self.max_speed
    }

    /// Maximum angular velocity
    pub fn max_angular_velocity(&self) -> f32 {
        self.max_angular_velocity
    }

    /// Index of the team that owns this entity
    pub fn team(&self) -> usize {
        self.team
    }

    pub(crate) fn set_team(&mut self, team: usize) {
        self.team = team;
    }

    /// Whether other entities' behaviors may still target this entity
    pub fn is_valid_target(&self) -> bool {
        self.valid_target
    }

    pub(crate) fn set_valid_target(&mut self, valid: bool) {
        self.valid_target = valid;
    }

    /// Sprite tint
    pub fn tint(&self) -> Color {
        self.tint
    }

    /// Set the sprite tint
    pub fn set_tint(&mut self, tint: Color) {
        self.tint = tint;
    }
}

impl std::fmt::Debug for Entity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Entity")
            .field("position", &self.position)
            .field("velocity", &self.velocity)
            .field("speed", &self.speed)
            .field("team", &self.team)
            .field("behaviors", &self.behaviors.len())
            .finish_non_exhaustive()
    }
}

/// Moment of inertia of a solid disc about its center
fn disc_inertia(mass: f32, radius: f32) -> f32 {
    0.5 * mass * radius * radius
}
