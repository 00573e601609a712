//! Behavior module system
//!
//! A behavior module is a pluggable per-frame decision unit attached to an
//! entity. Modules run in stable priority order (lower value first, ties in
//! attachment order) and steer the entity exclusively through a
//! [`CommandBuffer`], which the world applies after each module runs. That
//! keeps modules decoupled from the integrator while still letting a later
//! module observe an earlier module's effect through the shared state.

mod follow;
mod player_input;

pub use follow::FollowBehavior;
pub use player_input::PlayerInput;

use crate::foundation::math::Vec2;
use crate::render::RenderSink;
use crate::world::{EntityId, World};

/// A unit of per-frame decision logic attached to an entity
pub trait BehaviorModule {
    /// The variant's default scheduling priority, used at attach time when
    /// the caller does not supply an explicit one
    fn default_priority(&self) -> i8;

    /// The sole decision-making entry point, called once per frame
    ///
    /// Implementations may read any world or entity accessor and may queue
    /// force, impulse, or velocity commands for the subject entity. They
    /// must not assume any call order relative to sibling modules beyond
    /// priority ordering, and they must degrade to an idle policy when a
    /// held target reference no longer resolves.
    fn run(&mut self, world: &World, subject: EntityId, commands: &mut CommandBuffer, elapsed: f32);

    /// Emit visual diagnostics; has no effect on simulation state
    fn render_debug_info(&self, sink: &mut dyn RenderSink) {
        let _ = sink;
    }
}

/// A behavior module attached to an entity, with its scheduling state
///
/// The enabled flag lives on the slot rather than the module so toggling a
/// module never reorders its siblings.
pub struct BehaviorSlot {
    priority: i8,
    enabled: bool,
    module: Box<dyn BehaviorModule>,
}

impl BehaviorSlot {
    pub(crate) fn new(priority: i8, module: Box<dyn BehaviorModule>) -> Self {
        Self {
            priority,
            enabled: true,
            module,
        }
    }

    /// Scheduling priority (lower runs first)
    pub fn priority(&self) -> i8 {
        self.priority
    }

    /// Whether this module participates in dispatch
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Enable or disable this module without changing its slot position
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Borrow the module
    pub fn module(&self) -> &dyn BehaviorModule {
        self.module.as_ref()
    }

    /// Mutably borrow the module
    pub fn module_mut(&mut self) -> &mut dyn BehaviorModule {
        self.module.as_mut()
    }
}

impl std::fmt::Debug for BehaviorSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BehaviorSlot")
            .field("priority", &self.priority)
            .field("enabled", &self.enabled)
            .finish_non_exhaustive()
    }
}

/// Per-frame steering commands produced by a behavior module
///
/// Forces and torques accumulate; velocity and rotation sets are
/// last-write-wins within a single module run. The world drains the buffer
/// into the subject entity immediately after each module returns.
#[derive(Debug, Default)]
pub struct CommandBuffer {
    pub(crate) force: Vec2,
    pub(crate) torque: f32,
    pub(crate) acceleration: Vec2,
    pub(crate) forces_at_point: Vec<(Vec2, Vec2)>,
    pub(crate) impulses_at_point: Vec<(Vec2, Vec2)>,
    pub(crate) velocity: Option<Vec2>,
    pub(crate) rotation: Option<f32>,
}

impl CommandBuffer {
    /// Add a force through the entity's center of mass
    pub fn add_force(&mut self, force: Vec2) {
        self.force += force;
    }

    /// Add a pure torque
    pub fn add_torque(&mut self, torque: f32) {
        self.torque += torque;
    }

    /// Add an acceleration (converted to a force by the entity's mass)
    pub fn add_acceleration(&mut self, acceleration: Vec2) {
        self.acceleration += acceleration;
    }

    /// Add a force applied at a world-space point, producing a lever-arm
    /// torque about the entity's center
    pub fn add_force_at_point(&mut self, force: Vec2, point: Vec2) {
        self.forces_at_point.push((force, point));
    }

    /// Add an instantaneous impulse applied at a world-space point
    pub fn add_impulse_at_point(&mut self, impulse: Vec2, point: Vec2) {
        self.impulses_at_point.push((impulse, point));
    }

    /// Set the entity's velocity directly, bypassing force integration
    pub fn set_velocity(&mut self, velocity: Vec2) {
        self.velocity = Some(velocity);
    }

    /// Set the entity's rotation directly
    pub fn set_rotation(&mut self, rotation: f32) {
        self.rotation = Some(rotation);
    }

    pub(crate) fn clear(&mut self) {
        self.force = Vec2::zeros();
        self.torque = 0.0;
        self.acceleration = Vec2::zeros();
        self.forces_at_point.clear();
        self.impulses_at_point.clear();
        self.velocity = None;
        self.rotation = None;
    }
}
