//! Player input behavior
//!
//! Latches a move target from pointer press edges and steers toward it with
//! a force-based seek-and-arrive law. Unlike [`FollowBehavior`]'s direct
//! velocity writes, this variant accumulates force, so it composes with the
//! mass/friction integration.
//!
//! [`FollowBehavior`]: crate::world::behavior::FollowBehavior

use crate::config::BehaviorConfig;
use crate::foundation::math::Vec2;
use crate::render::{Color, DebugPrimitive, RenderSink};
use crate::world::behavior::{BehaviorModule, CommandBuffer};
use crate::world::{EntityId, World};

/// Within this distance of the move target the entity stops and the target
/// deactivates
const ARRIVAL_THRESHOLD: f32 = 1.0;

/// Steering behavior driven by pointer input
#[derive(Debug)]
pub struct PlayerInput {
    priority: i8,
    move_target: Vec2,
    use_move_target: bool,
}

impl PlayerInput {
    /// Create a player input module with no active move target
    pub fn new(config: &BehaviorConfig) -> Self {
        Self {
            priority: config.player_input_priority,
            move_target: Vec2::zeros(),
            use_move_target: false,
        }
    }

    /// The active move target, if one is latched
    pub fn move_target(&self) -> Option<Vec2> {
        self.use_move_target.then_some(self.move_target)
    }
}

impl BehaviorModule for PlayerInput {
    fn default_priority(&self) -> i8 {
        self.priority
    }

    fn run(&mut self, world: &World, subject: EntityId, commands: &mut CommandBuffer, _elapsed: f32) {
        // Latch a new move target on a primary-button press edge.
        let pointer = world.pointer();
        if pointer.primary_pressed {
            self.move_target = pointer.position;
            self.use_move_target = true;
        }

        if !self.use_move_target {
            return;
        }

        let Some(entity) = world.entity(subject) else {
            return;
        };

        let to_target = self.move_target - entity.position();
        let distance = to_target.norm();

        if distance < ARRIVAL_THRESHOLD {
            // Arrival: stop dead and drop the target until the next press.
            commands.set_velocity(Vec2::zeros());
            self.use_move_target = false;
            return;
        }

        let desired_speed = entity.max_speed().min(distance);
        let speed = entity.speed();

        if desired_speed > speed {
            // Linear ramp toward closing the speed gap, capped at the
            // entity's acceleration limit.
            let ramp = ((desired_speed - speed) / entity.max_acceleration()).min(1.0);
            let acceleration = ramp * entity.max_acceleration();
            commands.add_force(to_target * (acceleration / distance));
        }
    }

    fn render_debug_info(&self, sink: &mut dyn RenderSink) {
        if self.use_move_target {
            let t = self.move_target;
            sink.draw_debug(&DebugPrimitive::Triangle {
                points: [
                    Vec2::new(t.x, t.y - 2.0),
                    Vec2::new(t.x + 2.0, t.y + 2.0),
                    Vec2::new(t.x - 2.0, t.y + 2.0),
                ],
                color: Color::WHITE,
            });
        }
    }
}
