//! Follow behavior
//!
//! Chases a target entity and holds a standoff distance from it. This is a
//! direct-velocity steering law: it writes the entity's velocity instead of
//! accumulating forces, so its ordering against force-based modules
//! matters.

use crate::config::BehaviorConfig;
use crate::foundation::math::Vec2;
use crate::world::behavior::{BehaviorModule, CommandBuffer};
use crate::world::{Entity, EntityId, World};

/// Steering behavior that follows another entity at a standoff distance
#[derive(Debug)]
pub struct FollowBehavior {
    priority: i8,
    follow_distance: f32,
    target: Option<EntityId>,
}

impl FollowBehavior {
    /// Create a follower with no target; it will try to acquire the world's
    /// primary entity (team 0, ordinal 0) on its next run
    pub fn new(config: &BehaviorConfig) -> Self {
        Self {
            priority: config.default_priority,
            follow_distance: config.follow_distance,
            target: None,
        }
    }

    /// Create a follower locked onto a specific entity
    pub fn with_target(config: &BehaviorConfig, target: EntityId) -> Self {
        Self {
            target: Some(target),
            ..Self::new(config)
        }
    }

    /// Change the standoff distance
    pub fn set_follow_distance(&mut self, distance: f32) {
        self.follow_distance = distance;
    }

    /// Currently held target, if any
    pub fn target(&self) -> Option<EntityId> {
        self.target
    }
}

impl BehaviorModule for FollowBehavior {
    fn default_priority(&self) -> i8 {
        self.priority
    }

    fn run(&mut self, world: &World, subject: EntityId, commands: &mut CommandBuffer, _elapsed: f32) {
        let Some(entity) = world.entity(subject) else {
            return;
        };

        // A held target that was removed or invalidated is dropped; coast
        // down and wait a frame before re-acquiring.
        if let Some(target) = self.target {
            let targetable = world.entity(target).is_some_and(Entity::is_valid_target);
            if !targetable {
                self.target = None;
                commands.set_velocity(entity.velocity() * 0.5);
                return;
            }
        }

        let target = match self.target {
            Some(id) => id,
            None => {
                let Some(primary) = world.player(0, 0) else {
                    return; // nothing to follow, stay idle
                };
                self.target = Some(primary);
                primary
            }
        };

        let Some(target_entity) = world.entity(target) else {
            return;
        };

        let to_target = target_entity.position() - entity.position();
        let distance = to_target.norm();

        // Negative when inside the standoff radius: the entity backs away.
        let new_speed = entity.max_speed().min(distance - self.follow_distance);

        if distance > f32::EPSILON {
            commands.set_velocity(to_target * (new_speed / distance));
        } else {
            commands.set_velocity(Vec2::zeros());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimConfig;
    use approx::assert_relative_eq;

    fn world_with_primary(at: Vec2) -> (World, SimConfig, EntityId) {
        let config = SimConfig::default();
        let mut world = World::new(&config);
        let team = world.create_team();
        let primary = Entity::new(&config.entity, at).unwrap();
        let id = world.add_player(primary, team).unwrap();
        (world, config, id)
    }

    #[test]
    fn test_commanded_speed_follows_distance_law() {
        // Target at (120,100), follower at (0,100): distance 120, standoff
        // 20 -> commanded speed min(maxSpeed, 100) along +x.
        let (mut world, config, _primary) = world_with_primary(Vec2::new(120.0, 100.0));
        let team = world.create_team();
        let follower = Entity::new(&config.entity, Vec2::new(0.0, 100.0)).unwrap();
        let follower_id = world.add_player(follower, team).unwrap();

        let mut behavior = FollowBehavior::new(&config.behavior);
        let mut commands = CommandBuffer::default();
        behavior.run(&world, follower_id, &mut commands, 1.0 / 60.0);

        let velocity = commands.velocity.expect("follow must command a velocity");
        assert_relative_eq!(velocity.x, 100.0, epsilon = 1e-3);
        assert_relative_eq!(velocity.y, 0.0, epsilon = 1e-3);
    }

    #[test]
    fn test_retreats_when_inside_standoff() {
        let (mut world, config, _primary) = world_with_primary(Vec2::new(10.0, 0.0));
        let team = world.create_team();
        let follower = Entity::new(&config.entity, Vec2::zeros()).unwrap();
        let follower_id = world.add_player(follower, team).unwrap();

        let mut behavior = FollowBehavior::new(&config.behavior);
        let mut commands = CommandBuffer::default();
        behavior.run(&world, follower_id, &mut commands, 1.0 / 60.0);

        // distance 10 < standoff 20: signed speed -10, i.e. backing away.
        let velocity = commands.velocity.unwrap();
        assert_relative_eq!(velocity.x, -10.0, epsilon = 1e-3);
    }

    #[test]
    fn test_commanded_speed_clamped_to_max() {
        let (mut world, config, _primary) = world_with_primary(Vec2::new(10_000.0, 0.0));
        let team = world.create_team();
        let follower = Entity::new(&config.entity, Vec2::zeros()).unwrap();
        let follower_id = world.add_player(follower, team).unwrap();

        let mut behavior = FollowBehavior::new(&config.behavior);
        let mut commands = CommandBuffer::default();
        behavior.run(&world, follower_id, &mut commands, 1.0 / 60.0);

        assert_relative_eq!(commands.velocity.unwrap().norm(), 300.0, epsilon = 1e-2);
    }

    #[test]
    fn test_idles_without_primary() {
        let config = SimConfig::default();
        let mut world = World::new(&config);
        let _primary_team = world.create_team(); // exists but stays empty
        let team = world.create_team();
        let follower = Entity::new(&config.entity, Vec2::zeros()).unwrap();
        let follower_id = world.add_player(follower, team).unwrap();

        let mut behavior = FollowBehavior::new(&config.behavior);
        let mut commands = CommandBuffer::default();
        behavior.run(&world, follower_id, &mut commands, 1.0 / 60.0);

        assert!(commands.velocity.is_none());
        assert!(behavior.target().is_none());
    }

    #[test]
    fn test_invalid_target_halves_velocity_and_clears() {
        let (mut world, config, primary) = world_with_primary(Vec2::new(100.0, 0.0));
        let team = world.create_team();
        let mut follower = Entity::new(&config.entity, Vec2::zeros()).unwrap();
        follower.set_velocity(Vec2::new(40.0, 0.0));
        let follower_id = world.add_player(follower, team).unwrap();

        let mut behavior = FollowBehavior::with_target(&config.behavior, primary);
        world.remove_player(primary);

        let mut commands = CommandBuffer::default();
        behavior.run(&world, follower_id, &mut commands, 1.0 / 60.0);

        // Coasting deceleration, no re-acquire this frame.
        assert_relative_eq!(commands.velocity.unwrap().x, 20.0);
        assert!(behavior.target().is_none());
    }

    #[test]
    fn test_reacquires_primary_after_losing_target() {
        let (mut world, config, primary) = world_with_primary(Vec2::new(100.0, 0.0));
        let team = world.create_team();
        let follower = Entity::new(&config.entity, Vec2::zeros()).unwrap();
        let follower_id = world.add_player(follower, team).unwrap();

        let mut behavior = FollowBehavior::new(&config.behavior);
        let mut commands = CommandBuffer::default();
        behavior.run(&world, follower_id, &mut commands, 1.0 / 60.0);
        assert_eq!(behavior.target(), Some(primary));

        // Replace the primary; next run drops the stale handle, the run
        // after locks onto the replacement.
        world.remove_player(primary);
        let replacement = Entity::new(&config.entity, Vec2::new(0.0, 50.0)).unwrap();
        let replacement_id = world.add_player(replacement, 0).unwrap();

        commands.clear();
        behavior.run(&world, follower_id, &mut commands, 1.0 / 60.0);
        assert!(behavior.target().is_none());

        commands.clear();
        behavior.run(&world, follower_id, &mut commands, 1.0 / 60.0);
        assert_eq!(behavior.target(), Some(replacement_id));
    }
}
