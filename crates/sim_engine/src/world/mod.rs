//! World aggregate
//!
//! The world owns the authoritative entity table and its partition into
//! ordered teams, carries the global physics attributes, and drives the
//! per-frame update and render fan-out.

pub mod behavior;
mod entity;

pub use entity::{Entity, EntityId, SpawnError};

use slotmap::SlotMap;

use crate::assets::VisualFactory;
use crate::config::SimConfig;
use crate::foundation::math::Vec2;
use crate::input::PointerSnapshot;
use crate::render::RenderSink;
use crate::world::behavior::CommandBuffer;

/// An ordered group of entities sharing a side
pub type Team = Vec<EntityId>;

/// The simulation world: entity table, teams, and global physics attributes
pub struct World {
    entities: SlotMap<EntityId, Entity>,
    teams: Vec<Team>,
    friction: f32,
    gravity: f32,
    boundary: Vec2,
    pointer: PointerSnapshot,
}

impl World {
    /// Create an empty world from configuration
    pub fn new(config: &SimConfig) -> Self {
        Self {
            entities: SlotMap::with_key(),
            teams: Vec::new(),
            friction: config.world.friction,
            gravity: config.world.gravity,
            boundary: Vec2::new(config.world.width, config.world.height),
            pointer: PointerSnapshot::default(),
        }
    }

    /// Advance the simulation by one timestep
    ///
    /// Teams update in order, entities within a team in insertion order.
    /// Each entity runs its enabled behavior modules in priority order;
    /// commands are applied after every module so later modules observe
    /// earlier effects. Integration and boundary handling follow.
    pub fn update(&mut self, dt: f32) {
        let ids: Vec<EntityId> = self.teams.iter().flatten().copied().collect();
        let (friction, gravity, boundary) = (self.friction, self.gravity, self.boundary);

        let mut commands = CommandBuffer::default();
        for id in ids {
            // Detach the behavior list so modules can read the world,
            // including their own entity, without aliasing it mutably.
            let Some(entity) = self.entities.get_mut(id) else {
                continue;
            };
            let mut behaviors = entity.take_behaviors();

            for slot in &mut behaviors {
                if !slot.is_enabled() {
                    continue;
                }
                slot.module_mut().run(&*self, id, &mut commands, dt);
                if let Some(entity) = self.entities.get_mut(id) {
                    entity.apply_commands(&mut commands);
                }
            }

            if let Some(entity) = self.entities.get_mut(id) {
                entity.restore_behaviors(behaviors);
                entity.integrate(friction, gravity, boundary, dt);
            }
        }
    }

    // --- Team operations ---

    /// Append an empty team and return its index
    pub fn create_team(&mut self) -> usize {
        self.teams.push(Team::new());
        self.teams.len() - 1
    }

    /// Number of teams
    pub fn team_count(&self) -> usize {
        self.teams.len()
    }

    /// Entities of a team in insertion order
    pub fn team(&self, team: usize) -> Option<&[EntityId]> {
        self.teams.get(team).map(Vec::as_slice)
    }

    // --- Player operations ---

    /// Add an entity to a team, taking ownership of it
    ///
    /// Out-of-range team indices are a silent no-op by contract: the entity
    /// is dropped and `None` returned.
    pub fn add_player(&mut self, mut player: Entity, team: usize) -> Option<EntityId> {
        if team >= self.teams.len() {
            log::warn!("add_player: team index {} out of range, dropping entity", team);
            return None;
        }

        player.set_team(team);
        let id = self.entities.insert(player);
        self.teams[team].push(id);
        Some(id)
    }

    /// Fetch a player by team index and ordinal within the team
    ///
    /// Out-of-range lookups return `None` rather than failing.
    pub fn player(&self, team: usize, ordinal: usize) -> Option<EntityId> {
        self.teams.get(team)?.get(ordinal).copied()
    }

    /// Reparent an entity to another team
    ///
    /// No-op when the entity is unknown or the destination index is out of
    /// range. Keeps the stored team index consistent with the containing
    /// team.
    pub fn move_player(&mut self, id: EntityId, new_team: usize) {
        if new_team >= self.teams.len() {
            log::warn!("move_player: team index {} out of range", new_team);
            return;
        }
        let Some(entity) = self.entities.get_mut(id) else {
            return;
        };

        let old_team = entity.team();
        entity.set_team(new_team);
        if let Some(team) = self.teams.get_mut(old_team) {
            team.retain(|&member| member != id);
        }
        self.teams[new_team].push(id);
    }

    /// Remove an entity from the world
    ///
    /// The entity is marked invalid and detached from its team before its
    /// owning slot is released, so behaviors holding its id degrade to a
    /// lookup miss instead of observing a half-removed entity.
    pub fn remove_player(&mut self, id: EntityId) {
        let Some(entity) = self.entities.get_mut(id) else {
            return;
        };
        entity.set_valid_target(false);
        let team = entity.team();

        if let Some(team) = self.teams.get_mut(team) {
            if let Some(index) = team.iter().position(|&member| member == id) {
                team.remove(index);
            }
        }
        self.entities.remove(id);
    }

    /// Remove every entity from a team, invalidating each first
    pub fn remove_all_players(&mut self, team: usize) {
        let Some(members) = self.teams.get_mut(team) else {
            return;
        };
        for id in members.drain(..) {
            if let Some(entity) = self.entities.get_mut(id) {
                entity.set_valid_target(false);
            }
            self.entities.remove(id);
        }
    }

    /// Borrow an entity by id; `None` once it has been removed
    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(id)
    }

    /// Mutably borrow an entity by id
    pub fn entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(id)
    }

    /// Total number of live entities
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    // --- Visual resources ---

    /// Create visual resources for every entity through the host factory
    ///
    /// Stops at the first per-entity failure; already-created visuals are
    /// kept.
    pub fn create_all_visuals(&mut self, factory: &mut dyn VisualFactory) -> Result<(), SpawnError> {
        for (_, entity) in &mut self.entities {
            let visual = factory.create_visual(entity.visual_name())?;
            entity.set_visual(visual)?;
        }
        Ok(())
    }

    /// Drop every entity's visual resource (e.g. on device loss)
    pub fn reset_all_visuals(&mut self) {
        for (_, entity) in &mut self.entities {
            entity.reset_visual();
        }
    }

    // --- Rendering ---

    /// Emit sprite draw commands for all entities in team/insertion order
    pub fn render(&self, sink: &mut dyn RenderSink) {
        for team in &self.teams {
            for &id in team {
                if let Some(entity) = self.entities.get(id) {
                    entity.render(sink);
                }
            }
        }
    }

    /// Emit debug primitives for all entities and their behavior modules
    pub fn render_debug_info(&self, sink: &mut dyn RenderSink) {
        for team in &self.teams {
            for &id in team {
                if let Some(entity) = self.entities.get(id) {
                    entity.render_debug_info(sink);
                }
            }
        }
    }

    // --- World attributes ---

    /// Global friction coefficient
    pub fn friction_coefficient(&self) -> f32 {
        self.friction
    }

    /// Set the global friction coefficient; takes effect next update
    pub fn set_friction_coefficient(&mut self, friction: f32) {
        self.friction = friction;
    }

    /// Gravity constant used for friction force magnitudes
    pub fn gravity(&self) -> f32 {
        self.gravity
    }

    /// World boundary extent; the boundary rectangle spans (0,0) to this
    pub fn boundary(&self) -> Vec2 {
        self.boundary
    }

    /// Resize the world boundary; propagates immediately
    pub fn set_boundary(&mut self, boundary: Vec2) {
        self.boundary = boundary;
    }

    /// This frame's pointer snapshot
    pub fn pointer(&self) -> PointerSnapshot {
        self.pointer
    }

    /// Install the pointer snapshot for the coming update
    pub fn set_pointer(&mut self, pointer: PointerSnapshot) {
        self.pointer = pointer;
    }
}

impl std::fmt::Debug for World {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("World")
            .field("entities", &self.entities.len())
            .field("teams", &self.teams.len())
            .field("boundary", &self.boundary)
            .finish_non_exhaustive()
    }
}
