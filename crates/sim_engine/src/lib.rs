//! # Sim Engine
//!
//! A small real-time agent simulation engine: mobile entities move under
//! accumulated forces and priority-ordered steering behaviors inside a
//! bounded 2D world with axis-aligned wall reflection.
//!
//! ## Features
//!
//! - **Entity physics**: semi-implicit Euler integration with friction,
//!   force/impulse accumulation, and post-integration speed clamps
//! - **Behavior modules**: pluggable per-frame decision units dispatched
//!   in stable priority order
//! - **Teams**: ordered groups of entities owned and updated by the world
//! - **Opaque collaborators**: rendering, visual resources, and pointer
//!   input reach the core only through narrow traits
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use sim_engine::prelude::*;
//!
//! fn main() -> Result<(), SpawnError> {
//!     let config = SimConfig::default();
//!     let mut world = World::new(&config);
//!
//!     let team = world.create_team();
//!     let entity = Entity::new(&config.entity, Vec2::new(100.0, 100.0))?;
//!     let id = world.add_player(entity, team);
//!
//!     world.update(1.0 / 60.0);
//!     let _ = id;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod assets;
pub mod config;
pub mod foundation;
pub mod input;
pub mod render;
pub mod world;

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        assets::{AssetError, HeadlessVisualFactory, Visual, VisualFactory, VisualId},
        config::{ConfigError, SimConfig},
        foundation::math::Vec2,
        input::{PointerSnapshot, PointerState, PointerTracker},
        render::{Color, DebugPrimitive, NullRenderSink, RenderSink, SpriteParams},
        world::{
            behavior::{BehaviorModule, CommandBuffer, FollowBehavior, PlayerInput},
            Entity, EntityId, SpawnError, World,
        },
    };
}
