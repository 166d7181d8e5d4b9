//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (layout order)
//! - No rendering or platform dependencies; audio arrives as a handle

pub mod arena;
pub mod autopilot;
pub mod collision;
pub mod level;
pub mod patrol;
pub mod player;
pub mod state;
pub mod tick;

pub use arena::{Arena, NodeId};
pub use collision::{Aabb, Blocker, Circle, first_blocker, is_blocked};
pub use level::{CollectibleKind, LEVEL_COUNT, LEVELS, LevelLayout};
pub use patrol::{Direction, Patrol};
pub use player::Player;
pub use state::{GameEvent, GamePhase, GameState, NodeKind, SceneNode, Timer};
pub use tick::{TickInput, tick};
