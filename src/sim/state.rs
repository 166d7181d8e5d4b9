//! Game state and core simulation types
//!
//! A `GameState` is one loaded level: the immutable layout it came from plus
//! everything that mutates while playing it. Leaving a level drops the state.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::arena::{Arena, NodeId};
use super::collision::{Aabb, Circle};
use super::level::{self, CollectibleKind, LevelLayout};
use super::patrol::Patrol;
use super::player::Player;
use crate::consts::{LOSE_MENU_DELAY, WIN_MENU_DELAY};

/// Outcome state of the level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Timer running, input live
    Active,
    /// Frozen until resumed
    Paused,
    /// Every pickup collected
    Won,
    /// Timer ran out first
    Lost,
}

impl GamePhase {
    pub fn is_terminal(self) -> bool {
        matches!(self, GamePhase::Won | GamePhase::Lost)
    }
}

/// Notifications for the host (HUD, menu flow)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Collected { id: u32, kind: CollectibleKind },
    Won { time_taken: f32 },
    Lost,
    Paused,
    Resumed,
    Restarted,
    /// Terminal delay elapsed, the host should show the menu
    ReturnToMenu,
}

/// What a scene node draws as
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum NodeKind {
    Ground { size: Vec2 },
    Wall { size: Vec2, height: f32 },
    Block { size: Vec2, height: f32 },
    Mover { radius: f32 },
    Pickup { kind: CollectibleKind },
    Player { radius: f32 },
}

/// An object in the level scene
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SceneNode {
    pub kind: NodeKind,
    pub pos: Vec2,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Collectible {
    pub id: u32,
    pub kind: CollectibleKind,
    pub pos: Vec2,
    /// One-way until restart
    pub collected: bool,
    /// Present while uncollected
    pub node: Option<NodeId>,
}

/// A patrolling obstacle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Mover {
    pub id: u32,
    pub pos: Vec2,
    pub radius: f32,
    pub patrol: Patrol,
    pub node: NodeId,
}

impl Mover {
    pub fn circle(&self) -> Circle {
        Circle::new(self.pos, self.radius)
    }
}

/// Level countdown
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Timer {
    pub remaining: f32,
    pub initial: f32,
}

impl Timer {
    pub fn new(seconds: f32) -> Self {
        let seconds = seconds.max(0.0);
        Self {
            remaining: seconds,
            initial: seconds,
        }
    }

    /// Count down, clamping at zero. Returns true once expired.
    pub fn tick(&mut self, dt: f32) -> bool {
        self.remaining = (self.remaining - dt).max(0.0);
        self.is_expired()
    }

    pub fn is_expired(&self) -> bool {
        self.remaining <= 0.0
    }

    pub fn elapsed(&self) -> f32 {
        self.initial - self.remaining
    }

    /// 1.0 when full, 0.0 when expired
    pub fn fraction(&self) -> f32 {
        if self.initial <= 0.0 {
            0.0
        } else {
            self.remaining / self.initial
        }
    }

    pub fn reset(&mut self) {
        self.remaining = self.initial;
    }
}

/// Complete state of one loaded level (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub layout: LevelLayout,
    pub phase: GamePhase,
    pub player: Player,
    pub player_node: NodeId,
    /// Boundary walls followed by level blocks
    pub statics: Vec<Aabb>,
    /// Fixed at load time, in layout order
    pub collectibles: Vec<Collectible>,
    pub movers: Vec<Mover>,
    pub timer: Timer,
    /// Seconds until the host should return to the menu (terminal phases only)
    pub menu_return: Option<f32>,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Everything the renderer draws
    pub scene: Arena<SceneNode>,
    #[serde(skip)]
    events: Vec<GameEvent>,
}

impl GameState {
    /// Load a level from the table (unknown ids fall back to level 1)
    pub fn new(level_id: u32) -> Self {
        Self::from_layout(level::layout(level_id))
    }

    /// Instantiate an arbitrary layout
    pub fn from_layout(layout: LevelLayout) -> Self {
        let mut scene = Arena::new();

        scene.insert(SceneNode {
            kind: NodeKind::Ground {
                size: layout.ground,
            },
            pos: Vec2::ZERO,
        });

        let mut statics = Vec::with_capacity(4 + layout.blocks.len());
        for wall in layout.walls() {
            scene.insert(SceneNode {
                kind: NodeKind::Wall {
                    size: wall.size,
                    height: wall.height,
                },
                pos: wall.center,
            });
            statics.push(wall.aabb());
        }
        for block in &layout.blocks {
            scene.insert(SceneNode {
                kind: NodeKind::Block {
                    size: block.size,
                    height: block.height,
                },
                pos: block.center,
            });
            statics.push(block.aabb());
        }

        let movers = layout
            .movers
            .iter()
            .enumerate()
            .map(|(i, placement)| {
                let patrol = Patrol::new(placement.path.clone(), placement.speed, placement.pause);
                let pos = patrol.start();
                let node = scene.insert(SceneNode {
                    kind: NodeKind::Mover {
                        radius: placement.radius,
                    },
                    pos,
                });
                Mover {
                    id: i as u32,
                    pos,
                    radius: placement.radius,
                    patrol,
                    node,
                }
            })
            .collect();

        let collectibles = layout
            .collectibles
            .iter()
            .enumerate()
            .map(|(i, placement)| Collectible {
                id: i as u32,
                kind: placement.kind,
                pos: placement.pos,
                collected: false,
                node: Some(scene.insert(SceneNode {
                    kind: NodeKind::Pickup {
                        kind: placement.kind,
                    },
                    pos: placement.pos,
                })),
            })
            .collect();

        let player = Player::new(layout.spawn);
        let player_node = scene.insert(SceneNode {
            kind: NodeKind::Player {
                radius: player.radius,
            },
            pos: player.pos,
        });

        log::info!(
            "Loaded level {} \"{}\": {} pickups, {} blocks, {} movers",
            layout.id,
            layout.name,
            layout.collectibles.len(),
            layout.blocks.len(),
            layout.movers.len()
        );

        Self {
            timer: Timer::new(layout.time_limit),
            layout,
            phase: GamePhase::Active,
            player,
            player_node,
            statics,
            collectibles,
            movers,
            menu_return: None,
            time_ticks: 0,
            scene,
            events: Vec::new(),
        }
    }

    pub fn level_id(&self) -> u32 {
        self.layout.id
    }

    /// Number of collected pickups
    pub fn score(&self) -> u32 {
        self.collectibles.iter().filter(|c| c.collected).count() as u32
    }

    /// Pickups in the level
    pub fn total(&self) -> u32 {
        self.collectibles.len() as u32
    }

    pub fn is_terminal(&self) -> bool {
        self.phase.is_terminal()
    }

    pub fn mover_circles(&self) -> impl Iterator<Item = Circle> + '_ {
        self.movers.iter().map(Mover::circle)
    }

    /// Reset to the freshly loaded state, from any phase
    pub fn restart(&mut self) {
        self.timer.reset();
        self.phase = GamePhase::Active;
        self.menu_return = None;
        self.time_ticks = 0;

        self.player.reset();
        self.sync_node(self.player_node, self.player.pos);

        for c in &mut self.collectibles {
            c.collected = false;
            if c.node.is_none() {
                c.node = Some(self.scene.insert(SceneNode {
                    kind: NodeKind::Pickup { kind: c.kind },
                    pos: c.pos,
                }));
            }
        }

        for i in 0..self.movers.len() {
            let start = self.movers[i].patrol.reset();
            self.movers[i].pos = start;
            let node = self.movers[i].node;
            self.sync_node(node, start);
        }

        log::info!("Restarted level {}", self.layout.id);
        self.push_event(GameEvent::Restarted);
    }

    /// Mark a pickup collected and drop it from the scene.
    /// Returns false if it was already collected.
    pub fn collect(&mut self, index: usize) -> bool {
        let Some(c) = self.collectibles.get_mut(index) else {
            return false;
        };
        if c.collected {
            return false;
        }
        c.collected = true;
        if let Some(node) = c.node.take() {
            self.scene.remove(node);
        }
        let event = GameEvent::Collected {
            id: c.id,
            kind: c.kind,
        };
        self.push_event(event);
        true
    }

    /// Enter `Won` or `Lost` and arm the menu return delay
    pub fn finish(&mut self, won: bool) {
        if self.is_terminal() {
            return;
        }
        if won {
            self.phase = GamePhase::Won;
            self.menu_return = Some(WIN_MENU_DELAY);
            log::info!(
                "Level {} won with {:.1}s left",
                self.layout.id,
                self.timer.remaining
            );
            self.push_event(GameEvent::Won {
                time_taken: self.timer.elapsed(),
            });
        } else {
            self.phase = GamePhase::Lost;
            self.menu_return = Some(LOSE_MENU_DELAY);
            log::info!(
                "Level {} lost with {}/{} collected",
                self.layout.id,
                self.score(),
                self.total()
            );
            self.push_event(GameEvent::Lost);
        }
    }

    pub(crate) fn sync_node(&mut self, node: NodeId, pos: Vec2) {
        if let Some(n) = self.scene.get_mut(node) {
            n.pos = pos;
        }
    }

    pub(crate) fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take the events produced since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_builds_scene() {
        let state = GameState::new(9);
        let pickups = state
            .scene
            .iter()
            .filter(|(_, n)| matches!(n.kind, NodeKind::Pickup { .. }))
            .count();
        let movers = state
            .scene
            .iter()
            .filter(|(_, n)| matches!(n.kind, NodeKind::Mover { .. }))
            .count();
        assert_eq!(pickups, 12);
        assert_eq!(movers, 3);
        assert_eq!(state.statics.len(), 4 + state.layout.blocks.len());
        assert_eq!(state.phase, GamePhase::Active);
        assert_eq!(state.timer.remaining, state.layout.time_limit);
    }

    #[test]
    fn test_collect_is_one_way() {
        let mut state = GameState::new(1);
        let node = state.collectibles[2].node.unwrap();

        assert!(state.collect(2));
        assert!(!state.collect(2));
        assert!(!state.collect(99));
        assert_eq!(state.score(), 1);
        assert!(!state.scene.contains(node));
        assert!(state.collectibles[2].node.is_none());
    }

    #[test]
    fn test_restart_respawns_pickups() {
        let mut state = GameState::new(1);
        state.collect(0);
        state.collect(1);
        state.timer.remaining = 3.0;
        state.player.pos = Vec2::new(4.0, 4.0);
        state.player.vel = Vec2::new(1.0, 1.0);
        state.finish(false);

        state.restart();

        assert_eq!(state.phase, GamePhase::Active);
        assert_eq!(state.score(), 0);
        assert_eq!(state.timer.remaining, state.timer.initial);
        assert_eq!(state.player.pos, state.layout.spawn);
        assert_eq!(state.player.vel, Vec2::ZERO);
        assert!(state.menu_return.is_none());
        assert!(state
            .collectibles
            .iter()
            .all(|c| !c.collected && c.node.is_some_and(|n| state.scene.contains(n))));
    }

    #[test]
    fn test_finish_is_idempotent() {
        let mut state = GameState::new(1);
        state.finish(true);
        state.finish(false);
        assert_eq!(state.phase, GamePhase::Won);
        let events = state.drain_events();
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], GameEvent::Won { .. }));
        assert!(state.drain_events().is_empty());
    }

    #[test]
    fn test_timer_clamps_at_zero() {
        let mut timer = Timer::new(0.05);
        assert!(!timer.tick(0.02));
        assert!(timer.tick(0.1));
        assert_eq!(timer.remaining, 0.0);
        assert_eq!(timer.fraction(), 0.0);
        timer.reset();
        assert_eq!(timer.fraction(), 1.0);
    }
}
