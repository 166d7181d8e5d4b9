//! Fixed timestep simulation tick
//!
//! Per tick: input → velocity → collision-gated move → pickup scan → win
//! check → mover patrol → countdown. Terminal phases only run the menu
//! return delay.

use glam::Vec2;

use super::autopilot;
use super::collision::first_blocker;
use super::state::{GameEvent, GamePhase, GameState};
use crate::audio::{AudioService, SoundEffect};
use crate::consts::PICKUP_RADIUS;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Directional input on the ground plane, each axis in -1..=1
    /// (+x right, +y toward the camera)
    pub move_dir: Vec2,
    /// Pause toggle
    pub pause: bool,
    /// Reset the level
    pub restart: bool,
    /// Idle/demo mode - autopilot drives the ball
    pub idle_mode: bool,
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32, audio: &dyn AudioService) {
    if input.restart {
        state.restart();
        audio.start_music();
        return;
    }

    // Handle pause toggle
    if input.pause {
        match state.phase {
            GamePhase::Active => {
                state.phase = GamePhase::Paused;
                state.push_event(GameEvent::Paused);
                return;
            }
            GamePhase::Paused => {
                state.phase = GamePhase::Active;
                state.push_event(GameEvent::Resumed);
            }
            _ => {}
        }
    }

    match state.phase {
        GamePhase::Paused => return,
        GamePhase::Won | GamePhase::Lost => {
            advance_menu_return(state, dt);
            return;
        }
        GamePhase::Active => {}
    }

    state.time_ticks += 1;

    let move_dir = if input.idle_mode {
        autopilot::steer(state)
    } else {
        input.move_dir
    };
    update_player(state, move_dir, dt);

    collect_pickups(state, audio);
    if state.score() == state.total() {
        audio.stop_music();
        audio.play(SoundEffect::Win);
        state.finish(true);
        return;
    }

    update_movers(state, dt);

    if state.timer.tick(dt) {
        audio.stop_music();
        audio.play(SoundEffect::Lose);
        state.finish(false);
    }
}

fn update_player(state: &mut GameState, move_dir: Vec2, dt: f32) {
    state.player.steer(move_dir, dt);
    let proposed = state.player.proposed_position(dt);

    let blocker = first_blocker(
        proposed,
        state.player.radius,
        &state.statics,
        state.mover_circles(),
    );
    match blocker {
        Some(b) => {
            log::debug!("Move to {:?} blocked by {:?}", proposed, b);
            state.player.block();
        }
        None => state.player.commit(proposed),
    }

    let node = state.player_node;
    let pos = state.player.pos;
    state.sync_node(node, pos);
}

fn collect_pickups(state: &mut GameState, audio: &dyn AudioService) {
    let player_pos = state.player.pos;
    let in_reach: Vec<usize> = state
        .collectibles
        .iter()
        .enumerate()
        .filter(|(_, c)| !c.collected && c.pos.distance(player_pos) < PICKUP_RADIUS)
        .map(|(i, _)| i)
        .collect();

    for i in in_reach {
        if state.collect(i) {
            audio.play(SoundEffect::Collect);
        }
    }
}

fn update_movers(state: &mut GameState, dt: f32) {
    for i in 0..state.movers.len() {
        let mover = &mut state.movers[i];
        if mover.patrol.advance(&mut mover.pos, dt) {
            log::debug!("Mover {} turned at waypoint {}", mover.id, mover.patrol.target);
        }
        let (node, pos) = (mover.node, mover.pos);
        state.sync_node(node, pos);
    }
}

/// Count down the fixed delay after Won/Lost; fires once
fn advance_menu_return(state: &mut GameState, dt: f32) {
    let Some(remaining) = state.menu_return else {
        return;
    };
    let remaining = remaining - dt;
    if remaining <= 0.0 {
        state.menu_return = None;
        state.push_event(GameEvent::ReturnToMenu);
    } else {
        state.menu_return = Some(remaining);
    }
}
