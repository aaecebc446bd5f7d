/// Tick handlers: the only code that advances a running game.
///
/// Three independent clocks drive the world, each handler running to
/// completion before the next fires:
///   - `player_tick`: step the player along its latched direction.
///   - `agent_tick`: advance the mode timers, then move every roaming
///     agent once, in roster order.
///   - `pen_tick`: count toward the next release from the pen.
///
/// Collisions are resolved after every individual move, so an agent that
/// steps onto the player is handled before the next agent moves.
/// Once the game is over or won every handler is a no-op.

use rand::Rng;
use tracing::{debug, info};

use crate::domain::ai;
use crate::domain::entity::{Dir, Role};
use crate::domain::target::select_target;
use super::collision::resolve_collisions;
use super::event::GameEvent;
use super::world::WorldState;

// ══════════════════════════════════════════════════════════════
// Player input
// ══════════════════════════════════════════════════════════════

/// Latch `dir` as the player's travel direction if the neighbor that way
/// can be entered. Returns false (and keeps the old direction) otherwise.
pub fn steer(world: &mut WorldState, dir: Dir) -> bool {
    if !world.is_playing() { return false; }
    if world.grid.neighbor(world.player.cell, dir).is_none() { return false; }
    world.player.dir = Some(dir);
    true
}

// ══════════════════════════════════════════════════════════════
// Tick handlers
// ══════════════════════════════════════════════════════════════

pub fn player_tick(world: &mut WorldState) -> Vec<GameEvent> {
    if !world.is_playing() { return vec![]; }
    world.player_ticks += 1;

    let mut events = Vec::new();
    let Some(dir) = world.player.dir else { return events };
    // Blocked: stand still, keep the direction latched.
    if let Some(next) = world.grid.neighbor(world.player.cell, dir) {
        world.player.cell = next;
        resolve_collisions(world, &mut events);
    }
    events
}

pub fn agent_tick(world: &mut WorldState, rng: &mut impl Rng) -> Vec<GameEvent> {
    if !world.is_playing() { return vec![]; }
    world.agent_ticks += 1;

    let mut events = Vec::new();
    if let Some(mode) = world.mode.tick() {
        info!(mode = mode.label(), tick = world.agent_ticks, "mode changed");
        events.push(GameEvent::ModeChanged { mode });
    }

    for role in Role::ALL {
        if !world.is_playing() { break; }
        if !world.agent(role).is_roaming() { continue; }
        move_agent(world, role, &mut *rng);
        resolve_collisions(world, &mut events);
    }
    events
}

pub fn pen_tick(world: &mut WorldState) -> Vec<GameEvent> {
    if !world.is_playing() { return vec![]; }
    world.pen_ticks += 1;

    let mut events = Vec::new();
    world.pen_timer += 1;
    if world.pen_timer < world.rules.pen_release_ticks { return events; }
    world.pen_timer = 0;

    if let Some(role) = world.release_next() {
        info!(agent = role.name(), waiting = world.pen.len(), "agent released");
        events.push(GameEvent::AgentReleased { role });
        resolve_collisions(world, &mut events);
    }
    events
}

// ══════════════════════════════════════════════════════════════
// Agent movement
// ══════════════════════════════════════════════════════════════

fn move_agent(world: &mut WorldState, role: Role, rng: &mut impl Rng) {
    let (from, heading) = {
        let a = world.agent(role);
        (a.cell, a.heading)
    };
    let target = select_target(
        role,
        world.mode.mode(),
        world.player.cell,
        world.grid.width(),
        world.grid.height(),
        rng,
    );

    let Some(dir) = ai::find_direction(&world.grid, from, heading, target) else {
        debug!(agent = role.name(), row = from.row, col = from.col, "agent boxed in");
        return;
    };
    let Some(next) = world.grid.neighbor(from, dir) else { return };

    world.relocate_agent(role, next);
    world.agent_mut(role).heading = Some(dir);
}
