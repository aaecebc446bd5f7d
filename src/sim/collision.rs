/// Collision resolution for the player's cell.
///
/// Runs after every individual move: each player step, each agent step and
/// each pen release. Order inside one pass:
///   1. Pickups in the cell, in list order.
///   2. Agents in the cell, judged by the mode at that moment.
///   3. Terminal checks (lives, then remaining pickups).
///
/// A second pass over an unchanged world finds nothing to do.

use tracing::{debug, info};

use crate::domain::entity::{Cell, Occupant, PickupKind, Role};
use crate::domain::mode::Mode;
use super::event::GameEvent;
use super::world::{Phase, WorldState};

pub fn resolve_collisions(world: &mut WorldState, events: &mut Vec<GameEvent>) {
    if !world.is_playing() { return; }

    let cell = world.player.cell;
    consume_pickups(world, cell, events);
    resolve_agent_contact(world, cell, events);
    check_outcome(world, events);
}

// ── Pickups ──

fn consume_pickups(world: &mut WorldState, cell: Cell, events: &mut Vec<GameEvent>) {
    for kind in world.grid.take_pickups(cell) {
        let points = match kind {
            PickupKind::Dot => world.rules.dot_points,
            PickupKind::Energizer => world.rules.energizer_points,
        };
        world.score += points;
        world.pickups_remaining = world.pickups_remaining.saturating_sub(1);
        events.push(GameEvent::PickupConsumed { cell, kind });
        events.push(GameEvent::PointsScored { points });

        if kind == PickupKind::Energizer {
            if world.mode.frighten() {
                info!("energizer consumed, agents vulnerable");
                events.push(GameEvent::ModeChanged { mode: Mode::Vulnerable });
            } else {
                debug!("energizer consumed, vulnerable timer restarted");
            }
        }
    }
}

// ── Agents ──

fn resolve_agent_contact(world: &mut WorldState, cell: Cell, events: &mut Vec<GameEvent>) {
    let roles: Vec<Role> = world
        .grid
        .occupants_at(cell)
        .iter()
        .filter_map(|o| match o {
            Occupant::Agent(role) => Some(*role),
            Occupant::Pickup(_) => None,
        })
        .collect();

    for role in roles {
        if world.mode.is_vulnerable() {
            capture_agent(world, role, events);
        } else {
            // Positions are reset; whatever else shared the cell has moved.
            lose_life(world, role, events);
            break;
        }
    }
}

fn capture_agent(world: &mut WorldState, role: Role, events: &mut Vec<GameEvent>) {
    world.pen_agent(role);
    let points = world.rules.capture_bonus;
    world.score += points;
    info!(agent = role.name(), score = world.score, "agent captured");
    events.push(GameEvent::AgentCaptured { role });
    events.push(GameEvent::PointsScored { points });
}

fn lose_life(world: &mut WorldState, by: Role, events: &mut Vec<GameEvent>) {
    world.lives = world.lives.saturating_sub(1);
    info!(agent = by.name(), lives = world.lives, "player caught");
    events.push(GameEvent::LifeLost { lives_left: world.lives });
    world.reset_positions();
}

// ── Terminal checks ──

fn check_outcome(world: &mut WorldState, events: &mut Vec<GameEvent>) {
    if world.lives == 0 {
        world.phase = Phase::GameOver;
        info!(score = world.score, "game over");
        events.push(GameEvent::GameOver);
    } else if world.pickups_remaining == 0 {
        world.phase = Phase::GameWon;
        info!(score = world.score, "maze cleared");
        events.push(GameEvent::GameWon);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RulesConfig;
    use crate::domain::entity::{Dir, Placement};
    use crate::sim::level::load_level;

    /// Player at (1,3), agent A on the release cell (1,4), one dot at (1,5).
    const CORRIDOR: [&str; 5] = [
        "#######",
        "#  P .#",
        "#######",
        "### G #",
        "#######",
    ];

    /// Dot (1,2), energizer (1,3), dot (1,4). A at (1,5).
    const PICKUPS: [&str; 5] = [
        "########",
        "#P.o. ##",
        "########",
        "#### G #",
        "########",
    ];

    fn world_from(rows: &[&str]) -> WorldState {
        load_level(rows, &RulesConfig::default()).expect("fixture layout")
    }

    fn resolve(world: &mut WorldState) -> Vec<GameEvent> {
        let mut events = Vec::new();
        resolve_collisions(world, &mut events);
        events
    }

    #[test]
    fn dot_is_consumed_exactly_once() {
        let mut w = world_from(&PICKUPS);
        assert_eq!(w.pickups_remaining, 3);
        w.player.cell = Cell::new(1, 2);

        let events = resolve(&mut w);
        assert_eq!(
            events,
            vec![
                GameEvent::PickupConsumed { cell: Cell::new(1, 2), kind: PickupKind::Dot },
                GameEvent::PointsScored { points: 10 },
            ]
        );
        assert_eq!(w.score, 10);
        assert_eq!(w.pickups_remaining, 2);

        assert!(resolve(&mut w).is_empty());
        assert_eq!(w.score, 10);
        assert_eq!(w.pickups_remaining, 2);
    }

    #[test]
    fn energizer_makes_agents_vulnerable() {
        let mut w = world_from(&PICKUPS);
        w.player.cell = Cell::new(1, 3);
        let events = resolve(&mut w);
        assert_eq!(w.score, 50);
        assert_eq!(w.mode.mode(), Mode::Vulnerable);
        assert!(events.contains(&GameEvent::ModeChanged { mode: Mode::Vulnerable }));
    }

    #[test]
    fn contact_in_pursuit_costs_a_life_and_resets() {
        let mut w = world_from(&CORRIDOR);
        w.player.dir = Some(Dir::Right);
        w.pen_timer = 5;
        // B joins A on the release cell.
        assert_eq!(w.release_next(), Some(Role::B));
        w.player.cell = Cell::new(1, 4);

        let events = resolve(&mut w);
        assert_eq!(events, vec![GameEvent::LifeLost { lives_left: 2 }]);
        assert_eq!(w.lives, 2);

        assert_eq!(w.player.cell, Cell::new(1, 3));
        assert_eq!(w.player.dir, None);
        assert_eq!(w.agent(Role::A).cell, Cell::new(1, 4));
        assert_eq!(w.agent(Role::A).placement, Placement::Roaming);
        for role in [Role::B, Role::C, Role::D] {
            assert_eq!(w.agent(role).placement, Placement::InPen);
        }
        assert_eq!(w.agent(Role::B).cell, Cell::new(3, 3));
        assert_eq!(w.pen.iter().copied().collect::<Vec<_>>(), vec![Role::B, Role::C, Role::D]);
        assert_eq!(w.pen_timer, 0);
        assert_eq!(w.mode.mode(), Mode::Pursuit);

        assert!(resolve(&mut w).is_empty());
    }

    #[test]
    fn contact_while_vulnerable_captures() {
        let mut w = world_from(&CORRIDOR);
        w.mode.frighten();
        w.pen_timer = 9;
        w.player.cell = Cell::new(1, 4);

        let events = resolve(&mut w);
        assert_eq!(
            events,
            vec![
                GameEvent::AgentCaptured { role: Role::A },
                GameEvent::PointsScored { points: 200 },
            ]
        );
        assert_eq!(w.lives, 3);
        assert_eq!(w.score, 200);
        assert_eq!(w.player.cell, Cell::new(1, 4));
        assert_eq!(w.agent(Role::A).cell, w.spawns.pen);
        assert_eq!(w.agent(Role::A).placement, Placement::InPen);
        assert_eq!(w.pen.back(), Some(&Role::A));
        assert_eq!(w.pen_timer, 0);
        assert!(w.grid.occupants_at(Cell::new(1, 4)).is_empty());
    }

    #[test]
    fn every_vulnerable_agent_in_the_cell_is_captured() {
        let mut w = world_from(&CORRIDOR);
        w.release_next();
        w.mode.frighten();
        w.player.cell = Cell::new(1, 4);

        resolve(&mut w);
        assert_eq!(w.score, 400);
        assert_eq!(
            w.pen.iter().copied().collect::<Vec<_>>(),
            vec![Role::C, Role::D, Role::A, Role::B]
        );
    }

    #[test]
    fn last_life_ends_the_game() {
        let mut w = world_from(&CORRIDOR);
        w.lives = 1;
        w.player.cell = Cell::new(1, 4);

        let events = resolve(&mut w);
        assert_eq!(events, vec![GameEvent::LifeLost { lives_left: 0 }, GameEvent::GameOver]);
        assert_eq!(w.phase, Phase::GameOver);

        w.player.cell = Cell::new(1, 5);
        assert!(resolve(&mut w).is_empty());
        assert_eq!(w.pickups_remaining, 1);
    }

    #[test]
    fn last_pickup_wins() {
        let mut w = world_from(&CORRIDOR);
        w.player.cell = Cell::new(1, 5);
        let events = resolve(&mut w);
        assert_eq!(events.last(), Some(&GameEvent::GameWon));
        assert_eq!(w.phase, Phase::GameWon);
    }
}
