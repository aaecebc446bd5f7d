/// WorldState: the complete state of a running game.
///
/// Everything the tick handlers mutate lives here and is passed around as
/// `&mut WorldState`; there is no ambient global state.
///
/// ## Occupancy
///
/// Agents are recorded twice: in `agents` (their own cell) and in the
/// grid's occupant list for that cell. All agent moves go through
/// `relocate_agent()` so the two never disagree. The player is not an
/// occupant; collisions look up `player.cell` in the grid.
///
/// ## Pen
///
/// `pen` is the FIFO of held agents. `pen_timer` counts pen ticks since the
/// last release (or reset).

use std::collections::VecDeque;

use crate::config::RulesConfig;
use crate::domain::entity::{Agent, Cell, Occupant, Placement, Player, Role};
use crate::domain::grid::Grid;
use crate::domain::mode::ModeController;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Phase {
    Playing,
    GameOver,
    GameWon,
}

/// Fixed positions derived from the layout.
#[derive(Clone, Copy, Debug)]
pub struct Spawns {
    pub player: Cell,
    /// Where captured agents are held.
    pub pen: Cell,
    /// Where released agents enter the maze.
    pub release: Cell,
    /// Start cell per role, indexed by `Role::index()`.
    pub agents: [Cell; 4],
}

impl Spawns {
    /// Roles that start held, in release order.
    pub const PENNED: [Role; 3] = [Role::B, Role::C, Role::D];

    pub fn agent(&self, role: Role) -> Cell {
        self.agents[role.index()]
    }

    pub fn placement(role: Role) -> Placement {
        if Spawns::PENNED.contains(&role) { Placement::InPen } else { Placement::Roaming }
    }
}

pub struct WorldState {
    pub grid: Grid,
    pub spawns: Spawns,

    // ── Entities ──
    pub player: Player,
    /// One per role, in `Role::ALL` order.
    pub agents: Vec<Agent>,
    pub pen: VecDeque<Role>,
    pub pen_timer: u32,

    // ── Global mode ──
    pub mode: ModeController,

    // ── Game tracking ──
    pub phase: Phase,
    pub score: u32,
    pub lives: u32,
    pub pickups_remaining: usize,
    pub rules: RulesConfig,

    // ── Tick counters (diagnostics) ──
    pub player_ticks: u64,
    pub agent_ticks: u64,
    pub pen_ticks: u64,
}

impl WorldState {
    /// Fresh game on `grid`. The grid must already hold its pickups; agents
    /// are placed here.
    pub fn new(mut grid: Grid, spawns: Spawns, rules: RulesConfig) -> Self {
        let agents: Vec<Agent> = Role::ALL
            .iter()
            .map(|&role| Agent::new(role, spawns.agent(role), Spawns::placement(role)))
            .collect();
        for a in &agents {
            grid.add_occupant(a.cell, Occupant::Agent(a.role));
        }
        let pickups_remaining = grid.pickup_count();

        WorldState {
            grid,
            spawns,
            player: Player::new(spawns.player),
            agents,
            pen: Spawns::PENNED.iter().copied().collect(),
            pen_timer: 0,
            mode: ModeController::new(&rules),
            phase: Phase::Playing,
            score: 0,
            lives: rules.lives,
            pickups_remaining,
            rules,
            player_ticks: 0,
            agent_ticks: 0,
            pen_ticks: 0,
        }
    }

    #[inline]
    pub fn is_playing(&self) -> bool {
        self.phase == Phase::Playing
    }

    pub fn agent(&self, role: Role) -> &Agent {
        &self.agents[role.index()]
    }

    pub fn agent_mut(&mut self, role: Role) -> &mut Agent {
        &mut self.agents[role.index()]
    }
}

// ── Agent placement (keeps grid occupancy in sync) ──

impl WorldState {
    /// Move an agent's occupant entry from its current cell to `to`.
    pub fn relocate_agent(&mut self, role: Role, to: Cell) {
        let from = self.agents[role.index()].cell;
        self.grid.remove_occupant(from, Occupant::Agent(role));
        self.grid.add_occupant(to, Occupant::Agent(role));
        self.agents[role.index()].cell = to;
    }

    /// Send an agent to the pen cell and queue it for release.
    pub fn pen_agent(&mut self, role: Role) {
        let pen = self.spawns.pen;
        self.relocate_agent(role, pen);
        self.agents[role.index()].placement = Placement::InPen;
        if !self.pen.contains(&role) {
            self.pen.push_back(role);
        }
        self.pen_timer = 0;
    }

    /// Put the front of the pen queue into the maze at the release cell.
    pub fn release_next(&mut self) -> Option<Role> {
        let role = self.pen.pop_front()?;
        let release = self.spawns.release;
        self.relocate_agent(role, release);
        let agent = self.agent_mut(role);
        agent.placement = Placement::Roaming;
        agent.heading = Some(Agent::SPAWN_HEADING);
        Some(role)
    }

    /// Player and all agents back to their start cells; pen rebuilt in its
    /// initial order with a fresh timer; player stationary.
    pub fn reset_positions(&mut self) {
        for role in Role::ALL {
            let start = self.spawns.agent(role);
            self.relocate_agent(role, start);
            self.agents[role.index()] = Agent::new(role, start, Spawns::placement(role));
        }
        self.pen = Spawns::PENNED.iter().copied().collect();
        self.pen_timer = 0;
        self.player = Player::new(self.spawns.player);
    }
}
