/// Entities: Player, Agent, Pickup, plus the coordinate and direction types
/// every other module speaks in.
///
/// The player is tracked outside the grid's occupant lists (it has its own
/// coordinate). Agents and pickups live in occupant lists and are identified
/// there by value (`Occupant`).

/// Movement direction.
///
/// `SEARCH_ORDER` is the fixed priority used by agent pathfinding and must
/// not be reordered: it decides ties.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum Dir {
    Up,
    Down,
    Left,
    Right,
}

impl Dir {
    pub const SEARCH_ORDER: [Dir; 4] = [Dir::Down, Dir::Up, Dir::Right, Dir::Left];

    pub fn opposite(self) -> Dir {
        match self {
            Dir::Up => Dir::Down,
            Dir::Down => Dir::Up,
            Dir::Left => Dir::Right,
            Dir::Right => Dir::Left,
        }
    }

    /// (row delta, column delta)
    pub fn delta(self) -> (i32, i32) {
        match self {
            Dir::Up => (-1, 0),
            Dir::Down => (1, 0),
            Dir::Left => (0, -1),
            Dir::Right => (0, 1),
        }
    }
}

/// A grid coordinate. Always in bounds once handed out by the grid.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
}

impl Cell {
    pub const fn new(row: usize, col: usize) -> Self {
        Cell { row, col }
    }

    /// Signed offset from this cell; the result may lie off the board.
    pub fn offset(self, drow: i32, dcol: i32) -> Target {
        Target {
            row: self.row as i32 + drow,
            col: self.col as i32 + dcol,
        }
    }
}

/// A pathfinding goal. Unlike `Cell` it may point outside the grid
/// (player offsets near the border do), it is only ever measured against.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Target {
    pub row: i32,
    pub col: i32,
}

impl Target {
    /// Squared Euclidean distance. Orders cells exactly like the true
    /// distance, without floats.
    pub fn dist_sq(self, cell: Cell) -> i64 {
        let dr = (cell.row as i64) - (self.row as i64);
        let dc = (cell.col as i64) - (self.col as i64);
        dr * dr + dc * dc
    }
}

impl From<Cell> for Target {
    fn from(c: Cell) -> Self {
        c.offset(0, 0)
    }
}

// ── Pickups ──

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum PickupKind {
    Dot,
    Energizer,
}

// ── Agents ──

/// The four agent roles. Behavior differences are table lookups keyed on
/// the role (see `domain::target`), never separate types.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum Role {
    A,
    B,
    C,
    D,
}

impl Role {
    /// Roster order. Agents move in this order every tick.
    pub const ALL: [Role; 4] = [Role::A, Role::B, Role::C, Role::D];

    pub fn index(self) -> usize {
        match self {
            Role::A => 0,
            Role::B => 1,
            Role::C => 2,
            Role::D => 3,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Role::A => "red",
            Role::B => "pink",
            Role::C => "cyan",
            Role::D => "orange",
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Placement {
    Roaming,
    InPen,
}

#[derive(Clone, Debug)]
pub struct Agent {
    pub role: Role,
    pub cell: Cell,
    /// Last direction moved. Its opposite is forbidden on the next search.
    pub heading: Option<Dir>,
    pub placement: Placement,
}

impl Agent {
    /// Heading given on spawn and on release, so the first search forbids Up.
    pub const SPAWN_HEADING: Dir = Dir::Down;

    pub fn new(role: Role, cell: Cell, placement: Placement) -> Self {
        Agent {
            role,
            cell,
            heading: Some(Agent::SPAWN_HEADING),
            placement,
        }
    }

    pub fn is_roaming(&self) -> bool {
        self.placement == Placement::Roaming
    }
}

/// Anything that can sit in a cell's occupant list.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Occupant {
    Pickup(PickupKind),
    Agent(Role),
}

// ── Player ──

#[derive(Clone, Debug)]
pub struct Player {
    pub cell: Cell,
    /// Latched travel direction. `None` = stationary until the next intent.
    pub dir: Option<Dir>,
}

impl Player {
    pub fn new(cell: Cell) -> Self {
        Player { cell, dir: None }
    }
}
