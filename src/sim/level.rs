/// Level loader: turns a static text layout into a ready-to-play world.
///
/// ## Tile legend:
///   '#' = Wall                   ' ' = Free
///   '.' = Dot                    'o' = Energizer
///   'P' = Player start           'G' = Agent start (pen cell)
///
/// ## Derived positions:
///   - Pen slots are the cells directly left and right of `G`.
///   - The release cell is two rows above `G` (outside the pen wall).
///   - Role A starts roaming on the release cell; B, C, D start in the pen
///     (left slot, `G`, right slot) and are released in that order.
///
/// Any row whose first and last cells are open becomes a tunnel.

use thiserror::Error;
use tracing::info;

use crate::config::RulesConfig;
use crate::domain::entity::{Cell, Occupant};
use crate::domain::grid::Grid;
use crate::domain::tile::Tile;
use crate::sim::world::{Spawns, WorldState};

/// Built-in 23×23 maze. Tunnel on row 11, player start (17,11), pen
/// (10,11), release (8,11).
pub const DEFAULT_MAZE: [&str; 23] = [
    "#######################",
    "#o.........#.........o#",
    "#.###.####.#.####.###.#",
    "#.###.####.#.####.###.#",
    "#.....................#",
    "#.###.#.#######.#.###.#",
    "#.....#....#....#.....#",
    "#####.####.#.####.#####",
    "#####.#         #.#####",
    "#####.# ####### #.#####",
    "#####.# #  G  # #.#####",
    "     .  #######  .     ",
    "#####.#         #.#####",
    "#####.#.#######.#.#####",
    "#..........#..........#",
    "#.###.####.#.####.###.#",
    "#o..#.............#..o#",
    "#..........P..........#",
    "#.###.#.#######.#.###.#",
    "#.....#.........#.....#",
    "#.#######.###.#######.#",
    "#o...................o#",
    "#######################",
];

#[derive(Debug, Error, PartialEq)]
pub enum LayoutError {
    #[error("layout is empty")]
    Empty,
    #[error("row {row} is {found} cells wide, expected {expected}")]
    RaggedRow { row: usize, found: usize, expected: usize },
    #[error("unknown tile {ch:?} at row {row}, column {col}")]
    UnknownTile { ch: char, row: usize, col: usize },
    #[error("layout has no player start 'P'")]
    MissingPlayer,
    #[error("layout has more than one player start 'P'")]
    DuplicatePlayer,
    #[error("layout has no agent start 'G'")]
    MissingAgentStart,
    #[error("layout has more than one agent start 'G'")]
    DuplicateAgentStart,
    #[error("{what} next to the agent start is a wall or off the board")]
    BlockedPen { what: &'static str },
}

/// A parsed, validated layout.
#[derive(Clone, Debug)]
pub struct Layout {
    pub tiles: Vec<Vec<Tile>>,
    pub player: Cell,
    pub pen: Cell,
}

impl Layout {
    pub fn width(&self) -> usize {
        self.tiles.first().map_or(0, |r| r.len())
    }

    pub fn height(&self) -> usize {
        self.tiles.len()
    }

    fn is_open(&self, row: i64, col: i64) -> bool {
        row >= 0
            && col >= 0
            && (row as usize) < self.height()
            && (col as usize) < self.width()
            && !self.tiles[row as usize][col as usize].is_wall()
    }

    pub fn spawns(&self) -> Spawns {
        let pen = self.pen;
        let release = Cell::new(pen.row - 2, pen.col);
        Spawns {
            player: self.player,
            pen,
            release,
            agents: [
                release,
                Cell::new(pen.row, pen.col - 1),
                pen,
                Cell::new(pen.row, pen.col + 1),
            ],
        }
    }
}

// ══════════════════════════════════════════════════════════════
// Public API
// ══════════════════════════════════════════════════════════════

pub fn parse_layout<S: AsRef<str>>(rows: &[S]) -> Result<Layout, LayoutError> {
    let first = rows.first().ok_or(LayoutError::Empty)?;
    let width = first.as_ref().chars().count();
    if width == 0 {
        return Err(LayoutError::Empty);
    }

    let mut tiles = Vec::with_capacity(rows.len());
    let mut player = None;
    let mut pen = None;

    for (row, line) in rows.iter().enumerate() {
        let line = line.as_ref();
        let found = line.chars().count();
        if found != width {
            return Err(LayoutError::RaggedRow { row, found, expected: width });
        }
        let mut tile_row = Vec::with_capacity(width);
        for (col, ch) in line.chars().enumerate() {
            let tile = Tile::from_char(ch).ok_or(LayoutError::UnknownTile { ch, row, col })?;
            match tile {
                Tile::PlayerStart => {
                    if player.replace(Cell::new(row, col)).is_some() {
                        return Err(LayoutError::DuplicatePlayer);
                    }
                }
                Tile::AgentStart => {
                    if pen.replace(Cell::new(row, col)).is_some() {
                        return Err(LayoutError::DuplicateAgentStart);
                    }
                }
                _ => {}
            }
            tile_row.push(tile);
        }
        tiles.push(tile_row);
    }

    let layout = Layout {
        tiles,
        player: player.ok_or(LayoutError::MissingPlayer)?,
        pen: pen.ok_or(LayoutError::MissingAgentStart)?,
    };

    let (r, c) = (layout.pen.row as i64, layout.pen.col as i64);
    if !layout.is_open(r, c - 1) {
        return Err(LayoutError::BlockedPen { what: "left pen slot" });
    }
    if !layout.is_open(r, c + 1) {
        return Err(LayoutError::BlockedPen { what: "right pen slot" });
    }
    if !layout.is_open(r - 2, c) {
        return Err(LayoutError::BlockedPen { what: "release cell" });
    }

    Ok(layout)
}

/// Build a fresh world from a text layout.
pub fn load_level<S: AsRef<str>>(rows: &[S], rules: &RulesConfig) -> Result<WorldState, LayoutError> {
    let layout = parse_layout(rows)?;

    let walls = layout
        .tiles
        .iter()
        .map(|row| row.iter().map(|t| t.is_wall()).collect())
        .collect();
    let mut grid = Grid::new(walls);

    for (row, tiles) in layout.tiles.iter().enumerate() {
        for (col, tile) in tiles.iter().enumerate() {
            if let Some(kind) = tile.pickup() {
                grid.add_occupant(Cell::new(row, col), Occupant::Pickup(kind));
            }
        }
    }

    let world = WorldState::new(grid, layout.spawns(), rules.clone());
    info!(
        width = world.grid.width(),
        height = world.grid.height(),
        pickups = world.pickups_remaining,
        tunnels = world.grid.tunnels().len(),
        "level loaded"
    );
    Ok(world)
}

pub fn load_default(rules: &RulesConfig) -> Result<WorldState, LayoutError> {
    load_level(&DEFAULT_MAZE, rules)
}
