/// Grid: the static wall layer plus per-cell occupant lists.
///
/// ## Layers
///   - `walls`: set once at construction. **Never mutated** afterwards.
///   - `occupants`: ordered per-cell lists of pickups and agents.
///
/// Walls never hold occupants; `add_occupant` refuses them.
///
/// ## Tunnels
///
/// A tunnel joins column 0 and column `width-1` of one row. Stepping off the
/// board from either endpoint lands on the other. The lookup is a table of
/// endpoint pairs, so any number of tunnel rows work.

use super::entity::{Cell, Dir, Occupant, PickupKind};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Tunnel {
    pub west: Cell,
    pub east: Cell,
}

#[derive(Clone, Debug)]
pub struct Grid {
    width: usize,
    height: usize,
    walls: Vec<Vec<bool>>,
    occupants: Vec<Vec<Vec<Occupant>>>,
    tunnels: Vec<Tunnel>,
}

impl Grid {
    /// Build from a wall mask (`walls[row][col]`). Rows must be equal length;
    /// the layout parser guarantees it.
    pub fn new(walls: Vec<Vec<bool>>) -> Self {
        let height = walls.len();
        let width = walls.first().map_or(0, |r| r.len());
        let occupants = vec![vec![Vec::new(); width]; height];
        let mut grid = Grid { width, height, walls, occupants, tunnels: vec![] };
        grid.tunnels = grid.detect_tunnels();
        grid
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn tunnels(&self) -> &[Tunnel] {
        &self.tunnels
    }

    pub fn in_bounds(&self, row: i32, col: i32) -> bool {
        row >= 0 && col >= 0 && (row as usize) < self.height && (col as usize) < self.width
    }

    /// Out of bounds reads as wall.
    #[inline]
    pub fn is_wall(&self, cell: Cell) -> bool {
        if cell.row < self.height && cell.col < self.width {
            self.walls[cell.row][cell.col]
        } else {
            true
        }
    }

    // ── Topology ──

    /// The cell one step from `cell` in `dir`, or `None` if that step is
    /// blocked. Leaving the board through a tunnel endpoint wraps to the
    /// opposite endpoint; leaving it anywhere else is blocked.
    pub fn neighbor(&self, cell: Cell, dir: Dir) -> Option<Cell> {
        let (dr, dc) = dir.delta();
        let r = cell.row as i32 + dr;
        let c = cell.col as i32 + dc;
        let next = if self.in_bounds(r, c) {
            Cell::new(r as usize, c as usize)
        } else {
            self.wrap(cell, dir)?
        };
        if self.is_wall(next) { None } else { Some(next) }
    }

    /// Tunnel destination for a move that exits the board at `cell`.
    fn wrap(&self, cell: Cell, dir: Dir) -> Option<Cell> {
        self.tunnels.iter().find_map(|t| match dir {
            Dir::Left if t.west == cell => Some(t.east),
            Dir::Right if t.east == cell => Some(t.west),
            _ => None,
        })
    }

    /// A row whose first and last cells are both open is a tunnel row.
    fn detect_tunnels(&self) -> Vec<Tunnel> {
        if self.width < 2 {
            return vec![];
        }
        (0..self.height)
            .filter(|&row| !self.walls[row][0] && !self.walls[row][self.width - 1])
            .map(|row| Tunnel {
                west: Cell::new(row, 0),
                east: Cell::new(row, self.width - 1),
            })
            .collect()
    }

    // ── Occupants ──

    pub fn occupants_at(&self, cell: Cell) -> &[Occupant] {
        if self.is_wall(cell) {
            return &[];
        }
        &self.occupants[cell.row][cell.col]
    }

    /// Append to the cell's list. Returns false (and does nothing) for walls
    /// and out-of-bounds cells.
    pub fn add_occupant(&mut self, cell: Cell, item: Occupant) -> bool {
        if self.is_wall(cell) {
            return false;
        }
        self.occupants[cell.row][cell.col].push(item);
        true
    }

    /// Remove the first matching occupant. Returns whether one was removed.
    pub fn remove_occupant(&mut self, cell: Cell, item: Occupant) -> bool {
        if self.is_wall(cell) {
            return false;
        }
        let list = &mut self.occupants[cell.row][cell.col];
        match list.iter().position(|o| *o == item) {
            Some(i) => {
                list.remove(i);
                true
            }
            None => false,
        }
    }

    /// Remove every pickup from the cell, returning them in list order.
    /// Agents in the same cell are left in place.
    pub fn take_pickups(&mut self, cell: Cell) -> Vec<PickupKind> {
        if self.is_wall(cell) {
            return vec![];
        }
        let list = &mut self.occupants[cell.row][cell.col];
        let mut taken = Vec::new();
        list.retain(|o| match o {
            Occupant::Pickup(kind) => {
                taken.push(*kind);
                false
            }
            Occupant::Agent(_) => true,
        });
        taken
    }

    /// Count of pickups still on the board.
    pub fn pickup_count(&self) -> usize {
        self.occupants
            .iter()
            .flatten()
            .flatten()
            .filter(|o| matches!(o, Occupant::Pickup(_)))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entity::Role;

    fn grid_from(rows: &[&str]) -> Grid {
        Grid::new(
            rows.iter()
                .map(|r| r.chars().map(|c| c == '#').collect())
                .collect(),
        )
    }

    #[test]
    fn out_of_bounds_is_wall() {
        let g = grid_from(&["   "]);
        assert!(g.is_wall(Cell::new(5, 5)));
        assert!(!g.is_wall(Cell::new(0, 1)));
    }

    #[test]
    fn neighbor_blocked_by_wall_and_edge() {
        let g = grid_from(&[
            "###",
            "# #",
            "###",
        ]);
        for d in Dir::SEARCH_ORDER {
            assert_eq!(g.neighbor(Cell::new(1, 1), d), None);
        }
        assert!(g.tunnels().is_empty());
    }

    #[test]
    fn tunnel_wraps_both_ways() {
        let g = grid_from(&[
            "#####",
            "     ",
            "#####",
        ]);
        assert_eq!(g.tunnels().len(), 1);
        assert_eq!(g.neighbor(Cell::new(1, 0), Dir::Left), Some(Cell::new(1, 4)));
        assert_eq!(g.neighbor(Cell::new(1, 4), Dir::Right), Some(Cell::new(1, 0)));
        // Interior moves are ordinary steps
        assert_eq!(g.neighbor(Cell::new(1, 2), Dir::Left), Some(Cell::new(1, 1)));
    }

    #[test]
    fn edge_cell_off_tunnel_row_does_not_wrap() {
        let g = grid_from(&[
            " ###",
            "    ",
            "####",
        ]);
        // Row 0 is open at col 0 but walled at col 3: no tunnel there.
        assert_eq!(g.tunnels().len(), 1);
        assert_eq!(g.neighbor(Cell::new(0, 0), Dir::Left), None);
        assert_eq!(g.neighbor(Cell::new(0, 0), Dir::Up), None);
    }

    #[test]
    fn multiple_tunnel_rows_wrap_to_their_own_row() {
        let g = grid_from(&[
            "    ",
            "####",
            "    ",
        ]);
        assert_eq!(g.neighbor(Cell::new(0, 0), Dir::Left), Some(Cell::new(0, 3)));
        assert_eq!(g.neighbor(Cell::new(2, 3), Dir::Right), Some(Cell::new(2, 0)));
    }

    #[test]
    fn walls_never_hold_occupants() {
        let mut g = grid_from(&["# "]);
        assert!(!g.add_occupant(Cell::new(0, 0), Occupant::Pickup(PickupKind::Dot)));
        assert!(g.occupants_at(Cell::new(0, 0)).is_empty());
        assert!(g.add_occupant(Cell::new(0, 1), Occupant::Pickup(PickupKind::Dot)));
        assert_eq!(g.pickup_count(), 1);
    }

    #[test]
    fn occupant_order_is_preserved() {
        let mut g = grid_from(&[" "]);
        let c = Cell::new(0, 0);
        g.add_occupant(c, Occupant::Agent(Role::B));
        g.add_occupant(c, Occupant::Pickup(PickupKind::Energizer));
        g.add_occupant(c, Occupant::Agent(Role::A));
        assert!(g.remove_occupant(c, Occupant::Agent(Role::B)));
        assert!(!g.remove_occupant(c, Occupant::Agent(Role::B)));
        assert_eq!(
            g.occupants_at(c),
            &[Occupant::Pickup(PickupKind::Energizer), Occupant::Agent(Role::A)]
        );
    }

    #[test]
    fn take_pickups_leaves_agents() {
        let mut g = grid_from(&[" "]);
        let c = Cell::new(0, 0);
        g.add_occupant(c, Occupant::Pickup(PickupKind::Dot));
        g.add_occupant(c, Occupant::Agent(Role::C));
        g.add_occupant(c, Occupant::Pickup(PickupKind::Energizer));
        assert_eq!(g.take_pickups(c), vec![PickupKind::Dot, PickupKind::Energizer]);
        assert_eq!(g.occupants_at(c), &[Occupant::Agent(Role::C)]);
        assert!(g.take_pickups(c).is_empty());
    }
}
