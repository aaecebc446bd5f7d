/// Layout tiles: the static per-cell enumeration a maze is built from.
/// Properties are queried via methods, not stored as flags,
/// so tile semantics are centralized here.

use super::entity::PickupKind;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Tile {
    Free,
    Wall,
    Dot,
    Energizer,
    PlayerStart,
    AgentStart, // pen cell; pen slots and release cell derive from it
}

impl Tile {
    pub fn from_char(ch: char) -> Option<Tile> {
        match ch {
            ' ' => Some(Tile::Free),
            '#' => Some(Tile::Wall),
            '.' => Some(Tile::Dot),
            'o' => Some(Tile::Energizer),
            'P' => Some(Tile::PlayerStart),
            'G' => Some(Tile::AgentStart),
            _ => None,
        }
    }

    pub fn is_wall(self) -> bool {
        matches!(self, Tile::Wall)
    }

    /// The pickup this tile seeds at setup, if any.
    pub fn pickup(self) -> Option<PickupKind> {
        match self {
            Tile::Dot => Some(PickupKind::Dot),
            Tile::Energizer => Some(PickupKind::Energizer),
            _ => None,
        }
    }
}

impl Default for Tile {
    fn default() -> Self {
        Tile::Free
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legend_round_trip_for_known_chars() {
        assert_eq!(Tile::from_char('#'), Some(Tile::Wall));
        assert_eq!(Tile::from_char('o').and_then(Tile::pickup), Some(PickupKind::Energizer));
        assert_eq!(Tile::from_char('.').and_then(Tile::pickup), Some(PickupKind::Dot));
        assert_eq!(Tile::from_char('x'), None);
    }

    #[test]
    fn only_walls_are_walls() {
        assert!(Tile::Wall.is_wall());
        assert!(!Tile::AgentStart.is_wall());
        assert!(!Tile::PlayerStart.is_wall());
    }
}
