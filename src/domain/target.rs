/// Target selection: where each agent aims this tick.
///
/// One table keyed by role. Pursuit aims at a fixed offset from the player,
/// Patrol at the role's own corner, Vulnerable at a corner drawn at random
/// every tick for every agent.

use rand::Rng;

use super::entity::{Cell, Role, Target};
use super::mode::Mode;

/// Pursuit offset from the player's cell, (rows, columns).
fn pursuit_offset(role: Role) -> (i32, i32) {
    match role {
        Role::A => (0, 0),
        Role::B => (0, 2),
        Role::C => (-4, 0),
        Role::D => (3, -3),
    }
}

/// The four corners of a `width` × `height` board, in role order:
/// top-left, top-right, bottom-left, bottom-right.
pub fn corners(width: usize, height: usize) -> [Cell; 4] {
    let last_row = height.saturating_sub(1);
    let last_col = width.saturating_sub(1);
    [
        Cell::new(0, 0),
        Cell::new(0, last_col),
        Cell::new(last_row, 0),
        Cell::new(last_row, last_col),
    ]
}

pub fn patrol_corner(role: Role, width: usize, height: usize) -> Cell {
    corners(width, height)[role.index()]
}

pub fn select_target(
    role: Role,
    mode: Mode,
    player: Cell,
    width: usize,
    height: usize,
    rng: &mut impl Rng,
) -> Target {
    match mode {
        Mode::Pursuit => {
            let (dr, dc) = pursuit_offset(role);
            player.offset(dr, dc)
        }
        Mode::Patrol => patrol_corner(role, width, height).into(),
        Mode::Vulnerable => corners(width, height)[rng.gen_range(0..4)].into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const W: usize = 23;
    const H: usize = 23;

    #[test]
    fn pursuit_offsets_per_role() {
        let mut rng = StdRng::seed_from_u64(1);
        let p = Cell::new(17, 11);
        let mut at = |role: Role| select_target(role, Mode::Pursuit, p, W, H, &mut rng);
        assert_eq!(at(Role::A), Target { row: 17, col: 11 });
        assert_eq!(at(Role::B), Target { row: 17, col: 13 });
        assert_eq!(at(Role::C), Target { row: 13, col: 11 });
        assert_eq!(at(Role::D), Target { row: 20, col: 8 });
    }

    #[test]
    fn pursuit_target_may_leave_the_board() {
        let mut rng = StdRng::seed_from_u64(1);
        let t = select_target(Role::C, Mode::Pursuit, Cell::new(1, 1), W, H, &mut rng);
        assert_eq!(t, Target { row: -3, col: 1 });
    }

    #[test]
    fn patrol_corners_are_distinct_per_role() {
        let mut rng = StdRng::seed_from_u64(1);
        let targets: Vec<Target> = Role::ALL
            .iter()
            .map(|&r| select_target(r, Mode::Patrol, Cell::new(5, 5), W, H, &mut rng))
            .collect();
        assert_eq!(targets[0], Target { row: 0, col: 0 });
        assert_eq!(targets[1], Target { row: 0, col: 22 });
        assert_eq!(targets[2], Target { row: 22, col: 0 });
        assert_eq!(targets[3], Target { row: 22, col: 22 });
    }

    #[test]
    fn vulnerable_targets_are_corners_and_vary() {
        let mut rng = StdRng::seed_from_u64(7);
        let all: Vec<Target> = corners(W, H).iter().map(|&c| c.into()).collect();
        let mut seen = Vec::new();
        for _ in 0..200 {
            let t = select_target(Role::A, Mode::Vulnerable, Cell::new(5, 5), W, H, &mut rng);
            assert!(all.contains(&t));
            if !seen.contains(&t) {
                seen.push(t);
            }
        }
        assert_eq!(seen.len(), 4);
    }
}
