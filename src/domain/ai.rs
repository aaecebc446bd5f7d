/// Agent AI: constrained BFS over the maze.
///
/// This is not a shortest-path search. It is a one-step lookahead followed
/// by a flood fill:
///   1. Seed the queue with the origin's open neighbors in `Dir::SEARCH_ORDER`,
///      skipping the reverse of the agent's heading. Each seed is tagged with
///      the direction that reached it.
///   2. Flood the whole reachable area. Every newly reached cell inherits
///      the tag of the cell it was reached from, so a tag always names one of
///      the first-level directions.
///   3. While dequeuing, remember the cell closest to the target. Only a
///      strictly smaller distance replaces it, so the first cell dequeued at
///      the minimum wins ties.
///
/// The answer is the tag of that closest cell. The search never stops early.
///
/// The origin is not pre-tagged: it can be reached again through a neighbor
/// and then carries that neighbor's tag.

use std::collections::VecDeque;

use super::entity::{Cell, Dir, Target};
use super::grid::Grid;

/// Direction of the next step from `from` toward `target`.
///
/// `heading` is the direction the agent last moved; its opposite is
/// forbidden. When every other direction is blocked the reversal is taken
/// instead. `None` only when the agent is walled in on all four sides.
pub fn find_direction(grid: &Grid, from: Cell, heading: Option<Dir>, target: Target) -> Option<Dir> {
    let forbidden = heading.map(Dir::opposite);

    let mut tags: Vec<Vec<Option<Dir>>> = vec![vec![None; grid.width()]; grid.height()];
    let mut queue: VecDeque<Cell> = VecDeque::with_capacity(grid.width() * grid.height());

    for dir in Dir::SEARCH_ORDER {
        if Some(dir) == forbidden { continue; }
        if let Some(next) = grid.neighbor(from, dir) {
            if tags[next.row][next.col].is_none() {
                tags[next.row][next.col] = Some(dir);
                queue.push_back(next);
            }
        }
    }

    if queue.is_empty() {
        return reversal_fallback(grid, from, forbidden);
    }

    let mut closest: Option<(Cell, i64)> = None;

    while let Some(cell) = queue.pop_front() {
        let dist = target.dist_sq(cell);
        if closest.map_or(true, |(_, best)| dist < best) {
            closest = Some((cell, dist));
        }

        let tag = tags[cell.row][cell.col];
        for dir in Dir::SEARCH_ORDER {
            if let Some(next) = grid.neighbor(cell, dir) {
                if tags[next.row][next.col].is_none() {
                    tags[next.row][next.col] = tag;
                    queue.push_back(next);
                }
            }
        }
    }

    closest.and_then(|(cell, _)| tags[cell.row][cell.col])
}

/// Boxed in under the no-reversal rule: turn around if that cell is open.
fn reversal_fallback(grid: &Grid, from: Cell, forbidden: Option<Dir>) -> Option<Dir> {
    let back = forbidden?;
    grid.neighbor(from, back).map(|_| back)
}
