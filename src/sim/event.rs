/// Events emitted during a tick.
/// The presentation layer consumes these for the HUD and status line.

use crate::domain::entity::{Cell, PickupKind, Role};
use crate::domain::mode::Mode;

#[derive(Clone, Debug, PartialEq)]
pub enum GameEvent {
    PointsScored { points: u32 },
    PickupConsumed { cell: Cell, kind: PickupKind },
    ModeChanged { mode: Mode },
    AgentCaptured { role: Role },
    AgentReleased { role: Role },
    LifeLost { lives_left: u32 },
    GameOver,
    GameWon,
}
