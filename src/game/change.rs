use crate::core::{Move, Piece};
use crate::game::GameStatus;
use crate::position::Position;

/// What triggered a change notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    MoveApplied,
    MoveUndone,
    PositionSet,
    ReserveChanged,
    DrawClaimed,
}

/// Snapshot handed to listeners after every accepted mutation. It owns its
/// position, so listeners never see engine state change under them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameChange {
    pub kind: ChangeKind,
    pub position: Position,
    pub status: GameStatus,
    /// The move applied or undone, with its SAN from before it was played
    pub last_move: Option<(Move, String)>,
    /// Bughouse: the captured piece that goes to the partner board
    pub passed_to_partner: Option<Piece>,
}
