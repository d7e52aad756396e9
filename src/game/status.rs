use serde::{Deserialize, Serialize};

use crate::core::Colour;

/// Where a game stands. Every state except `InProgress` is terminal.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum GameStatus {
    #[default]
    InProgress,
    Checkmate { winner: Colour },
    Stalemate,
    DrawByRepetition,
    DrawByFiftyMove,
    DrawByInsufficientMaterial,
    /// Atomic: a king was caught in an explosion
    KingExploded { winner: Colour },
    /// Suicide, giveaway and losers: `winner` ran out of material first
    AllPiecesCaptured { winner: Colour },
    /// Suicide: stalemate decided on piece count
    FewerPieces { winner: Colour },
    /// Giveaway and losers: the stalemated side wins
    StalemateWin { winner: Colour },
}

impl GameStatus {
    #[inline]
    pub fn is_terminal(self) -> bool {
        self != GameStatus::InProgress
    }

    pub fn winner(self) -> Option<Colour> {
        match self {
            GameStatus::Checkmate { winner }
            | GameStatus::KingExploded { winner }
            | GameStatus::AllPiecesCaptured { winner }
            | GameStatus::FewerPieces { winner }
            | GameStatus::StalemateWin { winner } => Some(winner),
            _ => None,
        }
    }

    #[inline]
    pub fn is_draw(self) -> bool {
        self.is_terminal() && self.winner().is_none()
    }

    /// PGN result token
    pub fn result(self) -> &'static str {
        match self.winner() {
            Some(Colour::White) => "1-0",
            Some(Colour::Black) => "0-1",
            None if self.is_draw() => "1/2-1/2",
            None => "*",
        }
    }
}

impl std::fmt::Display for GameStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameStatus::InProgress => write!(f, "in progress"),
            GameStatus::Checkmate { winner } => write!(f, "checkmate, {winner} wins"),
            GameStatus::Stalemate => write!(f, "stalemate"),
            GameStatus::DrawByRepetition => write!(f, "draw by threefold repetition"),
            GameStatus::DrawByFiftyMove => write!(f, "draw by the fifty-move rule"),
            GameStatus::DrawByInsufficientMaterial => write!(f, "draw by insufficient material"),
            GameStatus::KingExploded { winner } => write!(f, "king exploded, {winner} wins"),
            GameStatus::AllPiecesCaptured { winner } => write!(f, "{winner} lost all pieces and wins"),
            GameStatus::FewerPieces { winner } => write!(f, "stalemate, {winner} wins on piece count"),
            GameStatus::StalemateWin { winner } => write!(f, "stalemate, {winner} wins"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_results() {
        assert_eq!(GameStatus::InProgress.result(), "*");
        assert_eq!(GameStatus::Checkmate { winner: Colour::White }.result(), "1-0");
        assert_eq!(GameStatus::StalemateWin { winner: Colour::Black }.result(), "0-1");
        assert_eq!(GameStatus::DrawByFiftyMove.result(), "1/2-1/2");
        assert!(GameStatus::Stalemate.is_draw());
        assert!(!GameStatus::InProgress.is_terminal());
    }

    #[test]
    fn test_serde_shape() {
        let json = serde_json::to_string(&GameStatus::KingExploded { winner: Colour::Black }).unwrap();
        let back: GameStatus = serde_json::from_str(&json).unwrap();
        assert_eq!(back, GameStatus::KingExploded { winner: Colour::Black });
        assert_eq!(serde_json::to_string(&GameStatus::Stalemate).unwrap(), r#"{"state":"stalemate"}"#);
    }
}
