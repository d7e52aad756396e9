//! # Module: `game`
//!
//! The game state machine: one live [`Position`], the moves that led to it and
//! the status they produced.
//!
//! ## Lifecycle
//!
//! A [`Game`] is built from a [`GameConfig`] and mutated only through
//! [`Game::apply_move`], [`Game::undo_move`] and the session hooks
//! ([`Game::set_position_from_fen`], [`Game::add_to_reserve`],
//! [`Game::claim_draw`]). Each accepted mutation re-evaluates the status and
//! notifies every listener with an owned [`GameChange`] snapshot.
//!
//! ## Terminal checks
//!
//! After every move the status is decided in a fixed order:
//!
//! 1. No legal moves: the variant decides between mate, stalemate and its own
//!    outcomes.
//! 2. Fifty-move rule.
//! 3. Threefold repetition, only when draws are claimed automatically.
//! 4. Insufficient material.
//! 5. Any remaining variant outcome, such as a bare king in losers.

mod change;
mod clock;
mod config;
mod status;

pub use change::{ChangeKind, GameChange};
pub use clock::Clock;
pub use config::{ConfigError, GameConfig};
pub use status::GameStatus;

use chrono::Utc;
use rand::Rng;
use tracing::{debug, info, warn};

use crate::core::*;
use crate::notation::{PgnHeaders, write_pgn};
use crate::position::{Key, Position, PriorState};
use crate::variant::Variant;

/// Number of Chess960 start positions
const CHESS960_POSITIONS: u16 = 960;

/// Half-moves without a capture or pawn move that end the game
const FIFTY_MOVE_PLIES: u32 = 100;

type Listener = Box<dyn FnMut(&GameChange) + Send>;

/// One applied move and what is needed to take it back
#[derive(Debug, Clone)]
struct HistoryEntry {
    mv: Move,
    san: String,
    prior: PriorState,
    status_before: GameStatus,
}

pub struct Game {
    start: Position,
    position: Position,
    history: Vec<HistoryEntry>,
    /// Position keys from the start, one per ply
    keys: Vec<Key>,
    status: GameStatus,
    clock: Clock,
    auto_claim_draws: bool,
    listeners: Vec<Listener>,
}

/******************************************\
|==========================================|
|               Construction               |
|==========================================|
\******************************************/

impl Game {
    /// Creates a game from `config`.
    ///
    /// A FischerRandom game without a start FEN uses `chess960_index`, or a
    /// random setup when none is given.
    pub fn new(config: GameConfig) -> Result<Game, ConfigError> {
        let start = match (&config.start_fen, config.variant) {
            (Some(fen), variant) => Position::from_fen(fen, variant)?,
            (None, Variant::FischerRandom) => {
                let index = config.chess960_index.unwrap_or_else(random_chess960_index);
                Position::chess960(index).ok_or(ConfigError::InvalidChess960Index(index))?
            }
            (None, variant) => Position::startpos(variant),
        };
        start.validate()?;

        let mut game = Game {
            position: start.clone(),
            keys: vec![start.key()],
            start,
            history: Vec::new(),
            status: GameStatus::InProgress,
            clock: config.initial_clock_millis.map(Clock::new).unwrap_or_default(),
            auto_claim_draws: config.auto_claim_draws,
            listeners: Vec::new(),
        };
        game.status = game.evaluate_status()?;

        debug!(variant = %config.variant, fen = %game.position.fen(), status = %game.status, "game created");
        Ok(game)
    }

    /// Registers a callback run after every accepted change
    pub fn on_change<F>(&mut self, listener: F)
    where
        F: FnMut(&GameChange) + Send + 'static,
    {
        self.listeners.push(Box::new(listener));
    }
}

fn random_chess960_index() -> u16 {
    rand::thread_rng().gen_range(0..CHESS960_POSITIONS)
}

/******************************************\
|==========================================|
|                 Queries                  |
|==========================================|
\******************************************/

impl Game {
    #[inline]
    pub fn position(&self) -> &Position {
        &self.position
    }

    /// The position the move history starts from
    #[inline]
    pub fn start_position(&self) -> &Position {
        &self.start
    }

    #[inline]
    pub fn status(&self) -> GameStatus {
        self.status
    }

    #[inline]
    pub fn variant(&self) -> Variant {
        self.position.variant()
    }

    #[inline]
    pub fn clock(&self) -> &Clock {
        &self.clock
    }

    pub fn legal_moves(&self) -> Result<Vec<Move>, GameError> {
        Ok(self.position.legal_moves()?)
    }

    /// Applied moves, oldest first
    pub fn moves(&self) -> impl Iterator<Item = Move> + '_ {
        self.history.iter().map(|entry| entry.mv)
    }

    /// SAN of every applied move, oldest first
    pub fn san_moves(&self) -> impl Iterator<Item = &str> + '_ {
        self.history.iter().map(|entry| entry.san.as_str())
    }

    /// How often the current position has occurred, itself included
    pub fn repetition_count(&self) -> usize {
        let key = self.position.key();
        self.keys.iter().filter(|&&k| k == key).count()
    }

    pub fn to_pgn(&self, headers: &PgnHeaders) -> String {
        let sans: Vec<&str> = self.san_moves().collect();
        write_pgn(headers, &self.start, &sans, self.status.result())
    }
}

/******************************************\
|==========================================|
|               Transitions                |
|==========================================|
\******************************************/

impl Game {
    /// Plays `mv` if it is one of the current legal moves.
    ///
    /// # Errors
    ///
    /// - [`GameError::GameOver`] once the game has ended
    /// - [`GameError::Illegal`] if `mv` is not legal here
    /// - [`GameError::Invariant`] if the position is corrupt
    pub fn apply_move(&mut self, mv: Move) -> Result<(), GameError> {
        if self.status.is_terminal() {
            return Err(GameError::GameOver(self.status));
        }

        // The caller's copy may omit the captured piece, so match on the rest
        let Some(mv) = self.position.legal_moves()?.into_iter().find(|legal| {
            legal.from() == mv.from()
                && legal.to() == mv.to()
                && legal.piece() == mv.piece()
                && legal.promotion() == mv.promotion()
                && legal.flag() == mv.flag()
        }) else {
            return Err(IllegalMoveError { notation: mv.to_string(), fen: self.position.fen() }.into());
        };

        let san = self.position.to_san(mv);
        let prior = self.position.apply_raw(mv);
        let passed_to_partner = prior.passed_to_partner();

        self.history.push(HistoryEntry { mv, san: san.clone(), prior, status_before: self.status });
        self.keys.push(self.position.key());
        self.status = self.evaluate_status()?;

        debug!(%mv, %san, fen = %self.position.fen(), "move applied");
        if self.status.is_terminal() {
            info!(status = %self.status, result = self.status.result(), "game over");
        }

        self.notify(ChangeKind::MoveApplied, Some((mv, san)), passed_to_partner);
        Ok(())
    }

    /// Parses SAN or coordinate text from the connector and plays it
    pub fn apply_external_move(&mut self, text: &str) -> Result<Move, GameError> {
        if self.status.is_terminal() {
            return Err(GameError::GameOver(self.status));
        }

        let result = self.position.parse_move(text).and_then(|mv| self.apply_move(mv).map(|()| mv));
        if let Err(err) = &result {
            warn!(notation = text, %err, fen = %self.position.fen(), "external move rejected");
        }
        result
    }

    /// Takes back the last move and returns it
    pub fn undo_move(&mut self) -> Result<Move, GameError> {
        let entry = self.history.pop().ok_or(GameError::NothingToUndo)?;

        self.position.undo_raw(entry.mv, &entry.prior);
        self.keys.pop();
        self.status = entry.status_before;

        debug!(mv = %entry.mv, fen = %self.position.fen(), "move undone");
        self.notify(ChangeKind::MoveUndone, Some((entry.mv, entry.san)), None);
        Ok(entry.mv)
    }

    /// Replaces the game with a new start position, clearing the history.
    /// Used by the connector to resync with the server.
    pub fn set_position_from_fen(&mut self, fen: &str) -> Result<(), GameError> {
        let position = Position::from_fen(fen, self.variant())?;
        position.validate()?;

        self.keys = vec![position.key()];
        self.start = position.clone();
        self.position = position;
        self.history.clear();
        self.status = self.evaluate_status()?;

        debug!(%fen, status = %self.status, "position set");
        self.notify(ChangeKind::PositionSet, None, None);
        Ok(())
    }

    /// Adds a piece to `colour`'s reserve, as when a bughouse partner passes
    /// over a capture. A finished game takes no more pieces.
    pub fn add_to_reserve(&mut self, colour: Colour, pt: PieceType) -> Result<(), GameError> {
        if !self.variant().has_drops() {
            return Err(GameError::ReservesDisabled);
        }
        if self.status.is_terminal() {
            return Err(GameError::GameOver(self.status));
        }

        self.position.add_to_reserve(colour, pt);
        if let Some(key) = self.keys.last_mut() {
            *key = self.position.key();
        }
        self.status = self.evaluate_status()?;

        debug!(%colour, piece = %pt, reserves = %self.position.reserves().to_fen(), "reserve changed");
        self.notify(ChangeKind::ReserveChanged, None, None);
        Ok(())
    }

    /// Ends the game by threefold repetition if the current position has
    /// occurred at least three times.
    pub fn claim_draw(&mut self) -> Result<GameStatus, GameError> {
        if self.status.is_terminal() {
            return Err(GameError::GameOver(self.status));
        }
        if self.repetition_count() < 3 {
            return Err(GameError::NoDrawToClaim);
        }

        self.status = GameStatus::DrawByRepetition;
        debug!(fen = %self.position.fen(), "draw claimed");
        info!(status = %self.status, result = self.status.result(), "game over");

        self.notify(ChangeKind::DrawClaimed, None, None);
        Ok(self.status)
    }
}

/******************************************\
|==========================================|
|                 Clocks                   |
|==========================================|
\******************************************/

impl Game {
    /// Sets `colour`'s remaining time as reported by the session
    pub fn set_clock(&mut self, colour: Colour, remaining_millis: i64) {
        self.clock.set(colour, remaining_millis, Utc::now());
    }

    pub fn elapse_clock(&mut self, colour: Colour, delta_millis: i64) {
        self.clock.elapse(colour, delta_millis);
    }

    #[inline]
    pub fn is_flagged(&self, colour: Colour) -> bool {
        self.clock.is_flagged(colour)
    }
}

/******************************************\
|==========================================|
|                Internals                 |
|==========================================|
\******************************************/

impl Game {
    fn evaluate_status(&self) -> Result<GameStatus, InvariantViolation> {
        let pos = &self.position;
        let policy = pos.variant().policy();

        let legal_count = pos.legal_moves()?.len();
        let in_check = pos.in_check();

        if legal_count == 0 {
            if let Some(status) = policy.check_termination(pos, 0, in_check) {
                return Ok(status);
            }
        }
        if pos.halfmove_clock() >= FIFTY_MOVE_PLIES {
            return Ok(GameStatus::DrawByFiftyMove);
        }
        if self.auto_claim_draws && self.repetition_count() >= 3 {
            return Ok(GameStatus::DrawByRepetition);
        }
        if policy.is_insufficient_material(pos) {
            return Ok(GameStatus::DrawByInsufficientMaterial);
        }

        Ok(policy.check_termination(pos, legal_count, in_check).unwrap_or_default())
    }

    fn notify(&mut self, kind: ChangeKind, last_move: Option<(Move, String)>, passed_to_partner: Option<Piece>) {
        if self.listeners.is_empty() {
            return;
        }

        let change = GameChange {
            kind,
            position: self.position.clone(),
            status: self.status,
            last_move,
            passed_to_partner,
        };
        for listener in &mut self.listeners {
            listener(&change);
        }
    }
}

impl std::fmt::Debug for Game {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Game")
            .field("fen", &self.position.fen())
            .field("status", &self.status)
            .field("plies", &self.history.len())
            .field("clock", &self.clock)
            .finish_non_exhaustive()
    }
}

/******************************************\
|==========================================|
|                Unit Tests                |
|==========================================|
\******************************************/

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::position::START_FEN;
    use Square::*;

    fn game(variant: Variant) -> Game {
        Game::new(GameConfig::new(variant)).unwrap()
    }

    fn play(game: &mut Game, moves: &[&str]) {
        for text in moves {
            game.apply_external_move(text).unwrap();
        }
    }

    #[test]
    fn test_queen_out_king_walk() {
        let mut game = game(Variant::Standard);
        play(&mut game, &["e4", "e5", "Qh5", "Ke7"]);

        assert_eq!(game.position().fen(), "rnbq1bnr/ppppkppp/8/4p2Q/4P3/8/PPPP1PPP/RNB1KBNR w KQ - 2 3");
        let first = game.legal_moves().unwrap();
        assert_eq!(first, game.legal_moves().unwrap());
        assert_eq!(game.status(), GameStatus::InProgress);
        assert_eq!(game.san_moves().collect::<Vec<_>>(), ["e4", "e5", "Qh5", "Ke7"]);
    }

    #[test]
    fn test_fools_mate() {
        let mut game = game(Variant::Standard);
        play(&mut game, &["f3", "e5", "g4", "Qh4#"]);
        assert_eq!(game.status(), GameStatus::Checkmate { winner: Colour::Black });
        assert!(matches!(game.apply_external_move("a3"), Err(GameError::GameOver(_))));
        assert!(game.to_pgn(&PgnHeaders::default()).contains("1. f3 e5 2. g4 Qh4# 0-1"));

        game.undo_move().unwrap();
        assert_eq!(game.status(), GameStatus::InProgress);
    }

    #[test]
    fn test_move_matches_without_captured_piece() {
        let mut game = game(Variant::Standard);
        play(&mut game, &["e4", "d5"]);

        // Built by a connector that does not know what stands on d5
        let exd5 = Move::new(E4, D5, MoveFlag::Capture, PieceType::Pawn, None);
        game.apply_move(exd5).unwrap();
        let played = game.moves().last().unwrap();
        assert_eq!(played.captured(), Some(PieceType::Pawn));
        assert_eq!(game.san_moves().last(), Some("exd5"));

        game.undo_move().unwrap();
        assert_eq!(game.position().piece_at(D5), Some(Piece::from_parts(Colour::Black, PieceType::Pawn)));
    }

    #[test]
    fn test_illegal_move_rejected() {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
        let mut game = game(Variant::Standard);
        let bogus = Move::new(E2, E5, MoveFlag::Quiet, PieceType::Pawn, None);
        assert!(matches!(game.apply_move(bogus), Err(GameError::Illegal(_))));
        assert!(matches!(game.apply_external_move("Ke2"), Err(GameError::Illegal(_))));
        assert_eq!(game.undo_move(), Err(GameError::NothingToUndo));
        assert_eq!(game.position().fen(), START_FEN);
    }

    #[test]
    fn test_undo_restores_every_variant() {
        let lines: [(Variant, &[&str]); 5] = [
            (Variant::Standard, &["e4", "d5", "exd5", "Qxd5", "Nc3"]),
            (Variant::Crazyhouse, &["e4", "d5", "exd5", "Qxd5", "P@e4"]),
            (Variant::Atomic, &["e4", "d5", "exd5"]),
            (Variant::Suicide, &["e3", "b5", "Bxb5"]),
            (Variant::Losers, &["e4", "d5", "exd5"]),
        ];
        for (variant, moves) in lines {
            let mut game = game(variant);
            let mut fens = vec![game.position().fen()];
            for text in moves {
                game.apply_external_move(text).unwrap();
                fens.push(game.position().fen());
            }
            while game.undo_move().is_ok() {
                fens.pop();
                assert_eq!(Some(&game.position().fen()), fens.last());
            }
            assert_eq!(game.position(), &Position::startpos(variant));
        }
    }

    #[test]
    fn test_crazyhouse_capture_then_drop() {
        let mut game = game(Variant::Crazyhouse);
        play(&mut game, &["e4", "Nc6", "Bb5", "Nd4", "Bxd7+", "Kxd7"]);
        // White's bishop took on d7 and went into Black's hand, not White's
        assert_eq!(game.position().reserves().count(Colour::Black, PieceType::Bishop), 1);
        assert_eq!(game.position().reserves().count(Colour::White, PieceType::Pawn), 1);

        let mut game = self::game(Variant::Crazyhouse);
        play(&mut game, &["e4", "Nf6", "Bb5", "Nxe4", "Bd3", "Nc5", "Bb5", "Ne6", "Nf3", "Nd4", "Bc4", "Nxf3+", "Qxf3"]);
        assert_eq!(game.position().reserves().count(Colour::White, PieceType::Knight), 1);

        play(&mut game, &["a6", "N@d5"]);
        assert_eq!(game.position().piece_at(D5), Some(Piece::from_parts(Colour::White, PieceType::Knight)));
        assert_eq!(game.position().reserves().count(Colour::White, PieceType::Knight), 0);
    }

    #[test]
    fn test_bishop_takes_knight_feeds_reserve() {
        let mut game = Game::new(GameConfig {
            variant: Variant::Crazyhouse,
            start_fen: Some("4k3/8/8/3n4/8/8/6B1/4K3[] w - - 0 1".to_string()),
            ..Default::default()
        })
        .unwrap();
        play(&mut game, &["Bxd5"]);
        assert_eq!(game.position().reserves().count(Colour::White, PieceType::Knight), 1);

        play(&mut game, &["Kd7"]);
        let drops: Vec<Move> = game.legal_moves().unwrap().into_iter().filter(Move::is_drop).collect();
        // Every empty square: 64 minus both kings and the bishop
        assert_eq!(drops.len(), 61);
        assert!(drops.iter().all(|mv| mv.piece() == PieceType::Knight));
        play(&mut game, &["N@f6+"]);
    }

    #[test]
    fn test_bughouse_passes_captures() {
        let mut game = game(Variant::Bughouse);
        let passed = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&passed);
        game.on_change(move |change| {
            if let Some(piece) = change.passed_to_partner {
                sink.lock().unwrap().push(piece);
            }
        });

        play(&mut game, &["e4", "d5", "exd5"]);
        assert_eq!(*passed.lock().unwrap(), vec![Piece::from_parts(Colour::Black, PieceType::Pawn)]);
        assert!(game.position().reserves().is_empty());

        game.add_to_reserve(Colour::Black, PieceType::Queen).unwrap();
        assert!(game.legal_moves().unwrap().contains(&Move::new_drop(PieceType::Queen, D6)));

        let mut standard = self::game(Variant::Standard);
        assert_eq!(standard.add_to_reserve(Colour::White, PieceType::Pawn), Err(GameError::ReservesDisabled));
    }

    #[test]
    fn test_repetition_needs_a_claim() {
        let mut game = game(Variant::Standard);
        assert_eq!(game.claim_draw(), Err(GameError::NoDrawToClaim));

        play(&mut game, &["Nf3", "Nf6", "Ng1", "Ng8", "Nf3", "Nf6", "Ng1", "Ng8"]);
        assert_eq!(game.repetition_count(), 3);
        assert_eq!(game.status(), GameStatus::InProgress);
        assert_eq!(game.claim_draw(), Ok(GameStatus::DrawByRepetition));
        assert_eq!(game.status().result(), "1/2-1/2");
    }

    #[test]
    fn test_finished_game_takes_no_reserve_pieces() {
        let mut game = game(Variant::Bughouse);
        play(&mut game, &["Nf3", "Nf6", "Ng1", "Ng8", "Nf3", "Nf6", "Ng1", "Ng8"]);
        assert_eq!(game.claim_draw(), Ok(GameStatus::DrawByRepetition));

        assert_eq!(
            game.add_to_reserve(Colour::White, PieceType::Pawn),
            Err(GameError::GameOver(GameStatus::DrawByRepetition))
        );
        assert_eq!(game.status(), GameStatus::DrawByRepetition);
        assert!(game.position().reserves().is_empty());
    }

    #[test]
    fn test_repetition_auto_claim() {
        let mut game = Game::new(GameConfig { auto_claim_draws: true, ..Default::default() }).unwrap();
        play(&mut game, &["Nf3", "Nf6", "Ng1", "Ng8", "Nf3", "Nf6", "Ng1"]);
        assert_eq!(game.status(), GameStatus::InProgress);
        play(&mut game, &["Ng8"]);
        assert_eq!(game.status(), GameStatus::DrawByRepetition);
    }

    #[test]
    fn test_fifty_move_rule() {
        let mut game = Game::new(GameConfig {
            start_fen: Some("4k3/8/8/8/8/8/8/R3K3 w - - 99 80".to_string()),
            ..Default::default()
        })
        .unwrap();
        play(&mut game, &["Ra2"]);
        assert_eq!(game.status(), GameStatus::DrawByFiftyMove);

        // A capture or pawn move resets the count
        let mut game = Game::new(GameConfig {
            start_fen: Some("4k3/8/8/8/8/8/4P3/R3K3 w - - 99 80".to_string()),
            ..Default::default()
        })
        .unwrap();
        play(&mut game, &["e3"]);
        assert_eq!(game.position().halfmove_clock(), 0);
        assert_eq!(game.status(), GameStatus::InProgress);
    }

    #[test]
    fn test_insufficient_material_after_capture() {
        let mut game = Game::new(GameConfig {
            start_fen: Some("4k3/8/8/8/8/8/3r4/4K3 w - - 0 1".to_string()),
            ..Default::default()
        })
        .unwrap();
        play(&mut game, &["Kxd2"]);
        assert_eq!(game.status(), GameStatus::DrawByInsufficientMaterial);
    }

    #[test]
    fn test_atomic_explosion_ends_game() {
        let mut game = Game::new(GameConfig {
            variant: Variant::Atomic,
            start_fen: Some("rnbqkbnr/pppppppp/8/8/8/5N2/PPPPPPPP/RNBQKB1R w KQkq - 0 1".to_string()),
            ..Default::default()
        })
        .unwrap();
        play(&mut game, &["Ne5", "a6", "Nxd7"]);
        assert_eq!(game.status(), GameStatus::KingExploded { winner: Colour::White });
        assert_eq!(game.position().king_square(Colour::Black), None);
    }

    #[test]
    fn test_listeners_see_snapshots() {
        let mut game = game(Variant::Standard);
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        game.on_change(move |change| sink.lock().unwrap().push((change.kind, change.position.fen())));

        play(&mut game, &["d4"]);
        game.undo_move().unwrap();
        game.set_position_from_fen("4k3/8/8/8/8/8/8/4K2R w K - 0 1").unwrap();

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 3);
        assert_eq!(seen[0], (ChangeKind::MoveApplied, "rnbqkbnr/pppppppp/8/8/3P4/8/PPP1PPPP/RNBQKBNR b KQkq d3 0 1".to_string()));
        assert_eq!(seen[1], (ChangeKind::MoveUndone, START_FEN.to_string()));
        assert_eq!(seen[2].0, ChangeKind::PositionSet);
    }

    #[test]
    fn test_config_paths() {
        let game = Game::new(GameConfig {
            variant: Variant::FischerRandom,
            chess960_index: Some(518),
            initial_clock_millis: Some(60_000),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(game.position().fen(), START_FEN);
        assert_eq!(game.clock().remaining(Colour::Black), Some(60_000));

        let random = Game::new(GameConfig::new(Variant::FischerRandom)).unwrap();
        assert!(random.position().is_chess960());

        assert!(matches!(
            Game::new(GameConfig { variant: Variant::FischerRandom, chess960_index: Some(960), ..Default::default() }),
            Err(ConfigError::InvalidChess960Index(960))
        ));
        assert!(matches!(
            Game::new(GameConfig { start_fen: Some("8/8 w".to_string()), ..Default::default() }),
            Err(ConfigError::Notation(_))
        ));
    }

    #[test]
    fn test_clock_hooks() {
        let mut game = game(Variant::Standard);
        assert!(!game.is_flagged(Colour::White));
        assert!(!game.is_flagged(Colour::Black));

        game.set_clock(Colour::White, 1_500);
        assert!(game.clock().last_update().is_some());
        game.elapse_clock(Colour::White, 2_000);
        assert!(game.is_flagged(Colour::White));
        assert!(!game.is_flagged(Colour::Black));
    }
}
