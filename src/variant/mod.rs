//! # Module: `variant`
//!
//! Rule policies for every supported variant. A [`Variant`] tag is stored on
//! each position and maps to a stateless [`VariantPolicy`] that the single move
//! generator and the game state machine consult wherever the rules differ.
//!
//! ## Key Components
//!
//! - [`Variant`]: the tag, parseable from chess-server style names and
//!   serialisable in snake case.
//! - [`VariantPolicy`]: the capability trait. Defaults describe standard chess,
//!   so each policy only overrides what its variant changes.
//! - [`KingSafety`], [`CaptureRouting`], [`KingRule`]: knobs the generator and
//!   position read instead of branching on the variant.

mod atomic;
mod crazyhouse;
mod losers;
mod standard;
mod suicide;

pub use atomic::Atomic;
pub use crazyhouse::Crazyhouse;
pub use losers::Losers;
pub use standard::Standard;
pub use suicide::{StalemateRule, Suicide};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::*;
use crate::game::GameStatus;
use crate::position::Position;

/******************************************\
|==========================================|
|                 Variant                  |
|==========================================|
\******************************************/

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Variant {
    #[default]
    Standard,
    FischerRandom,
    Crazyhouse,
    Bughouse,
    Suicide,
    Giveaway,
    Atomic,
    Losers,
}

static STANDARD: Standard = Standard;
static CRAZYHOUSE: Crazyhouse = Crazyhouse::new(CaptureRouting::Own);
static BUGHOUSE: Crazyhouse = Crazyhouse::new(CaptureRouting::Partner);
static SUICIDE: Suicide = Suicide::new(StalemateRule::FewerPieces);
static GIVEAWAY: Suicide = Suicide::new(StalemateRule::StalemateWins);
static ATOMIC: Atomic = Atomic;
static LOSERS: Losers = Losers;

impl Variant {
    /// The rule policy for this variant
    pub fn policy(self) -> &'static dyn VariantPolicy {
        match self {
            Variant::Standard | Variant::FischerRandom => &STANDARD,
            Variant::Crazyhouse => &CRAZYHOUSE,
            Variant::Bughouse => &BUGHOUSE,
            Variant::Suicide => &SUICIDE,
            Variant::Giveaway => &GIVEAWAY,
            Variant::Atomic => &ATOMIC,
            Variant::Losers => &LOSERS,
        }
    }

    /// Name used in the PGN `Variant` tag
    pub fn name(self) -> &'static str {
        match self {
            Variant::Standard => "Standard",
            Variant::FischerRandom => "Chess960",
            Variant::Crazyhouse => "Crazyhouse",
            Variant::Bughouse => "Bughouse",
            Variant::Suicide => "Suicide",
            Variant::Giveaway => "Giveaway",
            Variant::Atomic => "Atomic",
            Variant::Losers => "Losers",
        }
    }

    /// True when pieces can be held and dropped
    #[inline]
    pub fn has_drops(self) -> bool {
        self.policy().capture_routing() != CaptureRouting::Discard
    }
}

impl std::fmt::Display for Variant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown variant '{0}'")]
pub struct ParseVariantError(pub String);

impl std::str::FromStr for Variant {
    type Err = ParseVariantError;

    /// Accepts chess-server style names such as `wild/fr` and `chess960`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "standard" | "normal" | "blitz" | "lightning" | "bullet" => Ok(Variant::Standard),
            "wild/fr" | "fr" | "chess960" | "fischerrandom" | "fischer_random" => {
                Ok(Variant::FischerRandom)
            }
            "crazyhouse" | "zh" => Ok(Variant::Crazyhouse),
            "bughouse" | "bh" => Ok(Variant::Bughouse),
            "suicide" => Ok(Variant::Suicide),
            "giveaway" => Ok(Variant::Giveaway),
            "atomic" => Ok(Variant::Atomic),
            "losers" => Ok(Variant::Losers),
            _ => Err(ParseVariantError(s.to_string())),
        }
    }
}

/******************************************\
|==========================================|
|              Policy Knobs                |
|==========================================|
\******************************************/

/// How the generator decides whether a move leaves the mover's king safe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KingSafety {
    /// The king may not be left attacked
    Standard,
    /// The king must survive the explosion; adjacent kings cancel check
    Atomic,
    /// Kings are ordinary pieces
    None,
}

/// Where a captured piece goes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureRouting {
    /// Off the board for good
    Discard,
    /// Into the capturer's reserve
    Own,
    /// Handed to the partner board
    Partner,
}

/// How many kings each side must have
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KingRule {
    ExactlyOne,
    /// Zero only after the king has been blown up
    AtMostOne,
    Any,
}

/******************************************\
|==========================================|
|              Variant Policy              |
|==========================================|
\******************************************/

const STANDARD_PROMOTIONS: [PieceType; 4] =
    [PieceType::Queen, PieceType::Rook, PieceType::Bishop, PieceType::Knight];

/// Rules that vary between chess variants.
///
/// The provided methods describe standard chess.
pub trait VariantPolicy: Send + Sync + std::fmt::Debug {
    fn king_safety(&self) -> KingSafety {
        KingSafety::Standard
    }

    fn king_rule(&self) -> KingRule {
        KingRule::ExactlyOne
    }

    fn castling_allowed(&self) -> bool {
        true
    }

    /// Whether castling requires the king's path to be free of attacks
    fn castling_checks_attacks(&self) -> bool {
        true
    }

    /// When true only captures are legal whenever a capture is available
    fn captures_forced(&self) -> bool {
        false
    }

    fn promotion_pieces(&self) -> &'static [PieceType] {
        &STANDARD_PROMOTIONS
    }

    fn capture_routing(&self) -> CaptureRouting {
        CaptureRouting::Discard
    }

    /// Whether captures blow up the neighbourhood of the target square
    fn explodes_on_capture(&self) -> bool {
        false
    }

    /// Extra legality constraint run after the king safety filter
    fn is_legal_extra(&self, _mv: Move, _pos: &Position) -> bool {
        true
    }

    /// Squares a `pt` of `colour` may be dropped on
    fn drop_targets(&self, _pos: &Position, _pt: PieceType, _colour: Colour) -> Bitboard {
        Bitboard::EMPTY
    }

    /// Variant outcome of a position with `legal_count` legal moves. Called with
    /// zero moves first, so every variant decides what mate and stalemate mean.
    fn check_termination(
        &self,
        pos: &Position,
        legal_count: usize,
        in_check: bool,
    ) -> Option<GameStatus> {
        match (legal_count, in_check) {
            (0, true) => Some(GameStatus::Checkmate { winner: !pos.side_to_move() }),
            (0, false) => Some(GameStatus::Stalemate),
            _ => None,
        }
    }

    fn is_insufficient_material(&self, pos: &Position) -> bool {
        standard::insufficient_material(pos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variant_names_parse() {
        assert_eq!("wild/fr".parse::<Variant>(), Ok(Variant::FischerRandom));
        assert_eq!("Crazyhouse".parse::<Variant>(), Ok(Variant::Crazyhouse));
        assert_eq!("losers".parse::<Variant>(), Ok(Variant::Losers));
        assert!("wild/0".parse::<Variant>().is_err());
    }

    #[test]
    fn test_variant_serde_names() {
        let json = serde_json::to_string(&Variant::FischerRandom).unwrap();
        assert_eq!(json, "\"fischer_random\"");
        let parsed: Variant = serde_json::from_str("\"giveaway\"").unwrap();
        assert_eq!(parsed, Variant::Giveaway);
    }

    #[test]
    fn test_policy_capabilities() {
        assert!(Variant::Crazyhouse.has_drops());
        assert!(Variant::Bughouse.has_drops());
        assert!(!Variant::Atomic.has_drops());
        assert_eq!(Variant::Suicide.policy().king_safety(), KingSafety::None);
        assert!(!Variant::Suicide.policy().castling_allowed());
        assert!(Variant::Giveaway.policy().castling_allowed());
        assert!(Variant::Losers.policy().captures_forced());
        assert!(Variant::Atomic.policy().explodes_on_capture());
        assert_eq!(Variant::Giveaway.policy().promotion_pieces().len(), 5);
    }
}
