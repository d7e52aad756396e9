//! # Chess Variants
//!
//! A chess rules engine for orthodox chess and the common server variants:
//! Chess960, crazyhouse, bughouse, suicide, giveaway, atomic and losers.
//!
//! One bitboard move generator serves every variant. The differences live in
//! a [`VariantPolicy`] chosen from the [`Variant`] tag, and the [`Game`] state
//! machine layers history, terminal detection, clocks and change
//! notification on top of a [`Position`].
pub mod core;
pub mod game;
pub mod movegen;
pub mod notation;
pub mod position;
pub mod utils;
pub mod variant;

pub use crate::core::*;
pub use game::{ChangeKind, Clock, ConfigError, Game, GameChange, GameConfig, GameStatus};
pub use notation::PgnHeaders;
pub use position::{Position, PriorState};
pub use variant::{Variant, VariantPolicy};
