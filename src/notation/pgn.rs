//! # Module: `pgn`
//!
//! PGN export. The seven-tag roster comes first, followed by `Variant`,
//! `SetUp` and `FEN` when they apply. Movetext is wrapped at 80 columns and
//! ends with the result token.

use std::fmt::Write;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::core::Colour;
use crate::position::Position;
use crate::variant::Variant;

const LINE_WIDTH: usize = 80;

/// Tag values supplied by the session. `Result` comes from the game itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PgnHeaders {
    pub event: String,
    pub site: String,
    pub date: String,
    pub round: String,
    pub white: String,
    pub black: String,
}

impl Default for PgnHeaders {
    fn default() -> Self {
        Self {
            event: "?".to_string(),
            site: "?".to_string(),
            date: "????.??.??".to_string(),
            round: "?".to_string(),
            white: "?".to_string(),
            black: "?".to_string(),
        }
    }
}

impl PgnHeaders {
    /// Unknown tags with today's date
    pub fn today() -> Self {
        Self { date: Utc::now().format("%Y.%m.%d").to_string(), ..Default::default() }
    }
}

fn escape(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Writes a complete PGN game from its start position and SAN moves
pub fn write_pgn<S: AsRef<str>>(headers: &PgnHeaders, start: &Position, sans: &[S], result: &str) -> String {
    let mut pgn = String::new();

    let roster = [
        ("Event", headers.event.as_str()),
        ("Site", headers.site.as_str()),
        ("Date", headers.date.as_str()),
        ("Round", headers.round.as_str()),
        ("White", headers.white.as_str()),
        ("Black", headers.black.as_str()),
        ("Result", result),
    ];
    for (tag, value) in roster {
        let _ = writeln!(pgn, "[{tag} \"{}\"]", escape(value));
    }

    let variant = start.variant();
    if variant != Variant::Standard {
        let _ = writeln!(pgn, "[Variant \"{}\"]", variant.name());
    }

    let fen = start.fen();
    if fen != Position::startpos(variant).fen() {
        let _ = writeln!(pgn, "[SetUp \"1\"]");
        let _ = writeln!(pgn, "[FEN \"{fen}\"]");
    }

    pgn.push('\n');
    pgn.push_str(&movetext(start, sans, result));
    pgn.push('\n');
    pgn
}

/// Numbered moves plus the result, wrapped at [`LINE_WIDTH`]
fn movetext<S: AsRef<str>>(start: &Position, sans: &[S], result: &str) -> String {
    let mut tokens = Vec::with_capacity(sans.len() * 3 / 2 + 2);
    let mut number = start.fullmove_number();
    let mut colour = start.side_to_move();

    if colour == Colour::Black && !sans.is_empty() {
        tokens.push(format!("{number}..."));
    }
    for san in sans {
        if colour == Colour::White {
            tokens.push(format!("{number}."));
        } else {
            number += 1;
        }
        tokens.push(san.as_ref().to_string());
        colour = !colour;
    }
    tokens.push(result.to_string());

    let mut text = String::new();
    let mut width = 0;
    for token in tokens {
        if width > 0 && width + 1 + token.len() > LINE_WIDTH {
            text.push('\n');
            width = 0;
        } else if width > 0 {
            text.push(' ');
            width += 1;
        }
        text.push_str(&token);
        width += token.len();
    }
    text
}
