//! Moves and their text coordinates.
//!
//! A move names the cell a piece is placed on. Columns are written `a`-`h`
//! and rows `1`-`8`, so `Move::new(3, 2)` reads as `d3`.

use std::fmt;
use std::str::FromStr;

use crate::constants::{HEIGHT, WIDTH};

/// Target cell of a move, 0-indexed. Always on the board.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Move {
    pub x: u8,
    pub y: u8,
}

impl Move {
    pub fn new(x: usize, y: usize) -> Self {
        assert!(x < WIDTH && y < HEIGHT, "move ({x}, {y}) is off the board");
        Self {
            x: x as u8,
            y: y as u8,
        }
    }

    #[inline]
    pub fn x(self) -> usize {
        self.x as usize
    }

    #[inline]
    pub fn y(self) -> usize {
        self.y as usize
    }

    /// Bit for this cell in a board bitset.
    #[inline]
    pub(crate) fn mask(self) -> u64 {
        1u64 << (self.x() + WIDTH * self.y())
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", (b'a' + self.x) as char, self.y + 1)
    }
}

/// Text that does not name a board cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseMoveError(pub String);

impl fmt::Display for ParseMoveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "not a board coordinate: '{}'", self.0)
    }
}

impl std::error::Error for ParseMoveError {}

impl FromStr for Move {
    type Err = ParseMoveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseMoveError(s.to_string());
        let bytes = s.trim().as_bytes();
        if bytes.len() < 2 {
            return Err(err());
        }

        let col = bytes[0].to_ascii_lowercase();
        if !col.is_ascii_lowercase() {
            return Err(err());
        }
        let x = (col - b'a') as usize;

        let row: usize = std::str::from_utf8(&bytes[1..])
            .ok()
            .and_then(|r| r.parse().ok())
            .ok_or_else(err)?;

        if x >= WIDTH || row == 0 || row > HEIGHT {
            return Err(err());
        }
        Ok(Move::new(x, row - 1))
    }
}
