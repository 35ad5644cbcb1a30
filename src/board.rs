//! Bit-packed 8x8 board.
//!
//! Each color owns one `u64` bitset. A cell is set in at most one of them.

use std::fmt;

use crate::constants::{CAPACITY, HEIGHT, WIDTH};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Color {
    Black,
    White,
}

impl Color {
    /// The other side.
    #[inline]
    pub fn opposite(self) -> Color {
        match self {
            Color::Black => Color::White,
            Color::White => Color::Black,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::Black => write!(f, "black"),
            Color::White => write!(f, "white"),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Piece {
    Color(Color),
    Empty,
}

/// The board as two disjoint bitsets, compared and hashed structurally.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Board {
    white: u64,
    black: u64,
}

/// Bit for cell `(x, y)`. Out-of-range coordinates are a caller bug.
#[inline]
fn bitmask(x: usize, y: usize) -> u64 {
    assert!(
        x < WIDTH && y < HEIGHT,
        "coordinate ({x}, {y}) is off the board"
    );
    1u64 << (x + WIDTH * y)
}

impl Board {
    /// An empty board.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn piece_at(&self, x: usize, y: usize) -> Piece {
        let mask = bitmask(x, y);
        if self.white & mask != 0 {
            Piece::Color(Color::White)
        } else if self.black & mask != 0 {
            Piece::Color(Color::Black)
        } else {
            Piece::Empty
        }
    }

    #[inline]
    pub fn is_empty_at(&self, x: usize, y: usize) -> bool {
        (self.white | self.black) & bitmask(x, y) == 0
    }

    /// Place (or clear) a cell, keeping the two bitsets disjoint.
    pub fn set_piece(&mut self, x: usize, y: usize, piece: Piece) {
        let mask = bitmask(x, y);
        match piece {
            Piece::Color(Color::White) => {
                self.white |= mask;
                self.black &= !mask;
            }
            Piece::Color(Color::Black) => {
                self.black |= mask;
                self.white &= !mask;
            }
            Piece::Empty => {
                self.white &= !mask;
                self.black &= !mask;
            }
        }
    }

    /// Hand every cell in `mask` to `color`.
    pub(crate) fn flip(&mut self, mask: u64, color: Color) {
        match color {
            Color::White => {
                self.white |= mask;
                self.black &= !mask;
            }
            Color::Black => {
                self.black |= mask;
                self.white &= !mask;
            }
        }
    }

    /// Raw bitset for one color.
    #[inline]
    pub fn bits(&self, color: Color) -> u64 {
        match color {
            Color::White => self.white,
            Color::Black => self.black,
        }
    }

    pub fn number_of_pieces(&self, color: Color) -> usize {
        self.bits(color).count_ones() as usize
    }

    /// Pieces of both colors.
    pub fn total_pieces(&self) -> usize {
        (self.white | self.black).count_ones() as usize
    }

    pub fn is_full(&self) -> bool {
        self.total_pieces() == CAPACITY
    }

    pub fn is_valid_coordinate(&self, x: isize, y: isize) -> bool {
        (0..WIDTH as isize).contains(&x) && (0..HEIGHT as isize).contains(&y)
    }

    /// Visit every cell in row-major order.
    pub fn iterate(&self, mut f: impl FnMut(usize, usize, Piece)) {
        for y in 0..HEIGHT {
            for x in 0..WIDTH {
                f(x, y, self.piece_at(x, y));
            }
        }
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "  ")?;
        for x in 0..WIDTH {
            write!(f, "{} ", (b'a' + x as u8) as char)?;
        }
        writeln!(f)?;
        for y in 0..HEIGHT {
            write!(f, "{} ", y + 1)?;
            for x in 0..WIDTH {
                let ch = match self.piece_at(x, y) {
                    Piece::Color(Color::Black) => 'X',
                    Piece::Color(Color::White) => 'O',
                    Piece::Empty => '.',
                };
                write!(f, "{ch} ")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
