use crate::engine::move_list::MoveList;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

pub type Bitboard = u128;

/// Largest number of cells a [`Bitboard`] can address.
pub const MAX_CELLS: usize = 128;

/// A cell on the board in `(column, row)` order. `(0, 0)` is the top-left corner.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct Coord {
    pub col: u8,
    pub row: u8,
}

impl Coord {
    #[must_use]
    pub const fn new(col: u8, row: u8) -> Self {
        Self { col, row }
    }

    /// Steps one cell in the given direction. `None` when the step would leave the
    /// non-negative quadrant; the upper bounds are the board's business.
    #[must_use]
    pub fn offset(self, dcol: i8, drow: i8) -> Option<Self> {
        Some(Self {
            col: self.col.checked_add_signed(dcol)?,
            row: self.row.checked_add_signed(drow)?,
        })
    }

    #[must_use]
    pub fn distance(self, other: Self) -> f64 {
        let dc = f64::from(self.col) - f64::from(other.col);
        let dr = f64::from(self.row) - f64::from(other.row);
        dc.hypot(dr)
    }
}

impl From<(u8, u8)> for Coord {
    fn from((col, row): (u8, u8)) -> Self {
        Self::new(col, row)
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.col, self.row)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BoardError {
    #[error("board dimensions must be non-zero, got {width}x{height}")]
    EmptyBoard { width: u8, height: u8 },
    #[error("a {width}x{height} board exceeds the 128-cell limit")]
    TooLarge { width: u8, height: u8 },
    #[error("reserved cell {0} lies outside the board")]
    ReservedOutOfBounds(Coord),
    #[error("occupancy mask {occupied:#x} marks cells outside a {width}x{height} board")]
    StrayOccupancy { width: u8, height: u8, occupied: Bitboard },
}

/// Board dimensions plus the single cell blocked before the first move.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    pub width: u8,
    pub height: u8,
    pub reserved: Option<Coord>,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self::new(7, 7)
    }
}

impl BoardConfig {
    /// A `width` x `height` board with the bottom-right corner reserved.
    #[must_use]
    pub const fn new(width: u8, height: u8) -> Self {
        Self {
            width,
            height,
            reserved: Some(Coord::new(width.saturating_sub(1), height.saturating_sub(1))),
        }
    }

    #[must_use]
    pub const fn with_reserved(mut self, reserved: Option<Coord>) -> Self {
        self.reserved = reserved;
        self
    }

    /// # Errors
    ///
    /// Fails on a zero dimension, more than [`MAX_CELLS`] cells, or a reserved cell off the
    /// board.
    pub fn validate(&self) -> Result<(), BoardError> {
        let (width, height) = (self.width, self.height);
        if width == 0 || height == 0 {
            return Err(BoardError::EmptyBoard { width, height });
        }
        if usize::from(width) * usize::from(height) > MAX_CELLS {
            return Err(BoardError::TooLarge { width, height });
        }
        if let Some(cell) = self.reserved {
            if cell.col >= width || cell.row >= height {
                return Err(BoardError::ReservedOutOfBounds(cell));
            }
        }
        Ok(())
    }
}

/// Cell occupancy. A set bit means the cell is blocked, either reserved at setup or
/// visited by a player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawBoard")]
pub struct Board {
    width: u8,
    height: u8,
    occupied: Bitboard,
}

/// Wire form of [`Board`]; only reaches the engine through `TryFrom`.
#[derive(Deserialize)]
struct RawBoard {
    width: u8,
    height: u8,
    occupied: Bitboard,
}

impl TryFrom<RawBoard> for Board {
    type Error = BoardError;

    fn try_from(raw: RawBoard) -> Result<Self, Self::Error> {
        BoardConfig::new(raw.width, raw.height)
            .with_reserved(None)
            .validate()?;
        let board = Self {
            width: raw.width,
            height: raw.height,
            occupied: raw.occupied,
        };
        if board.occupied & !board.full_mask() != 0 {
            return Err(BoardError::StrayOccupancy {
                width: raw.width,
                height: raw.height,
                occupied: raw.occupied,
            });
        }
        Ok(board)
    }
}

impl Board {
    /// # Errors
    ///
    /// Returns the [`BoardError`] from [`BoardConfig::validate`].
    pub fn new(config: &BoardConfig) -> Result<Self, BoardError> {
        config.validate()?;
        Ok(Self::from_config_unchecked(config))
    }

    pub(crate) fn from_config_unchecked(config: &BoardConfig) -> Self {
        let mut board = Self {
            width: config.width,
            height: config.height,
            occupied: 0,
        };
        if let Some(cell) = config.reserved {
            board.occupy(cell);
        }
        board
    }

    #[must_use]
    pub const fn width(&self) -> u8 {
        self.width
    }

    #[must_use]
    pub const fn height(&self) -> u8 {
        self.height
    }

    #[must_use]
    pub const fn cell_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    #[must_use]
    pub const fn contains(&self, cell: Coord) -> bool {
        cell.col < self.width && cell.row < self.height
    }

    /// Row-major square index. Only meaningful for cells inside the board.
    #[must_use]
    pub const fn square_index(&self, cell: Coord) -> usize {
        cell.row as usize * self.width as usize + cell.col as usize
    }

    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn index_to_coord(&self, sq: usize) -> Coord {
        let width = self.width as usize;
        Coord::new((sq % width) as u8, (sq / width) as u8)
    }

    #[must_use]
    pub const fn is_open(&self, cell: Coord) -> bool {
        self.contains(cell) && self.occupied & (1 << self.square_index(cell)) == 0
    }

    #[must_use]
    pub const fn is_occupied(&self, cell: Coord) -> bool {
        self.contains(cell) && !self.is_open(cell)
    }

    pub(crate) fn occupy(&mut self, cell: Coord) {
        debug_assert!(self.contains(cell), "occupy outside the board: {cell}");
        self.occupied |= 1 << self.square_index(cell);
    }

    pub(crate) fn vacate(&mut self, cell: Coord) {
        debug_assert!(self.contains(cell), "vacate outside the board: {cell}");
        self.occupied &= !(1 << self.square_index(cell));
    }

    #[must_use]
    pub const fn occupied(&self) -> Bitboard {
        self.occupied
    }

    #[must_use]
    pub const fn full_mask(&self) -> Bitboard {
        let cells = self.cell_count();
        if cells >= MAX_CELLS {
            Bitboard::MAX
        } else {
            (1 << cells) - 1
        }
    }

    #[must_use]
    pub const fn open_mask(&self) -> Bitboard {
        self.full_mask() & !self.occupied
    }

    #[must_use]
    pub const fn occupied_count(&self) -> u32 {
        self.occupied.count_ones()
    }

    #[must_use]
    pub const fn blank_count(&self) -> u32 {
        self.open_mask().count_ones()
    }

    /// Every unoccupied cell in row-major order.
    #[must_use]
    pub fn blank_spaces(&self) -> MoveList {
        let mut cells = MoveList::new();
        for sq in BitboardIterator::new(self.open_mask()) {
            cells.push(self.index_to_coord(sq));
        }
        cells
    }
}

pub struct BitboardIterator {
    bb: Bitboard,
}

impl BitboardIterator {
    #[must_use]
    pub const fn new(bb: Bitboard) -> Self {
        Self { bb }
    }
}

impl Iterator for BitboardIterator {
    type Item = usize;

    fn next(&mut self) -> Option<Self::Item> {
        if self.bb == 0 {
            None
        } else {
            let lsb = self.bb.trailing_zeros() as usize;
            self.bb &= self.bb - 1;
            Some(lsb)
        }
    }
}
