use crate::logic::board::{Coord, MAX_CELLS};

// A move is a destination cell, so no position can offer more moves than the board has
// cells.
const MAX_MOVES: usize = MAX_CELLS;

#[derive(Clone, Copy)]
pub struct MoveList {
    moves: [Coord; MAX_MOVES],
    count: usize,
}

impl Default for MoveList {
    fn default() -> Self {
        Self {
            moves: [Coord::default(); MAX_MOVES],
            count: 0,
        }
    }
}

impl MoveList {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, mv: Coord) {
        debug_assert!(self.count < MAX_MOVES, "MoveList overflow! Max moves: {MAX_MOVES}");
        if let Some(slot) = self.moves.get_mut(self.count) {
            *slot = mv;
            self.count += 1;
        }
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.count
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.count == 0
    }

    #[must_use]
    pub fn first(&self) -> Option<Coord> {
        self.as_slice().first().copied()
    }

    #[must_use]
    pub fn contains(&self, mv: Coord) -> bool {
        self.as_slice().contains(&mv)
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Coord] {
        self.moves.get(0..self.count).unwrap_or(&[])
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Coord> {
        self.as_slice().iter()
    }
}

impl std::fmt::Debug for MoveList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl PartialEq for MoveList {
    fn eq(&self, other: &Self) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl Eq for MoveList {}

impl<'a> IntoIterator for &'a MoveList {
    type Item = &'a Coord;
    type IntoIter = std::slice::Iter<'a, Coord>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl IntoIterator for MoveList {
    type Item = Coord;
    type IntoIter = std::iter::Take<std::array::IntoIter<Coord, MAX_MOVES>>;

    fn into_iter(self) -> Self::IntoIter {
        self.moves.into_iter().take(self.count)
    }
}
