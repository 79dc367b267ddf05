use crate::logic::board::{Board, Coord};
use thiserror::Error;

/// Why a requested move is not in the mover's legal move set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MoveError {
    #[error("{0} lies outside the board")]
    OutOfBounds(Coord),
    #[error("{0} is already blocked")]
    Occupied(Coord),
    #[error("{to} is not reachable in an unobstructed line from {from}")]
    Unreachable { from: Coord, to: Coord },
}

/// Checks that `to` is a legal destination for a piece on `from` without generating
/// the whole move list. Agrees with `generate_moves(..).contains(to)`.
///
/// # Errors
///
/// Returns the first [`MoveError`] that applies: off the board, blocked, or not reachable
/// from `from` along an open line.
pub fn is_valid_move(board: &Board, from: Option<Coord>, to: Coord) -> Result<(), MoveError> {
    if !board.contains(to) {
        return Err(MoveError::OutOfBounds(to));
    }
    if board.is_occupied(to) {
        return Err(MoveError::Occupied(to));
    }
    let Some(from) = from else {
        return Ok(());
    };

    let dcol = i16::from(to.col) - i16::from(from.col);
    let drow = i16::from(to.row) - i16::from(from.row);
    let on_line = dcol == 0 || drow == 0 || dcol.abs() == drow.abs();
    if !on_line || (dcol == 0 && drow == 0) {
        return Err(MoveError::Unreachable { from, to });
    }

    #[allow(clippy::cast_possible_truncation)]
    let (step_col, step_row) = (dcol.signum() as i8, drow.signum() as i8);
    let mut cell = from;
    loop {
        let Some(next) = cell.offset(step_col, step_row) else {
            return Err(MoveError::Unreachable { from, to });
        };
        if next == to {
            return Ok(());
        }
        if !board.is_open(next) {
            return Err(MoveError::Unreachable { from, to });
        }
        cell = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::board::BoardConfig;

    fn board_with(blocked: &[(u8, u8)]) -> Board {
        let mut board = Board::new(&BoardConfig::new(5, 5).with_reserved(None)).unwrap();
        for &cell in blocked {
            board.occupy(cell.into());
        }
        board
    }

    #[test]
    fn test_first_move_accepts_any_blank() {
        let board = board_with(&[(2, 2)]);
        assert!(is_valid_move(&board, None, Coord::new(4, 4)).is_ok());
        assert_eq!(
            is_valid_move(&board, None, Coord::new(2, 2)),
            Err(MoveError::Occupied(Coord::new(2, 2)))
        );
    }

    #[test]
    fn test_out_of_bounds() {
        let board = board_with(&[]);
        assert_eq!(
            is_valid_move(&board, Some(Coord::new(0, 0)), Coord::new(5, 0)),
            Err(MoveError::OutOfBounds(Coord::new(5, 0)))
        );
    }

    #[test]
    fn test_knight_jump_is_unreachable() {
        let board = board_with(&[(0, 0)]);
        let from = Coord::new(0, 0);
        let to = Coord::new(1, 2);
        assert_eq!(
            is_valid_move(&board, Some(from), to),
            Err(MoveError::Unreachable { from, to })
        );
    }

    #[test]
    fn test_blocked_path() {
        let board = board_with(&[(0, 0), (2, 2)]);
        let from = Coord::new(0, 0);
        assert!(is_valid_move(&board, Some(from), Coord::new(1, 1)).is_ok());
        assert_eq!(
            is_valid_move(&board, Some(from), Coord::new(3, 3)),
            Err(MoveError::Unreachable {
                from,
                to: Coord::new(3, 3)
            })
        );
        assert!(is_valid_move(&board, Some(from), Coord::new(0, 4)).is_ok());
    }
}
