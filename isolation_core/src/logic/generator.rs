use crate::engine::move_list::MoveList;
use crate::logic::board::{Board, Coord};

/// Ray directions as `(dcol, drow)`. The order is part of the engine's observable
/// behaviour: ties between equally scored moves go to the first one generated.
pub const DIRECTIONS: [(i8, i8); 8] = [
    (1, 0),
    (1, -1),
    (0, -1),
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Destinations for a piece standing on `from`. An unplaced piece (`None`) may land on
/// any blank cell.
#[must_use]
pub fn generate_moves(board: &Board, from: Option<Coord>) -> MoveList {
    let Some(origin) = from else {
        return board.blank_spaces();
    };

    let mut moves = MoveList::new();
    for (dcol, drow) in DIRECTIONS {
        cast_ray(board, origin, dcol, drow, &mut moves);
    }
    moves
}

/// Returns as soon as one destination is found.
#[must_use]
pub fn has_legal_moves(board: &Board, from: Option<Coord>) -> bool {
    let Some(origin) = from else {
        return board.blank_count() > 0;
    };

    DIRECTIONS.iter().any(|&(dcol, drow)| {
        origin
            .offset(dcol, drow)
            .is_some_and(|next| board.is_open(next))
    })
}

fn cast_ray(board: &Board, origin: Coord, dcol: i8, drow: i8, moves: &mut MoveList) {
    let mut cell = origin;
    while let Some(next) = cell.offset(dcol, drow) {
        if !board.is_open(next) {
            break;
        }
        moves.push(next);
        cell = next;
    }
}
