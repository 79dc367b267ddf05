#![allow(dead_code)]

use isolation_core::logic::board::BoardConfig;
use isolation_core::logic::game::GameState;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

pub fn seeded(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// A position reached by random legal play on a `width` x `height` board.
/// May be terminal when the walk runs out of moves.
pub fn random_state(rng: &mut StdRng, width: u8, height: u8, plies: usize) -> GameState {
    let mut state = GameState::with_config(&BoardConfig::new(width, height)).unwrap();
    for _ in 0..plies {
        let moves = state.legal_moves();
        let Some(&mv) = moves.as_slice().choose(rng) else {
            break;
        };
        state.make_move(mv).unwrap();
    }
    state
}

/// Random board between 3x3 and 5x5, a few plies in, with the player to move not yet trapped.
pub fn random_playable_state(rng: &mut StdRng) -> GameState {
    loop {
        let width = rng.gen_range(3..=5);
        let height = rng.gen_range(3..=5);
        let plies = rng.gen_range(0..=6);
        let state = random_state(rng, width, height, plies);
        if !state.is_terminal() {
            return state;
        }
    }
}
