use crate::engine::clock::TimeOracle;
use crate::logic::board::Coord;
use crate::logic::game::{GameState, Player};
use serde::{Deserialize, Serialize};

pub mod clock;
pub mod config;
pub mod eval;
pub mod minimax;
pub mod move_list;
pub mod search;

#[cfg(test)]
mod bench_test;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SearchLimit {
    Depth(u8),
    Time(u64), // milliseconds
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SearchStats {
    /// Deepest fully completed iteration. Zero when the deadline hit before depth 1.
    pub depth: u8,
    pub nodes: u64,
    pub evaluations: u64,
    pub time_ms: u64,
    pub timed_out: bool,
    /// Root value of the returned move, from the mover's perspective.
    pub score: Option<f64>,
}

/// Scores a position for `perspective`: `+inf` once that player has won, `-inf` once
/// they have lost, a finite estimate otherwise.
pub trait Evaluator {
    fn evaluate(&self, state: &GameState, perspective: Player) -> f64;
}

impl<F> Evaluator for F
where
    F: Fn(&GameState, Player) -> f64,
{
    fn evaluate(&self, state: &GameState, perspective: Player) -> f64 {
        self(state, perspective)
    }
}

pub trait Searcher {
    /// `None` only when the player to move has no legal move.
    fn search(&mut self, game_state: &GameState, limit: SearchLimit) -> Option<(Coord, SearchStats)>;

    /// Picks a move before `time_left` runs out.
    fn get_move(&mut self, game_state: &GameState, time_left: &dyn TimeOracle) -> Option<Coord>;
}
