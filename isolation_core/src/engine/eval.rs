use crate::engine::config::{EngineConfig, Heuristic};
use crate::engine::Evaluator;
use crate::logic::game::{GameState, Player};
use std::sync::Arc;

/// Scores positions with the heuristic selected in the engine config.
pub struct HeuristicEvaluator {
    config: Arc<EngineConfig>,
}

impl HeuristicEvaluator {
    #[must_use]
    pub const fn new(config: Arc<EngineConfig>) -> Self {
        Self { config }
    }
}

impl Evaluator for HeuristicEvaluator {
    fn evaluate(&self, state: &GameState, perspective: Player) -> f64 {
        match self.config.heuristic {
            Heuristic::Outcome => outcome_score(state, perspective),
            Heuristic::MoveCount => move_count_score(state, perspective),
            Heuristic::CalibratedMobility => {
                calibrated_mobility_score(state, perspective, self.config.calibration_factor)
            }
            Heuristic::Distance => distance_score(state, perspective),
        }
    }
}

/// `+inf`/`-inf` once the game is decided, otherwise `None`.
fn decided(state: &GameState, player: Player) -> Option<f64> {
    if state.is_loser(player) {
        Some(f64::NEG_INFINITY)
    } else if state.is_winner(player) {
        Some(f64::INFINITY)
    } else {
        None
    }
}

#[allow(clippy::cast_precision_loss)]
fn mobility(state: &GameState, player: Player) -> f64 {
    state.legal_moves_for(player).len() as f64
}

#[must_use]
pub fn outcome_score(state: &GameState, player: Player) -> f64 {
    state.utility(player)
}

/// Mobility difference, weighted by plies played: late in the game the number of
/// remaining moves says more about who is about to be trapped.
#[must_use]
pub fn move_count_score(state: &GameState, player: Player) -> f64 {
    if let Some(score) = decided(state, player) {
        return score;
    }
    let plies = f64::from(state.move_count());
    mobility(state, player).mul_add(plies, -mobility(state, state.opponent(player)) * plies)
}

#[must_use]
pub fn calibrated_mobility_score(state: &GameState, player: Player, factor: f64) -> f64 {
    if let Some(score) = decided(state, player) {
        return score;
    }

    #[allow(clippy::cast_precision_loss)]
    let cells = state.board().cell_count() as f64;
    let filled = f64::from(state.board().occupied_count());
    let plies = f64::from(state.move_count());
    // Approaches `factor` as the board fills; keeps scores small on big boards.
    let calibration = (plies + filled) / cells * factor;

    let own = mobility(state, player) * calibration;
    let opp = mobility(state, state.opponent(player)) * calibration;
    own - opp
}

#[must_use]
pub fn distance_score(state: &GameState, player: Player) -> f64 {
    if let Some(score) = decided(state, player) {
        return score;
    }
    let opponent = state.opponent(player);
    let distance = match (state.location(player), state.location(opponent)) {
        (Some(own), Some(opp)) => own.distance(opp),
        _ => 0.0,
    };
    mobility(state, player) + distance - mobility(state, opponent)
}
