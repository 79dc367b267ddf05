use crate::engine::clock::{self, Deadline, SearchTimeout, TimeOracle, TurnClock};
use crate::engine::config::EngineConfig;
use crate::engine::eval::HeuristicEvaluator;
use crate::engine::{Evaluator, SearchLimit, SearchStats, Searcher};
use crate::logic::board::Coord;
use crate::logic::game::{GameState, Player};
use std::sync::Arc;

pub struct AlphaBetaEngine<E: Evaluator = HeuristicEvaluator> {
    config: Arc<EngineConfig>,
    evaluator: E,
    perspective: Player,
    nodes_searched: u64,
    evaluations: u64,
}

impl AlphaBetaEngine {
    #[must_use]
    pub fn new(config: Arc<EngineConfig>) -> Self {
        let evaluator = HeuristicEvaluator::new(config.clone());
        Self::with_evaluator(config, evaluator)
    }

    pub fn update_config(&mut self, config: Arc<EngineConfig>) {
        self.evaluator = HeuristicEvaluator::new(config.clone());
        self.config = config;
    }
}

impl<E: Evaluator> AlphaBetaEngine<E> {
    #[must_use]
    pub const fn with_evaluator(config: Arc<EngineConfig>, evaluator: E) -> Self {
        Self {
            config,
            evaluator,
            perspective: Player::One,
            nodes_searched: 0,
            evaluations: 0,
        }
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[must_use]
    pub const fn nodes_searched(&self) -> u64 {
        self.nodes_searched
    }

    #[must_use]
    pub const fn evaluations(&self) -> u64 {
        self.evaluations
    }

    /// Deepest iteration worth running: one ply per blank cell, capped by `max_depth`.
    #[must_use]
    pub fn max_search_depth(&self, state: &GameState) -> u8 {
        let blanks = u8::try_from(state.board().blank_count()).unwrap_or(u8::MAX);
        self.config.max_depth.map_or(blanks, |cap| blanks.min(cap))
    }

    /// Fixed-depth alpha-beta, ignoring the clock.
    pub fn decide(&mut self, state: &GameState, depth: u8) -> Option<Coord> {
        self.decide_with_score(state, depth).map(|(mv, _)| mv)
    }

    pub fn decide_with_score(&mut self, state: &GameState, depth: u8) -> Option<(Coord, f64)> {
        self.reset(state);
        let mut work = *state;
        self.alpha_beta(
            &mut work,
            depth,
            f64::NEG_INFINITY,
            f64::INFINITY,
            &Deadline::unbounded(),
        )
        .ok()
        .flatten()
    }

    /// Deepens one ply at a time until the deadline trips or the game tree is
    /// exhausted, and returns the best move of the last completed iteration.
    pub fn iterative_deepening(
        &mut self,
        state: &GameState,
        time_left: &dyn TimeOracle,
    ) -> Option<(Coord, SearchStats)> {
        let deadline = Deadline::new(time_left, self.config.timer_threshold_ms);
        let max_depth = self.max_search_depth(state);
        self.deepen(state, max_depth, &deadline)
    }

    fn deepen(
        &mut self,
        state: &GameState,
        max_depth: u8,
        deadline: &Deadline<'_>,
    ) -> Option<(Coord, SearchStats)> {
        let start = clock::now();
        self.reset(state);

        // Committed before the first deadline check so a timeout still returns a move.
        let mut best_move = state.legal_moves().first()?;
        let mut best_score = None;
        let mut final_depth = 0;
        let mut timed_out = false;

        let mut work = *state;
        for depth in 1..=max_depth {
            match self.alpha_beta(
                &mut work,
                depth,
                f64::NEG_INFINITY,
                f64::INFINITY,
                deadline,
            ) {
                Ok(Some((mv, score))) => {
                    best_move = mv;
                    best_score = Some(score);
                    final_depth = depth;
                    log::debug!(
                        "depth {depth}: best {mv} score {score} ({} nodes, {} evaluations)",
                        self.nodes_searched,
                        self.evaluations
                    );
                }
                Ok(None) => break,
                Err(SearchTimeout) => {
                    timed_out = true;
                    break;
                }
            }
        }
        debug_assert_eq!(work, *state, "search left the root state modified");

        if timed_out && final_depth == 0 {
            log::warn!("deadline reached before depth 1 completed, playing {best_move}");
        }

        let elapsed = clock::now() - start;
        Some((
            best_move,
            SearchStats {
                depth: final_depth,
                nodes: self.nodes_searched,
                evaluations: self.evaluations,
                #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                time_ms: elapsed as u64,
                timed_out,
                score: best_score,
            },
        ))
    }

    const fn reset(&mut self, state: &GameState) {
        self.perspective = state.active_player();
        self.nodes_searched = 0;
        self.evaluations = 0;
    }

    fn evaluate(&mut self, state: &GameState) -> f64 {
        self.evaluations += 1;
        self.evaluator.evaluate(state, self.perspective)
    }

    /// Root layer. Keeps the first move among equal scores.
    fn alpha_beta(
        &mut self,
        state: &mut GameState,
        depth: u8,
        mut alpha: f64,
        beta: f64,
        deadline: &Deadline<'_>,
    ) -> Result<Option<(Coord, f64)>, SearchTimeout> {
        deadline.check()?;
        self.nodes_searched += 1;

        let moves = state.legal_moves();
        let Some(first) = moves.first() else {
            return Ok(None);
        };

        let mut best_move = first;
        let mut best_score = f64::NEG_INFINITY;
        for mv in moves {
            let undo = state.apply_move(mv);
            let score = self.min_value(state, depth.saturating_sub(1), alpha, beta, deadline);
            state.undo_move(undo);
            let score = score?;
            if score > best_score {
                best_score = score;
                best_move = mv;
            }
            if best_score >= beta {
                break;
            }
            alpha = alpha.max(best_score);
        }
        Ok(Some((best_move, best_score)))
    }

    fn min_value(
        &mut self,
        state: &mut GameState,
        depth: u8,
        alpha: f64,
        mut beta: f64,
        deadline: &Deadline<'_>,
    ) -> Result<f64, SearchTimeout> {
        deadline.check()?;
        self.nodes_searched += 1;
        if depth == 0 {
            return Ok(self.evaluate(state));
        }
        let moves = state.legal_moves();
        if moves.is_empty() {
            return Ok(self.evaluate(state));
        }

        let mut value = f64::INFINITY;
        for mv in moves {
            let undo = state.apply_move(mv);
            let score = self.max_value(state, depth - 1, alpha, beta, deadline);
            state.undo_move(undo);
            value = value.min(score?);
            if value <= alpha {
                return Ok(value);
            }
            beta = beta.min(value);
        }
        Ok(value)
    }

    fn max_value(
        &mut self,
        state: &mut GameState,
        depth: u8,
        mut alpha: f64,
        beta: f64,
        deadline: &Deadline<'_>,
    ) -> Result<f64, SearchTimeout> {
        deadline.check()?;
        self.nodes_searched += 1;
        if depth == 0 {
            return Ok(self.evaluate(state));
        }
        let moves = state.legal_moves();
        if moves.is_empty() {
            return Ok(self.evaluate(state));
        }

        let mut value = f64::NEG_INFINITY;
        for mv in moves {
            let undo = state.apply_move(mv);
            let score = self.min_value(state, depth - 1, alpha, beta, deadline);
            state.undo_move(undo);
            value = value.max(score?);
            if value >= beta {
                return Ok(value);
            }
            alpha = alpha.max(value);
        }
        Ok(value)
    }
}

impl<E: Evaluator> Searcher for AlphaBetaEngine<E> {
    fn search(&mut self, game_state: &GameState, limit: SearchLimit) -> Option<(Coord, SearchStats)> {
        match limit {
            SearchLimit::Depth(depth) => self.deepen(game_state, depth.max(1), &Deadline::unbounded()),
            SearchLimit::Time(budget_ms) => {
                let turn_clock = TurnClock::start(budget_ms);
                let result = self.iterative_deepening(game_state, &turn_clock);
                if turn_clock.has_forfeited() {
                    log::warn!(
                        "search overran its {budget_ms} ms budget by {:.1} ms",
                        -turn_clock.time_remaining()
                    );
                }
                result
            }
        }
    }

    fn get_move(&mut self, game_state: &GameState, time_left: &dyn TimeOracle) -> Option<Coord> {
        self.iterative_deepening(game_state, time_left)
            .map(|(mv, _)| mv)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::config::Heuristic;
    use crate::engine::minimax::MinimaxEngine;
    use crate::logic::board::BoardConfig;

    fn outcome_config() -> Arc<EngineConfig> {
        Arc::new(EngineConfig {
            heuristic: Heuristic::Outcome,
            ..EngineConfig::default()
        })
    }

    fn tiny() -> GameState {
        GameState::with_config(&BoardConfig::new(3, 2)).unwrap()
    }

    // 3x3, reserved corner, player one on (0,0) and player two on (1,1).
    fn three_by_three() -> GameState {
        let mut state = GameState::with_config(&BoardConfig::new(3, 3)).unwrap();
        state.make_move(Coord::new(0, 0)).unwrap();
        state.make_move(Coord::new(1, 1)).unwrap();
        state
    }

    #[test]
    fn test_generous_clock_solves_three_by_two() {
        let mut engine = AlphaBetaEngine::new(outcome_config());
        let (mv, stats) = engine
            .iterative_deepening(&tiny(), &|| f64::INFINITY)
            .unwrap();
        assert_eq!(mv, Coord::new(0, 0));
        assert_eq!(stats.depth, 5);
        assert!(!stats.timed_out);
        assert_eq!(stats.score, Some(f64::INFINITY));
    }

    #[test]
    fn test_expired_clock_returns_first_legal_move() {
        let state = GameState::new();
        let mut engine = AlphaBetaEngine::new(Arc::new(EngineConfig::default()));
        let (mv, stats) = engine.iterative_deepening(&state, &|| 0.0).unwrap();
        assert_eq!(Some(mv), state.legal_moves().first());
        assert!(stats.timed_out);
        assert_eq!(stats.depth, 0);
        assert_eq!(stats.score, None);
        assert_eq!(stats.evaluations, 0);
    }

    #[test]
    fn test_no_legal_move() {
        let mut state = tiny();
        for mv in [(0, 0), (1, 0), (1, 1), (2, 0), (0, 1)] {
            state.make_move(mv.into()).unwrap();
        }
        let mut engine = AlphaBetaEngine::new(outcome_config());
        assert_eq!(engine.decide(&state, 2), None);
        assert_eq!(engine.iterative_deepening(&state, &|| f64::INFINITY), None);
        assert_eq!(engine.search(&state, SearchLimit::Time(50)), None);
    }

    #[test]
    fn test_prunes_against_minimax() {
        let state = three_by_three();
        let config = Arc::new(EngineConfig::default());
        let mut alpha_beta = AlphaBetaEngine::new(config.clone());
        let mut minimax = MinimaxEngine::new(config);

        for (depth, score, evaluations) in [(1, -6.0, 4), (2, 0.0, 8), (3, -5.0, 19)] {
            let (mv, ab_score) = alpha_beta.decide_with_score(&state, depth).unwrap();
            assert_eq!(mv, Coord::new(1, 0));
            assert!((ab_score - score).abs() < f64::EPSILON);
            assert_eq!(alpha_beta.evaluations(), evaluations);
            assert_eq!(minimax.decide_with_score(&state, depth), Some((mv, ab_score)));
            assert!(alpha_beta.evaluations() <= minimax.evaluations());
        }
    }

    #[test]
    fn test_max_search_depth() {
        let state = GameState::new();
        let mut engine = AlphaBetaEngine::new(Arc::new(EngineConfig::default()));
        assert_eq!(engine.max_search_depth(&state), 48);
        engine.update_config(Arc::new(EngineConfig {
            max_depth: Some(4),
            ..EngineConfig::default()
        }));
        assert_eq!(engine.max_search_depth(&state), 4);
        assert_eq!(engine.max_search_depth(&three_by_three()), 4);
        assert_eq!(engine.max_search_depth(&tiny()), 4);
    }

    #[test]
    fn test_depth_limit_matches_fixed_depth() {
        let state = three_by_three();
        let mut engine = AlphaBetaEngine::new(Arc::new(EngineConfig::default()));
        let (mv, stats) = engine.search(&state, SearchLimit::Depth(3)).unwrap();
        assert_eq!(stats.depth, 3);
        assert!(!stats.timed_out);
        assert_eq!(Some(mv), engine.decide(&state, 3));
    }

    #[test]
    fn test_get_move_is_legal() {
        let state = three_by_three();
        let mut engine = AlphaBetaEngine::new(Arc::new(EngineConfig::default()));
        let mv = engine.get_move(&state, &TurnClock::start(150)).unwrap();
        assert!(state.legal_moves().contains(mv));
    }
}
