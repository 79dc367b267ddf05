use crate::engine::clock::{self, Deadline, SearchTimeout, TimeOracle, TurnClock};
use crate::engine::config::EngineConfig;
use crate::engine::eval::HeuristicEvaluator;
use crate::engine::{Evaluator, SearchLimit, SearchStats, Searcher};
use crate::logic::board::Coord;
use crate::logic::game::{GameState, Player};
use std::sync::Arc;

/// Plain depth-limited minimax. Every node below the root is expanded.
pub struct MinimaxEngine<E: Evaluator = HeuristicEvaluator> {
    config: Arc<EngineConfig>,
    evaluator: E,
    perspective: Player,
    nodes_searched: u64,
    evaluations: u64,
}

impl MinimaxEngine {
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

impl<E: Evaluator> MinimaxEngine<E> {
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

    /// Nodes visited by the last decision.
    #[must_use]
    pub const fn nodes_searched(&self) -> u64 {
        self.nodes_searched
    }

    /// Evaluator calls made by the last decision.
    #[must_use]
    pub const fn evaluations(&self) -> u64 {
        self.evaluations
    }

    /// Best move `depth` plies deep, ignoring the clock.
    pub fn decide(&mut self, state: &GameState, depth: u8) -> Option<Coord> {
        self.decide_with_score(state, depth).map(|(mv, _)| mv)
    }

    pub fn decide_with_score(&mut self, state: &GameState, depth: u8) -> Option<(Coord, f64)> {
        self.reset(state);
        let mut work = *state;
        // An unbounded deadline never trips.
        self.root(&mut work, depth, &Deadline::unbounded())
            .ok()
            .flatten()
    }

    /// Searches to the end of the game.
    pub fn solve(&mut self, state: &GameState) -> Option<Coord> {
        let depth = u8::try_from(state.board().blank_count()).unwrap_or(u8::MAX);
        self.decide(state, depth)
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

    fn root(
        &mut self,
        state: &mut GameState,
        depth: u8,
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
            let score = self.min_value(state, depth.saturating_sub(1), deadline);
            state.undo_move(undo);
            let score = score?;
            if score > best_score {
                best_score = score;
                best_move = mv;
            }
        }
        Ok(Some((best_move, best_score)))
    }

    fn min_value(
        &mut self,
        state: &mut GameState,
        depth: u8,
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
            let score = self.max_value(state, depth - 1, deadline);
            state.undo_move(undo);
            value = value.min(score?);
        }
        Ok(value)
    }

    fn max_value(
        &mut self,
        state: &mut GameState,
        depth: u8,
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
            let score = self.min_value(state, depth - 1, deadline);
            state.undo_move(undo);
            value = value.max(score?);
        }
        Ok(value)
    }

    /// Fixed-depth search under a deadline. On timeout the first legal move is played.
    fn timed(&mut self, state: &GameState, deadline: &Deadline<'_>) -> Option<(Coord, SearchStats)> {
        let start = clock::now();
        self.reset(state);
        let first = state.legal_moves().first()?;
        let depth = self.config.search_depth;

        let mut work = *state;
        let result = self.root(&mut work, depth, deadline);
        debug_assert_eq!(work, *state, "search left the root state modified");

        let (mv, stats) = match result {
            Ok(best) => {
                let (mv, score) = best?;
                let stats = SearchStats {
                    depth,
                    score: Some(score),
                    ..SearchStats::default()
                };
                (mv, stats)
            }
            Err(SearchTimeout) => {
                log::warn!("minimax timed out at depth {depth}, playing first legal move {first}");
                let stats = SearchStats {
                    timed_out: true,
                    ..SearchStats::default()
                };
                (first, stats)
            }
        };

        let elapsed = clock::now() - start;
        Some((
            mv,
            SearchStats {
                nodes: self.nodes_searched,
                evaluations: self.evaluations,
                #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                time_ms: elapsed as u64,
                ..stats
            },
        ))
    }
}

impl<E: Evaluator> Searcher for MinimaxEngine<E> {
    fn search(&mut self, game_state: &GameState, limit: SearchLimit) -> Option<(Coord, SearchStats)> {
        match limit {
            SearchLimit::Depth(depth) => {
                let start = clock::now();
                let (mv, score) = self.decide_with_score(game_state, depth)?;
                let elapsed = clock::now() - start;
                Some((
                    mv,
                    SearchStats {
                        depth,
                        nodes: self.nodes_searched,
                        evaluations: self.evaluations,
                        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                        time_ms: elapsed as u64,
                        timed_out: false,
                        score: Some(score),
                    },
                ))
            }
            SearchLimit::Time(budget_ms) => {
                let turn_clock = TurnClock::start(budget_ms);
                let deadline = Deadline::new(&turn_clock, self.config.timer_threshold_ms);
                self.timed(game_state, &deadline)
            }
        }
    }

    fn get_move(&mut self, game_state: &GameState, time_left: &dyn TimeOracle) -> Option<Coord> {
        let deadline = Deadline::new(time_left, self.config.timer_threshold_ms);
        self.timed(game_state, &deadline).map(|(mv, _)| mv)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::config::Heuristic;
    use crate::logic::board::BoardConfig;

    fn outcome_engine() -> MinimaxEngine {
        MinimaxEngine::new(Arc::new(EngineConfig {
            heuristic: Heuristic::Outcome,
            ..EngineConfig::default()
        }))
    }

    fn tiny() -> GameState {
        GameState::with_config(&BoardConfig::new(3, 2)).unwrap()
    }

    #[test]
    fn test_solves_three_by_two_opening() {
        let mut engine = outcome_engine();
        let state = tiny();
        let mv = engine.solve(&state).unwrap();
        assert!(
            [Coord::new(0, 0), Coord::new(2, 0), Coord::new(0, 1)].contains(&mv),
            "{mv} loses"
        );
        // First winning move in row-major order.
        assert_eq!(mv, Coord::new(0, 0));
        let (_, score) = engine.decide_with_score(&state, 5).unwrap();
        assert_eq!(score, f64::INFINITY);
    }

    #[test]
    fn test_no_legal_move() {
        let mut state = tiny();
        for mv in [(0, 0), (1, 0), (1, 1), (2, 0), (0, 1)] {
            state.make_move(mv.into()).unwrap();
        }
        let mut engine = outcome_engine();
        assert_eq!(engine.decide(&state, 3), None);
        assert_eq!(engine.search(&state, SearchLimit::Depth(3)), None);
        assert_eq!(engine.get_move(&state, &|| f64::INFINITY), None);
    }

    #[test]
    fn test_counts_every_leaf() {
        // 3x3, reserved corner, player one on (0,0) and player two on (1,1).
        let mut state = GameState::with_config(&BoardConfig::new(3, 3)).unwrap();
        state.make_move(Coord::new(0, 0)).unwrap();
        state.make_move(Coord::new(1, 1)).unwrap();
        let mut engine = MinimaxEngine::new(Arc::new(EngineConfig::default()));

        let (mv, stats) = engine.search(&state, SearchLimit::Depth(1)).unwrap();
        assert_eq!(mv, Coord::new(1, 0));
        assert_eq!(stats.evaluations, 4);
        assert_eq!(stats.score, Some(-6.0));

        let (mv, stats) = engine.search(&state, SearchLimit::Depth(2)).unwrap();
        assert_eq!(mv, Coord::new(1, 0));
        assert_eq!(stats.evaluations, 20);
        assert_eq!(stats.score, Some(0.0));

        let (mv, stats) = engine.search(&state, SearchLimit::Depth(3)).unwrap();
        assert_eq!(mv, Coord::new(1, 0));
        assert_eq!(stats.evaluations, 40);
        assert_eq!(stats.score, Some(-5.0));
    }

    #[test]
    fn test_depth_zero_behaves_as_depth_one() {
        let state = tiny().forecast(Coord::new(0, 0)).unwrap();
        let mut engine = MinimaxEngine::new(Arc::new(EngineConfig::default()));
        assert_eq!(engine.decide(&state, 0), engine.decide(&state, 1));
    }

    #[test]
    fn test_expired_clock_plays_first_legal_move() {
        let state = GameState::new();
        let mut engine = MinimaxEngine::new(Arc::new(EngineConfig::default()));
        let mv = engine.get_move(&state, &|| 0.0).unwrap();
        assert_eq!(Some(mv), state.legal_moves().first());

        let (_, stats) = engine.timed(&state, &Deadline::new(&|| 0.0, 10.0)).unwrap();
        assert!(stats.timed_out);
        assert_eq!(stats.depth, 0);
        assert_eq!(stats.score, None);
    }

    #[test]
    fn test_custom_evaluator() {
        // Prefers cells further down and to the right.
        let corner = |state: &GameState, player: Player| {
            state
                .location(player)
                .map_or(0.0, |c| f64::from(c.col) + f64::from(c.row))
        };
        let mut engine = MinimaxEngine::with_evaluator(Arc::new(EngineConfig::default()), corner);
        assert_eq!(engine.decide(&tiny(), 1), Some(Coord::new(2, 0)));
    }
}
