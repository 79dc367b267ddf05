#[cfg(test)]
mod tests {
    use crate::engine::config::EngineConfig;
    use crate::engine::minimax::MinimaxEngine;
    use crate::engine::search::AlphaBetaEngine;
    use crate::engine::{SearchLimit, Searcher};
    use crate::logic::board::Coord;
    use crate::logic::game::GameState;
    use std::sync::Arc;

    fn midgame() -> GameState {
        let mut game_state = GameState::new();
        for mv in [(3, 3), (2, 4), (5, 1), (4, 4), (5, 5), (4, 0)] {
            game_state.make_move(Coord::from(mv)).unwrap();
        }
        game_state
    }

    #[test]
    fn bench_opening() {
        println!("--- Benchmarking Opening ---");
        let config = Arc::new(EngineConfig::default());
        let mut engine = AlphaBetaEngine::new(config);
        let game_state = GameState::new();

        // Warmup
        engine.search(&game_state, SearchLimit::Depth(2));

        let start = std::time::Instant::now();
        let result = engine.search(&game_state, SearchLimit::Depth(3));
        let duration = start.elapsed();

        if let Some((_mv, stats)) = result {
            println!("Opening Depth 3 stats: {stats:?}");
            println!("Time taken: {duration:?}");
            let nps = (stats.nodes as f64 / duration.as_secs_f64()) as u64;
            println!("NPS: {nps}");
        } else {
            panic!("Search returned None");
        }
    }

    #[test]
    fn bench_midgame() {
        println!("--- Benchmarking Midgame ---");
        let config = Arc::new(EngineConfig::default());
        let mut engine = AlphaBetaEngine::new(config);
        let game_state = midgame();

        let start = std::time::Instant::now();
        let result = engine.search(&game_state, SearchLimit::Depth(5));
        let duration = start.elapsed();

        if let Some((_mv, stats)) = result {
            println!("Midgame Depth 5 stats: {stats:?}");
            println!("Time taken: {duration:?}");
            let nps = (stats.nodes as f64 / duration.as_secs_f64()) as u64;
            println!("NPS: {nps}");
        } else {
            panic!("Search returned None");
        }
    }

    #[test]
    fn bench_pruning_gain() {
        println!("--- Benchmarking Pruning Gain (depth 4) ---");
        let config = Arc::new(EngineConfig::default());
        let mut alpha_beta = AlphaBetaEngine::new(config.clone());
        let mut minimax = MinimaxEngine::new(config);
        let game_state = midgame();

        let ab = alpha_beta.decide_with_score(&game_state, 4).unwrap();
        let mm = minimax.decide_with_score(&game_state, 4).unwrap();

        println!(
            "Alpha-beta: {} evaluations, {} nodes",
            alpha_beta.evaluations(),
            alpha_beta.nodes_searched()
        );
        println!(
            "Minimax:    {} evaluations, {} nodes",
            minimax.evaluations(),
            minimax.nodes_searched()
        );
        assert_eq!(ab, mm);
        assert!(alpha_beta.evaluations() <= minimax.evaluations());
    }
}
