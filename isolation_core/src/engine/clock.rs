//! Turn timing: the time-remaining signal handed to the search and the deadline check
//! performed at every search node.

use thiserror::Error;

/// Raised when the time left in the turn drops below the engine's threshold. It only
/// travels inside a single decision and never reaches the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("search deadline reached")]
pub struct SearchTimeout;

/// Milliseconds left before the mover forfeits. Must be cheap to call and must never
/// increase between calls within one turn.
pub trait TimeOracle {
    fn time_remaining(&self) -> f64;
}

impl<F> TimeOracle for F
where
    F: Fn() -> f64,
{
    fn time_remaining(&self) -> f64 {
        self()
    }
}

/// Monotonic milliseconds since an arbitrary process-wide origin.
#[must_use]
pub fn now() -> f64 {
    #[cfg(target_arch = "wasm32")]
    {
        use wasm_bindgen::JsCast;
        if let Some(window) = web_sys::window() {
            return window.performance().map_or(0.0, |p| p.now());
        }
        let global = js_sys::global();
        if let Ok(worker) = global.dyn_into::<web_sys::WorkerGlobalScope>() {
            return worker.performance().map_or(0.0, |p| p.now());
        }
        0.0
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        use std::sync::OnceLock;
        use std::time::Instant;
        static ORIGIN: OnceLock<Instant> = OnceLock::new();
        ORIGIN.get_or_init(Instant::now).elapsed().as_secs_f64() * 1000.0
    }
}

/// Wall-clock budget for one turn, started when the turn begins.
#[derive(Debug, Clone, Copy)]
pub struct TurnClock {
    started: f64,
    budget_ms: f64,
}

impl TurnClock {
    #[must_use]
    pub fn start(budget_ms: u64) -> Self {
        #[allow(clippy::cast_precision_loss)]
        let budget_ms = budget_ms as f64;
        Self {
            started: now(),
            budget_ms,
        }
    }

    #[must_use]
    pub fn elapsed_ms(&self) -> f64 {
        now() - self.started
    }

    /// A move returned after this point loses the game on time.
    #[must_use]
    pub fn has_forfeited(&self) -> bool {
        self.time_remaining() < 0.0
    }
}

impl TimeOracle for TurnClock {
    fn time_remaining(&self) -> f64 {
        self.budget_ms - self.elapsed_ms()
    }
}

/// Pairs a time oracle with the safety margin the engine keeps in reserve.
#[derive(Clone, Copy)]
pub struct Deadline<'a> {
    time_left: Option<&'a dyn TimeOracle>,
    threshold: f64,
}

impl<'a> Deadline<'a> {
    #[must_use]
    pub const fn new(time_left: &'a dyn TimeOracle, threshold: f64) -> Self {
        Self {
            time_left: Some(time_left),
            threshold,
        }
    }

    /// A deadline that never trips.
    #[must_use]
    pub const fn unbounded() -> Self {
        Self {
            time_left: None,
            threshold: 0.0,
        }
    }

    #[must_use]
    pub const fn is_bounded(&self) -> bool {
        self.time_left.is_some()
    }

    /// # Errors
    ///
    /// Returns [`SearchTimeout`] once the oracle reports less time than the threshold.
    #[inline]
    pub fn check(&self) -> Result<(), SearchTimeout> {
        match self.time_left {
            Some(oracle) if oracle.time_remaining() < self.threshold => Err(SearchTimeout),
            _ => Ok(()),
        }
    }
}
