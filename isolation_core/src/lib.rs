//! Game-tree search for Isolation: two players on a rectangular grid take turns sliding
//! like chess queens, every visited cell becomes blocked, and whoever cannot move loses.
//!
//! `logic` holds the board and game state, `engine` the evaluators and the minimax and
//! alpha-beta searchers.
#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::indexing_slicing,
        clippy::float_cmp,
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )
)]

pub mod engine;
pub mod logic;
