//! Crate root module declarations for the mini crazyhouse search engine.
//!
//! This file exposes all top-level subsystems (game state, rules, search,
//! engines and utility helpers) so binaries, benches and external tooling
//! can import stable module paths.

pub mod errors;

pub mod game_state {
    pub mod chess_rules;
    pub mod chess_types;
    pub mod game_state;
}

pub mod moves {
    pub mod move_descriptions;
}

pub mod move_generation {
    pub mod legal_move_apply;
    pub mod legal_move_checks;
    pub mod legal_move_generator;
    pub mod perft;
    pub mod rules_engine;
}

pub mod search {
    pub mod alpha_beta;
    pub mod board_scoring;
    pub mod iterative_deepening;
    pub mod move_cache;
    pub mod move_ordering;
    pub mod quiescence;
    pub mod search_context;
    pub mod state_hasher;
    pub mod threading;
    pub mod transposition_table;
}

pub mod engines {
    pub mod engine_iterative;
    pub mod engine_random;
    pub mod engine_trait;
}

pub mod utils {
    pub mod algebraic;
    pub mod engine_match_harness;
    pub mod fen_generator;
    pub mod fen_parser;
    pub mod long_algebraic;
    pub mod render_game_state;
}
