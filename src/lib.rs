//! Crate root module declarations for the chess session service.
//!
//! Exposes the rules engine (position, move generation, status), the session
//! layer, the move sources (heuristic and UCI engine), and the request/response
//! API so the binary, benches and tests can import stable module paths.

pub mod chess_errors;
pub mod config;

pub mod position {
    pub mod chess_rules;
    pub mod chess_types;
    pub mod position;
}

pub mod moves {
    pub mod chess_move;
    pub mod leaper_moves;
    pub mod pawn_moves;
    pub mod sliding_moves;
}

pub mod move_generation {
    pub mod legal_move_apply;
    pub mod legal_move_checks;
    pub mod legal_move_generator;
    pub mod legal_move_shared;
    pub mod legal_moves_king;
    pub mod legal_moves_knight;
    pub mod legal_moves_pawn;
    pub mod legal_moves_sliders;
    pub mod move_generator;
    pub mod perft;
}

pub mod status {
    pub mod game_status;
    pub mod insufficient_material;
}

pub mod session {
    pub mod session;
    pub mod session_handle;
    pub mod session_registry;
}

pub mod engines {
    pub mod engine_greedy;
    pub mod engine_trait;
    pub mod uci_bridge;
}

pub mod api {
    pub mod board_view;
    pub mod chess_service;
    pub mod requests;
    pub mod responses;
    pub mod stdio_loop;
}

pub mod utils {
    pub mod algebraic;
    pub mod fen_generator;
    pub mod fen_parser;
    pub mod long_algebraic;
    pub mod render_position;
}
