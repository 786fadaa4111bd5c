// Library exports for the Oware solver
// This allows the server, the replay tool and the tests to share the rules and search

pub mod bot;
pub mod config;
pub mod debug_logger;
pub mod error;
pub mod game;
pub mod handler;
pub mod replay;
pub mod rules;
pub mod search;
pub mod simple_profiler;
pub mod types;
