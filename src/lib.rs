pub mod action;
pub mod bench;
pub mod config;
pub mod domain;
pub mod fluent;
pub mod heuristic;
pub mod problem;
pub mod search;
pub mod stat;
pub mod state;
