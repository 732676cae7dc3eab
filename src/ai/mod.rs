pub mod heuristic;

pub use heuristic::{HeuristicSelector, select_automated_move};
