pub mod client;
pub mod heuristics;
