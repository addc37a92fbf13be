pub mod danger;
pub mod match_history;
pub mod team;
