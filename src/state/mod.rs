mod board;
mod selection;

pub use board::{MatchBoard, MatchSummary};
pub use selection::Selection;
