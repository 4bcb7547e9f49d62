mod load;
mod model;
mod parse;
pub mod urgency;

pub use load::load_board;
pub use model::{Board, StatusCounts, TaskRecord, TaskStatus, compare_due};
