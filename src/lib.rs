pub mod app;
pub mod board;
pub mod bubbles;
pub mod util;
