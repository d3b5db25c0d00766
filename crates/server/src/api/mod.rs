pub mod board;
pub mod generate;
