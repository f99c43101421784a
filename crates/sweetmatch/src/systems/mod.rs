pub mod animation;
pub mod board;
pub mod hint;
