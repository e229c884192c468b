//! Action tree produced by the grammar

pub mod nodes;

pub use nodes::{Action, Direction, Modifier};
