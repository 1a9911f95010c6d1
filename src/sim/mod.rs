pub mod content;
pub mod debate;
pub mod formulas;
pub mod game;
pub mod interactions;
pub mod offline;
pub mod state;
pub mod tick;
