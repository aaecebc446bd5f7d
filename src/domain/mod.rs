pub mod ai;
pub mod entity;
pub mod grid;
pub mod mode;
pub mod target;
pub mod tile;
