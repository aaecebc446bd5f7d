pub mod collision;
pub mod event;
pub mod level;
pub mod step;
pub mod world;
