pub mod events;
pub mod sketch;
