pub mod dimension;
pub mod geometry;
pub mod slider;
