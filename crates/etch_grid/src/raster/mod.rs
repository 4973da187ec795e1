pub mod dilate;
pub mod ppm;
