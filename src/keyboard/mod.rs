pub mod display;
pub mod observed;
pub mod platform;
