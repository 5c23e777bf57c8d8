pub mod matcher;
pub mod pool;
pub mod timer;
