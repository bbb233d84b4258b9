pub mod pool;
pub mod sink;
pub mod source;
