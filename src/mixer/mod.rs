pub mod composer;
pub mod driver;
pub mod scheduler;
pub mod state;
pub mod stream;

#[cfg(test)]
#[path = "../../tests/unit/mixer/compose.rs"]
mod tests;
