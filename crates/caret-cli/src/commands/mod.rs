pub mod complete;
pub mod dump;
pub mod loader;
pub mod tokens;

#[cfg(test)]
mod complete_tests;
