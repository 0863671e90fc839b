pub mod loader;
pub mod target;
