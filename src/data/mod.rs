pub mod loader;
pub mod pokemon;
