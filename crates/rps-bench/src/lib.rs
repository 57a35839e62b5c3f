pub mod arena;
pub mod config;
pub mod logging;
pub mod opponents;
