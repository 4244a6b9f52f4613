pub mod branch;
pub mod config;
pub mod errors;
pub mod extract;
pub mod relay;
