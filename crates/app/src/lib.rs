pub mod config;
pub mod guidance;
pub mod position;
pub mod runtime;
