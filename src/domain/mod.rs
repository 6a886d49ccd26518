// Domain layer - Core types, configuration and errors

pub mod config;
pub mod errors;
pub mod model;
