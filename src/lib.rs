pub mod config;
pub mod constants;
pub mod emitter;
pub mod error;
pub mod logging;
pub mod metadata;
pub mod pipeline;
pub mod planner;
pub mod types;
