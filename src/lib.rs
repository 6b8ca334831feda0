pub mod config;
pub mod loader;
pub mod planner;
pub mod report;
pub mod types;
