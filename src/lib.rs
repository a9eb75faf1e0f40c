pub mod cache;
pub mod cli;
pub mod config;
pub mod error;
pub mod media;
pub mod output;
pub mod pipeline;
pub mod size;
pub mod sources;
