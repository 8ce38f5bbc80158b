pub mod blame;
pub mod cli;
pub mod config;
pub mod error;
pub mod filter;
pub mod git;
pub mod langs;
pub mod model;
pub mod report;
pub mod stats;
