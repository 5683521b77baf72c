//! Macrolog Library
//!
//! Food search normalization, nutrition validation and daily logging.

pub mod build_info;
pub mod db;
pub mod mcp;
pub mod models;
pub mod nutrition;
pub mod sources;
pub mod tools;
