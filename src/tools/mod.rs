//! Macrolog Tools module
//!
//! MCP tool implementations for Macrolog.

pub mod foods;
pub mod goals;
pub mod log;
pub mod search;
pub mod status;
pub mod units;
