//! Version and build metadata embedded by `build.rs`

use serde::Serialize;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, Clone, Serialize)]
pub struct BuildInfo {
    pub version: &'static str,
    pub build_number: u64,
    /// UTC, `YYYY-MM-DDTHH:MM:SSZ`, or "unknown" outside cargo
    pub build_timestamp: &'static str,
}

impl BuildInfo {
    pub fn current() -> Self {
        Self {
            version: VERSION,
            build_number: parse_build_number(option_env!("MACROLOG_BUILD_NUMBER")),
            build_timestamp: option_env!("MACROLOG_BUILD_TIMESTAMP").unwrap_or("unknown"),
        }
    }
}

fn parse_build_number(raw: Option<&str>) -> u64 {
    raw.and_then(|s| s.trim().parse().ok()).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_build_number() {
        assert_eq!(parse_build_number(Some("42")), 42);
        assert_eq!(parse_build_number(Some(" 7\n")), 7);
        assert_eq!(parse_build_number(Some("4x2")), 0);
        assert_eq!(parse_build_number(None), 0);
    }

    #[test]
    fn test_current_version() {
        assert_eq!(BuildInfo::current().version, env!("CARGO_PKG_VERSION"));
    }
}
