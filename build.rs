//! Embeds the build counter and build time reported by `macrolog_status`.
//!
//! CI can pin either value: `MACROLOG_BUILD_NUMBER` replaces the local counter
//! and `SOURCE_DATE_EPOCH` replaces the clock.

use std::env;
use std::fs;
use std::path::Path;

const COUNTER_FILE: &str = "build_number.txt";

fn next_local_build() -> u64 {
    let counter = Path::new(COUNTER_FILE);
    let previous = fs::read_to_string(counter)
        .ok()
        .and_then(|s| s.trim().parse::<u64>().ok())
        .unwrap_or(0);
    let next = previous + 1;

    if let Err(e) = fs::write(counter, next.to_string()) {
        println!("cargo:warning=build counter not saved: {}", e);
    }
    next
}

fn build_number() -> u64 {
    env::var("MACROLOG_BUILD_NUMBER")
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or_else(next_local_build)
}

fn build_timestamp() -> String {
    let pinned = env::var("SOURCE_DATE_EPOCH")
        .ok()
        .and_then(|s| s.trim().parse::<i64>().ok())
        .and_then(|secs| chrono::DateTime::from_timestamp(secs, 0));

    pinned
        .unwrap_or_else(chrono::Utc::now)
        .format("%Y-%m-%dT%H:%M:%SZ")
        .to_string()
}

fn main() {
    println!("cargo:rerun-if-changed=src");
    println!("cargo:rerun-if-env-changed=MACROLOG_BUILD_NUMBER");
    println!("cargo:rerun-if-env-changed=SOURCE_DATE_EPOCH");

    println!("cargo:rustc-env=MACROLOG_BUILD_NUMBER={}", build_number());
    println!("cargo:rustc-env=MACROLOG_BUILD_TIMESTAMP={}", build_timestamp());
}
