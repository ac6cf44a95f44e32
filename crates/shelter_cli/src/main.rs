//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `shelter_core` linkage.
//! - Keep output deterministic for quick local sanity checks.

fn main() {
    println!("shelter_core ping={}", shelter_core::ping());
    println!("shelter_core version={}", shelter_core::core_version());
}
