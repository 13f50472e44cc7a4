// Library crate root.
//
// This crate is used both as a binary (src/main.rs) and as a library.
// Keeping modules here prevents "dead_code" warnings for public APIs that are
// intentionally exported for downstream crates.

pub mod canvas;
pub mod config;
pub mod debug_ui;
pub mod desc;
pub mod dpi;
pub mod error;
pub mod recordings;
pub mod scene;
pub mod session;
pub mod trajectory;
pub mod walk;

pub use error::Error;

#[cfg(test)]
pub mod test_helpers;
