/// Character Forge - randomized TTRPG characters
///
/// Core library providing the character forge, the biography fallback
/// policy with an optional local-LLM backend, and file export.

pub mod config;
pub mod core;
pub mod menu;

#[cfg(test)]
mod tests;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
