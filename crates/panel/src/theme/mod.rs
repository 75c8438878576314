//! Theme system: Tera templates for the panel pages.

mod engine;

pub use engine::{PageFrame, ThemeEngine};
