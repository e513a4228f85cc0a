#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod models;
pub mod normalize;
pub mod patterns;
pub mod pipeline;
pub mod render;
pub mod song;

// Re-export the common types for convenience
pub use error::{PatternError, PatternResult, SongError, SongResult};
pub use models::{Element, Elements, Inline, Inlines, SpanClass};
pub use pipeline::Pipeline;
pub use song::{Song, SongMeta};
