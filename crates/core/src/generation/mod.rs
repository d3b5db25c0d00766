//! # Tag Generation
//!
//! Bulk population of the unsorted pool: a completion provider suggests names
//! for a category and an offline keyword table covers whatever it cannot.

pub mod fallback;
pub mod gateway;
pub mod parse;
pub mod prompts;
pub mod provider;

pub use fallback::{fallback, match_group, FallbackGroup};
pub use gateway::{
    normalize_count, GenerateRequest, GenerateResponse, GenerationOutcome, TagGenerator,
    TagSource, DEFAULT_COUNT, MAX_COUNT,
};
pub use provider::{ChatCompletionClient, TextGenerator};
