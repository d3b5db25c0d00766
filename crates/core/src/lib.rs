//! # Tier List Core
//!
//! Business logic for the tier list ranking tool: the ranking board and the
//! AI-assisted tag generation flow. Rendering and drag gestures live in the
//! client; everything here is plain owned state plus one async gateway.
//!
//! ## Architecture
//!
//! - `state/` - Tags, rank levels, the ranking state, selection, and the `Board` that owns them
//! - `generation/` - Provider client, response parsing, fallback table, and the generation gateway
//! - `models` - Completion provider configuration
//! - `error` - Domain error type
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use tierlist_core::generation::{ChatCompletionClient, TagGenerator};
//! use tierlist_core::models::ModelConfig;
//! use tierlist_core::state::Board;
//!
//! let client = ChatCompletionClient::new(ModelConfig::default())?;
//! let generator = TagGenerator::new(Arc::new(client));
//! let outcome = generator.generate("奶茶", 5, None).await?;
//!
//! let mut board = Board::new();
//! board.add_tags(outcome.tags)?;
//! ```

pub mod error;
pub mod generation;
pub mod models;
pub mod state;

pub use error::{TierError, TierResult};
