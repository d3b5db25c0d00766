//! # Tags
//!
//! The small labeled items that get ranked. Tags are plain values; which
//! bucket owns a tag is tracked by the ranking state, not by the tag itself.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::{TierError, TierResult};

pub const EMPTY_CONTENT_MESSAGE: &str = "词条名称不能为空";
pub const MISSING_IMAGE_MESSAGE: &str = "图片词条需要提供图片地址";

/// How a tag is displayed
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum TagKind {
    /// Text only
    #[default]
    Text,
    /// Image only (content is used as alt text)
    Image,
    /// Image with a caption
    Mixed,
}

impl TagKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Image => "image",
            Self::Mixed => "mixed",
        }
    }

    /// Parse a kind name, `None` for anything unknown
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "text" => Some(Self::Text),
            "image" => Some(Self::Image),
            "mixed" => Some(Self::Mixed),
            _ => None,
        }
    }

    /// Whether tags of this kind carry an image reference
    pub fn uses_image(&self) -> bool {
        matches!(self, Self::Image | Self::Mixed)
    }
}

/// Where a tag id was minted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdPrefix {
    /// Typed in by the user
    Manual,
    /// Suggested by the completion provider
    Ai,
    /// Taken from the offline fallback table
    Fallback,
}

impl IdPrefix {
    fn as_str(&self) -> &'static str {
        match self {
            Self::Manual => "tag",
            Self::Ai => "ai",
            Self::Fallback => "fb",
        }
    }
}

/// A rankable item
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
    /// Unique tag identifier
    pub id: String,
    /// Display kind
    #[serde(rename = "type", default)]
    pub kind: TagKind,
    /// Display text
    pub content: String,
    /// Image reference for `image` and `mixed` tags
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// Creation time, epoch milliseconds
    pub created_at: i64,
    /// Last update time, epoch milliseconds
    pub updated_at: i64,
}

impl Tag {
    /// Build a tag with a fresh id. An image reference given to a `text` tag
    /// is dropped.
    pub fn new(
        prefix: IdPrefix,
        kind: TagKind,
        content: impl Into<String>,
        image_url: Option<String>,
    ) -> Self {
        let now = Utc::now().timestamp_millis();
        let image_url = if kind.uses_image() {
            image_url.filter(|url| !url.trim().is_empty())
        } else {
            None
        };

        Self {
            id: generate_tag_id(prefix),
            kind,
            content: content.into(),
            image_url,
            created_at: now,
            updated_at: now,
        }
    }

    /// A plain text tag
    pub fn text(prefix: IdPrefix, content: impl Into<String>) -> Self {
        Self::new(prefix, TagKind::Text, content, None)
    }

    /// Normalize in place before the tag goes on a board. Content is trimmed
    /// and must not be empty. Only `image` and `mixed` tags keep an image
    /// reference, and they must have one.
    pub fn validate(&mut self) -> TierResult<()> {
        let content = self.content.trim();
        if content.is_empty() {
            return Err(TierError::Validation(EMPTY_CONTENT_MESSAGE.to_string()));
        }
        self.content = content.to_string();

        if !self.kind.uses_image() {
            self.image_url = None;
            return Ok(());
        }
        self.image_url = self
            .image_url
            .take()
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty());
        if self.image_url.is_none() {
            return Err(TierError::Validation(MISSING_IMAGE_MESSAGE.to_string()));
        }
        Ok(())
    }
}

static TAG_SEQ: AtomicU64 = AtomicU64::new(0);

/// Generate a unique tag id (timestamp plus process-wide sequence)
pub fn generate_tag_id(prefix: IdPrefix) -> String {
    let seq = TAG_SEQ.fetch_add(1, Ordering::Relaxed);
    format!(
        "{}-{}-{}",
        prefix.as_str(),
        Utc::now().timestamp_millis(),
        seq
    )
}
