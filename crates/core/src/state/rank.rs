//! # Rank Levels
//!
//! The six fixed buckets a tag can live in, top tier first and the unsorted
//! pool last.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A ranking bucket
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum RankLevel {
    Hong,
    Top,
    Ren,
    Npc,
    La,
    Unassigned,
}

impl RankLevel {
    /// All buckets in display order
    pub const ALL: [RankLevel; 6] = [
        RankLevel::Hong,
        RankLevel::Top,
        RankLevel::Ren,
        RankLevel::Npc,
        RankLevel::La,
        RankLevel::Unassigned,
    ];

    /// The five ranked buckets (everything except the unsorted pool)
    pub const RANKED: [RankLevel; 5] = [
        RankLevel::Hong,
        RankLevel::Top,
        RankLevel::Ren,
        RankLevel::Npc,
        RankLevel::La,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hong => "hong",
            Self::Top => "top",
            Self::Ren => "ren",
            Self::Npc => "npc",
            Self::La => "la",
            Self::Unassigned => "unassigned",
        }
    }

    /// Parse a bucket id. Unknown ids are `None`; drops onto anything that
    /// is not a bucket are ignored by callers.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "hong" => Some(Self::Hong),
            "top" => Some(Self::Top),
            "ren" => Some(Self::Ren),
            "npc" => Some(Self::Npc),
            "la" => Some(Self::La),
            "unassigned" => Some(Self::Unassigned),
            _ => None,
        }
    }

    pub fn is_ranked(&self) -> bool {
        !matches!(self, Self::Unassigned)
    }

    /// Display name for UI
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Hong => "夯",
            Self::Top => "顶级",
            Self::Ren => "人上人",
            Self::Npc => "NPC",
            Self::La => "拉完了",
            Self::Unassigned => "未排序",
        }
    }

    /// Row fill color
    pub fn color(&self) -> &'static str {
        match self {
            Self::Hong => "#ff4d4f",
            Self::Top => "#ffa940",
            Self::Ren => "#ffec3d",
            Self::Npc => "#e0e0e0",
            Self::La => "#ffffff",
            Self::Unassigned => "#d9d9d9",
        }
    }

    /// Row label text color
    pub fn text_color(&self) -> &'static str {
        "#000000"
    }

    pub fn config(&self) -> RankLevelConfig {
        RankLevelConfig {
            id: *self,
            name: self.display_name(),
            color: self.color(),
            text_color: self.text_color(),
        }
    }
}

impl fmt::Display for RankLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Presentation metadata for a bucket
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RankLevelConfig {
    pub id: RankLevel,
    pub name: &'static str,
    pub color: &'static str,
    pub text_color: &'static str,
}

/// Metadata for every bucket, in display order
pub fn rank_levels() -> Vec<RankLevelConfig> {
    RankLevel::ALL.iter().map(RankLevel::config).collect()
}
