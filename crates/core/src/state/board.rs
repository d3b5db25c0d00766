//! # Board
//!
//! The ranking state and selection owned together. Every user action on the
//! tier list is a method here; callers hold the board and pass it by
//! reference instead of sharing global state.

use serde::Serialize;

use super::rank::{rank_levels, RankLevel, RankLevelConfig};
use super::ranking::{MoveOutcome, RankingState};
use super::selection::SelectionSet;
use super::tag::{IdPrefix, Tag, TagKind};
use crate::error::{TierError, TierResult};

pub const NOTHING_TO_RESET_NOTICE: &str = "没有需要重置的词条";

#[derive(Debug, Clone, Default)]
pub struct Board {
    ranking: RankingState,
    selection: SelectionSet,
}

/// Serializable view of the whole board
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardSnapshot {
    pub ranking: RankingState,
    pub selected: Vec<String>,
    pub levels: Vec<RankLevelConfig>,
}

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ranking(&self) -> &RankingState {
        &self.ranking
    }

    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    /// Add a single user-entered tag to the unsorted pool
    pub fn add_tag(
        &mut self,
        content: &str,
        kind: TagKind,
        image_url: Option<String>,
    ) -> TierResult<Tag> {
        let mut tag = Tag::new(IdPrefix::Manual, kind, content, image_url);
        tag.validate()?;

        self.ranking.insert(tag.clone());
        tracing::debug!(tag_id = %tag.id, kind = kind.as_str(), "Tag added");
        Ok(tag)
    }

    /// Append generated tags to the unsorted pool, in order. Every tag is
    /// validated first and one bad tag rejects the whole batch. Tags whose id
    /// is already on the board are skipped. Returns how many were added.
    pub fn add_tags(&mut self, tags: impl IntoIterator<Item = Tag>) -> TierResult<usize> {
        let tags = tags
            .into_iter()
            .map(|mut tag| tag.validate().map(|_| tag))
            .collect::<TierResult<Vec<Tag>>>()?;

        let mut added = 0;
        for tag in tags {
            if self.ranking.insert(tag) {
                added += 1;
            }
        }
        tracing::debug!(added, "Tags appended to pool");
        Ok(added)
    }

    pub fn move_tag(&mut self, tag_id: &str, target: &str) -> MoveOutcome {
        let outcome = self.ranking.move_tag_to(tag_id, target);
        tracing::debug!(tag_id, target, ?outcome, "Move requested");
        outcome
    }

    /// Returns whether the tag is now selected
    pub fn toggle_selected(&mut self, tag_id: &str) -> bool {
        self.selection.toggle(tag_id)
    }

    pub fn delete_selected(&mut self) -> TierResult<Vec<Tag>> {
        let removed = self.selection.delete_selected(&mut self.ranking)?;
        tracing::info!(removed = removed.len(), "Deleted selected tags");
        Ok(removed)
    }

    /// Return every ranked tag to the unsorted pool
    pub fn reset(&mut self) -> TierResult<usize> {
        if !self.ranking.has_ranked_tags() {
            return Err(TierError::NoOp(NOTHING_TO_RESET_NOTICE.to_string()));
        }
        let moved = self.ranking.reset();
        tracing::info!(moved, "Board reset");
        Ok(moved)
    }

    pub fn find_tag_zone(&self, tag_id: &str) -> Option<RankLevel> {
        self.ranking.find_tag_zone(tag_id)
    }

    pub fn snapshot(&self) -> BoardSnapshot {
        BoardSnapshot {
            ranking: self.ranking.clone(),
            selected: self.selection.iter().map(str::to_string).collect(),
            levels: rank_levels(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_tag_trims_and_pools() {
        let mut board = Board::new();
        let tag = board.add_tag("  霸王茶姬 ", TagKind::Text, None).unwrap();
        assert_eq!(tag.content, "霸王茶姬");
        assert!(tag.id.starts_with("tag-"));
        assert_eq!(board.find_tag_zone(&tag.id), Some(RankLevel::Unassigned));
    }

    #[test]
    fn test_add_tag_validation() {
        let mut board = Board::new();
        assert!(matches!(
            board.add_tag("   ", TagKind::Text, None),
            Err(TierError::Validation(_))
        ));
        assert_eq!(
            board
                .add_tag("logo", TagKind::Image, Some(" ".to_string()))
                .unwrap_err()
                .message(),
            "图片词条需要提供图片地址"
        );
        assert!(board.ranking().is_empty());

        let tag = board
            .add_tag("logo", TagKind::Mixed, Some("https://img.example/logo.png".to_string()))
            .unwrap();
        assert_eq!(tag.image_url.as_deref(), Some("https://img.example/logo.png"));
    }

    #[test]
    fn test_add_tags_keeps_order_and_skips_duplicates() {
        let mut board = Board::new();
        let tags: Vec<Tag> = ["a", "b", "c"]
            .iter()
            .map(|c| Tag::text(IdPrefix::Ai, *c))
            .collect();
        assert_eq!(board.add_tags(tags.clone()).unwrap(), 3);
        assert_eq!(board.add_tags(tags[1..].to_vec()).unwrap(), 0);

        let pool: Vec<&str> = board
            .ranking()
            .bucket(RankLevel::Unassigned)
            .iter()
            .map(|t| t.content.as_str())
            .collect();
        assert_eq!(pool, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_add_tags_rejects_image_tag_without_image() {
        let mut board = Board::new();
        let image: Tag = serde_json::from_str(
            r#"{"id":"x","type":"image","content":"logo","createdAt":1,"updatedAt":1}"#,
        )
        .unwrap();
        let batch = vec![Tag::text(IdPrefix::Ai, "a"), image];

        let err = board.add_tags(batch).unwrap_err();
        assert_eq!(err.message(), "图片词条需要提供图片地址");
        assert!(board.ranking().is_empty());
    }

    #[test]
    fn test_add_tags_drops_image_from_text_tags() {
        let mut board = Board::new();
        let mut tag = Tag::text(IdPrefix::Ai, " a ");
        tag.image_url = Some("https://img.example/a.png".to_string());
        let id = tag.id.clone();

        assert_eq!(board.add_tags([tag]).unwrap(), 1);
        let stored = board.ranking().find_tag(&id).unwrap();
        assert_eq!(stored.content, "a");
        assert_eq!(stored.image_url, None);
    }

    #[test]
    fn test_reset_with_nothing_ranked_is_notice() {
        let mut board = Board::new();
        board.add_tag("a", TagKind::Text, None).unwrap();
        let err = board.reset().unwrap_err();
        assert_eq!(err, TierError::NoOp(NOTHING_TO_RESET_NOTICE.to_string()));
    }

    #[test]
    fn test_full_session() {
        let mut board = Board::new();
        let a = board.add_tag("a", TagKind::Text, None).unwrap();
        let b = board.add_tag("b", TagKind::Text, None).unwrap();
        let c = board.add_tag("c", TagKind::Text, None).unwrap();

        assert!(board.move_tag(&a.id, "hong").changed());
        assert!(board.move_tag(&b.id, "la").changed());
        assert!(!board.move_tag(&c.id, "nowhere").changed());

        assert!(board.toggle_selected(&b.id));
        let removed = board.delete_selected().unwrap();
        assert_eq!(removed[0].id, b.id);
        assert!(board.selection().is_empty());
        assert!(board.delete_selected().unwrap_err().is_notice());

        assert_eq!(board.reset().unwrap(), 1);
        let snapshot = board.snapshot();
        let pool: Vec<&str> = snapshot
            .ranking
            .bucket(RankLevel::Unassigned)
            .iter()
            .map(|t| t.id.as_str())
            .collect();
        assert_eq!(pool, vec![c.id.as_str(), a.id.as_str()]);
        assert_eq!(snapshot.levels.len(), 6);
    }

    #[test]
    fn test_snapshot_serialization() {
        let mut board = Board::new();
        let a = board.add_tag("a", TagKind::Text, None).unwrap();
        board.toggle_selected(&a.id);
        let json = serde_json::to_value(board.snapshot()).unwrap();
        assert_eq!(json["selected"][0], a.id.as_str());
        assert_eq!(json["ranking"]["unassigned"][0]["content"], "a");
        assert_eq!(json["levels"][0]["name"], "夯");
    }
}
