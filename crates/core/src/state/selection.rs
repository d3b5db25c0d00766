//! # Selection
//!
//! Tag ids marked for bulk deletion.

use serde::Serialize;
use std::collections::BTreeSet;

use super::ranking::RankingState;
use super::tag::Tag;
use crate::error::{TierError, TierResult};

pub const EMPTY_SELECTION_NOTICE: &str = "请先选择要删除的词条";

#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct SelectionSet {
    ids: BTreeSet<String>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip membership of `tag_id`. Returns whether it is now selected.
    pub fn toggle(&mut self, tag_id: &str) -> bool {
        if self.ids.remove(tag_id) {
            false
        } else {
            self.ids.insert(tag_id.to_string());
            true
        }
    }

    pub fn is_selected(&self, tag_id: &str) -> bool {
        self.ids.contains(tag_id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// Remove every selected tag from every bucket, then clear the selection.
    /// An empty selection is a notice and leaves everything untouched.
    pub fn delete_selected(&mut self, ranking: &mut RankingState) -> TierResult<Vec<Tag>> {
        if self.ids.is_empty() {
            return Err(TierError::NoOp(EMPTY_SELECTION_NOTICE.to_string()));
        }

        let removed = ranking.remove_where(|t| self.ids.contains(&t.id));
        self.ids.clear();
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::rank::RankLevel;
    use crate::state::tag::IdPrefix;

    fn ranking_with(ids: &[&str]) -> RankingState {
        let mut ranking = RankingState::new();
        for id in ids {
            let mut t = Tag::text(IdPrefix::Manual, *id);
            t.id = id.to_string();
            ranking.insert(t);
        }
        ranking
    }

    #[test]
    fn test_toggle_flips_membership() {
        let mut selection = SelectionSet::new();
        assert!(selection.toggle("a"));
        assert!(selection.is_selected("a"));
        assert!(!selection.toggle("a"));
        assert!(selection.is_empty());
    }

    #[test]
    fn test_delete_selected_across_buckets() {
        let mut ranking = ranking_with(&["a", "b", "c", "d"]);
        for id in ["a", "b", "c"] {
            ranking.move_tag(id, RankLevel::Hong);
        }
        let mut selection = SelectionSet::new();
        selection.toggle("a");
        selection.toggle("c");

        let removed = selection.delete_selected(&mut ranking).unwrap();
        assert_eq!(removed.len(), 2);

        let hong: Vec<&str> = ranking.bucket(RankLevel::Hong).iter().map(|t| t.id.as_str()).collect();
        let pool: Vec<&str> = ranking
            .bucket(RankLevel::Unassigned)
            .iter()
            .map(|t| t.id.as_str())
            .collect();
        assert_eq!(hong, vec!["b"]);
        assert_eq!(pool, vec!["d"]);
        assert!(selection.is_empty());
    }

    #[test]
    fn test_delete_with_empty_selection_is_notice() {
        let mut ranking = ranking_with(&["a"]);
        let before = ranking.clone();
        let mut selection = SelectionSet::new();

        let err = selection.delete_selected(&mut ranking).unwrap_err();
        assert!(err.is_notice());
        assert_eq!(ranking, before);
    }

    #[test]
    fn test_stale_ids_are_cleared() {
        let mut ranking = ranking_with(&["a"]);
        let mut selection = SelectionSet::new();
        selection.toggle("gone");

        let removed = selection.delete_selected(&mut ranking).unwrap();
        assert!(removed.is_empty());
        assert!(selection.is_empty());
        assert_eq!(ranking.len(), 1);
    }
}
