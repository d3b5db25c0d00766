//! # Ranking State
//!
//! In-memory tag store: one ordered sequence of tags per bucket. A tag id
//! appears in at most one bucket. The sequences are private so membership
//! can only change through the methods here, each of which completes under a
//! single `&mut self` borrow.

use serde::Serialize;

use super::rank::RankLevel;
use super::tag::Tag;

/// Result of a move request
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum MoveOutcome {
    /// Tag left `from` and was appended to `to`
    Moved { from: RankLevel, to: RankLevel },
    /// Tag is already in the target bucket
    AlreadyThere,
    /// No bucket holds the tag
    UnknownTag,
    /// Target is not a bucket id
    InvalidTarget,
}

impl MoveOutcome {
    pub fn changed(&self) -> bool {
        matches!(self, MoveOutcome::Moved { .. })
    }
}

/// Tags per bucket, serialized as one array per bucket id
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct RankingState {
    hong: Vec<Tag>,
    top: Vec<Tag>,
    ren: Vec<Tag>,
    npc: Vec<Tag>,
    la: Vec<Tag>,
    unassigned: Vec<Tag>,
}

impl RankingState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tags in a bucket, in display order
    pub fn bucket(&self, level: RankLevel) -> &[Tag] {
        match level {
            RankLevel::Hong => &self.hong,
            RankLevel::Top => &self.top,
            RankLevel::Ren => &self.ren,
            RankLevel::Npc => &self.npc,
            RankLevel::La => &self.la,
            RankLevel::Unassigned => &self.unassigned,
        }
    }

    fn bucket_mut(&mut self, level: RankLevel) -> &mut Vec<Tag> {
        match level {
            RankLevel::Hong => &mut self.hong,
            RankLevel::Top => &mut self.top,
            RankLevel::Ren => &mut self.ren,
            RankLevel::Npc => &mut self.npc,
            RankLevel::La => &mut self.la,
            RankLevel::Unassigned => &mut self.unassigned,
        }
    }

    /// Every bucket with its tags, in display order
    pub fn iter(&self) -> impl Iterator<Item = (RankLevel, &[Tag])> + '_ {
        RankLevel::ALL
            .into_iter()
            .map(move |level| (level, self.bucket(level)))
    }

    /// Bucket currently holding `tag_id` (first match in display order)
    pub fn find_tag_zone(&self, tag_id: &str) -> Option<RankLevel> {
        RankLevel::ALL
            .into_iter()
            .find(|level| self.bucket(*level).iter().any(|t| t.id == tag_id))
    }

    pub fn find_tag(&self, tag_id: &str) -> Option<&Tag> {
        self.iter()
            .flat_map(|(_, tags)| tags.iter())
            .find(|t| t.id == tag_id)
    }

    pub fn contains(&self, tag_id: &str) -> bool {
        self.find_tag_zone(tag_id).is_some()
    }

    /// Total number of tags across all buckets
    pub fn len(&self) -> usize {
        self.iter().map(|(_, tags)| tags.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of tags outside the unsorted pool
    pub fn ranked_len(&self) -> usize {
        RankLevel::RANKED
            .iter()
            .map(|level| self.bucket(*level).len())
            .sum()
    }

    pub fn has_ranked_tags(&self) -> bool {
        self.ranked_len() > 0
    }

    /// Append a new tag to the unsorted pool. Returns `false` (and leaves the
    /// state unchanged) if a tag with the same id is already on the board.
    pub fn insert(&mut self, tag: Tag) -> bool {
        if self.contains(&tag.id) {
            return false;
        }
        self.unassigned.push(tag);
        true
    }

    /// Move a tag to the end of `target`, keeping the relative order of every
    /// other tag in both buckets.
    pub fn move_tag(&mut self, tag_id: &str, target: RankLevel) -> MoveOutcome {
        let Some(source) = self.find_tag_zone(tag_id) else {
            return MoveOutcome::UnknownTag;
        };
        if source == target {
            return MoveOutcome::AlreadyThere;
        }

        let from = self.bucket_mut(source);
        let Some(pos) = from.iter().position(|t| t.id == tag_id) else {
            return MoveOutcome::UnknownTag;
        };
        let tag = from.remove(pos);
        self.bucket_mut(target).push(tag);

        MoveOutcome::Moved {
            from: source,
            to: target,
        }
    }

    /// Move by bucket id as reported by a drop target. Anything that is not a
    /// bucket id is ignored.
    pub fn move_tag_to(&mut self, tag_id: &str, target: &str) -> MoveOutcome {
        match RankLevel::parse(target) {
            Some(level) => self.move_tag(tag_id, level),
            None => MoveOutcome::InvalidTarget,
        }
    }

    /// Remove every tag matching `pred` from every bucket, returning the
    /// removed tags in display order.
    pub fn remove_where<F>(&mut self, mut pred: F) -> Vec<Tag>
    where
        F: FnMut(&Tag) -> bool,
    {
        let mut removed = Vec::new();
        for level in RankLevel::ALL {
            let bucket = self.bucket_mut(level);
            let (gone, kept): (Vec<Tag>, Vec<Tag>) = bucket.drain(..).partition(|t| pred(t));
            *bucket = kept;
            removed.extend(gone);
        }
        removed
    }

    /// Return every ranked tag to the end of the unsorted pool, bucket by
    /// bucket in display order. Returns the number of tags moved.
    pub fn reset(&mut self) -> usize {
        let mut returned = Vec::new();
        for level in RankLevel::RANKED {
            returned.append(self.bucket_mut(level));
        }
        let moved = returned.len();
        self.unassigned.extend(returned);
        moved
    }
}
