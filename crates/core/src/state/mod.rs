pub mod board;
pub mod rank;
pub mod ranking;
pub mod selection;
pub mod tag;

pub use board::{Board, BoardSnapshot};
pub use rank::{rank_levels, RankLevel, RankLevelConfig};
pub use ranking::{MoveOutcome, RankingState};
pub use selection::SelectionSet;
pub use tag::{IdPrefix, Tag, TagKind, EMPTY_CONTENT_MESSAGE, MISSING_IMAGE_MESSAGE};
