//! # Board API
//!
//! The user actions of the tier list: add, drag-move, select, delete, reset.
//! Every action answers with the updated board so the client can re-render
//! from a single source of truth.

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use tierlist_core::state::{Board, BoardSnapshot, MoveOutcome, Tag, TagKind};
use tierlist_core::TierError;

use crate::SharedState;

/// Request to add a single tag
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddTagRequest {
    pub content: String,
    /// "text", "image", or "mixed"
    #[serde(default, rename = "type")]
    #[schema(value_type = String)]
    pub kind: TagKind,
    #[serde(default)]
    pub image_url: Option<String>,
}

/// Request to append previewed tags to the pool
#[derive(Debug, Deserialize, ToSchema)]
pub struct AddTagsRequest {
    #[schema(value_type = Vec<Object>)]
    pub tags: Vec<Tag>,
}

/// Drop of a tag onto a bucket
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MoveTagRequest {
    pub tag_id: String,
    /// Bucket id; anything else is ignored
    pub target: String,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ToggleSelectionRequest {
    pub tag_id: String,
}

/// Result of a board action
#[derive(Debug, Serialize, ToSchema)]
pub struct BoardActionResponse {
    pub success: bool,
    /// Dismissible notice for actions that had nothing to do
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Tags added, removed, or returned to the pool
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub tag: Option<Tag>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub outcome: Option<MoveOutcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected: Option<bool>,
    #[schema(value_type = Object)]
    pub board: BoardSnapshot,
}

impl BoardActionResponse {
    fn ok(board: &Board) -> Self {
        Self {
            success: true,
            notice: None,
            error: None,
            count: None,
            tag: None,
            outcome: None,
            selected: None,
            board: board.snapshot(),
        }
    }

    fn with_count(mut self, count: usize) -> Self {
        self.count = Some(count);
        self
    }

    /// Notices keep a 200 status; validation failures are a 400
    fn rejected(err: TierError, board: &Board) -> (StatusCode, Json<Self>) {
        let mut response = Self::ok(board);
        response.success = false;
        let status = if err.is_notice() {
            response.notice = Some(err.message().to_string());
            StatusCode::OK
        } else {
            response.error = Some(err.message().to_string());
            StatusCode::BAD_REQUEST
        };
        (status, Json(response))
    }
}

pub fn board_routes() -> Router<SharedState> {
    Router::new()
        .route("/", get(get_board))
        .route("/tags", post(add_tag))
        .route("/tags/bulk", post(add_tags))
        .route("/move", post(move_tag))
        .route("/selection/toggle", post(toggle_selection))
        .route("/selection/delete", post(delete_selected))
        .route("/reset", post(reset_board))
}

/// Get the whole board
#[utoipa::path(
    get,
    path = "/api/v1/board",
    tag = "board",
    responses(
        (status = 200, description = "Current board", body = BoardActionResponse)
    )
)]
pub async fn get_board(State(state): State<SharedState>) -> Json<BoardActionResponse> {
    let board = state.board.read().await;
    Json(BoardActionResponse::ok(&board))
}

/// Add a single tag to the unsorted pool
#[utoipa::path(
    post,
    path = "/api/v1/board/tags",
    tag = "board",
    request_body = AddTagRequest,
    responses(
        (status = 200, description = "Tag added", body = BoardActionResponse),
        (status = 400, description = "Empty content or missing image url", body = BoardActionResponse)
    )
)]
pub async fn add_tag(
    State(state): State<SharedState>,
    Json(req): Json<AddTagRequest>,
) -> (StatusCode, Json<BoardActionResponse>) {
    let mut board = state.board.write().await;
    match board.add_tag(&req.content, req.kind, req.image_url) {
        Ok(tag) => {
            let mut response = BoardActionResponse::ok(&board).with_count(1);
            response.tag = Some(tag);
            (StatusCode::OK, Json(response))
        }
        Err(e) => BoardActionResponse::rejected(e, &board),
    }
}

/// Append generated tags to the unsorted pool
#[utoipa::path(
    post,
    path = "/api/v1/board/tags/bulk",
    tag = "board",
    request_body = AddTagsRequest,
    responses(
        (status = 200, description = "Tags appended", body = BoardActionResponse),
        (status = 400, description = "A tag has empty content or lacks its image url", body = BoardActionResponse)
    )
)]
pub async fn add_tags(
    State(state): State<SharedState>,
    Json(req): Json<AddTagsRequest>,
) -> (StatusCode, Json<BoardActionResponse>) {
    let mut board = state.board.write().await;
    match board.add_tags(req.tags) {
        Ok(added) => (
            StatusCode::OK,
            Json(BoardActionResponse::ok(&board).with_count(added)),
        ),
        Err(e) => BoardActionResponse::rejected(e, &board),
    }
}

/// Move a tag to another bucket
#[utoipa::path(
    post,
    path = "/api/v1/board/move",
    tag = "board",
    request_body = MoveTagRequest,
    responses(
        (status = 200, description = "Move applied or ignored", body = BoardActionResponse)
    )
)]
pub async fn move_tag(
    State(state): State<SharedState>,
    Json(req): Json<MoveTagRequest>,
) -> Json<BoardActionResponse> {
    let mut board = state.board.write().await;
    let outcome = board.move_tag(&req.tag_id, &req.target);
    let mut response = BoardActionResponse::ok(&board);
    response.outcome = Some(outcome);
    Json(response)
}

/// Flip a tag's selection
#[utoipa::path(
    post,
    path = "/api/v1/board/selection/toggle",
    tag = "board",
    request_body = ToggleSelectionRequest,
    responses(
        (status = 200, description = "Selection toggled", body = BoardActionResponse)
    )
)]
pub async fn toggle_selection(
    State(state): State<SharedState>,
    Json(req): Json<ToggleSelectionRequest>,
) -> Json<BoardActionResponse> {
    let mut board = state.board.write().await;
    let selected = board.toggle_selected(&req.tag_id);
    let mut response = BoardActionResponse::ok(&board);
    response.selected = Some(selected);
    Json(response)
}

/// Delete every selected tag
#[utoipa::path(
    post,
    path = "/api/v1/board/selection/delete",
    tag = "board",
    responses(
        (status = 200, description = "Deleted, or a notice if nothing was selected", body = BoardActionResponse)
    )
)]
pub async fn delete_selected(State(state): State<SharedState>) -> (StatusCode, Json<BoardActionResponse>) {
    let mut board = state.board.write().await;
    match board.delete_selected() {
        Ok(removed) => (
            StatusCode::OK,
            Json(BoardActionResponse::ok(&board).with_count(removed.len())),
        ),
        Err(e) => BoardActionResponse::rejected(e, &board),
    }
}

/// Return every ranked tag to the unsorted pool
#[utoipa::path(
    post,
    path = "/api/v1/board/reset",
    tag = "board",
    responses(
        (status = 200, description = "Reset, or a notice if nothing was ranked", body = BoardActionResponse)
    )
)]
pub async fn reset_board(State(state): State<SharedState>) -> (StatusCode, Json<BoardActionResponse>) {
    let mut board = state.board.write().await;
    match board.reset() {
        Ok(moved) => (
            StatusCode::OK,
            Json(BoardActionResponse::ok(&board).with_count(moved)),
        ),
        Err(e) => BoardActionResponse::rejected(e, &board),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::test_state;
    use tierlist_core::state::RankLevel;

    async fn add(state: &SharedState, content: &str) -> Tag {
        let (status, Json(response)) = add_tag(
            State(state.clone()),
            Json(AddTagRequest {
                content: content.to_string(),
                kind: TagKind::Text,
                image_url: None,
            }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        response.tag.unwrap()
    }

    #[tokio::test]
    async fn test_add_and_move() {
        let state = test_state();
        let a = add(&state, "喜茶").await;

        let Json(response) = move_tag(
            State(state.clone()),
            Json(MoveTagRequest {
                tag_id: a.id.clone(),
                target: "hong".to_string(),
            }),
        )
        .await;
        assert!(response.outcome.unwrap().changed());
        assert_eq!(response.board.ranking.bucket(RankLevel::Hong)[0].id, a.id);

        let Json(response) = move_tag(
            State(state.clone()),
            Json(MoveTagRequest {
                tag_id: a.id.clone(),
                target: "trash".to_string(),
            }),
        )
        .await;
        assert_eq!(response.outcome, Some(MoveOutcome::InvalidTarget));
    }

    #[tokio::test]
    async fn test_add_empty_tag_is_bad_request() {
        let state = test_state();
        let (status, Json(response)) = add_tag(
            State(state.clone()),
            Json(AddTagRequest {
                content: "  ".to_string(),
                kind: TagKind::Text,
                image_url: None,
            }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(!response.success);
        assert!(response.error.is_some());
    }

    #[tokio::test]
    async fn test_delete_without_selection_is_notice() {
        let state = test_state();
        add(&state, "a").await;

        let (status, Json(response)) = delete_selected(State(state.clone())).await;
        assert_eq!(status, StatusCode::OK);
        assert!(!response.success);
        assert_eq!(response.notice.as_deref(), Some("请先选择要删除的词条"));
        assert_eq!(response.board.ranking.len(), 1);
    }

    #[tokio::test]
    async fn test_select_delete_and_reset() {
        let state = test_state();
        let a = add(&state, "a").await;
        let b = add(&state, "b").await;
        for tag in [&a, &b] {
            move_tag(
                State(state.clone()),
                Json(MoveTagRequest {
                    tag_id: tag.id.clone(),
                    target: "top".to_string(),
                }),
            )
            .await;
        }

        let Json(response) = toggle_selection(
            State(state.clone()),
            Json(ToggleSelectionRequest { tag_id: a.id.clone() }),
        )
        .await;
        assert_eq!(response.selected, Some(true));

        let (_, Json(response)) = delete_selected(State(state.clone())).await;
        assert_eq!(response.count, Some(1));
        assert!(response.board.selected.is_empty());

        let (_, Json(response)) = reset_board(State(state.clone())).await;
        assert_eq!(response.count, Some(1));
        assert_eq!(response.board.ranking.bucket(RankLevel::Unassigned)[0].id, b.id);

        let (_, Json(response)) = reset_board(State(state.clone())).await;
        assert_eq!(response.notice.as_deref(), Some("没有需要重置的词条"));
    }

    #[tokio::test]
    async fn test_bulk_add_appends_in_order() {
        let state = test_state();
        let tags = vec![
            Tag::text(tierlist_core::state::IdPrefix::Ai, "x"),
            Tag::text(tierlist_core::state::IdPrefix::Ai, "y"),
        ];
        let (status, Json(response)) =
            add_tags(State(state.clone()), Json(AddTagsRequest { tags })).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(response.count, Some(2));
        let pool: Vec<&str> = response
            .board
            .ranking
            .bucket(RankLevel::Unassigned)
            .iter()
            .map(|t| t.content.as_str())
            .collect();
        assert_eq!(pool, vec!["x", "y"]);
    }

    #[tokio::test]
    async fn test_bulk_add_rejects_image_tag_without_image() {
        let state = test_state();
        let req: AddTagsRequest = serde_json::from_str(
            r#"{"tags":[{"id":"x","type":"image","content":"logo","createdAt":1,"updatedAt":1}]}"#,
        )
        .unwrap();

        let (status, Json(response)) = add_tags(State(state.clone()), Json(req)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(!response.success);
        assert_eq!(response.error.as_deref(), Some("图片词条需要提供图片地址"));
        assert!(response.board.ranking.is_empty());
    }
}
