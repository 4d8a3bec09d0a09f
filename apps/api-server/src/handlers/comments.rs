//! Comment handlers.

use actix_web::{HttpResponse, web};

use quill_shared::dto::{CommentQuery, CreateCommentRequest};
use quill_shared::{ApiResponse, Listing};

use super::views;
use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// POST /api/users/posts/comments/create
pub async fn create(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<CreateCommentRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let comment = state
        .comments
        .create(identity.user_id, req.post_id, &req.content)
        .await?;

    Ok(HttpResponse::Created().json(ApiResponse::ok_with_message(
        views::comment(comment),
        "Comment created successfully",
    )))
}

/// GET /api/users/posts/comments/all/get?post_id=
pub async fn list(
    state: web::Data<AppState>,
    query: web::Query<CommentQuery>,
) -> AppResult<HttpResponse> {
    let comments = state.comments.list(query.post_id).await?;
    let items: Vec<_> = comments.into_iter().map(views::comment).collect();

    Ok(HttpResponse::Ok().json(ApiResponse::ok_with_message(
        Listing::from(items),
        "Comment found successfully",
    )))
}
