//! Post handlers.

use actix_web::{HttpResponse, web};

use quill_core::domain::PostChanges;
use quill_core::ports::AuthError;
use quill_shared::dto::{CreatePostRequest, DeletePostRequest, PostLookup, UpdatePostRequest};
use quill_shared::{ApiResponse, Listing};

use super::views;
use crate::middleware::auth::{Identity, MaybeIdentity};
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// POST /api/users/posts/create
pub async fn create(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<CreatePostRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let post = state
        .posts
        .create(identity.user_id, &req.title, &req.content)
        .await?;

    Ok(HttpResponse::Created().json(ApiResponse::ok_with_message(
        views::post(post),
        "Post created successfully",
    )))
}

/// GET /api/users/posts/all/get
pub async fn list(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let posts = state.posts.list().await?;
    let items: Vec<_> = posts.into_iter().map(views::post).collect();

    Ok(HttpResponse::Ok().json(ApiResponse::ok_with_message(
        Listing::from(items),
        "All posts found successfully",
    )))
}

/// GET /api/users/posts/get?id=
///
/// The id may also arrive as a JSON body; the query string wins.
pub async fn get(
    state: web::Data<AppState>,
    query: web::Query<PostLookup>,
    body: Option<web::Json<PostLookup>>,
) -> AppResult<HttpResponse> {
    let id = query
        .id
        .or_else(|| body.and_then(|b| b.id))
        .ok_or_else(|| AppError::BadRequest("id is required".to_string()))?;

    let post = state.posts.get(id).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok_with_message(
        views::post(post),
        "Post found successfully",
    )))
}

/// PUT /api/users/posts/update
pub async fn update(
    state: web::Data<AppState>,
    identity: MaybeIdentity,
    body: web::Json<UpdatePostRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let actor = resolve_actor(&state, identity, req.user_id)?;

    let post = state
        .posts
        .update(
            actor,
            req.id,
            PostChanges {
                title: req.title,
                content: req.content,
            },
        )
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok_with_message(
        views::post(post),
        "Post updated successfully",
    )))
}

/// DELETE /api/users/posts/delete
pub async fn delete(
    state: web::Data<AppState>,
    identity: MaybeIdentity,
    body: web::Json<DeletePostRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let actor = resolve_actor(&state, identity, req.user_id)?;

    let post = state.posts.delete(actor, req.id).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok_with_message(
        views::post(post),
        "Post deleted successfully",
    )))
}

/// Who is mutating the post.
///
/// A token always wins. Without one, the body's `user_id` is taken at its
/// word unless `server.require_auth_for_mutations` is set.
fn resolve_actor(
    state: &AppState,
    identity: MaybeIdentity,
    claimed: Option<i64>,
) -> AppResult<i64> {
    match identity.0 {
        Some(identity) => {
            if let Some(claimed) = claimed.filter(|id| *id != identity.user_id) {
                tracing::warn!(
                    token_user = identity.user_id,
                    claimed,
                    "ignoring body user_id that disagrees with the token"
                );
            }
            Ok(identity.user_id)
        }
        None if state.config.server.require_auth_for_mutations => {
            Err(AppError::Unauthorized(AuthError::MissingAuth))
        }
        None => {
            let actor = claimed.ok_or_else(|| {
                AppError::BadRequest("user_id is required without a bearer token".to_string())
            })?;
            tracing::debug!(actor, "unauthenticated mutation, using body user_id");
            Ok(actor)
        }
    }
}
