use std::sync::Arc;

use tracing::instrument;

use crate::domain::{Comment, NewComment};
use crate::error::{DomainError, Reference, RepoError};
use crate::ports::CommentRepository;

use super::validate;

#[derive(Clone)]
pub struct CommentService {
    comments: Arc<dyn CommentRepository>,
}

impl CommentService {
    pub fn new(comments: Arc<dyn CommentRepository>) -> Self {
        Self { comments }
    }

    #[instrument(name = "comment.create", skip(self, content))]
    pub async fn create(
        &self,
        author_id: i64,
        post_id: i64,
        content: &str,
    ) -> Result<Comment, DomainError> {
        let content = validate::required("content", content)?;

        let comment = self
            .comments
            .create(NewComment {
                user_id: author_id,
                post_id,
                content: content.to_string(),
            })
            .await
            .map_err(|e| match e {
                RepoError::MissingReference(Reference::Post) => {
                    DomainError::not_found("Post", post_id)
                }
                RepoError::MissingReference(Reference::User) => {
                    DomainError::not_found("User", author_id)
                }
                other => other.into(),
            })?;

        tracing::info!(
            target: "audit",
            action = "comment.create",
            comment_id = comment.id,
            post_id,
            actor = author_id,
            at = %comment.created_at.to_rfc3339(),
            fields = "content",
            "comment created"
        );

        Ok(comment)
    }

    /// Every live comment, or only those on `post_id`.
    #[instrument(name = "comment.list", skip(self))]
    pub async fn list(&self, post_id: Option<i64>) -> Result<Vec<Comment>, DomainError> {
        let comments = match post_id {
            Some(post_id) => self.comments.list_by_post(post_id).await?,
            None => self.comments.list().await?,
        };
        tracing::debug!(count = comments.len(), "listed comments");
        Ok(comments)
    }
}
