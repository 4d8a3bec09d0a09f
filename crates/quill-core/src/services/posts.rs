use std::sync::Arc;

use tracing::instrument;

use crate::domain::{NewPost, Post, PostChanges};
use crate::error::{DomainError, Reference, RepoError};
use crate::ports::PostRepository;

use super::validate;

const MAX_TITLE_CHARS: usize = 255;

#[derive(Clone)]
pub struct PostService {
    posts: Arc<dyn PostRepository>,
}

impl PostService {
    pub fn new(posts: Arc<dyn PostRepository>) -> Self {
        Self { posts }
    }

    #[instrument(name = "post.create", skip(self, title, content))]
    pub async fn create(
        &self,
        author_id: i64,
        title: &str,
        content: &str,
    ) -> Result<Post, DomainError> {
        let title = validate::required("title", title)?;
        validate::max_chars("title", title, MAX_TITLE_CHARS)?;
        let content = validate::required("content", content)?;

        let post = self
            .posts
            .create(NewPost {
                user_id: author_id,
                title: title.to_string(),
                content: content.to_string(),
            })
            .await
            .map_err(|e| match e {
                RepoError::MissingReference(Reference::User) => {
                    DomainError::not_found("User", author_id)
                }
                other => other.into(),
            })?;

        tracing::info!(
            target: "audit",
            action = "post.create",
            post_id = post.id,
            actor = author_id,
            at = %post.created_at.to_rfc3339(),
            fields = "title,content",
            "post created"
        );

        Ok(post)
    }

    #[instrument(name = "post.get", skip(self))]
    pub async fn get(&self, id: i64) -> Result<Post, DomainError> {
        self.posts
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Post", id))
    }

    #[instrument(name = "post.list", skip(self))]
    pub async fn list(&self) -> Result<Vec<Post>, DomainError> {
        let posts = self.posts.list().await?;
        tracing::debug!(count = posts.len(), "listed posts");
        Ok(posts)
    }

    #[instrument(name = "post.update", skip(self, changes))]
    pub async fn update(
        &self,
        actor_id: i64,
        id: i64,
        changes: PostChanges,
    ) -> Result<Post, DomainError> {
        let changes = normalize(changes)?;

        let current = self.get(id).await?;
        current.authorize_mutation(actor_id)?;

        let fields = changes.field_names().join(",");
        let post = self
            .posts
            .update(id, changes)
            .await
            .map_err(|e| missing_post(e, id))?;

        tracing::info!(
            target: "audit",
            action = "post.update",
            post_id = post.id,
            actor = actor_id,
            at = %post.updated_at.to_rfc3339(),
            fields = %fields,
            "post updated"
        );

        Ok(post)
    }

    #[instrument(name = "post.delete", skip(self))]
    pub async fn delete(&self, actor_id: i64, id: i64) -> Result<Post, DomainError> {
        let current = self.get(id).await?;
        current.authorize_mutation(actor_id)?;

        let post = self
            .posts
            .soft_delete(id)
            .await
            .map_err(|e| missing_post(e, id))?;

        tracing::info!(
            target: "audit",
            action = "post.delete",
            post_id = post.id,
            actor = actor_id,
            at = %post.updated_at.to_rfc3339(),
            fields = "deleted_at",
            "post deleted"
        );

        Ok(post)
    }
}

fn normalize(changes: PostChanges) -> Result<PostChanges, DomainError> {
    if changes.is_empty() {
        return Err(DomainError::validation(
            "at least one of title or content is required",
        ));
    }

    let title = match changes.title {
        Some(title) => {
            let title = validate::required("title", &title)?;
            validate::max_chars("title", title, MAX_TITLE_CHARS)?;
            Some(title.to_string())
        }
        None => None,
    };
    let content = match changes.content {
        Some(content) => Some(validate::required("content", &content)?.to_string()),
        None => None,
    };

    Ok(PostChanges { title, content })
}

// A post can vanish between the ownership check and the write.
fn missing_post(err: RepoError, id: i64) -> DomainError {
    match err {
        RepoError::NotFound => DomainError::not_found("Post", id),
        other => other.into(),
    }
}
