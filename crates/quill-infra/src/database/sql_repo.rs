//! SeaORM repository implementations.

use async_trait::async_trait;
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};

use quill_core::domain::{Comment, NewComment, NewPost, NewUser, Post, PostChanges, User};
use quill_core::error::{Reference, RepoError};
use quill_core::ports::{CommentRepository, PostRepository, UserRepository};

use super::entity::comment::{self, Entity as CommentEntity};
use super::entity::post::{self, Entity as PostEntity};
use super::entity::user::{self, Entity as UserEntity};
use super::errors::{insert_error, repo_error};
use super::sql_base::{SoftDeletable, SqlRepository};

pub type SqlUserRepository = SqlRepository<UserEntity>;

pub type SqlPostRepository = SqlRepository<PostEntity>;

pub type SqlCommentRepository = SqlRepository<CommentEntity>;

impl SoftDeletable for UserEntity {
    fn id_column() -> user::Column {
        user::Column::Id
    }

    fn deleted_at_column() -> user::Column {
        user::Column::DeletedAt
    }
}

impl SoftDeletable for PostEntity {
    fn id_column() -> post::Column {
        post::Column::Id
    }

    fn deleted_at_column() -> post::Column {
        post::Column::DeletedAt
    }
}

impl SoftDeletable for CommentEntity {
    fn id_column() -> comment::Column {
        comment::Column::Id
    }

    fn deleted_at_column() -> comment::Column {
        comment::Column::DeletedAt
    }
}

fn now() -> DateTimeWithTimeZone {
    chrono::Utc::now().into()
}

#[async_trait]
impl UserRepository for SqlUserRepository {
    async fn create(&self, user: NewUser) -> Result<User, RepoError> {
        tracing::debug!(username = %user.username, "Inserting user");

        let model = user::ActiveModel::from(user)
            .insert(self.db.as_ref())
            .await
            .map_err(repo_error)?;

        Ok(model.into())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        let result = UserEntity::find()
            .filter(user::Column::Username.eq(username))
            .filter(user::Column::DeletedAt.is_null())
            .one(self.db.as_ref())
            .await
            .map_err(repo_error)?;

        Ok(result.map(Into::into))
    }
}

impl SqlPostRepository {
    async fn find_live(&self, id: i64) -> Result<post::Model, RepoError> {
        PostEntity::find_by_id(id)
            .filter(post::Column::DeletedAt.is_null())
            .one(self.db.as_ref())
            .await
            .map_err(repo_error)?
            .ok_or(RepoError::NotFound)
    }
}

#[async_trait]
impl PostRepository for SqlPostRepository {
    async fn create(&self, post: NewPost) -> Result<Post, RepoError> {
        let model = post::ActiveModel::from(post)
            .insert(self.db.as_ref())
            .await
            .map_err(insert_error(Reference::User))?;

        Ok(model.into())
    }

    async fn update(&self, id: i64, changes: PostChanges) -> Result<Post, RepoError> {
        let mut active: post::ActiveModel = self.find_live(id).await?.into();

        if let Some(title) = changes.title {
            active.title = Set(title);
        }
        if let Some(content) = changes.content {
            active.content = Set(content);
        }
        active.updated_at = Set(now());

        let model = active.update(self.db.as_ref()).await.map_err(repo_error)?;
        Ok(model.into())
    }

    async fn soft_delete(&self, id: i64) -> Result<Post, RepoError> {
        let mut active: post::ActiveModel = self.find_live(id).await?.into();

        let deleted_at = now();
        active.deleted_at = Set(Some(deleted_at));
        active.updated_at = Set(deleted_at);

        let model = active.update(self.db.as_ref()).await.map_err(repo_error)?;
        Ok(model.into())
    }
}

#[async_trait]
impl CommentRepository for SqlCommentRepository {
    async fn create(&self, comment: NewComment) -> Result<Comment, RepoError> {
        let txn = self.db.begin().await.map_err(repo_error)?;

        // Bumping the counter first also proves the post exists and is live.
        let bumped = PostEntity::update_many()
            .col_expr(
                post::Column::CommentCount,
                Expr::col(post::Column::CommentCount).add(1),
            )
            .filter(post::Column::Id.eq(comment.post_id))
            .filter(post::Column::DeletedAt.is_null())
            .exec(&txn)
            .await
            .map_err(repo_error)?;

        if bumped.rows_affected == 0 {
            txn.rollback().await.map_err(repo_error)?;
            return Err(RepoError::MissingReference(Reference::Post));
        }

        // The post is known to be live, so a key failure here is the author.
        let model = match comment::ActiveModel::from(comment).insert(&txn).await {
            Ok(model) => model,
            Err(err) => {
                txn.rollback().await.map_err(repo_error)?;
                return Err(insert_error(Reference::User)(err));
            }
        };

        txn.commit().await.map_err(repo_error)?;
        Ok(model.into())
    }

    async fn list_by_post(&self, post_id: i64) -> Result<Vec<Comment>, RepoError> {
        let rows = CommentEntity::find()
            .filter(comment::Column::PostId.eq(post_id))
            .filter(comment::Column::DeletedAt.is_null())
            .order_by_asc(comment::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(repo_error)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}
