use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::{ColumnTrait, DbConn, EntityTrait, PrimaryKeyTrait, QueryFilter, QueryOrder};

use quill_core::error::RepoError;
use quill_core::ports::BaseRepository;

use super::errors::repo_error;

/// Entities whose rows are soft-deleted through a nullable `deleted_at`.
pub trait SoftDeletable: EntityTrait {
    fn id_column() -> Self::Column;
    fn deleted_at_column() -> Self::Column;
}

/// Generic SeaORM repository: live-row reads shared by all tables.
pub struct SqlRepository<E>
where
    E: EntityTrait,
{
    pub(crate) db: Arc<DbConn>,
    _entity: PhantomData<E>,
}

impl<E> SqlRepository<E>
where
    E: EntityTrait,
{
    pub fn new(db: Arc<DbConn>) -> Self {
        Self {
            db,
            _entity: PhantomData,
        }
    }
}

#[async_trait]
impl<E, T> BaseRepository<T, i64> for SqlRepository<E>
where
    E: SoftDeletable,
    E::Model: Sync + Send,
    E::PrimaryKey: PrimaryKeyTrait<ValueType = i64>,
    T: From<E::Model> + Send + Sync + 'static,
{
    async fn find_by_id(&self, id: i64) -> Result<Option<T>, RepoError> {
        let result = E::find_by_id(id)
            .filter(E::deleted_at_column().is_null())
            .one(self.db.as_ref())
            .await
            .map_err(repo_error)?;

        Ok(result.map(Into::into))
    }

    async fn list(&self) -> Result<Vec<T>, RepoError> {
        let rows = E::find()
            .filter(E::deleted_at_column().is_null())
            .order_by_asc(E::id_column())
            .all(self.db.as_ref())
            .await
            .map_err(repo_error)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}
