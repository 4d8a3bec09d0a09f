use sea_orm::{ConnectionTrait, DbConn, DbErr, EntityName, EntityTrait, Schema};

use super::entity::{comment, post, user};

/// Create the users, posts and comments tables if they do not exist yet.
///
/// Order matters: each table's foreign keys point at the one before it.
pub async fn sync_schema(db: &DbConn) -> Result<(), DbErr> {
    let schema = Schema::new(db.get_database_backend());

    create_table(db, &schema, user::Entity).await?;
    create_table(db, &schema, post::Entity).await?;
    create_table(db, &schema, comment::Entity).await?;

    Ok(())
}

async fn create_table<E>(db: &DbConn, schema: &Schema, entity: E) -> Result<(), DbErr>
where
    E: EntityTrait,
{
    let backend = db.get_database_backend();
    let mut stmt = schema.create_table_from_entity(entity);
    stmt.if_not_exists();

    db.execute(backend.build(&stmt)).await?;
    tracing::debug!(table = entity.table_name(), "Table ensured");
    Ok(())
}
