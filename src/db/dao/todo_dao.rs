use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder,
};
use uuid::Uuid;

use super::{DaoLayerError, DaoResult};
use crate::db::entities::{prelude::Todos, todo};

#[derive(Clone)]
pub struct TodoDao {
    db: DatabaseConnection,
}

impl TodoDao {
    pub fn new(db: &DatabaseConnection) -> Self {
        Self { db: db.clone() }
    }

    pub async fn list_by_owner(&self, owner_id: &str) -> DaoResult<Vec<todo::Model>> {
        Todos::find()
            .filter(todo::Column::OwnerId.eq(owner_id))
            .order_by_desc(todo::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(DaoLayerError::Db)
    }

    pub async fn find_by_id(&self, id: Uuid) -> DaoResult<Option<todo::Model>> {
        Todos::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(DaoLayerError::Db)
    }

    pub async fn insert(&self, model: todo::ActiveModel) -> DaoResult<todo::Model> {
        model.insert(&self.db).await.map_err(DaoLayerError::Db)
    }

    pub async fn update(&self, id: Uuid, model: todo::ActiveModel) -> DaoResult<todo::Model> {
        model.update(&self.db).await.map_err(|err| match err {
            DbErr::RecordNotUpdated => DaoLayerError::NotFound {
                entity: std::any::type_name::<Todos>(),
                id,
            },
            other => DaoLayerError::Db(other),
        })
    }

    pub async fn delete_owned(&self, id: Uuid, owner_id: &str) -> DaoResult<bool> {
        let result = Todos::delete_many()
            .filter(todo::Column::Id.eq(id))
            .filter(todo::Column::OwnerId.eq(owner_id))
            .exec(&self.db)
            .await
            .map_err(DaoLayerError::Db)?;
        Ok(result.rows_affected > 0)
    }
}
